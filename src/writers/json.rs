use crate::imports::*;

use std::fs::File;
use std::io::{BufWriter, Write};

use super::OutputConfig;

/// Writes the record list untransformed, pretty-printed, to
/// `{directory}/{prefix}.json`. The output directory is created when
/// missing.
pub fn write_list(records: &[JsonValue], config: &OutputConfig) -> Result<()> {
    let directory = config
        .directory()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    if !directory.exists() {
        std::fs::create_dir_all(&directory)
            .with_context(|| format!("failed to create '{}'", directory.display()))?;
    }

    let path = directory.join(format!("{}.json", config.prefix()));
    let file =
        File::create(&path).with_context(|| format!("failed to create '{}'", path.display()))?;
    let mut sink = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut sink, records)
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    sink.flush()
        .with_context(|| format!("failed to flush '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imports::init_tracing;
    use crate::writers::OutputFormat;
    use serde_json::json;

    #[test]
    fn records_round_trip_through_the_artifact() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deeper");

        let records = vec![json!({ "a": 1 }), json!({ "b": [true, null] })];
        let config = OutputConfig::new("dump", OutputFormat::Json).with_directory(&nested);
        write_list(&records, &config).unwrap();

        let written = std::fs::read_to_string(nested.join("dump.json")).unwrap();
        let parsed: Vec<JsonValue> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, records);
        // Pretty printed, not a single line.
        assert!(written.contains('\n'));
    }
}
