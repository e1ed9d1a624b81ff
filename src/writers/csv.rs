use crate::imports::*;

use std::fs::File;
use std::io::{BufWriter, Write};

use super::OutputConfig;

/// Writes one `.csv` artifact per discovered table, fan-out child tables
/// included, into the configured directory (default: current directory).
/// A table that fails to write is logged and skipped; its siblings
/// continue.
pub fn write_list(records: &[JsonValue], config: &OutputConfig) -> Result<()> {
    let schema = crate::schema::discover(config.prefix(), records);
    let directory = config
        .directory()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    for table in schema.tables() {
        if let Err(error) = write_table(table, &directory) {
            tracing::error!(table = table.name(), %error, "failed to write csv table");
        }
    }

    Ok(())
}

fn write_table(table: &TableSchema, directory: &Path) -> Result<()> {
    let path = directory.join(format!("{}.csv", table.name()));
    let file =
        File::create(&path).with_context(|| format!("failed to create '{}'", path.display()))?;
    let mut sink = BufWriter::new(file);

    let heading = table
        .columns()
        .iter()
        .map(|column| format!("\"{}\"", column.source_key().to_uppercase()))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(sink, "{}", heading)?;

    for record in table.records() {
        let Some(entries) = record.as_object() else {
            continue;
        };
        let line = table
            .columns()
            .iter()
            .map(|column| {
                entries
                    .get(column.source_key())
                    .map(scalar_text)
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(",");
        writeln!(sink, "{}", line)?;
    }

    sink.flush()
        .with_context(|| format!("failed to flush '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imports::init_tracing;
    use crate::writers::OutputFormat;
    use serde_json::json;

    fn read(directory: &Path, name: &str) -> String {
        std::fs::read_to_string(directory.join(name)).unwrap()
    }

    #[test]
    fn header_covers_columns_from_every_record() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();

        let records = vec![json!({ "a": 1, "b": 2 }), json!({ "a": 1, "c": 3 })];
        let config = OutputConfig::new("t", OutputFormat::Csv).with_directory(dir.path());
        write_list(&records, &config).unwrap();

        assert_eq!(
            read(dir.path(), "T.csv"),
            "\"A\",\"B\",\"C\"\n1,2,\n1,,3\n"
        );
    }

    #[test]
    fn child_tables_get_their_own_artifacts() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();

        let records = vec![
            json!({ "name": "one", "members": [{ "user": "mark" }] }),
            json!({ "name": "two", "members": [{ "user": "sally" }] }),
        ];
        let config = OutputConfig::new("spaces", OutputFormat::Csv).with_directory(dir.path());
        write_list(&records, &config).unwrap();

        let parent = read(dir.path(), "SPACES.csv");
        assert!(parent.starts_with("\"NAME\",\"MEMBERS\"\n"));
        // Container cells fall back to their compact JSON form.
        assert!(parent.contains(r#"one,[{"user":"mark"}]"#));

        // Child rows accumulate across every parent record.
        assert_eq!(
            read(dir.path(), "SPACES_MEMBERS.csv"),
            "\"USER\"\nmark\nsally\n"
        );
    }

    #[test]
    fn prefix_overrides_the_report_name() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();

        let records = vec![json!({ "a": null, "b": true })];
        let config = OutputConfig::new("report", OutputFormat::Csv)
            .with_prefix("export")
            .with_directory(dir.path());
        write_list(&records, &config).unwrap();

        // Null cells render empty, booleans render bare.
        assert_eq!(read(dir.path(), "EXPORT.csv"), "\"A\",\"B\"\n,true\n");
    }
}
