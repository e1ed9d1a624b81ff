use crate::imports::*;

use std::fs::File;
use std::io::{BufWriter, Write};

use super::OutputConfig;

/// Renders the report selected by the configuration to
/// `{directory}/{prefix}.txt`, or to standard output when no directory is
/// configured. An unknown report name aborts the whole call.
pub fn write_list(
    records: &[JsonValue],
    config: &OutputConfig,
    registry: &TemplateRegistry,
) -> Result<()> {
    let Some(template) = registry.get(config.report()) else {
        tracing::error!(report = config.report(), "report template not found");
        return Err(anyhow::anyhow!(
            "report template '{}' not found",
            config.report()
        ));
    };

    match config.directory() {
        Some(directory) => {
            let path = directory.join(format!("{}.txt", config.prefix()));
            let file = File::create(&path)
                .with_context(|| format!("failed to create '{}'", path.display()))?;
            let mut sink = BufWriter::new(file);
            render(records, template, &mut sink)?;
            sink.flush()
                .with_context(|| format!("failed to flush '{}'", path.display()))
        }
        None => {
            let mut sink = std::io::stdout().lock();
            render(records, template, &mut sink)?;
            sink.flush().context("failed to flush standard output")
        }
    }
}

/// Renders every record through the template's row layouts, in template
/// order. Rows with an iteration path repeat once per element of the
/// resolved sub-list, with fields resolving against the element.
pub fn render(records: &[JsonValue], template: &Template, out: &mut dyn Write) -> Result<()> {
    for record in records {
        for row in template.rows() {
            match row.iterate() {
                None => render_row(record, row, template, out)?,
                Some(path) => match path.resolve(record) {
                    Some(JsonValue::Array(items)) => {
                        for item in &items {
                            render_row(item, row, template, out)?;
                        }
                    }
                    _ => {
                        tracing::debug!(path = %path, "row iteration path resolved to no list");
                    }
                },
            }
        }
    }
    Ok(())
}

fn render_row(
    data: &JsonValue,
    row: &RowDef,
    template: &Template,
    out: &mut dyn Write,
) -> Result<()> {
    let mut lines: HashMap<&str, Vec<String>> = HashMap::new();
    let mut fillers: HashMap<&str, String> = HashMap::new();

    for name in row.placeholders() {
        match template.field(name) {
            Some(field) => {
                lines.insert(name, field_lines(data, field));
                fillers.insert(name, field.format().blank_line());
            }
            None => {
                tracing::warn!(field = name.as_str(), "layout references unknown field");
                lines.insert(name, vec![String::new()]);
                fillers.insert(name, String::new());
            }
        }
    }

    // The wrapped field with the most lines drives the row's line count;
    // exhausted fields pad out with width-sized filler.
    let max_lines = lines.values().map(Vec::len).max().unwrap_or(0);

    for line_index in 0..max_lines {
        let mut output = row.layout().to_string();
        for name in row.placeholders() {
            let token = format!("{{{}}}", name);
            let replacement = match lines.get(name.as_str()).and_then(|l| l.get(line_index)) {
                Some(line) => line.as_str(),
                None => fillers.get(name.as_str()).map(String::as_str).unwrap_or(""),
            };
            output = output.replace(&token, replacement);
        }
        writeln!(out, "{}", output.trim_end())?;
    }

    Ok(())
}

/// Resolves one field against a record and produces its wrapped lines.
/// Lookup misses render blank. An array-valued field must declare an
/// aggregate sub-path joining its elements; without one it renders blank.
pub(crate) fn field_lines(data: &JsonValue, field: &FieldDef) -> Vec<String> {
    let text = match field.path().resolve(data) {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::Array(items)) => match field.aggregate() {
            Some(aggregate) => items
                .iter()
                .filter_map(|item| aggregate.resolve(item))
                .map(|value| scalar_text(&value))
                .collect::<Vec<_>>()
                .join(", "),
            None => {
                tracing::warn!(path = %field.path(), "aggregate specification missing");
                String::new()
            }
        },
        Some(value) => scalar_text(&value),
    };

    field.format().render(&text)
}
