use crate::imports::*;

use serde::{Deserialize, Serialize};

pub mod csv;
pub mod json;
pub mod sql;
pub mod text;


use self::sql::SqlSession;

/*
    Types:
    * OutputFormat - The renderer selected by the output configuration
    * OutputConfig - Report name, format and destination for one render call
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Csv,
    #[serde(alias = "hana")]
    Sql,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self> {
        match input {
            "text" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            "sql" | "hana" => Ok(OutputFormat::Sql),
            "json" => Ok(OutputFormat::Json),
            other => Err(anyhow::anyhow!("unexpected output format '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    report: String,
    format: OutputFormat,
    #[serde(default)]
    prefix: Option<String>,
    #[serde(default)]
    directory: Option<PathBuf>,
}

impl OutputConfig {
    pub fn new(report: &str, format: OutputFormat) -> Self {
        OutputConfig {
            report: report.to_string(),
            format,
            prefix: None,
            directory: None,
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn report(&self) -> &str {
        &self.report
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// The base name for generated artifacts, defaulting to the report name.
    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or(&self.report)
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }
}

/// Accepts either a record list or a single record object, yielding the
/// list the writers consume.
pub fn as_record_list(value: &JsonValue) -> Vec<JsonValue> {
    match value {
        JsonValue::Array(items) => items.clone(),
        JsonValue::Object(_) => vec![value.clone()],
        other => {
            tracing::warn!(found = ?json_type_of(other), "expected a record list or object");
            Vec::new()
        }
    }
}

/// Renders one record list through the writer selected by the output
/// configuration. The SQL writer needs the caller's database session; the
/// other formats ignore it.
pub fn write_list(
    records: &[JsonValue],
    config: &OutputConfig,
    registry: &TemplateRegistry,
    session: Option<&mut dyn SqlSession>,
) -> Result<()> {
    if records.is_empty() {
        tracing::warn!(report = config.report(), "empty record list, nothing to write");
        return Ok(());
    }

    match config.format() {
        OutputFormat::Text => text::write_list(records, config, registry),
        OutputFormat::Csv => csv::write_list(records, config),
        OutputFormat::Sql => match session {
            Some(session) => sql::write_list(records, config, session),
            None => Err(anyhow::anyhow!(
                "sql output for report '{}' requires a database session",
                config.report()
            )),
        },
        OutputFormat::Json => json::write_list(records, config),
    }
}
