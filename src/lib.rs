mod format;
mod path;
mod schema;
mod template;
mod values;
mod writers;

// Library exports
pub mod prelude {
    // Document model
    pub use crate::values::{JsonMap, JsonType, JsonValue, ObjectBuilder, json_type_of, scalar_text};

    // Path expressions
    pub use crate::path::{PathExpr, Segment, Subscript, resolve_path};

    // Field formatting
    pub use crate::format::{FieldFormat, FormatKind, GIGABYTE};

    // Templates
    pub use crate::template::{
        FieldDef, RowDef, Template, TemplateBuilder, TemplateRegistry, layout_placeholders,
    };

    // Schema discovery
    pub use crate::schema::{Column, Schema, SqlType, TableSchema, discover};

    // Writers
    pub use crate::writers::sql::{BindValue, SqlSession, SqlValue};
    pub use crate::writers::{OutputConfig, OutputFormat, as_record_list, write_list};
}

// Internal imports for use within the crate
#[allow(unused_imports)]
pub(crate) mod imports {
    pub use crate::values::{JsonMap, JsonType, JsonValue, ObjectBuilder, json_type_of, scalar_text};

    pub use crate::path::{PathExpr, Segment, Subscript, resolve_path};

    pub use crate::format::{FieldFormat, FormatKind, GIGABYTE, parse_epoch_prefix};

    pub use crate::template::{
        FieldDef, RowDef, Template, TemplateBuilder, TemplateRegistry, layout_placeholders,
    };

    pub use crate::schema::{
        Column, EPOCH_DATE_COLUMNS, METADATA_MARKER, Schema, SqlType, TIMESTAMP_COLUMNS,
        TableSchema, child_table_name, is_epoch_date_column, is_timestamp_column,
    };

    // Result and error handling
    pub type Result<T> = anyhow::Result<T>;
    pub use anyhow::Context as _;

    // File I/O
    pub use std::path::{Path, PathBuf};

    // Collections
    pub use std::collections::{HashMap, VecDeque};

    // Lazy initialization
    pub use std::sync::LazyLock;

    #[cfg(test)]
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    }
}
