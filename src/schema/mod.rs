use crate::imports::*;

/*
    Types:
    * SqlType - Inferred column type; widens monotonically, never narrows
    * Column - One discovered column: source key, sanitised identifier, type
    * TableSchema - Ordered columns plus the flat row-set for one table
    * Schema - All tables discovered by one walk, in discovery order
*/

/// Keys carrying this marker are source metadata, not report columns.
pub const METADATA_MARKER: char = '@';

/// Column names holding ISO timestamp strings in the source documents.
pub const TIMESTAMP_COLUMNS: [&str; 6] = [
    "createTime",
    "validFrom",
    "lastSuccessfulConnect",
    "lastInvalidConnectAttempt",
    "modification_date",
    "creation_date",
];

/// Column names holding epoch-seconds values in the source documents.
pub const EPOCH_DATE_COLUMNS: [&str; 1] = ["LAST_LOGIN_DATE"];

pub fn is_timestamp_column(key: &str) -> bool {
    TIMESTAMP_COLUMNS.contains(&key)
}

pub fn is_epoch_date_column(key: &str) -> bool {
    EPOCH_DATE_COLUMNS.contains(&key)
}

/// Replaces characters the SQL dialect rejects in identifiers.
pub fn sanitise_identifier(key: &str) -> String {
    key.replace('#', "z")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    BigInt,
    Nvarchar,
    Clob,
    Timestamp,
}

impl SqlType {
    pub fn ddl(&self) -> &'static str {
        match self {
            SqlType::BigInt => "BIGINT",
            SqlType::Nvarchar => "NVARCHAR(5000)",
            SqlType::Clob => "CLOB",
            SqlType::Timestamp => "TIMESTAMP",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SqlType::BigInt => 0,
            SqlType::Nvarchar => 1,
            SqlType::Clob => 2,
            // Outside the widening lattice; handled before ranking.
            SqlType::Timestamp => u8::MAX,
        }
    }

    /// Monotonic widening: BIGINT < NVARCHAR(5000) < CLOB, with TIMESTAMP
    /// as a permanent override in either direction.
    pub fn widen(current: SqlType, observed: SqlType) -> SqlType {
        if current == SqlType::Timestamp || observed == SqlType::Timestamp {
            return SqlType::Timestamp;
        }
        if observed.rank() > current.rank() {
            observed
        } else {
            current
        }
    }
}

fn observed_type(key: &str, value: &JsonValue) -> SqlType {
    if is_timestamp_column(key) || is_epoch_date_column(key) {
        return SqlType::Timestamp;
    }
    match value {
        // Booleans ride the integer path; there is no BOOLEAN in the lattice.
        JsonValue::Bool(_) => SqlType::BigInt,
        JsonValue::Number(n) if n.is_i64() || n.is_u64() => SqlType::BigInt,
        JsonValue::Array(_) | JsonValue::Object(_) => SqlType::Clob,
        _ => SqlType::Nvarchar,
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    source_key: String,
    name: String,
    sql_type: SqlType,
}

impl Column {
    pub fn source_key(&self) -> &str {
        &self.source_key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sql_type(&self) -> SqlType {
        self.sql_type
    }
}

#[derive(Debug, Clone)]
pub struct TableSchema {
    name: String,
    columns: Vec<Column>,
    records: Vec<JsonValue>,
}

impl TableSchema {
    fn new(name: &str) -> Self {
        TableSchema {
            name: name.to_string(),
            columns: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn records(&self) -> &[JsonValue] {
        &self.records
    }

    pub fn column(&self, source_key: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|column| column.source_key == source_key)
    }

    /// Folds one key/value observation into the column list: unseen keys
    /// append in discovery order, seen keys only widen their type.
    fn observe(&mut self, key: &str, value: &JsonValue) {
        let observed = observed_type(key, value);
        match self
            .columns
            .iter_mut()
            .find(|column| column.source_key == key)
        {
            Some(column) => column.sql_type = SqlType::widen(column.sql_type, observed),
            None => self.columns.push(Column {
                source_key: key.to_string(),
                name: sanitise_identifier(key),
                sql_type: observed,
            }),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Schema {
    tables: Vec<TableSchema>,
}

impl Schema {
    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|table| table.name == name)
    }

    fn table_mut(&mut self, name: &str) -> &mut TableSchema {
        let index = match self.tables.iter().position(|table| table.name == name) {
            Some(index) => index,
            None => {
                self.tables.push(TableSchema::new(name));
                self.tables.len() - 1
            }
        };
        &mut self.tables[index]
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut TableSchema> {
        self.tables.iter_mut().find(|table| table.name == name)
    }
}

pub fn child_table_name(parent: &str, key: &str) -> String {
    format!("{}_{}", parent, key).to_uppercase()
}

/// Walks every record of every table, discovering columns in first-seen
/// order and fanning list-valued keys out into child tables. Source
/// documents are inconsistent about which keys they carry, so the whole
/// record set is scanned before any schema is considered complete. An
/// explicit worklist bounds arbitrarily deep nesting.
pub fn discover(table_name: &str, records: &[JsonValue]) -> Schema {
    let mut schema = Schema::default();
    let mut worklist: VecDeque<(String, Vec<JsonValue>)> = VecDeque::new();
    worklist.push_back((table_name.to_uppercase(), records.to_vec()));

    while let Some((table_name, batch)) = worklist.pop_front() {
        for record in &batch {
            let Some(entries) = record.as_object() else {
                tracing::debug!(table = table_name.as_str(), "skipping non-object record");
                continue;
            };

            let table = schema.table_mut(&table_name);
            for (key, value) in entries {
                if key.contains(METADATA_MARKER) {
                    continue;
                }
                table.observe(key, value);
                if let JsonValue::Array(items) = value {
                    worklist.push_back((child_table_name(&table_name, key), items.clone()));
                }
            }
        }

        if let Some(table) = schema.find_mut(&table_name) {
            table.records.extend(batch);
        }
    }

    schema
}
