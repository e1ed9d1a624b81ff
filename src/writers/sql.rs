use crate::imports::*;

use super::OutputConfig;

/*
    Types:
    * SqlValue - One typed bind value
    * BindValue - Named bind parameter for one insert column
    * SqlSession - Trait seam to the externally-owned database connection
    * TableStatements - The DROP/CREATE/INSERT texts for one table
*/
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BindValue {
    pub name: String,
    pub value: SqlValue,
}

/// Executes statements against a connection the caller owns. Connection
/// lifecycle, credentials and transactions all live with the caller; this
/// writer only drives statements through it.
pub trait SqlSession {
    fn execute(&mut self, statement: &str, binds: &[BindValue]) -> Result<()>;
}

#[derive(Debug, Clone)]
struct TableStatements {
    drop: String,
    create: String,
    insert: String,
}

/// Rebuilds and loads one table per level of document nesting: DROP and
/// CREATE for every discovered table first, then one parameterised INSERT
/// per record, recursing into fan-out child tables. A failed statement is
/// logged and abandoned; sibling statements continue.
pub fn write_list(
    records: &[JsonValue],
    config: &OutputConfig,
    session: &mut dyn SqlSession,
) -> Result<()> {
    let schema = crate::schema::discover(config.prefix(), records);

    // Tables whose every column was metadata have nothing to create.
    let statements: HashMap<String, TableStatements> = schema
        .tables()
        .iter()
        .filter(|table| !table.columns().is_empty())
        .map(|table| (table.name().to_string(), build_statements(table)))
        .collect();

    for table in schema.tables() {
        if let Some(table_statements) = statements.get(table.name()) {
            execute_logged(session, &table_statements.drop, &[]);
        }
    }
    for table in schema.tables() {
        if let Some(table_statements) = statements.get(table.name()) {
            execute_logged(session, &table_statements.create, &[]);
        }
    }

    insert_records(
        session,
        &schema,
        &statements,
        config.prefix().to_uppercase(),
        records,
    );

    Ok(())
}

fn build_statements(table: &TableSchema) -> TableStatements {
    let mut create = format!("create column table {} (", table.name());
    let mut insert = format!("insert into {} values (", table.name());

    let mut comma = "";
    for column in table.columns() {
        create.push_str(&format!(
            "\n{}\"{}\" {}",
            comma,
            column.name(),
            column.sql_type().ddl()
        ));
        insert.push_str(&format!("\n{}:{}", comma, column.name()));
        comma = ",";
    }
    create.push(')');
    insert.push(')');

    TableStatements {
        drop: format!("drop table {} cascade", table.name()),
        create,
        insert,
    }
}

/// Inserts every record of every table, parent rows ahead of their
/// fan-out children, using an explicit stack rather than call-stack
/// recursion.
fn insert_records(
    session: &mut dyn SqlSession,
    schema: &Schema,
    statements: &HashMap<String, TableStatements>,
    table_name: String,
    records: &[JsonValue],
) {
    let mut stack: Vec<(String, Vec<JsonValue>)> = vec![(table_name, records.to_vec())];

    while let Some((table_name, batch)) = stack.pop() {
        let Some(table) = schema.table(&table_name) else {
            continue;
        };
        let Some(table_statements) = statements.get(&table_name) else {
            continue;
        };

        for record in &batch {
            let Some(entries) = record.as_object() else {
                continue;
            };

            let mut binds = Vec::with_capacity(table.columns().len());
            let mut children: Vec<(String, Vec<JsonValue>)> = Vec::new();

            for column in table.columns() {
                let value = entries.get(column.source_key());
                binds.push(BindValue {
                    name: column.name().to_string(),
                    value: bind_value(column, value),
                });
                if let Some(JsonValue::Array(items)) = value {
                    children.push((
                        crate::schema::child_table_name(&table_name, column.source_key()),
                        items.clone(),
                    ));
                }
            }

            execute_logged(session, &table_statements.insert, &binds);
            stack.extend(children);
        }
    }
}

/// Marshals one column value for binding. Documents are inconsistent, so
/// an absent column binds NULL rather than failing the row.
fn bind_value(column: &Column, value: Option<&JsonValue>) -> SqlValue {
    let Some(value) = value else {
        return SqlValue::Null;
    };
    if value.is_null() {
        return SqlValue::Null;
    }

    if is_timestamp_column(column.source_key()) {
        // Source timestamps carry fractional seconds and timezone suffixes
        // the column format does not accept.
        let text = scalar_text(value);
        return SqlValue::Text(text.chars().take(23).collect());
    }

    if is_epoch_date_column(column.source_key()) {
        let text = scalar_text(value);
        return match parse_epoch_prefix(&text) {
            Some(date) => SqlValue::Text(date.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => {
                tracing::warn!(
                    column = column.source_key(),
                    "value is not an epoch timestamp"
                );
                SqlValue::Text(text)
            }
        };
    }

    if column.sql_type() == SqlType::Clob {
        return SqlValue::Text(scalar_text(value));
    }

    match value {
        JsonValue::Bool(flag) => SqlValue::Integer(*flag as i64),
        JsonValue::Number(number) => {
            if let Some(integer) = number.as_i64() {
                SqlValue::Integer(integer)
            } else if let Some(real) = number.as_f64() {
                SqlValue::Real(real)
            } else {
                SqlValue::Text(number.to_string())
            }
        }
        JsonValue::String(text) => SqlValue::Text(text.clone()),
        other => SqlValue::Text(scalar_text(other)),
    }
}

fn execute_logged(session: &mut dyn SqlSession, statement: &str, binds: &[BindValue]) {
    if let Err(error) = session.execute(statement, binds) {
        tracing::error!(%error, statement, "SQL execution failed");
    }
}
