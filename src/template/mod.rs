use crate::imports::*;

use regex::Regex;

mod builtin;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(.*?)\}").expect("placeholder pattern is valid"));

/// Extracts the `{name}` placeholder tokens from a row layout, in order.
pub fn layout_placeholders(layout: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(layout)
        .map(|capture| capture[1].to_string())
        .collect()
}

/*
    Types:
    * FieldDef - Path + format + optional heading/aggregate for one field
    * RowDef - One output row layout with optional sub-list iteration
    * Template - Named, immutable bundle of field definitions and row layouts
    * TemplateBuilder - Builder pattern compiling raw path/format strings into a Template
    * TemplateRegistry - Immutable mapping from report name to Template
*/
#[derive(Debug, Clone)]
pub struct FieldDef {
    path: PathExpr,
    format: FieldFormat,
    heading: Option<String>,
    aggregate: Option<PathExpr>,
}

impl FieldDef {
    pub fn path(&self) -> &PathExpr {
        &self.path
    }

    pub fn format(&self) -> &FieldFormat {
        &self.format
    }

    pub fn heading(&self) -> Option<&str> {
        self.heading.as_deref()
    }

    pub fn aggregate(&self) -> Option<&PathExpr> {
        self.aggregate.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct RowDef {
    layout: String,
    iterate: Option<PathExpr>,
    placeholders: Vec<String>,
}

impl RowDef {
    pub fn layout(&self) -> &str {
        &self.layout
    }

    pub fn iterate(&self) -> Option<&PathExpr> {
        self.iterate.as_ref()
    }

    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }
}

#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    fields: HashMap<String, FieldDef>,
    rows: Vec<RowDef>,
}

impl Template {
    pub fn builder(name: &str) -> TemplateBuilder {
        TemplateBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    pub fn rows(&self) -> &[RowDef] {
        &self.rows
    }
}

#[derive(Debug, Default)]
struct PendingField {
    name: String,
    path: String,
    format: String,
    heading: Option<String>,
    aggregate: Option<String>,
}

#[derive(Debug, Default)]
struct PendingRow {
    layout: String,
    iterate: Option<String>,
}

#[derive(Debug, Default)]
pub struct TemplateBuilder {
    name: String,
    fields: Vec<PendingField>,
    rows: Vec<PendingRow>,
}

impl TemplateBuilder {
    pub fn new(name: &str) -> Self {
        TemplateBuilder {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn field(mut self, name: &str, path: &str, format: &str) -> Self {
        self.fields.push(PendingField {
            name: name.to_string(),
            path: path.to_string(),
            format: format.to_string(),
            ..Default::default()
        });
        self
    }

    pub fn labelled_field(mut self, name: &str, path: &str, format: &str, heading: &str) -> Self {
        self.fields.push(PendingField {
            name: name.to_string(),
            path: path.to_string(),
            format: format.to_string(),
            heading: Some(heading.to_string()),
            ..Default::default()
        });
        self
    }

    pub fn aggregate_field(mut self, name: &str, path: &str, format: &str, aggregate: &str) -> Self {
        self.fields.push(PendingField {
            name: name.to_string(),
            path: path.to_string(),
            format: format.to_string(),
            aggregate: Some(aggregate.to_string()),
            ..Default::default()
        });
        self
    }

    pub fn row(mut self, layout: &str) -> Self {
        self.rows.push(PendingRow {
            layout: layout.to_string(),
            iterate: None,
        });
        self
    }

    pub fn iterative_row(mut self, path: &str, layout: &str) -> Self {
        self.rows.push(PendingRow {
            layout: layout.to_string(),
            iterate: Some(path.to_string()),
        });
        self
    }

    /// Compiles every path and format specification. Templates are
    /// validated here, once, so renderers never see a malformed definition.
    pub fn build(self) -> Result<Template> {
        let mut fields = HashMap::with_capacity(self.fields.len());
        for pending in self.fields {
            let context = || format!("field '{}' of template '{}'", pending.name, self.name);

            let path = PathExpr::parse(&pending.path).with_context(context)?;
            let format = FieldFormat::parse(&pending.format).with_context(context)?;
            let aggregate = pending
                .aggregate
                .as_deref()
                .map(PathExpr::parse)
                .transpose()
                .with_context(context)?;

            fields.insert(
                pending.name,
                FieldDef {
                    path,
                    format,
                    heading: pending.heading,
                    aggregate,
                },
            );
        }

        let mut rows = Vec::with_capacity(self.rows.len());
        for pending in self.rows {
            let iterate = pending
                .iterate
                .as_deref()
                .map(PathExpr::parse)
                .transpose()
                .with_context(|| format!("row iteration path of template '{}'", self.name))?;
            let placeholders = layout_placeholders(&pending.layout);

            rows.push(RowDef {
                layout: pending.layout,
                iterate,
                placeholders,
            });
        }

        Ok(Template {
            name: self.name,
            fields,
            rows,
        })
    }
}

#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, template: Template) {
        self.templates.insert(template.name().to_string(), template);
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// The compiled-in report definitions. Built once, never mutated;
    /// callers needing other reports construct their own registry.
    pub fn builtin() -> &'static TemplateRegistry {
        static BUILTIN: LazyLock<TemplateRegistry> = LazyLock::new(|| {
            let mut registry = TemplateRegistry::new();
            for template in builtin::all() {
                match template {
                    Ok(template) => registry.insert(template),
                    Err(error) => {
                        tracing::error!(%error, "failed to compile built-in template");
                    }
                }
            }
            registry
        });
        &BUILTIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_extract_in_layout_order() {
        assert_eq!(
            layout_placeholders("{user_name} {user_email} end"),
            ["user_name", "user_email"]
        );
        assert!(layout_placeholders("no placeholders here").is_empty());
    }

    #[test]
    fn builder_compiles_paths_and_formats() {
        let template = Template::builder("sample")
            .labelled_field("name", "$.name", "20s", "Name")
            .aggregate_field("members", "$.members[*]", "30s", "$.name")
            .row("{name} {members}")
            .iterative_row("$.members", "  {name}")
            .build()
            .unwrap();

        assert_eq!(template.name(), "sample");
        let field = template.field("name").unwrap();
        assert_eq!(field.heading(), Some("Name"));
        assert_eq!(field.format().width(), Some(20));
        assert!(template.field("members").unwrap().aggregate().is_some());

        assert_eq!(template.rows().len(), 2);
        assert!(template.rows()[0].iterate().is_none());
        assert!(template.rows()[1].iterate().is_some());
        assert_eq!(template.rows()[0].placeholders(), ["name", "members"]);
    }

    #[test]
    fn builder_rejects_malformed_definitions() {
        assert!(
            Template::builder("broken")
                .field("name", "$.name", "20x")
                .build()
                .is_err()
        );
        assert!(
            Template::builder("broken")
                .field("name", "", "20s")
                .build()
                .is_err()
        );
    }

    #[test]
    fn builtin_registry_carries_the_stock_reports() {
        let registry = TemplateRegistry::builtin();
        for name in ["users", "spaces", "shares", "members", "connections"] {
            assert!(registry.get(name).is_some(), "missing template '{}'", name);
        }
        assert!(registry.get("unknown").is_none());
    }
}
