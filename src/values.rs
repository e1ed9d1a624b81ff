/*
    Types:
    * JsonValue - A JSON document value, re-export of serde_json::Value (ordered object keys)
    * JsonMap - The object variant's backing map type
    * JsonType - Enum representing the shape of a JsonValue
    * ObjectBuilder - Builder pattern for constructing JsonValue objects
*/
pub type JsonValue = serde_json::Value;
pub type JsonMap = serde_json::Map<String, JsonValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JsonType {
    #[default]
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

pub fn json_type_of(value: &JsonValue) -> JsonType {
    match value {
        JsonValue::Null => JsonType::Null,
        JsonValue::Bool(_) => JsonType::Bool,
        JsonValue::Number(_) => JsonType::Number,
        JsonValue::String(_) => JsonType::String,
        JsonValue::Array(_) => JsonType::Array,
        JsonValue::Object(_) => JsonType::Object,
    }
}

/// Renders a value as the display text the tabular writers and the text
/// renderer share. Null renders empty, scalars render bare, and container
/// values fall back to their compact JSON form.
pub fn scalar_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(_) | JsonValue::Object(_) => value.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObjectBuilder {
    map: JsonMap,
}

impl ObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.map.insert(key.into(), value.into());
        self
    }

    pub fn object(mut self, key: impl Into<String>, nested: ObjectBuilder) -> Self {
        self.map.insert(key.into(), JsonValue::Object(nested.map));
        self
    }

    pub fn array(
        mut self,
        key: impl Into<String>,
        items: impl IntoIterator<Item = impl Into<JsonValue>>,
    ) -> Self {
        self.map.insert(
            key.into(),
            JsonValue::Array(items.into_iter().map(|item| item.into()).collect()),
        );
        self
    }

    pub fn build(self) -> JsonValue {
        JsonValue::Object(self.map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_text_renders_scalars_bare() {
        assert_eq!(scalar_text(&JsonValue::Null), "");
        assert_eq!(scalar_text(&JsonValue::Bool(true)), "true");
        assert_eq!(scalar_text(&JsonValue::Number(42.into())), "42");
        assert_eq!(
            scalar_text(&JsonValue::String("plain".to_string())),
            "plain"
        );
    }

    #[test]
    fn scalar_text_renders_containers_as_json() {
        let value = ObjectBuilder::new().insert("a", 1).build();
        assert_eq!(scalar_text(&value), r#"{"a":1}"#);

        let value = JsonValue::Array(vec![1.into(), 2.into()]);
        assert_eq!(scalar_text(&value), "[1,2]");
    }

    #[test]
    fn object_builder_preserves_insertion_order() {
        let value = ObjectBuilder::new()
            .insert("z", 1)
            .insert("a", 2)
            .array("items", ["x", "y"])
            .build();

        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "a", "items"]);
        assert_eq!(json_type_of(&value["items"]), JsonType::Array);
    }
}
