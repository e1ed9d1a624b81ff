use crate::imports::*;

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "path.pest"] // relative to src directory
struct PathParser;

/*
    Types:
    * PathExpr - A compiled path expression, resolvable against a JsonValue
    * Segment - One dot-separated step of a path expression
    * Subscript - The `[*]` / `[i]` part of an indexed segment
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subscript {
    All,
    At(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Root,
    Wildcard,
    Key(String),
    Index { key: String, subscript: Subscript },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    raw: String,
    segments: Vec<Segment>,
}

impl PathExpr {
    pub fn parse(input: &str) -> Result<Self> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(anyhow::anyhow!("empty path expression"));
        }

        let pairs = PathParser::parse(Rule::path, raw)
            .map_err(|e| anyhow::anyhow!("invalid path expression '{}': {}", raw, e))?;

        let mut segments = Vec::new();
        for pair in pairs.flatten() {
            match pair.as_rule() {
                Rule::root => segments.push(Segment::Root),
                Rule::wildcard => segments.push(Segment::Wildcard),
                Rule::key => segments.push(Segment::Key(pair.as_str().to_string())),
                Rule::indexed => segments.push(parse_indexed(pair)?),
                _ => {}
            }
        }

        Ok(PathExpr {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Resolves this expression against a document. Every lookup miss or
    /// shape mismatch is an ordinary Absent outcome, never an error.
    pub fn resolve(&self, data: &JsonValue) -> Option<JsonValue> {
        resolve_segments(data, data, &self.segments)
    }
}

impl std::fmt::Display for PathExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Resolves an ad-hoc path string against a document. An invalid
/// specification is logged and resolves to Absent, matching the lookup-miss
/// contract rather than aborting the caller.
pub fn resolve_path(data: &JsonValue, path: &str) -> Option<JsonValue> {
    match PathExpr::parse(path) {
        Ok(expr) => expr.resolve(data),
        Err(error) => {
            tracing::error!(path, %error, "invalid path specification");
            None
        }
    }
}

fn parse_indexed(pair: Pair<'_, Rule>) -> Result<Segment> {
    let mut key = String::new();
    let mut subscript = Subscript::All;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::ident => key = inner.as_str().to_string(),
            Rule::star => subscript = Subscript::All,
            Rule::index => {
                let position = inner
                    .as_str()
                    .parse::<usize>()
                    .with_context(|| format!("invalid array index '{}'", inner.as_str()))?;
                subscript = Subscript::At(position);
            }
            _ => {}
        }
    }

    Ok(Segment::Index { key, subscript })
}

fn resolve_segments(root: &JsonValue, current: &JsonValue, segments: &[Segment]) -> Option<JsonValue> {
    let Some((segment, rest)) = segments.split_first() else {
        return Some(current.clone());
    };

    match segment {
        Segment::Root => resolve_segments(root, root, rest),
        Segment::Key(name) => {
            let Some(map) = current.as_object() else {
                tracing::debug!(
                    key = name.as_str(),
                    found = ?json_type_of(current),
                    "path step expected an object"
                );
                return None;
            };
            match map.get(name) {
                Some(next) => resolve_segments(root, next, rest),
                None => {
                    tracing::debug!(key = name.as_str(), "path step not present");
                    None
                }
            }
        }
        // The wildcard is terminal: any trailing segments are ignored.
        Segment::Wildcard => match current {
            JsonValue::Array(_) => Some(current.clone()),
            JsonValue::Object(map) => {
                let pairs = map
                    .iter()
                    .map(|(key, value)| {
                        let mut entry = JsonMap::new();
                        entry.insert("key".to_string(), JsonValue::String(key.clone()));
                        entry.insert("value".to_string(), value.clone());
                        JsonValue::Object(entry)
                    })
                    .collect();
                Some(JsonValue::Array(pairs))
            }
            _ => {
                tracing::debug!(
                    found = ?json_type_of(current),
                    "wildcard step expected an object or array"
                );
                None
            }
        },
        Segment::Index { key, subscript } => {
            let Some(value) = current.as_object().and_then(|map| map.get(key)) else {
                tracing::debug!(key = key.as_str(), "indexed path step not present");
                return None;
            };
            let Some(entries) = value.as_array() else {
                tracing::debug!(
                    key = key.as_str(),
                    found = ?json_type_of(value),
                    "indexed path step expected an array"
                );
                return None;
            };
            match subscript {
                Subscript::All => resolve_segments(root, value, rest),
                Subscript::At(position) => {
                    let element = entries.get(*position)?;
                    let selected = JsonValue::Array(vec![element.clone()]);
                    if rest.is_empty() {
                        Some(selected)
                    } else {
                        resolve_segments(root, &selected, rest)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_key_lookup() {
        let data = json!({ "a": { "b": [1, 2, 3] } });

        assert_eq!(resolve_path(&data, "$.a.b"), Some(json!([1, 2, 3])));
        assert_eq!(resolve_path(&data, "$.a.b[1]"), Some(json!([2])));
        assert_eq!(resolve_path(&data, "$.a.c"), None);
    }

    #[test]
    fn wildcard_pivots_objects_into_pairs() {
        let data = json!({ "x": 1, "y": 2 });

        assert_eq!(
            resolve_path(&data, "$.*"),
            Some(json!([
                { "key": "x", "value": 1 },
                { "key": "y", "value": 2 }
            ]))
        );
    }

    #[test]
    fn wildcard_returns_arrays_unchanged() {
        let data = json!({ "items": ["a", "b"] });

        assert_eq!(resolve_path(&data, "$.items.*"), Some(json!(["a", "b"])));
        // Terminal: trailing segments after the pivot are ignored.
        assert_eq!(resolve_path(&data, "$.items.*.name"), Some(json!(["a", "b"])));
    }

    #[test]
    fn subscripts_select_single_element_arrays() {
        let data = json!({ "members": [{ "name": "mark" }, { "name": "sally" }] });

        assert_eq!(
            resolve_path(&data, "$.members[*]"),
            Some(json!([{ "name": "mark" }, { "name": "sally" }]))
        );
        assert_eq!(
            resolve_path(&data, "$.members[0]"),
            Some(json!([{ "name": "mark" }]))
        );
        assert_eq!(resolve_path(&data, "$.members[2]"), None);
        assert_eq!(resolve_path(&json!({ "members": [] }), "$.members[0]"), None);
    }

    #[test]
    fn shape_mismatches_resolve_absent() {
        let data = json!({ "scalar": 5, "list": [1, 2] });

        assert_eq!(resolve_path(&data, "$.scalar.inner"), None);
        assert_eq!(resolve_path(&data, "$.scalar[0]"), None);
        assert_eq!(resolve_path(&data, "$.list.inner"), None);
        assert_eq!(resolve_path(&json!(5), "$.anything"), None);
    }

    #[test]
    fn root_reselects_the_document() {
        let data = json!({ "a": { "b": 1 }, "c": 2 });

        assert_eq!(resolve_path(&data, "$.a.$.c"), Some(json!(2)));
        assert_eq!(resolve_path(&data, "c"), Some(json!(2)));
    }

    #[test]
    fn invalid_specifications_resolve_absent() {
        let data = json!({ "a": 1 });

        assert_eq!(resolve_path(&data, ""), None);
        assert_eq!(resolve_path(&data, "   "), None);
        assert_eq!(resolve_path(&data, "a..b"), None);
        assert_eq!(resolve_path(&data, "a[x]"), None);
    }

    #[test]
    fn resolution_is_deterministic() {
        let data = json!({ "a": { "b": [1, { "c": true }] }, "d": null });

        for path in ["$.a.b", "$.a.b[1]", "$.d", "$.*", "$.missing"] {
            assert_eq!(resolve_path(&data, path), resolve_path(&data, path));
        }
    }
}
