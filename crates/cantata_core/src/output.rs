//! The output map filled in by generation and mapping directives.

use crate::{OutputPath, PathSegment};
use cantata_error::{CantataError, CantataResult, OutputError, OutputErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Named outputs collected during a run.
///
/// Always a JSON object at the root. Writes create missing intermediate
/// objects and arrays on the way to the leaf.
///
/// # Examples
///
/// ```
/// use cantata_core::{OutputMap, OutputPath};
/// use serde_json::json;
///
/// let mut outputs = OutputMap::new();
/// outputs.set(&"plan.steps[]".parse().unwrap(), json!("outline")).unwrap();
/// outputs.set(&"plan.steps[]".parse().unwrap(), json!("draft")).unwrap();
///
/// assert_eq!(outputs.as_value(), &json!({"plan": {"steps": ["outline", "draft"]}}));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "JsonValue", into = "JsonValue")]
pub struct OutputMap {
    root: JsonValue,
}

impl Default for OutputMap {
    fn default() -> Self {
        Self {
            root: JsonValue::Object(Map::new()),
        }
    }
}

impl OutputMap {
    /// Creates an empty output map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.root.as_object().is_none_or(Map::is_empty)
    }

    /// The whole map as a JSON value.
    pub fn as_value(&self) -> &JsonValue {
        &self.root
    }

    /// Consumes the map, returning the JSON object.
    pub fn into_value(self) -> JsonValue {
        self.root
    }

    /// Reads the value at `path`.
    ///
    /// Returns `Ok(None)` when any segment is absent or crosses a value of the
    /// wrong type.
    ///
    /// # Errors
    ///
    /// Returns `OutputErrorKind::AppendNotReadable` if the path contains `[]`.
    pub fn get(&self, path: &OutputPath) -> CantataResult<Option<&JsonValue>> {
        lookup(&self.root, path)
    }

    /// Reads the array at `path`.
    ///
    /// # Errors
    ///
    /// Returns `OutputErrorKind::NotAnArray` when a non-array value is stored there.
    pub fn array(&self, path: &OutputPath) -> CantataResult<Option<&Vec<JsonValue>>> {
        match self.get(path)? {
            None => Ok(None),
            Some(JsonValue::Array(items)) => Ok(Some(items)),
            Some(other) => Err(not_an_array(path, other)),
        }
    }

    /// Writes `value` at `path`, creating intermediates as needed.
    ///
    /// `Index(n)` replaces when `n < len` and appends when `n == len`;
    /// `Append` always pushes.
    ///
    /// # Errors
    ///
    /// - `IndexOutOfRange` when an index skips past the end of an array
    /// - `NotAContainer` when an intermediate value is a scalar
    /// - `NotAContainer` when replacing the root with a non-object
    pub fn set(&mut self, path: &OutputPath, value: JsonValue) -> CantataResult<()> {
        if path.is_root() {
            if !value.is_object() {
                return Err(OutputError::new(OutputErrorKind::NotAContainer {
                    path: String::new(),
                    found: json_type(&value).to_string(),
                    segment: "<root>".to_string(),
                })
                .into());
            }
            self.root = value;
            return Ok(());
        }

        let mut current = &mut self.root;
        for (depth, segment) in path.segments().iter().enumerate() {
            current = slot(current, segment, path, depth)?;
        }
        *current = value;
        Ok(())
    }

    /// Appends `text` to the string stored at `path`.
    ///
    /// Grows the leaf in place, so a value streamed in many pieces costs no
    /// more than writing it once.
    ///
    /// # Errors
    ///
    /// - `MissingValue` when nothing is stored at `path`
    /// - `NotAContainer` when the stored value is not a string
    /// - `AppendNotReadable` when `path` contains `[]`
    pub fn append_text(&mut self, path: &OutputPath, text: &str) -> CantataResult<()> {
        let mut current = &mut self.root;
        for segment in path.segments() {
            let next = match segment {
                PathSegment::Key(key) => current.as_object_mut().and_then(|map| map.get_mut(key)),
                PathSegment::Index(index) => {
                    current.as_array_mut().and_then(|items| items.get_mut(*index))
                }
                PathSegment::Append => {
                    return Err(OutputError::new(OutputErrorKind::AppendNotReadable(
                        path.to_string(),
                    ))
                    .into());
                }
            };
            current = next.ok_or_else(|| {
                CantataError::from(OutputError::new(OutputErrorKind::MissingValue(
                    path.to_string(),
                )))
            })?;
        }
        match current {
            JsonValue::String(existing) => {
                existing.push_str(text);
                Ok(())
            }
            other => Err(OutputError::new(OutputErrorKind::NotAContainer {
                path: path.to_string(),
                found: json_type(other).to_string(),
                segment: "<text>".to_string(),
            })
            .into()),
        }
    }

    /// Replaces each append segment in `path` with the index it would push to.
    ///
    /// Repeated writes to the returned path land on the same element, which
    /// lets a value be refined in place after its first write.
    pub fn resolve_appends(&self, path: &OutputPath) -> OutputPath {
        let mut current = Some(&self.root);
        let mut resolved = OutputPath::root();
        for segment in path.segments() {
            resolved = match segment {
                PathSegment::Key(key) => {
                    current = current.and_then(|v| v.as_object()).and_then(|m| m.get(key));
                    resolved.key(key.clone())
                }
                PathSegment::Index(index) => {
                    current = current.and_then(|v| v.as_array()).and_then(|a| a.get(*index));
                    resolved.index(*index)
                }
                PathSegment::Append => {
                    let len = current.and_then(|v| v.as_array()).map_or(0, Vec::len);
                    current = None;
                    resolved.index(len)
                }
            };
        }
        resolved
    }

    /// Makes sure an array lives at `path`, initialising it to `[]` if absent.
    ///
    /// # Errors
    ///
    /// Returns `OutputErrorKind::NotAnArray` when a non-array value is stored there.
    pub fn ensure_array(&mut self, path: &OutputPath) -> CantataResult<()> {
        match self.get(path)? {
            Some(JsonValue::Array(_)) => Ok(()),
            Some(other) => Err(not_an_array(path, other)),
            None => self.set(path, JsonValue::Array(Vec::new())),
        }
    }
}

impl TryFrom<JsonValue> for OutputMap {
    type Error = CantataError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        let mut outputs = Self::new();
        outputs.set(&OutputPath::root(), value)?;
        Ok(outputs)
    }
}

impl From<OutputMap> for JsonValue {
    fn from(outputs: OutputMap) -> Self {
        outputs.root
    }
}

/// Reads the value at `path` inside any JSON value.
///
/// Same addressing rules as [`OutputMap::get`]; used for caller parameters.
///
/// # Errors
///
/// Returns `OutputErrorKind::AppendNotReadable` if the path contains `[]`.
pub fn lookup<'a>(root: &'a JsonValue, path: &OutputPath) -> CantataResult<Option<&'a JsonValue>> {
    let mut current = root;
    for segment in path.segments() {
        let next = match segment {
            PathSegment::Key(key) => current.as_object().and_then(|map| map.get(key)),
            PathSegment::Index(index) => current.as_array().and_then(|items| items.get(*index)),
            PathSegment::Append => {
                return Err(
                    OutputError::new(OutputErrorKind::AppendNotReadable(path.to_string())).into(),
                );
            }
        };
        match next {
            Some(value) => current = value,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

/// Text used when a JSON value lands in the transcript.
///
/// Strings are used verbatim; everything else is serialised as JSON.
pub fn value_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Name of a JSON value's type for error messages.
pub fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn not_an_array(path: &OutputPath, found: &JsonValue) -> CantataError {
    OutputError::new(OutputErrorKind::NotAnArray {
        path: path.to_string(),
        found: json_type(found).to_string(),
    })
    .into()
}

fn not_a_container(
    path: &OutputPath,
    depth: usize,
    found: &JsonValue,
    segment: &PathSegment,
) -> CantataError {
    OutputError::new(OutputErrorKind::NotAContainer {
        path: path.prefix(depth).to_string(),
        found: json_type(found).to_string(),
        segment: segment.to_string(),
    })
    .into()
}

/// Walks one segment down for writing, creating the container if `current` is null.
fn slot<'v>(
    current: &'v mut JsonValue,
    segment: &PathSegment,
    path: &OutputPath,
    depth: usize,
) -> CantataResult<&'v mut JsonValue> {
    match segment {
        PathSegment::Key(key) => {
            if current.is_null() {
                *current = JsonValue::Object(Map::new());
            }
            match current {
                JsonValue::Object(map) => Ok(map.entry(key.clone()).or_insert(JsonValue::Null)),
                other => Err(not_a_container(path, depth, other, segment)),
            }
        }
        PathSegment::Index(index) => {
            if current.is_null() {
                *current = JsonValue::Array(Vec::new());
            }
            match current {
                JsonValue::Array(items) => {
                    let len = items.len();
                    if *index > len {
                        return Err(OutputError::new(OutputErrorKind::IndexOutOfRange {
                            path: path.prefix(depth).to_string(),
                            index: *index,
                            len,
                        })
                        .into());
                    }
                    if *index == len {
                        items.push(JsonValue::Null);
                    }
                    Ok(&mut items[*index])
                }
                other => Err(not_a_container(path, depth, other, segment)),
            }
        }
        PathSegment::Append => {
            if current.is_null() {
                *current = JsonValue::Array(Vec::new());
            }
            match current {
                JsonValue::Array(items) => {
                    items.push(JsonValue::Null);
                    let last = items.len() - 1;
                    Ok(&mut items[last])
                }
                other => Err(not_a_container(path, depth, other, segment)),
            }
        }
    }
}
