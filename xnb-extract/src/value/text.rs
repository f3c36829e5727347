//! Tagged text codec
//!
//! Values map onto JSON as follows:
//!
//! | Value          | Text                                  |
//! |----------------|---------------------------------------|
//! | `Null`         | `null`                                |
//! | `Bool`         | `true` / `false`                      |
//! | `Int`          | integer literal                       |
//! | `Float`        | number with a fraction or exponent    |
//! | `Text`         | string                                |
//! | `Bytes`        | `{"$bytes": "<lowercase hex>"}`       |
//! | `Array`        | array                                 |
//! | `Map`          | object, keys in insertion order       |
//! | `Tagged`       | `{"type": "<tag>", "data": <payload>}`|
//!
//! An object is read back as a tagged composite iff its keys are exactly
//! `type` and `data` and `type` holds a string. A `Map` whose object would
//! match the tagged, byte-blob or escape shape is written wrapped as
//! `{"$map": {...}}` and read back as the plain map inside. Non-finite floats
//! have no JSON spelling and are written as `null`.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Number};

use super::{Fields, TypeTag, Value};
use crate::error::{Result, XnbError};

/// Key holding the type name of a tagged composite
pub const TAG_KEY: &str = "type";

/// Key holding the payload of a tagged composite
pub const PAYLOAD_KEY: &str = "data";

/// Sole key of an object that spells a byte blob
pub const BYTES_KEY: &str = "$bytes";

/// Sole key of an object wrapping a plain map that would otherwise be
/// mistaken for one of the special shapes
pub const ESCAPED_MAP_KEY: &str = "$map";

/// Indentation used when none is configured
pub const DEFAULT_INDENT: usize = 4;

/// Serialize `value` as indented text.
///
/// An indent of zero produces compact single-line text.
pub fn stringify(value: &Value, indent: usize) -> Result<String> {
    write_json(&to_json(value), indent)
}

/// Parse text produced by [`stringify`]
pub fn parse(text: &str) -> Result<Value> {
    from_json(serde_json::from_str(text)?)
}

/// Pretty-print any serializable value with the given indent width
pub(crate) fn write_json<T: Serialize>(value: &T, indent: usize) -> Result<String> {
    if indent == 0 {
        return Ok(serde_json::to_string(value)?);
    }
    let indent = " ".repeat(indent);
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    String::from_utf8(out).map_err(|e| XnbError::InvalidText(e.to_string()))
}

/// Whether a JSON object has the tagged-composite shape
pub fn is_tagged_object(object: &Map<String, serde_json::Value>) -> bool {
    object.len() == 2
        && object.get(TAG_KEY).is_some_and(serde_json::Value::is_string)
        && object.contains_key(PAYLOAD_KEY)
}

fn is_bytes_object(object: &Map<String, serde_json::Value>) -> bool {
    object.len() == 1 && object.get(BYTES_KEY).is_some_and(serde_json::Value::is_string)
}

fn is_escaped_map(object: &Map<String, serde_json::Value>) -> bool {
    object.len() == 1
        && object
            .get(ESCAPED_MAP_KEY)
            .is_some_and(serde_json::Value::is_object)
}

/// Whether reading `object` back would not yield a plain map
fn has_special_shape(object: &Map<String, serde_json::Value>) -> bool {
    is_tagged_object(object) || is_bytes_object(object) || is_escaped_map(object)
}

pub fn to_json(value: &Value) -> serde_json::Value {
    use serde_json::Value as Json;

    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(n) => Json::Number((*n).into()),
        Value::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
        Value::Text(s) => Json::String(s.clone()),
        Value::Bytes(bytes) => {
            let mut object = Map::new();
            object.insert(BYTES_KEY.to_string(), Json::String(hex::encode(bytes)));
            Json::Object(object)
        }
        Value::Array(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::Map(fields) => {
            let object: Map<String, Json> = fields
                .iter()
                .map(|(k, v)| (k.to_string(), to_json(v)))
                .collect();
            if has_special_shape(&object) {
                let mut wrapper = Map::new();
                wrapper.insert(ESCAPED_MAP_KEY.to_string(), Json::Object(object));
                Json::Object(wrapper)
            } else {
                Json::Object(object)
            }
        }
        Value::Tagged { tag, payload } => {
            let mut object = Map::new();
            object.insert(TAG_KEY.to_string(), Json::String(tag.as_str().to_string()));
            object.insert(PAYLOAD_KEY.to_string(), to_json(payload));
            Json::Object(object)
        }
    }
}

pub fn from_json(json: serde_json::Value) -> Result<Value> {
    use serde_json::Value as Json;

    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => number(&n)?,
        Json::String(s) => Value::Text(s),
        Json::Array(items) => Value::Array(
            items
                .into_iter()
                .map(from_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        Json::Object(object) => from_object(object)?,
    })
}

fn from_object(mut object: Map<String, serde_json::Value>) -> Result<Value> {
    use serde_json::Value as Json;

    if is_tagged_object(&object)
        && let (Some(Json::String(tag)), Some(payload)) =
            (object.remove(TAG_KEY), object.remove(PAYLOAD_KEY))
    {
        return Ok(Value::Tagged {
            tag: TypeTag::from(tag),
            payload: Box::new(from_json(payload)?),
        });
    }

    if is_bytes_object(&object) {
        let hex_text = object
            .get(BYTES_KEY)
            .and_then(Json::as_str)
            .unwrap_or_default();
        let bytes = hex::decode(hex_text)
            .map_err(|e| XnbError::InvalidText(format!("bad {BYTES_KEY} blob: {e}")))?;
        return Ok(Value::Bytes(bytes));
    }

    if is_escaped_map(&object)
        && let Some(Json::Object(inner)) = object.remove(ESCAPED_MAP_KEY)
    {
        return plain_map(inner);
    }

    plain_map(object)
}

fn plain_map(object: Map<String, serde_json::Value>) -> Result<Value> {
    let fields = object
        .into_iter()
        .map(|(k, v)| Ok::<_, XnbError>((k, from_json(v)?)))
        .collect::<Result<Fields>>()?;
    Ok(Value::Map(fields))
}

fn number(n: &Number) -> Result<Value> {
    if let Some(i) = n.as_i64() {
        Ok(Value::Int(i))
    } else if n.is_u64() {
        Err(XnbError::InvalidText(format!("integer {n} out of range")))
    } else {
        Ok(Value::Float(n.as_f64().unwrap_or(f64::NAN)))
    }
}
