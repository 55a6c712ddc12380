//! Canonical OpenAPI 3.x and Swagger 2.0 document structures.
//!
//! Both structures are deliberately lenient: only the version marker and the
//! `info` block are interpreted, every other top-level section is kept as an
//! opaque JSON value and unknown keys (vendor extensions included) are
//! retained in `extensions`. Structural validation of paths, schemas and the
//! like is out of scope.

// Internal imports (std, crate)
use std::fmt;

use crate::format::looks_like_json;

// External imports (alphabetized)
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use serde_value::Value as SerdeValue;
use serde_yaml::Value as YamlValue;

/// A JSON object as found in spec sections such as `paths` or `definitions`
pub type JsonObject = JsonMap<String, JsonValue>;

/// The `info` block shared by both schema families.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoObject {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub version: String,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "String::is_empty")]
    pub terms_of_service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<LicenseObject>,
    /// Specification extensions (fields starting with `x-`).
    #[serde(flatten)]
    pub extensions: JsonObject,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ContactObject {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "String::is_empty")]
    pub email: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LicenseObject {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "String::is_empty")]
    pub url: String,
}

/// Top-level OpenAPI 3.0/3.1 document
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenApi3Document {
    /// Version marker, e.g. "3.0.3" or "3.1.0". Empty when the key is absent.
    #[serde(default, deserialize_with = "lenient_text")]
    pub openapi: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<InfoObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<JsonValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<JsonValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<JsonValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<JsonObject>,
    /// 3.1 only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_schema_dialect: Option<String>,
    /// 3.1 only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhooks: Option<JsonObject>,
    /// Specification extensions and any other top-level keys.
    #[serde(flatten)]
    pub extensions: JsonObject,
}

impl OpenApi3Document {
    /// Trimmed version marker
    pub fn version_marker(&self) -> &str {
        self.openapi.trim()
    }

    /// Convert into a strictly typed [`openapiv3::OpenAPI`] document.
    ///
    /// Discovery never depends on this succeeding: documents missing required
    /// fields (a server without a `url`, say) are still discovered but fail here.
    pub fn typed(&self) -> crate::Result<openapiv3::OpenAPI> {
        let value = serde_json::to_value(self)?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Top-level Swagger 2.0 document
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swagger2Document {
    /// Version marker, normally "2.0". Empty when the key is absent.
    #[serde(default, deserialize_with = "lenient_text")]
    pub swagger: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<InfoObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schemes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produces: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_definitions: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<JsonValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<JsonValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<JsonObject>,
    /// Specification extensions and any other top-level keys.
    #[serde(flatten)]
    pub extensions: JsonObject,
}

impl Swagger2Document {
    /// Trimmed version marker
    pub fn version_marker(&self) -> &str {
        self.swagger.trim()
    }
}

/// Decode raw bytes into a JSON value tree.
///
/// Content that looks like JSON is tried as JSON first. Everything else,
/// including YAML flow mappings such as `{openapi: 3.0.0}`, goes through
/// YAML and is converted to JSON, stringifying non-string mapping keys
/// (YAML specs routinely use bare `200:` response codes).
pub fn decode_document(content: &[u8]) -> crate::Result<JsonValue> {
    if looks_like_json(content) {
        if let Ok(value) = serde_json::from_slice(content) {
            return Ok(value);
        }
    }
    let yaml: YamlValue = serde_yaml::from_slice(content)?;
    yaml_to_json(yaml)
}

/// Convert a YAML value tree into JSON
pub fn yaml_to_json(value: YamlValue) -> crate::Result<JsonValue> {
    Ok(match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(b),
        YamlValue::Number(n) => {
            if let Some(u) = n.as_u64() {
                JsonValue::from(u)
            } else if let Some(i) = n.as_i64() {
                JsonValue::from(i)
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                serde_json::Number::from_f64(f)
                    .map(JsonValue::Number)
                    .ok_or_else(|| crate::Error::config(format!("non-finite number {n} in YAML")))?
            }
        }
        YamlValue::String(s) => JsonValue::String(s),
        YamlValue::Sequence(seq) => JsonValue::Array(
            seq.into_iter()
                .map(yaml_to_json)
                .collect::<crate::Result<Vec<_>>>()?,
        ),
        YamlValue::Mapping(mapping) => {
            let mut object = JsonObject::new();
            for (key, value) in mapping {
                object.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            JsonValue::Object(object)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_key(key: YamlValue) -> crate::Result<String> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        YamlValue::Tagged(tagged) => yaml_key(tagged.value),
        other => Err(crate::Error::config(format!(
            "unsupported YAML mapping key: {other:?}"
        ))),
    }
}

/// Deserialize a scalar as text, accepting bare numbers and booleans.
///
/// `swagger: 2.0` and `version: 1.0` are unquoted floats in YAML; they are
/// kept as "2.0" and "1.0". Null becomes the empty string.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = SerdeValue::deserialize(deserializer)?;
    scalar_text(&value).ok_or_else(|| serde::de::Error::custom("expected a string or number"))
}

fn scalar_text(value: &SerdeValue) -> Option<String> {
    fn display<T: fmt::Display>(v: T) -> Option<String> {
        Some(v.to_string())
    }
    match value {
        SerdeValue::String(s) => Some(s.clone()),
        SerdeValue::Char(c) => display(c),
        SerdeValue::Bool(b) => display(b),
        SerdeValue::U8(n) => display(n),
        SerdeValue::U16(n) => display(n),
        SerdeValue::U32(n) => display(n),
        SerdeValue::U64(n) => display(n),
        SerdeValue::I8(n) => display(n),
        SerdeValue::I16(n) => display(n),
        SerdeValue::I32(n) => display(n),
        SerdeValue::I64(n) => display(n),
        // Debug keeps the fractional part: 2.0 stays "2.0"
        SerdeValue::F32(n) => Some(format!("{n:?}")),
        SerdeValue::F64(n) => Some(format!("{n:?}")),
        SerdeValue::Unit | SerdeValue::Option(None) => Some(String::new()),
        SerdeValue::Option(Some(inner)) | SerdeValue::Newtype(inner) => scalar_text(inner),
        _ => None,
    }
}
