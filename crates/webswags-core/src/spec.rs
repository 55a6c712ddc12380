//! The unified, version-agnostic record for a discovered spec file.
//!
//! A [`SpecDocument`] is built once from the raw bytes of a file by trying
//! OpenAPI 3.x first and Swagger 2.0 second. Whichever family matches is
//! projected into a trimmed [`Info`] plus a version-specific [`SpecView`]
//! whose sections are carried as opaque JSON.
//!
//! # Examples
//!
//! ```
//! use webswags_core::{Format, SchemaKind, SpecDocument};
//!
//! let raw = br#"{"openapi": "3.0.3", "info": {"title": "Orders"}}"#.to_vec();
//! let spec = SpecDocument::from_bytes("services/orders/openapi.json", raw).unwrap();
//! assert_eq!(spec.format, Format::Json);
//! assert_eq!(spec.schema_kind(), SchemaKind::OpenApi3);
//! assert_eq!(spec.name, "Orders");
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::format::Format;
use crate::naming::derive_name;
use crate::schema::{
    decode_document, ContactObject, InfoObject, LicenseObject, OpenApi3Document,
    Swagger2Document,
};
use crate::Error;

// External imports (alphabetized)
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value as JsonValue;

/// Which schema family a document belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SchemaKind {
    #[serde(rename = "openapi3")]
    OpenApi3,
    #[serde(rename = "swagger2")]
    Swagger2,
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenApi3 => f.pad("OpenAPI 3"),
            Self::Swagger2 => f.pad("Swagger 2"),
        }
    }
}

/// API metadata projected from a document's `info` block.
///
/// Every string is trimmed. Contact and license are only present when the
/// document declares them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub terms_of_service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct License {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
}

impl From<&InfoObject> for Info {
    fn from(info: &InfoObject) -> Self {
        Self {
            title: info.title.trim().to_string(),
            version: info.version.trim().to_string(),
            description: info.description.trim().to_string(),
            terms_of_service: info.terms_of_service.trim().to_string(),
            contact: info.contact.as_ref().map(Contact::from),
            license: info.license.as_ref().map(License::from),
        }
    }
}

impl From<&ContactObject> for Contact {
    fn from(contact: &ContactObject) -> Self {
        Self {
            name: contact.name.trim().to_string(),
            url: contact.url.trim().to_string(),
            email: contact.email.trim().to_string(),
        }
    }
}

impl From<&LicenseObject> for License {
    fn from(license: &LicenseObject) -> Self {
        Self {
            name: license.name.trim().to_string(),
            url: license.url.trim().to_string(),
        }
    }
}

/// Top-level OpenAPI 3.x sections, kept opaque
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenApi3View {
    pub openapi: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_schema_dialect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhooks: Option<JsonValue>,
}

impl From<&OpenApi3Document> for OpenApi3View {
    fn from(doc: &OpenApi3Document) -> Self {
        Self {
            openapi: doc.version_marker().to_string(),
            servers: section(&doc.servers),
            paths: section(&doc.paths),
            components: section(&doc.components),
            security: section(&doc.security),
            tags: section(&doc.tags),
            external_docs: section(&doc.external_docs),
            json_schema_dialect: doc
                .json_schema_dialect
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from),
            webhooks: section(&doc.webhooks),
        }
    }
}

/// Top-level Swagger 2.0 sections, kept opaque
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Swagger2View {
    pub swagger: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_definitions: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<JsonValue>,
}

impl From<&Swagger2Document> for Swagger2View {
    fn from(doc: &Swagger2Document) -> Self {
        Self {
            swagger: doc.version_marker().to_string(),
            host: doc.host.clone().filter(|h| !h.is_empty()),
            base_path: doc.base_path.clone().filter(|b| !b.is_empty()),
            schemes: doc.schemes.clone().unwrap_or_default(),
            consumes: doc.consumes.clone().unwrap_or_default(),
            produces: doc.produces.clone().unwrap_or_default(),
            paths: section(&doc.paths),
            definitions: section(&doc.definitions),
            parameters: section(&doc.parameters),
            responses: section(&doc.responses),
            security_definitions: section(&doc.security_definitions),
            security: section(&doc.security),
            tags: section(&doc.tags),
            external_docs: section(&doc.external_docs),
        }
    }
}

/// The version-specific part of a record. Exactly one family is populated.
#[derive(Clone, Debug)]
pub enum SpecView {
    OpenApi3 {
        view: OpenApi3View,
        document: Box<OpenApi3Document>,
    },
    Swagger2 {
        view: Swagger2View,
        document: Box<Swagger2Document>,
    },
}

impl SpecView {
    /// Try OpenAPI 3.x, then Swagger 2.0.
    ///
    /// A family matches when the value deserializes into its structure and
    /// the trimmed version marker is non-empty. An OpenAPI 3.x match
    /// short-circuits, so a document carrying both markers is OpenAPI 3.x.
    pub fn from_value(value: &JsonValue) -> Option<Self> {
        if let Ok(document) = OpenApi3Document::deserialize(value) {
            if !document.version_marker().is_empty() {
                return Some(Self::OpenApi3 {
                    view: OpenApi3View::from(&document),
                    document: Box::new(document),
                });
            }
        }

        let document = Swagger2Document::deserialize(value).ok()?;
        if document.version_marker().is_empty() {
            return None;
        }
        Some(Self::Swagger2 {
            view: Swagger2View::from(&document),
            document: Box::new(document),
        })
    }

    pub fn kind(&self) -> SchemaKind {
        match self {
            Self::OpenApi3 { .. } => SchemaKind::OpenApi3,
            Self::Swagger2 { .. } => SchemaKind::Swagger2,
        }
    }

    /// Trimmed version marker ("3.0.3", "2.0", ...)
    pub fn version_marker(&self) -> &str {
        match self {
            Self::OpenApi3 { view, .. } => &view.openapi,
            Self::Swagger2 { view, .. } => &view.swagger,
        }
    }

    fn info_object(&self) -> Option<&InfoObject> {
        match self {
            Self::OpenApi3 { document, .. } => document.info.as_ref(),
            Self::Swagger2 { document, .. } => document.info.as_ref(),
        }
    }
}

/// A successfully parsed spec file
#[derive(Clone, Debug)]
pub struct SpecDocument {
    /// Path the file was discovered at
    pub path: PathBuf,
    /// Final path component
    pub file_name: String,
    pub format: Format,
    /// Original file content, kept verbatim for re-serving
    pub raw: Vec<u8>,
    pub info: Info,
    /// Display name derived from the title or the path
    pub name: String,
    /// Lookup key for the HTTP layer; currently always equal to `name`
    pub service: String,
    pub view: SpecView,
}

impl SpecDocument {
    /// Read and parse a spec file from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read(path)?;
        Self::from_bytes(path, raw)
    }

    /// Parse already-read file content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotASpecDocument`] when the content is not valid
    /// YAML/JSON or matches neither OpenAPI 3.x nor Swagger 2.0.
    pub fn from_bytes<P: AsRef<Path>>(path: P, raw: Vec<u8>) -> crate::Result<Self> {
        let path = path.as_ref();
        let value = decode_document(&raw).map_err(|_| Error::not_a_spec(path))?;
        let view = SpecView::from_value(&value).ok_or_else(|| Error::not_a_spec(path))?;

        let info = view.info_object().map(Info::from).unwrap_or_default();
        let name = derive_name(&info.title, path);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            format: Format::detect(path, &raw),
            raw,
            info,
            service: name.clone(),
            name,
            view,
        })
    }

    pub fn schema_kind(&self) -> SchemaKind {
        self.view.kind()
    }

    /// Trimmed version marker of the document
    pub fn version_string(&self) -> &str {
        self.view.version_marker()
    }

    pub fn title(&self) -> &str {
        &self.info.title
    }

    pub fn version(&self) -> &str {
        &self.info.version
    }

    pub fn description(&self) -> &str {
        &self.info.description
    }

    pub fn openapi_document(&self) -> Option<&OpenApi3Document> {
        match &self.view {
            SpecView::OpenApi3 { document, .. } => Some(document),
            SpecView::Swagger2 { .. } => None,
        }
    }

    pub fn swagger_document(&self) -> Option<&Swagger2Document> {
        match &self.view {
            SpecView::Swagger2 { document, .. } => Some(document),
            SpecView::OpenApi3 { .. } => None,
        }
    }
}

/// Borrowed view section, inlined into the listing record
#[derive(Serialize)]
#[serde(untagged)]
enum ViewRef<'a> {
    OpenApi3(&'a OpenApi3View),
    Swagger2(&'a Swagger2View),
}

/// Listing shape of a record: the view inlined, followed by the summary fields
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Listing<'a> {
    #[serde(flatten)]
    view: ViewRef<'a>,
    info: &'a Info,
    name: &'a str,
    title: &'a str,
    version: &'a str,
    description: &'a str,
    path: String,
    service: &'a str,
    format: Format,
    file_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    openapi_version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    swagger_version: Option<&'a str>,
}

impl Serialize for SpecDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (view, openapi_version, swagger_version) = match &self.view {
            SpecView::OpenApi3 { view, .. } => {
                (ViewRef::OpenApi3(view), Some(view.openapi.as_str()), None)
            }
            SpecView::Swagger2 { view, .. } => {
                (ViewRef::Swagger2(view), None, Some(view.swagger.as_str()))
            }
        };
        Listing {
            view,
            info: &self.info,
            name: &self.name,
            title: &self.info.title,
            version: &self.info.version,
            description: &self.info.description,
            path: self.path.to_string_lossy().into_owned(),
            service: &self.service,
            format: self.format,
            file_name: &self.file_name,
            openapi_version,
            swagger_version,
        }
        .serialize(serializer)
    }
}

/// Re-serialize a section to an opaque value; absent or null sections are dropped
fn section<T: Serialize>(value: &Option<T>) -> Option<JsonValue> {
    let value = serde_json::to_value(value.as_ref()?).ok()?;
    (!value.is_null()).then_some(value)
}
