//! HTML pages rendered with Tera: the service listing and the Swagger UI viewer.

use serde::Serialize;
use tera::{Context, Tera};
use webswags_core::naming::format_service_name;
use webswags_core::{Discovery, Format, SpecDocument};

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const SERVICE_TEMPLATE: &str = include_str!("../templates/service.html");

/// Badge colours per format
const COLOR_JSON: &str = "#f39c12";
const COLOR_YAML: &str = "#27ae60";

/// One card on the listing page
#[derive(Debug, Serialize)]
struct ServiceCard<'a> {
    name: &'a str,
    service: &'a str,
    version: &'a str,
    description: &'a str,
    kind: String,
    format: Format,
    format_color: &'static str,
    file_name: &'a str,
}

impl<'a> From<&'a SpecDocument> for ServiceCard<'a> {
    fn from(spec: &'a SpecDocument) -> Self {
        Self {
            name: &spec.name,
            service: &spec.service,
            version: spec.version(),
            description: spec.description(),
            kind: format!("{} ({})", spec.schema_kind(), spec.version_string()),
            format: spec.format,
            format_color: format_color(spec.format),
            file_name: &spec.file_name,
        }
    }
}

/// Compiled page templates
pub struct Pages {
    tera: Tera,
}

impl Pages {
    pub fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("index.html", INDEX_TEMPLATE),
            ("service.html", SERVICE_TEMPLATE),
        ])?;
        Ok(Self { tera })
    }

    /// Listing of every discovered service
    pub fn index(&self, discovery: &Discovery) -> tera::Result<String> {
        let services: Vec<ServiceCard<'_>> =
            discovery.specs().iter().map(ServiceCard::from).collect();
        let mut context = Context::new();
        context.insert("total_services", &services.len());
        context.insert("empty", &services.is_empty());
        context.insert("services", &services);
        self.tera.render("index.html", &context)
    }

    /// Swagger UI page for one service.
    ///
    /// Unknown services still render, pointing at the YAML endpoint, so the
    /// viewer reports the missing document itself.
    pub fn service(
        &self,
        discovery: &Discovery,
        service: &str,
        swagger_ui_version: &str,
    ) -> tera::Result<String> {
        let spec = discovery.find_service(service);
        let format = spec.map(|s| s.format).unwrap_or(Format::Yaml);
        let title = spec
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format_service_name(service));

        let mut context = Context::new();
        context.insert("service_title", &title);
        context.insert("swagger_ui_version", swagger_ui_version);
        context.insert("format", &format);
        context.insert("format_color", format_color(format));
        context.insert("spec_url", &spec_url(service, format));
        self.tera.render("service.html", &context)
    }
}

/// Raw document endpoint for a service
pub fn spec_url(service: &str, format: Format) -> String {
    format!(
        "/api/specs/{}/swagger.{}",
        encode_path_segment(service),
        format.extension()
    )
}

fn format_color(format: Format) -> &'static str {
    match format {
        Format::Json => COLOR_JSON,
        Format::Yaml => COLOR_YAML,
    }
}

/// Percent-encode a single path segment
fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
