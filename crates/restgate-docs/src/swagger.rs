//! Swagger 1.2 document types.
//!
//! A [`ResourceListing`] enumerates every service; an [`ApiDeclaration`]
//! describes one service's paths and operations.
//!
//! <https://github.com/OAI/OpenAPI-Specification/blob/main/versions/1.2.md>

use restgate_core::{ServiceEntry, Verb};
use serde::{Deserialize, Serialize};

use crate::error::DocsResult;

/// Swagger version emitted by this crate.
pub const SWAGGER_VERSION: &str = "1.2";

/// The root document listing all services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceListing {
    /// Version of the described API.
    pub api_version: String,
    /// Always [`SWAGGER_VERSION`].
    pub swagger_version: String,
    /// Base URL of the REST API.
    pub base_path: String,
    /// One summary per service.
    pub apis: Vec<ResourceSummary>,
}

/// One service in a [`ResourceListing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSummary {
    /// Path relative to the base path, e.g. `/db`.
    pub path: String,
    /// Display name of the service.
    pub description: String,
}

impl From<&ServiceEntry> for ResourceSummary {
    fn from(entry: &ServiceEntry) -> Self {
        Self {
            path: format!("/{}", entry.api_name),
            description: entry.name.clone(),
        }
    }
}

/// Description of a single service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDeclaration {
    /// Version of the described API.
    pub api_version: String,
    /// Always [`SWAGGER_VERSION`].
    pub swagger_version: String,
    /// Base URL of the REST API.
    pub base_path: String,
    /// `/{service}`.
    pub resource_path: String,
    /// Paths within the service.
    pub apis: Vec<Api>,
}

/// One path within an [`ApiDeclaration`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Api {
    /// Path template, e.g. `/db/{resource}`.
    pub path: String,
    /// What the path addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Operations available on the path.
    pub operations: Vec<Operation>,
}

/// One verb on an [`Api`] path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// The verb.
    pub method: Verb,
    /// Short summary.
    pub summary: String,
    /// Unique operation name.
    pub nickname: String,
    /// Response model type.
    #[serde(rename = "type")]
    pub response_type: String,
    /// Accepted parameters.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Documented non-success responses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub response_messages: Vec<ResponseMessage>,
}

/// An operation parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// What the parameter does.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Where the parameter is sent.
    pub param_type: ParamType,
    /// Data type.
    #[serde(rename = "type")]
    pub data_type: String,
    /// Whether the parameter must be present.
    #[serde(default)]
    pub required: bool,
}

/// Location of a [`Parameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Path segment.
    Path,
    /// Query string.
    Query,
    /// Request body.
    Body,
    /// Request header.
    Header,
}

/// A documented response status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMessage {
    /// HTTP status code.
    pub code: u16,
    /// Meaning of the status for this operation.
    pub message: String,
}

impl Parameter {
    fn new(name: &str, param_type: ParamType, data_type: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            param_type,
            data_type: data_type.to_string(),
            required,
        }
    }

    #[must_use]
    fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

impl ApiDeclaration {
    /// Parses a declaration from JSON.
    pub fn from_json(json: &str) -> DocsResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Generates the declaration for a service that registered none: every
    /// verb on the service root and on `/{resource}` below it.
    #[must_use]
    pub fn generated(entry: &ServiceEntry, api_version: &str, base_path: &str) -> Self {
        let service = &entry.api_name;
        let root = Api {
            path: format!("/{service}"),
            description: Some(format!("Operations on the {} service root", entry.name)),
            operations: vec![generated_operation(service, Verb::Get, false)],
        };
        let resource = Api {
            path: format!("/{service}/{{resource}}"),
            description: Some(format!("Operations on {} resources", entry.name)),
            operations: Verb::ALL
                .iter()
                .map(|verb| generated_operation(service, *verb, true))
                .collect(),
        };

        Self {
            api_version: api_version.to_string(),
            swagger_version: SWAGGER_VERSION.to_string(),
            base_path: base_path.to_string(),
            resource_path: format!("/{service}"),
            apis: vec![root, resource],
        }
    }
}

fn generated_operation(service: &str, verb: Verb, with_resource: bool) -> Operation {
    let mut parameters = vec![Parameter::new("app_name", ParamType::Query, "string", false)
        .describe("Calling application, if no application header is sent")];
    if with_resource {
        parameters.insert(
            0,
            Parameter::new("resource", ParamType::Path, "string", true)
                .describe("Resource path within the service"),
        );
    }
    if matches!(verb, Verb::Post | Verb::Put | Verb::Merge) {
        parameters.push(Parameter::new("body", ParamType::Body, "object", true));
    }

    let target = if with_resource { "resource" } else { "service" };
    let (summary, status) = match verb {
        Verb::Get => (format!("Retrieve a {target}"), None),
        Verb::Post => (format!("Create a {target}"), Some(201)),
        Verb::Put => (format!("Replace a {target}"), None),
        Verb::Merge => (format!("Update part of a {target}"), None),
        Verb::Delete => (format!("Delete a {target}"), None),
    };

    let mut response_messages = vec![
        ResponseMessage {
            code: 400,
            message: "Bad request".to_string(),
        },
        ResponseMessage {
            code: 404,
            message: "Service or resource not found".to_string(),
        },
    ];
    if let Some(code) = status {
        response_messages.insert(
            0,
            ResponseMessage {
                code,
                message: "Created".to_string(),
            },
        );
    }

    Operation {
        method: verb,
        summary,
        nickname: format!(
            "{}{}{}",
            verb.as_str().to_ascii_lowercase(),
            capitalize(service),
            if with_resource { "Resource" } else { "" }
        ),
        response_type: "object".to_string(),
        parameters,
        response_messages,
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_entry() {
        let summary = ResourceSummary::from(&ServiceEntry::new("db", "Database"));
        assert_eq!(summary.path, "/db");
        assert_eq!(summary.description, "Database");
    }

    #[test]
    fn test_generated_declaration_covers_all_verbs() {
        let decl = ApiDeclaration::generated(&ServiceEntry::new("db", "Database"), "1.0", "/rest");
        assert_eq!(decl.resource_path, "/db");
        assert_eq!(decl.swagger_version, SWAGGER_VERSION);
        assert_eq!(decl.apis.len(), 2);
        assert_eq!(decl.apis[1].path, "/db/{resource}");

        let methods: Vec<Verb> = decl.apis[1].operations.iter().map(|o| o.method).collect();
        assert_eq!(methods, Verb::ALL.to_vec());
        assert_eq!(decl.apis[1].operations[1].nickname, "postDbResource");
        assert_eq!(decl.apis[1].operations[1].response_messages[0].code, 201);
    }

    #[test]
    fn test_declaration_serializes_camel_case() {
        let decl = ApiDeclaration::generated(&ServiceEntry::new("db", "Database"), "1.0", "/rest");
        let json = serde_json::to_value(&decl).unwrap();
        assert_eq!(json["swaggerVersion"], "1.2");
        assert_eq!(json["resourcePath"], "/db");
        assert_eq!(json["apis"][0]["operations"][0]["method"], "GET");
        assert_eq!(json["apis"][1]["operations"][0]["parameters"][0]["paramType"], "path");
        assert_eq!(json["apis"][1]["operations"][0]["type"], "object");
    }

    #[test]
    fn test_from_json() {
        let decl = ApiDeclaration::from_json(
            r#"{
                "apiVersion": "2.0",
                "swaggerVersion": "1.2",
                "basePath": "/rest",
                "resourcePath": "/files",
                "apis": [{
                    "path": "/files/{resource}",
                    "operations": [{
                        "method": "DELETE",
                        "summary": "Delete a file",
                        "nickname": "deleteFile",
                        "type": "object"
                    }]
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(decl.resource_path, "/files");
        assert_eq!(decl.apis[0].operations[0].method, Verb::Delete);
        assert!(decl.apis[0].operations[0].parameters.is_empty());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(ApiDeclaration::from_json("{").is_err());
    }
}
