use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

/// OpenAPI version written when the application does not configure one
pub const DEFAULT_OPENAPI_VERSION: &str = "3.0.0";

/// HTTP methods an endpoint handler can answer.
///
/// Serialized in lowercase, which is how OpenAPI path items key their operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    /// Parse a lowercase method name such as `"get"`
    ///
    /// # Returns
    ///
    /// `None` for anything outside the eight methods OpenAPI path items can hold,
    /// including uppercase spellings.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            "patch" => Some(HttpMethod::Patch),
            "options" => Some(HttpMethod::Options),
            "head" => Some(HttpMethod::Head),
            "trace" => Some(HttpMethod::Trace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Trace => "trace",
        }
    }

    /// Status code documented for a successful call: 201 for POST, 200 otherwise
    pub fn default_status_code(&self) -> u16 {
        match self {
            HttpMethod::Post => 201,
            _ => 200,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OpenAPI Info object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    /// API title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Application version, `?` when unknown
    pub version: String,
}

/// OpenAPI Server object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Server {
    pub url: String,
}

/// OpenAPI Tag object, one per page exposing REST endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// All operations for a single path, keyed by HTTP method
pub type PathItem = IndexMap<HttpMethod, Operation>;

/// OpenAPI Operation object - represents a single API operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    /// Operation summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Operation description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Names of the tags this operation is grouped under
    pub tags: Vec<String>,
    /// Responses keyed by status code
    pub responses: IndexMap<String, Response>,
}

/// OpenAPI Response object. Only the description stub is ever populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Complete OpenAPI document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenApiDocument {
    /// OpenAPI version
    pub openapi: String,
    /// API info
    pub info: Info,
    /// Insecure and secure base URLs
    pub servers: Vec<Server>,
    /// One tag per documented page
    pub tags: Vec<Tag>,
    /// API paths
    pub paths: IndexMap<String, PathItem>,
}

/// OpenAPI document builder
pub struct OpenApiBuilder {
    openapi: String,
    info: Info,
    servers: Vec<Server>,
    tags: Vec<Tag>,
    /// Paths collection (URL path template -> PathItem)
    paths: IndexMap<String, PathItem>,
}

impl OpenApiBuilder {
    /// Create a new OpenApiBuilder for the given OpenAPI version
    pub fn new(openapi: impl Into<String>) -> Self {
        let openapi = openapi.into();
        debug!("Initializing OpenApiBuilder for OpenAPI {}", openapi);
        Self {
            openapi,
            info: Info {
                title: None,
                description: None,
                version: "?".to_string(),
            },
            servers: Vec::new(),
            tags: Vec::new(),
            paths: IndexMap::new(),
        }
    }

    /// Set the info block of the API
    pub fn with_info(mut self, info: Info) -> Self {
        self.info = info;
        self
    }

    /// Append a server URL
    pub fn add_server(&mut self, url: impl Into<String>) {
        self.servers.push(Server { url: url.into() });
    }

    /// Append a tag
    pub fn add_tag(&mut self, tag: Tag) {
        debug!("Adding tag: {}", tag.name);
        self.tags.push(tag);
    }

    /// Whether an operation is already registered for this path and method
    pub fn contains_operation(&self, path: &str, method: HttpMethod) -> bool {
        self.paths
            .get(path)
            .is_some_and(|item| item.contains_key(&method))
    }

    /// Add an operation under `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Path template such as `/widgets/{id}`
    /// * `method` - HTTP method keying the operation within the path item
    /// * `operation` - The operation to insert
    /// * `class` - Page class reported when the slot is already taken
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateOperation`] when `path` already holds an operation for
    /// `method`; the existing operation is left untouched.
    pub fn add_operation(
        &mut self,
        path: &str,
        method: HttpMethod,
        operation: Operation,
        class: &str,
    ) -> Result<()> {
        debug!("Adding operation: {} {}", method, path);

        let path_item = self.paths.entry(path.to_string()).or_default();
        if path_item.contains_key(&method) {
            return Err(Error::DuplicateOperation {
                path: path.to_string(),
                method: method.to_string(),
                class: class.to_string(),
            });
        }
        path_item.insert(method, operation);
        Ok(())
    }

    /// Build the final OpenAPI document
    pub fn build(self) -> OpenApiDocument {
        debug!(
            "Building final OpenAPI document with {} paths and {} tags",
            self.paths.len(),
            self.tags.len()
        );
        OpenApiDocument {
            openapi: self.openapi,
            info: self.info,
            servers: self.servers,
            tags: self.tags,
            paths: self.paths,
        }
    }
}

impl Default for OpenApiBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_OPENAPI_VERSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operation(tag: &str, status: u16) -> Operation {
        let mut responses = IndexMap::new();
        responses.insert(status.to_string(), Response::default());
        Operation {
            summary: None,
            description: None,
            tags: vec![tag.to_string()],
            responses,
        }
    }

    #[test]
    fn test_new_builder() {
        let document = OpenApiBuilder::new("3.0.1").build();

        assert_eq!(document.openapi, "3.0.1");
        assert_eq!(document.info.version, "?");
        assert!(document.info.title.is_none());
        assert!(document.servers.is_empty());
        assert!(document.tags.is_empty());
        assert!(document.paths.is_empty());
    }

    #[test]
    fn test_with_info() {
        let document = OpenApiBuilder::default()
            .with_info(Info {
                title: Some("Shop".to_string()),
                description: None,
                version: "2.0".to_string(),
            })
            .build();

        assert_eq!(document.openapi, DEFAULT_OPENAPI_VERSION);
        assert_eq!(document.info.title.as_deref(), Some("Shop"));
        assert_eq!(document.info.version, "2.0");
    }

    #[test]
    fn test_add_multiple_methods_same_path() {
        let mut builder = OpenApiBuilder::default();

        builder
            .add_operation("/widgets/{id}", HttpMethod::Get, operation("Widget", 200), "Widget")
            .unwrap();
        builder
            .add_operation("/widgets/{id}", HttpMethod::Post, operation("Widget", 201), "Widget")
            .unwrap();

        assert!(builder.contains_operation("/widgets/{id}", HttpMethod::Get));
        assert!(builder.contains_operation("/widgets/{id}", HttpMethod::Post));
        assert!(!builder.contains_operation("/widgets/{id}", HttpMethod::Put));

        let document = builder.build();
        assert_eq!(document.paths.len(), 1);
        let methods: Vec<_> = document.paths["/widgets/{id}"].keys().copied().collect();
        assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Post]);
    }

    #[test]
    fn test_duplicate_operation_is_rejected() {
        let mut builder = OpenApiBuilder::default();
        builder
            .add_operation("/widgets", HttpMethod::Get, operation("Widget", 200), "com.example.Widget")
            .unwrap();

        let err = builder
            .add_operation("/widgets", HttpMethod::Get, operation("Other", 200), "com.example.Widget")
            .unwrap_err();

        match err {
            Error::DuplicateOperation { path, method, class } => {
                assert_eq!(path, "/widgets");
                assert_eq!(method, "get");
                assert_eq!(class, "com.example.Widget");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_paths_keep_insertion_order() {
        let mut builder = OpenApiBuilder::default();
        for path in ["/zeta", "/alpha", "/mid"] {
            builder
                .add_operation(path, HttpMethod::Get, operation("T", 200), "T")
                .unwrap();
        }

        let document = builder.build();
        let paths: Vec<_> = document.paths.keys().map(String::as_str).collect();
        assert_eq!(paths, vec!["/zeta", "/alpha", "/mid"]);
    }

    #[test]
    fn test_default_status_code() {
        assert_eq!(HttpMethod::Post.default_status_code(), 201);
        assert_eq!(HttpMethod::Get.default_status_code(), 200);
        assert_eq!(HttpMethod::Delete.default_status_code(), 200);
    }

    #[test]
    fn test_parse_http_method() {
        assert_eq!(HttpMethod::parse("patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::parse("trace"), Some(HttpMethod::Trace));
        assert_eq!(HttpMethod::parse("GET"), None);
        assert_eq!(HttpMethod::parse("activate"), None);
    }

    #[test]
    fn test_empty_response_serializes_as_empty_object() {
        let mut builder = OpenApiBuilder::default();
        builder
            .add_operation("/health", HttpMethod::Get, operation("Health", 200), "Health")
            .unwrap();

        let value = serde_json::to_value(builder.build()).unwrap();
        assert_eq!(value["paths"]["/health"]["get"]["responses"]["200"], serde_json::json!({}));
        assert_eq!(value["paths"]["/health"]["get"]["tags"], serde_json::json!(["Health"]));
        assert!(value["paths"]["/health"]["get"].get("summary").is_none());
    }
}
