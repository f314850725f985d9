//! Serialization module for converting OpenAPI documents to YAML or JSON format.
//!
//! This module provides functions to serialize OpenAPI documents into standard formats
//! and write them to files or return them as strings.

use crate::openapi_builder::OpenApiDocument;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes an OpenAPI document to YAML format.
///
/// # Arguments
///
/// * `doc` - The generated OpenAPI document
///
/// # Returns
///
/// The YAML text, keys in document order (`openapi`, `info`, `servers`, `tags`, `paths`).
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```
/// use openapi_from_pages::openapi_builder::OpenApiBuilder;
/// use openapi_from_pages::serializer::serialize_yaml;
///
/// let doc = OpenApiBuilder::default().build();
/// let yaml = serialize_yaml(&doc).unwrap();
/// assert!(yaml.contains("openapi:"));
/// ```
pub fn serialize_yaml(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize OpenAPI document to YAML")
}

/// Serializes an OpenAPI document to JSON format with pretty printing.
///
/// # Arguments
///
/// * `doc` - The generated OpenAPI document
///
/// # Returns
///
/// The indented JSON text.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize OpenAPI document to JSON")
}

/// Writes string content to a file, creating parent directories as needed.
///
/// # Arguments
///
/// * `content` - The serialized document
/// * `path` - Destination file; an existing file is overwritten
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi_builder::{HttpMethod, Info, OpenApiBuilder, Operation, Response, Tag};
    use indexmap::IndexMap;
    use tempfile::TempDir;

    /// Helper function to create a small OpenAPI document for testing
    fn create_test_document() -> OpenApiDocument {
        let mut builder = OpenApiBuilder::new("3.0.0").with_info(Info {
            title: Some("Test API".to_string()),
            description: Some("A test API".to_string()),
            version: "1.0.0".to_string(),
        });
        builder.add_server("http://localhost:8080");
        builder.add_server("https://localhost:8080");
        builder.add_tag(Tag {
            name: "Widget".to_string(),
            description: None,
        });

        let mut responses = IndexMap::new();
        responses.insert(
            "200".to_string(),
            Response {
                description: Some("The widget".to_string()),
            },
        );
        builder
            .add_operation(
                "/widgets/{id}",
                HttpMethod::Get,
                Operation {
                    summary: Some("Fetch a widget".to_string()),
                    description: None,
                    tags: vec!["Widget".to_string()],
                    responses,
                },
                "com.example.Widget",
            )
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_serialize_yaml() {
        let yaml = serialize_yaml(&create_test_document()).unwrap();

        assert!(yaml.contains("openapi:"));
        assert!(yaml.contains("3.0.0"));
        assert!(yaml.contains("title: Test API"));
        assert!(yaml.contains("url: http://localhost:8080"));
        assert!(yaml.contains("/widgets/{id}"));
        assert!(yaml.contains("get:"));
        assert!(yaml.contains("summary: Fetch a widget"));
    }

    #[test]
    fn test_serialize_json() {
        let json = serialize_json(&create_test_document()).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["openapi"], "3.0.0");
        assert_eq!(parsed["info"]["title"], "Test API");
        assert_eq!(parsed["info"]["version"], "1.0.0");
        assert_eq!(parsed["servers"][1]["url"], "https://localhost:8080");
        assert_eq!(parsed["tags"][0]["name"], "Widget");
        assert!(parsed["tags"][0].get("description").is_none());
        assert_eq!(
            parsed["paths"]["/widgets/{id}"]["get"]["responses"]["200"]["description"],
            "The widget"
        );
    }

    #[test]
    fn test_serialize_json_top_level_key_order() {
        let json = serialize_json(&create_test_document()).unwrap();

        let positions: Vec<usize> = ["\"openapi\"", "\"info\"", "\"servers\"", "\"tags\"", "\"paths\""]
            .iter()
            .map(|key| json.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(json.lines().count() > 5, "Pretty printed JSON should have multiple lines");
    }

    #[test]
    fn test_write_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.yaml");

        write_to_file("test content", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "test content");
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("subdir").join("nested").join("test.yaml");

        write_to_file("test content", &file_path).unwrap();

        assert!(file_path.exists());
    }

    #[test]
    fn test_write_to_file_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.yaml");

        write_to_file("initial content", &file_path).unwrap();
        write_to_file("new content", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new content");
    }
}
