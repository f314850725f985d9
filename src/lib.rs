//! OpenAPI from pages - OpenAPI documentation for the REST endpoints of an application's pages.
//!
//! Pages expose REST endpoints through event handler methods such as `onHttpGet`. This
//! library walks the pages of an application, finds those handlers and synthesizes an
//! OpenAPI 3.0 document: one tag per page, one path per handler, with titles, summaries and
//! descriptions looked up in localized message catalogs and application symbols.
//!
//! # Architecture
//!
//! 1. [`application`] - Interfaces to the documented application, plus a descriptor-driven
//!    implementation and `.properties` message catalogs
//! 2. [`class_registry`] - Registered classes and handler methods, and method resolution
//!    across supertypes
//! 3. [`endpoint_collector`] - Gathers endpoint descriptors along a component model chain
//! 4. [`path_synthesizer`] - Builds path templates from render links and handler parameters
//! 5. [`key_resolver`] - Cascading message and symbol lookup
//! 6. [`openapi_builder`] - The document model and its builder
//! 7. [`generator`] - Orchestrates a generation pass
//! 8. [`serializer`] - Serializes the document to YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_from_pages::{
//!     application::catalog::CatalogSet,
//!     application::descriptor::{ApplicationDescriptor, StaticApplication},
//!     generator::OpenApiGenerator,
//!     scanner::ProjectScanner,
//!     serializer::serialize_yaml,
//! };
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! let scan = ProjectScanner::new(PathBuf::from("./my-app")).scan().unwrap();
//! let descriptor = ApplicationDescriptor::load(scan.descriptor().unwrap()).unwrap();
//! let application = Arc::new(StaticApplication::from_descriptor(&descriptor));
//! let catalogs = CatalogSet::load("app", &scan.catalogs).unwrap();
//!
//! let generator = OpenApiGenerator::for_application(application, Arc::new(catalogs));
//! let document = generator.generate("en").unwrap();
//! println!("{}", serialize_yaml(&document).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod scanner;
pub mod application;
pub mod class_registry;
pub mod endpoint_collector;
pub mod path_synthesizer;
pub mod key_resolver;
pub mod failed_pages;
pub mod openapi_builder;
pub mod generator;
pub mod serializer;
pub mod error;
