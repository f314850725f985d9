//! Assembles the OpenAPI document for every page exposing REST endpoints.
//!
//! A generation pass runs in order:
//!
//! 1. Every known page not already recorded as failed is loaded; failures are recorded
//!    in the shared [`FailedPages`] set and skipped from then on
//! 2. The `openapi`, `info` and `servers` blocks are filled from symbols and messages
//! 3. Loaded pages without the REST endpoint marker are dropped
//! 4. Each remaining page gets a tag, and each of its endpoint handlers an operation
//!
//! An unresolvable handler or two handlers sharing a path and HTTP method abort the pass.

use crate::application::descriptor::StaticApplication;
use crate::application::{
    BaseUrlSource, MessageCatalog, MessagesSource, Page, PageLinkSource, PageRegistry, SymbolSource,
};
use crate::class_registry::{simple_name, ClassRegistry, ResolvedMethod};
use crate::endpoint_collector::{collect_endpoint_methods, has_rest_endpoint};
use crate::error::{Error, Result};
use crate::failed_pages::FailedPages;
use crate::key_resolver::{KeyResolver, LookupConfig};
use crate::openapi_builder::{
    Info, OpenApiBuilder, OpenApiDocument, Operation, Response, Tag, DEFAULT_OPENAPI_VERSION,
};
use crate::path_synthesizer::path_for;
use indexmap::IndexMap;
use log::{debug, info, warn};
use std::sync::Arc;

/// Symbol holding the OpenAPI version to declare
pub const OPENAPI_VERSION: &str = "openapi-version";
/// Symbol or message holding the API title
pub const OPENAPI_TITLE: &str = "openapi-title";
/// Symbol or message holding the API description
pub const OPENAPI_DESCRIPTION: &str = "openapi-description";
/// Symbol holding the application version
pub const OPENAPI_APPLICATION_VERSION: &str = "openapi-application-version";

const UNKNOWN_APPLICATION_VERSION: &str = "?";

/// Per-call state: the locale being documented and its message catalog
pub struct GenerationContext {
    locale: String,
    catalog: Arc<dyn MessageCatalog>,
}

impl GenerationContext {
    pub fn new(locale: impl Into<String>, catalog: Arc<dyn MessageCatalog>) -> Self {
        Self {
            locale: locale.into(),
            catalog,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn catalog(&self) -> &dyn MessageCatalog {
        self.catalog.as_ref()
    }
}

/// Generates OpenAPI documents from the application's pages
pub struct OpenApiGenerator {
    pages: Arc<dyn PageRegistry>,
    classes: Arc<ClassRegistry>,
    links: Arc<dyn PageLinkSource>,
    base_urls: Arc<dyn BaseUrlSource>,
    symbols: Arc<dyn SymbolSource>,
    messages: Arc<dyn MessagesSource>,
    failed_pages: Arc<FailedPages>,
    config: LookupConfig,
}

impl OpenApiGenerator {
    pub fn new(
        pages: Arc<dyn PageRegistry>,
        classes: Arc<ClassRegistry>,
        links: Arc<dyn PageLinkSource>,
        base_urls: Arc<dyn BaseUrlSource>,
        symbols: Arc<dyn SymbolSource>,
        messages: Arc<dyn MessagesSource>,
    ) -> Self {
        Self {
            pages,
            classes,
            links,
            base_urls,
            symbols,
            messages,
            failed_pages: Arc::new(FailedPages::new()),
            config: LookupConfig::default(),
        }
    }

    /// Generator over a [`StaticApplication`], which supplies pages, links, URLs and symbols
    pub fn for_application(application: Arc<StaticApplication>, messages: Arc<dyn MessagesSource>) -> Self {
        Self::new(
            application.clone(),
            application.classes(),
            application.clone(),
            application.clone(),
            application,
            messages,
        )
    }

    /// Share a failed-page set with other generators
    pub fn with_failed_pages(mut self, failed_pages: Arc<FailedPages>) -> Self {
        self.failed_pages = failed_pages;
        self
    }

    pub fn with_lookup_config(mut self, config: LookupConfig) -> Self {
        self.config = config;
        self
    }

    pub fn failed_pages(&self) -> &Arc<FailedPages> {
        &self.failed_pages
    }

    /// Generate the document for `locale`.
    ///
    /// # Arguments
    ///
    /// * `locale` - Locale whose message catalog supplies titles, summaries and descriptions
    ///
    /// # Errors
    ///
    /// Fails without a partial document when a recorded handler cannot be resolved, names
    /// no known HTTP method, or shares its path and method with another handler.
    pub fn generate(&self, locale: &str) -> Result<OpenApiDocument> {
        let context = GenerationContext::new(locale, self.messages.catalog_for(locale));
        self.generate_with_context(&context)
    }

    /// Generate the document using an already resolved context.
    ///
    /// Pages are loaded first, exactly as [`OpenApiGenerator::generate`] does.
    pub fn generate_with_context(&self, context: &GenerationContext) -> Result<OpenApiDocument> {
        info!("Generating OpenAPI description for locale {}", context.locale());
        self.warm_up_pages();

        let resolver = KeyResolver::new(context.catalog(), self.symbols.as_ref(), &self.config);

        let openapi = resolver
            .from_symbols(&self.config.symbol(OPENAPI_VERSION))
            .unwrap_or_else(|| DEFAULT_OPENAPI_VERSION.to_string());
        let info = Info {
            title: resolver.resolve(&self.config.symbol(OPENAPI_TITLE)),
            description: resolver.resolve(&self.config.symbol(OPENAPI_DESCRIPTION)),
            version: resolver
                .from_symbols(&self.config.symbol(OPENAPI_APPLICATION_VERSION))
                .unwrap_or_else(|| UNKNOWN_APPLICATION_VERSION.to_string()),
        };

        let mut builder = OpenApiBuilder::new(openapi).with_info(info);
        builder.add_server(self.base_urls.base_url(false));
        builder.add_server(self.base_urls.base_url(true));

        let pages: Vec<Arc<Page>> = self
            .pages
            .list_all_loaded_pages()
            .into_iter()
            .filter(|page| has_rest_endpoint(page.root_model()))
            .collect();
        debug!("{} page(s) expose REST endpoints", pages.len());

        for page in &pages {
            self.process_page(page, &resolver, &mut builder)?;
        }

        let document = builder.build();
        info!(
            "Generated {} path(s) for {} page(s) in locale {}",
            document.paths.len(),
            pages.len(),
            context.locale()
        );
        Ok(document)
    }

    /// Load every page that has not failed before, recording new failures
    fn warm_up_pages(&self) {
        for name in self.pages.list_page_names() {
            if self.failed_pages.contains(&name) {
                continue;
            }
            if let Err(e) = self.pages.load_page(&name) {
                if self.failed_pages.insert(&name) {
                    warn!("Skipping page {}: {}", name, e);
                }
            }
        }
    }

    fn process_page(
        &self,
        page: &Page,
        resolver: &KeyResolver,
        builder: &mut OpenApiBuilder,
    ) -> Result<()> {
        let page_class = page.root_class();
        debug!("Processing page {} ({})", page.name(), page_class);

        let tag_name = resolver
            .class_value(page_class, "tag.name")
            .unwrap_or_else(|| simple_name(page_class).to_string());
        builder.add_tag(Tag {
            name: tag_name.clone(),
            description: resolver.class_value(page_class, "tag.description"),
        });

        let methods = collect_endpoint_methods(page.root_model())?
            .iter()
            .map(|d| self.classes.find_method(page_class, &d.name, &d.parameter_types))
            .collect::<Result<Vec<_>>>()?;

        for method in methods {
            self.process_method(method, page_class, &tag_name, resolver, builder)?;
        }
        Ok(())
    }

    fn process_method(
        &self,
        resolved: ResolvedMethod<'_>,
        page_class: &str,
        tag_name: &str,
        resolver: &KeyResolver,
        builder: &mut OpenApiBuilder,
    ) -> Result<()> {
        let declaring_class = resolved.declaring_class.name.as_str();
        let method = resolved.method;

        let path = path_for(self.links.as_ref(), page_class, method);
        let http_method = method.http_method().ok_or_else(|| Error::UnsupportedHttpMethod {
            class: declaring_class.to_string(),
            method: method.name.clone(),
            event: method.event_name(),
        })?;

        if builder.contains_operation(&path, http_method) {
            return Err(Error::DuplicateOperation {
                path,
                method: http_method.to_string(),
                class: page_class.to_string(),
            });
        }

        let status_code = http_method.default_status_code();
        let mut responses = IndexMap::new();
        responses.insert(
            status_code.to_string(),
            Response {
                description: resolver.response_description(declaring_class, &path, http_method, status_code),
            },
        );

        let operation = Operation {
            summary: resolver.operation_value(declaring_class, &path, http_method, "summary"),
            description: resolver.operation_value(declaring_class, &path, http_method, "description"),
            tags: vec![tag_name.to_string()],
            responses,
        };

        builder.add_operation(&path, http_method, operation, page_class)
    }
}
