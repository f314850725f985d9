//! Interfaces to the web application being documented.
//!
//! The generator never inspects the application directly. It consumes pages, component
//! models, URLs, symbols and localized messages through the traits defined here.
//!
//! # Provided implementations
//!
//! - [`descriptor::StaticApplication`]: an application assembled from a declarative
//!   descriptor file, implementing [`PageRegistry`], [`PageLinkSource`],
//!   [`BaseUrlSource`] and [`SymbolSource`]
//! - [`catalog::CatalogSet`]: `.properties` message catalogs implementing
//!   [`MessagesSource`]

pub mod catalog;
pub mod descriptor;

use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// Component model meta key holding the JSON array of REST endpoint handler descriptors
/// declared locally on a model
pub const REST_ENDPOINT_EVENT_HANDLER_METHODS: &str = "rest-endpoint-event-handler-methods";

/// Component model meta key set to `"true"` when REST endpoint handlers are present
pub const REST_ENDPOINT_EVENT_HANDLER_METHOD_PRESENT: &str =
    "rest-endpoint-event-handler-method-present";

/// Source of the application's pages.
pub trait PageRegistry: Send + Sync {
    /// Names of every page the application defines
    fn list_page_names(&self) -> Vec<String>;

    /// Materialize a page, failing with [`crate::error::Error::PageLoad`] when the page
    /// cannot be built
    fn load_page(&self, name: &str) -> Result<Arc<Page>>;

    /// Every page loaded so far
    fn list_all_loaded_pages(&self) -> Vec<Arc<Page>>;
}

/// Base URL of the running application
pub trait BaseUrlSource: Send + Sync {
    fn base_url(&self, secure: bool) -> String;
}

/// Symbol (configuration) values
pub trait SymbolSource: Send + Sync {
    /// Fails with [`crate::error::Error::SymbolNotFound`] when the symbol is undefined
    fn value_for(&self, symbol: &str) -> Result<String>;
}

/// Render links for page classes
pub trait PageLinkSource: Send + Sync {
    fn render_link_for(&self, page_class: &str) -> String;
}

/// A localized message catalog.
pub trait MessageCatalog: Send + Sync {
    /// The message for `key`. Missing messages come back as a bracketed placeholder
    /// such as `[[missing key: foo]]`.
    fn get(&self, key: &str) -> String;
}

/// Produces the message catalog for a locale
pub trait MessagesSource: Send + Sync {
    fn catalog_for(&self, locale: &str) -> Arc<dyn MessageCatalog>;
}

/// Structural metadata for a component class, linked to the model of its parent class.
#[derive(Debug, Clone, Default)]
pub struct ComponentModel {
    component_class: String,
    meta: HashMap<String, String>,
    parent: Option<Arc<ComponentModel>>,
}

impl ComponentModel {
    pub fn new(component_class: impl Into<String>) -> Self {
        Self {
            component_class: component_class.into(),
            meta: HashMap::new(),
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: Arc<ComponentModel>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Fully-qualified name of the class this model describes
    pub fn component_class(&self) -> &str {
        &self.component_class
    }

    /// Meta value declared on this model only
    pub fn local_meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    /// Meta value declared on this model, or inherited from the nearest ancestor declaring it
    pub fn meta(&self, key: &str) -> Option<&str> {
        let mut model = Some(self);
        while let Some(current) = model {
            if let Some(value) = current.local_meta(key) {
                return Some(value);
            }
            model = current.parent_model();
        }
        None
    }

    pub fn parent_model(&self) -> Option<&ComponentModel> {
        self.parent.as_deref()
    }
}

/// A loaded page: its name, the class of its root component and that component's model
#[derive(Debug, Clone)]
pub struct Page {
    name: String,
    root_class: String,
    root_model: Arc<ComponentModel>,
}

impl Page {
    pub fn new(name: impl Into<String>, root_class: impl Into<String>, root_model: Arc<ComponentModel>) -> Self {
        Self {
            name: name.into(),
            root_class: root_class.into(),
            root_model,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully-qualified class name of the page's root component
    pub fn root_class(&self) -> &str {
        &self.root_class
    }

    pub fn root_model(&self) -> &ComponentModel {
        &self.root_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_is_inherited_from_parent() {
        let parent = Arc::new(ComponentModel::new("Base").with_meta("flag", "true"));
        let child = ComponentModel::new("Child").with_parent(parent);

        assert_eq!(child.local_meta("flag"), None);
        assert_eq!(child.meta("flag"), Some("true"));
        assert_eq!(child.parent_model().map(|m| m.component_class()), Some("Base"));
    }

    #[test]
    fn test_local_meta_overrides_parent() {
        let parent = Arc::new(ComponentModel::new("Base").with_meta("flag", "false"));
        let child = ComponentModel::new("Child")
            .with_parent(parent)
            .with_meta("flag", "true");

        assert_eq!(child.meta("flag"), Some("true"));
        assert_eq!(child.meta("missing"), None);
    }
}
