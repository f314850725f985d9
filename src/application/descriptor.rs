//! An application assembled from a declarative descriptor.
//!
//! The descriptor lists the application's classes with their event handler methods, its
//! pages, its symbols and its base URL:
//!
//! ```yaml
//! base_url:
//!   insecure: http://localhost:8080
//! symbols:
//!   app.openapi-title: Widget Store
//! classes:
//!   - name: com.example.pages.Widget
//!     methods:
//!       - name: onHttpGet
//!         parameters:
//!           - { name: seg, type: java.lang.String, static_value: x }
//!           - { name: id, type: java.lang.String }
//! pages:
//!   - { name: Widget, class: com.example.pages.Widget, link: /widgets }
//! ```

use super::{
    BaseUrlSource, ComponentModel, Page, PageLinkSource, PageRegistry, SymbolSource,
    REST_ENDPOINT_EVENT_HANDLER_METHODS, REST_ENDPOINT_EVENT_HANDLER_METHOD_PRESENT,
};
use crate::class_registry::{simple_name, ClassDescriptor, ClassRegistry, MethodDescriptor, ParameterDescriptor};
use crate::endpoint_collector::{encode_endpoint_methods, EndpointMethodDescriptor};
use crate::error::{Error, Result};
use anyhow::Context;
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Root of a descriptor file
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationDescriptor {
    pub base_url: BaseUrlSpec,
    #[serde(default)]
    pub symbols: IndexMap<String, String>,
    #[serde(default)]
    pub classes: Vec<ClassSpec>,
    #[serde(default)]
    pub pages: Vec<PageSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BaseUrlSpec {
    pub insecure: String,
    /// Defaults to the insecure URL served over https
    pub secure: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassSpec {
    pub name: String,
    pub superclass: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub methods: Vec<MethodSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MethodSpec {
    pub name: String,
    pub event: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub injected: bool,
    pub static_value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageSpec {
    pub name: String,
    pub class: String,
    pub link: Option<String>,
}

impl ApplicationDescriptor {
    /// Read a descriptor, as JSON when the file has a `.json` extension and YAML otherwise
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        debug!("Loading application descriptor {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read descriptor: {}", path.display()))?;
        let descriptor = if path.extension().and_then(|e| e.to_str()) == Some("json") {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        };
        descriptor.with_context(|| format!("Invalid descriptor: {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

impl From<&ParameterSpec> for ParameterDescriptor {
    fn from(spec: &ParameterSpec) -> Self {
        if spec.injected {
            ParameterDescriptor::injected(&spec.name, &spec.type_name)
        } else if let Some(value) = &spec.static_value {
            ParameterDescriptor::static_value(&spec.name, &spec.type_name, value)
        } else {
            ParameterDescriptor::new(&spec.name, &spec.type_name)
        }
    }
}

impl From<&MethodSpec> for MethodDescriptor {
    fn from(spec: &MethodSpec) -> Self {
        MethodDescriptor {
            name: spec.name.clone(),
            event: spec.event.clone(),
            parameters: spec.parameters.iter().map(ParameterDescriptor::from).collect(),
        }
    }
}

impl From<&ClassSpec> for ClassDescriptor {
    fn from(spec: &ClassSpec) -> Self {
        ClassDescriptor {
            name: spec.name.clone(),
            superclass: spec.superclass.clone(),
            interfaces: spec.interfaces.clone(),
            methods: spec.methods.iter().map(MethodDescriptor::from).collect(),
        }
    }
}

/// Static application: a fixed set of classes, pages and symbols
pub struct StaticApplication {
    classes: Arc<ClassRegistry>,
    pages: IndexMap<String, PageSpec>,
    symbols: HashMap<String, String>,
    insecure_base_url: String,
    secure_base_url: Option<String>,
    /// Pages loaded so far, in load order
    loaded: RwLock<IndexMap<String, Arc<Page>>>,
}

impl StaticApplication {
    pub fn new(classes: ClassRegistry, base_url: impl Into<String>) -> Self {
        Self {
            classes: Arc::new(classes),
            pages: IndexMap::new(),
            symbols: HashMap::new(),
            insecure_base_url: base_url.into(),
            secure_base_url: None,
            loaded: RwLock::new(IndexMap::new()),
        }
    }

    pub fn from_descriptor(descriptor: &ApplicationDescriptor) -> Self {
        let mut classes = ClassRegistry::new();
        for class in &descriptor.classes {
            classes.register(ClassDescriptor::from(class));
        }

        let mut application = Self::new(classes, descriptor.base_url.insecure.clone());
        application.secure_base_url = descriptor.base_url.secure.clone();
        for (name, value) in &descriptor.symbols {
            application.symbols.insert(name.clone(), value.clone());
        }
        for page in &descriptor.pages {
            application.pages.insert(page.name.clone(), page.clone());
        }
        debug!(
            "Static application with {} classes and {} pages",
            application.classes.len(),
            application.pages.len()
        );
        application
    }

    pub fn with_page(mut self, name: &str, class: &str, link: Option<&str>) -> Self {
        self.pages.insert(
            name.to_string(),
            PageSpec {
                name: name.to_string(),
                class: class.to_string(),
                link: link.map(str::to_string),
            },
        );
        self
    }

    pub fn with_symbol(mut self, name: &str, value: &str) -> Self {
        self.symbols.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_secure_base_url(mut self, url: &str) -> Self {
        self.secure_base_url = Some(url.to_string());
        self
    }

    pub fn classes(&self) -> Arc<ClassRegistry> {
        Arc::clone(&self.classes)
    }

    /// Build the component model chain of `class`, one model per registered ancestor.
    ///
    /// Each model records its own class's REST endpoint handlers and the endpoint marker.
    fn build_model(&self, page: &str, class: &str) -> Result<Arc<ComponentModel>> {
        let chain = self.classes.superclass_chain(class);
        if chain.is_empty() {
            return Err(Error::PageLoad {
                page: page.to_string(),
                message: format!("class {} is not registered", class),
            });
        }

        let mut parent: Option<Arc<ComponentModel>> = None;
        for descriptor in chain.iter().rev() {
            let endpoints: Vec<EndpointMethodDescriptor> = descriptor
                .methods
                .iter()
                .filter(|m| m.is_rest_endpoint())
                .map(EndpointMethodDescriptor::from)
                .collect();

            let mut model = ComponentModel::new(descriptor.name.clone());
            if let Some(parent) = parent.take() {
                model = model.with_parent(parent);
            }
            if !endpoints.is_empty() {
                model = model
                    .with_meta(REST_ENDPOINT_EVENT_HANDLER_METHODS, encode_endpoint_methods(&endpoints)?)
                    .with_meta(REST_ENDPOINT_EVENT_HANDLER_METHOD_PRESENT, "true");
            }
            parent = Some(Arc::new(model));
        }

        parent.ok_or_else(|| Error::PageLoad {
            page: page.to_string(),
            message: format!("no component model for {}", class),
        })
    }
}

impl PageRegistry for StaticApplication {
    fn list_page_names(&self) -> Vec<String> {
        self.pages.keys().cloned().collect()
    }

    fn load_page(&self, name: &str) -> Result<Arc<Page>> {
        if let Some(page) = self.loaded.read().unwrap_or_else(|e| e.into_inner()).get(name) {
            return Ok(Arc::clone(page));
        }

        let spec = self.pages.get(name).ok_or_else(|| Error::PageLoad {
            page: name.to_string(),
            message: "no such page".to_string(),
        })?;
        let model = self.build_model(name, &spec.class)?;
        let page = Arc::new(Page::new(name, spec.class.clone(), model));
        debug!("Loaded page {} ({})", name, spec.class);

        let mut loaded = self.loaded.write().unwrap_or_else(|e| e.into_inner());
        Ok(Arc::clone(loaded.entry(name.to_string()).or_insert(page)))
    }

    fn list_all_loaded_pages(&self) -> Vec<Arc<Page>> {
        self.loaded
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect()
    }
}

impl PageLinkSource for StaticApplication {
    fn render_link_for(&self, page_class: &str) -> String {
        match self.pages.values().find(|p| p.class == page_class) {
            Some(PageSpec { link: Some(link), .. }) => link.clone(),
            Some(page) => format!("/{}", page.name.to_lowercase()),
            None => format!("/{}", simple_name(page_class).to_lowercase()),
        }
    }
}

impl BaseUrlSource for StaticApplication {
    fn base_url(&self, secure: bool) -> String {
        if !secure {
            return self.insecure_base_url.clone();
        }
        self.secure_base_url
            .clone()
            .unwrap_or_else(|| self.insecure_base_url.replacen("http://", "https://", 1))
    }
}

impl SymbolSource for StaticApplication {
    fn value_for(&self, symbol: &str) -> Result<String> {
        self.symbols
            .get(symbol)
            .cloned()
            .ok_or_else(|| Error::SymbolNotFound(symbol.to_string()))
    }
}
