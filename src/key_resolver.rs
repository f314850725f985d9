//! Cascading lookup of human-readable text for the generated document.
//!
//! Every lookup first consults the localized message catalog and then the symbol source.
//! Misses on either side are absorbed: callers always get an `Option`.

use crate::application::{MessageCatalog, SymbolSource};
use crate::class_registry::simple_name;
use crate::openapi_builder::HttpMethod;
use log::debug;

/// Namespaces used to build lookup keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    /// Namespace of application symbols. Stripped from catalog keys, prepended to symbol names.
    pub symbol_namespace: String,
    /// Leading segment of every documentation key
    pub key_prefix: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            symbol_namespace: "app".to_string(),
            key_prefix: "openapi".to_string(),
        }
    }
}

impl LookupConfig {
    /// `<namespace>.<name>`
    pub fn symbol(&self, name: &str) -> String {
        format!("{}.{}", self.symbol_namespace, name)
    }

    /// `<prefix>.<suffix>`
    pub fn key(&self, suffix: &str) -> String {
        format!("{}.{}", self.key_prefix, suffix)
    }
}

/// Resolves documentation keys against a message catalog and a symbol source
pub struct KeyResolver<'a> {
    catalog: &'a dyn MessageCatalog,
    symbols: &'a dyn SymbolSource,
    config: &'a LookupConfig,
}

impl<'a> KeyResolver<'a> {
    pub fn new(
        catalog: &'a dyn MessageCatalog,
        symbols: &'a dyn SymbolSource,
        config: &'a LookupConfig,
    ) -> Self {
        Self {
            catalog,
            symbols,
            config,
        }
    }

    /// Look `key` up in the catalog, then as a symbol
    pub fn resolve(&self, key: &str) -> Option<String> {
        self.from_messages(key).or_else(|| self.from_symbols(key))
    }

    /// Look `key` up as a symbol only
    pub fn from_symbols(&self, key: &str) -> Option<String> {
        let namespace = format!("{}.", self.config.symbol_namespace);
        let symbol = if key.starts_with(&namespace) {
            key.to_string()
        } else {
            format!("{}{}", namespace, key)
        };
        debug!("Looking up symbol  {}", symbol);
        self.symbols.value_for(&symbol).ok()
    }

    fn from_messages(&self, key: &str) -> Option<String> {
        debug!("Looking up message {}", key);
        let namespace = format!("{}.", self.config.symbol_namespace);
        let message_key = key.strip_prefix(&namespace).unwrap_or(key);
        let value = self.catalog.get(message_key);
        let value = value.trim();
        // the catalog answers a missing key with a bracketed placeholder
        if value.starts_with('[') && value.ends_with(']') {
            None
        } else {
            Some(value.to_string())
        }
    }

    /// Class-scoped property: fully-qualified class name first, then simple name
    pub fn class_value(&self, class_name: &str, property: &str) -> Option<String> {
        self.resolve(&self.config.key(&format!("{}.{}", class_name, property)))
            .or_else(|| {
                self.resolve(&self.config.key(&format!("{}.{}", simple_name(class_name), property)))
            })
    }

    /// Method-scoped key. Unless `skip_class_name_lookup` is set, the declaring class's
    /// fully-qualified and simple names are tried as extra qualifiers before the bare key.
    pub fn method_value(
        &self,
        declaring_class: &str,
        suffix: &str,
        skip_class_name_lookup: bool,
    ) -> Option<String> {
        let qualified = if skip_class_name_lookup {
            None
        } else {
            self.resolve(&self.config.key(&format!("{}.{}", declaring_class, suffix)))
                .or_else(|| {
                    self.resolve(&self.config.key(&format!("{}.{}", simple_name(declaring_class), suffix)))
                })
        };
        qualified.or_else(|| self.resolve(&self.config.key(suffix)))
    }

    /// `<prefix>.<path>.<method>.<property>`, e.g. the summary of one operation
    pub fn operation_value(
        &self,
        declaring_class: &str,
        path: &str,
        method: HttpMethod,
        property: &str,
    ) -> Option<String> {
        self.method_value(declaring_class, &format!("{}.{}.{}", path, method, property), true)
    }

    /// Description of the response with `status_code`, from the most to the least specific key
    pub fn response_description(
        &self,
        declaring_class: &str,
        path: &str,
        method: HttpMethod,
        status_code: u16,
    ) -> Option<String> {
        let response = format!("response.{}", status_code);
        self.method_value(declaring_class, &format!("{}.{}.{}", path, method, response), true)
            .or_else(|| self.method_value(declaring_class, &format!("{}.{}", method, response), false))
            .or_else(|| self.method_value(declaring_class, &response, false))
            .or_else(|| self.resolve(&response))
    }
}
