//! Explicit registry of page classes and their event handler methods.
//!
//! Classes are registered once, when the application is assembled, together with the
//! structured metadata of every handler method and parameter. Method resolution walks
//! the registered supertype graph instead of inspecting live types.

use crate::error::{Error, Result};
use crate::openapi_builder::HttpMethod;
use log::debug;
use std::collections::{HashMap, HashSet};

const EVENT_HANDLER_PREFIX: &str = "on";
const HTTP_EVENT_PREFIX: &str = "http";

/// How a handler parameter receives its value at dispatch time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterKind {
    /// Supplied by the framework itself, never part of the URL
    Injected,
    /// Fixed literal path segment
    StaticValue(String),
    /// Placeholder segment bound from the URL
    PathSegment,
}

/// A single handler method parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub name: String,
    /// Fully-qualified type name
    pub type_name: String,
    pub kind: ParameterKind,
}

impl ParameterDescriptor {
    /// A parameter bound from a URL placeholder
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            kind: ParameterKind::PathSegment,
        }
    }

    /// A parameter the framework injects
    pub fn injected(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            kind: ParameterKind::Injected,
            ..Self::new(name, type_name)
        }
    }

    /// A parameter whose path segment is a fixed literal
    pub fn static_value(
        name: impl Into<String>,
        type_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            kind: ParameterKind::StaticValue(value.into()),
            ..Self::new(name, type_name)
        }
    }
}

/// An event handler method declared on a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    /// Explicit event name; when absent the event is derived from the method name
    pub event: Option<String>,
    pub parameters: Vec<ParameterDescriptor>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            event: None,
            parameters: Vec::new(),
        }
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Ordered fully-qualified parameter type names
    pub fn parameter_types(&self) -> Vec<String> {
        self.parameters.iter().map(|p| p.type_name.clone()).collect()
    }

    /// True when name and exact parameter signature match
    pub fn matches(&self, name: &str, parameter_types: &[String]) -> bool {
        self.name == name
            && self.parameters.len() == parameter_types.len()
            && self
                .parameters
                .iter()
                .zip(parameter_types)
                .all(|(p, t)| &p.type_name == t)
    }

    /// The event this method handles: the explicit event, or the method name without its `on` prefix
    pub fn event_name(&self) -> String {
        match &self.event {
            Some(event) => event.clone(),
            None => self
                .name
                .strip_prefix(EVENT_HANDLER_PREFIX)
                .unwrap_or(&self.name)
                .to_string(),
        }
    }

    /// HTTP method derived from the event name, e.g. `onHttpGet` -> `get`
    pub fn http_method(&self) -> Option<HttpMethod> {
        let event = self.event_name().to_lowercase();
        let method = event.strip_prefix(HTTP_EVENT_PREFIX).unwrap_or(&event);
        HttpMethod::parse(method)
    }

    /// Whether this method handles an HTTP event and is therefore a REST endpoint
    pub fn is_rest_endpoint(&self) -> bool {
        self.event_name().to_lowercase().starts_with(HTTP_EVENT_PREFIX) && self.http_method().is_some()
    }
}

/// A registered class: its supertypes and declared methods
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDescriptor {
    /// Fully-qualified class name
    pub name: String,
    pub superclass: Option<String>,
    /// Implemented interfaces, in declaration order
    pub interfaces: Vec<String>,
    pub methods: Vec<MethodDescriptor>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }
}

/// Last segment of a dotted class name
pub fn simple_name(class_name: &str) -> &str {
    class_name.rsplit('.').next().unwrap_or(class_name)
}

/// A method found by [`ClassRegistry::find_method`], with the class that declares it
#[derive(Debug, Clone, Copy)]
pub struct ResolvedMethod<'a> {
    pub declaring_class: &'a ClassDescriptor,
    pub method: &'a MethodDescriptor,
}

/// Registry of every class known to the application
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, ClassDescriptor>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class, replacing any previous registration under the same name
    pub fn register(&mut self, class: ClassDescriptor) {
        debug!("Registering class {}", class.name);
        self.classes.insert(class.name.clone(), class);
    }

    pub fn get(&self, name: &str) -> Option<&ClassDescriptor> {
        self.classes.get(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The class followed by its registered superclasses, most specific first.
    ///
    /// The walk stops at the first superclass that is not registered.
    pub fn superclass_chain(&self, name: &str) -> Vec<&ClassDescriptor> {
        let mut chain: Vec<&ClassDescriptor> = Vec::new();
        let mut current = self.get(name);
        while let Some(class) = current {
            if chain.iter().any(|c| c.name == class.name) {
                break;
            }
            chain.push(class);
            current = class.superclass.as_deref().and_then(|s| self.get(s));
        }
        chain
    }

    /// Find the method declared as `name(parameter_types)` on `class` or its supertypes.
    ///
    /// The class itself is searched first, then its superclass, then each interface in
    /// declaration order, depth-first; the first match wins.
    pub fn find_method(
        &self,
        class: &str,
        name: &str,
        parameter_types: &[String],
    ) -> Result<ResolvedMethod<'_>> {
        debug!("Resolving method {}({}) from {}", name, parameter_types.join(", "), class);
        let mut visited = HashSet::new();
        self.search(class, name, parameter_types, &mut visited)
            .ok_or_else(|| Error::MethodNotFound {
                class: class.to_string(),
                name: name.to_string(),
                parameter_types: parameter_types.to_vec(),
            })
    }

    fn search<'a>(
        &'a self,
        class: &str,
        name: &str,
        parameter_types: &[String],
        visited: &mut HashSet<String>,
    ) -> Option<ResolvedMethod<'a>> {
        if !visited.insert(class.to_string()) {
            return None;
        }
        let descriptor = self.get(class)?;

        if let Some(method) = descriptor
            .methods
            .iter()
            .find(|m| m.matches(name, parameter_types))
        {
            return Some(ResolvedMethod {
                declaring_class: descriptor,
                method,
            });
        }

        descriptor
            .superclass
            .iter()
            .chain(descriptor.interfaces.iter())
            .find_map(|supertype| self.search(supertype, name, parameter_types, visited))
    }
}
