//! Name-indexed table of endpoint definitions.
//!
//! # Design
//! A `Registry` is built once and never mutated afterwards, so any number of
//! dispatchers can share it behind an `Arc` and look operations up without
//! locking. `Registry::standard()` is the process-wide instance built from
//! the backend catalog in [`crate::catalog`].

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::catalog;
use crate::error::{CallError, RegistryError};
use crate::http::HttpMethod;
use crate::template;

/// A header forced (or removed) for one operation, applied after the
/// session defaults and before per-call headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderOverride {
    pub name: &'static str,
    /// `None` drops the header from the request.
    pub value: Option<&'static str>,
}

impl HeaderOverride {
    pub const fn set(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            value: Some(value),
        }
    }

    pub const fn remove(name: &'static str) -> Self {
        Self { name, value: None }
    }
}

/// One logical operation: verb, path template, accepted query parameters and
/// header overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDefinition {
    pub name: &'static str,
    pub method: HttpMethod,
    pub path_template: &'static str,
    pub query_params: &'static [&'static str],
    pub header_overrides: &'static [HeaderOverride],
}

impl EndpointDefinition {
    pub const fn new(name: &'static str, method: HttpMethod, path_template: &'static str) -> Self {
        Self {
            name,
            method,
            path_template,
            query_params: &[],
            header_overrides: &[],
        }
    }

    pub const fn with_query(self, query_params: &'static [&'static str]) -> Self {
        Self {
            query_params,
            ..self
        }
    }

    pub const fn with_headers(self, header_overrides: &'static [HeaderOverride]) -> Self {
        Self {
            header_overrides,
            ..self
        }
    }

    /// Placeholder names in the path template. Empty for a malformed
    /// template, which `Registry::new` refuses to register.
    pub fn placeholders(&self) -> Vec<&'static str> {
        template::placeholders(self.path_template).unwrap_or_default()
    }
}

static STANDARD: Lazy<Arc<Registry>> = Lazy::new(|| Arc::new(Registry::index(catalog::ENDPOINTS)));

#[derive(Debug, Clone)]
pub struct Registry {
    endpoints: HashMap<&'static str, EndpointDefinition>,
}

impl Registry {
    /// Build a registry, rejecting duplicate names, malformed templates and
    /// query parameters on anything but GET.
    pub fn new(definitions: &[EndpointDefinition]) -> Result<Self, RegistryError> {
        let mut endpoints = HashMap::with_capacity(definitions.len());
        for definition in definitions {
            if template::placeholders(definition.path_template).is_none() {
                return Err(RegistryError::MalformedTemplate {
                    operation: definition.name.to_string(),
                    template: definition.path_template.to_string(),
                });
            }
            if !definition.query_params.is_empty() && definition.method != HttpMethod::Get {
                return Err(RegistryError::QueryOnNonGet {
                    operation: definition.name.to_string(),
                });
            }
            if endpoints.insert(definition.name, *definition).is_some() {
                return Err(RegistryError::DuplicateOperation(definition.name.to_string()));
            }
        }
        Ok(Self { endpoints })
    }

    /// The shared registry for the ProposalPage backend.
    pub fn standard() -> Arc<Registry> {
        Arc::clone(&STANDARD)
    }

    // The built-in catalog is checked by `catalog_passes_validation`.
    fn index(definitions: &[EndpointDefinition]) -> Self {
        Self {
            endpoints: definitions.iter().map(|d| (d.name, *d)).collect(),
        }
    }

    pub fn resolve(&self, name: &str) -> Result<&EndpointDefinition, CallError> {
        self.endpoints
            .get(name)
            .ok_or_else(|| CallError::UnknownOperation {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.endpoints.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn definitions(&self) -> impl Iterator<Item = &EndpointDefinition> {
        self.endpoints.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ops;
    use crate::error::CallErrorKind;

    #[test]
    fn catalog_passes_validation() {
        let registry = Registry::new(catalog::ENDPOINTS).unwrap();
        assert_eq!(registry.len(), catalog::ENDPOINTS.len());
    }

    #[test]
    fn standard_registry_is_shared() {
        let a = Registry::standard();
        let b = Registry::standard();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn resolves_known_operation() {
        let registry = Registry::standard();
        let endpoint = registry.resolve(ops::LIST_PROJECTS).unwrap();
        assert_eq!(endpoint.method, HttpMethod::Get);
        assert_eq!(endpoint.path_template, "/projects");
        assert_eq!(endpoint.query_params, &["page", "itemsPerPage", "title"]);
    }

    #[test]
    fn unknown_operation_is_reported() {
        let err = Registry::standard().resolve("launchRocket").unwrap_err();
        assert_eq!(err.kind(), CallErrorKind::UnknownOperation);
    }

    #[test]
    fn rejects_duplicates() {
        let defs = [
            EndpointDefinition::new("ping", HttpMethod::Get, "/ping"),
            EndpointDefinition::new("ping", HttpMethod::Post, "/ping"),
        ];
        assert_eq!(
            Registry::new(&defs).unwrap_err(),
            RegistryError::DuplicateOperation("ping".to_string())
        );
    }

    #[test]
    fn rejects_malformed_template() {
        let defs = [EndpointDefinition::new("broken", HttpMethod::Get, "/items/{id")];
        assert!(matches!(
            Registry::new(&defs),
            Err(RegistryError::MalformedTemplate { .. })
        ));
    }

    #[test]
    fn rejects_query_params_on_writes() {
        let defs =
            [EndpointDefinition::new("create", HttpMethod::Post, "/items").with_query(&["page"])];
        assert!(matches!(
            Registry::new(&defs),
            Err(RegistryError::QueryOnNonGet { .. })
        ));
    }

    #[test]
    fn placeholders_follow_template() {
        let registry = Registry::standard();
        let endpoint = registry.resolve(ops::LIST_CONTENT).unwrap();
        assert_eq!(
            endpoint.placeholders(),
            vec!["projectId", "blockId", "rowId", "columnId", "contentId"]
        );
    }
}
