//! # Material Catalog
//!
//! Explicit name-to-handle interning for materials. The catalog is an owned
//! object passed into the reconstructor by reference; there is no
//! process-wide registry. Unknown names degrade to a placeholder handle
//! instead of failing the build. Sharing across worker threads goes through
//! a `Mutex` so the look-up-then-insert sequence stays serialized.

use std::collections::HashMap;

use config::constants::PLACEHOLDER_MATERIAL;
use serde::{Deserialize, Serialize};

/// Opaque handle to a registered material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

/// Name-keyed material registry.
///
/// # Example
///
/// ```rust
/// use building_mesh::materials::MaterialCatalog;
///
/// let mut catalog = MaterialCatalog::new();
/// let brick = catalog.get_or_create("brick");
/// assert_eq!(catalog.resolve("brick"), brick);
/// // Unknown names fall back to the placeholder.
/// assert_eq!(catalog.resolve("no-such-texture"), catalog.placeholder());
/// ```
#[derive(Debug, Clone)]
pub struct MaterialCatalog {
    by_name: HashMap<String, MaterialId>,
    names: Vec<String>,
    placeholder: MaterialId,
}

impl MaterialCatalog {
    /// Creates a catalog containing only the placeholder material.
    pub fn new() -> Self {
        let mut catalog = Self {
            by_name: HashMap::new(),
            names: Vec::new(),
            placeholder: MaterialId(0),
        };
        catalog.placeholder = catalog.get_or_create(PLACEHOLDER_MATERIAL);
        catalog
    }

    /// The missing-asset fallback handle.
    #[inline]
    pub fn placeholder(&self) -> MaterialId {
        self.placeholder
    }

    /// Returns the handle for `name`, registering it if absent.
    ///
    /// This is the host-facing registration path; the reconstructor itself
    /// only resolves.
    pub fn get_or_create(&mut self, name: &str) -> MaterialId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = MaterialId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Looks up a registered material.
    pub fn lookup(&self, name: &str) -> Option<MaterialId> {
        self.by_name.get(name).copied()
    }

    /// Resolves `name`, degrading to the placeholder when unregistered.
    pub fn resolve(&self, name: &str) -> MaterialId {
        self.lookup(name).unwrap_or(self.placeholder)
    }

    /// The registered name of a handle.
    pub fn name(&self, id: MaterialId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    /// Number of registered materials, placeholder included.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if only the placeholder is registered.
    pub fn is_empty(&self) -> bool {
        self.names.len() <= 1
    }
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut catalog = MaterialCatalog::new();
        let a = catalog.get_or_create("brick");
        let b = catalog.get_or_create("brick");
        assert_eq!(a, b);
        assert_eq!(catalog.len(), 2); // placeholder + brick
    }

    #[test]
    fn test_resolve_degrades_to_placeholder() {
        let mut catalog = MaterialCatalog::new();
        catalog.get_or_create("tile");
        assert_eq!(catalog.resolve("missing"), catalog.placeholder());
        assert_ne!(catalog.resolve("tile"), catalog.placeholder());
    }

    #[test]
    fn test_names_round_trip() {
        let mut catalog = MaterialCatalog::new();
        let id = catalog.get_or_create("plaster");
        assert_eq!(catalog.name(id), Some("plaster"));
        assert_eq!(catalog.lookup("plaster"), Some(id));
    }
}
