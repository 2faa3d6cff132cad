//! Opaque asset handles passed through to tile variants.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A resource owned by the caller (texture, sprite, anything).
///
/// The generator never looks inside; renderers downcast it back.
#[derive(Clone)]
pub struct AssetHandle(Arc<dyn Any + Send + Sync>);

impl AssetHandle {
    pub fn new<T: Any + Send + Sync>(asset: T) -> Self {
        Self(Arc::new(asset))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Whether two handles point at the same resource.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetHandle").finish_non_exhaustive()
    }
}

/// Logical asset name to handle.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    handles: HashMap<String, AssetHandle>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, handle: AssetHandle) -> Option<AssetHandle> {
        self.handles.insert(name.into(), handle)
    }

    pub fn get(&self, name: &str) -> Option<&AssetHandle> {
        self.handles.get(name)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_round_trip_through_registry() {
        let mut registry = AssetRegistry::new();
        registry.insert("grass", AssetHandle::new(String::from("grass.png")));
        let handle = registry.get("grass").expect("grass registered");
        assert_eq!(handle.downcast_ref::<String>().map(String::as_str), Some("grass.png"));
        assert!(handle.downcast_ref::<u32>().is_none());
        assert!(registry.get("water").is_none());
    }
}
