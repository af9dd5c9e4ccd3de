//! Vendor registry.

use std::sync::Arc;

use dashmap::DashMap;
use pagechat_config::Config;
use tracing::debug;

use crate::adapter::{AdapterConfig, ChatAdapter};
use crate::error::RegistryError;
use crate::normalizer::Normalizer;
use crate::profile::VendorProfile;
use crate::vendors::Vendor;

/// Vendor profiles by id. Safe to query from many tasks at once.
pub struct VendorRegistry {
    profiles: DashMap<String, Arc<VendorProfile>>,
}

impl VendorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            profiles: DashMap::new(),
        }
    }

    /// Registry holding every built-in vendor.
    pub fn builtin() -> Self {
        let registry = Self::new();
        for vendor in Vendor::ALL {
            registry.profiles.insert(vendor.as_str().to_string(), Arc::new(vendor.profile()));
        }
        registry
    }

    /// Built-in vendors with the configured overrides applied.
    ///
    /// Overrides for an unknown vendor id are rejected rather than ignored.
    pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
        let registry = Self::builtin();
        for (id, overrides) in &config.vendors {
            let mut entry = registry
                .profiles
                .get_mut(id)
                .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
            let patched = entry.with_override(overrides);
            *entry = Arc::new(patched);
            debug!("Applied configured overrides to vendor {}", id);
        }
        Ok(registry)
    }

    /// Register a profile after checking its cleanup rules compile.
    pub fn register(&self, profile: VendorProfile) -> Result<(), RegistryError> {
        let id = profile.id.clone();

        if self.profiles.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }
        Normalizer::new(&profile.cleanup).map_err(|source| RegistryError::InvalidRule {
            vendor: id.clone(),
            source,
        })?;

        self.profiles.insert(id, Arc::new(profile));
        Ok(())
    }

    pub fn resolve(&self, id: &str) -> Result<Arc<VendorProfile>, RegistryError> {
        self.profiles
            .get(id)
            .map(|p| p.clone())
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// Build an adapter for a registered vendor.
    pub fn adapter(&self, id: &str, config: AdapterConfig) -> Result<ChatAdapter, RegistryError> {
        let profile = self.resolve(id)?;
        ChatAdapter::new(profile, config).map_err(|source| RegistryError::InvalidRule {
            vendor: id.to_string(),
            source,
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.profiles.contains_key(id)
    }

    /// Registered vendor ids, sorted.
    pub fn vendor_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.profiles.iter().map(|p| p.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for VendorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
