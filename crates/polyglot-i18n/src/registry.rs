//! One shared engine per configuration fingerprint

use crate::config::I18nConfig;
use crate::engine::Engine;
use parking_lot::Mutex;
use polyglot_config::Settings;
use std::collections::HashMap;
use tracing::{debug, info};

/// Identity of a configuration for instance reuse.
///
/// Built from the default language, the effective fallback language, the
/// namespaces in order and the debug flag.
pub fn fingerprint(settings: &Settings) -> String {
    format!(
        "{}|{}|{}|{}",
        settings.default_language,
        settings.effective_fallback(),
        settings.namespaces.join(","),
        if settings.debug { "debug" } else { "prod" }
    )
}

/// Whether two settings differ in a field the fingerprint is built from.
fn fingerprint_fields_changed(old: &Settings, new: &Settings) -> bool {
    old.default_language != new.default_language
        || old.fallback_language != new.fallback_language
        || old.namespaces != new.namespaces
        || old.debug != new.debug
}

/// Hands out engines, reusing one per configuration fingerprint.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: Mutex<HashMap<String, (Settings, Engine)>>,
}

impl InstanceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the engine registered for the configuration's fingerprint,
    /// creating it if needed.
    ///
    /// The engine is not initialized here. When the stored configuration
    /// differs in a fingerprinted field, its cache is discarded and a new
    /// engine replaces it.
    pub fn create(&self, config: I18nConfig) -> Engine {
        let key = fingerprint(&config.settings);
        let mut instances = self.instances.lock();

        if let Some((settings, engine)) = instances.get(&key) {
            if !fingerprint_fields_changed(settings, &config.settings) {
                debug!("Reusing translation engine for '{}'", key);
                return engine.clone();
            }
            info!("Configuration for '{}' changed, discarding old engine", key);
            engine.clear_cache();
        }

        info!("Creating translation engine for '{}'", key);
        let settings = config.settings.clone();
        let engine = Engine::new(config);
        instances.insert(key, (settings, engine.clone()));
        engine
    }

    /// Returns the engine registered for the settings, if any.
    pub fn get(&self, settings: &Settings) -> Option<Engine> {
        self.instances
            .lock()
            .get(&fingerprint(settings))
            .map(|(_, engine)| engine.clone())
    }

    /// Drops the engine registered for the settings, clearing its cache.
    pub fn clear_config(&self, settings: &Settings) -> bool {
        let removed = self.instances.lock().remove(&fingerprint(settings));
        removed.is_some_and(|(_, engine)| {
            engine.clear_cache();
            true
        })
    }

    /// Drops every engine, clearing their caches.
    pub fn clear(&self) {
        let drained: Vec<Engine> = self
            .instances
            .lock()
            .drain()
            .map(|(_, (_, engine))| engine)
            .collect();
        for engine in &drained {
            engine.clear_cache();
        }
        info!("Cleared {} translation engines", drained.len());
    }

    /// Number of registered engines.
    pub fn instance_count(&self) -> usize {
        self.instances.lock().len()
    }

    /// Registered fingerprints, sorted.
    pub fn fingerprints(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.instances.lock().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::StaticLoader;
    use serde_json::json;

    fn config(settings: Settings) -> I18nConfig {
        I18nConfig::new(settings, StaticLoader::new(json!({})))
    }

    #[test]
    fn test_fingerprint_uses_effective_fallback() {
        let implicit = Settings::new("ko");
        let explicit = Settings::new("ko").with_fallback("ko");
        assert_eq!(fingerprint(&implicit), fingerprint(&explicit));
        assert_eq!(fingerprint(&implicit), "ko|ko|common|prod");
    }

    #[test]
    fn test_fingerprint_is_order_sensitive() {
        let a = Settings::new("ko").with_namespaces(["common", "auth"]);
        let b = Settings::new("ko").with_namespaces(["auth", "common"]);
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_same_fingerprint_reuses_engine() {
        let registry = InstanceRegistry::new();
        let first = registry.create(config(Settings::new("ko").with_fallback("en")));
        let second = registry.create(config(Settings::new("ko").with_fallback("en")));
        assert!(first.ptr_eq(&second));
        assert_eq!(registry.instance_count(), 1);
        assert!(registry
            .get(&Settings::new("ko").with_fallback("en"))
            .is_some_and(|engine| engine.ptr_eq(&first)));
    }

    #[tokio::test]
    async fn test_changed_fields_replace_engine() {
        let registry = InstanceRegistry::new();
        let implicit = registry.create(I18nConfig::new(
            Settings::new("ko"),
            StaticLoader::new(json!({ "ko": { "common": { "welcome": "환영합니다" } } })),
        ));
        implicit.initialize().await.unwrap();
        assert_eq!(implicit.cache_stats().size, 1);

        let explicit = registry.create(config(Settings::new("ko").with_fallback("ko")));
        assert!(!implicit.ptr_eq(&explicit));
        assert_eq!(registry.instance_count(), 1);
        assert_eq!(implicit.cache_stats().size, 0);
        assert!(registry
            .get(&Settings::new("ko"))
            .is_some_and(|engine| engine.ptr_eq(&explicit)));
    }

    #[test]
    fn test_different_fingerprints_coexist() {
        let registry = InstanceRegistry::new();
        registry.create(config(Settings::new("ko")));
        registry.create(config(Settings::new("en").with_debug(true)));
        assert_eq!(
            registry.fingerprints(),
            vec!["en|en|common|debug", "ko|ko|common|prod"]
        );

        assert!(registry.clear_config(&Settings::new("ko")));
        assert!(!registry.clear_config(&Settings::new("ko")));
        assert_eq!(registry.instance_count(), 1);

        registry.clear();
        assert_eq!(registry.instance_count(), 0);
        assert!(registry.get(&Settings::new("en").with_debug(true)).is_none());
    }
}
