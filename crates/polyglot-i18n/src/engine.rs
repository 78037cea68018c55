//! The translation engine: initialization, language cursor and resolution

use crate::cache::{CacheStats, CacheStore};
use crate::config::I18nConfig;
use crate::coordinator::LoadCoordinator;
use crate::error::{log_translation_error, TranslationError, TranslationResult};
use crate::interpolate::{interpolate, TranslationParams};
use crate::resolver::{lookup, missing_key, LookupSource};
use crate::tree::{DictionaryTable, NamespaceTree};
use futures::future::join_all;
use parking_lot::RwLock;
use polyglot_common::{split_key, LanguageDescriptor};
use polyglot_config::Settings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Lifecycle of an [`Engine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitState {
    /// Not yet initialized.
    Uninitialized,
    /// Initial loads are running.
    Initializing,
    /// Initial loads finished; lookups answer from dictionaries.
    Ready,
    /// Configuration was unusable. Terminal.
    Failed,
}

impl fmt::Display for InitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(state)
    }
}

struct EngineInner {
    config: I18nConfig,
    fallback_language: String,
    cache: Arc<CacheStore>,
    dictionaries: Arc<RwLock<DictionaryTable>>,
    coordinator: Arc<LoadCoordinator>,
    current_language: RwLock<String>,
    state: RwLock<InitState>,
    last_error: RwLock<Option<TranslationError>>,
    init_lock: Mutex<()>,
}

/// Resolves dotted keys against dictionaries loaded through a
/// [`TranslationLoader`](crate::TranslationLoader).
///
/// Cloning is cheap and every clone shares the same state. Lookups are
/// synchronous and only see what is already loaded; loading happens in
/// [`initialize`](Self::initialize), on language changes and in
/// [`resolve_loaded`](Self::resolve_loaded).
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("current_language", &*self.inner.current_language.read())
            .field("fallback_language", &self.inner.fallback_language)
            .field("state", &*self.inner.state.read())
            .field("cache", &self.inner.cache.stats())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates an uninitialized engine. Nothing is loaded until
    /// [`initialize`](Self::initialize) runs.
    pub fn new(config: I18nConfig) -> Self {
        let cache = Arc::new(CacheStore::from_options(&config.settings.cache));
        let dictionaries = Arc::new(RwLock::new(DictionaryTable::new()));
        let coordinator = Arc::new(LoadCoordinator::new(
            &config,
            Arc::clone(&cache),
            Arc::clone(&dictionaries),
        ));

        Self {
            inner: Arc::new(EngineInner {
                fallback_language: config.settings.effective_fallback().to_string(),
                current_language: RwLock::new(config.settings.default_language.clone()),
                config,
                cache,
                dictionaries,
                coordinator,
                state: RwLock::new(InitState::Uninitialized),
                last_error: RwLock::new(None),
                init_lock: Mutex::new(()),
            }),
        }
    }

    /// Loads every configured namespace for the current language and, if
    /// it differs, the fallback language.
    ///
    /// Idempotent: once ready, later calls return immediately. Namespace
    /// load failures leave empty namespaces and never fail initialization.
    /// Invalid settings move the engine to [`InitState::Failed`] and the
    /// error is returned here and kept for
    /// [`initialization_error`](Self::initialization_error).
    pub async fn initialize(&self) -> TranslationResult<()> {
        let _guard = self.inner.init_lock.lock().await;

        match self.state() {
            InitState::Ready => return Ok(()),
            InitState::Failed => {
                return Err(self.initialization_error().unwrap_or_else(|| {
                    TranslationError::new(
                        crate::ErrorKind::InitializationError,
                        "Engine failed to initialize",
                    )
                }))
            }
            InitState::Uninitialized | InitState::Initializing => {}
        }

        self.set_state(InitState::Initializing);
        let current = self.current_language();
        info!("Initializing translations for '{}'", current);

        if let Err(cause) = self.settings().validate() {
            let err = TranslationError::initialization(cause, &current);
            error!("Translation engine initialization failed: {}", err);
            log_translation_error(
                &err,
                &self.settings().error_handling.logging,
                self.inner.config.custom_logger.as_ref(),
            );
            *self.inner.last_error.write() = Some(err.clone());
            self.set_state(InitState::Failed);
            return Err(err);
        }

        let mut languages = vec![current];
        if self.inner.fallback_language != languages[0] {
            languages.push(self.inner.fallback_language.clone());
        }
        join_all(languages.iter().map(|language| self.load_language(language))).await;

        self.set_state(InitState::Ready);
        info!(
            "Translations ready: {} languages, {} cached namespaces",
            self.loaded_languages().len(),
            self.inner.cache.stats().size
        );
        Ok(())
    }

    /// Resolves a key in the given language, or the current one.
    ///
    /// Never fails: a key found nowhere yields the missing-key handler's
    /// output, or the full `namespace.path` key. Before the engine is
    /// ready every key is treated as missing.
    pub fn resolve(&self, key: &str, language: Option<&str>) -> String {
        if key.is_empty() {
            log_translation_error(
                &TranslationError::invalid_key(key),
                &self.settings().error_handling.logging,
                self.inner.config.custom_logger.as_ref(),
            );
            return String::new();
        }

        let language = language.map_or_else(|| self.current_language(), str::to_string);
        let (namespace, path) = split_key(key);

        if self.is_ready() {
            let table = self.inner.dictionaries.read();
            let found = lookup(
                &table,
                namespace,
                path,
                &language,
                Some(self.inner.fallback_language.as_str()),
            );
            if let Some((text, source)) = found {
                if self.settings().debug && source != LookupSource::Primary {
                    debug!(
                        "Resolved '{}' for '{}' from {:?} lookup",
                        key, language, source
                    );
                }
                return text.to_string();
            }
        }

        if self.settings().debug {
            debug!("Translation not found for key '{}' in '{}'", key, language);
        }
        missing_key(
            namespace,
            path,
            &language,
            self.inner.config.missing_key_handler.as_ref(),
        )
    }

    /// Resolves a key and substitutes `{{name}}` placeholders.
    pub fn resolve_with_params(
        &self,
        key: &str,
        params: &TranslationParams,
        language: Option<&str>,
    ) -> String {
        interpolate(&self.resolve(key, language), params)
    }

    /// Makes sure the key's namespace is loaded for the current and the
    /// fallback language, then resolves it in the current language.
    ///
    /// Covers namespaces that were not part of the initial load.
    pub async fn resolve_loaded(&self, key: &str, params: &TranslationParams) -> String {
        if !self.is_ready() {
            if let Err(err) = self.initialize().await {
                debug!("Resolving '{}' without initialized engine: {}", key, err);
            }
        }

        let language = self.current_language();
        let (namespace, _) = split_key(key);
        self.ensure_loaded(&language, namespace).await;
        if self.inner.fallback_language != language {
            self.ensure_loaded(&self.inner.fallback_language, namespace)
                .await;
        }

        self.resolve_with_params(key, params, Some(&language))
    }

    /// Loads one namespace of one language unless it is cached.
    ///
    /// A namespace that cannot be loaded in either the requested or the
    /// fallback language comes back empty.
    pub async fn ensure_loaded(&self, language: &str, namespace: &str) -> Arc<NamespaceTree> {
        match self.inner.coordinator.ensure_loaded(language, namespace).await {
            Ok(tree) => tree,
            Err(err) => {
                debug!("Namespace {}:{} left empty: {}", language, namespace, err);
                Arc::new(NamespaceTree::new())
            }
        }
    }

    /// Switches the current language.
    ///
    /// Takes effect immediately. When the language has no loaded
    /// dictionaries yet and a tokio runtime is available, its namespaces
    /// are loaded in the background and the task handle is returned;
    /// until then lookups go through the fallback chain.
    pub fn set_language(&self, language: &str) -> Option<JoinHandle<()>> {
        if !self.switch_language(language) {
            return None;
        }

        if self.inner.dictionaries.read().has_language(language) {
            return None;
        }

        let Ok(handle) = Handle::try_current() else {
            warn!(
                "No async runtime available, '{}' will load on the next reload",
                language
            );
            return None;
        };

        let engine = self.clone();
        let language = language.to_string();
        Some(handle.spawn(async move {
            engine.load_language(&language).await;
        }))
    }

    /// Switches the current language and waits for its namespaces to load.
    pub async fn change_language(&self, language: &str) {
        if self.switch_language(language) && !self.inner.dictionaries.read().has_language(language)
        {
            self.load_language(language).await;
        }
    }

    fn switch_language(&self, language: &str) -> bool {
        if language.trim().is_empty() {
            warn!("Ignoring invalid language '{}'", language);
            return false;
        }

        if self.settings().language(language).is_none()
            && !self.settings().supported_languages.is_empty()
        {
            debug!("Language '{}' is not in the supported list", language);
        }

        let mut current = self.inner.current_language.write();
        if *current == language {
            return false;
        }
        info!("Switching language from '{}' to '{}'", current, language);
        *current = language.to_string();
        true
    }

    async fn load_language(&self, language: &str) {
        for namespace in &self.settings().namespaces {
            self.ensure_loaded(language, namespace).await;
        }
    }

    /// Current language code.
    pub fn current_language(&self) -> String {
        self.inner.current_language.read().clone()
    }

    /// Fallback language in effect.
    pub fn fallback_language(&self) -> &str {
        &self.inner.fallback_language
    }

    /// Configured languages, in configuration order.
    pub fn supported_languages(&self) -> &[LanguageDescriptor] {
        &self.settings().supported_languages
    }

    /// Whether initialization has completed.
    pub fn is_ready(&self) -> bool {
        self.state() == InitState::Ready
    }

    /// Current lifecycle state.
    pub fn state(&self) -> InitState {
        *self.inner.state.read()
    }

    fn set_state(&self, state: InitState) {
        debug!("Engine state -> {}", state);
        *self.inner.state.write() = state;
    }

    /// The error that failed initialization, if any.
    pub fn initialization_error(&self) -> Option<TranslationError> {
        self.inner.last_error.read().clone()
    }

    /// Empties the cache and resets its counters. Dictionaries already
    /// loaded keep answering lookups.
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
        info!("Translation cache cleared");
    }

    /// Cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.stats()
    }

    /// Reloads every loaded `(language, namespace)` from the loader.
    ///
    /// An engine that is not ready yet is initialized instead.
    pub async fn reload_all(&self) -> TranslationResult<()> {
        if !self.is_ready() {
            return self.initialize().await;
        }

        let slots: Vec<(String, String)> = self
            .inner
            .dictionaries
            .read()
            .iter()
            .map(|(language, namespace, _)| (language.to_string(), namespace.to_string()))
            .collect();

        info!("Reloading {} namespaces", slots.len());
        for (language, namespace) in &slots {
            self.inner.coordinator.invalidate(language, namespace);
        }
        join_all(
            slots
                .iter()
                .map(|(language, namespace)| self.ensure_loaded(language, namespace)),
        )
        .await;
        Ok(())
    }

    /// Seeds the engine from a preloaded table, e.g. a server snapshot,
    /// and marks it ready.
    pub fn hydrate(&self, table: DictionaryTable) {
        let mut dictionaries = self.inner.dictionaries.write();
        for (language, namespace, tree) in table.iter() {
            self.inner.cache.put(language, namespace, Arc::clone(tree));
            dictionaries.insert(language, namespace, Arc::clone(tree));
        }
        drop(dictionaries);

        if self.state() == InitState::Failed {
            warn!("Hydrated an engine whose initialization failed");
            return;
        }
        self.set_state(InitState::Ready);
    }

    /// Languages with loaded dictionaries, sorted.
    pub fn loaded_languages(&self) -> Vec<String> {
        self.inner.dictionaries.read().languages()
    }

    /// Namespaces loaded for a language, sorted.
    pub fn loaded_namespaces(&self, language: &str) -> Vec<String> {
        self.inner.dictionaries.read().namespaces(language)
    }

    /// Copy of every loaded dictionary.
    pub fn dictionary_snapshot(&self) -> DictionaryTable {
        self.inner.dictionaries.read().clone()
    }

    /// Settings the engine was built from.
    pub fn settings(&self) -> &Settings {
        &self.inner.config.settings
    }

    /// Full configuration.
    pub fn config(&self) -> &I18nConfig {
        &self.inner.config
    }

    /// Whether two handles share the same engine.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::StaticLoader;
    use crate::params;
    use polyglot_common::test_utils::{sample_dictionaries, sample_languages};

    fn engine(settings: Settings) -> Engine {
        Engine::new(I18nConfig::new(
            settings,
            StaticLoader::new(sample_dictionaries()),
        ))
    }

    fn settings() -> Settings {
        Settings::new("ko")
            .with_fallback("en")
            .with_languages(sample_languages())
            .with_namespaces(["common", "diary"])
    }

    #[tokio::test]
    async fn test_state_transitions() {
        let engine = engine(settings());
        assert_eq!(engine.state(), InitState::Uninitialized);
        assert!(!engine.is_ready());

        engine.initialize().await.unwrap();
        assert_eq!(engine.state(), InitState::Ready);
        assert!(engine.initialization_error().is_none());
        assert_eq!(engine.loaded_languages(), vec!["en", "ko"]);
        assert_eq!(engine.loaded_namespaces("ko"), vec!["common", "diary"]);
    }

    #[tokio::test]
    async fn test_resolve_before_ready_echoes_key() {
        let engine = engine(settings());
        assert_eq!(engine.resolve("common.welcome", None), "common.welcome");
        assert_eq!(engine.resolve("welcome", None), "common.welcome");
    }

    #[tokio::test]
    async fn test_invalid_settings_fail_initialization() {
        let engine = engine(Settings::new(""));
        let err = engine.initialize().await.unwrap_err();
        assert_eq!(err.kind, crate::ErrorKind::InitializationError);
        assert_eq!(engine.state(), InitState::Failed);
        assert!(engine.initialization_error().is_some());

        // terminal and still answering in degraded mode
        assert!(engine.initialize().await.is_err());
        assert_eq!(engine.resolve("common.welcome", None), "common.welcome");
    }

    #[tokio::test]
    async fn test_empty_key_resolves_to_empty_string() {
        let engine = engine(settings());
        engine.initialize().await.unwrap();
        assert_eq!(engine.resolve("", None), "");
    }

    #[tokio::test]
    async fn test_explicit_language_overrides_cursor() {
        let engine = engine(settings());
        engine.initialize().await.unwrap();
        assert_eq!(engine.resolve("common.hello", Some("en")), "Hello");
        assert_eq!(engine.resolve("common.hello", None), "안녕하세요");
        assert_eq!(
            engine.resolve_with_params("common.greeting", &params! { "name" => "Cheolsu" }, Some("en")),
            "Hello, Cheolsu!"
        );
    }

    #[tokio::test]
    async fn test_set_language_loads_in_background() {
        let settings = Settings::new("ko")
            .with_languages(sample_languages())
            .with_namespaces(["common"]);
        let engine = engine(settings);
        engine.initialize().await.unwrap();
        assert_eq!(engine.loaded_languages(), vec!["ko"]);

        let handle = engine.set_language("en").expect("background load");
        assert_eq!(engine.current_language(), "en");
        handle.await.unwrap();
        assert_eq!(engine.resolve("common.welcome", None), "Welcome");

        // already loaded, nothing to spawn
        assert!(engine.set_language("ko").is_none());
        assert!(engine.set_language("").is_none());
        assert_eq!(engine.current_language(), "ko");
    }

    #[tokio::test]
    async fn test_hydrate_marks_ready() {
        let engine = engine(settings());
        let table = DictionaryTable::from_json(sample_dictionaries()).unwrap();
        engine.hydrate(table);

        assert!(engine.is_ready());
        assert_eq!(engine.resolve("diary.writeDiary", None), "일기 쓰기");
        assert_eq!(engine.cache_stats().size, 4);
    }

    #[tokio::test]
    async fn test_reload_all_keeps_dictionaries() {
        let engine = engine(settings());
        engine.initialize().await.unwrap();
        engine.clear_cache();
        assert_eq!(engine.cache_stats(), CacheStats::default());
        assert_eq!(engine.resolve("common.welcome", None), "환영합니다");

        engine.reload_all().await.unwrap();
        assert_eq!(engine.cache_stats().size, 4);
        assert_eq!(engine.resolve("common.welcome", None), "환영합니다");
    }
}
