//! Deduplicated, retried dictionary loading

use crate::cache::CacheStore;
use crate::config::{ErrorHandler, I18nConfig};
use crate::error::{log_translation_error, CustomLogger, TranslationError, TranslationResult};
use crate::loader::TranslationLoader;
use crate::recovery::RecoveryStrategy;
use crate::tree::{DictionaryTable, NamespaceTree};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::RwLock;
use polyglot_common::LanguagePair;
use polyglot_config::LoggingOptions;
use std::fmt;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

type SharedLoad = Shared<BoxFuture<'static, TranslationResult<Arc<NamespaceTree>>>>;

/// How much effort a running load puts into its pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    /// Retries, then the fallback language.
    Full,
    /// One try on behalf of another pair's fallback.
    Single,
}

#[derive(Clone)]
struct InFlight {
    load: SharedLoad,
    attempt: Attempt,
}

/// Loads dictionaries into a cache and a dictionary table.
///
/// At most one load per `(language, namespace)` runs at a time; callers
/// arriving while it runs await the same result. That includes fallback
/// attempts made on behalf of another pair.
pub struct LoadCoordinator {
    loader: Arc<dyn TranslationLoader>,
    strategy: RecoveryStrategy,
    fallback_language: Option<String>,
    error_handler: Option<ErrorHandler>,
    logging: LoggingOptions,
    custom_logger: Option<CustomLogger>,
    cache: Arc<CacheStore>,
    dictionaries: Arc<RwLock<DictionaryTable>>,
    in_flight: DashMap<LanguagePair, InFlight>,
}

impl fmt::Debug for LoadCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadCoordinator")
            .field("strategy", &self.strategy)
            .field("fallback_language", &self.fallback_language)
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

impl LoadCoordinator {
    /// Creates a coordinator writing into the given cache and table.
    pub fn new(
        config: &I18nConfig,
        cache: Arc<CacheStore>,
        dictionaries: Arc<RwLock<DictionaryTable>>,
    ) -> Self {
        Self {
            loader: Arc::clone(&config.loader),
            strategy: config.recovery_strategy(),
            fallback_language: Some(config.settings.effective_fallback().to_string()),
            error_handler: config.error_handler.clone(),
            logging: config.settings.error_handling.logging.clone(),
            custom_logger: config.custom_logger.clone(),
            cache,
            dictionaries,
            in_flight: DashMap::new(),
        }
    }

    /// Language used when a load fails.
    pub fn fallback_language(&self) -> Option<&str> {
        self.fallback_language.as_deref()
    }

    /// Number of loads currently running.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Returns the dictionary for the pair, loading it if it is not cached.
    ///
    /// A load that fails in both the requested and the fallback language
    /// leaves an empty tree in the dictionary table and returns the
    /// primary error.
    pub async fn ensure_loaded(
        self: &Arc<Self>,
        language: &str,
        namespace: &str,
    ) -> TranslationResult<Arc<NamespaceTree>> {
        let pair = LanguagePair::new(language, namespace);

        loop {
            if let Some(tree) = self.cache.get(language, namespace) {
                return Ok(tree);
            }

            let (load, attempt) = self.join_or_start(&pair, Attempt::Full);
            match load.await {
                // a failed single try has not used this pair's retries yet
                Err(err) if attempt == Attempt::Single => {
                    debug!("Fallback try for {} failed ({}), loading it fully", pair, err);
                }
                result => return result,
            }
        }
    }

    /// Drops the cached entry for a pair so the next
    /// [`ensure_loaded`](Self::ensure_loaded) reloads it.
    pub fn invalidate(&self, language: &str, namespace: &str) -> bool {
        self.cache.invalidate(language, namespace)
    }

    fn join_or_start(
        self: &Arc<Self>,
        pair: &LanguagePair,
        attempt: Attempt,
    ) -> (SharedLoad, Attempt) {
        match self.in_flight.entry(pair.clone()) {
            Entry::Occupied(entry) => {
                debug!("Joining in-flight load for {}", pair);
                let running = entry.get();
                (running.load.clone(), running.attempt)
            }
            Entry::Vacant(entry) => {
                let this = Arc::clone(self);
                let key = pair.clone();
                let load = async move {
                    let result = match attempt {
                        Attempt::Full => this.load_pair(&key).await,
                        Attempt::Single => this.load_single(&key).await,
                    };
                    this.in_flight.remove(&key);
                    result
                }
                .boxed()
                .shared();
                entry.insert(InFlight {
                    load: load.clone(),
                    attempt,
                });
                (load, attempt)
            }
        }
    }

    #[instrument(skip_all, fields(pair = %pair))]
    async fn load_pair(
        self: &Arc<Self>,
        pair: &LanguagePair,
    ) -> TranslationResult<Arc<NamespaceTree>> {
        let primary_err = match self.load_with_retry(pair).await {
            Ok(tree) => {
                self.store(pair, Arc::clone(&tree), true);
                return Ok(tree);
            }
            Err(err) => err,
        };

        if let Some(tree) = self.load_fallback(pair).await {
            self.store(pair, Arc::clone(&tree), true);
            return Ok(tree);
        }

        warn!("No translations available for {}, using an empty namespace", pair);
        self.store(pair, Arc::new(NamespaceTree::new()), false);
        Err(primary_err)
    }

    async fn load_with_retry(&self, pair: &LanguagePair) -> TranslationResult<Arc<NamespaceTree>> {
        let max_retries = self.strategy.max_retries();
        let mut retry_count = 0;

        loop {
            match self.load_once(pair).await {
                Ok(tree) => {
                    if retry_count > 0 {
                        info!("Loaded {} after {} retries", pair, retry_count);
                    }
                    return Ok(tree);
                }
                Err(err) => {
                    let err = err.with_retries(retry_count, max_retries);
                    self.report(&err, pair);

                    if !self.strategy.should_retry(&err) {
                        if self.strategy.is_exhausted(&err) {
                            warn!("Giving up on {} after {} retries", pair, retry_count);
                            self.strategy.notify_exhausted(&err);
                        }
                        return Err(err);
                    }

                    retry_count += 1;
                    let delay = self.strategy.delay_for_attempt(retry_count);
                    self.strategy.notify_retry(&err, retry_count);
                    debug!(
                        "Retrying {} ({}/{}) after {:?}",
                        pair, retry_count, max_retries, delay
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    /// The fallback language's dictionary for the pair's namespace.
    ///
    /// Served from the cache or from a load already running for it;
    /// otherwise one try, never retried.
    async fn load_fallback(
        self: &Arc<Self>,
        pair: &LanguagePair,
    ) -> Option<Arc<NamespaceTree>> {
        let fallback = self
            .fallback_language
            .as_deref()
            .filter(|fallback| *fallback != pair.language)?;

        let tree = match self.cache.get(fallback, &pair.namespace) {
            Some(tree) => tree,
            None => {
                let fallback_pair = LanguagePair::new(fallback, pair.namespace.as_str());
                let (load, _) = self.join_or_start(&fallback_pair, Attempt::Single);
                load.await.ok()?
            }
        };

        info!("Using {} translations for {}", fallback, pair);
        Some(tree)
    }

    async fn load_single(&self, pair: &LanguagePair) -> TranslationResult<Arc<NamespaceTree>> {
        match self.load_once(pair).await {
            Ok(tree) => {
                self.store(pair, Arc::clone(&tree), true);
                Ok(tree)
            }
            Err(err) => {
                self.report(&err, pair);
                Err(err)
            }
        }
    }

    async fn load_once(&self, pair: &LanguagePair) -> TranslationResult<Arc<NamespaceTree>> {
        let value = self
            .loader
            .load(&pair.language, &pair.namespace)
            .await
            .map_err(|err| TranslationError::from_loader(err, pair))?;

        let tree = NamespaceTree::from_json(value)
            .map_err(|err| TranslationError::malformed(pair, err.found))?;

        debug!("Loaded {} entries for {}", tree.leaf_count(), pair);
        Ok(Arc::new(tree))
    }

    fn report(&self, err: &TranslationError, pair: &LanguagePair) {
        if let Some(handler) = &self.error_handler {
            handler(err, &pair.language, &pair.namespace);
        }
        log_translation_error(err, &self.logging, self.custom_logger.as_ref());
    }

    fn store(&self, pair: &LanguagePair, tree: Arc<NamespaceTree>, cache: bool) {
        if cache {
            self.cache
                .put(&pair.language, &pair.namespace, Arc::clone(&tree));
        }
        self.dictionaries
            .write()
            .insert(&pair.language, &pair.namespace, tree);
    }
}
