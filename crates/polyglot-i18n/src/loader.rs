//! Translation loaders: the source of namespace dictionaries

use crate::error::LoaderError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::fmt;
use std::future::Future;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Produces the raw JSON dictionary for one `(language, namespace)`.
///
/// Return `{}` for a namespace that does not exist to get silent empty
/// behavior; an error goes through the retry and fallback policy instead.
#[async_trait]
pub trait TranslationLoader: Send + Sync {
    /// Loads one namespace of one language.
    async fn load(&self, language: &str, namespace: &str) -> Result<Value, LoaderError>;
}

/// Loader backed by an async closure.
pub struct FnLoader<F> {
    func: F,
}

impl<F> fmt::Debug for FnLoader<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnLoader").finish_non_exhaustive()
    }
}

/// Wraps an async closure `(language, namespace) -> Result<Value, LoaderError>`
/// as a [`TranslationLoader`].
pub const fn loader_fn<F, Fut>(func: F) -> FnLoader<F>
where
    F: Fn(String, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, LoaderError>> + Send + 'static,
{
    FnLoader { func }
}

#[async_trait]
impl<F, Fut> TranslationLoader for FnLoader<F>
where
    F: Fn(String, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, LoaderError>> + Send + 'static,
{
    async fn load(&self, language: &str, namespace: &str) -> Result<Value, LoaderError> {
        (self.func)(language.to_string(), namespace.to_string()).await
    }
}

/// In-memory loader over a `{ language: { namespace: tree } }` document.
///
/// Unknown pairs load as `{}`.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    dictionaries: Value,
}

impl StaticLoader {
    /// Creates a loader over the given document.
    pub const fn new(dictionaries: Value) -> Self {
        Self { dictionaries }
    }
}

#[async_trait]
impl TranslationLoader for StaticLoader {
    async fn load(&self, language: &str, namespace: &str) -> Result<Value, LoaderError> {
        Ok(self
            .dictionaries
            .get(language)
            .and_then(|namespaces| namespaces.get(namespace))
            .cloned()
            .unwrap_or_else(|| json!({})))
    }
}

/// Loads `<root>/<language>/<namespace>.json` from disk.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
    missing_as_empty: bool,
}

impl DirectoryLoader {
    /// Creates a loader rooted at `root`. Missing files are errors.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            missing_as_empty: false,
        }
    }

    /// Makes missing files load as `{}` instead of failing.
    #[must_use]
    pub const fn missing_as_empty(mut self, enabled: bool) -> Self {
        self.missing_as_empty = enabled;
        self
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding one namespace.
    pub fn path_for(&self, language: &str, namespace: &str) -> Result<PathBuf, LoaderError> {
        check_segment(language)?;
        check_segment(namespace)?;
        Ok(self.root.join(language).join(format!("{namespace}.json")))
    }
}

fn check_segment(segment: &str) -> Result<(), LoaderError> {
    let invalid = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\'])
        || segment.contains('\0');
    if invalid {
        return Err(LoaderError::Other(format!(
            "Refusing to load from path segment '{segment}'"
        )));
    }
    Ok(())
}

#[async_trait]
impl TranslationLoader for DirectoryLoader {
    async fn load(&self, language: &str, namespace: &str) -> Result<Value, LoaderError> {
        let path = self.path_for(language, namespace)?;
        debug!("Loading dictionary file: {:?}", path);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == IoErrorKind::NotFound => {
                if self.missing_as_empty {
                    debug!("Dictionary file {:?} missing, using empty namespace", path);
                    return Ok(json!({}));
                }
                warn!("Dictionary file does not exist: {:?}", path);
                return Err(LoaderError::NotFound(path.to_string_lossy().to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;
    use tempfile::TempDir;
    use tokio_test::assert_ok;

    fn write(dir: &TempDir, language: &str, namespace: &str, body: &str) {
        let lang_dir = dir.path().join(language);
        fs::create_dir_all(&lang_dir).unwrap();
        fs::write(lang_dir.join(format!("{namespace}.json")), body).unwrap();
    }

    #[tokio::test]
    async fn test_directory_loader_reads_json() {
        let dir = TempDir::new().unwrap();
        write(&dir, "ko", "common", r#"{ "welcome": "환영합니다" }"#);

        let loader = DirectoryLoader::new(dir.path());
        let value = loader.load("ko", "common").await.unwrap();
        assert_eq!(value["welcome"], "환영합니다");
    }

    #[tokio::test]
    async fn test_directory_loader_missing_file() {
        let dir = TempDir::new().unwrap();

        let strict = DirectoryLoader::new(dir.path());
        let err = strict.load("ko", "auth").await.unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
        assert_eq!(err.kind(), ErrorKind::LoadFailed);

        let lenient = DirectoryLoader::new(dir.path()).missing_as_empty(true);
        assert_eq!(lenient.load("ko", "auth").await.unwrap(), json!({}));
    }

    #[tokio::test]
    async fn test_directory_loader_invalid_json() {
        let dir = TempDir::new().unwrap();
        write(&dir, "en", "common", "{ not json");

        let err = DirectoryLoader::new(dir.path())
            .load("en", "common")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }

    #[tokio::test]
    async fn test_directory_loader_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let loader = DirectoryLoader::new(dir.path());
        assert!(loader.load("..", "common").await.is_err());
        assert!(loader.load("en", "../secrets").await.is_err());
        assert!(loader.path_for("en", "common").is_ok());
    }

    #[test]
    fn test_static_loader() {
        let loader = StaticLoader::new(json!({ "en": { "common": { "hello": "Hello" } } }));
        let hello = tokio_test::block_on(loader.load("en", "common"));
        assert_eq!(assert_ok!(hello)["hello"], "Hello");
        let unknown = tokio_test::block_on(loader.load("fr", "common"));
        assert_eq!(assert_ok!(unknown), json!({}));
    }

    #[tokio::test]
    async fn test_fn_loader() {
        let loader = loader_fn(|language: String, namespace: String| async move {
            if language == "en" {
                Ok(json!({ "ns": namespace }))
            } else {
                Err(LoaderError::Network("offline".into()))
            }
        });

        assert_eq!(loader.load("en", "auth").await.unwrap()["ns"], "auth");
        assert!(matches!(
            loader.load("ko", "auth").await,
            Err(LoaderError::Network(_))
        ));
    }
}
