//! Test utilities and shared fixtures for the polyglot workspace.
//!
//! This module provides logging setup and dictionary fixtures that can be
//! used across all crates in the workspace for unit and integration testing.

use crate::LanguageDescriptor;
use serde_json::{json, Value};
use std::sync::Once;

#[cfg(feature = "tracing-subscriber")]
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
#[cfg(feature = "tracing-subscriber")]
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// No-op version when tracing-subscriber is not available
#[cfg(not(feature = "tracing-subscriber"))]
pub fn init_test_logging() {
    INIT.call_once(|| {});
}

/// Korean and English descriptors used by most fixtures.
pub fn sample_languages() -> Vec<LanguageDescriptor> {
    vec![
        LanguageDescriptor::new("ko", "Korean", "한국어"),
        LanguageDescriptor::new("en", "English", "English"),
    ]
}

/// A two-language, two-namespace dictionary table as raw JSON.
///
/// Shape: `{ language: { namespace: tree } }`.
pub fn sample_dictionaries() -> Value {
    json!({
        "ko": {
            "common": {
                "welcome": "환영합니다",
                "hello": "안녕하세요",
                "greeting": "안녕하세요, {{name}}님!",
                "buttons": { "save": "저장", "cancel": "취소" }
            },
            "diary": {
                "todayEmotion": "오늘의 감정",
                "writeDiary": "일기 쓰기"
            }
        },
        "en": {
            "common": {
                "welcome": "Welcome",
                "hello": "Hello",
                "greeting": "Hello, {{name}}!",
                "goodbye": "Goodbye",
                "buttons": { "save": "Save", "cancel": "Cancel" }
            },
            "diary": {
                "todayEmotion": "Today's Emotion",
                "writeDiary": "Write Diary",
                "onlyInEnglish": "English only"
            }
        }
    })
}
