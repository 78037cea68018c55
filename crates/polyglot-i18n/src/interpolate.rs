//! `{{name}}` placeholder substitution

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// A value substituted into a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Text, inserted as-is.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean, inserted as `true`/`false`.
    Bool(bool),
    /// Explicit null; the placeholder is left in place.
    Null,
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Null => Ok(()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

macro_rules! integer_param {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::Integer(i64::from(value))
                }
            }
        )+
    };
}

integer_param!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or_else(|_| Self::Text(value.to_string()), Self::Integer)
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or_else(|_| Self::Text(value.to_string()), Self::Integer)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Parameters for [`interpolate`], keyed by placeholder name.
pub type TranslationParams = HashMap<String, ParamValue>;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("Invalid placeholder regex pattern"));

/// Replaces every `{{identifier}}` in `text` with the matching parameter.
///
/// Placeholders without a parameter, or whose parameter is
/// [`ParamValue::Null`], stay in the output verbatim.
pub fn interpolate(text: &str, params: &TranslationParams) -> String {
    if params.is_empty() || !text.contains("{{") {
        return text.to_string();
    }

    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| {
            let name = &caps[1];
            match params.get(name) {
                Some(ParamValue::Null) | None => {
                    debug!("No value for placeholder '{}'", name);
                    caps[0].to_string()
                }
                Some(value) => value.to_string(),
            }
        })
        .into_owned()
}

/// Builds [`TranslationParams`] from `name => value` pairs.
///
/// ```
/// use polyglot_i18n::{interpolate, params};
///
/// let params = params! { "name" => "Cheolsu", "count" => 3 };
/// assert_eq!(interpolate("{{name}} has {{count}}", &params), "Cheolsu has 3");
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::TranslationParams::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::TranslationParams::new();
        $(
            params.insert(::std::string::String::from($key), $crate::ParamValue::from($value));
        )+
        params
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn test_substitutes_placeholder() {
        let params = params! { "name" => "Cheolsu" };
        assert_eq!(
            interpolate("안녕하세요, {{name}}님!", &params),
            "안녕하세요, Cheolsu님!"
        );
    }

    #[test]
    fn test_missing_param_left_verbatim() {
        let params = params! { "other" => 1 };
        assert_eq!(
            interpolate("Hello, {{name}}!", &params),
            "Hello, {{name}}!"
        );
        assert_eq!(interpolate("Hello, {{name}}!", &params!()), "Hello, {{name}}!");
    }

    #[test]
    fn test_null_param_left_verbatim() {
        let params = params! { "name" => None::<&str> };
        assert_eq!(interpolate("Hi {{name}}", &params), "Hi {{name}}");
    }

    #[test]
    fn test_repeated_and_mixed_values() {
        let params = params! {
            "a" => 1_u32,
            "b" => true,
            "c" => 1.5,
        };
        assert_eq!(
            interpolate("{{a}}/{{b}}/{{c}}/{{a}}", &params),
            "1/true/1.5/1"
        );
    }

    #[test]
    fn test_non_identifier_braces_untouched() {
        let params = params! { "name" => "x" };
        assert_eq!(interpolate("{{ name }} {{}} {name}", &params), "{{ name }} {{}} {name}");
    }

    #[test]
    fn test_large_unsigned_becomes_text() {
        assert_eq!(ParamValue::from(u64::MAX), ParamValue::Text(u64::MAX.to_string()));
        assert_eq!(ParamValue::from(7_usize), ParamValue::Integer(7));
    }
}
