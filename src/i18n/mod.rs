//! Internationalization (i18n) support
//!
//! Two languages are served. The language of a request comes from the
//! first segment of its path (`/en/...`, `/fr/...`); paths without a known
//! prefix are served in French.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Table = HashMap<String, serde_yaml::Value>;

/// A supported site language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Fr,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Fr];

    /// Two-letter code, also used as the URL prefix
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    fn source(self) -> &'static str {
        match self {
            Language::En => include_str!("locales/en.yml"),
            Language::Fr => include_str!("locales/fr.yml"),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Split a request path into its language and the path left once the
/// language segment is removed
///
/// # Examples
/// ```ignore
/// split_locale("/en/articles/") // -> (Language::En, "/articles/")
/// split_locale("/xx/foo")       // -> (Language::Fr, "/xx/foo")
/// ```
pub fn split_locale(path: &str) -> (Language, String) {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let (first, rest) = match trimmed.find('/') {
        Some(pos) => (&trimmed[..pos], &trimmed[pos..]),
        None => (trimmed, ""),
    };

    let (language, residual) = match Language::from_code(first) {
        Some(language) => (language, rest),
        None => (Language::default(), path),
    };

    if residual.is_empty() {
        (language, "/".to_string())
    } else {
        (language, residual.to_string())
    }
}

/// Translation tables for every supported language
pub struct Locales {
    /// Language data: lang -> key -> translation
    translations: HashMap<Language, Table>,
}

impl Locales {
    /// Load the translation files embedded in the binary
    pub fn embedded() -> Result<Self> {
        let mut translations = HashMap::new();
        for language in Language::ALL {
            let table: Table = serde_yaml::from_str(language.source())?;
            translations.insert(language, table);
            tracing::debug!("Loaded translations for {}", language);
        }
        Ok(Self { translations })
    }

    /// Resolve the locale of a request path
    ///
    /// Never fails: unknown prefixes fall back to the default language and
    /// leave the path untouched.
    pub fn resolve(self: &Arc<Self>, path: &str) -> (Localizer, String) {
        let (language, residual) = split_locale(path);
        (self.localizer(language), residual)
    }

    pub fn localizer(self: &Arc<Self>, language: Language) -> Localizer {
        Localizer {
            language,
            locales: Arc::clone(self),
        }
    }

    /// Get a translation for a specific language
    /// Key can be nested like "nav.home"
    pub fn get_for_lang(&self, lang: Language, key: &str) -> String {
        if let Some(value) = self
            .translations
            .get(&lang)
            .and_then(|data| get_nested_value(data, key))
        {
            return yaml_value_to_string(value);
        }

        // Fallback to English
        if lang != Language::En {
            if let Some(value) = self
                .translations
                .get(&Language::En)
                .and_then(|data| get_nested_value(data, key))
            {
                return yaml_value_to_string(value);
            }
        }

        // Return key as fallback
        key.to_string()
    }

    /// The translation tree of a language, English filling the gaps
    pub fn table_for_lang(&self, lang: Language) -> serde_yaml::Mapping {
        let mut result = to_mapping(self.translations.get(&lang));

        if lang != Language::En {
            let fallback = to_mapping(self.translations.get(&Language::En));
            merge_missing(&mut result, &fallback);
        }

        result
    }
}

/// Language-aware string lookup and link building for one request
#[derive(Clone)]
pub struct Localizer {
    language: Language,
    locales: Arc<Locales>,
}

impl Localizer {
    pub fn language(&self) -> Language {
        self.language
    }

    /// Language code, e.g. "fr"
    pub fn lang(&self) -> &'static str {
        self.language.code()
    }

    /// Translate a key
    pub fn get(&self, key: &str) -> String {
        self.locales.get_for_lang(self.language, key)
    }

    /// Prefix a site path with this locale
    ///
    /// # Examples
    /// ```ignore
    /// localizer.link("articles/") // -> "/en/articles/"
    /// ```
    pub fn link(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("/{}{}", self.lang(), path)
        } else {
            format!("/{}/{}", self.lang(), path)
        }
    }

    /// Every translation for this locale, nested by key segment, for
    /// template contexts
    pub fn translations(&self) -> serde_yaml::Mapping {
        self.locales.table_for_lang(self.language)
    }
}

impl fmt::Debug for Localizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Localizer")
            .field("language", &self.language)
            .finish()
    }
}

/// Get a nested value from a YAML map using dot notation
fn get_nested_value<'a>(data: &'a Table, key: &str) -> Option<&'a serde_yaml::Value> {
    let mut parts = key.split('.');
    let mut current = data.get(parts.next()?);

    for part in parts {
        match current {
            Some(serde_yaml::Value::Mapping(map)) => {
                current = map.get(serde_yaml::Value::String(part.to_string()));
            }
            _ => return None,
        }
    }

    current
}

/// Convert a YAML value to a string
fn yaml_value_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        _ => format!("{:?}", value),
    }
}

fn to_mapping(table: Option<&Table>) -> serde_yaml::Mapping {
    table
        .into_iter()
        .flatten()
        .map(|(k, v)| (serde_yaml::Value::String(k.clone()), v.clone()))
        .collect()
}

/// Copy into `target` every key of `fallback` it lacks, recursing into
/// nested mappings
fn merge_missing(target: &mut serde_yaml::Mapping, fallback: &serde_yaml::Mapping) {
    for (key, value) in fallback {
        if let Some(existing) = target.get_mut(key) {
            if let (serde_yaml::Value::Mapping(nested), serde_yaml::Value::Mapping(nested_fallback)) =
                (existing, value)
            {
                merge_missing(nested, nested_fallback);
            }
        } else {
            target.insert(key.clone(), value.clone());
        }
    }
}
