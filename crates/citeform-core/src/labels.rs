//! Localized labels such as `[data]` or `[producer]`.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed set of labels a citation may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Data,
    Publisher,
    Producer,
    Distributor,
    FileName,
}

impl Label {
    pub const ALL: [Label; 5] = [
        Label::Data,
        Label::Publisher,
        Label::Producer,
        Label::Distributor,
        Label::FileName,
    ];

    /// Key used in label bundles.
    pub fn key(self) -> &'static str {
        match self {
            Label::Data => "data",
            Label::Publisher => "publisher",
            Label::Producer => "producer",
            Label::Distributor => "distributor",
            Label::FileName => "file_name",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Opaque locale token, e.g. `en` or `pl`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en")
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// Error resolving a label.
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("no label {label} for locale {locale}")]
    Missing { label: Label, locale: Locale },
    #[error("invalid label bundle: {0}")]
    Bundle(#[from] toml::de::Error),
}

/// Looks up the word for a label in a locale.
///
/// Implementations return the bare word (`data`, `file name`); writers add
/// the surrounding ` [...]` themselves.
pub trait LabelResolver: Send + Sync {
    fn resolve(&self, label: Label, locale: &Locale) -> Result<String, LabelError>;
}

impl<T: LabelResolver + ?Sized> LabelResolver for &T {
    fn resolve(&self, label: Label, locale: &Locale) -> Result<String, LabelError> {
        (**self).resolve(label, locale)
    }
}

/// In-memory label table keyed by locale.
///
/// The TOML form has one table per locale:
///
/// ```toml
/// [en]
/// data = "data"
/// publisher = "publisher"
/// producer = "producer"
/// distributor = "distributor"
/// file_name = "file name"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelBundle(HashMap<String, HashMap<Label, String>>);

impl LabelBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// English and Polish labels.
    pub fn builtin() -> Self {
        Self::new()
            .with_locale(
                "en",
                [
                    (Label::Data, "data"),
                    (Label::Publisher, "publisher"),
                    (Label::Producer, "producer"),
                    (Label::Distributor, "distributor"),
                    (Label::FileName, "file name"),
                ],
            )
            .with_locale(
                "pl",
                [
                    (Label::Data, "dane"),
                    (Label::Publisher, "wydawca"),
                    (Label::Producer, "producent"),
                    (Label::Distributor, "dystrybutor"),
                    (Label::FileName, "nazwa pliku"),
                ],
            )
    }

    /// Parse a bundle from TOML.
    pub fn from_toml(source: &str) -> Result<Self, LabelError> {
        let bundle: Self = toml::from_str(source)?;
        tracing::debug!(locales = ?bundle.locales(), "loaded label bundle");
        Ok(bundle)
    }

    /// Add or replace labels for a locale.
    pub fn with_locale<'a>(
        mut self,
        locale: impl Into<String>,
        labels: impl IntoIterator<Item = (Label, &'a str)>,
    ) -> Self {
        let table = self.0.entry(locale.into()).or_default();
        for (label, word) in labels {
            table.insert(label, word.to_string());
        }
        self
    }

    /// Locales present in the bundle, sorted.
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.0.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }
}

impl LabelResolver for LabelBundle {
    fn resolve(&self, label: Label, locale: &Locale) -> Result<String, LabelError> {
        self.0
            .get(locale.as_str())
            .and_then(|table| table.get(&label))
            .cloned()
            .ok_or_else(|| LabelError::Missing {
                label,
                locale: locale.clone(),
            })
    }
}
