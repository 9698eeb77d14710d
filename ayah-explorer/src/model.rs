//! Deck and verse data as produced by the external authoring process.
//!
//! Field names follow the canonical camelCase shape; the short keys used by older deck files
//! (`ar`, `bn`, `tr`, `arabic`, `bangla`, `name_ar`, `name_bn`, `json`) are accepted as aliases.
//! Optional strings treat a missing key, `null` and `""` the same way: absent.
use serde::{Deserialize, Deserializer, Serialize};

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identifiers written by hand are sometimes bare numbers (`"id": 1`).
#[derive(Deserialize)]
#[serde(untagged)]
enum Key {
    Text(String),
    Number(serde_json::Number),
}

fn key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Key>::deserialize(deserializer)? {
        Some(Key::Text(text)) => text,
        Some(Key::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

fn optional_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}

fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One manifest entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    #[serde(default, deserialize_with = "key")]
    pub id: String,
    #[serde(default, deserialize_with = "key")]
    pub name: String,
    #[serde(default, alias = "json", deserialize_with = "key")]
    pub data_ref: String,
}

impl Deck {
    pub fn new(id: impl Into<String>, name: impl Into<String>, data_ref: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data_ref: data_ref.into(),
        }
    }

    /// Name shown in the deck selector; falls back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// One chapter's worth of verses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseSet {
    #[serde(default, alias = "name_ar", deserialize_with = "text")]
    pub title_native: String,
    #[serde(default, alias = "name_bn", deserialize_with = "text")]
    pub title_translated: String,
    #[serde(default, deserialize_with = "list")]
    pub verses: Vec<Verse>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verse {
    /// `chapter:verse` tag.
    #[serde(default, alias = "ref", deserialize_with = "key")]
    pub id: String,
    #[serde(default, alias = "arabic", deserialize_with = "text")]
    pub primary_text: String,
    #[serde(default, alias = "bangla", deserialize_with = "text")]
    pub translated_text: String,
    /// Logical (recitation) order.
    #[serde(default, deserialize_with = "list")]
    pub words: Vec<Word>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    #[serde(default, alias = "ar", deserialize_with = "text")]
    pub primary_text: String,
    #[serde(default, alias = "bn", deserialize_with = "text")]
    pub translated_text: String,
    #[serde(
        default,
        alias = "tr",
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub transliteration: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub root: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub pattern: Option<String>,
    #[serde(default, deserialize_with = "list")]
    pub derived: Vec<DerivedForm>,
}

impl Word {
    pub fn new(primary_text: impl Into<String>, translated_text: impl Into<String>) -> Self {
        Self {
            primary_text: primary_text.into(),
            translated_text: translated_text.into(),
            ..Self::default()
        }
    }
}

/// A morphologically related word shown alongside a main word.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedForm {
    #[serde(default, alias = "ar", deserialize_with = "text")]
    pub primary_text: String,
    #[serde(
        default,
        alias = "bn",
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub translated_text: Option<String>,
    #[serde(
        default,
        alias = "tr",
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub transliteration: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub pattern: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub root: Option<String>,
}

impl DerivedForm {
    pub fn new(primary_text: impl Into<String>) -> Self {
        Self {
            primary_text: primary_text.into(),
            ..Self::default()
        }
    }

    pub fn with_translation(mut self, translated_text: impl Into<String>) -> Self {
        let text = translated_text.into();
        self.translated_text = (!text.trim().is_empty()).then_some(text);
        self
    }
}
