//! The contract between the explorer and whatever fetches manifests and deck documents.
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::{Deck, VerseSet};

/// File name of the manifest inside a [`DirectorySource`] root.
pub const MANIFEST_FILE: &str = "manifest.json";

/// A failed fetch or parse, before it is attributed to the manifest or a deck.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("the document has no verse list")]
    MissingVerses,

    #[error("{0}")]
    Transport(String),
}

/// A user-visible loading failure. The message always says what failed.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not load the deck manifest: {source}")]
    ManifestUnavailable {
        #[source]
        source: FetchError,
    },

    #[error("Could not load deck \"{deck}\": {source}")]
    DeckUnavailable {
        deck: String,
        #[source]
        source: FetchError,
    },

    #[error("Deck \"{deck}\" is malformed: it has no verse list")]
    MalformedDeck { deck: String },
}

impl LoadError {
    /// Attributes a fetch failure to the named deck.
    pub fn for_deck(deck: impl Into<String>, source: FetchError) -> Self {
        let deck = deck.into();
        match source {
            FetchError::MissingVerses => Self::MalformedDeck { deck },
            source => Self::DeckUnavailable { deck, source },
        }
    }

    /// Blocking failures leave nothing usable on screen.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::ManifestUnavailable { .. })
    }
}

/// Fetches manifests and deck documents on behalf of the explorer.
///
/// The explorer knows nothing about URLs or transports; asynchronous hosts drive
/// [`crate::Explorer::select_deck`] and [`crate::Explorer::complete_deck_load`] themselves and
/// only need [`parse_manifest`]/[`parse_verse_set`].
pub trait DeckSource {
    fn fetch_manifest(&self) -> Result<Vec<Deck>, FetchError>;
    fn fetch_deck(&self, data_ref: &str) -> Result<VerseSet, FetchError>;
}

/// Parses a manifest: an ordered JSON array of `{ id, name, dataRef }`.
///
/// Ids may be strings or numbers. Entries without an id, or whose fields have the wrong shape,
/// cannot be selected and are skipped; only a document that is not an array fails.
pub fn parse_manifest(json: &str) -> Result<Vec<Deck>, FetchError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let total = entries.len();
    let decks: Vec<Deck> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<Deck>(entry).ok())
        .filter(|deck| !deck.id.trim().is_empty())
        .collect();
    if decks.len() != total {
        ewarn!(
            skipped = total - decks.len(),
            "unusable manifest entries were skipped"
        );
    }
    Ok(decks)
}

/// Parses a deck document. A document without a `verses` array is [`FetchError::MissingVerses`].
pub fn parse_verse_set(json: &str) -> Result<VerseSet, FetchError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.get("verses").is_some_and(serde_json::Value::is_array) {
        return Err(FetchError::MissingVerses);
    }
    let verse_set: VerseSet = serde_json::from_value(value)?;
    edebug!(verses = verse_set.verses.len(), "parsed verse set");
    Ok(verse_set)
}

/// Serves a manifest and deck documents from a directory on disk.
///
/// `data_ref`s are resolved relative to the root, the way the web front end resolves them
/// relative to the page.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, relative: &str) -> Result<String, FetchError> {
        let path = self.root.join(relative.trim_start_matches('/'));
        etrace!(path = %path.display(), "reading");
        Ok(fs::read_to_string(path)?)
    }
}

impl DeckSource for DirectorySource {
    fn fetch_manifest(&self) -> Result<Vec<Deck>, FetchError> {
        parse_manifest(&self.read(MANIFEST_FILE)?)
    }

    fn fetch_deck(&self, data_ref: &str) -> Result<VerseSet, FetchError> {
        parse_verse_set(&self.read(data_ref)?)
    }
}
