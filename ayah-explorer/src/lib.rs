//! A headless engine for a bidirectional Quranic word explorer.
//!
//! For host-driving utilities (smooth stepping, throttled/debounced refresh), see the
//! `ayah-explorer-adapter` crate.
//!
//! A deck (one chapter) is rendered as a list of verses; each verse gets a horizontally
//! scrollable strip of word cards whose navigation stays correct under right-to-left layout
//! and across the different ways hosts report RTL scroll offsets.
//!
//! It is UI-agnostic. A host is expected to provide:
//! - scroll containers ([`ScrollSurface`]) with their measured widths and offsets
//! - an offscreen probe ([`ScrollProbe`]) or a fixed [`ScrollConvention`]
//! - manifest and deck documents ([`DeckSource`], or results fed to [`Explorer`])
//! - frame callbacks ([`Explorer::after_layout`])
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod app;
mod card;
mod carousel;
pub mod direction;
mod loader;
mod model;
mod options;
mod prefs;
mod render;
mod sim;
mod types;
mod view;

#[cfg(test)]
mod tests;

pub use app::{
    Explorer, LoadOutcome, LoadRequest, LoadTicket, Notice, NoticeKind, SelectorView, Status,
};
pub use card::{
    Affordance, CardOptions, CardState, DEFAULT_PREVIEW_SIZE, EMPTY_MARKER, ExpansionPolicy,
    GRID_COLUMNS, LESS_LABEL, PatternVocabulary, UNKNOWN_PATTERN, WordCard,
};
pub use carousel::{Carousel, CarouselOptions, MIN_STEP_PX, ScrollSurface};
pub use direction::{ConventionCache, ScrollProbe, detect_scroll_convention};
pub use loader::{
    DeckSource, DirectorySource, FetchError, LoadError, MANIFEST_FILE, parse_manifest,
    parse_verse_set,
};
pub use model::{Deck, DerivedForm, Verse, VerseSet, Word};
pub use options::ExplorerOptions;
pub use prefs::{DIRECTION_KEY, JsonFileStore, MemoryStore, PreferenceError, PreferenceStore};
pub use render::{DeckView, RenderContext, StripFactory, VerseView, render_deck};
pub use sim::{SimulatedHost, SimulatedProbe, SimulatedStrip};
pub use types::{CarouselState, Direction, Edges, NavButtons, ScrollConvention, StepIntent};
pub use view::{Element, Node};
