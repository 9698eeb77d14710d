use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{DerivedForm, Word};
use crate::view::{Element, Node, arabic_element, chip, text_element};

/// Derived forms shown while a card is collapsed.
pub const DEFAULT_PREVIEW_SIZE: usize = 2;
/// Columns of the expanded derived-forms grid.
pub const GRID_COLUMNS: usize = 2;
/// Placeholder rendered when a word has no derived forms.
pub const EMPTY_MARKER: &str = "—";
/// Shown instead of a pattern that is not in the configured vocabulary.
pub const UNKNOWN_PATTERN: &str = "unknown";
pub const LESS_LABEL: &str = "Show less";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardState {
    #[default]
    Collapsed,
    Expanded,
}

/// Whether an expanded card may collapse again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpansionPolicy {
    /// Expanding is final for the card's lifetime.
    OneShot,
    /// Collapsed and expanded alternate freely.
    #[default]
    Toggle,
}

/// The control a card currently offers in its derived section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Affordance {
    More { remaining: usize },
    Less,
}

impl Affordance {
    pub fn label(&self) -> String {
        match self {
            Self::More { remaining } => format!("+{remaining} more"),
            Self::Less => LESS_LABEL.to_owned(),
        }
    }
}

/// A controlled vocabulary of recognized morphological pattern templates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternVocabulary {
    patterns: BTreeSet<String>,
}

impl PatternVocabulary {
    pub fn new(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.into().trim().to_owned())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.patterns.contains(pattern.trim())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardOptions {
    pub preview_size: usize,
    pub policy: ExpansionPolicy,
    pub vocabulary: Option<Arc<PatternVocabulary>>,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            preview_size: DEFAULT_PREVIEW_SIZE,
            policy: ExpansionPolicy::default(),
            vocabulary: None,
        }
    }
}

/// One word's card: a main block plus a derived-forms section with progressive disclosure.
///
/// The card owns its subtree; every state change rebuilds [`Self::node`] and nothing else.
#[derive(Clone, Debug)]
pub struct WordCard {
    word: Word,
    derived: Vec<DerivedForm>,
    state: CardState,
    options: CardOptions,
    root: Node,
}

impl WordCard {
    pub fn new(word: Word, options: CardOptions) -> Self {
        let own = word.primary_text.trim();
        let derived = word
            .derived
            .iter()
            .filter(|d| d.primary_text.trim() != own)
            .cloned()
            .collect();
        let mut card = Self {
            word,
            derived,
            state: CardState::Collapsed,
            options,
            root: Node::Text(String::new()),
        };
        card.rebuild();
        card
    }

    pub fn word(&self) -> &Word {
        &self.word
    }

    /// Derived forms after dropping the ones identical to the word itself.
    pub fn derived(&self) -> &[DerivedForm] {
        &self.derived
    }

    pub fn state(&self) -> CardState {
        self.state
    }

    pub fn is_expanded(&self) -> bool {
        self.state == CardState::Expanded
    }

    pub fn node(&self) -> &Node {
        &self.root
    }

    fn preview_len(&self) -> usize {
        self.derived.len().min(self.options.preview_size)
    }

    fn hidden_count(&self) -> usize {
        self.derived.len() - self.preview_len()
    }

    /// Derived forms currently on screen.
    pub fn visible_derived(&self) -> &[DerivedForm] {
        match self.state {
            CardState::Collapsed => &self.derived[..self.preview_len()],
            CardState::Expanded => &self.derived,
        }
    }

    pub fn affordance(&self) -> Option<Affordance> {
        match (self.state, self.options.policy) {
            (CardState::Collapsed, _) if self.hidden_count() > 0 => Some(Affordance::More {
                remaining: self.hidden_count(),
            }),
            (CardState::Collapsed, _) => None,
            (CardState::Expanded, ExpansionPolicy::Toggle) => Some(Affordance::Less),
            (CardState::Expanded, ExpansionPolicy::OneShot) => None,
        }
    }

    /// Fires the current affordance, if any. Returns whether the card changed state.
    pub fn activate(&mut self) -> bool {
        match self.affordance() {
            Some(Affordance::More { .. }) => self.expand(),
            Some(Affordance::Less) => self.collapse(),
            None => false,
        }
    }

    pub fn expand(&mut self) -> bool {
        if self.state == CardState::Expanded || self.hidden_count() == 0 {
            return false;
        }
        self.state = CardState::Expanded;
        self.rebuild();
        true
    }

    pub fn collapse(&mut self) -> bool {
        if self.state == CardState::Collapsed || self.options.policy == ExpansionPolicy::OneShot {
            return false;
        }
        self.state = CardState::Collapsed;
        self.rebuild();
        true
    }

    fn display_pattern<'a>(&self, pattern: Option<&'a str>) -> Option<&'a str> {
        let pattern = pattern?;
        match &self.options.vocabulary {
            Some(vocabulary) if !vocabulary.contains(pattern) => Some(UNKNOWN_PATTERN),
            _ => Some(pattern),
        }
    }

    fn rebuild(&mut self) {
        let word = &self.word;
        let meta = Element::with_class("div", "meta-row")
            .maybe_child(word.transliteration.as_deref().and_then(chip))
            .maybe_child(word.root.as_deref().and_then(chip))
            .maybe_child(self.display_pattern(word.pattern.as_deref()).and_then(chip));

        let card = Element::with_class("article", "word-card")
            .attr("data-state", state_name(self.state))
            .child(Element::with_class("span", "section-label").text("MAIN"))
            .maybe_child(arabic_element("h3", "word-ar", &word.primary_text))
            .maybe_child(text_element("p", "word-bn", &word.translated_text))
            .child(meta)
            .child(Element::with_class("div", "hr"))
            .child(self.derived_section());

        self.root = card.into();
    }

    fn derived_section(&self) -> Element {
        let section = Element::with_class("div", "derived")
            .child(Element::with_class("span", "section-label").text("DERIVED"));

        if self.derived.is_empty() {
            let marker = Element::with_class("span", "chip").class("empty").text(EMPTY_MARKER);
            return section.child(Element::with_class("div", "derived-summary").child(marker));
        }

        let body = match self.state {
            CardState::Collapsed => Element::with_class("div", "derived-summary")
                .children(self.visible_derived().iter().map(summary_chip)),
            CardState::Expanded => self.derived_grid(),
        };
        let section = section.child(body);
        match self.affordance() {
            Some(affordance @ Affordance::More { .. }) => section.child(
                Element::with_class("button", "more-btn")
                    .attr("data-remaining", self.hidden_count().to_string())
                    .text(affordance.label()),
            ),
            Some(affordance @ Affordance::Less) => {
                section.child(Element::with_class("button", "less-btn").text(affordance.label()))
            }
            None => section,
        }
    }

    fn derived_grid(&self) -> Element {
        let rows = self.derived.len().div_ceil(GRID_COLUMNS);
        let grid = Element::with_class("div", "derived-grid")
            .attr("data-columns", GRID_COLUMNS.to_string())
            .attr("data-rows", rows.to_string());
        grid.children(self.derived.chunks(GRID_COLUMNS).map(|row| {
            Element::with_class("div", "derived-row").children(row.iter().map(|d| self.grid_item(d)))
        }))
    }

    fn grid_item(&self, derived: &DerivedForm) -> Element {
        let line = Element::with_class("div", "derived-line")
            .maybe_child(derived.transliteration.as_deref().and_then(chip))
            .maybe_child(self.display_pattern(derived.pattern.as_deref()).and_then(chip))
            .maybe_child(derived.root.as_deref().and_then(chip));
        Element::with_class("div", "derived-item")
            .maybe_child(arabic_element("div", "derived-ar", &derived.primary_text))
            .maybe_child(
                derived
                    .translated_text
                    .as_deref()
                    .and_then(|t| text_element("div", "derived-bn", t)),
            )
            .child(line)
    }
}

fn state_name(state: CardState) -> &'static str {
    match state {
        CardState::Collapsed => "collapsed",
        CardState::Expanded => "expanded",
    }
}

/// `"primary — translation"`, dropping whichever half is missing.
fn summary_chip(derived: &DerivedForm) -> Element {
    let primary = derived.primary_text.trim();
    let translated = derived.translated_text.as_deref().map(str::trim).unwrap_or("");
    let label = match (primary.is_empty(), translated.is_empty()) {
        (false, false) => format!("{primary} — {translated}"),
        (false, true) => primary.to_owned(),
        (true, false) => translated.to_owned(),
        (true, true) => EMPTY_MARKER.to_owned(),
    };
    Element::with_class("span", "chip").class("derived-chip").text(label)
}
