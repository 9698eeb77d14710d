use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::card::{CardOptions, DEFAULT_PREVIEW_SIZE, ExpansionPolicy, PatternVocabulary};
use crate::carousel::{CarouselOptions, MIN_STEP_PX};
use crate::{Direction, ScrollConvention};

/// Configuration for [`crate::Explorer`] and the adapter timers built around it.
///
/// Every field has a default, so a partial JSON document (or `{}`) is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerOptions {
    /// Derived forms shown on a collapsed card.
    pub preview_size: usize,
    pub expansion: ExpansionPolicy,
    /// Recognized pattern templates; `None` displays every pattern as-is.
    pub pattern_vocabulary: Option<Vec<String>>,
    /// Direction used when no preference has been stored.
    pub default_direction: Direction,
    /// Fixed scroll convention. When unset, the host is probed once per session.
    pub convention: Option<ScrollConvention>,
    pub step_fallback_px: f64,
    pub edge_epsilon: f64,
    /// Minimum interval between scroll-driven button refreshes.
    pub scroll_throttle_ms: u64,
    /// Quiet period before a burst of resize events is handled.
    pub resize_debounce_ms: u64,
    /// Duration of a smooth step; `0` steps instantly.
    pub smooth_scroll_ms: u64,
    /// Whether direction changes are written to the preference store.
    pub persist_direction: bool,
}

impl Default for ExplorerOptions {
    fn default() -> Self {
        let carousel = CarouselOptions::default();
        Self {
            preview_size: DEFAULT_PREVIEW_SIZE,
            expansion: ExpansionPolicy::Toggle,
            pattern_vocabulary: None,
            default_direction: Direction::Rtl,
            convention: None,
            step_fallback_px: carousel.step_fallback_px,
            edge_epsilon: carousel.edge_epsilon,
            scroll_throttle_ms: 80,
            resize_debounce_ms: 120,
            smooth_scroll_ms: 240,
            persist_direction: true,
        }
    }
}

impl ExplorerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_convention(mut self, convention: ScrollConvention) -> Self {
        self.convention = Some(convention);
        self
    }

    pub fn with_preview_size(mut self, preview_size: usize) -> Self {
        self.preview_size = preview_size;
        self
    }

    pub fn with_expansion(mut self, expansion: ExpansionPolicy) -> Self {
        self.expansion = expansion;
        self
    }

    pub fn with_pattern_vocabulary(
        mut self,
        patterns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.pattern_vocabulary = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    pub fn card_options(&self) -> CardOptions {
        CardOptions {
            preview_size: self.preview_size,
            policy: self.expansion,
            vocabulary: self
                .pattern_vocabulary
                .as_ref()
                .map(|patterns| Arc::new(PatternVocabulary::new(patterns.iter().cloned()))),
        }
    }

    pub fn carousel_options(&self) -> CarouselOptions {
        CarouselOptions {
            step_fallback_px: self.step_fallback_px.max(MIN_STEP_PX),
            edge_epsilon: self.edge_epsilon.max(0.0),
        }
    }
}
