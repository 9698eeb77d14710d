use serde::{Deserialize, Serialize};

/// Visual reading direction of the UI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    #[default]
    Rtl,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ltr => Self::Rtl,
            Self::Rtl => Self::Ltr,
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Self::Rtl)
    }

    /// The value used for `dir` attributes and persisted preferences.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ltr" => Some(Self::Ltr),
            "rtl" => Some(Self::Rtl),
            _ => None,
        }
    }

    /// Label shown on the direction toggle.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ltr => "LTR",
            Self::Rtl => "RTL",
        }
    }
}

/// How a host reports horizontal scroll offsets for right-to-left content.
///
/// Left-to-right content always scrolls from `0` (start) to `max` (end); the convention only
/// matters under [`Direction::Rtl`]. See [`crate::direction`] for the exact coordinate tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollConvention {
    /// Origin at the visual left edge; RTL content starts scrolled to `max`.
    Normal,
    /// Origin at the visual right edge; offsets grow negative toward the left.
    Negative,
    /// Origin at the visual right edge; offsets grow positive toward the left.
    Reverse,
}

/// A user-requested carousel step, in logical terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepIntent {
    Previous,
    Next,
}

impl StepIntent {
    /// `+1.0` toward the visual end of the strip, `-1.0` toward its visual start.
    pub fn visual_sign(self) -> f64 {
        match self {
            Self::Previous => -1.0,
            Self::Next => 1.0,
        }
    }
}

/// Whether a strip currently shows its logical start and/or end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edges {
    pub at_start: bool,
    pub at_end: bool,
}

/// Disabled state of a strip's "previous" and "next" controls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavButtons {
    pub previous_disabled: bool,
    pub next_disabled: bool,
}

impl NavButtons {
    pub const DISABLED: Self = Self {
        previous_disabled: true,
        next_disabled: true,
    };

    pub fn from_edges(edges: Edges) -> Self {
        Self {
            previous_disabled: edges.at_start,
            next_disabled: edges.at_end,
        }
    }

    pub fn is_disabled(&self, intent: StepIntent) -> bool {
        match intent {
            StepIntent::Previous => self.previous_disabled,
            StepIntent::Next => self.next_disabled,
        }
    }
}

/// A lightweight, serializable snapshot of one carousel's geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CarouselState {
    /// Raw, convention-specific scroll offset as reported by the host.
    pub scroll_offset: f64,
    pub container_width: f64,
    pub content_width: f64,
    pub direction: Direction,
}
