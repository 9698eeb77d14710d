//! Mapping between logical reading order and a host's horizontal scroll coordinates.
//!
//! Logical position is always expressed on a `0 ..= max` scale where `0` shows the first word
//! of a verse and `max = content_width - container_width` shows the last one. Raw offsets are
//! whatever the host reports, which depends on the layout [`Direction`] and, for right-to-left
//! layout, on the host's [`ScrollConvention`]:
//!
//! | convention | raw range   | logical start | toward logical end |
//! |------------|-------------|---------------|--------------------|
//! | `Normal`   | `[0, max]`  | `max`         | raw decreases      |
//! | `Negative` | `[-max, 0]` | `0`           | raw decreases      |
//! | `Reverse`  | `[0, max]`  | `0`           | raw increases      |
//!
//! Left-to-right layout always uses `[0, max]` with the start at `0`.
use core::cell::OnceCell;

use crate::{Direction, Edges, ScrollConvention};

/// Offset written by [`detect_scroll_convention`] when probing.
pub const PROBE_NUDGE: f64 = 1.0;

/// Offsets closer to zero than this are treated as zero while probing.
const PROBE_TOLERANCE: f64 = 0.5;

/// An offscreen, right-to-left scroll container whose content is wider than itself.
///
/// Hosts implement this against their real layout engine; [`crate::SimulatedProbe`] implements
/// it for each convention.
pub trait ScrollProbe {
    /// Reads the offset the host assigns before anything scrolls the container.
    fn initial_offset(&mut self) -> f64;

    /// Writes `offset` and reads back what the host actually applied.
    fn nudge_to(&mut self, offset: f64) -> f64;
}

impl<P: ScrollProbe + ?Sized> ScrollProbe for &mut P {
    fn initial_offset(&mut self) -> f64 {
        (**self).initial_offset()
    }

    fn nudge_to(&mut self, offset: f64) -> f64 {
        (**self).nudge_to(offset)
    }
}

/// Classifies the host's right-to-left scroll convention.
///
/// - a non-zero initial offset means the origin sits at the visual left ([`ScrollConvention::Normal`])
/// - an offset pinned at zero after a positive nudge means [`ScrollConvention::Negative`]
/// - otherwise positive offsets move leftward ([`ScrollConvention::Reverse`])
pub fn detect_scroll_convention(mut probe: impl ScrollProbe) -> ScrollConvention {
    let initial = probe.initial_offset();
    if initial.abs() > PROBE_TOLERANCE {
        edebug!(initial, "detected scroll convention: normal");
        return ScrollConvention::Normal;
    }

    let after = probe.nudge_to(PROBE_NUDGE);
    let convention = if after.abs() <= PROBE_TOLERANCE {
        ScrollConvention::Negative
    } else {
        ScrollConvention::Reverse
    };
    edebug!(initial, after, ?convention, "detected scroll convention");
    convention
}

/// Session-wide cache for the detected convention.
///
/// The convention of a host never changes mid-session, so probing happens at most once.
#[derive(Clone, Debug, Default)]
pub struct ConventionCache {
    cell: OnceCell<ScrollConvention>,
}

impl ConventionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache pre-filled with an injected convention; no probing will happen.
    pub fn with_convention(convention: ScrollConvention) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(convention);
        Self { cell }
    }

    pub fn get(&self) -> Option<ScrollConvention> {
        self.cell.get().copied()
    }

    /// Returns the cached convention, probing with the provided probe on first use.
    pub fn get_or_detect<P: ScrollProbe>(&self, probe: impl FnOnce() -> P) -> ScrollConvention {
        *self
            .cell
            .get_or_init(|| detect_scroll_convention(probe()))
    }
}

/// Maximum logical scroll distance; `0` when the content fits (or measurements are unusable).
pub fn max_scroll(content_width: f64, container_width: f64) -> f64 {
    let max = content_width - container_width;
    if max.is_finite() && max > 0.0 { max } else { 0.0 }
}

/// The raw offset range the host clamps scroll writes into.
pub fn raw_range(
    direction: Direction,
    convention: ScrollConvention,
    content_width: f64,
    container_width: f64,
) -> (f64, f64) {
    let max = max_scroll(content_width, container_width);
    match (direction, convention) {
        (Direction::Rtl, ScrollConvention::Negative) => (-max, 0.0),
        _ => (0.0, max),
    }
}

/// The raw offset that shows the logically first item.
///
/// For [`ScrollConvention::Normal`] under right-to-left layout this is `content_width`, which
/// the host clamps to `max`; callers that need the exact applied value clamp through
/// [`raw_range`].
pub fn rest_offset(
    direction: Direction,
    convention: ScrollConvention,
    content_width: f64,
    _container_width: f64,
) -> f64 {
    match (direction, convention) {
        (Direction::Ltr, _) => 0.0,
        (Direction::Rtl, ScrollConvention::Normal) => content_width.max(0.0),
        (Direction::Rtl, ScrollConvention::Negative | ScrollConvention::Reverse) => 0.0,
    }
}

/// The signed raw delta for a step of `magnitude` toward `visual_sign`
/// (`+1` = visual end, `-1` = visual start).
pub fn step_delta(
    direction: Direction,
    convention: ScrollConvention,
    visual_sign: f64,
    magnitude: f64,
) -> f64 {
    let sign = visual_sign.signum();
    match (direction, convention) {
        (Direction::Ltr, _) => sign * magnitude,
        (Direction::Rtl, ScrollConvention::Normal | ScrollConvention::Negative) => {
            -sign * magnitude
        }
        (Direction::Rtl, ScrollConvention::Reverse) => sign * magnitude,
    }
}

/// Maps a raw offset onto the direction-agnostic `0 (start) ..= max (end)` scale.
pub fn normalized_position(
    direction: Direction,
    convention: ScrollConvention,
    raw: f64,
    content_width: f64,
    container_width: f64,
) -> f64 {
    let max = max_scroll(content_width, container_width);
    if max == 0.0 || !raw.is_finite() {
        return 0.0;
    }
    let position = match (direction, convention) {
        (Direction::Ltr, _) => raw,
        (Direction::Rtl, ScrollConvention::Normal) => max - raw,
        (Direction::Rtl, ScrollConvention::Negative) => -raw,
        (Direction::Rtl, ScrollConvention::Reverse) => raw,
    };
    position.clamp(0.0, max)
}

/// Inverse of [`normalized_position`].
pub fn raw_offset(
    direction: Direction,
    convention: ScrollConvention,
    position: f64,
    content_width: f64,
    container_width: f64,
) -> f64 {
    let max = max_scroll(content_width, container_width);
    let position = if position.is_finite() {
        position.clamp(0.0, max)
    } else {
        0.0
    };
    match (direction, convention) {
        (Direction::Ltr, _) => position,
        (Direction::Rtl, ScrollConvention::Normal) => max - position,
        (Direction::Rtl, ScrollConvention::Negative) => -position,
        (Direction::Rtl, ScrollConvention::Reverse) => position,
    }
}

/// Start/end detection with a tolerance of `epsilon` pixels.
///
/// A strip without overflow (including zero-width content) reports both edges reached.
pub fn edges(
    direction: Direction,
    convention: ScrollConvention,
    raw: f64,
    content_width: f64,
    container_width: f64,
    epsilon: f64,
) -> Edges {
    let max = max_scroll(content_width, container_width);
    if max <= epsilon {
        return Edges {
            at_start: true,
            at_end: true,
        };
    }
    let position = normalized_position(direction, convention, raw, content_width, container_width);
    Edges {
        at_start: position <= epsilon,
        at_end: position >= max - epsilon,
    }
}
