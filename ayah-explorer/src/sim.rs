//! In-memory hosts for tests, examples, and non-browser front ends.
use crate::carousel::ScrollSurface;
use crate::direction::{ScrollProbe, normalized_position, raw_offset, raw_range};
use crate::model::Verse;
use crate::{Direction, ScrollConvention, StripFactory, WordCard};

fn sum_widths(widths: &[f64], gap: f64) -> f64 {
    let cards: f64 = widths.iter().map(|w| w.max(0.0)).sum();
    let gaps = gap.max(0.0) * widths.len().saturating_sub(1) as f64;
    cards + gaps
}

/// A scroll container whose geometry is plain numbers, clamped the way a browser clamps
/// `scrollLeft` under the given convention.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatedStrip {
    convention: ScrollConvention,
    direction: Direction,
    container_width: f64,
    item_widths: Vec<f64>,
    gap: f64,
    offset: f64,
    writes: usize,
}

impl SimulatedStrip {
    /// Creates a left-to-right strip; attaching it to a carousel sets the real direction.
    pub fn new(
        convention: ScrollConvention,
        container_width: f64,
        item_widths: Vec<f64>,
        gap: f64,
    ) -> Self {
        Self {
            convention,
            direction: Direction::Ltr,
            container_width,
            item_widths,
            gap,
            offset: 0.0,
            writes: 0,
        }
    }

    /// A strip of `count` equally wide cards.
    pub fn uniform(
        convention: ScrollConvention,
        container_width: f64,
        count: usize,
        item_width: f64,
        gap: f64,
    ) -> Self {
        Self::new(convention, container_width, vec![item_width; count], gap)
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.lay_out(direction);
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn convention(&self) -> ScrollConvention {
        self.convention
    }

    /// Number of offset writes that reached the strip.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn normalized_position(&self) -> f64 {
        normalized_position(
            self.direction,
            self.convention,
            self.offset,
            self.content_width(),
            self.container_width,
        )
    }

    /// Emulates the user dragging the strip to a logical position.
    pub fn user_scroll_to(&mut self, position: f64) {
        self.offset = raw_offset(
            self.direction,
            self.convention,
            position,
            self.content_width(),
            self.container_width,
        );
    }

    pub fn resize_container(&mut self, container_width: f64) {
        self.container_width = container_width.max(0.0);
        self.clamp();
    }

    pub fn set_item_width(&mut self, index: usize, width: f64) {
        if let Some(slot) = self.item_widths.get_mut(index) {
            *slot = width;
        }
        self.clamp();
    }

    /// Lays the strip out in `direction`, placing the offset where a freshly laid out host
    /// container would put it.
    fn lay_out(&mut self, direction: Direction) {
        self.direction = direction;
        let (lo, hi) = self.range();
        self.offset = match (direction, self.convention) {
            (Direction::Rtl, ScrollConvention::Normal) => hi,
            _ => 0.0_f64.clamp(lo, hi),
        };
    }

    fn range(&self) -> (f64, f64) {
        raw_range(
            self.direction,
            self.convention,
            self.content_width(),
            self.container_width,
        )
    }

    fn clamp(&mut self) {
        let (lo, hi) = self.range();
        self.offset = self.offset.clamp(lo, hi);
    }
}

impl ScrollSurface for SimulatedStrip {
    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        self.writes += 1;
        if !offset.is_finite() {
            return;
        }
        let (lo, hi) = self.range();
        self.offset = offset.clamp(lo, hi);
    }

    fn content_width(&self) -> f64 {
        sum_widths(&self.item_widths, self.gap)
    }

    fn container_width(&self) -> f64 {
        self.container_width
    }

    fn item_count(&self) -> usize {
        self.item_widths.len()
    }

    fn item_width(&self, index: usize) -> Option<f64> {
        self.item_widths.get(index).copied()
    }

    fn gap(&self) -> f64 {
        self.gap
    }

    fn set_layout_direction(&mut self, direction: Direction) {
        if direction != self.direction {
            self.lay_out(direction);
        }
    }
}

/// An offscreen right-to-left strip with wide content, answering convention probes.
#[derive(Clone, Debug)]
pub struct SimulatedProbe {
    strip: SimulatedStrip,
}

impl SimulatedProbe {
    pub fn new(convention: ScrollConvention) -> Self {
        let strip = SimulatedStrip::new(convention, 100.0, vec![300.0], 0.0)
            .with_direction(Direction::Rtl);
        Self { strip }
    }
}

impl ScrollProbe for SimulatedProbe {
    fn initial_offset(&mut self) -> f64 {
        self.strip.scroll_offset()
    }

    fn nudge_to(&mut self, offset: f64) -> f64 {
        self.strip.set_scroll_offset(offset);
        self.strip.scroll_offset()
    }
}

/// Creates [`SimulatedStrip`]s with fixed card widths for every rendered verse.
#[derive(Clone, Debug)]
pub struct SimulatedHost {
    pub convention: ScrollConvention,
    pub container_width: f64,
    pub card_width: f64,
    pub gap: f64,
    /// Number of probes handed out, to observe convention caching.
    pub probes: usize,
}

impl SimulatedHost {
    pub fn new(convention: ScrollConvention, container_width: f64, card_width: f64) -> Self {
        Self {
            convention,
            container_width,
            card_width,
            gap: 0.0,
            probes: 0,
        }
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }
}

impl StripFactory for SimulatedHost {
    type Surface = SimulatedStrip;
    type Probe = SimulatedProbe;

    fn probe(&mut self) -> SimulatedProbe {
        self.probes += 1;
        SimulatedProbe::new(self.convention)
    }

    fn create_strip(&mut self, _verse: &Verse, cards: &[WordCard]) -> SimulatedStrip {
        SimulatedStrip::uniform(
            self.convention,
            self.container_width,
            cards.len(),
            self.card_width,
            self.gap,
        )
    }
}
