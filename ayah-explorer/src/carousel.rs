use crate::direction::{self, max_scroll, raw_range};
use crate::{CarouselState, Direction, Edges, NavButtons, ScrollConvention, StepIntent};

/// A live, horizontally scrollable strip of cards owned by the host.
///
/// Offsets are raw and convention-specific. Hosts clamp writes natively, the way a browser
/// clamps `scrollLeft`; [`crate::SimulatedStrip`] implements the same clamping for tests.
pub trait ScrollSurface {
    fn scroll_offset(&self) -> f64;
    fn set_scroll_offset(&mut self, offset: f64);
    fn content_width(&self) -> f64;
    fn container_width(&self) -> f64;
    fn item_count(&self) -> usize;
    /// Rendered width of one card, when it has been laid out.
    fn item_width(&self, index: usize) -> Option<f64>;

    /// Space between adjacent cards.
    fn gap(&self) -> f64 {
        0.0
    }

    /// Called when the strip's layout direction flips.
    fn set_layout_direction(&mut self, _direction: Direction) {}
}

/// Smallest step the carousel takes when falling back to `step_fallback_px`.
pub const MIN_STEP_PX: f64 = 1.0;

/// Tuning knobs for [`Carousel`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarouselOptions {
    /// Step size used when no card width is available; never below [`MIN_STEP_PX`].
    pub step_fallback_px: f64,
    /// Tolerance for start/end detection.
    pub edge_epsilon: f64,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            step_fallback_px: 240.0,
            edge_epsilon: 1.0,
        }
    }
}

/// Direction-correct navigation over one [`ScrollSurface`].
///
/// The carousel never reverses data: the first card is always logical index `0`, and all
/// decisions go through the direction model in [`crate::direction`].
#[derive(Clone, Debug)]
pub struct Carousel<S> {
    surface: S,
    direction: Direction,
    convention: ScrollConvention,
    options: CarouselOptions,
    buttons: NavButtons,
    needs_align: bool,
    resting_at_start: bool,
}

impl<S: ScrollSurface> Carousel<S> {
    /// Binds to a surface and schedules [`Self::align_to_start`] for the next frame.
    ///
    /// Alignment waits for [`Self::after_layout`] because content width is not final until the
    /// host has laid the cards out.
    pub fn attach(
        mut surface: S,
        direction: Direction,
        convention: ScrollConvention,
        options: CarouselOptions,
    ) -> Self {
        surface.set_layout_direction(direction);
        let mut carousel = Self {
            surface,
            direction,
            convention,
            options,
            buttons: NavButtons::DISABLED,
            needs_align: true,
            resting_at_start: true,
        };
        carousel.refresh_buttons();
        carousel
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for hosts that feed measurements or user scrolling into the surface.
    ///
    /// Follow up with [`Self::on_scroll`] or [`Self::on_resize`] so button state catches up.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn convention(&self) -> ScrollConvention {
        self.convention
    }

    pub fn options(&self) -> CarouselOptions {
        self.options
    }

    /// The button state computed by the last refresh.
    pub fn buttons(&self) -> NavButtons {
        self.buttons
    }

    pub fn needs_align(&self) -> bool {
        self.needs_align
    }

    pub fn is_empty(&self) -> bool {
        self.surface.item_count() == 0
    }

    /// Frame callback: performs a scheduled alignment exactly once.
    ///
    /// This is the only place the scheduled alignment is consumed. Resizes and direction changes
    /// that arrive before it leave it pending, since widths are not final until layout.
    pub fn after_layout(&mut self) -> bool {
        if !self.needs_align {
            return false;
        }
        self.needs_align = false;
        self.align_to_start();
        true
    }

    fn rest_target(&self) -> f64 {
        let content = self.surface.content_width();
        let container = self.surface.container_width();
        let (lo, hi) = raw_range(self.direction, self.convention, content, container);
        direction::rest_offset(self.direction, self.convention, content, container).clamp(lo, hi)
    }

    /// Scrolls to the offset that shows the logically first card.
    ///
    /// Returns `false` when the strip was already there and nothing was written.
    pub fn align_to_start(&mut self) -> bool {
        let target = self.rest_target();
        let current = self.surface.scroll_offset();
        let moved = (current - target).abs() > f64::EPSILON;
        if moved {
            etrace!(current, target, "align_to_start");
            self.surface.set_scroll_offset(target);
        }
        self.refresh_buttons();
        moved
    }

    /// Distance covered by one step forward from the current offset: the card at the leading
    /// edge plus the gap after it.
    pub fn step_magnitude(&self) -> f64 {
        let position = self.normalized_position();
        self.step_magnitude_at(position, StepIntent::Next)
    }

    /// Measures the card a step from logical `position` crosses.
    ///
    /// Stepping forward crosses the card at the leading edge; stepping back crosses the card
    /// that ends at (or just past) it. Unmeasured cards fall back to `step_fallback_px`.
    fn step_magnitude_at(&self, position: f64, intent: StepIntent) -> f64 {
        let fallback = self.options.step_fallback_px.max(MIN_STEP_PX);
        let gap = self.surface.gap().max(0.0);
        let epsilon = self.options.edge_epsilon.max(0.0);
        let mut start = 0.0;
        let mut span = fallback;
        for index in 0..self.surface.item_count() {
            span = match self.surface.item_width(index) {
                Some(width) if width.is_finite() && width > 0.0 => width + gap,
                _ => return fallback,
            };
            let end = start + span;
            let crosses = match intent {
                StepIntent::Next => end > position + epsilon,
                StepIntent::Previous => end >= position - epsilon,
            };
            if crosses {
                return span;
            }
            start = end;
        }
        span
    }

    /// Computes the raw offset a step from the current offset would land on.
    ///
    /// Returns `None` when there is nothing to scroll or the strip already sits at the edge the
    /// step moves toward.
    pub fn step_target(&self, intent: StepIntent) -> Option<f64> {
        self.step_target_from(self.surface.scroll_offset(), intent)
    }

    /// Like [`Self::step_target`], starting from an arbitrary raw offset (e.g. the target of an
    /// in-flight smooth scroll).
    pub fn step_target_from(&self, raw: f64, intent: StepIntent) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let content = self.surface.content_width();
        let container = self.surface.container_width();
        let edges = direction::edges(
            self.direction,
            self.convention,
            raw,
            content,
            container,
            self.options.edge_epsilon,
        );
        let blocked = match intent {
            StepIntent::Previous => edges.at_start,
            StepIntent::Next => edges.at_end,
        };
        if blocked {
            return None;
        }
        let position =
            direction::normalized_position(self.direction, self.convention, raw, content, container);
        let delta = direction::step_delta(
            self.direction,
            self.convention,
            intent.visual_sign(),
            self.step_magnitude_at(position, intent),
        );
        let (lo, hi) = raw_range(self.direction, self.convention, content, container);
        Some((raw + delta).clamp(lo, hi))
    }

    /// Steps one card toward `intent` without animation.
    ///
    /// Returns the applied offset, or `None` when the step was a no-op.
    pub fn step(&mut self, intent: StepIntent) -> Option<f64> {
        let target = self.step_target(intent)?;
        etrace!(?intent, target, "step");
        self.surface.set_scroll_offset(target);
        self.refresh_buttons();
        Some(self.surface.scroll_offset())
    }

    /// Applies a programmatic raw offset (e.g. one frame of a smooth scroll).
    pub fn scroll_to_raw(&mut self, raw: f64) -> NavButtons {
        self.surface.set_scroll_offset(raw);
        self.refresh_buttons()
    }

    pub fn max_scroll(&self) -> f64 {
        max_scroll(self.surface.content_width(), self.surface.container_width())
    }

    pub fn normalized_position(&self) -> f64 {
        direction::normalized_position(
            self.direction,
            self.convention,
            self.surface.scroll_offset(),
            self.surface.content_width(),
            self.surface.container_width(),
        )
    }

    pub fn edges(&self) -> Edges {
        direction::edges(
            self.direction,
            self.convention,
            self.surface.scroll_offset(),
            self.surface.content_width(),
            self.surface.container_width(),
            self.options.edge_epsilon,
        )
    }

    pub fn is_at_start(&self) -> bool {
        self.edges().at_start
    }

    pub fn is_at_end(&self) -> bool {
        self.edges().at_end
    }

    /// Recomputes the disabled state of the previous/next controls.
    pub fn refresh_buttons(&mut self) -> NavButtons {
        let buttons = if self.is_empty() {
            self.resting_at_start = true;
            NavButtons::DISABLED
        } else {
            let edges = self.edges();
            self.resting_at_start = edges.at_start;
            NavButtons::from_edges(edges)
        };
        if buttons != self.buttons {
            etrace!(
                previous_disabled = buttons.previous_disabled,
                next_disabled = buttons.next_disabled,
                "refresh_buttons"
            );
        }
        self.buttons = buttons;
        buttons
    }

    /// Host-reported scroll (user drag, wheel, momentum).
    pub fn on_scroll(&mut self) -> NavButtons {
        self.refresh_buttons()
    }

    /// Host-reported resize of the container or its cards.
    ///
    /// A strip that was resting at its logical start stays there: under some conventions the
    /// start offset depends on the content width.
    pub fn on_resize(&mut self) -> NavButtons {
        if self.resting_at_start && !self.needs_align {
            self.align_to_start();
        } else {
            self.refresh_buttons();
        }
        self.buttons
    }

    /// Switches layout direction and realigns to the logical start.
    ///
    /// Before the first [`Self::after_layout`] only the buttons are refreshed; the scheduled
    /// alignment runs in the new direction. Card expansion state lives in the cards and is
    /// untouched.
    pub fn on_direction_change(&mut self, direction: Direction) {
        edebug!(from = ?self.direction, to = ?direction, "carousel direction change");
        self.direction = direction;
        self.surface.set_layout_direction(direction);
        if self.needs_align {
            self.refresh_buttons();
        } else {
            self.align_to_start();
        }
    }

    pub fn state(&self) -> CarouselState {
        CarouselState {
            scroll_offset: self.surface.scroll_offset(),
            container_width: self.surface.container_width(),
            content_width: self.surface.content_width(),
            direction: self.direction,
        }
    }
}
