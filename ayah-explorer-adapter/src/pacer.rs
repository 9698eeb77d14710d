use ayah_explorer::{Carousel, ExplorerOptions, NavButtons, ScrollSurface, StepIntent};

use crate::{Debounce, Easing, Throttle, Tween};

/// Timing knobs for a [`StripPacer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PacerOptions {
    pub scroll_throttle_ms: u64,
    pub resize_debounce_ms: u64,
    /// `0` steps instantly.
    pub smooth_scroll_ms: u64,
    pub easing: Easing,
}

impl PacerOptions {
    pub fn from_explorer(options: &ExplorerOptions) -> Self {
        Self {
            scroll_throttle_ms: options.scroll_throttle_ms,
            resize_debounce_ms: options.resize_debounce_ms,
            smooth_scroll_ms: options.smooth_scroll_ms,
            easing: Easing::default(),
        }
    }
}

impl Default for PacerOptions {
    fn default() -> Self {
        Self::from_explorer(&ExplorerOptions::default())
    }
}

/// Event-rate control and smooth stepping for one carousel.
///
/// The pacer holds no surface. Hosts drive it by calling:
/// - `on_scroll` / `on_resize` when the strip reports user scrolling or a size change
/// - `step` for previous/next activations
/// - `tick(now_ms)` each frame, which applies tween frames and trailing refreshes
#[derive(Clone, Debug)]
pub struct StripPacer {
    options: PacerOptions,
    scroll: Throttle,
    resize: Debounce,
    tween: Option<Tween>,
}

impl StripPacer {
    pub fn new(options: PacerOptions) -> Self {
        Self {
            options,
            scroll: Throttle::new(options.scroll_throttle_ms),
            resize: Debounce::new(options.resize_debounce_ms),
            tween: None,
        }
    }

    pub fn options(&self) -> PacerOptions {
        self.options
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Raw offset the running animation ends on.
    pub fn target(&self) -> Option<f64> {
        self.tween.map(|t| t.to)
    }

    pub fn cancel_animation(&mut self) {
        self.tween = None;
    }

    /// Call this when the host reports a user scroll (wheel, drag, momentum).
    ///
    /// This cancels any active tween. Returns the refreshed buttons on the leading edge of a
    /// burst; the trailing refresh happens in [`Self::tick`].
    pub fn on_scroll<S: ScrollSurface>(
        &mut self,
        carousel: &mut Carousel<S>,
        now_ms: u64,
    ) -> Option<NavButtons> {
        self.cancel_animation();
        self.scroll.hit(now_ms).then(|| carousel.on_scroll())
    }

    pub fn on_resize(&mut self, now_ms: u64) {
        self.resize.trigger(now_ms);
    }

    /// Starts (or extends) a smooth step toward `intent`.
    ///
    /// Steps issued while an animation runs are measured from its target, so rapid activations
    /// advance one card each without overshooting the edge. Returns the new raw target, or
    /// `None` when the step was a no-op.
    pub fn step<S: ScrollSurface>(
        &mut self,
        carousel: &mut Carousel<S>,
        intent: StepIntent,
        now_ms: u64,
    ) -> Option<f64> {
        if self.options.smooth_scroll_ms == 0 {
            self.cancel_animation();
            return carousel.step(intent);
        }

        let current = carousel.surface().scroll_offset();
        let from = self.target().unwrap_or(current);
        let target = carousel.step_target_from(from, intent)?;
        atrace!(?intent, from, target, "smooth step");
        match &mut self.tween {
            Some(tween) => tween.retarget(now_ms, target, self.options.smooth_scroll_ms),
            None => {
                self.tween = Some(Tween::new(
                    current,
                    target,
                    now_ms,
                    self.options.smooth_scroll_ms,
                    self.options.easing,
                ));
            }
        }
        Some(target)
    }

    /// Advances the pacer.
    ///
    /// - Flushes a trailing scroll refresh and a settled resize.
    /// - If a tween is active, applies its next frame and returns the applied offset.
    pub fn tick<S: ScrollSurface>(&mut self, carousel: &mut Carousel<S>, now_ms: u64) -> Option<f64> {
        if self.scroll.poll(now_ms) {
            carousel.on_scroll();
        }
        if self.resize.poll(now_ms) {
            carousel.on_resize();
        }

        let tween = self.tween?;
        carousel.scroll_to_raw(tween.sample(now_ms));
        if tween.is_done(now_ms) {
            self.tween = None;
        }
        Some(carousel.surface().scroll_offset())
    }
}
