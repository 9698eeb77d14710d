use ayah_explorer::{Direction, Explorer, NavButtons, StepIntent, StripFactory};

use crate::{PacerOptions, StripPacer};

/// Wraps an [`Explorer`] with one [`StripPacer`] per rendered verse.
///
/// Pacers are rebuilt whenever the explorer re-renders or clears its view, so no timer or
/// animation outlives the strip it belongs to.
pub struct ExplorerDriver<F: StripFactory> {
    explorer: Explorer<F>,
    options: PacerOptions,
    pacers: Vec<StripPacer>,
    generation: u64,
}

impl<F: StripFactory> ExplorerDriver<F> {
    pub fn new(explorer: Explorer<F>) -> Self {
        let options = PacerOptions::from_explorer(explorer.options());
        let mut driver = Self {
            generation: explorer.generation(),
            explorer,
            options,
            pacers: Vec::new(),
        };
        driver.rebuild_pacers();
        driver
    }

    pub fn with_pacer_options(mut self, options: PacerOptions) -> Self {
        self.options = options;
        self.rebuild_pacers();
        self
    }

    pub fn explorer(&self) -> &Explorer<F> {
        &self.explorer
    }

    /// Mutable access for loading decks and other explorer calls; pacers catch up on the next
    /// driver call.
    pub fn explorer_mut(&mut self) -> &mut Explorer<F> {
        &mut self.explorer
    }

    pub fn into_explorer(self) -> Explorer<F> {
        self.explorer
    }

    pub fn pacer(&self, verse: usize) -> Option<&StripPacer> {
        self.pacers.get(verse)
    }

    pub fn is_animating(&self) -> bool {
        self.pacers.iter().any(StripPacer::is_animating)
    }

    fn rebuild_pacers(&mut self) {
        self.generation = self.explorer.generation();
        self.pacers = (0..self.explorer.verse_count())
            .map(|_| StripPacer::new(self.options))
            .collect();
    }

    fn sync(&mut self) {
        if self.generation != self.explorer.generation()
            || self.pacers.len() != self.explorer.verse_count()
        {
            adebug!(generation = self.explorer.generation(), "rebuilding strip pacers");
            self.rebuild_pacers();
        }
    }

    pub fn on_scroll(&mut self, verse: usize, now_ms: u64) -> Option<NavButtons> {
        self.sync();
        let pacer = self.pacers.get_mut(verse)?;
        let carousel = self.explorer.view_mut()?.verse_mut(verse)?.carousel_mut();
        pacer.on_scroll(carousel, now_ms)
    }

    pub fn on_resize(&mut self, verse: usize, now_ms: u64) {
        self.sync();
        if let Some(pacer) = self.pacers.get_mut(verse) {
            pacer.on_resize(now_ms);
        }
    }

    /// A window resize affects every strip.
    pub fn on_window_resize(&mut self, now_ms: u64) {
        self.sync();
        for pacer in &mut self.pacers {
            pacer.on_resize(now_ms);
        }
    }

    pub fn step(&mut self, verse: usize, intent: StepIntent, now_ms: u64) -> Option<f64> {
        self.sync();
        let pacer = self.pacers.get_mut(verse)?;
        let carousel = self.explorer.view_mut()?.verse_mut(verse)?.carousel_mut();
        pacer.step(carousel, intent, now_ms)
    }

    /// Expands or collapses a card. The strip changes width, so its resize timer is armed.
    pub fn activate_card(&mut self, verse: usize, card: usize, now_ms: u64) -> bool {
        self.sync();
        let changed = self.explorer.activate_card(verse, card);
        if changed {
            self.on_resize(verse, now_ms);
        }
        changed
    }

    /// Flips the direction; running animations are dropped before every strip realigns.
    pub fn set_direction(&mut self, direction: Direction) {
        self.sync();
        for pacer in &mut self.pacers {
            pacer.cancel_animation();
        }
        self.explorer.set_direction(direction);
    }

    pub fn toggle_direction(&mut self) -> Direction {
        self.set_direction(self.explorer.direction().flipped());
        self.explorer.direction()
    }

    /// Frame callback: aligns freshly attached strips, then advances every pacer.
    ///
    /// Returns `true` while any strip is still animating.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.sync();
        self.explorer.after_layout();
        let Some(view) = self.explorer.view_mut() else {
            return false;
        };
        for (index, pacer) in self.pacers.iter_mut().enumerate() {
            if let Some(verse) = view.verse_mut(index) {
                pacer.tick(verse.carousel_mut(), now_ms);
            }
        }
        self.is_animating()
    }
}
