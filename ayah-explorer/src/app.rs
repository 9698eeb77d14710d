use crate::direction::ConventionCache;
use crate::loader::{DeckSource, FetchError, LoadError};
use crate::model::{Deck, VerseSet};
use crate::options::ExplorerOptions;
use crate::prefs::{DIRECTION_KEY, PreferenceStore};
use crate::render::{DeckView, RenderContext, StripFactory, render_deck};
use crate::view::{Element, Node};
use crate::{Direction, ScrollConvention, StepIntent};

/// Identifies one deck load. Only the most recently issued ticket is honored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

/// A deck fetch the host must perform and report back through
/// [`Explorer::complete_deck_load`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    pub ticket: LoadTicket,
    pub deck_id: String,
    pub data_ref: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The deck replaced whatever was on screen.
    Applied,
    /// The load failed; a notice names the deck.
    Failed,
    /// A newer selection superseded this load; nothing changed.
    Stale,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading { deck_id: String },
    Ready,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    /// Nothing usable is on screen (manifest failure).
    Blocking,
    /// Shown alongside the rest of the UI (deck failure).
    Inline,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl From<&LoadError> for Notice {
    fn from(err: &LoadError) -> Self {
        Self {
            kind: if err.is_blocking() {
                NoticeKind::Blocking
            } else {
                NoticeKind::Inline
            },
            message: err.to_string(),
        }
    }
}

/// State of the deck selector control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorView {
    /// `(id, display name)` in manifest order.
    pub options: Vec<(String, String)>,
    pub selected: Option<String>,
    pub enabled: bool,
}

/// The top-level application controller.
///
/// It owns the loaded [`VerseSet`] (the single source of truth for rendering), the process-wide
/// direction preference, and the rendered [`DeckView`]. Hosts feed it manifest/deck results,
/// user intents and frame callbacks.
pub struct Explorer<F: StripFactory> {
    options: ExplorerOptions,
    factory: F,
    conventions: ConventionCache,
    preferences: Option<Box<dyn PreferenceStore>>,
    direction: Direction,
    manifest: Vec<Deck>,
    manifest_loaded: bool,
    selected: Option<String>,
    pending: Option<LoadRequest>,
    next_ticket: u64,
    verse_set: Option<VerseSet>,
    view: Option<DeckView<F::Surface>>,
    generation: u64,
    status: Status,
    notice: Option<Notice>,
    focused: usize,
    page_scroll: f64,
}

impl<F: StripFactory> Explorer<F> {
    pub fn new(options: ExplorerOptions, factory: F) -> Self {
        let conventions = match options.convention {
            Some(convention) => ConventionCache::with_convention(convention),
            None => ConventionCache::new(),
        };
        Self {
            direction: options.default_direction,
            options,
            factory,
            conventions,
            preferences: None,
            manifest: Vec::new(),
            manifest_loaded: false,
            selected: None,
            pending: None,
            next_ticket: 0,
            verse_set: None,
            view: None,
            generation: 0,
            status: Status::Idle,
            notice: None,
            focused: 0,
            page_scroll: 0.0,
        }
    }

    /// Attaches a preference store and restores a previously saved direction from it.
    pub fn with_preferences(mut self, store: impl PreferenceStore + 'static) -> Self {
        if self.options.persist_direction {
            if let Some(direction) = store.get(DIRECTION_KEY).as_deref().and_then(Direction::parse) {
                edebug!(?direction, "restored direction preference");
                self.direction = direction;
            }
        }
        self.preferences = Some(Box::new(store));
        self
    }

    pub fn options(&self) -> &ExplorerOptions {
        &self.options
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The session's scroll convention, probing the host on first use.
    pub fn convention(&mut self) -> ScrollConvention {
        let factory = &mut self.factory;
        self.conventions.get_or_detect(|| factory.probe())
    }

    pub fn manifest(&self) -> &[Deck] {
        &self.manifest
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn verse_set(&self) -> Option<&VerseSet> {
        self.verse_set.as_ref()
    }

    pub fn view(&self) -> Option<&DeckView<F::Surface>> {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> Option<&mut DeckView<F::Surface>> {
        self.view.as_mut()
    }

    /// Bumped every time the view is rebuilt or cleared, so per-strip host state can be reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> Option<&LoadRequest> {
        self.pending.as_ref()
    }

    pub fn selector(&self) -> SelectorView {
        SelectorView {
            options: self
                .manifest
                .iter()
                .map(|deck| (deck.id.clone(), deck.display_name().to_owned()))
                .collect(),
            selected: self.selected.clone(),
            enabled: self.manifest_loaded && !self.manifest.is_empty(),
        }
    }

    /// Applies the result of the startup manifest fetch.
    pub fn load_manifest(&mut self, result: Result<Vec<Deck>, FetchError>) -> Result<usize, LoadError> {
        match result {
            Ok(decks) => {
                edebug!(decks = decks.len(), "manifest loaded");
                self.manifest = decks;
                self.manifest_loaded = true;
                if self.notice.as_ref().is_some_and(|n| n.kind == NoticeKind::Blocking) {
                    self.notice = None;
                }
                Ok(self.manifest.len())
            }
            Err(source) => {
                let err = LoadError::ManifestUnavailable { source };
                ewarn!(error = %err, "manifest unavailable");
                self.manifest.clear();
                self.manifest_loaded = false;
                self.selected = None;
                self.pending = None;
                self.notice = Some(Notice::from(&err));
                self.status = Status::Failed;
                Err(err)
            }
        }
    }

    /// Starts loading a deck. Unknown ids fall back to the first manifest entry.
    ///
    /// Any load still in flight is superseded: its completion will be reported as
    /// [`LoadOutcome::Stale`].
    pub fn select_deck(&mut self, id: &str) -> Option<LoadRequest> {
        let deck = self
            .manifest
            .iter()
            .find(|deck| deck.id == id)
            .or_else(|| self.manifest.first())?
            .clone();
        self.next_ticket += 1;
        let request = LoadRequest {
            ticket: LoadTicket(self.next_ticket),
            deck_id: deck.id,
            data_ref: deck.data_ref,
        };
        edebug!(deck = %request.deck_id, ticket = self.next_ticket, "select_deck");
        self.selected = Some(request.deck_id.clone());
        self.status = Status::Loading {
            deck_id: request.deck_id.clone(),
        };
        if self.notice.as_ref().is_some_and(|n| n.kind == NoticeKind::Inline) {
            self.notice = None;
        }
        self.pending = Some(request.clone());
        Some(request)
    }

    /// Applies the result of a deck fetch started by [`Self::select_deck`].
    pub fn complete_deck_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<VerseSet, FetchError>,
    ) -> LoadOutcome {
        self.apply_deck_load(ticket, result)
            .unwrap_or(LoadOutcome::Failed)
    }

    fn apply_deck_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<VerseSet, FetchError>,
    ) -> Result<LoadOutcome, LoadError> {
        let request = match self.pending.take() {
            Some(request) if request.ticket == ticket => request,
            other => {
                ewarn!(?ticket, "ignoring superseded deck load");
                self.pending = other;
                return Ok(LoadOutcome::Stale);
            }
        };

        match result {
            Ok(verse_set) => {
                self.verse_set = Some(verse_set);
                self.rerender();
                self.status = Status::Ready;
                Ok(LoadOutcome::Applied)
            }
            Err(source) => {
                let name = self
                    .manifest
                    .iter()
                    .find(|deck| deck.id == request.deck_id)
                    .map(|deck| deck.display_name().to_owned())
                    .unwrap_or(request.deck_id);
                let err = LoadError::for_deck(name, source);
                ewarn!(error = %err, "deck unavailable");
                self.notice = Some(Notice::from(&err));
                self.verse_set = None;
                self.view = None;
                self.generation += 1;
                self.status = Status::Failed;
                Err(err)
            }
        }
    }

    /// Loads the manifest and the first deck synchronously.
    pub fn start(&mut self, source: &impl DeckSource) -> Result<(), LoadError> {
        let count = self.load_manifest(source.fetch_manifest())?;
        if count == 0 {
            return Ok(());
        }
        let first = self.manifest[0].id.clone();
        self.open_deck(source, &first)
    }

    /// Selects and loads a deck synchronously.
    pub fn open_deck(&mut self, source: &impl DeckSource, id: &str) -> Result<(), LoadError> {
        let Some(request) = self.select_deck(id) else {
            return Ok(());
        };
        let result = source.fetch_deck(&request.data_ref);
        self.apply_deck_load(request.ticket, result).map(|_| ())
    }

    fn render_context(&mut self) -> RenderContext {
        RenderContext {
            direction: self.direction,
            convention: self.convention(),
            card: self.options.card_options(),
            carousel: self.options.carousel_options(),
        }
    }

    fn rerender(&mut self) {
        let context = self.render_context();
        let view = match &self.verse_set {
            Some(verse_set) => render_deck(verse_set, &context, &mut self.factory),
            None => return,
        };
        self.view = Some(view);
        self.generation += 1;
        self.focused = 0;
        self.page_scroll = 0.0;
    }

    /// Frame callback: aligns carousels that were attached since the last frame.
    pub fn after_layout(&mut self) -> usize {
        self.view.as_mut().map_or(0, DeckView::after_layout)
    }

    /// The single mutation entry point for the UI direction.
    ///
    /// Every live carousel realigns to its logical start; nothing is re-rendered.
    pub fn set_direction(&mut self, direction: Direction) {
        if direction == self.direction {
            return;
        }
        edebug!(?direction, "set_direction");
        self.direction = direction;
        if let Some(view) = &mut self.view {
            view.set_direction(direction);
        }
        self.persist_direction();
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn persist_direction(&mut self) {
        if !self.options.persist_direction {
            return;
        }
        if let Some(store) = &mut self.preferences {
            if let Err(err) = store.set(DIRECTION_KEY, self.direction.as_str()) {
                ewarn!(error = %err, "could not persist direction preference");
            }
        }
    }

    pub fn toggle_direction(&mut self) -> Direction {
        self.set_direction(self.direction.flipped());
        self.direction
    }

    pub fn activate_card(&mut self, verse: usize, card: usize) -> bool {
        self.view
            .as_mut()
            .and_then(|view| view.verse_mut(verse))
            .is_some_and(|verse| verse.activate_card(card))
    }

    pub fn step(&mut self, verse: usize, intent: StepIntent) -> Option<f64> {
        self.view.as_mut()?.verse_mut(verse)?.step(intent)
    }

    pub fn focused_verse(&self) -> usize {
        self.focused
    }

    pub fn verse_count(&self) -> usize {
        self.view.as_ref().map_or(0, DeckView::len)
    }

    /// `"3 / 7"` style position of the focused verse.
    pub fn verse_counter(&self) -> Option<String> {
        let count = self.verse_count();
        (count > 0).then(|| format!("{} / {count}", self.focused + 1))
    }

    pub fn can_focus_previous(&self) -> bool {
        self.focused > 0
    }

    pub fn can_focus_next(&self) -> bool {
        self.focused + 1 < self.verse_count()
    }

    pub fn focus_next_verse(&mut self) -> bool {
        if !self.can_focus_next() {
            return false;
        }
        self.focus_verse(self.focused + 1)
    }

    pub fn focus_previous_verse(&mut self) -> bool {
        if !self.can_focus_previous() {
            return false;
        }
        self.focus_verse(self.focused - 1)
    }

    /// Moves the reader to a verse; the page scrolls back to the top.
    pub fn focus_verse(&mut self, index: usize) -> bool {
        if index >= self.verse_count() {
            return false;
        }
        self.focused = index;
        self.page_scroll = 0.0;
        true
    }

    pub fn page_scroll(&self) -> f64 {
        self.page_scroll
    }

    /// Host-reported vertical page scroll.
    pub fn on_page_scroll(&mut self, offset: f64) {
        self.page_scroll = offset.max(0.0);
    }

    /// Snapshot of the whole UI: top bar, notice, and the current deck.
    pub fn to_node(&self) -> Node {
        let selector = self.selector();
        let mut select = Element::with_class("select", "deck-select");
        if !selector.enabled {
            select.set_attr("disabled", "");
        }
        for (id, name) in &selector.options {
            let mut option = Element::new("option").attr("value", id.clone()).text(name.clone());
            if selector.selected.as_deref() == Some(id.as_str()) {
                option.set_attr("selected", "");
            }
            select.push(option);
        }

        let mut topbar = Element::with_class("nav", "topbar")
            .child(select)
            .child(Element::with_class("button", "dir-toggle").text(self.direction.label()));
        if let Some(counter) = self.verse_counter() {
            topbar.push(Element::with_class("span", "ayah-counter").text(counter));
        }

        let mut root = Element::with_class("div", "app")
            .attr("dir", self.direction.as_str())
            .child(topbar);
        if let Some(notice) = &self.notice {
            let class = match notice.kind {
                NoticeKind::Blocking => "notice-blocking",
                NoticeKind::Inline => "notice-inline",
            };
            root.push(
                Element::with_class("div", "notice")
                    .class(class)
                    .text(notice.message.clone()),
            );
        }
        if matches!(self.status, Status::Loading { .. }) {
            root.push(Element::with_class("div", "loading").text("Loading…"));
        }
        if let Some(view) = &self.view {
            root.push(view.to_node(Some(self.focused)));
        }
        root.into()
    }
}
