use crate::card::{CardOptions, WordCard};
use crate::carousel::{Carousel, CarouselOptions, ScrollSurface};
use crate::direction::ScrollProbe;
use crate::model::{Verse, VerseSet};
use crate::view::{Element, Node, arabic_element, text_element};
use crate::{Direction, NavButtons, ScrollConvention, StepIntent};

/// Creates live strips for rendered verses and probes the host's scroll convention.
pub trait StripFactory {
    type Surface: ScrollSurface;
    type Probe: ScrollProbe;

    /// An offscreen right-to-left container for convention detection.
    fn probe(&mut self) -> Self::Probe;

    /// A scroll container holding `cards`, laid out left-to-right until a carousel attaches.
    fn create_strip(&mut self, verse: &Verse, cards: &[WordCard]) -> Self::Surface;
}

/// Everything a render pass needs besides the data.
#[derive(Clone, Debug)]
pub struct RenderContext {
    pub direction: Direction,
    pub convention: ScrollConvention,
    pub card: CardOptions,
    pub carousel: CarouselOptions,
}

/// One verse: its header block plus a carousel of word cards in logical order.
#[derive(Clone, Debug)]
pub struct VerseView<S> {
    badge: String,
    header: Node,
    carousel: Carousel<S>,
    cards: Vec<WordCard>,
}

impl<S: ScrollSurface> VerseView<S> {
    /// Verse tag shown in the badge (`chapter:verse`, or `Ayah N` when the data has none).
    pub fn badge(&self) -> &str {
        &self.badge
    }

    pub fn cards(&self) -> &[WordCard] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&WordCard> {
        self.cards.get(index)
    }

    pub fn carousel(&self) -> &Carousel<S> {
        &self.carousel
    }

    pub fn carousel_mut(&mut self) -> &mut Carousel<S> {
        &mut self.carousel
    }

    /// Fires the affordance of one card, then refreshes this verse's buttons since the strip
    /// may have changed width.
    pub fn activate_card(&mut self, index: usize) -> bool {
        let Some(card) = self.cards.get_mut(index) else {
            return false;
        };
        let changed = card.activate();
        if changed {
            etrace!(badge = %self.badge, index, state = ?card.state(), "card toggled");
            self.carousel.refresh_buttons();
        }
        changed
    }

    pub fn step(&mut self, intent: StepIntent) -> Option<f64> {
        self.carousel.step(intent)
    }

    pub fn to_node(&self) -> Node {
        let buttons = self.carousel.buttons();
        let strip = Element::with_class("div", "carousel")
            .child(nav_button("nav-prev", "previous", buttons, StepIntent::Previous))
            .child(
                Element::with_class("div", "cards-row")
                    .children(self.cards.iter().map(|card| card.node().clone())),
            )
            .child(nav_button("nav-next", "next", buttons, StepIntent::Next));
        Element::with_class("section", "verse")
            .attr("data-verse", self.badge.clone())
            .child(self.header.clone())
            .child(strip)
            .into()
    }
}

fn nav_button(
    class: &'static str,
    label: &'static str,
    buttons: NavButtons,
    intent: StepIntent,
) -> Element {
    let button = Element::with_class("button", class).text(label);
    if buttons.is_disabled(intent) {
        button.attr("disabled", "")
    } else {
        button
    }
}

/// A fully rendered deck. Dropping it discards every carousel and card state with it.
#[derive(Clone, Debug)]
pub struct DeckView<S> {
    header: Node,
    verses: Vec<VerseView<S>>,
    direction: Direction,
}

impl<S: ScrollSurface> DeckView<S> {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn verses(&self) -> &[VerseView<S>] {
        &self.verses
    }

    pub fn verse(&self, index: usize) -> Option<&VerseView<S>> {
        self.verses.get(index)
    }

    pub fn verse_mut(&mut self, index: usize) -> Option<&mut VerseView<S>> {
        self.verses.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// Cascades a direction flip to every live carousel without re-rendering.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        for verse in &mut self.verses {
            verse.carousel.on_direction_change(direction);
        }
    }

    /// Frame callback after layout; returns how many carousels aligned.
    pub fn after_layout(&mut self) -> usize {
        self.verses
            .iter_mut()
            .map(|verse| verse.carousel.after_layout())
            .filter(|aligned| *aligned)
            .count()
    }

    /// Snapshot of the whole deck; `focused` marks the verse the reader navigated to.
    pub fn to_node(&self, focused: Option<usize>) -> Node {
        let verses = self.verses.iter().enumerate().map(|(index, verse)| {
            let node = verse.to_node();
            match node {
                Node::Element(el) if focused == Some(index) => {
                    Node::Element(el.attr("aria-current", "true"))
                }
                node => node,
            }
        });
        Element::with_class("main", "deck")
            .attr("dir", self.direction.as_str())
            .child(self.header.clone())
            .children(verses)
            .into()
    }
}

/// Builds the whole view for `verse_set`, replacing nothing: the caller drops any previous
/// [`DeckView`] wholesale.
pub fn render_deck<F: StripFactory>(
    verse_set: &VerseSet,
    context: &RenderContext,
    factory: &mut F,
) -> DeckView<F::Surface> {
    edebug!(
        verses = verse_set.verses.len(),
        direction = ?context.direction,
        convention = ?context.convention,
        "render_deck"
    );
    let header = Element::with_class("header", "surah-header")
        .maybe_child(arabic_element("h1", "surah-name-ar", &verse_set.title_native))
        .maybe_child(text_element("h2", "surah-name-tr", &verse_set.title_translated))
        .into();

    let verses = verse_set
        .verses
        .iter()
        .enumerate()
        .map(|(index, verse)| render_verse(index, verse, context, factory))
        .collect();

    DeckView {
        header,
        verses,
        direction: context.direction,
    }
}

fn render_verse<F: StripFactory>(
    index: usize,
    verse: &Verse,
    context: &RenderContext,
    factory: &mut F,
) -> VerseView<F::Surface> {
    let badge = match verse.id.trim() {
        "" => format!("Ayah {}", index + 1),
        id => id.to_owned(),
    };
    let header = Element::with_class("div", "verse-header")
        .child(Element::with_class("span", "ayah-badge").text(badge.clone()))
        .maybe_child(arabic_element("p", "ayah-arabic", &verse.primary_text))
        .maybe_child(text_element("p", "ayah-translation", &verse.translated_text))
        .into();

    let cards: Vec<WordCard> = verse
        .words
        .iter()
        .map(|word| WordCard::new(word.clone(), context.card.clone()))
        .collect();
    let surface = factory.create_strip(verse, &cards);
    let carousel = Carousel::attach(
        surface,
        context.direction,
        context.convention,
        context.carousel,
    );

    VerseView {
        badge,
        header,
        carousel,
        cards,
    }
}
