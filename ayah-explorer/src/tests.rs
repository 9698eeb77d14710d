use crate::*;

use proptest::prelude::*;

const CONVENTIONS: [ScrollConvention; 3] = [
    ScrollConvention::Normal,
    ScrollConvention::Negative,
    ScrollConvention::Reverse,
];
const DIRECTIONS: [Direction; 2] = [Direction::Ltr, Direction::Rtl];

fn strip(convention: ScrollConvention) -> SimulatedStrip {
    // 8 cards of 100 + 7 gaps of 10 = 870 wide in a 300 container: max scroll 570.
    SimulatedStrip::uniform(convention, 300.0, 8, 100.0, 10.0)
}

fn carousel(direction: Direction, convention: ScrollConvention) -> Carousel<SimulatedStrip> {
    let mut c = Carousel::attach(
        strip(convention),
        direction,
        convention,
        CarouselOptions::default(),
    );
    c.after_layout();
    c
}

fn derived(n: usize) -> Vec<DerivedForm> {
    (0..n)
        .map(|i| DerivedForm::new(format!("d{i}")).with_translation(format!("t{i}")))
        .collect()
}

fn word_with_derived(primary: &str, n: usize) -> Word {
    let mut word = Word::new(primary, format!("{primary}-tr"));
    word.derived = derived(n);
    word
}

fn two_verse_set() -> VerseSet {
    VerseSet {
        title_native: "الفاتحة".into(),
        title_translated: "The Opening".into(),
        verses: vec![
            Verse {
                id: "1:1".into(),
                primary_text: "بِسْمِ اللَّهِ".into(),
                translated_text: "In the name of Allah".into(),
                words: vec![
                    word_with_derived("w1", 5),
                    word_with_derived("w2", 1),
                    word_with_derived("w3", 0),
                ],
            },
            Verse {
                id: "1:2".into(),
                primary_text: "الْحَمْدُ لِلَّهِ".into(),
                translated_text: "All praise".into(),
                words: vec![word_with_derived("w4", 4)],
            },
        ],
    }
}

fn explorer(convention: ScrollConvention) -> Explorer<SimulatedHost> {
    Explorer::new(
        ExplorerOptions::new().with_convention(convention),
        SimulatedHost::new(convention, 300.0, 100.0).with_gap(10.0),
    )
}

/// Serves decks from memory; unknown refs fail like a 404.
struct MemorySource {
    manifest: Vec<Deck>,
    decks: Vec<(String, VerseSet)>,
}

impl DeckSource for MemorySource {
    fn fetch_manifest(&self) -> Result<Vec<Deck>, FetchError> {
        Ok(self.manifest.clone())
    }

    fn fetch_deck(&self, data_ref: &str) -> Result<VerseSet, FetchError> {
        self.decks
            .iter()
            .find(|(r, _)| r == data_ref)
            .map(|(_, set)| set.clone())
            .ok_or_else(|| FetchError::Transport(format!("{data_ref}: not found")))
    }
}

// --- direction model ---

#[test]
fn rest_offsets_follow_convention_table() {
    use crate::direction::rest_offset;
    for convention in CONVENTIONS {
        assert_eq!(rest_offset(Direction::Ltr, convention, 870.0, 300.0), 0.0);
    }
    assert_eq!(
        rest_offset(Direction::Rtl, ScrollConvention::Normal, 870.0, 300.0),
        870.0
    );
    assert_eq!(
        rest_offset(Direction::Rtl, ScrollConvention::Negative, 870.0, 300.0),
        0.0
    );
    assert_eq!(
        rest_offset(Direction::Rtl, ScrollConvention::Reverse, 870.0, 300.0),
        0.0
    );
}

#[test]
fn step_delta_inverts_only_where_the_convention_does() {
    use crate::direction::step_delta;
    for convention in CONVENTIONS {
        assert_eq!(step_delta(Direction::Ltr, convention, 1.0, 50.0), 50.0);
        assert_eq!(step_delta(Direction::Ltr, convention, -1.0, 50.0), -50.0);
    }
    assert_eq!(
        step_delta(Direction::Rtl, ScrollConvention::Normal, 1.0, 50.0),
        -50.0
    );
    assert_eq!(
        step_delta(Direction::Rtl, ScrollConvention::Negative, 1.0, 50.0),
        -50.0
    );
    assert_eq!(
        step_delta(Direction::Rtl, ScrollConvention::Reverse, 1.0, 50.0),
        50.0
    );
}

#[test]
fn normalized_position_maps_every_convention_onto_zero_to_max() {
    use crate::direction::normalized_position;
    let (content, container) = (870.0, 300.0);
    assert_eq!(
        normalized_position(Direction::Rtl, ScrollConvention::Normal, 570.0, content, container),
        0.0
    );
    assert_eq!(
        normalized_position(Direction::Rtl, ScrollConvention::Normal, 0.0, content, container),
        570.0
    );
    assert_eq!(
        normalized_position(Direction::Rtl, ScrollConvention::Negative, -570.0, content, container),
        570.0
    );
    assert_eq!(
        normalized_position(Direction::Rtl, ScrollConvention::Reverse, 120.0, content, container),
        120.0
    );
    // Out-of-range raw values clamp instead of escaping the scale.
    assert_eq!(
        normalized_position(Direction::Ltr, ScrollConvention::Normal, 9_999.0, content, container),
        570.0
    );
    assert_eq!(
        normalized_position(Direction::Ltr, ScrollConvention::Normal, f64::NAN, content, container),
        0.0
    );
}

#[test]
fn edges_without_overflow_report_both_ends() {
    for direction in DIRECTIONS {
        for convention in CONVENTIONS {
            let e = direction::edges(direction, convention, 0.0, 200.0, 300.0, 1.0);
            assert!(e.at_start && e.at_end);
            let e = direction::edges(direction, convention, 0.0, 0.0, 300.0, 1.0);
            assert!(e.at_start && e.at_end);
        }
    }
}

#[test]
fn detection_classifies_each_simulated_host() {
    for convention in CONVENTIONS {
        assert_eq!(
            detect_scroll_convention(SimulatedProbe::new(convention)),
            convention
        );
    }
}

#[test]
fn convention_cache_probes_once() {
    let cache = ConventionCache::new();
    let mut probes = 0;
    for _ in 0..3 {
        let c = cache.get_or_detect(|| {
            probes += 1;
            SimulatedProbe::new(ScrollConvention::Negative)
        });
        assert_eq!(c, ScrollConvention::Negative);
    }
    assert_eq!(probes, 1);

    let injected = ConventionCache::with_convention(ScrollConvention::Reverse);
    let c = injected.get_or_detect(|| -> SimulatedProbe { panic!("must not probe") });
    assert_eq!(c, ScrollConvention::Reverse);
}

// --- carousel ---

#[test]
fn align_to_start_reaches_position_zero_everywhere() {
    for direction in DIRECTIONS {
        for convention in CONVENTIONS {
            let mut c = carousel(direction, convention);
            c.surface_mut().user_scroll_to(333.0);
            c.on_scroll();
            assert!(!c.is_at_start(), "{direction:?}/{convention:?}");

            c.align_to_start();
            assert_eq!(c.normalized_position(), 0.0, "{direction:?}/{convention:?}");
            assert!(c.is_at_start());
            assert_eq!(
                c.buttons(),
                NavButtons {
                    previous_disabled: true,
                    next_disabled: false
                }
            );
        }
    }
}

#[test]
fn align_to_start_is_idempotent() {
    for direction in DIRECTIONS {
        for convention in CONVENTIONS {
            let mut c = carousel(direction, convention);
            let offset = c.surface().scroll_offset();
            let writes = c.surface().writes();
            assert!(!c.align_to_start());
            assert!(!c.align_to_start());
            assert_eq!(c.surface().scroll_offset(), offset);
            assert_eq!(c.surface().writes(), writes);
        }
    }
}

#[test]
fn after_layout_aligns_exactly_once() {
    let mut c = Carousel::attach(
        strip(ScrollConvention::Negative),
        Direction::Rtl,
        ScrollConvention::Negative,
        CarouselOptions::default(),
    );
    assert!(c.needs_align());
    assert!(c.after_layout());
    assert!(!c.after_layout());
    assert!(!c.needs_align());
}

/// An RTL strip attached before its cards were measured.
fn unmeasured_rtl_strip() -> Carousel<SimulatedStrip> {
    Carousel::attach(
        SimulatedStrip::uniform(ScrollConvention::Normal, 300.0, 8, 0.0, 10.0),
        Direction::Rtl,
        ScrollConvention::Normal,
        CarouselOptions::default(),
    )
}

fn measure(c: &mut Carousel<SimulatedStrip>) {
    for index in 0..8 {
        c.surface_mut().set_item_width(index, 100.0);
    }
}

#[test]
fn direction_change_before_layout_keeps_the_alignment_pending() {
    let mut c = unmeasured_rtl_strip();
    c.on_direction_change(Direction::Ltr);
    c.on_direction_change(Direction::Rtl);
    assert!(c.needs_align());

    measure(&mut c);
    assert!(c.after_layout());
    assert_eq!(c.normalized_position(), 0.0);
    assert_eq!(c.surface().scroll_offset(), 570.0);
    assert!(c.buttons().previous_disabled);
}

#[test]
fn resize_before_layout_keeps_the_alignment_pending() {
    let mut c = unmeasured_rtl_strip();
    c.on_resize();
    assert!(c.needs_align());

    measure(&mut c);
    assert!(c.after_layout());
    assert_eq!(c.normalized_position(), 0.0);
    assert!(!c.after_layout());
}

#[test]
fn explicit_alignment_does_not_cancel_the_frame_callback() {
    let mut c = unmeasured_rtl_strip();
    c.align_to_start();
    assert!(c.needs_align());
    measure(&mut c);
    assert!(c.after_layout());
    assert_eq!(c.normalized_position(), 0.0);
}

#[test]
fn stepping_next_reaches_the_end_and_stops() {
    for direction in DIRECTIONS {
        for convention in CONVENTIONS {
            let mut c = carousel(direction, convention);
            let mut steps = 0;
            while c.step(StepIntent::Next).is_some() {
                steps += 1;
                assert!(steps < 100, "never reached the end");
            }
            // 570 of travel at 110 per step.
            assert_eq!(steps, 6, "{direction:?}/{convention:?}");
            assert!(c.is_at_end());
            assert_eq!(c.normalized_position(), c.max_scroll());
            assert!(c.buttons().next_disabled);
            assert!(!c.buttons().previous_disabled);

            let offset = c.surface().scroll_offset();
            assert_eq!(c.step(StepIntent::Next), None);
            assert_eq!(c.surface().scroll_offset(), offset);
        }
    }
}

#[test]
fn step_uses_the_first_card_width_plus_gap() {
    let mut c = carousel(Direction::Rtl, ScrollConvention::Normal);
    assert_eq!(c.step_magnitude(), 110.0);
    c.step(StepIntent::Next);
    assert_eq!(c.normalized_position(), 110.0);
    assert_eq!(c.surface().scroll_offset(), 570.0 - 110.0);
}

#[test]
fn step_falls_back_when_cards_are_unmeasured() {
    let mut c = Carousel::attach(
        SimulatedStrip::new(ScrollConvention::Normal, 300.0, vec![0.0, 900.0], 0.0),
        Direction::Ltr,
        ScrollConvention::Normal,
        CarouselOptions {
            step_fallback_px: 75.0,
            edge_epsilon: 1.0,
        },
    );
    c.after_layout();
    assert_eq!(c.step_magnitude(), 75.0);
    assert_eq!(c.step(StepIntent::Next), Some(75.0));
}

#[test]
fn steps_measure_the_card_at_the_leading_edge() {
    for direction in DIRECTIONS {
        for convention in CONVENTIONS {
            // Card spans 110, 210, 60, 160, 100 in a 200 container: max scroll 440.
            let strip = SimulatedStrip::new(
                convention,
                200.0,
                vec![100.0, 200.0, 50.0, 150.0, 100.0],
                10.0,
            );
            let mut c = Carousel::attach(strip, direction, convention, CarouselOptions::default());
            c.after_layout();

            let mut forward = Vec::new();
            while c.step(StepIntent::Next).is_some() {
                forward.push(c.normalized_position());
            }
            assert_eq!(forward, [110.0, 320.0, 380.0, 440.0], "{direction:?}/{convention:?}");

            c.align_to_start();
            c.step(StepIntent::Next);
            c.step(StepIntent::Next);
            c.step(StepIntent::Next);
            let mut back = Vec::new();
            while c.step(StepIntent::Previous).is_some() {
                back.push(c.normalized_position());
            }
            assert_eq!(back, [320.0, 110.0, 0.0], "{direction:?}/{convention:?}");
        }
    }
}

#[test]
fn nonpositive_fallback_still_moves_forward() {
    let options = ExplorerOptions::from_json(r#"{ "step_fallback_px": -40 }"#).unwrap();
    let carousel_options = options.carousel_options();
    assert_eq!(carousel_options.step_fallback_px, MIN_STEP_PX);

    let mut c = Carousel::attach(
        SimulatedStrip::new(ScrollConvention::Normal, 300.0, vec![0.0, 900.0], 0.0),
        Direction::Ltr,
        ScrollConvention::Normal,
        carousel_options,
    );
    c.after_layout();
    assert_eq!(c.step(StepIntent::Next), Some(MIN_STEP_PX));

    let mut raw = Carousel::attach(
        SimulatedStrip::new(ScrollConvention::Normal, 300.0, vec![0.0, 900.0], 0.0),
        Direction::Ltr,
        ScrollConvention::Normal,
        CarouselOptions {
            step_fallback_px: 0.0,
            edge_epsilon: 0.0,
        },
    );
    raw.after_layout();
    assert_eq!(raw.step(StepIntent::Next), Some(MIN_STEP_PX));
}

#[test]
fn empty_strip_degrades_to_noops() {
    let mut c = Carousel::attach(
        SimulatedStrip::new(ScrollConvention::Negative, 300.0, Vec::new(), 0.0),
        Direction::Rtl,
        ScrollConvention::Negative,
        CarouselOptions::default(),
    );
    c.after_layout();
    assert_eq!(c.buttons(), NavButtons::DISABLED);
    assert_eq!(c.step(StepIntent::Next), None);
    assert_eq!(c.step(StepIntent::Previous), None);
    assert_eq!(c.refresh_buttons(), NavButtons::DISABLED);
}

#[test]
fn zero_width_container_does_not_panic() {
    let mut c = Carousel::attach(
        SimulatedStrip::uniform(ScrollConvention::Normal, 0.0, 3, 100.0, 0.0),
        Direction::Rtl,
        ScrollConvention::Normal,
        CarouselOptions::default(),
    );
    c.after_layout();
    assert!(c.is_at_start());
    assert!(c.step(StepIntent::Next).is_some());
}

#[test]
fn strip_that_fits_disables_both_controls() {
    let mut c = Carousel::attach(
        SimulatedStrip::uniform(ScrollConvention::Reverse, 500.0, 3, 100.0, 10.0),
        Direction::Rtl,
        ScrollConvention::Reverse,
        CarouselOptions::default(),
    );
    c.after_layout();
    assert_eq!(c.buttons(), NavButtons::DISABLED);
    assert_eq!(c.step(StepIntent::Next), None);
}

#[test]
fn direction_change_realigns_to_the_logical_start() {
    for convention in CONVENTIONS {
        let mut c = carousel(Direction::Rtl, convention);
        c.step(StepIntent::Next);
        c.step(StepIntent::Next);
        assert!(c.normalized_position() > 0.0);

        c.on_direction_change(Direction::Ltr);
        assert_eq!(c.direction(), Direction::Ltr);
        assert_eq!(c.surface().direction(), Direction::Ltr);
        assert_eq!(c.normalized_position(), 0.0);

        c.step(StepIntent::Next);
        c.on_direction_change(Direction::Rtl);
        assert_eq!(c.normalized_position(), 0.0);
        assert!(c.buttons().previous_disabled);
    }
}

#[test]
fn resize_keeps_a_resting_strip_at_its_start() {
    let mut c = carousel(Direction::Rtl, ScrollConvention::Normal);
    assert_eq!(c.surface().scroll_offset(), 570.0);

    // A narrower container makes the RTL start offset larger.
    c.surface_mut().resize_container(200.0);
    assert_ne!(c.normalized_position(), 0.0);
    c.on_resize();
    assert_eq!(c.normalized_position(), 0.0);
    assert_eq!(c.surface().scroll_offset(), 670.0);
}

#[test]
fn resize_leaves_a_scrolled_strip_in_place() {
    let mut c = carousel(Direction::Ltr, ScrollConvention::Normal);
    c.step(StepIntent::Next);
    c.surface_mut().resize_container(250.0);
    c.on_resize();
    assert_eq!(c.normalized_position(), 110.0);
}

#[test]
fn state_snapshot_reports_raw_geometry() {
    let c = carousel(Direction::Rtl, ScrollConvention::Negative);
    let state = c.state();
    assert_eq!(
        state,
        CarouselState {
            scroll_offset: 0.0,
            container_width: 300.0,
            content_width: 870.0,
            direction: Direction::Rtl,
        }
    );
    let json = serde_json::to_string(&state).unwrap();
    assert!(json.contains("\"direction\":\"rtl\""));
}

fn any_convention() -> impl Strategy<Value = ScrollConvention> {
    prop_oneof![
        Just(ScrollConvention::Normal),
        Just(ScrollConvention::Negative),
        Just(ScrollConvention::Reverse),
    ]
}

fn any_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Ltr), Just(Direction::Rtl)]
}

proptest! {
    #[test]
    fn align_then_position_is_zero(
        direction in any_direction(),
        convention in any_convention(),
        container in 50.0f64..800.0,
        count in 0usize..24,
        width in 10.0f64..240.0,
        gap in 0.0f64..24.0,
        fraction in 0.0f64..=1.0,
    ) {
        let strip = SimulatedStrip::uniform(convention, container, count, width, gap);
        let mut c = Carousel::attach(strip, direction, convention, CarouselOptions::default());
        let max = c.max_scroll();
        c.surface_mut().user_scroll_to(max * fraction);
        c.align_to_start();
        prop_assert_eq!(c.normalized_position(), 0.0);
        prop_assert!(c.is_at_start());
    }

    #[test]
    fn next_steps_terminate_at_the_end(
        direction in any_direction(),
        convention in any_convention(),
        container in 50.0f64..800.0,
        count in 1usize..24,
        width in 10.0f64..240.0,
        gap in 0.0f64..24.0,
    ) {
        let strip = SimulatedStrip::uniform(convention, container, count, width, gap);
        let mut c = Carousel::attach(strip, direction, convention, CarouselOptions::default());
        c.after_layout();
        let mut guard = 0;
        while c.step(StepIntent::Next).is_some() {
            guard += 1;
            prop_assert!(guard <= count + 1);
        }
        prop_assert!(c.is_at_end());
        let before = c.surface().scroll_offset();
        prop_assert_eq!(c.step(StepIntent::Next), None);
        prop_assert_eq!(c.surface().scroll_offset(), before);
    }

    #[test]
    fn next_then_previous_round_trips(
        direction in any_direction(),
        convention in any_convention(),
        count in 4usize..24,
        width in 20.0f64..120.0,
        gap in 0.0f64..16.0,
        fraction in 0.0f64..=1.0,
    ) {
        let strip = SimulatedStrip::uniform(convention, 100.0, count, width, gap);
        let mut c = Carousel::attach(strip, direction, convention, CarouselOptions::default());
        c.after_layout();
        let m = c.step_magnitude();
        let room = c.max_scroll() - m;
        prop_assume!(room > 0.0);

        c.surface_mut().user_scroll_to(room * fraction);
        c.on_scroll();
        let before = c.surface().scroll_offset();
        prop_assert!(c.step(StepIntent::Next).is_some());
        prop_assert!(c.step(StepIntent::Previous).is_some());
        prop_assert!((c.surface().scroll_offset() - before).abs() < 1e-6);
    }
}

// --- word cards ---

#[test]
fn card_preview_shows_k_items_and_a_count_affordance() {
    let card = WordCard::new(word_with_derived("w", 5), CardOptions::default());
    assert_eq!(card.state(), CardState::Collapsed);
    assert_eq!(card.visible_derived().len(), 2);
    assert_eq!(card.affordance(), Some(Affordance::More { remaining: 3 }));

    let node = card.node();
    assert_eq!(node.count_by_class("derived-chip"), 2);
    let more = node.find_by_class("more-btn");
    assert_eq!(more.len(), 1);
    assert_eq!(more[0].text_content(), "+3 more");
    assert_eq!(node.count_by_class("derived-grid"), 0);
}

#[test]
fn expanding_reveals_the_full_grid() {
    let mut card = WordCard::new(word_with_derived("w", 5), CardOptions::default());
    assert!(card.activate());
    assert!(card.is_expanded());
    assert_eq!(card.visible_derived().len(), 5);

    let node = card.node();
    assert_eq!(node.count_by_class("derived-item"), 5);
    assert_eq!(node.count_by_class("more-btn"), 0);
    let grid = node.first_by_class("derived-grid").unwrap();
    assert_eq!(grid.get_attr("data-columns"), Some("2"));
    assert_eq!(grid.get_attr("data-rows"), Some("3"));
    assert_eq!(node.count_by_class("derived-row"), 3);
    assert_eq!(node.count_by_class("less-btn"), 1);
}

#[test]
fn toggle_policy_collapses_again() {
    let mut card = WordCard::new(word_with_derived("w", 4), CardOptions::default());
    let collapsed = card.node().clone();
    assert!(card.activate());
    assert_eq!(card.affordance(), Some(Affordance::Less));
    assert!(card.activate());
    assert_eq!(card.state(), CardState::Collapsed);
    assert_eq!(card.node(), &collapsed);
}

#[test]
fn one_shot_policy_is_terminal() {
    let options = CardOptions {
        policy: ExpansionPolicy::OneShot,
        ..CardOptions::default()
    };
    let mut card = WordCard::new(word_with_derived("w", 3), options);
    assert!(card.expand());
    assert_eq!(card.affordance(), None);
    assert!(!card.collapse());
    assert!(!card.activate());
    assert!(card.is_expanded());
    assert_eq!(card.node().count_by_class("less-btn"), 0);
    assert_eq!(card.node().count_by_class("more-btn"), 0);
}

#[test]
fn k_plus_three_for_several_preview_sizes() {
    for k in 1..=4 {
        let options = CardOptions {
            preview_size: k,
            ..CardOptions::default()
        };
        let mut card = WordCard::new(word_with_derived("w", k + 3), options);
        assert_eq!(card.node().count_by_class("derived-chip"), k);
        assert_eq!(card.affordance(), Some(Affordance::More { remaining: 3 }));
        card.activate();
        assert_eq!(card.node().count_by_class("derived-item"), k + 3);
        assert_eq!(card.node().count_by_class("more-btn"), 0);
    }
}

#[test]
fn no_derived_forms_render_the_empty_marker() {
    let mut card = WordCard::new(word_with_derived("w", 0), CardOptions::default());
    let node = card.node();
    let empty = node.find_by_class("empty");
    assert_eq!(empty.len(), 1);
    assert_eq!(empty[0].text_content(), EMPTY_MARKER);
    assert_eq!(node.count_by_class("more-btn"), 0);
    assert_eq!(card.affordance(), None);
    assert!(!card.activate());
    assert!(!card.expand());
}

#[test]
fn few_derived_forms_need_no_affordance() {
    let mut card = WordCard::new(word_with_derived("w", 2), CardOptions::default());
    assert_eq!(card.affordance(), None);
    assert!(!card.expand());
    assert_eq!(card.node().count_by_class("derived-chip"), 2);
}

#[test]
fn self_derivations_are_filtered_out() {
    let mut word = Word::new("كَتَبَ", "wrote");
    word.derived = vec![
        DerivedForm::new("كَتَبَ"),
        DerivedForm::new("كِتَاب").with_translation("book"),
        DerivedForm::new(" كَتَبَ "),
    ];
    let mut card = WordCard::new(word, CardOptions::default());
    assert_eq!(card.derived().len(), 1);
    assert_eq!(card.affordance(), None);
    assert_eq!(card.node().count_by_class("empty"), 0);

    card.expand();
    for chip in card.node().find_by_class("derived-chip") {
        assert!(!chip.text_content().starts_with("كَتَبَ"));
    }
}

#[test]
fn only_self_derivations_leave_the_empty_marker() {
    let mut word = Word::new("x", "x");
    word.derived = vec![DerivedForm::new("x"), DerivedForm::new("x")];
    let card = WordCard::new(word, CardOptions::default());
    assert_eq!(card.node().count_by_class("empty"), 1);
    assert_eq!(card.node().count_by_class("more-btn"), 0);
}

#[test]
fn absent_fields_are_omitted_not_blank() {
    let mut word = Word::new("رَبِّ", "");
    word.root = Some("ر ب ب".into());
    let card = WordCard::new(word, CardOptions::default());
    let node = card.node();
    assert_eq!(node.count_by_class("word-bn"), 0);
    let chips = node.first_by_class("meta-row").unwrap();
    assert_eq!(chips.children.len(), 1);
    assert_eq!(chips.text_content(), "ر ب ب");
    let text = node.text_content();
    assert!(!text.contains("undefined"));
    assert!(!text.contains("null"));
}

#[test]
fn arabic_text_carries_direction_attributes() {
    let card = WordCard::new(word_with_derived("رَبِّ", 0), CardOptions::default());
    let ar = card.node().first_by_class("word-ar").unwrap();
    assert_eq!(ar.get_attr("lang"), Some("ar"));
    assert_eq!(ar.get_attr("dir"), Some("rtl"));
}

#[test]
fn pattern_vocabulary_marks_unknown_patterns_independently() {
    let mut word = Word::new("عَالِم", "scholar");
    word.pattern = Some("فَاعِل".into());
    word.derived = vec![
        DerivedForm {
            pattern: Some("مَفْعُول".into()),
            ..DerivedForm::new("مَعْلُوم")
        },
        DerivedForm {
            pattern: Some("فَاعِل".into()),
            ..DerivedForm::new("عَامِل")
        },
        DerivedForm::new("عِلْم"),
    ];
    let options = ExplorerOptions::new()
        .with_preview_size(0)
        .with_pattern_vocabulary(["فَاعِل"])
        .card_options();
    let mut card = WordCard::new(word, options);

    let meta = card.node().first_by_class("meta-row").unwrap().text_content();
    assert_eq!(meta, "فَاعِل");

    card.activate();
    let lines: Vec<String> = card
        .node()
        .find_by_class("derived-line")
        .iter()
        .map(|line| line.text_content())
        .collect();
    assert_eq!(lines, vec![UNKNOWN_PATTERN.to_owned(), "فَاعِل".to_owned(), String::new()]);
}

#[test]
fn without_vocabulary_patterns_show_verbatim() {
    let mut word = Word::new("a", "b");
    word.pattern = Some("whatever".into());
    let card = WordCard::new(word, CardOptions::default());
    assert_eq!(
        card.node().first_by_class("meta-row").unwrap().text_content(),
        "whatever"
    );
}

// --- renderer ---

#[test]
fn render_deck_keeps_logical_order_and_headers() {
    let mut host = SimulatedHost::new(ScrollConvention::Normal, 300.0, 100.0);
    let context = RenderContext {
        direction: Direction::Rtl,
        convention: ScrollConvention::Normal,
        card: CardOptions::default(),
        carousel: CarouselOptions::default(),
    };
    let view = render_deck(&two_verse_set(), &context, &mut host);
    assert_eq!(view.len(), 2);
    assert_eq!(view.verse(0).unwrap().badge(), "1:1");

    let words: Vec<&str> = view.verses()[0]
        .cards()
        .iter()
        .map(|c| c.word().primary_text.as_str())
        .collect();
    assert_eq!(words, ["w1", "w2", "w3"]);

    let node = view.to_node(None);
    let root = node.as_element().unwrap();
    assert_eq!(root.get_attr("dir"), Some("rtl"));
    assert_eq!(node.first_by_class("surah-name-ar").unwrap().text_content(), "الفاتحة");
    assert_eq!(node.count_by_class("verse"), 2);
    assert_eq!(node.count_by_class("word-card"), 4);
}

#[test]
fn missing_verse_ids_fall_back_to_ayah_numbers() {
    let mut set = two_verse_set();
    set.verses[1].id.clear();
    set.title_translated.clear();
    let mut host = SimulatedHost::new(ScrollConvention::Reverse, 300.0, 100.0);
    let context = RenderContext {
        direction: Direction::Ltr,
        convention: ScrollConvention::Reverse,
        card: CardOptions::default(),
        carousel: CarouselOptions::default(),
    };
    let view = render_deck(&set, &context, &mut host);
    assert_eq!(view.verse(1).unwrap().badge(), "Ayah 2");
    assert_eq!(view.to_node(None).count_by_class("surah-name-tr"), 0);
}

#[test]
fn nav_buttons_render_disabled_state() {
    let mut e = explorer(ScrollConvention::Negative);
    e.load_manifest(Ok(vec![Deck::new("a", "A", "a.json")])).unwrap();
    let request = e.select_deck("a").unwrap();
    e.complete_deck_load(request.ticket, Ok(two_verse_set()));
    e.after_layout();

    let view = e.view().unwrap();
    // Verse 1: three 100px cards + gaps in a 300px container overflow by 20px.
    let verse = view.verse(0).unwrap().to_node();
    let prev = verse.first_by_class("nav-prev").unwrap();
    let next = verse.first_by_class("nav-next").unwrap();
    assert_eq!(prev.get_attr("disabled"), Some(""));
    assert_eq!(next.get_attr("disabled"), None);

    // Verse 2 has one card: nothing to scroll.
    let verse = view.verse(1).unwrap().to_node();
    assert_eq!(verse.first_by_class("nav-next").unwrap().get_attr("disabled"), Some(""));
}

#[test]
fn expanding_one_card_leaves_everything_else_untouched() {
    let mut e = explorer(ScrollConvention::Normal);
    e.load_manifest(Ok(vec![Deck::new("a", "A", "a.json")])).unwrap();
    let request = e.select_deck("a").unwrap();
    assert_eq!(
        e.complete_deck_load(request.ticket, Ok(two_verse_set())),
        LoadOutcome::Applied
    );
    e.after_layout();

    let view = e.view().unwrap();
    let card1 = view.verse(0).unwrap().card(0).unwrap().node().clone();
    let card2 = view.verse(0).unwrap().card(1).unwrap().node().clone();
    let card3 = view.verse(0).unwrap().card(2).unwrap().node().clone();
    let verse2 = view.verse(1).unwrap().to_node();

    assert_eq!(card1.count_by_class("derived-chip"), 2);
    assert_eq!(card1.first_by_class("more-btn").unwrap().text_content(), "+3 more");

    assert!(e.activate_card(0, 0));

    let view = e.view().unwrap();
    let after = view.verse(0).unwrap().card(0).unwrap().node();
    assert_eq!(after.count_by_class("derived-item"), 5);
    assert_eq!(after.count_by_class("more-btn"), 0);
    assert_ne!(after, &card1);
    assert_eq!(view.verse(0).unwrap().card(1).unwrap().node(), &card2);
    assert_eq!(view.verse(0).unwrap().card(2).unwrap().node(), &card3);
    assert_eq!(view.verse(1).unwrap().to_node(), verse2);
}

// --- explorer ---

#[test]
fn manifest_failure_blocks_and_disables_the_selector() {
    let mut e = explorer(ScrollConvention::Normal);
    let err = e
        .load_manifest(Err(FetchError::Transport("connection refused".into())))
        .unwrap_err();
    assert!(matches!(err, LoadError::ManifestUnavailable { .. }));

    let notice = e.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Blocking);
    assert!(notice.message.contains("manifest"));
    assert!(notice.message.contains("connection refused"));

    let selector = e.selector();
    assert!(selector.options.is_empty());
    assert!(!selector.enabled);
    assert_eq!(e.select_deck("anything"), None);

    let node = e.to_node();
    let select = node.first_by_class("deck-select").unwrap();
    assert_eq!(select.get_attr("disabled"), Some(""));
    assert!(select.children.is_empty());
    assert_eq!(node.count_by_class("notice-blocking"), 1);
}

#[test]
fn later_selection_wins_over_a_stale_response() {
    let mut e = explorer(ScrollConvention::Reverse);
    e.load_manifest(Ok(vec![
        Deck::new("a", "Deck A", "a.json"),
        Deck::new("b", "Deck B", "b.json"),
    ]))
    .unwrap();

    let mut deck_a = two_verse_set();
    deck_a.title_translated = "A".into();
    let mut deck_b = two_verse_set();
    deck_b.title_translated = "B".into();
    deck_b.verses.truncate(1);

    let a = e.select_deck("a").unwrap();
    let b = e.select_deck("b").unwrap();
    assert_ne!(a.ticket, b.ticket);

    assert_eq!(e.complete_deck_load(b.ticket, Ok(deck_b)), LoadOutcome::Applied);
    assert_eq!(e.complete_deck_load(a.ticket, Ok(deck_a)), LoadOutcome::Stale);

    assert_eq!(e.verse_set().unwrap().title_translated, "B");
    assert_eq!(e.verse_count(), 1);
    assert_eq!(e.selector().selected.as_deref(), Some("b"));
    assert_eq!(e.status(), &Status::Ready);
}

#[test]
fn stale_response_arriving_first_is_ignored_too() {
    let mut e = explorer(ScrollConvention::Reverse);
    e.load_manifest(Ok(vec![
        Deck::new("a", "Deck A", "a.json"),
        Deck::new("b", "Deck B", "b.json"),
    ]))
    .unwrap();
    let a = e.select_deck("a").unwrap();
    let b = e.select_deck("b").unwrap();
    assert_eq!(e.complete_deck_load(a.ticket, Ok(two_verse_set())), LoadOutcome::Stale);
    assert!(e.view().is_none());
    assert_eq!(e.status(), &Status::Loading { deck_id: "b".into() });
    assert_eq!(e.pending().map(|p| p.ticket), Some(b.ticket));
}

#[test]
fn deck_failure_names_the_deck_and_clears_the_view() {
    let mut e = explorer(ScrollConvention::Normal);
    e.load_manifest(Ok(vec![
        Deck::new("a", "Al-Fatiha", "a.json"),
        Deck::new("b", "Al-Ikhlas", "b.json"),
    ]))
    .unwrap();
    let a = e.select_deck("a").unwrap();
    e.complete_deck_load(a.ticket, Ok(two_verse_set()));
    assert!(e.view().is_some());
    let generation = e.generation();

    let b = e.select_deck("b").unwrap();
    assert_eq!(
        e.complete_deck_load(b.ticket, Err(FetchError::Transport("HTTP 404".into()))),
        LoadOutcome::Failed
    );
    assert!(e.view().is_none());
    assert!(e.generation() > generation);
    let notice = e.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Inline);
    assert!(notice.message.contains("Al-Ikhlas"));
    assert!(e.selector().enabled);
}

#[test]
fn malformed_deck_is_reported_as_such() {
    let mut e = explorer(ScrollConvention::Normal);
    e.load_manifest(Ok(vec![Deck::new("x", "Broken", "x.json")])).unwrap();
    let request = e.select_deck("x").unwrap();
    let result = parse_verse_set(r#"{ "name_ar": "؟" }"#);
    assert!(matches!(result, Err(FetchError::MissingVerses)));
    assert_eq!(e.complete_deck_load(request.ticket, result), LoadOutcome::Failed);
    assert!(e.notice().unwrap().message.contains("Broken"));
    assert!(e.notice().unwrap().message.contains("malformed"));
}

#[test]
fn unknown_deck_falls_back_to_the_first_entry() {
    let mut e = explorer(ScrollConvention::Normal);
    e.load_manifest(Ok(vec![Deck::new("a", "A", "a.json")])).unwrap();
    let request = e.select_deck("zzz").unwrap();
    assert_eq!(request.deck_id, "a");
    assert_eq!(request.data_ref, "a.json");
}

#[test]
fn start_loads_the_manifest_and_first_deck() {
    let source = MemorySource {
        manifest: vec![
            Deck::new("a", "A", "a.json"),
            Deck::new("b", "B", "b.json"),
        ],
        decks: vec![("a.json".into(), two_verse_set())],
    };
    let mut e = explorer(ScrollConvention::Negative);
    e.start(&source).unwrap();
    assert_eq!(e.verse_count(), 2);
    assert_eq!(e.selector().selected.as_deref(), Some("a"));

    let err = e.open_deck(&source, "b").unwrap_err();
    assert!(matches!(err, LoadError::DeckUnavailable { ref deck, .. } if deck == "B"));
    assert!(e.view().is_none());
}

#[test]
fn double_direction_toggle_returns_every_strip_to_its_start() {
    for convention in CONVENTIONS {
        let mut e = explorer(convention);
        e.load_manifest(Ok(vec![Deck::new("a", "A", "a.json")])).unwrap();
        let mut set = two_verse_set();
        set.verses[1].words = (0..9).map(|i| word_with_derived(&format!("v{i}"), 3)).collect();
        let request = e.select_deck("a").unwrap();
        e.complete_deck_load(request.ticket, Ok(set));
        e.after_layout();

        e.step(1, StepIntent::Next);
        e.step(1, StepIntent::Next);
        e.activate_card(1, 0);
        assert!(e.view().unwrap().verse(1).unwrap().carousel().normalized_position() > 0.0);

        assert_eq!(e.toggle_direction(), Direction::Ltr);
        assert_eq!(e.toggle_direction(), Direction::Rtl);

        let view = e.view().unwrap();
        assert_eq!(view.direction(), Direction::Rtl);
        for verse in view.verses() {
            assert_eq!(verse.carousel().normalized_position(), 0.0, "{convention:?}");
            assert!(verse.carousel().buttons().previous_disabled);
        }
        // Card state survives the direction flip.
        assert!(view.verse(1).unwrap().card(0).unwrap().is_expanded());
    }
}

#[test]
fn convention_is_probed_once_per_session() {
    let mut e = Explorer::new(
        ExplorerOptions::new(),
        SimulatedHost::new(ScrollConvention::Negative, 300.0, 100.0),
    );
    e.load_manifest(Ok(vec![Deck::new("a", "A", "a.json")])).unwrap();
    for _ in 0..3 {
        let request = e.select_deck("a").unwrap();
        e.complete_deck_load(request.ticket, Ok(two_verse_set()));
    }
    assert_eq!(e.convention(), ScrollConvention::Negative);
    assert_eq!(e.factory().probes, 1);
}

#[test]
fn verse_focus_resets_the_page_scroll() {
    let mut e = explorer(ScrollConvention::Normal);
    e.load_manifest(Ok(vec![Deck::new("a", "A", "a.json")])).unwrap();
    let request = e.select_deck("a").unwrap();
    e.complete_deck_load(request.ticket, Ok(two_verse_set()));

    assert_eq!(e.verse_counter().as_deref(), Some("1 / 2"));
    assert!(!e.can_focus_previous());
    e.on_page_scroll(640.0);
    assert!(e.focus_next_verse());
    assert_eq!(e.page_scroll(), 0.0);
    assert_eq!(e.verse_counter().as_deref(), Some("2 / 2"));
    assert!(!e.focus_next_verse());
    assert!(e.focus_previous_verse());
    assert_eq!(e.focused_verse(), 0);

    let node = e.to_node();
    let verses = node.find_by_class("verse");
    assert_eq!(verses[0].get_attr("aria-current"), Some("true"));
    assert_eq!(verses[1].get_attr("aria-current"), None);
}

#[test]
fn new_deck_resets_focus_and_page_scroll() {
    let mut e = explorer(ScrollConvention::Normal);
    e.load_manifest(Ok(vec![Deck::new("a", "A", "a.json")])).unwrap();
    let request = e.select_deck("a").unwrap();
    e.complete_deck_load(request.ticket, Ok(two_verse_set()));
    e.focus_next_verse();
    e.on_page_scroll(300.0);

    let request = e.select_deck("a").unwrap();
    e.complete_deck_load(request.ticket, Ok(two_verse_set()));
    assert_eq!(e.focused_verse(), 0);
    assert_eq!(e.page_scroll(), 0.0);
    assert!(e.view().unwrap().verses().iter().all(|v| v.carousel().needs_align()));
    assert_eq!(e.after_layout(), 2);
    assert_eq!(e.after_layout(), 0);
}

#[test]
fn direction_toggle_before_the_first_frame_still_aligns_after_layout() {
    let mut e = explorer(ScrollConvention::Normal);
    e.load_manifest(Ok(vec![Deck::new("a", "A", "a.json")])).unwrap();
    let mut set = two_verse_set();
    set.verses[0].words = (0..8).map(|i| word_with_derived(&format!("w{i}"), 0)).collect();
    let request = e.select_deck("a").unwrap();
    e.complete_deck_load(request.ticket, Ok(set));

    // The host has not measured the cards yet.
    let strip = e.view_mut().unwrap().verse_mut(0).unwrap().carousel_mut().surface_mut();
    for index in 0..8 {
        strip.set_item_width(index, 0.0);
    }
    e.toggle_direction();
    e.toggle_direction();
    assert!(e.view().unwrap().verses().iter().all(|v| v.carousel().needs_align()));

    let strip = e.view_mut().unwrap().verse_mut(0).unwrap().carousel_mut().surface_mut();
    for index in 0..8 {
        strip.set_item_width(index, 100.0);
    }
    assert_eq!(e.after_layout(), 2);
    let carousel = e.view().unwrap().verse(0).unwrap().carousel();
    assert_eq!(carousel.direction(), Direction::Rtl);
    assert_eq!(carousel.normalized_position(), 0.0);
    assert_eq!(carousel.surface().scroll_offset(), 570.0);
}

#[test]
fn direction_preference_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    let mut e = explorer(ScrollConvention::Normal)
        .with_preferences(JsonFileStore::open(&path).unwrap());
    assert_eq!(e.direction(), Direction::Rtl);
    e.toggle_direction();

    let store = JsonFileStore::open(&path).unwrap();
    assert_eq!(store.get(DIRECTION_KEY).as_deref(), Some("ltr"));

    let e = explorer(ScrollConvention::Normal).with_preferences(store);
    assert_eq!(e.direction(), Direction::Ltr);
}

#[test]
fn persistence_can_be_disabled() {
    let mut store = MemoryStore::new();
    store.set(DIRECTION_KEY, "ltr").unwrap();
    let options = ExplorerOptions {
        persist_direction: false,
        ..ExplorerOptions::new()
    };
    let e = Explorer::new(
        options,
        SimulatedHost::new(ScrollConvention::Normal, 300.0, 100.0),
    )
    .with_preferences(store);
    assert_eq!(e.direction(), Direction::Rtl);
}

#[test]
fn topbar_reflects_direction_and_selection() {
    let mut e = explorer(ScrollConvention::Normal);
    e.load_manifest(Ok(vec![
        Deck::new("a", "", "a.json"),
        Deck::new("b", "Second", "b.json"),
    ]))
    .unwrap();
    e.select_deck("b");
    let node = e.to_node();
    assert_eq!(node.as_element().unwrap().get_attr("dir"), Some("rtl"));
    assert_eq!(node.first_by_class("dir-toggle").unwrap().text_content(), "RTL");
    assert_eq!(node.count_by_class("loading"), 1);

    let select = node.first_by_class("deck-select").unwrap();
    assert_eq!(select.get_attr("disabled"), None);
    let labels: Vec<String> = select.children.iter().map(Node::text_content).collect();
    assert_eq!(labels, ["a", "Second"]);
    let selected = select.children[1].as_element().unwrap();
    assert_eq!(selected.get_attr("selected"), Some(""));
}

// --- data ---

#[test]
fn parses_short_keys_and_tolerates_missing_fields() {
    let json = r#"{
        "name_ar": "الإخلاص",
        "name_bn": "Sincerity",
        "verses": [
            {
                "arabic": "قُلْ هُوَ اللَّهُ أَحَدٌ",
                "bangla": "Say, He is Allah, the One",
                "words": [
                    { "ar": "قُلْ", "bn": "Say", "tr": "qul", "root": "ق و ل", "pattern": null,
                      "derived": [ { "ar": "قَوْل", "bn": "saying", "tr": "qawl" }, { "ar": "قَالَ" } ] },
                    { "ar": "هُوَ", "bn": "He", "tr": "", "derived": null },
                    { "ar": "أَحَدٌ" }
                ]
            },
            { "arabic": "اللَّهُ الصَّمَدُ" }
        ]
    }"#;
    let set = parse_verse_set(json).unwrap();
    assert_eq!(set.title_native, "الإخلاص");
    assert_eq!(set.verses.len(), 2);
    let words = &set.verses[0].words;
    assert_eq!(words[0].transliteration.as_deref(), Some("qul"));
    assert_eq!(words[0].pattern, None);
    assert_eq!(words[0].derived[1].translated_text, None);
    assert_eq!(words[1].transliteration, None);
    assert!(words[1].derived.is_empty());
    assert_eq!(words[2].translated_text, "");
    assert!(set.verses[1].words.is_empty());
}

#[test]
fn parses_canonical_keys() {
    let json = r#"{
        "titleNative": "الفاتحة",
        "titleTranslated": "The Opening",
        "verses": [{ "id": "1:1", "primaryText": "بِسْمِ", "translatedText": "In the name",
                     "words": [{ "primaryText": "بِسْمِ", "translatedText": "In the name",
                                 "transliteration": "bismi",
                                 "derived": [{ "primaryText": "اسم", "translatedText": "name" }] }] }]
    }"#;
    let set = parse_verse_set(json).unwrap();
    assert_eq!(set.verses[0].id, "1:1");
    assert_eq!(set.verses[0].words[0].derived[0].primary_text, "اسم");
}

#[test]
fn verse_list_is_required() {
    assert!(matches!(parse_verse_set("{}"), Err(FetchError::MissingVerses)));
    assert!(matches!(
        parse_verse_set(r#"{ "verses": null }"#),
        Err(FetchError::MissingVerses)
    ));
    assert!(matches!(parse_verse_set("[1, 2]"), Err(FetchError::MissingVerses)));
    assert!(matches!(parse_verse_set("not json"), Err(FetchError::Parse(_))));
}

#[test]
fn manifest_accepts_json_alias_and_skips_unnamed_entries() {
    let decks = parse_manifest(
        r#"[ { "id": "fatiha", "name": "Al-Fatiha", "json": "data/fatiha.json" },
             { "name": "orphan", "dataRef": "x.json" },
             { "id": "ikhlas", "dataRef": "data/ikhlas.json" } ]"#,
    )
    .unwrap();
    assert_eq!(decks.len(), 2);
    assert_eq!(decks[0].data_ref, "data/fatiha.json");
    assert_eq!(decks[1].display_name(), "ikhlas");
    assert!(parse_manifest(r#"{ "decks": [] }"#).is_err());
}

#[test]
fn manifest_accepts_numeric_ids_and_skips_malformed_entries() {
    let decks = parse_manifest(
        r#"[ { "id": 1, "name": "Al-Fatiha", "json": "data/1.json" },
             { "id": { "nested": true }, "dataRef": "x.json" },
             { "id": "112", "name": 112, "dataRef": "data/112.json" } ]"#,
    )
    .unwrap();
    assert_eq!(decks.len(), 2);
    assert_eq!(decks[0].id, "1");
    assert_eq!(decks[0].data_ref, "data/1.json");
    assert_eq!(decks[1].display_name(), "112");

    let set = parse_verse_set(r#"{ "verses": [ { "ref": 7, "arabic": "x" } ] }"#).unwrap();
    assert_eq!(set.verses[0].id, "7");
}

#[test]
fn options_fill_defaults_from_partial_json() {
    let options = ExplorerOptions::from_json(
        r#"{ "preview_size": 3, "convention": "negative", "expansion": "one-shot",
             "default_direction": "ltr" }"#,
    )
    .unwrap();
    assert_eq!(options.preview_size, 3);
    assert_eq!(options.convention, Some(ScrollConvention::Negative));
    assert_eq!(options.expansion, ExpansionPolicy::OneShot);
    assert_eq!(options.default_direction, Direction::Ltr);
    assert_eq!(options.scroll_throttle_ms, 80);
    assert_eq!(options.resize_debounce_ms, 120);
    assert_eq!(ExplorerOptions::from_json("{}").unwrap(), ExplorerOptions::default());
}

#[test]
fn direction_parsing_and_labels() {
    assert_eq!(Direction::parse(" RTL "), Some(Direction::Rtl));
    assert_eq!(Direction::parse("ltr"), Some(Direction::Ltr));
    assert_eq!(Direction::parse("up"), None);
    assert_eq!(Direction::default(), Direction::Rtl);
    assert_eq!(Direction::Rtl.flipped().label(), "LTR");
}
