use ayah_explorer::{
    Deck, Explorer, ExplorerOptions, ScrollConvention, SimulatedHost, StepIntent, Verse, VerseSet,
    Word,
};
use ayah_explorer_adapter::ExplorerDriver;

fn main() {
    // Example: a host frame loop driving smooth steps across a right-to-left strip.
    //
    // A host would:
    // - forward previous/next activations to step(verse, intent, now_ms)
    // - call tick(now_ms) every frame while it returns true
    // - read offsets back from the explorer's view and apply them to the real containers
    let explorer = Explorer::new(
        ExplorerOptions::new().with_convention(ScrollConvention::Negative),
        SimulatedHost::new(ScrollConvention::Negative, 320.0, 140.0).with_gap(12.0),
    );
    let mut d = ExplorerDriver::new(explorer);

    let e = d.explorer_mut();
    if e.load_manifest(Ok(vec![Deck::new("demo", "Demo", "demo.json")])).is_err() {
        return;
    }
    let Some(request) = e.select_deck("demo") else {
        return;
    };
    let verse = Verse {
        id: "1:1".into(),
        primary_text: String::new(),
        translated_text: String::new(),
        words: (0..6).map(|i| Word::new(format!("w{i}"), "gloss")).collect(),
    };
    let set = VerseSet {
        title_native: String::new(),
        title_translated: String::new(),
        verses: vec![verse],
    };
    println!("load: {:?}", e.complete_deck_load(request.ticket, Ok(set)));

    let mut now_ms = 0u64;
    d.tick(now_ms);
    for _ in 0..3 {
        println!("step -> target={:?}", d.step(0, StepIntent::Next, now_ms));
    }
    while d.tick(now_ms) {
        now_ms += 16;
        if let Some(carousel) = d.explorer().view().and_then(|v| v.verse(0)).map(|v| v.carousel()) {
            println!("t={now_ms} pos={:.1}", carousel.normalized_position());
        }
    }
    println!("toggled to {:?}", d.toggle_direction());
}
