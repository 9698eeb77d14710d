// Example: one right-to-left strip under each host scroll convention.
use ayah_explorer::{
    Carousel, CarouselOptions, Direction, ScrollConvention, ScrollSurface, SimulatedStrip,
    StepIntent,
};

fn main() {
    for convention in [
        ScrollConvention::Normal,
        ScrollConvention::Negative,
        ScrollConvention::Reverse,
    ] {
        let strip = SimulatedStrip::uniform(convention, 320.0, 6, 140.0, 12.0);
        let mut c = Carousel::attach(strip, Direction::Rtl, convention, CarouselOptions::default());
        c.after_layout();
        println!(
            "{convention:?}: raw={} pos={} buttons={:?}",
            c.surface().scroll_offset(),
            c.normalized_position(),
            c.buttons()
        );

        while let Some(raw) = c.step(StepIntent::Next) {
            println!("  next -> raw={raw} pos={}", c.normalized_position());
        }
        println!("  at end: {:?}", c.buttons());

        c.on_direction_change(Direction::Ltr);
        println!("  ltr: raw={} pos={}", c.surface().scroll_offset(), c.normalized_position());
    }
}
