// Example: load a deck directory and print the rendered tree.
//
// cargo run -p ayah-explorer --example browse_dir -- <dir> [deck-id]
use std::path::PathBuf;

use ayah_explorer::{
    DirectorySource, Explorer, ExplorerOptions, ScrollConvention, SimulatedHost,
};

fn main() {
    let mut args = std::env::args().skip(1);
    let root = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"));
    let source = DirectorySource::new(root);

    let mut e = Explorer::new(
        ExplorerOptions::new(),
        SimulatedHost::new(ScrollConvention::Reverse, 360.0, 150.0).with_gap(12.0),
    );
    if let Err(err) = e.start(&source) {
        eprintln!("{err}");
    }
    if let Some(id) = args.next() {
        if let Err(err) = e.open_deck(&source, &id) {
            eprintln!("{err}");
        }
    }
    e.after_layout();
    e.activate_card(0, 0);

    println!("convention={:?} status={:?}", e.convention(), e.status());
    println!("{}", e.to_node().outline());
}
