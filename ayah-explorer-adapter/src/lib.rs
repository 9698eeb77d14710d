//! Host-driving utilities for the `ayah-explorer` crate.
//!
//! The `ayah-explorer` crate is UI-agnostic and only reacts to the calls it receives. This crate
//! provides small, framework-neutral helpers hosts commonly need around it:
//!
//! - Tween-based smooth stepping ([`Tween`], [`Easing`])
//! - Throttled scroll and debounced resize handling ([`Throttle`], [`Debounce`])
//! - A per-strip pacer and an explorer-wide driver fed by host timestamps
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod debounce;
mod driver;
mod pacer;
mod throttle;
mod tween;


pub use debounce::Debounce;
pub use driver::ExplorerDriver;
pub use pacer::{PacerOptions, StripPacer};
pub use throttle::Throttle;
pub use tween::{Easing, Tween};
