// extensions/mod.rs
//
// Optional extension modules, decoupled from the scene and the mini-game.

pub mod counter;
pub mod easing;

pub use counter::{format_thousands, AnimatedCounter};
pub use easing::{progress, Easing};
