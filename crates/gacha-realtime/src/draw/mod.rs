//! Draw engine — tiered probability outcomes from an explicit random source.

pub mod engine;
pub mod tier;

pub use engine::{draw, draw_many};
pub use tier::Tier;
