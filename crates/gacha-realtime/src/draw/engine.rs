//! Draw functions.
//!
//! The random source is always supplied by the caller. Nothing here touches
//! a thread-local or global generator, so a seeded source reproduces the
//! same sequence of outcomes.

use rand::Rng;

use super::tier::{ROLL_MAX, Tier};

/// Draw a single outcome.
pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Tier {
    Tier::from_roll(rng.gen_range(1..=ROLL_MAX))
}

/// Draw `count` outcomes in order.
pub fn draw_many<R: Rng + ?Sized>(rng: &mut R, count: u32) -> Vec<Tier> {
    (0..count).map(|_| draw(rng)).collect()
}
