//! Round scoring.
//!
//! The round winner collects the point value of every card left in the other
//! players' hands: face value for numbers, 20 per special, 50 per wild.
//! Losers' cumulative scores are untouched.

use std::collections::HashMap;

use crate::action::PlayerId;
use crate::card::Card;

/// Point value of a hand.
pub fn hand_points(hand: &[Card]) -> u32 {
    hand.iter().map(Card::points).sum()
}

/// Points the winner collects from everybody else's hands.
pub fn winner_points<'a, I>(hands: I, winner: &str) -> u32
where
    I: IntoIterator<Item = (&'a str, &'a [Card])>,
{
    hands
        .into_iter()
        .filter(|(id, _)| *id != winner)
        .map(|(_, hand)| hand_points(hand))
        .sum()
}

/// Cumulative tally across rounds, keyed by player identity.
#[derive(Clone, Debug, Default)]
pub struct ScoreBoard {
    totals: HashMap<PlayerId, u32>,
}

impl ScoreBoard {
    /// Registers a player at zero unless they have been seen before.
    pub fn register(&mut self, id: &str) {
        self.totals.entry(id.to_string()).or_insert(0);
    }

    pub fn award(&mut self, id: &str, points: u32) {
        *self.totals.entry(id.to_string()).or_insert(0) += points;
    }

    pub fn get(&self, id: &str) -> u32 {
        self.totals.get(id).copied().unwrap_or(0)
    }
}
