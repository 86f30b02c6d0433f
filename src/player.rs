use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::card::{Card, Color};

/// A seated player: identity, ordered hand, and turn-scoped flags.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    name: String,
    hand: Vec<Card>,
    has_drawn: bool,
    declared_card_match: bool,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hand: Vec::new(),
            has_drawn: false,
            declared_card_match: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    pub fn has_drawn(&self) -> bool {
        self.has_drawn
    }

    pub fn declared_card_match(&self) -> bool {
        self.declared_card_match
    }

    /// Adds cards to the end of the hand. A growing hand releases any card-match call.
    pub fn add_cards(&mut self, cards: impl IntoIterator<Item = Card>) {
        let before = self.hand.len();
        self.hand.extend(cards);
        if self.hand.len() > before {
            self.declared_card_match = false;
        }
    }

    /// Puts a card back at the end of the hand without touching the card-match latch.
    pub(crate) fn restore_card(&mut self, card: Card) {
        self.hand.push(card);
    }

    /// Removes and returns the card at `index`, or `None` when out of range.
    pub fn remove_card(&mut self, index: usize) -> Option<Card> {
        if index < self.hand.len() {
            Some(self.hand.remove(index))
        } else {
            None
        }
    }

    pub fn has_playable_card(&self, top: &Card, declared: Option<Color>) -> bool {
        self.hand.iter().any(|card| card.can_play_on(top, declared))
    }

    /// Sum of the point values left in hand.
    pub fn score(&self) -> u32 {
        self.hand.iter().map(Card::points).sum()
    }

    pub(crate) fn set_has_drawn(&mut self, value: bool) {
        self.has_drawn = value;
    }

    /// Latches the card-match call. Only valid while holding exactly two cards.
    pub(crate) fn declare_card_match(&mut self) -> bool {
        if self.hand.len() == 2 {
            self.declared_card_match = true;
            true
        } else {
            false
        }
    }

    /// Empties the hand and clears turn flags ahead of a new deal.
    pub(crate) fn reset(&mut self) {
        self.hand.clear();
        self.has_drawn = false;
        self.declared_card_match = false;
    }

    pub(crate) fn take_hand(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.hand)
    }
}
