use rand::Rng;
use rand::seq::SliceRandom;
use tracing::warn;

use crate::card::{Card, full_deck};

/// Draw pile plus discard pile. The last element of each `Vec` is its top.
#[derive(Clone, Debug, Default)]
pub struct Deck {
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
}

impl Deck {
    /// Standard 108-card deck, shuffled with `rng`.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::from_cards(full_deck());
        deck.shuffle(rng);
        deck
    }

    /// Uses `cards` as the draw pile as-is; the last card is drawn first.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            draw_pile: cards,
            discard_pile: Vec::new(),
        }
    }

    /// Fisher-Yates permutation of the draw pile.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.draw_pile.shuffle(rng);
    }

    /// Draws the top card, recycling the discard pile when the draw pile is empty.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Card> {
        if self.draw_pile.is_empty() && !self.recycle_discard(rng) {
            return None;
        }
        self.draw_pile.pop()
    }

    /// Draws up to `count` cards. Returns fewer when the deck cannot be replenished.
    pub fn draw_many<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Vec<Card> {
        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            match self.draw(rng) {
                Some(card) => drawn.push(card),
                None => {
                    warn!(requested = count, drawn = drawn.len(), "deck exhausted");
                    break;
                }
            }
        }
        drawn
    }

    /// Moves every discard except the top back into the draw pile and shuffles.
    ///
    /// Returns false when the discard pile holds at most one card.
    pub fn recycle_discard<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.discard_pile.len() <= 1 {
            return false;
        }
        let Some(top) = self.discard_pile.pop() else {
            return false;
        };
        self.draw_pile.append(&mut self.discard_pile);
        self.discard_pile.push(top);
        self.shuffle(rng);
        true
    }

    pub fn discard(&mut self, card: Card) {
        self.discard_pile.push(card);
    }

    /// Takes the top discard back off the pile.
    pub fn take_discard_top(&mut self) -> Option<Card> {
        self.discard_pile.pop()
    }

    pub fn top(&self) -> Option<&Card> {
        self.discard_pile.last()
    }

    /// Slides cards under the draw pile so they are drawn last.
    pub fn put_bottom(&mut self, cards: impl IntoIterator<Item = Card>) {
        let mut bottom: Vec<Card> = cards.into_iter().collect();
        bottom.append(&mut self.draw_pile);
        self.draw_pile = bottom;
    }

    pub fn draw_count(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_count(&self) -> usize {
        self.discard_pile.len()
    }

    /// Every card currently held by the deck, draw pile first.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.draw_pile.iter().chain(self.discard_pile.iter())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::card::{Color, DECK_SIZE};

    #[test]
    fn shuffled_deck_keeps_every_card() {
        let mut rng = StdRng::seed_from_u64(7);
        let deck = Deck::shuffled(&mut rng);
        assert_eq!(deck.draw_count(), DECK_SIZE);
        let mut sorted: Vec<String> = deck.cards().map(|c| format!("{c:?}")).collect();
        let mut expected: Vec<String> = full_deck().iter().map(|c| format!("{c:?}")).collect();
        sorted.sort();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn same_seed_same_order() {
        let a = Deck::shuffled(&mut StdRng::seed_from_u64(42));
        let b = Deck::shuffled(&mut StdRng::seed_from_u64(42));
        assert!(a.cards().eq(b.cards()));
    }

    #[test]
    fn draws_from_the_end() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut deck = Deck::from_cards(vec![Card::number(Color::Red, 1), Card::number(Color::Red, 2)]);
        assert_eq!(deck.draw(&mut rng), Some(Card::number(Color::Red, 2)));
        assert_eq!(deck.draw(&mut rng), Some(Card::number(Color::Red, 1)));
    }

    #[test]
    fn recycles_discard_but_keeps_top() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut deck = Deck::from_cards(Vec::new());
        deck.discard(Card::number(Color::Blue, 1));
        deck.discard(Card::number(Color::Blue, 2));
        deck.discard(Card::number(Color::Blue, 3));
        let drawn = deck.draw_many(2, &mut rng);
        assert_eq!(drawn.len(), 2);
        assert_eq!(deck.top(), Some(&Card::number(Color::Blue, 3)));
        assert_eq!(deck.discard_count(), 1);
        assert_eq!(deck.draw_count(), 0);
    }

    #[test]
    fn exhausted_deck_returns_short() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut deck = Deck::from_cards(vec![Card::wild()]);
        deck.discard(Card::number(Color::Green, 5));
        let drawn = deck.draw_many(3, &mut rng);
        assert_eq!(drawn, vec![Card::wild()]);
        assert_eq!(deck.draw(&mut rng), None);
        assert_eq!(deck.top(), Some(&Card::number(Color::Green, 5)));
    }

    #[test]
    fn put_bottom_is_drawn_last() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut deck = Deck::from_cards(vec![Card::number(Color::Red, 9)]);
        deck.put_bottom([Card::wild_draw_four()]);
        assert_eq!(deck.draw(&mut rng), Some(Card::number(Color::Red, 9)));
        assert_eq!(deck.draw(&mut rng), Some(Card::wild_draw_four()));
    }
}
