#![allow(dead_code)]

use cardmatch::{Card, Color, GameBuilder, GameEngine, GameError};

pub const IDS: [&str; 6] = ["a", "b", "c", "d", "e", "f"];
pub const NAMES: [&str; 6] = ["Alice", "Bob", "Carol", "Dave", "Erin", "Frank"];

pub fn red(value: u8) -> Card {
    Card::number(Color::Red, value)
}

pub fn blue(value: u8) -> Card {
    Card::number(Color::Blue, value)
}

pub fn green(value: u8) -> Card {
    Card::number(Color::Green, value)
}

pub fn yellow(value: u8) -> Card {
    Card::number(Color::Yellow, value)
}

/// Orders cards so the engine deals `hands` seat by seat, turns `opener`, and
/// then hands out `draws` front to back.
pub fn stacked_deck(hands: &[Vec<Card>], opener: Card, draws: &[Card]) -> Vec<Card> {
    let mut order: Vec<Card> = hands.iter().flatten().copied().collect();
    order.push(opener);
    order.extend_from_slice(draws);
    order.reverse();
    order
}

/// Seats one player per hand (ids `a`, `b`, ...) and starts a round on a stacked deck.
pub fn table(hands: &[Vec<Card>], opener: Card, draws: &[Card]) -> Result<GameEngine, GameError> {
    let mut game = GameBuilder::new("TEST01")
        .with_hand_size(hands[0].len())
        .with_deck(stacked_deck(hands, opener, draws))
        .build()?;
    for index in 0..hands.len() {
        game.add_player(IDS[index], NAMES[index])?;
    }
    game.start_game()?;
    Ok(game)
}

/// A dozen harmless green number cards for penalty and voluntary draws.
pub fn green_draws() -> Vec<Card> {
    (1..=9).chain(1..=3).map(green).collect()
}

pub fn hand(game: &GameEngine, id: &str) -> Vec<Card> {
    game.player_hand(id).map(<[Card]>::to_vec).unwrap_or_default()
}
