use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidPlay;

pub const COLORS: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];
pub const DECK_SIZE: usize = 108;
pub const HAND_SIZE: usize = 7;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 10;
pub const SPECIAL_POINTS: u32 = 20;
pub const WILD_POINTS: u32 = 50;

/// One of the four suit colors. Wild cards carry no color of their own.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = InvalidPlay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        COLORS
            .iter()
            .copied()
            .find(|color| color.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InvalidPlay::UnknownColor(s.to_string()))
    }
}

/// Face value printed on a card.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Face {
    /// Number card between 0 and 9.
    Number(u8),
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

/// Broad grouping used for scoring and legality.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Number,
    Special,
    Wild,
}

/// Immutable playing card.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    color: Option<Color>,
    face: Face,
}

impl Card {
    pub fn number(color: Color, value: u8) -> Self {
        debug_assert!(value <= 9);
        Self {
            color: Some(color),
            face: Face::Number(value),
        }
    }

    pub fn skip(color: Color) -> Self {
        Self {
            color: Some(color),
            face: Face::Skip,
        }
    }

    pub fn reverse(color: Color) -> Self {
        Self {
            color: Some(color),
            face: Face::Reverse,
        }
    }

    pub fn draw_two(color: Color) -> Self {
        Self {
            color: Some(color),
            face: Face::DrawTwo,
        }
    }

    pub fn wild() -> Self {
        Self {
            color: None,
            face: Face::Wild,
        }
    }

    pub fn wild_draw_four() -> Self {
        Self {
            color: None,
            face: Face::WildDrawFour,
        }
    }

    #[inline]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    #[inline]
    pub fn face(&self) -> Face {
        self.face
    }

    pub fn category(&self) -> Category {
        match self.face {
            Face::Number(_) => Category::Number,
            Face::Skip | Face::Reverse | Face::DrawTwo => Category::Special,
            Face::Wild | Face::WildDrawFour => Category::Wild,
        }
    }

    #[inline]
    pub fn is_wild(&self) -> bool {
        self.category() == Category::Wild
    }

    /// Draw-two and wild-draw-four may be stacked onto a pending draw.
    #[inline]
    pub fn is_stacking(&self) -> bool {
        matches!(self.face, Face::DrawTwo | Face::WildDrawFour)
    }

    /// Only number cards may be the last card out of a hand.
    #[inline]
    pub fn can_finish(&self) -> bool {
        self.category() == Category::Number
    }

    /// Checks whether the card may legally be placed on `top`.
    ///
    /// Wilds are always legal. When `top` is a wild with a declared color the
    /// declared color is the only thing that matches; otherwise the card must
    /// share the color or the face value of `top`.
    pub fn can_play_on(&self, top: &Card, declared: Option<Color>) -> bool {
        if self.is_wild() {
            return true;
        }
        if let (true, Some(color)) = (top.is_wild(), declared) {
            return self.color == Some(color);
        }
        (self.color.is_some() && self.color == top.color) || self.face == top.face
    }

    /// Penalty value of the card when left in a losing hand.
    pub fn points(&self) -> u32 {
        match self.face {
            Face::Number(value) => u32::from(value),
            Face::Skip | Face::Reverse | Face::DrawTwo => SPECIAL_POINTS,
            Face::Wild | Face::WildDrawFour => WILD_POINTS,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let face = match self.face {
            Face::Number(value) => value.to_string(),
            Face::Skip => String::from("skip"),
            Face::Reverse => String::from("reverse"),
            Face::DrawTwo => String::from("+2"),
            Face::Wild => String::from("wild"),
            Face::WildDrawFour => String::from("wild +4"),
        };
        match self.color {
            Some(color) => write!(f, "{color} {face}"),
            None => f.write_str(&face),
        }
    }
}

/// Builds the full 108-card deck in deterministic order (unshuffled).
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for color in COLORS {
        deck.push(Card::number(color, 0));
        for value in 1..=9 {
            deck.push(Card::number(color, value));
            deck.push(Card::number(color, value));
        }
        for _ in 0..2 {
            deck.push(Card::skip(color));
            deck.push(Card::reverse(color));
            deck.push(Card::draw_two(color));
        }
    }
    for _ in 0..4 {
        deck.push(Card::wild());
        deck.push(Card::wild_draw_four());
    }
    deck
}
