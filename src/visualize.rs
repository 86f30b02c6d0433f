use std::fmt::Write;

use crate::action::Action;
use crate::state::{Direction, GameStatus, PlayerView, StateProjection};

/// Customize state rendering for CLI visualization.
#[derive(Clone, Copy, Debug)]
pub struct VisualOptions {
    pub show_scores: bool,
    pub show_pile_sizes: bool,
}

impl Default for VisualOptions {
    fn default() -> Self {
        Self {
            show_scores: true,
            show_pile_sizes: true,
        }
    }
}

pub fn render_state(state: &StateProjection) -> String {
    render_state_with_options(state, VisualOptions::default())
}

pub fn render_state_with_options(state: &StateProjection, options: VisualOptions) -> String {
    let mut out = String::new();
    let status = match state.status {
        GameStatus::Waiting => String::from("Waiting for players"),
        GameStatus::Starting => String::from("Dealing"),
        GameStatus::Playing => String::from("Playing"),
        GameStatus::Finished => match &state.winner {
            Some(winner) => format!("Finished (winner: {})", display_name(state, winner)),
            None => String::from("Finished (no winner)"),
        },
    };
    let _ = writeln!(out, "Room {}: {status}", state.room_id);
    let top = state
        .top_card
        .map(|card| card.to_string())
        .unwrap_or_else(|| String::from("--"));
    let declared = state
        .declared_color
        .map(|color| format!(" (declared {color})"))
        .unwrap_or_default();
    let _ = writeln!(out, "Top card: {top}{declared}");
    let arrow = match state.direction {
        Direction::Clockwise => "clockwise",
        Direction::CounterClockwise => "counter-clockwise",
    };
    let _ = writeln!(out, "Direction: {arrow}");
    if state.pending_draw > 0 {
        let counter = if state.wild_draw_four_pending {
            " (counterable)"
        } else {
            ""
        };
        let _ = writeln!(out, "Pending draw: {}{counter}", state.pending_draw);
    }
    if options.show_pile_sizes {
        let _ = writeln!(
            out,
            "Draw pile: {}  |  Discard pile: {}",
            state.draw_pile_count, state.discard_pile_count
        );
    }
    let _ = writeln!(out, "Players:");
    for player in &state.players {
        let current_tag = if player.is_current { " <- current" } else { "" };
        let finished_tag = if player.finished { " [out]" } else { "" };
        let score = if options.show_scores {
            format!("  score {}", player.score)
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            "  {} - {} cards{score}{finished_tag}{current_tag}",
            player.name, player.hand_size
        );
    }
    if !state.finishing_order.is_empty() {
        let _ = writeln!(out, "Finishing order:");
        for entry in &state.finishing_order {
            let loser = if entry.is_loser { " (last)" } else { "" };
            let _ = writeln!(out, "  {}. {}{loser}", entry.position, entry.name);
        }
    }
    out
}

/// Shared state followed by the recipient's own hand.
pub fn render_view(view: &PlayerView) -> String {
    let mut out = render_state(&view.state);
    if view.hand.is_empty() {
        let _ = writeln!(out, "Hand: (empty)");
    } else {
        let entries: Vec<String> = view
            .hand
            .iter()
            .enumerate()
            .map(|(idx, card)| format!("{idx}:{card}"))
            .collect();
        let _ = writeln!(out, "Hand: {}", entries.join("  "));
    }
    if view.is_your_turn {
        let _ = writeln!(out, "Your turn.");
    }
    out
}

pub fn describe_action(view: &PlayerView, action: &Action) -> String {
    match action {
        Action::Play {
            hand_index,
            declared_color,
        } => {
            let card = view
                .hand
                .get(*hand_index)
                .map(|card| card.to_string())
                .unwrap_or_else(|| String::from("--"));
            match declared_color {
                Some(color) => format!("Play hand[{hand_index}] {card} naming {color}"),
                None => format!("Play hand[{hand_index}] {card}"),
            }
        }
        Action::Draw => {
            if view.state.pending_draw > 0 {
                format!("Draw {} penalty cards", view.state.pending_draw)
            } else {
                String::from("Draw a card")
            }
        }
        Action::Pass => String::from("Pass"),
        Action::SayCardMatch => String::from("Call card-match"),
        Action::Challenge { target } => {
            format!("Challenge {}", display_name(&view.state, target))
        }
    }
}

fn display_name<'a>(state: &'a StateProjection, id: &'a str) -> &'a str {
    state
        .player(id)
        .map(|player| player.name.as_str())
        .unwrap_or(id)
}
