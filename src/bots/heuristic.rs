use crate::action::Action;
use crate::bot::Bot;
use crate::card::{COLORS, Card, Color};
use crate::state::PlayerView;

/// Rule-based bot that plays sensibly without search.
///
/// In plain English:
/// - Always call card-match when holding two cards.
/// - Challenge anyone caught on one card without a call.
/// - Dump the highest-scoring playable card, keeping number cards for last
///   when the hand is small (only a number card can go out).
/// - Wilds name the color the bot holds most of.
/// - Otherwise draw, and pass if the draw did not help.
#[derive(Default)]
pub struct HeuristicBot;

impl HeuristicBot {
    pub fn new() -> Self {
        Self
    }

    fn favourite_color(hand: &[Card]) -> Color {
        COLORS
            .iter()
            .copied()
            .max_by_key(|color| hand.iter().filter(|card| card.color() == Some(*color)).count())
            .unwrap_or(Color::Red)
    }

    fn play_priority(hand: &[Card], card: &Card) -> i64 {
        let mut score = i64::from(card.points());
        // Going out needs a number card, so hoard them near the end.
        if hand.len() <= 3 && card.can_finish() {
            score -= 100;
        }
        if hand.len() == 1 && card.can_finish() {
            score += 1_000;
        }
        score
    }
}

impl Bot for HeuristicBot {
    fn select_action(&mut self, view: &PlayerView, legal_actions: &[Action]) -> Action {
        if legal_actions.contains(&Action::SayCardMatch) {
            return Action::SayCardMatch;
        }
        if let Some(challenge) = legal_actions
            .iter()
            .find(|action| matches!(action, Action::Challenge { .. }))
        {
            return challenge.clone();
        }

        let favourite = Self::favourite_color(&view.hand);
        let best_play = legal_actions
            .iter()
            .filter_map(|action| match action {
                Action::Play {
                    hand_index,
                    declared_color,
                } => {
                    let card = view.hand.get(*hand_index)?;
                    if card.is_wild() && *declared_color != Some(favourite) {
                        return None;
                    }
                    Some((Self::play_priority(&view.hand, card), action))
                }
                _ => None,
            })
            .max_by_key(|(score, _)| *score)
            .map(|(_, action)| action.clone());
        if let Some(action) = best_play {
            return action;
        }
        if legal_actions.contains(&Action::Draw) {
            return Action::Draw;
        }
        legal_actions
            .first()
            .cloned()
            .unwrap_or(Action::Pass)
    }
}
