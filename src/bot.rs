use crate::action::Action;
use crate::state::PlayerView;

/// Interface for automated or interactive seats.
pub trait Bot {
    fn select_action(&mut self, view: &PlayerView, legal_actions: &[Action]) -> Action;
}
