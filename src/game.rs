use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::action::{Action, PlayerId};
use crate::card::{COLORS, Card, Color, DECK_SIZE, Face, HAND_SIZE, MAX_PLAYERS, MIN_PLAYERS};
use crate::deck::Deck;
use crate::error::{GameError, InvalidPlay};
use crate::outcome::{
    ActionOutcome, ChallengeOutcome, DrawOutcome, LeaveOutcome, PlayOutcome, RoundSummary,
};
use crate::player::Player;
use crate::score::{ScoreBoard, winner_points};
use crate::state::{
    Direction, FinishEntry, GameStatus, PlayerPublicState, PlayerView, StateProjection,
};

const DEFAULT_SEED: u64 = 0x5EED_5EED_5EED_5EED;
const PENALTY_CARDS: usize = 2;

/// Room-level settings, validated when the engine is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub max_players: usize,
    pub hand_size: usize,
    pub seed: u64,
}

impl GameConfig {
    pub fn new(max_players: usize, seed: u64) -> Result<Self, GameError> {
        let config = Self {
            max_players,
            hand_size: HAND_SIZE,
            seed,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.max_players) {
            return Err(GameError::InvalidConfiguration(
                "max players must be between 2 and 10",
            ));
        }
        if self.hand_size == 0 {
            return Err(GameError::InvalidConfiguration("hand size must be positive"));
        }
        if self.hand_size * self.max_players >= DECK_SIZE {
            return Err(GameError::InvalidConfiguration(
                "deck cannot deal every hand and an opening card",
            ));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_players: MAX_PLAYERS,
            hand_size: HAND_SIZE,
            seed: DEFAULT_SEED,
        }
    }
}

/// Builder that enables seeding and deterministic deck injection for tests.
pub struct GameBuilder {
    room_id: String,
    config: GameConfig,
    deck: Option<Vec<Card>>,
}

impl GameBuilder {
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            config: GameConfig::default(),
            deck: None,
        }
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_max_players(mut self, max_players: usize) -> Self {
        self.config.max_players = max_players;
        self
    }

    /// Override the number of cards dealt to each player (7 by default).
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.config.hand_size = hand_size;
        self
    }

    /// Use `cards` unshuffled for the first round. The last card is drawn first:
    /// each seat is dealt in join order, then the opening card is turned.
    pub fn with_deck(mut self, cards: Vec<Card>) -> Self {
        self.deck = Some(cards);
        self
    }

    pub fn build(self) -> Result<GameEngine, GameError> {
        let rng = StdRng::seed_from_u64(self.config.seed);
        self.build_with_rng(rng)
    }

    /// Build with an injected random source driving shuffles and the opening wild color.
    pub fn build_with_rng<R: Rng>(self, rng: R) -> Result<GameEngine<R>, GameError> {
        let GameBuilder {
            room_id,
            config,
            deck,
        } = self;
        config.validate()?;
        Ok(GameEngine {
            room_id,
            config,
            status: GameStatus::Waiting,
            players: HashMap::new(),
            seats: Vec::new(),
            turn_order: Vec::new(),
            current: 0,
            direction: Direction::Clockwise,
            declared_color: None,
            pending_draw: 0,
            wild_draw_four_pending: false,
            skip_next: false,
            finishing_order: Vec::new(),
            winner: None,
            scores: ScoreBoard::default(),
            deck: Deck::default(),
            preset_deck: deck,
            rng,
        })
    }
}

/// Server-authoritative rules engine for one room.
///
/// Every command validates its guards before touching any state, so a returned
/// error always leaves the engine exactly as it was.
pub struct GameEngine<R = StdRng> {
    room_id: String,
    config: GameConfig,
    status: GameStatus,
    players: HashMap<PlayerId, Player>,
    /// Join order; the turn order is rebuilt from it every round.
    seats: Vec<PlayerId>,
    /// Players still holding cards, in seating order.
    turn_order: Vec<PlayerId>,
    current: usize,
    direction: Direction,
    declared_color: Option<Color>,
    pending_draw: usize,
    wild_draw_four_pending: bool,
    skip_next: bool,
    finishing_order: Vec<FinishEntry>,
    winner: Option<PlayerId>,
    scores: ScoreBoard,
    deck: Deck,
    preset_deck: Option<Vec<Card>>,
    rng: R,
}

impl GameEngine {
    pub fn builder(room_id: impl Into<String>) -> GameBuilder {
        GameBuilder::new(room_id)
    }

    pub fn new(room_id: impl Into<String>, config: GameConfig) -> Result<Self, GameError> {
        GameBuilder::new(room_id).with_config(config).build()
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_draw(&self) -> usize {
        self.pending_draw
    }

    /// True while the pending draw was started by a wild-draw-four and can still be countered.
    pub fn wild_draw_four_pending(&self) -> bool {
        self.wild_draw_four_pending
    }

    pub fn declared_color(&self) -> Option<Color> {
        self.declared_color
    }

    pub fn top_card(&self) -> Option<Card> {
        self.deck.top().copied()
    }

    pub fn turn_order(&self) -> &[PlayerId] {
        &self.turn_order
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn finishing_order(&self) -> &[FinishEntry] {
        &self.finishing_order
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.get(player_id)
    }

    /// Private hand of one player, for the per-recipient view.
    pub fn player_hand(&self, player_id: &str) -> Option<&[Card]> {
        self.players.get(player_id).map(Player::hand)
    }

    /// Cumulative score across rounds.
    pub fn score(&self, player_id: &str) -> u32 {
        self.scores.get(player_id)
    }

    /// Player whose turn it is, while a round is being played.
    pub fn current_player(&self) -> Option<&str> {
        if self.status != GameStatus::Playing {
            return None;
        }
        self.turn_order.get(self.current).map(String::as_str)
    }

    /// Every card in the room: all hands, then the draw pile, then the discard pile.
    pub fn all_cards(&self) -> Vec<Card> {
        let mut cards: Vec<Card> = self
            .seats
            .iter()
            .filter_map(|id| self.players.get(id))
            .flat_map(|player| player.hand().iter().copied())
            .collect();
        cards.extend(self.deck.cards().copied());
        cards
    }

    pub fn add_player(
        &mut self,
        player_id: impl Into<PlayerId>,
        name: impl Into<String>,
    ) -> Result<(), GameError> {
        let player_id = player_id.into();
        if self.seats.len() >= self.config.max_players {
            return Err(GameError::RoomFull {
                capacity: self.config.max_players,
            });
        }
        if self.status != GameStatus::Waiting {
            return Err(GameError::GameAlreadyStarted);
        }
        if self.players.contains_key(&player_id) {
            return Err(GameError::DuplicatePlayer(player_id));
        }
        let player = Player::new(player_id.clone(), name);
        debug!(room = %self.room_id, player = %player_id, name = player.name(), "player joined");
        self.scores.register(&player_id);
        self.players.insert(player_id.clone(), player);
        self.seats.push(player_id);
        Ok(())
    }

    /// Removes a player who disconnected.
    ///
    /// Their cards go back under the draw pile. If only one player is left
    /// holding cards mid-round, that player is placed last in the finishing
    /// order and the round is scored as usual.
    pub fn remove_player(&mut self, player_id: &str) -> Result<LeaveOutcome, GameError> {
        let Some(mut player) = self.players.remove(player_id) else {
            return Err(GameError::PlayerNotFound(player_id.to_string()));
        };
        self.seats.retain(|id| id != player_id);
        let was_active = self.remove_from_turn_order(player_id).is_some();
        let hand = player.take_hand();
        if !hand.is_empty() {
            self.deck.put_bottom(hand);
        }
        info!(room = %self.room_id, player = player_id, "player left");

        let mut round_over = None;
        if self.status == GameStatus::Playing && was_active && self.turn_order.len() < MIN_PLAYERS
        {
            round_over = Some(self.conclude_round());
        }
        Ok(LeaveOutcome {
            remaining_players: self.players.len(),
            round_over,
        })
    }

    /// Deals a new round and turns the opening card.
    pub fn start_game(&mut self) -> Result<(), GameError> {
        if self.status != GameStatus::Waiting {
            return Err(GameError::GameAlreadyStarted);
        }
        if self.seats.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers {
                required: MIN_PLAYERS,
            });
        }
        let deck = match &self.preset_deck {
            Some(cards) => Deck::from_cards(cards.clone()),
            None => Deck::shuffled(&mut self.rng),
        };
        let (mut deck, hands, opener) = self.prepare_deal(deck)?;

        self.status = GameStatus::Starting;
        self.preset_deck = None;
        self.turn_order = self.seats.clone();
        for (player_id, hand) in self.seats.iter().zip(hands) {
            if let Some(player) = self.players.get_mut(player_id) {
                player.reset();
                player.add_cards(hand);
            }
        }
        deck.discard(opener);
        self.deck = deck;
        self.declared_color = match opener.face() {
            Face::Wild => COLORS.choose(&mut self.rng).copied(),
            _ => None,
        };
        self.current = 0;
        self.direction = Direction::Clockwise;
        self.skip_next = false;
        self.pending_draw = 0;
        self.wild_draw_four_pending = false;
        self.finishing_order.clear();
        self.winner = None;
        self.status = GameStatus::Playing;

        // The opener's effect loads the first turn; no extra advance is taken.
        self.resolve_special(opener, false);
        info!(
            room = %self.room_id,
            players = self.turn_order.len(),
            opener = %opener,
            declared = ?self.declared_color,
            "round started"
        );
        Ok(())
    }

    /// Deals every hand and finds an opener on a scratch deck. A wild-draw-four
    /// can never open, so it is slid under the draw pile and another card turned.
    fn prepare_deal(&mut self, mut deck: Deck) -> Result<(Deck, Vec<Vec<Card>>, Card), GameError> {
        let mut hands = Vec::with_capacity(self.seats.len());
        for _ in 0..self.seats.len() {
            hands.push(deck.draw_many(self.config.hand_size, &mut self.rng));
        }
        let mut attempts = deck.draw_count();
        let opener = loop {
            let Some(card) = deck.draw(&mut self.rng) else {
                return Err(GameError::DeckExhausted);
            };
            if card.face() != Face::WildDrawFour {
                break card;
            }
            deck.put_bottom([card]);
            if attempts == 0 {
                return Err(GameError::DeckExhausted);
            }
            attempts -= 1;
        };
        Ok((deck, hands, opener))
    }

    /// Plays the card at `hand_index`. `declared_color` is required for wilds
    /// and ignored otherwise.
    pub fn play_card(
        &mut self,
        player_id: &str,
        hand_index: usize,
        declared_color: Option<Color>,
    ) -> Result<PlayOutcome, GameError> {
        let (card, counter) = self.validate_play(player_id, hand_index, declared_color)?;
        let previous_color = self.declared_color;
        let Some(player) = self.players.get_mut(player_id) else {
            return Err(GameError::PlayerNotFound(player_id.to_string()));
        };
        let previously_drawn = player.has_drawn();
        let called = player.declared_card_match();
        let Some(card) = player.remove_card(hand_index) else {
            return Err(InvalidPlay::HandIndex(hand_index).into());
        };
        player.set_has_drawn(false);
        let remaining = player.hand_size();
        self.deck.discard(card);
        self.declared_color = if card.is_wild() { declared_color } else { None };
        debug!(
            room = %self.room_id,
            player = player_id,
            card = %card,
            declared = ?self.declared_color,
            counter,
            "card played"
        );

        let mut penalty_drawn = 0;
        if remaining == 1 && !called {
            penalty_drawn = self.draw_into_hand(player_id, PENALTY_CARDS).len();
            debug!(room = %self.room_id, player = player_id, penalty_drawn, "missed card-match call");
        }

        if remaining == 0 {
            if !card.can_finish() {
                return Ok(self.reject_finish(player_id, card, previous_color, previously_drawn));
            }
            return Ok(self.finish_player(player_id));
        }

        self.resolve_special(card, counter);
        self.advance_turn();
        Ok(PlayOutcome::Continued {
            card,
            penalty_drawn,
        })
    }

    fn validate_play(
        &self,
        player_id: &str,
        hand_index: usize,
        declared_color: Option<Color>,
    ) -> Result<(Card, bool), GameError> {
        let player = self.ensure_turn(player_id)?;
        let card = *player
            .hand()
            .get(hand_index)
            .ok_or(InvalidPlay::HandIndex(hand_index))?;
        let top = self.top_card().ok_or(GameError::DeckExhausted)?;
        if !card.can_play_on(&top, self.declared_color) {
            return Err(InvalidPlay::CardMismatch { card, top }.into());
        }
        let counter = self.is_counter(&card);
        if self.pending_draw > 0 && !card.is_stacking() && !counter {
            return Err(InvalidPlay::MustDrawOrStack.into());
        }
        if card.is_wild() && declared_color.is_none() {
            return Err(InvalidPlay::MustDeclareColor.into());
        }
        Ok((card, counter))
    }

    /// A skip or reverse in the declared color answering a pending wild-draw-four.
    fn is_counter(&self, card: &Card) -> bool {
        self.pending_draw > 0
            && self.wild_draw_four_pending
            && matches!(card.face(), Face::Skip | Face::Reverse)
            && card.color().is_some()
            && card.color() == self.declared_color
    }

    fn ensure_turn(&self, player_id: &str) -> Result<&Player, GameError> {
        let player = self
            .players
            .get(player_id)
            .ok_or_else(|| GameError::PlayerNotFound(player_id.to_string()))?;
        if self.status != GameStatus::Playing {
            return Err(GameError::GameNotInProgress);
        }
        if self.current_player() != Some(player_id) {
            return Err(GameError::NotYourTurn);
        }
        Ok(player)
    }

    /// Rolls back an action or wild card played as the last card, keeping only the penalty.
    fn reject_finish(
        &mut self,
        player_id: &str,
        card: Card,
        previous_color: Option<Color>,
        previously_drawn: bool,
    ) -> PlayOutcome {
        self.deck.take_discard_top();
        self.declared_color = previous_color;
        let penalty_drawn = self.draw_into_hand(player_id, PENALTY_CARDS).len();
        if let Some(player) = self.players.get_mut(player_id) {
            player.restore_card(card);
            player.set_has_drawn(previously_drawn);
        }
        info!(room = %self.room_id, player = player_id, card = %card, "invalid win rolled back");
        PlayOutcome::InvalidWin {
            card,
            penalty_drawn,
        }
    }

    fn finish_player(&mut self, player_id: &str) -> PlayOutcome {
        let position = self.finishing_order.len() + 1;
        let name = self
            .players
            .get(player_id)
            .map(|player| player.name().to_string())
            .unwrap_or_default();
        self.finishing_order.push(FinishEntry {
            player_id: player_id.to_string(),
            name,
            position,
            is_loser: false,
        });
        self.remove_from_turn_order(player_id);
        info!(room = %self.room_id, player = player_id, position, "player finished");

        if self.turn_order.len() < MIN_PLAYERS {
            return PlayOutcome::GameEnded(self.conclude_round());
        }
        PlayOutcome::PlayerFinished {
            player_id: player_id.to_string(),
            position,
            remaining_players: self.turn_order.len(),
        }
    }

    /// Closes the round: the last player holding cards joins the finishing
    /// order and the position-1 finisher collects everybody's hand points.
    fn conclude_round(&mut self) -> RoundSummary {
        if let Some(last_id) = self.turn_order.first().cloned() {
            let name = self
                .players
                .get(&last_id)
                .map(|player| player.name().to_string())
                .unwrap_or_default();
            let is_loser = !self.finishing_order.is_empty();
            self.finishing_order.push(FinishEntry {
                player_id: last_id,
                name,
                position: self.finishing_order.len() + 1,
                is_loser,
            });
        }
        self.winner = self
            .finishing_order
            .first()
            .map(|entry| entry.player_id.clone());

        let mut points_awarded = 0;
        if let Some(winner) = self.winner.clone() {
            points_awarded = winner_points(
                self.players
                    .values()
                    .map(|player| (player.id(), player.hand())),
                &winner,
            );
            self.scores.award(&winner, points_awarded);
        }
        self.pending_draw = 0;
        self.wild_draw_four_pending = false;
        self.skip_next = false;
        self.status = GameStatus::Finished;
        info!(room = %self.room_id, winner = ?self.winner, points_awarded, "round finished");

        RoundSummary {
            winner: self.winner.clone(),
            finishing_order: self.finishing_order.clone(),
            points_awarded,
        }
    }

    /// Applies a card's effect on turn flow.
    fn resolve_special(&mut self, card: Card, counter: bool) {
        match card.face() {
            Face::Skip => {
                // A countering skip forwards the pending draw past the skipped seat.
                self.skip_next = true;
                self.wild_draw_four_pending = false;
            }
            Face::Reverse => {
                self.direction = self.direction.flipped();
                // Two seated players, counting anyone already finished.
                if !counter && self.seats.len() == 2 {
                    self.skip_next = true;
                }
                self.wild_draw_four_pending = false;
            }
            Face::DrawTwo => self.pending_draw += 2,
            Face::WildDrawFour => {
                self.pending_draw += 4;
                self.wild_draw_four_pending = true;
            }
            Face::Number(_) | Face::Wild => self.wild_draw_four_pending = false,
        }
    }

    fn next_index(&self) -> usize {
        let len = self.turn_order.len();
        if len == 0 {
            return 0;
        }
        match self.direction {
            Direction::Clockwise => (self.current + 1) % len,
            Direction::CounterClockwise => (self.current + len - 1) % len,
        }
    }

    fn advance_turn(&mut self) {
        self.current = self.next_index();
        if self.skip_next {
            self.skip_next = false;
            self.current = self.next_index();
        }
    }

    /// Splices a player out of the turn order. If it was their turn, the turn
    /// passes to the next seat in the current direction.
    fn remove_from_turn_order(&mut self, player_id: &str) -> Option<usize> {
        let index = self.turn_order.iter().position(|id| id == player_id)?;
        self.turn_order.remove(index);
        let len = self.turn_order.len();
        if len == 0 {
            self.current = 0;
        } else if index < self.current {
            self.current -= 1;
        } else if index == self.current {
            self.current = match self.direction {
                Direction::Clockwise => index % len,
                Direction::CounterClockwise => (index + len - 1) % len,
            };
        }
        Some(index)
    }

    fn draw_into_hand(&mut self, player_id: &str, count: usize) -> Vec<Card> {
        let cards = self.deck.draw_many(count, &mut self.rng);
        if let Some(player) = self.players.get_mut(player_id) {
            player.add_cards(cards.iter().copied());
        }
        cards
    }

    /// Draws the pending stack if one is owed, otherwise a single voluntary card.
    /// The turn does not advance either way.
    pub fn draw_card(&mut self, player_id: &str) -> Result<DrawOutcome, GameError> {
        let player = self.ensure_turn(player_id)?;
        if self.pending_draw == 0 && player.has_drawn() {
            return Err(InvalidPlay::AlreadyDrawn.into());
        }

        if self.pending_draw > 0 {
            let requested = self.pending_draw;
            let cards = self.draw_into_hand(player_id, requested);
            self.pending_draw = 0;
            self.wild_draw_four_pending = false;
            if let Some(player) = self.players.get_mut(player_id) {
                player.set_has_drawn(true);
            }
            let has_playable = self.top_card().is_some_and(|top| {
                cards
                    .iter()
                    .any(|card| card.can_play_on(&top, self.declared_color))
            });
            debug!(room = %self.room_id, player = player_id, requested, drawn = cards.len(), "forced draw");
            return Ok(DrawOutcome::Forced {
                requested,
                drawn: cards.len(),
                has_playable,
            });
        }

        let card = self.deck.draw(&mut self.rng);
        if let Some(player) = self.players.get_mut(player_id) {
            player.add_cards(card);
            player.set_has_drawn(true);
        }
        if card.is_none() {
            warn!(room = %self.room_id, player = player_id, "deck exhausted on voluntary draw");
        }
        let playable = match (card, self.top_card()) {
            (Some(card), Some(top)) => card.can_play_on(&top, self.declared_color),
            _ => false,
        };
        debug!(room = %self.room_id, player = player_id, playable, "voluntary draw");
        Ok(DrawOutcome::Voluntary { card, playable })
    }

    pub fn pass_turn(&mut self, player_id: &str) -> Result<(), GameError> {
        let player = self.ensure_turn(player_id)?;
        if !player.has_drawn() {
            return Err(InvalidPlay::MustDrawBeforePassing.into());
        }
        if let Some(player) = self.players.get_mut(player_id) {
            player.set_has_drawn(false);
        }
        self.advance_turn();
        debug!(room = %self.room_id, player = player_id, "turn passed");
        Ok(())
    }

    /// Latches a card-match call. Returns false, without error, unless the
    /// player holds exactly two cards.
    pub fn say_card_match(&mut self, player_id: &str) -> Result<bool, GameError> {
        let Some(player) = self.players.get_mut(player_id) else {
            return Err(GameError::PlayerNotFound(player_id.to_string()));
        };
        let accepted = player.declare_card_match();
        debug!(room = %self.room_id, player = player_id, accepted, "card-match called");
        Ok(accepted)
    }

    /// A challenge succeeds against a player sitting on one card without a call;
    /// they draw two. Anything else is reported invalid and changes nothing.
    pub fn challenge_card_match(
        &mut self,
        challenger_id: &str,
        challenged_id: &str,
    ) -> Result<ChallengeOutcome, GameError> {
        for id in [challenger_id, challenged_id] {
            if !self.players.contains_key(id) {
                return Err(GameError::PlayerNotFound(id.to_string()));
            }
        }
        if self.status != GameStatus::Playing {
            return Err(GameError::GameNotInProgress);
        }
        let exposed = self
            .players
            .get(challenged_id)
            .is_some_and(|player| player.hand_size() == 1 && !player.declared_card_match());
        if !exposed {
            return Ok(ChallengeOutcome {
                valid: false,
                penalty: 0,
            });
        }
        let penalty = self.draw_into_hand(challenged_id, PENALTY_CARDS).len();
        info!(
            room = %self.room_id,
            challenger = challenger_id,
            challenged = challenged_id,
            penalty,
            "card-match challenge upheld"
        );
        Ok(ChallengeOutcome {
            valid: true,
            penalty,
        })
    }

    /// Returns a finished room to the lobby, keeping seats and cumulative scores.
    pub fn reset_for_next_round(&mut self) -> Result<(), GameError> {
        match self.status {
            GameStatus::Finished => {}
            GameStatus::Waiting => return Ok(()),
            GameStatus::Starting | GameStatus::Playing => {
                return Err(GameError::GameAlreadyStarted);
            }
        }
        for player in self.players.values_mut() {
            player.reset();
        }
        self.turn_order.clear();
        self.current = 0;
        self.direction = Direction::Clockwise;
        self.declared_color = None;
        self.pending_draw = 0;
        self.wild_draw_four_pending = false;
        self.skip_next = false;
        self.finishing_order.clear();
        self.winner = None;
        self.deck = Deck::default();
        self.status = GameStatus::Waiting;
        debug!(room = %self.room_id, "room reset for next round");
        Ok(())
    }

    pub fn state_projection(&self) -> StateProjection {
        let current = self.current_player();
        let players = self
            .seats
            .iter()
            .filter_map(|id| self.players.get(id))
            .map(|player| PlayerPublicState {
                id: player.id().to_string(),
                name: player.name().to_string(),
                hand_size: player.hand_size(),
                score: self.scores.get(player.id()),
                finished: self
                    .finishing_order
                    .iter()
                    .any(|entry| entry.player_id == player.id()),
                is_current: current == Some(player.id()),
            })
            .collect();
        StateProjection {
            room_id: self.room_id.clone(),
            status: self.status,
            players,
            turn_order: self.turn_order.clone(),
            current_player: current.map(str::to_string),
            current_player_index: self.current,
            current_player_has_drawn: current
                .and_then(|id| self.players.get(id))
                .is_some_and(Player::has_drawn),
            direction: self.direction,
            pending_draw: self.pending_draw,
            wild_draw_four_pending: self.wild_draw_four_pending,
            top_card: self.top_card(),
            declared_color: self.declared_color,
            finishing_order: self.finishing_order.clone(),
            winner: self.winner.clone(),
            draw_pile_count: self.deck.draw_count(),
            discard_pile_count: self.deck.discard_count(),
        }
    }

    pub fn player_view(&self, player_id: &str) -> Result<PlayerView, GameError> {
        let player = self
            .players
            .get(player_id)
            .ok_or_else(|| GameError::PlayerNotFound(player_id.to_string()))?;
        let has_playable_card = self
            .top_card()
            .is_some_and(|top| player.has_playable_card(&top, self.declared_color));
        Ok(PlayerView {
            player_id: player_id.to_string(),
            state: self.state_projection(),
            hand: player.hand().to_vec(),
            is_your_turn: self.current_player() == Some(player_id),
            has_playable_card,
        })
    }

    /// Every action the guards would accept from `player_id` right now.
    pub fn legal_actions(&self, player_id: &str) -> Result<Vec<Action>, GameError> {
        let player = self
            .players
            .get(player_id)
            .ok_or_else(|| GameError::PlayerNotFound(player_id.to_string()))?;
        let mut actions = Vec::new();
        if self.status != GameStatus::Playing {
            return Ok(actions);
        }
        if player.hand_size() == 2 && !player.declared_card_match() {
            actions.push(Action::SayCardMatch);
        }
        for other in self.turn_order.iter().filter(|id| *id != player_id) {
            if let Some(target) = self.players.get(other) {
                if target.hand_size() == 1 && !target.declared_card_match() {
                    actions.push(Action::Challenge {
                        target: other.clone(),
                    });
                }
            }
        }
        if self.current_player() != Some(player_id) {
            return Ok(actions);
        }
        for (hand_index, card) in player.hand().iter().enumerate() {
            if self
                .validate_play(player_id, hand_index, Some(Color::Red))
                .is_err()
            {
                continue;
            }
            if card.is_wild() {
                for color in COLORS {
                    actions.push(Action::play_wild(hand_index, color));
                }
            } else {
                actions.push(Action::play(hand_index));
            }
        }
        if self.pending_draw > 0 || !player.has_drawn() {
            actions.push(Action::Draw);
        }
        if player.has_drawn() {
            actions.push(Action::Pass);
        }
        Ok(actions)
    }

    /// Single entry point for a dispatcher forwarding one action at a time.
    pub fn apply_action(
        &mut self,
        player_id: &str,
        action: Action,
    ) -> Result<ActionOutcome, GameError> {
        match action {
            Action::Play {
                hand_index,
                declared_color,
            } => self
                .play_card(player_id, hand_index, declared_color)
                .map(ActionOutcome::Played),
            Action::Draw => self.draw_card(player_id).map(ActionOutcome::Drew),
            Action::Pass => self.pass_turn(player_id).map(|()| ActionOutcome::Passed),
            Action::SayCardMatch => self
                .say_card_match(player_id)
                .map(|accepted| ActionOutcome::CardMatch { accepted }),
            Action::Challenge { target } => self
                .challenge_card_match(player_id, &target)
                .map(ActionOutcome::Challenged),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_player_engine() -> GameEngine {
        let mut game = GameEngine::builder("ROOM01").with_seed(11).build().expect("engine");
        game.add_player("a", "Alice").expect("join a");
        game.add_player("b", "Bob").expect("join b");
        game
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(GameConfig::new(1, 0).is_err());
        assert!(GameConfig::new(11, 0).is_err());
        assert!(GameBuilder::new("x").with_hand_size(0).build().is_err());
        assert!(
            GameBuilder::new("x")
                .with_hand_size(11)
                .with_max_players(10)
                .build()
                .is_err()
        );
    }

    #[test]
    fn seeded_rounds_are_reproducible() {
        let mut a = two_player_engine();
        let mut b = two_player_engine();
        a.start_game().expect("start a");
        b.start_game().expect("start b");
        assert_eq!(a.state_projection(), b.state_projection());
        assert_eq!(a.player_hand("a"), b.player_hand("a"));
    }

    #[test]
    fn turn_pointer_follows_removal() {
        let mut game = GameEngine::builder("R").build().expect("engine");
        for id in ["a", "b", "c", "d"] {
            game.add_player(id, id).expect("join");
        }
        game.turn_order = game.seats.clone();
        game.current = 2;
        game.remove_from_turn_order("a");
        assert_eq!(game.current, 1);
        game.remove_from_turn_order("c");
        assert_eq!(game.turn_order[game.current], "d");
        game.direction = Direction::CounterClockwise;
        game.current = 0;
        game.remove_from_turn_order("b");
        assert_eq!(game.turn_order[game.current], "d");
    }

    #[test]
    fn next_index_wraps_both_ways() {
        let mut game = two_player_engine();
        game.turn_order = vec!["a".into(), "b".into(), "c".into()];
        game.current = 2;
        assert_eq!(game.next_index(), 0);
        game.direction = Direction::CounterClockwise;
        game.current = 0;
        assert_eq!(game.next_index(), 2);
    }
}
