//! Room directory: maps connections to seats and room codes to engines.
//!
//! A room is created by its first player and dropped when the last one leaves.
//! Transport is not handled here; a server forwards each connection's request
//! to [`RoomDirectory`] and broadcasts the returned projections.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::action::{Action, PlayerId};
use crate::error::GameError;
use crate::game::{GameBuilder, GameConfig, GameEngine};
use crate::outcome::{ActionOutcome, LeaveOutcome};
use crate::state::{PlayerView, StateProjection};

const ROOM_CODE_LEN: usize = 6;
const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Transport-level connection handle, opaque to the engine.
pub type ConnectionId = String;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LobbyError {
    #[error("room {0} not found")]
    RoomNotFound(String),
    #[error("connection {0} is not seated in any room")]
    UnknownConnection(ConnectionId),
    #[error("connection {0} is already seated")]
    AlreadySeated(ConnectionId),
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Where a connection sits.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    pub room_id: String,
    pub player_id: PlayerId,
    pub name: String,
}

/// Result of a departure, for broadcasting to whoever remains.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Departure {
    pub seat: Seat,
    pub outcome: LeaveOutcome,
    pub room_closed: bool,
}

pub struct RoomDirectory {
    config: GameConfig,
    rooms: HashMap<String, GameEngine>,
    seats: HashMap<ConnectionId, Seat>,
    rng: StdRng,
}

impl RoomDirectory {
    pub fn new(config: GameConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            rooms: HashMap::new(),
            seats: HashMap::new(),
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room(&self, room_id: &str) -> Option<&GameEngine> {
        self.rooms.get(room_id)
    }

    pub fn seat(&self, connection: &str) -> Option<&Seat> {
        self.seats.get(connection)
    }

    /// Opens a fresh room with `connection` as its first player.
    pub fn create_room(
        &mut self,
        connection: impl Into<ConnectionId>,
        name: impl Into<String>,
    ) -> Result<Seat, LobbyError> {
        let connection = connection.into();
        if self.seats.contains_key(&connection) {
            return Err(LobbyError::AlreadySeated(connection));
        }
        let room_id = self.generate_room_code();
        // Each room gets its own shuffle stream derived from the directory seed.
        let seed = self.rng.next_u64();
        let engine = GameBuilder::new(room_id.clone())
            .with_config(GameConfig { seed, ..self.config })
            .build()?;
        self.rooms.insert(room_id.clone(), engine);
        info!(room = %room_id, "room created");
        self.seat_connection(connection, &room_id, name.into())
    }

    pub fn join_room(
        &mut self,
        connection: impl Into<ConnectionId>,
        room_id: &str,
        name: impl Into<String>,
    ) -> Result<Seat, LobbyError> {
        let connection = connection.into();
        if self.seats.contains_key(&connection) {
            return Err(LobbyError::AlreadySeated(connection));
        }
        if !self.rooms.contains_key(room_id) {
            return Err(LobbyError::RoomNotFound(room_id.to_string()));
        }
        self.seat_connection(connection, room_id, name.into())
    }

    fn seat_connection(
        &mut self,
        connection: ConnectionId,
        room_id: &str,
        name: String,
    ) -> Result<Seat, LobbyError> {
        let player_id = self.generate_player_id();
        let engine = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| LobbyError::RoomNotFound(room_id.to_string()))?;
        if let Err(err) = engine.add_player(player_id.clone(), name.clone()) {
            self.dispose_if_empty(room_id);
            return Err(err.into());
        }
        let seat = Seat {
            room_id: room_id.to_string(),
            player_id,
            name,
        };
        self.seats.insert(connection, seat.clone());
        Ok(seat)
    }

    /// Removes the connection's player; drops the room once nobody is left.
    pub fn leave(&mut self, connection: &str) -> Result<Departure, LobbyError> {
        let seat = self
            .seats
            .remove(connection)
            .ok_or_else(|| LobbyError::UnknownConnection(connection.to_string()))?;
        let engine = self
            .rooms
            .get_mut(&seat.room_id)
            .ok_or_else(|| LobbyError::RoomNotFound(seat.room_id.clone()))?;
        let outcome = engine.remove_player(&seat.player_id)?;
        let room_closed = self.dispose_if_empty(&seat.room_id);
        Ok(Departure {
            seat,
            outcome,
            room_closed,
        })
    }

    fn dispose_if_empty(&mut self, room_id: &str) -> bool {
        let empty = self
            .rooms
            .get(room_id)
            .is_some_and(|engine| engine.player_count() == 0);
        if empty {
            self.rooms.remove(room_id);
            info!(room = room_id, "room closed");
        }
        empty
    }

    pub fn start(&mut self, connection: &str) -> Result<StateProjection, LobbyError> {
        let (_, engine) = self.engine_for(connection)?;
        engine.start_game()?;
        Ok(engine.state_projection())
    }

    /// Forwards one action from a connection to its room's engine.
    pub fn dispatch(
        &mut self,
        connection: &str,
        action: Action,
    ) -> Result<ActionOutcome, LobbyError> {
        let (seat, engine) = self.engine_for(connection)?;
        Ok(engine.apply_action(&seat.player_id, action)?)
    }

    /// Per-recipient view: the shared projection plus that player's private hand.
    pub fn player_view(&self, connection: &str) -> Result<PlayerView, LobbyError> {
        let seat = self
            .seats
            .get(connection)
            .ok_or_else(|| LobbyError::UnknownConnection(connection.to_string()))?;
        let engine = self
            .rooms
            .get(&seat.room_id)
            .ok_or_else(|| LobbyError::RoomNotFound(seat.room_id.clone()))?;
        Ok(engine.player_view(&seat.player_id)?)
    }

    /// Connections seated in a room, for broadcasting.
    pub fn connections_in(&self, room_id: &str) -> Vec<&str> {
        let mut connections: Vec<&str> = self
            .seats
            .iter()
            .filter(|(_, seat)| seat.room_id == room_id)
            .map(|(connection, _)| connection.as_str())
            .collect();
        connections.sort_unstable();
        connections
    }

    fn engine_for(&mut self, connection: &str) -> Result<(Seat, &mut GameEngine), LobbyError> {
        let seat = self
            .seats
            .get(connection)
            .cloned()
            .ok_or_else(|| LobbyError::UnknownConnection(connection.to_string()))?;
        let engine = self
            .rooms
            .get_mut(&seat.room_id)
            .ok_or_else(|| LobbyError::RoomNotFound(seat.room_id.clone()))?;
        Ok((seat, engine))
    }

    fn generate_room_code(&mut self) -> String {
        loop {
            let code: String = (0..ROOM_CODE_LEN)
                .map(|_| {
                    let index = self.rng.gen_range(0..ROOM_CODE_ALPHABET.len());
                    char::from(ROOM_CODE_ALPHABET[index])
                })
                .collect();
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }

    fn generate_player_id(&mut self) -> PlayerId {
        let mut bytes = [0u8; 16];
        self.rng.fill(&mut bytes);
        uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .to_string()
    }
}

impl Default for RoomDirectory {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn room_codes_are_six_uppercase_characters() {
        let mut directory = RoomDirectory::default();
        let code = directory.generate_room_code();
        assert_eq!(code.len(), ROOM_CODE_LEN);
        assert!(
            code.chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn player_ids_are_uuids() {
        let mut directory = RoomDirectory::default();
        let id = directory.generate_player_id();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_ne!(id, directory.generate_player_id());
    }
}
