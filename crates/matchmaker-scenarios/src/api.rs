//! Wire types of the matchmaker remote-call surface.
//!
//! These shapes are the external contract of the application under test;
//! the harness only ever sees them as JSON. Serde's externally tagged enum
//! encoding gives the `{"Suggest": {"suggestion": 5}}` form the application
//! expects.

use serde::{Deserialize, Serialize};

use matchmaker_harness::{Address, AgentId};

/// Zome every scripted call targets
pub const MAIN_ZOME: &str = "main";

/// A move kind and the data it carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MoveType {
    Suggest { suggestion: usize },
    Predict { prediction: usize },
    Swap {},
}

/// Arguments to `create_game`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameArgs {
    pub opponent: AgentId,
    pub timestamp: u32,
}

/// A move as submitted by a player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveInput {
    pub game: Address,
    pub move_type: MoveType,
    pub timestamp: u32,
}

/// Arguments to `make_move`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MakeMoveArgs {
    pub new_move: MoveInput,
}

/// Arguments to `render_state`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderStateArgs {
    pub game_address: Address,
}

/// A game entry as published to the network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub player_1: AgentId,
    pub player_2: AgentId,
    pub created_at: u32,
}

/// A move entry as published to the network.
///
/// Moves form a chain per game: `previous_move` points at the move this
/// one follows, or is absent for the first move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub game: Address,
    pub author: AgentId,
    pub move_type: MoveType,
    pub previous_move: Option<Address>,
    pub timestamp: u32,
}
