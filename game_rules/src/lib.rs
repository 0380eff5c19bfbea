//! # Game Rules
//!
//! The data model of the dungeon: entities and their components, game
//! mechanics tables, and the tile map with its entity arena.
//! This crate holds no session state; the engine in `session_core` drives it.

pub mod entities;
pub mod error;
pub mod mechanics;
pub mod world_state;

pub use entities::*;
pub use error::*;
pub use mechanics::*;
pub use world_state::*;
