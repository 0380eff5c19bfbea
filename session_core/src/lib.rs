//! # Session Core
//!
//! The turn engine that drives a single Delve play session on top of the
//! `game_rules` data model.
//!
//! ## Core Components
//!
//! - **engine**: Session state, turn sequencing, combat and inventory orchestration, save files
//! - **actions / ai**: What actors do on their turn, chosen by the player or by a policy
//! - **fov**: Recursive shadowcasting field of view
//! - **render / message_log**: Frame composition onto an abstract console
//! - **session**: Outer loop that guarantees a save on quit or failure
//!
//! ## Turn Order
//!
//! 1. Player action
//! 2. Enemy sweep over a snapshot of living actors
//! 3. Field of view recomputation
//! 4. Render, at the host's request

pub mod actions;
pub mod ai;
pub mod config;
pub mod engine;
pub mod error;
pub mod fov;
pub mod logging;
pub mod message_log;
pub mod render;
pub mod session;

pub use actions::Action;
pub use config::{GameConfig, PanelLayout};
pub use engine::Engine;
pub use error::{ActionError, ConfigError, SaveError};
pub use fov::compute_fov;
pub use logging::{init_tracing, LogConfig, LogLevel};
pub use message_log::{Message, MessageLog};
pub use render::{Console, TextConsole};
pub use session::{run, Control};
