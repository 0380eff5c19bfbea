//! The session engine: the single live game session and its turn sequencing.
//!
//! One turn runs in strict order:
//! 1. **Player action**: applied through [`Engine::perform_player_action`]
//! 2. **Enemy sweep**: every other living actor's AI acts once
//! 3. **Visibility**: field of view is recomputed around the player
//! 4. **Render**: requested by the host through [`Engine::render`]

mod combat;
mod items;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use game_rules::{Component, ComponentError, Entity, EntityId, GameMap, GameWorld, Position};

use crate::actions::Action;
use crate::config::GameConfig;
use crate::error::{ActionError, SaveError};
use crate::fov::compute_fov;
use crate::message_log::MessageLog;
use crate::render::{self, Console};

/// Everything a play session consists of. Saved and loaded as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engine {
    pub game_map: GameMap,
    pub game_world: GameWorld,
    /// The player lives in `game_map`'s entity arena; this is its handle.
    pub player: EntityId,
    pub message_log: MessageLog,
    /// When off, the enemy sweep does nothing.
    pub ai_enabled: bool,
    pub mouse_location: Position,

    /// Runtime settings. Not part of the save file.
    #[serde(skip)]
    pub config: GameConfig,
}

impl Engine {
    /// Start a session with `player` placed on `game_map`.
    pub fn new(mut game_map: GameMap, player: Entity, config: GameConfig) -> Self {
        let player = game_map.insert(player);
        Self {
            game_map,
            game_world: GameWorld::new(),
            player,
            message_log: MessageLog::new(),
            ai_enabled: true,
            mouse_location: Position::default(),
            config,
        }
    }

    pub fn player_entity(&self) -> Result<&Entity, ComponentError> {
        self.game_map.entity(self.player)
    }

    /// The map a component's owner lives on.
    ///
    /// Fails when the component is detached or its owner is not on the
    /// current map.
    pub fn game_map_for<C: Component>(&self, component: &C) -> Result<&GameMap, ComponentError> {
        component.owner(&self.game_map)?;
        Ok(&self.game_map)
    }

    /// Apply one player action and, if it took a turn, run the rest of it.
    ///
    /// Returns whether a turn passed. Impossible actions are narrated in the
    /// log and cost nothing; any other failure propagates.
    pub fn perform_player_action(&mut self, action: Action) -> Result<bool, ActionError> {
        match self.perform(self.player, &action) {
            Ok(()) => {
                self.handle_enemy_turns()?;
                self.update_fov();
                Ok(true)
            }
            Err(ActionError::Impossible(reason)) => {
                self.message_log
                    .add_message(reason, game_rules::colors::IMPOSSIBLE);
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Give every non-player actor one AI turn.
    ///
    /// Membership is fixed by a snapshot taken up front. Actors whose AI has
    /// been cleared by the time their turn comes are skipped.
    pub fn handle_enemy_turns(&mut self) -> Result<(), ActionError> {
        if !self.ai_enabled {
            return Ok(());
        }

        let snapshot: Vec<EntityId> = self
            .game_map
            .actor_ids()
            .into_iter()
            .filter(|id| *id != self.player)
            .collect();

        for actor in snapshot {
            let Some(ai) = self.game_map.get(actor).and_then(|e| e.ai) else {
                continue;
            };
            match self.perform_ai(actor, ai) {
                Ok(()) => {}
                Err(ActionError::Impossible(reason)) => {
                    tracing::debug!(entity = %actor, %reason, "ai action impossible, skipping turn");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Recompute the visible set around the player and merge it into the
    /// explored history.
    pub fn update_fov(&mut self) {
        let Some(origin) = self.game_map.get(self.player).map(|p| p.position) else {
            return;
        };
        let visible = compute_fov(&self.game_map, origin, self.config.fov_radius);
        self.game_map.update_visibility(visible);
    }

    /// Compose the full frame. Reads game state only.
    pub fn render(&self, console: &mut dyn Console) {
        let layout = &self.config.layout;

        render::render_map(console, &self.game_map);

        self.message_log.render(
            console,
            layout.log_x,
            layout.log_y,
            layout.log_width,
            layout.log_height,
        );

        if let Some(fighter) = self
            .game_map
            .get(self.player)
            .and_then(|p| p.fighter.as_ref())
        {
            render::render_bar(
                console,
                layout.bar_x,
                layout.bar_y,
                fighter.hp(),
                fighter.max_hp(),
                layout.bar_width,
            );
        }

        render::render_dungeon_level(
            console,
            self.game_world.current_floor,
            Position::new(layout.floor_x, layout.floor_y),
        );

        render::render_names_at_mouse_location(
            console,
            layout.names_x,
            layout.names_y,
            &self.game_map,
            self.mouse_location,
        );
    }

    /// Write a compressed snapshot of the whole session to `path`.
    ///
    /// The data goes to a sibling temp file first and is renamed into place.
    /// On failure the temp file is removed and `path` is left untouched.
    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("sav.tmp");

        let written = self
            .write_snapshot(&tmp_path)
            .and_then(|()| fs::rename(&tmp_path, path).map_err(SaveError::from));
        if let Err(err) = written {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                tracing::debug!(path = %tmp_path.display(), error = %cleanup, "temp save not removed");
            }
            return Err(err);
        }

        tracing::info!(path = %path.display(), "game saved");
        Ok(())
    }

    fn write_snapshot(&self, path: &Path) -> Result<(), SaveError> {
        let file = File::create(path)?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        serde_json::to_writer(&mut encoder, self)?;
        encoder.finish()?.flush()?;
        Ok(())
    }

    /// Restore a session written by [`Engine::save_as`].
    ///
    /// Fighters are checked against the hp invariants and the player must be
    /// present on the map.
    pub fn load(path: impl AsRef<Path>, config: GameConfig) -> Result<Self, SaveError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut engine: Engine = serde_json::from_reader(GzDecoder::new(BufReader::new(file)))?;
        engine.game_map.validate()?;
        engine.player_entity()?;
        engine.config = config;

        tracing::info!(path = %path.display(), floor = engine.game_world.current_floor, "game loaded");
        Ok(engine)
    }

    /// Move the player, with everything they carry, onto the next floor.
    pub fn descend(&mut self, mut next_map: GameMap, spawn: Position) -> Result<(), ComponentError> {
        let mut player = self
            .game_map
            .remove(self.player)
            .ok_or(ComponentError::EntityNotFound(self.player))?;
        let carried: Vec<EntityId> = player
            .inventory
            .as_ref()
            .map(|inv| inv.items().to_vec())
            .unwrap_or_default();

        player.position = spawn;
        next_map.insert(player);
        for item in carried {
            if let Some(entity) = self.game_map.remove(item) {
                next_map.insert(entity);
            }
        }

        self.game_map = next_map;
        let floor = self.game_world.advance_floor();
        self.message_log
            .add_message("You descend the staircase.", game_rules::colors::DESCEND);
        tracing::info!(floor, "descended");

        self.update_fov();
        Ok(())
    }
}
