//! Health changes, the death transition, and experience rewards.

use game_rules::{colors, ComponentError, EntityId};

use super::Engine;

impl Engine {
    /// Deal `amount` damage to `target`, running the death transition if
    /// this blow is the one that brings it to 0.
    pub fn take_damage(&mut self, target: EntityId, amount: u32) -> Result<(), ComponentError> {
        let fatal = self
            .game_map
            .entity_mut(target)?
            .require_fighter_mut()?
            .take_damage(amount);
        if fatal {
            self.die(target)?;
        }
        Ok(())
    }

    /// Restore up to `amount` hit points, returning how many were recovered.
    pub fn heal(&mut self, target: EntityId, amount: u32) -> Result<u32, ComponentError> {
        Ok(self
            .game_map
            .entity_mut(target)?
            .require_fighter_mut()?
            .heal(amount))
    }

    pub fn power(&self, actor: EntityId) -> Result<u32, ComponentError> {
        self.game_map.power(actor)
    }

    pub fn defense(&self, actor: EntityId) -> Result<u32, ComponentError> {
        self.game_map.defense(actor)
    }

    fn die(&mut self, target: EntityId) -> Result<(), ComponentError> {
        let entity = self.game_map.entity_mut(target)?;
        entity.require_fighter_mut()?.mark_dead();
        let name = entity.become_corpse();
        let xp = entity.level.as_ref().map_or(0, |level| level.xp_given);

        let (message, color) = if target == self.player {
            ("You died!".to_string(), colors::PLAYER_DIE)
        } else {
            (format!("{name} is dead!"), colors::ENEMY_DIE)
        };
        tracing::info!(entity = %target, %name, xp, "actor died");
        self.message_log.add_message(message, color);

        // The reward goes to the player no matter who landed the blow.
        self.award_xp(xp)
    }

    fn award_xp(&mut self, xp: u32) -> Result<(), ComponentError> {
        let level = self.game_map.entity_mut(self.player)?.require_level_mut()?;
        if !level.add_xp(xp) {
            return Ok(());
        }
        let ready = level.requires_level_up();
        let next_level = level.current_level + 1;

        self.message_log
            .add_message(format!("You gain {xp} experience points."), colors::WHITE);
        if ready {
            self.message_log
                .add_message(format!("You advance to level {next_level}!"), colors::WHITE);
        }
        Ok(())
    }
}
