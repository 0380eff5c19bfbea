//! Actions an actor can take on its turn.

use serde::{Deserialize, Serialize};

use game_rules::{colors, EntityId};

use crate::engine::Engine;
use crate::error::ActionError;
use crate::render::capitalize;

/// One unit of intent, issued by the player or by an AI policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Wait,
    Move { dx: i32, dy: i32 },
    Melee { dx: i32, dy: i32 },
    /// Attack whatever stands in the way, or move there if nothing does.
    Bump { dx: i32, dy: i32 },
    Pickup,
    Drop(EntityId),
    Equip(EntityId),
    Use(EntityId),
    ToggleAi,
}

impl Engine {
    /// Apply `action` on behalf of `actor`.
    ///
    /// `ToggleAi` is a session switch and is accepted from dead actors too.
    pub fn perform(&mut self, actor: EntityId, action: &Action) -> Result<(), ActionError> {
        if *action != Action::ToggleAi && !self.game_map.entity(actor)?.is_alive() {
            return Err(ActionError::impossible("The dead cannot act."));
        }

        match *action {
            Action::Wait => Ok(()),
            Action::Move { dx, dy } => self.move_actor(actor, dx, dy),
            Action::Melee { dx, dy } => self.melee(actor, dx, dy),
            Action::Bump { dx, dy } => {
                let target = self.game_map.entity(actor)?.position.offset(dx, dy);
                if self.game_map.actor_at(target).is_some() {
                    self.melee(actor, dx, dy)
                } else {
                    self.move_actor(actor, dx, dy)
                }
            }
            Action::Pickup => self.pick_up(actor),
            Action::Drop(item) => self.drop_item(actor, item),
            Action::Equip(item) => self.toggle_equip(actor, item),
            Action::Use(item) => self.use_item(actor, item),
            Action::ToggleAi => {
                self.ai_enabled = !self.ai_enabled;
                let text = if self.ai_enabled {
                    "AI enabled."
                } else {
                    "AI disabled."
                };
                self.message_log.add_message(text, colors::WHITE);
                Ok(())
            }
        }
    }

    fn move_actor(&mut self, actor: EntityId, dx: i32, dy: i32) -> Result<(), ActionError> {
        let dest = self.game_map.entity(actor)?.position.offset(dx, dy);
        if !self.game_map.is_walkable(dest.x, dest.y)
            || self.game_map.blocking_entity_at(dest).is_some()
        {
            return Err(ActionError::impossible("That way is blocked."));
        }
        self.game_map.entity_mut(actor)?.position = dest;
        Ok(())
    }

    fn melee(&mut self, actor: EntityId, dx: i32, dy: i32) -> Result<(), ActionError> {
        let dest = self.game_map.entity(actor)?.position.offset(dx, dy);
        let target = self
            .game_map
            .actor_at(dest)
            .map(|e| e.id)
            .ok_or_else(|| ActionError::impossible("Nothing to attack."))?;

        let damage = self
            .power(actor)?
            .saturating_sub(self.defense(target)?);
        let description = format!(
            "{} attacks {}",
            capitalize(&self.game_map.entity(actor)?.name),
            self.game_map.entity(target)?.name
        );
        let color = if actor == self.player {
            colors::PLAYER_ATK
        } else {
            colors::ENEMY_ATK
        };

        if damage > 0 {
            self.message_log
                .add_message(format!("{description} for {damage} hit points."), color);
            self.take_damage(target, damage)?;
        } else {
            self.message_log
                .add_message(format!("{description} but does no damage."), color);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use game_rules::{Entity, GameMap, Position};

    fn setup() -> (Engine, EntityId) {
        let map = GameMap::from_rows(&["#####", "#...#", "#...#", "#####"]);
        let mut engine = Engine::new(map, Entity::player().unwrap().at(1, 1), GameConfig::default());
        let orc = engine.game_map.insert(Entity::orc().unwrap().at(2, 1));
        (engine, orc)
    }

    #[test]
    fn test_move_into_floor() {
        let (mut engine, _) = setup();
        let player = engine.player;
        engine.perform(player, &Action::Move { dx: 0, dy: 1 }).unwrap();
        assert_eq!(engine.player_entity().unwrap().position, Position::new(1, 2));
    }

    #[test]
    fn test_move_blocked_by_wall_or_actor() {
        let (mut engine, _) = setup();
        let player = engine.player;
        let blocked = ActionError::impossible("That way is blocked.");

        assert_eq!(engine.perform(player, &Action::Move { dx: 0, dy: -1 }), Err(blocked.clone()));
        assert_eq!(engine.perform(player, &Action::Move { dx: 1, dy: 0 }), Err(blocked));
        assert_eq!(engine.player_entity().unwrap().position, Position::new(1, 1));
    }

    #[test]
    fn test_player_melee_logs_damage() {
        let (mut engine, orc) = setup();
        let player = engine.player;
        engine.perform(player, &Action::Melee { dx: 1, dy: 0 }).unwrap();

        // Player power 2 against orc defense 0.
        let orc_hp = engine.game_map.get(orc).unwrap().require_fighter().unwrap().hp();
        assert_eq!(orc_hp, 8);
        let message = engine.message_log.last().unwrap();
        assert_eq!(message.text, "Player attacks Orc for 2 hit points.");
        assert_eq!(message.color, colors::PLAYER_ATK);
    }

    #[test]
    fn test_melee_without_damage() {
        let (mut engine, orc) = setup();
        engine.game_map.get_mut(orc).unwrap().require_fighter_mut().unwrap().base_defense = 5;
        let player = engine.player;
        engine.perform(player, &Action::Melee { dx: 1, dy: 0 }).unwrap();
        assert_eq!(
            engine.message_log.last().unwrap().text,
            "Player attacks Orc but does no damage."
        );
    }

    #[test]
    fn test_melee_without_target() {
        let (mut engine, _) = setup();
        let player = engine.player;
        assert_eq!(
            engine.perform(player, &Action::Melee { dx: 0, dy: 1 }),
            Err(ActionError::impossible("Nothing to attack."))
        );
    }

    #[test]
    fn test_bump_attacks_or_moves() {
        let (mut engine, orc) = setup();
        let player = engine.player;

        engine.perform(player, &Action::Bump { dx: 1, dy: 0 }).unwrap();
        assert_eq!(engine.player_entity().unwrap().position, Position::new(1, 1));
        assert!(engine.game_map.get(orc).unwrap().require_fighter().unwrap().hp() < 10);

        engine.perform(player, &Action::Bump { dx: 0, dy: 1 }).unwrap();
        assert_eq!(engine.player_entity().unwrap().position, Position::new(1, 2));
    }

    #[test]
    fn test_corpse_does_not_block() {
        let (mut engine, orc) = setup();
        engine.take_damage(orc, 100).unwrap();
        let player = engine.player;
        engine.perform(player, &Action::Bump { dx: 1, dy: 0 }).unwrap();
        assert_eq!(engine.player_entity().unwrap().position, Position::new(2, 1));
    }

    #[test]
    fn test_dead_cannot_act() {
        let (mut engine, orc) = setup();
        engine.take_damage(orc, 100).unwrap();
        assert_eq!(
            engine.perform(orc, &Action::Wait),
            Err(ActionError::impossible("The dead cannot act."))
        );
    }

    #[test]
    fn test_toggle_ai() {
        let (mut engine, _) = setup();
        let player = engine.player;
        engine.perform(player, &Action::ToggleAi).unwrap();
        assert!(!engine.ai_enabled);
        assert_eq!(engine.message_log.last().unwrap().text, "AI disabled.");

        engine.perform(player, &Action::ToggleAi).unwrap();
        assert!(engine.ai_enabled);
        assert_eq!(engine.message_log.last().unwrap().text, "AI enabled.");
    }

    #[test]
    fn test_dead_player_can_still_toggle_ai() {
        let (mut engine, _) = setup();
        let player = engine.player;
        engine.take_damage(player, 100).unwrap();

        assert_eq!(
            engine.perform(player, &Action::Wait),
            Err(ActionError::impossible("The dead cannot act."))
        );
        engine.perform(player, &Action::ToggleAi).unwrap();
        assert!(!engine.ai_enabled);
    }
}
