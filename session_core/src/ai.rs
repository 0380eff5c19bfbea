//! AI policies for non-player actors.

use game_rules::{Ai, EntityId};

use crate::actions::Action;
use crate::engine::Engine;
use crate::error::ActionError;

impl Engine {
    /// Let `ai` choose an action for `actor` and perform it.
    pub(crate) fn perform_ai(&mut self, actor: EntityId, ai: Ai) -> Result<(), ActionError> {
        let action = match ai {
            Ai::Hostile => self.hostile_action(actor)?,
        };
        tracing::trace!(entity = %actor, ?action, "ai chose action");
        self.perform(actor, &action)
    }

    /// Visible hostiles close in on the player and attack when adjacent.
    /// Everything else waits. Steps are straight lines with no pathfinding.
    fn hostile_action(&self, actor: EntityId) -> Result<Action, ActionError> {
        let position = self.game_map.entity(actor)?.position;
        if !self.game_map.is_visible(position.x, position.y) {
            return Ok(Action::Wait);
        }

        let target = self.player_entity()?.position;
        let (dx, dy) = (target.x - position.x, target.y - position.y);
        if position.distance(target) <= 1 {
            Ok(Action::Melee { dx, dy })
        } else {
            Ok(Action::Move {
                dx: dx.signum(),
                dy: dy.signum(),
            })
        }
    }
}
