//! Errors raised when components or entities are misused.

use thiserror::Error;

use crate::entities::EntityId;

/// Structural misuse of the entity/component graph.
///
/// These indicate a caller bug rather than ordinary game-state friction, so
/// the turn sweep never swallows them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentError {
    #[error("component is not attached to an entity")]
    Detached,
    #[error("component is already attached to entity {0}")]
    AlreadyAttached(EntityId),
    #[error("entity {0} not found on the current map")]
    EntityNotFound(EntityId),
    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        entity: EntityId,
        component: &'static str,
    },
    #[error("item {0} is not held in the inventory")]
    ItemNotHeld(EntityId),
    #[error("max hp must be positive")]
    InvalidMaxHp,
    #[error("hp {hp} exceeds max hp {max_hp}")]
    HpOutOfRange { hp: u32, max_hp: u32 },
}
