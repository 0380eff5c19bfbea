//! Inventory and equipment operations.

use game_rules::{colors, Component, ComponentError, Consumable, EntityId};

use super::Engine;
use crate::error::ActionError;

impl Engine {
    /// Pick up the first item under `actor`.
    ///
    /// This is where inventory capacity is enforced.
    pub fn pick_up(&mut self, actor: EntityId) -> Result<(), ActionError> {
        let holder = self.game_map.entity(actor)?;
        let item = self
            .game_map
            .items_at(holder.position)
            .map(|e| e.id)
            .next()
            .ok_or_else(|| ActionError::impossible("There is nothing here to pick up."))?;

        if holder.require_inventory()?.is_full() {
            return Err(ActionError::impossible("Your inventory is full."));
        }

        self.game_map.carry(item, actor)?;
        self.game_map
            .entity_mut(actor)?
            .require_inventory_mut()?
            .insert(item);

        let name = &self.game_map.entity(item)?.name;
        self.message_log
            .add_message(format!("You picked up the {name}!"), colors::WHITE);
        Ok(())
    }

    /// Drop a held item at the holder's feet, unequipping it first.
    ///
    /// Dropping an item that is not in the inventory is a structural error.
    pub fn drop_item(&mut self, actor: EntityId, item: EntityId) -> Result<(), ActionError> {
        let inventory = self.game_map.entity(actor)?.require_inventory()?;
        if !inventory.contains(item) {
            return Err(ComponentError::ItemNotHeld(item).into());
        }
        let position = inventory.owner(&self.game_map)?.position;

        let equipped = self
            .game_map
            .entity(actor)?
            .equipment
            .as_ref()
            .is_some_and(|eq| eq.is_equipped(item));
        if equipped {
            self.toggle_equip(actor, item)?;
        }

        self.game_map
            .entity_mut(actor)?
            .require_inventory_mut()?
            .remove(item)?;
        self.game_map.place(item, position)?;

        let name = &self.game_map.entity(item)?.name;
        self.message_log
            .add_message(format!("You dropped the {name}."), colors::WHITE);
        Ok(())
    }

    /// Equip a held item, or take it off if it is already equipped.
    pub fn toggle_equip(&mut self, actor: EntityId, item: EntityId) -> Result<(), ActionError> {
        self.require_held(actor, item)?;
        let item_entity = self.game_map.entity(item)?;
        let item_name = item_entity.name.clone();
        let equipment_type = item_entity
            .equippable
            .as_ref()
            .map(|e| e.equipment_type)
            .ok_or_else(|| ActionError::impossible(format!("The {item_name} cannot be equipped.")))?;

        let equipment = self.game_map.entity_mut(actor)?.require_equipment_mut()?;
        if equipment.unequip(item) {
            self.message_log
                .add_message(format!("You remove the {item_name}."), colors::WHITE);
            return Ok(());
        }

        if let Some(previous) = equipment.equip(equipment_type, item) {
            let previous_name = &self.game_map.entity(previous)?.name;
            self.message_log
                .add_message(format!("You remove the {previous_name}."), colors::WHITE);
        }
        self.message_log
            .add_message(format!("You equip the {item_name}."), colors::WHITE);
        Ok(())
    }

    /// Use a held consumable. It is destroyed on success.
    pub fn use_item(&mut self, actor: EntityId, item: EntityId) -> Result<(), ActionError> {
        self.require_held(actor, item)?;
        let item_entity = self.game_map.entity(item)?;
        let item_name = item_entity.name.clone();
        let Some(consumable) = item_entity.consumable else {
            return Err(ActionError::impossible(format!("The {item_name} cannot be used.")));
        };

        match consumable {
            Consumable::Healing { amount } => {
                let recovered = self.heal(actor, amount)?;
                if recovered == 0 {
                    return Err(ActionError::impossible("Your health is already full."));
                }
                self.message_log.add_message(
                    format!("You consume the {item_name}, and recover {recovered} HP!"),
                    colors::HEALTH_RECOVERED,
                );
            }
        }

        self.game_map
            .entity_mut(actor)?
            .require_inventory_mut()?
            .remove(item)?;
        self.game_map.remove(item);
        Ok(())
    }

    fn require_held(&self, actor: EntityId, item: EntityId) -> Result<(), ComponentError> {
        if self.game_map.entity(actor)?.require_inventory()?.contains(item) {
            Ok(())
        } else {
            Err(ComponentError::ItemNotHeld(item))
        }
    }
}
