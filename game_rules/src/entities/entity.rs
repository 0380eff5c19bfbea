//! Entity definitions: actors, items, and the prefabs used to spawn them.

use serde::{Deserialize, Serialize};

use super::{
    Ai, Component, Consumable, EntityId, EntityKind, Equipment, Equippable, Fighter, Inventory,
    Level, Position,
};
use crate::error::ComponentError;
use crate::mechanics::{colors, Color, EquipmentPreset, EquipmentType, RenderOrder};

/// A placeable object with optional components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    pub glyph: char,
    pub color: Color,
    pub position: Position,
    pub blocks_movement: bool,
    pub render_order: RenderOrder,
    /// Holder when the entity sits in an inventory instead of on the floor.
    pub carried_by: Option<EntityId>,

    pub fighter: Option<Fighter>,
    pub ai: Option<Ai>,
    pub equipment: Option<Equipment>,
    pub inventory: Option<Inventory>,
    pub level: Option<Level>,
    pub equippable: Option<Equippable>,
    pub consumable: Option<Consumable>,
}

fn attached<C: Component>(mut component: C, parent: EntityId) -> C {
    *component.parent_slot() = Some(parent);
    component
}

impl Entity {
    fn bare(kind: EntityKind, name: impl Into<String>, glyph: char, color: Color) -> Self {
        let (blocks_movement, render_order) = match kind {
            EntityKind::Actor => (true, RenderOrder::Actor),
            EntityKind::Item => (false, RenderOrder::Item),
        };
        Self {
            id: EntityId::new(),
            kind,
            name: name.into(),
            glyph,
            color,
            position: Position::default(),
            blocks_movement,
            render_order,
            carried_by: None,
            fighter: None,
            ai: None,
            equipment: None,
            inventory: None,
            level: None,
            equippable: None,
            consumable: None,
        }
    }

    /// Create an actor with a fighter component and a zero-yield level record.
    pub fn actor(
        name: impl Into<String>,
        glyph: char,
        color: Color,
        max_hp: u32,
        base_defense: u32,
        base_power: u32,
    ) -> Result<Self, ComponentError> {
        let mut entity = Self::bare(EntityKind::Actor, name, glyph, color);
        let fighter = Fighter::new(max_hp, base_defense, base_power)?;
        entity.fighter = Some(attached(fighter, entity.id));
        entity.level = Some(attached(Level::new(0, 0), entity.id));
        Ok(entity)
    }

    /// Create an item with no components.
    pub fn item(name: impl Into<String>, glyph: char, color: Color) -> Self {
        Self::bare(EntityKind::Item, name, glyph, color)
    }

    /// Create an equippable item from a named preset.
    pub fn equipment_item(preset: EquipmentPreset) -> Self {
        let spec = preset.spec();
        Self::item(spec.name, spec.glyph, spec.color).with_equippable(
            spec.equipment_type,
            spec.power_bonus,
            spec.defense_bonus,
        )
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_ai(mut self, ai: Ai) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn with_inventory(mut self, capacity: usize) -> Self {
        self.inventory = Some(attached(Inventory::new(capacity), self.id));
        self
    }

    pub fn with_equipment(mut self) -> Self {
        self.equipment = Some(attached(Equipment::new(), self.id));
        self
    }

    pub fn with_level(mut self, level_up_base: u32, xp_given: u32) -> Self {
        self.level = Some(attached(Level::new(level_up_base, xp_given), self.id));
        self
    }

    pub fn with_equippable(
        mut self,
        equipment_type: EquipmentType,
        power_bonus: u32,
        defense_bonus: u32,
    ) -> Self {
        let equippable = Equippable::new(equipment_type, power_bonus, defense_bonus);
        self.equippable = Some(attached(equippable, self.id));
        self
    }

    pub fn with_consumable(mut self, consumable: Consumable) -> Self {
        self.consumable = Some(consumable);
        self
    }

    pub fn player() -> Result<Self, ComponentError> {
        Ok(Self::actor("Player", '@', colors::WHITE, 30, 1, 2)?
            .with_inventory(26)
            .with_equipment()
            .with_level(200, 0))
    }

    pub fn orc() -> Result<Self, ComponentError> {
        Ok(Self::actor("Orc", 'o', Color(63, 127, 63), 10, 0, 3)?
            .with_ai(Ai::Hostile)
            .with_equipment()
            .with_level(0, 35))
    }

    pub fn troll() -> Result<Self, ComponentError> {
        Ok(Self::actor("Troll", 'T', Color(0, 127, 0), 16, 1, 4)?
            .with_ai(Ai::Hostile)
            .with_equipment()
            .with_level(0, 100))
    }

    pub fn health_potion() -> Self {
        Self::item("Health Potion", '!', Color(127, 0, 255))
            .with_consumable(Consumable::Healing { amount: 4 })
    }

    pub fn is_actor(&self) -> bool {
        self.kind == EntityKind::Actor
    }

    /// An actor whose fighter has not gone through the death transition.
    pub fn is_alive(&self) -> bool {
        self.is_actor() && self.fighter.as_ref().is_some_and(|f| !f.is_dead())
    }

    pub fn is_on_floor(&self) -> bool {
        self.carried_by.is_none()
    }

    pub fn require_fighter(&self) -> Result<&Fighter, ComponentError> {
        self.fighter.as_ref().ok_or(self.missing("fighter"))
    }

    pub fn require_fighter_mut(&mut self) -> Result<&mut Fighter, ComponentError> {
        let err = self.missing("fighter");
        self.fighter.as_mut().ok_or(err)
    }

    pub fn require_inventory(&self) -> Result<&Inventory, ComponentError> {
        self.inventory.as_ref().ok_or(self.missing("inventory"))
    }

    pub fn require_inventory_mut(&mut self) -> Result<&mut Inventory, ComponentError> {
        let err = self.missing("inventory");
        self.inventory.as_mut().ok_or(err)
    }

    pub fn require_equipment_mut(&mut self) -> Result<&mut Equipment, ComponentError> {
        let err = self.missing("equipment");
        self.equipment.as_mut().ok_or(err)
    }

    pub fn require_level_mut(&mut self) -> Result<&mut Level, ComponentError> {
        let err = self.missing("level");
        self.level.as_mut().ok_or(err)
    }

    fn missing(&self, component: &'static str) -> ComponentError {
        ComponentError::MissingComponent {
            entity: self.id,
            component,
        }
    }

    /// Turn this actor into a corpse. Returns the name it had while alive.
    pub fn become_corpse(&mut self) -> String {
        let original = std::mem::take(&mut self.name);
        self.glyph = '%';
        self.color = colors::CORPSE;
        self.blocks_movement = false;
        self.ai = None;
        self.name = format!("remains of {original}");
        self.render_order = RenderOrder::Corpse;
        original
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_components_are_attached() {
        let orc = Entity::orc().unwrap();
        assert!(orc.is_actor());
        assert!(orc.is_alive());
        assert!(orc.blocks_movement);
        assert_eq!(orc.fighter.as_ref().unwrap().parent(), Some(orc.id));
        assert_eq!(orc.equipment.as_ref().unwrap().parent(), Some(orc.id));
        assert_eq!(orc.level.as_ref().unwrap().xp_given, 35);
        assert_eq!(orc.ai, Some(Ai::Hostile));
    }

    #[test]
    fn test_actor_rejects_zero_hp() {
        let result = Entity::actor("Ghost", 'g', colors::WHITE, 0, 0, 0);
        assert_eq!(result.unwrap_err(), ComponentError::InvalidMaxHp);
    }

    #[test]
    fn test_equipment_item_from_preset() {
        let sword = Entity::equipment_item(EquipmentPreset::Sword);
        assert_eq!(sword.name, "Sword");
        assert_eq!(sword.render_order, RenderOrder::Item);
        assert!(!sword.blocks_movement);
        let equippable = sword.equippable.as_ref().unwrap();
        assert_eq!(equippable.power_bonus, 4);
        assert_eq!(equippable.parent(), Some(sword.id));
    }

    #[test]
    fn test_become_corpse() {
        let mut troll = Entity::troll().unwrap();
        let name = troll.become_corpse();

        assert_eq!(name, "Troll");
        assert_eq!(troll.name, "remains of Troll");
        assert_eq!(troll.glyph, '%');
        assert_eq!(troll.color, colors::CORPSE);
        assert_eq!(troll.render_order, RenderOrder::Corpse);
        assert!(troll.ai.is_none());
        assert!(!troll.blocks_movement);
    }

    #[test]
    fn test_missing_component_is_reported() {
        let mut potion = Entity::health_potion();
        let err = potion.require_fighter_mut().unwrap_err();
        assert_eq!(
            err,
            ComponentError::MissingComponent {
                entity: potion.id,
                component: "fighter"
            }
        );
    }

    #[test]
    fn test_back_references_survive_serialization() {
        let player = Entity::player().unwrap();
        let json = serde_json::to_string(&player).unwrap();
        let restored: Entity = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.id, player.id);
        assert_eq!(restored.fighter.as_ref().unwrap().parent(), Some(player.id));
        assert_eq!(restored.inventory.as_ref().unwrap().parent(), Some(player.id));
        assert_eq!(restored.inventory.as_ref().unwrap().capacity, 26);
    }
}
