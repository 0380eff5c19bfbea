//! Component definitions for entities.
//!
//! Every component keeps a non-owning [`EntityId`] back-reference to the
//! entity that owns it. The entity owns its components; context beyond the
//! owning entity (the map, the session) is resolved at call time.

use serde::{Deserialize, Serialize};

use super::{Entity, EntityId};
use crate::error::ComponentError;
use crate::mechanics::{EquipmentType, StatBonus};
use crate::world_state::GameMap;

/// Shared contract for components attached to an entity.
pub trait Component {
    /// The owning entity, if attached.
    fn parent(&self) -> Option<EntityId>;

    #[doc(hidden)]
    fn parent_slot(&mut self) -> &mut Option<EntityId>;

    /// Attach to `parent`. The back-reference is set once and never reassigned.
    fn attach(&mut self, parent: EntityId) -> Result<(), ComponentError> {
        match *self.parent_slot() {
            Some(existing) if existing != parent => Err(ComponentError::AlreadyAttached(existing)),
            _ => {
                *self.parent_slot() = Some(parent);
                Ok(())
            }
        }
    }

    /// Resolve the owning entity on `map`.
    ///
    /// A detached component fails instead of returning a default.
    fn owner<'m>(&self, map: &'m GameMap) -> Result<&'m Entity, ComponentError> {
        let id = self.parent().ok_or(ComponentError::Detached)?;
        map.get(id).ok_or(ComponentError::EntityNotFound(id))
    }
}

macro_rules! impl_component {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Component for $ty {
                fn parent(&self) -> Option<EntityId> {
                    self.parent
                }

                fn parent_slot(&mut self) -> &mut Option<EntityId> {
                    &mut self.parent
                }
            }
        )*
    };
}

impl_component!(Fighter, Equippable, Inventory, Equipment, Level);

/// Combat statistics and health of an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    parent: Option<EntityId>,
    max_hp: u32,
    hp: u32,
    pub base_defense: u32,
    pub base_power: u32,
    dead: bool,
}

impl Fighter {
    /// Create a fighter at full health.
    pub fn new(max_hp: u32, base_defense: u32, base_power: u32) -> Result<Self, ComponentError> {
        if max_hp == 0 {
            return Err(ComponentError::InvalidMaxHp);
        }
        Ok(Self {
            parent: None,
            max_hp,
            hp: max_hp,
            base_defense,
            base_power,
            dead: false,
        })
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// Check the hp invariants on a fighter that did not come from
    /// [`Fighter::new`], such as one restored from a save.
    pub fn validate(&self) -> Result<(), ComponentError> {
        if self.max_hp == 0 {
            return Err(ComponentError::InvalidMaxHp);
        }
        if self.hp > self.max_hp {
            return Err(ComponentError::HpOutOfRange {
                hp: self.hp,
                max_hp: self.max_hp,
            });
        }
        Ok(())
    }

    /// Whether the death transition has already fired.
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Clamp `value` into `0..=max_hp` and store it.
    ///
    /// Returns `true` when the fighter is at 0 and the death transition has
    /// not run yet. The caller owns the death side effects and records them
    /// with [`Fighter::mark_dead`].
    #[must_use]
    pub fn set_hp(&mut self, value: i64) -> bool {
        self.hp = value.clamp(0, i64::from(self.max_hp)) as u32;
        self.hp == 0 && !self.dead
    }

    /// Record that the death transition has been applied.
    pub fn mark_dead(&mut self) {
        self.dead = true;
    }

    /// Recover up to `amount` hit points, returning how many were restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.hp == self.max_hp {
            return 0;
        }
        let new_hp = self.hp.saturating_add(amount).min(self.max_hp);
        let recovered = new_hp - self.hp;
        self.hp = new_hp;
        recovered
    }

    /// Lose `amount` hit points. Returns `true` when this blow is fatal.
    #[must_use]
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.set_hp(i64::from(self.hp) - i64::from(amount))
    }

    pub fn power(&self, bonus: StatBonus) -> u32 {
        self.base_power + bonus.power
    }

    pub fn defense(&self, bonus: StatBonus) -> u32 {
        self.base_defense + bonus.defense
    }
}

/// Stat bonuses granted by an item while it is equipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equippable {
    parent: Option<EntityId>,
    pub equipment_type: EquipmentType,
    pub power_bonus: u32,
    pub defense_bonus: u32,
}

impl Equippable {
    pub fn new(equipment_type: EquipmentType, power_bonus: u32, defense_bonus: u32) -> Self {
        Self {
            parent: None,
            equipment_type,
            power_bonus,
            defense_bonus,
        }
    }
}

/// Ordered item container. Insertion order is pickup order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    parent: Option<EntityId>,
    /// Advisory limit; checked by the pickup path, not by this type.
    pub capacity: usize,
    items: Vec<EntityId>,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            parent: None,
            capacity,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[EntityId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn contains(&self, item: EntityId) -> bool {
        self.items.contains(&item)
    }

    /// Append an item. Capacity is not checked here.
    pub fn insert(&mut self, item: EntityId) {
        self.items.push(item);
    }

    /// Remove a held item, failing if it is not present.
    pub fn remove(&mut self, item: EntityId) -> Result<(), ComponentError> {
        let index = self
            .items
            .iter()
            .position(|held| *held == item)
            .ok_or(ComponentError::ItemNotHeld(item))?;
        self.items.remove(index);
        Ok(())
    }
}

/// Equipped item slots of an actor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Equipment {
    parent: Option<EntityId>,
    pub weapon: Option<EntityId>,
    pub armor: Option<EntityId>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, equipment_type: EquipmentType) -> Option<EntityId> {
        match equipment_type {
            EquipmentType::Weapon => self.weapon,
            EquipmentType::Armor => self.armor,
        }
    }

    pub fn is_equipped(&self, item: EntityId) -> bool {
        self.weapon == Some(item) || self.armor == Some(item)
    }

    /// Put `item` into the slot for `equipment_type`, returning what was there.
    pub fn equip(&mut self, equipment_type: EquipmentType, item: EntityId) -> Option<EntityId> {
        let slot = match equipment_type {
            EquipmentType::Weapon => &mut self.weapon,
            EquipmentType::Armor => &mut self.armor,
        };
        slot.replace(item)
    }

    /// Clear whichever slot holds `item`. Returns whether anything changed.
    pub fn unequip(&mut self, item: EntityId) -> bool {
        for slot in [&mut self.weapon, &mut self.armor] {
            if *slot == Some(item) {
                *slot = None;
                return true;
            }
        }
        false
    }

    pub fn equipped(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.weapon.iter().chain(self.armor.iter()).copied()
    }
}

/// Experience and level progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    parent: Option<EntityId>,
    pub current_level: u32,
    pub current_xp: u32,
    pub level_up_base: u32,
    pub level_up_factor: u32,
    /// Experience awarded to the player when this actor dies.
    pub xp_given: u32,
}

impl Level {
    pub const DEFAULT_LEVEL_UP_FACTOR: u32 = 150;

    pub fn new(level_up_base: u32, xp_given: u32) -> Self {
        Self {
            parent: None,
            current_level: 1,
            current_xp: 0,
            level_up_base,
            level_up_factor: Self::DEFAULT_LEVEL_UP_FACTOR,
            xp_given,
        }
    }

    pub fn experience_to_next_level(&self) -> u32 {
        self.level_up_base
            .saturating_add(self.current_level.saturating_mul(self.level_up_factor))
    }

    pub fn requires_level_up(&self) -> bool {
        self.current_xp > self.experience_to_next_level()
    }

    /// Credit experience. Returns `false` when nothing was gained.
    pub fn add_xp(&mut self, xp: u32) -> bool {
        if xp == 0 || self.level_up_base == 0 {
            return false;
        }
        self.current_xp = self.current_xp.saturating_add(xp);
        true
    }

    pub fn increase_level(&mut self) {
        self.current_xp = self.current_xp.saturating_sub(self.experience_to_next_level());
        self.current_level += 1;
    }
}

/// AI policy of a non-player actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ai {
    /// Closes in on the player while it can see them and attacks when adjacent.
    Hostile,
}

/// Effect of using a consumable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Consumable {
    Healing { amount: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanics::EquipmentPreset;

    fn fighter(max_hp: u32) -> Fighter {
        Fighter::new(max_hp, 0, 5).unwrap()
    }

    #[test]
    fn test_fighter_rejects_zero_max_hp() {
        assert_eq!(Fighter::new(0, 1, 1), Err(ComponentError::InvalidMaxHp));
    }

    #[test]
    fn test_damage_then_heal() {
        let mut f = fighter(10);
        assert!(!f.take_damage(4));
        assert_eq!(f.hp(), 6);

        assert_eq!(f.heal(2), 2);
        assert_eq!(f.hp(), 8);

        assert_eq!(f.heal(10), 2);
        assert_eq!(f.hp(), 10);
        assert_eq!(f.heal(3), 0);
    }

    #[test]
    fn test_damage_clamps_and_fires_once() {
        let mut f = fighter(10);
        assert!(!f.take_damage(7));
        assert!(f.take_damage(5));
        assert_eq!(f.hp(), 0);
        f.mark_dead();
        assert!(f.is_dead());

        assert!(!f.take_damage(5));
        assert!(!f.set_hp(-3));
        assert_eq!(f.hp(), 0);
    }

    #[test]
    fn test_lethal_hit_is_reported_until_marked() {
        let mut f = fighter(10);
        assert!(f.take_damage(100));
        assert!(!f.is_dead());
        assert!(f.take_damage(1));

        f.mark_dead();
        assert!(!f.take_damage(1));
    }

    #[test]
    fn test_validate_rejects_restored_bad_hp() {
        let mut value = serde_json::to_value(fighter(10)).unwrap();
        value["hp"] = 11.into();
        let restored: Fighter = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(
            restored.validate(),
            Err(ComponentError::HpOutOfRange { hp: 11, max_hp: 10 })
        );

        value["max_hp"] = 0.into();
        value["hp"] = 0.into();
        let restored: Fighter = serde_json::from_value(value).unwrap();
        assert_eq!(restored.validate(), Err(ComponentError::InvalidMaxHp));

        assert_eq!(fighter(10).validate(), Ok(()));
    }

    #[test]
    fn test_set_hp_clamps_to_max() {
        let mut f = fighter(10);
        assert!(!f.set_hp(50));
        assert_eq!(f.hp(), 10);
    }

    #[test]
    fn test_effective_stats_include_bonus() {
        let f = fighter(10);
        let bonus = StatBonus::default().add(&EquipmentPreset::Sword.equippable());
        assert_eq!(f.power(bonus), 9);
        assert_eq!(f.power(StatBonus::default()), 5);
        assert_eq!(f.defense(bonus), 0);
    }

    #[test]
    fn test_attach_is_set_once() {
        let owner = EntityId::new();
        let mut inventory = Inventory::new(3);
        assert_eq!(inventory.parent(), None);

        inventory.attach(owner).unwrap();
        inventory.attach(owner).unwrap();
        assert_eq!(
            inventory.attach(EntityId::new()),
            Err(ComponentError::AlreadyAttached(owner))
        );
        assert_eq!(inventory.parent(), Some(owner));
    }

    #[test]
    fn test_detached_owner_lookup_fails() {
        let map = GameMap::new(3, 3);
        let level = Level::new(200, 0);
        assert_eq!(level.owner(&map).unwrap_err(), ComponentError::Detached);
    }

    #[test]
    fn test_inventory_remove_missing_item() {
        let mut inventory = Inventory::new(2);
        let held = EntityId::new();
        inventory.insert(held);

        let stranger = EntityId::new();
        assert_eq!(inventory.remove(stranger), Err(ComponentError::ItemNotHeld(stranger)));
        assert!(inventory.remove(held).is_ok());
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_inventory_insert_ignores_capacity() {
        let mut inventory = Inventory::new(1);
        inventory.insert(EntityId::new());
        assert!(inventory.is_full());
        inventory.insert(EntityId::new());
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn test_equipment_slots() {
        let mut equipment = Equipment::new();
        let dagger = EntityId::new();
        let sword = EntityId::new();

        assert_eq!(equipment.equip(EquipmentType::Weapon, dagger), None);
        assert_eq!(equipment.equip(EquipmentType::Weapon, sword), Some(dagger));
        assert!(equipment.is_equipped(sword));
        assert!(!equipment.is_equipped(dagger));

        assert!(equipment.unequip(sword));
        assert!(!equipment.unequip(sword));
        assert_eq!(equipment.equipped().count(), 0);
    }

    #[test]
    fn test_level_progression() {
        let mut level = Level::new(200, 0);
        assert_eq!(level.experience_to_next_level(), 350);
        assert!(!level.add_xp(0));

        assert!(level.add_xp(400));
        assert!(level.requires_level_up());
        level.increase_level();
        assert_eq!(level.current_level, 2);
        assert_eq!(level.current_xp, 50);
        assert!(!level.requires_level_up());
    }

    #[test]
    fn test_level_xp_saturates() {
        let mut level = Level::new(200, 0);
        assert!(level.add_xp(u32::MAX));
        assert!(level.add_xp(u32::MAX));
        assert_eq!(level.current_xp, u32::MAX);

        level.current_level = u32::MAX;
        assert_eq!(level.experience_to_next_level(), u32::MAX);
    }

    #[test]
    fn test_level_without_base_gains_nothing() {
        let mut level = Level::new(0, 35);
        assert!(!level.add_xp(100));
        assert_eq!(level.current_xp, 0);
    }
}
