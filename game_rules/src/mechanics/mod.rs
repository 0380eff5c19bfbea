//! Game mechanics: equipment types, render ordering, colors, and item presets.

use serde::{Deserialize, Serialize};

use crate::entities::Equippable;

/// An RGB color used for glyphs and log messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

/// The fixed palette shared by the simulation and the renderer.
pub mod colors {
    use super::Color;

    pub const WHITE: Color = Color(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color(0x00, 0x00, 0x00);

    pub const PLAYER_ATK: Color = Color(0xE0, 0xE0, 0xE0);
    pub const ENEMY_ATK: Color = Color(0xFF, 0xC0, 0xC0);
    pub const PLAYER_DIE: Color = Color(0xFF, 0x30, 0x30);
    pub const ENEMY_DIE: Color = Color(0xFF, 0xA0, 0x30);
    pub const CORPSE: Color = Color(191, 0, 0);

    pub const IMPOSSIBLE: Color = Color(0x80, 0x80, 0x80);
    pub const ERROR: Color = Color(0xFF, 0x40, 0x40);

    pub const WELCOME_TEXT: Color = Color(0x20, 0xA0, 0xFF);
    pub const HEALTH_RECOVERED: Color = Color(0x00, 0xFF, 0x00);
    pub const DESCEND: Color = Color(0x9F, 0x3F, 0xFF);

    pub const BAR_TEXT: Color = WHITE;
    pub const BAR_FILLED: Color = Color(0x00, 0x60, 0x00);
    pub const BAR_EMPTY: Color = Color(0x40, 0x10, 0x10);
}

/// Which equipment slot an item occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentType {
    Weapon,
    Armor,
}

/// Draw order for entities sharing a tile. Lower values draw first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RenderOrder {
    Corpse,
    Item,
    Actor,
}

/// Summed stat bonuses from equipped items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatBonus {
    pub power: u32,
    pub defense: u32,
}

impl StatBonus {
    pub fn add(self, equippable: &Equippable) -> Self {
        Self {
            power: self.power + equippable.power_bonus,
            defense: self.defense + equippable.defense_bonus,
        }
    }
}

/// Named equipment configurations. These differ only in data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentPreset {
    Dagger,
    Sword,
    LeatherArmor,
    ChainMail,
}

/// Static description of a preset: display data plus its stat bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetSpec {
    pub name: &'static str,
    pub glyph: char,
    pub color: Color,
    pub equipment_type: EquipmentType,
    pub power_bonus: u32,
    pub defense_bonus: u32,
}

const PRESETS: [(EquipmentPreset, PresetSpec); 4] = [
    (
        EquipmentPreset::Dagger,
        PresetSpec {
            name: "Dagger",
            glyph: '/',
            color: Color(0, 191, 255),
            equipment_type: EquipmentType::Weapon,
            power_bonus: 2,
            defense_bonus: 0,
        },
    ),
    (
        EquipmentPreset::Sword,
        PresetSpec {
            name: "Sword",
            glyph: '/',
            color: Color(0, 191, 255),
            equipment_type: EquipmentType::Weapon,
            power_bonus: 4,
            defense_bonus: 0,
        },
    ),
    (
        EquipmentPreset::LeatherArmor,
        PresetSpec {
            name: "Leather Armor",
            glyph: '[',
            color: Color(139, 69, 19),
            equipment_type: EquipmentType::Armor,
            power_bonus: 0,
            defense_bonus: 1,
        },
    ),
    (
        EquipmentPreset::ChainMail,
        PresetSpec {
            name: "Chain Mail",
            glyph: '[',
            color: Color(139, 69, 19),
            equipment_type: EquipmentType::Armor,
            power_bonus: 0,
            defense_bonus: 3,
        },
    ),
];

impl EquipmentPreset {
    /// All presets in table order.
    pub fn all() -> impl Iterator<Item = EquipmentPreset> {
        PRESETS.iter().map(|(preset, _)| *preset)
    }

    /// Look up the static description of this preset.
    pub fn spec(self) -> &'static PresetSpec {
        // The table covers every variant.
        &PRESETS[self as usize].1
    }

    /// A fresh, detached equippable carrying this preset's bonuses.
    pub fn equippable(self) -> Equippable {
        let spec = self.spec();
        Equippable::new(spec.equipment_type, spec.power_bonus, spec.defense_bonus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_table_matches_variants() {
        for preset in EquipmentPreset::all() {
            let index = PRESETS.iter().position(|(p, _)| *p == preset).unwrap();
            assert_eq!(index, preset as usize);
        }
    }

    #[test]
    fn test_preset_bonuses() {
        let dagger = EquipmentPreset::Dagger.equippable();
        assert_eq!(dagger.equipment_type, EquipmentType::Weapon);
        assert_eq!((dagger.power_bonus, dagger.defense_bonus), (2, 0));

        let sword = EquipmentPreset::Sword.equippable();
        assert_eq!((sword.power_bonus, sword.defense_bonus), (4, 0));

        let leather = EquipmentPreset::LeatherArmor.equippable();
        assert_eq!(leather.equipment_type, EquipmentType::Armor);
        assert_eq!((leather.power_bonus, leather.defense_bonus), (0, 1));

        let chain = EquipmentPreset::ChainMail.equippable();
        assert_eq!((chain.power_bonus, chain.defense_bonus), (0, 3));
    }

    #[test]
    fn test_render_order_sorts_corpses_first() {
        let mut orders = vec![RenderOrder::Actor, RenderOrder::Corpse, RenderOrder::Item];
        orders.sort();
        assert_eq!(
            orders,
            vec![RenderOrder::Corpse, RenderOrder::Item, RenderOrder::Actor]
        );
    }

    #[test]
    fn test_stat_bonus_accumulates() {
        let bonus = StatBonus::default()
            .add(&EquipmentPreset::Sword.equippable())
            .add(&EquipmentPreset::ChainMail.equippable());
        assert_eq!(bonus, StatBonus { power: 4, defense: 3 });
    }
}
