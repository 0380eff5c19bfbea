//! World state: the tile map with its entity arena, and floor progression.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entities::{Entity, EntityId, Fighter, Position};
use crate::error::ComponentError;
use crate::mechanics::{colors, Color, StatBonus};

/// How a tile looks in one lighting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graphic {
    pub glyph: char,
    pub fg: Color,
    pub bg: Color,
}

/// Drawn for tiles that have never been seen.
pub const SHROUD: Graphic = Graphic {
    glyph: ' ',
    fg: colors::WHITE,
    bg: colors::BLACK,
};

/// A single map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub walkable: bool,
    pub transparent: bool,
    /// Appearance when explored but not in view.
    pub dark: Graphic,
    /// Appearance when in view.
    pub light: Graphic,
}

impl Tile {
    pub fn floor() -> Self {
        Self {
            walkable: true,
            transparent: true,
            dark: Graphic {
                glyph: ' ',
                fg: colors::WHITE,
                bg: Color(50, 50, 150),
            },
            light: Graphic {
                glyph: ' ',
                fg: colors::WHITE,
                bg: Color(200, 180, 50),
            },
        }
    }

    pub fn wall() -> Self {
        Self {
            walkable: false,
            transparent: false,
            dark: Graphic {
                glyph: ' ',
                fg: colors::WHITE,
                bg: Color(0, 0, 100),
            },
            light: Graphic {
                glyph: ' ',
                fg: colors::WHITE,
                bg: Color(130, 110, 50),
            },
        }
    }
}

/// One dungeon floor: terrain, visibility state, and every entity on it.
///
/// Items carried in an inventory stay in the entity arena, marked with
/// `carried_by`, so that ids held by containers always resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMap {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
    visible: Vec<bool>,
    explored: Vec<bool>,
    entities: HashMap<EntityId, Entity>,
}

impl GameMap {
    /// Create a map filled with walls.
    pub fn new(width: i32, height: i32) -> Self {
        let cells = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::wall(); cells],
            visible: vec![false; cells],
            explored: vec![false; cells],
            entities: HashMap::new(),
        }
    }

    /// Build a map from ASCII rows: `#` is wall, anything else is floor.
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0) as i32;
        let mut map = Self::new(width, rows.len() as i32);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch != '#' {
                    map.set_tile(x as i32, y as i32, Tile::floor());
                }
            }
        }
        map
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| (y * self.width + x) as usize)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        0 <= x && x < self.width && 0 <= y && y < self.height
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y).map(|i| &self.tiles[i])
    }

    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        if let Some(i) = self.index(x, y) {
            self.tiles[i] = tile;
        }
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_some_and(|t| t.walkable)
    }

    pub fn is_transparent(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_some_and(|t| t.transparent)
    }

    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.visible[i])
    }

    pub fn is_explored(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.explored[i])
    }

    /// Row-major visibility grid.
    pub fn visible(&self) -> &[bool] {
        &self.visible
    }

    /// Row-major history of every tile ever seen.
    pub fn explored(&self) -> &[bool] {
        &self.explored
    }

    /// Replace the visible set and fold it into the explored history.
    ///
    /// `explored` only ever gains tiles. A grid of the wrong size is ignored.
    pub fn update_visibility(&mut self, visible: Vec<bool>) {
        if visible.len() != self.visible.len() {
            return;
        }
        for (explored, seen) in self.explored.iter_mut().zip(&visible) {
            *explored |= *seen;
        }
        self.visible = visible;
    }

    /// Check every fighter on the map, e.g. after loading a save.
    pub fn validate(&self) -> Result<(), ComponentError> {
        self.entities
            .values()
            .filter_map(|e| e.fighter.as_ref())
            .try_for_each(Fighter::validate)
    }

    /// Add an entity to the arena, returning its id.
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.entities.insert(id, entity);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Like [`GameMap::get`], but a missing entity is an error.
    pub fn entity(&self, id: EntityId) -> Result<&Entity, ComponentError> {
        self.get(id).ok_or(ComponentError::EntityNotFound(id))
    }

    /// Like [`GameMap::get_mut`], but a missing entity is an error.
    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, ComponentError> {
        self.get_mut(id).ok_or(ComponentError::EntityNotFound(id))
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Living actors on this map.
    pub fn actors(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(|e| e.is_alive())
    }

    pub fn actor_ids(&self) -> Vec<EntityId> {
        self.actors().map(|e| e.id).collect()
    }

    /// Entities lying on the floor at `pos`.
    pub fn entities_at(&self, pos: Position) -> impl Iterator<Item = &Entity> {
        self.entities
            .values()
            .filter(move |e| e.is_on_floor() && e.position == pos)
    }

    pub fn items_at(&self, pos: Position) -> impl Iterator<Item = &Entity> {
        self.entities_at(pos).filter(|e| !e.is_actor())
    }

    pub fn blocking_entity_at(&self, pos: Position) -> Option<&Entity> {
        self.entities_at(pos).find(|e| e.blocks_movement)
    }

    pub fn actor_at(&self, pos: Position) -> Option<&Entity> {
        self.entities_at(pos).find(|e| e.is_alive())
    }

    /// Put an entity on the floor at `pos`.
    pub fn place(&mut self, id: EntityId, pos: Position) -> Result<(), ComponentError> {
        let entity = self.entity_mut(id)?;
        entity.carried_by = None;
        entity.position = pos;
        Ok(())
    }

    /// Take an entity off the floor into `holder`'s possession.
    pub fn carry(&mut self, id: EntityId, holder: EntityId) -> Result<(), ComponentError> {
        self.entity_mut(id)?.carried_by = Some(holder);
        Ok(())
    }

    /// Sum of bonuses from the items `actor` currently has equipped.
    pub fn equipment_bonus(&self, actor: EntityId) -> Result<StatBonus, ComponentError> {
        let Some(equipment) = self.entity(actor)?.equipment.as_ref() else {
            return Ok(StatBonus::default());
        };
        equipment.equipped().try_fold(StatBonus::default(), |bonus, item| {
            Ok(match self.entity(item)?.equippable.as_ref() {
                Some(equippable) => bonus.add(equippable),
                None => bonus,
            })
        })
    }

    /// Effective power: base power plus equipped bonuses, computed on read.
    pub fn power(&self, actor: EntityId) -> Result<u32, ComponentError> {
        let bonus = self.equipment_bonus(actor)?;
        Ok(self.entity(actor)?.require_fighter()?.power(bonus))
    }

    /// Effective defense: base defense plus equipped bonuses, computed on read.
    pub fn defense(&self, actor: EntityId) -> Result<u32, ComponentError> {
        let bonus = self.equipment_bonus(actor)?;
        Ok(self.entity(actor)?.require_fighter()?.defense(bonus))
    }
}

/// Floor progression through the dungeon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameWorld {
    pub current_floor: u32,
}

impl Default for GameWorld {
    fn default() -> Self {
        Self { current_floor: 1 }
    }
}

impl GameWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move one floor deeper, returning the new floor number.
    pub fn advance_floor(&mut self) -> u32 {
        self.current_floor += 1;
        self.current_floor
    }
}
