//! Render targets and the HUD drawing helpers used by [`Engine::render`].
//!
//! [`Engine::render`]: crate::Engine::render

use game_rules::{colors, Color, GameMap, Position, SHROUD};

/// A character-cell drawing surface.
pub trait Console {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    /// Draw one cell. `bg: None` keeps the existing background.
    fn put(&mut self, x: i32, y: i32, glyph: char, fg: Color, bg: Option<Color>);

    fn print(&mut self, x: i32, y: i32, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.put(x + i as i32, y, ch, fg, None);
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, bg: Color) {
        for dy in 0..height {
            for dx in 0..width {
                self.put(x + dx, y + dy, ' ', colors::WHITE, Some(bg));
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            glyph: ' ',
            fg: colors::WHITE,
            bg: colors::BLACK,
        }
    }
}

/// In-memory console. Writes outside the grid are dropped.
#[derive(Debug, Clone)]
pub struct TextConsole {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl TextConsole {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width.max(0) * height.max(0)) as usize],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// The glyphs of row `y`, trailing blanks trimmed.
    pub fn row_text(&self, y: i32) -> String {
        let row: String = (0..self.width)
            .filter_map(|x| self.cell(x, y))
            .map(|c| c.glyph)
            .collect();
        row.trim_end().to_string()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        (0 <= x && x < self.width && 0 <= y && y < self.height).then(|| (y * self.width + x) as usize)
    }
}

impl Console for TextConsole {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn put(&mut self, x: i32, y: i32, glyph: char, fg: Color, bg: Option<Color>) {
        if let Some(i) = self.index(x, y) {
            let cell = &mut self.cells[i];
            cell.glyph = glyph;
            cell.fg = fg;
            if let Some(bg) = bg {
                cell.bg = bg;
            }
        }
    }
}

impl std::fmt::Display for TextConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height {
            writeln!(f, "{}", self.row_text(y))?;
        }
        Ok(())
    }
}

/// Terrain by visibility state, then floor entities in render order.
pub fn render_map(console: &mut dyn Console, map: &GameMap) {
    for y in 0..map.height {
        for x in 0..map.width {
            let Some(tile) = map.tile(x, y) else { continue };
            let graphic = if map.is_visible(x, y) {
                tile.light
            } else if map.is_explored(x, y) {
                tile.dark
            } else {
                SHROUD
            };
            console.put(x, y, graphic.glyph, graphic.fg, Some(graphic.bg));
        }
    }

    let mut entities: Vec<_> = map.entities().filter(|e| e.is_on_floor()).collect();
    entities.sort_by_key(|e| e.render_order);
    for entity in entities {
        let Position { x, y } = entity.position;
        if map.is_visible(x, y) {
            console.put(x, y, entity.glyph, entity.color, None);
        }
    }
}

pub fn render_bar(
    console: &mut dyn Console,
    x: i32,
    y: i32,
    current_value: u32,
    maximum_value: u32,
    total_width: i32,
) {
    let bar_width = if maximum_value == 0 {
        0
    } else {
        (current_value as f32 / maximum_value as f32 * total_width as f32) as i32
    };

    console.fill_rect(x, y, total_width, 1, colors::BAR_EMPTY);
    if bar_width > 0 {
        console.fill_rect(x, y, bar_width, 1, colors::BAR_FILLED);
    }

    console.print(
        x + 1,
        y,
        &format!("HP: {}/{}", current_value, maximum_value),
        colors::BAR_TEXT,
    );
}

pub fn render_dungeon_level(console: &mut dyn Console, dungeon_level: u32, location: Position) {
    console.print(
        location.x,
        location.y,
        &format!("Dungeon level: {}", dungeon_level),
        colors::WHITE,
    );
}

/// Comma-separated names of floor entities at a visible location.
pub fn names_at_location(map: &GameMap, location: Position) -> String {
    if !map.in_bounds(location.x, location.y) || !map.is_visible(location.x, location.y) {
        return String::new();
    }
    let names: Vec<&str> = map.entities_at(location).map(|e| e.name.as_str()).collect();
    capitalize(&names.join(", "))
}

pub fn render_names_at_mouse_location(
    console: &mut dyn Console,
    x: i32,
    y: i32,
    map: &GameMap,
    mouse_location: Position,
) {
    let names = names_at_location(map, mouse_location);
    console.print(x, y, &names, colors::WHITE);
}

pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_rules::Entity;

    #[test]
    fn test_text_console_print_clips() {
        let mut console = TextConsole::new(5, 2);
        console.print(3, 0, "abcdef", colors::WHITE);
        assert_eq!(console.row_text(0), "   ab");
        console.print(0, 5, "hidden", colors::WHITE);
        assert_eq!(console.row_text(1), "");
    }

    #[test]
    fn test_render_bar() {
        let mut console = TextConsole::new(20, 1);
        render_bar(&mut console, 0, 0, 15, 30, 20);

        assert_eq!(console.row_text(0), " HP: 15/30");
        assert_eq!(console.cell(9, 0).unwrap().bg, colors::BAR_FILLED);
        assert_eq!(console.cell(10, 0).unwrap().bg, colors::BAR_EMPTY);
    }

    #[test]
    fn test_render_map_hides_unseen_entities() {
        let mut map = GameMap::from_rows(&["....."]);
        map.insert(Entity::orc().unwrap().at(1, 0));
        map.insert(Entity::troll().unwrap().at(3, 0));
        let mut visible = vec![false; 5];
        visible[1] = true;
        map.update_visibility(visible);

        let mut console = TextConsole::new(5, 1);
        render_map(&mut console, &map);
        assert_eq!(console.cell(1, 0).unwrap().glyph, 'o');
        assert_eq!(console.cell(3, 0).unwrap().glyph, ' ');
        assert_eq!(console.cell(3, 0).unwrap().bg, SHROUD.bg);
    }

    #[test]
    fn test_live_actors_draw_over_corpses_and_items() {
        let mut map = GameMap::from_rows(&["."]);
        let mut corpse = Entity::troll().unwrap();
        corpse.become_corpse();
        map.insert(corpse);
        map.insert(Entity::health_potion());
        map.insert(Entity::orc().unwrap());
        map.update_visibility(vec![true]);

        let mut console = TextConsole::new(1, 1);
        render_map(&mut console, &map);
        assert_eq!(console.cell(0, 0).unwrap().glyph, 'o');
    }

    #[test]
    fn test_names_at_location() {
        let mut map = GameMap::from_rows(&["..."]);
        let mut corpse = Entity::orc().unwrap().at(2, 0);
        corpse.become_corpse();
        map.insert(corpse);
        map.update_visibility(vec![true, true, true]);

        assert_eq!(names_at_location(&map, Position::new(2, 0)), "Remains of Orc");
        assert_eq!(names_at_location(&map, Position::new(0, 0)), "");
        assert_eq!(names_at_location(&map, Position::new(9, 9)), "");
    }
}
