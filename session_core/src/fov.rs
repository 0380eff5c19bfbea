//! Field of view by recursive shadowcasting.
//!
//! Opaque tiles that are in range are themselves visible, so walls bounding a
//! lit area are drawn. Tiles outside the map are treated as opaque.

use game_rules::{GameMap, Position};

/// Octant transforms: (xx, xy, yx, yy) per octant.
const OCTANTS: [(i32, i32, i32, i32); 8] = [
    (1, 0, 0, 1),
    (0, 1, 1, 0),
    (0, -1, 1, 0),
    (-1, 0, 0, 1),
    (-1, 0, 0, -1),
    (0, -1, -1, 0),
    (0, 1, -1, 0),
    (1, 0, 0, -1),
];

/// Compute the row-major visibility grid seen from `origin`.
///
/// A non-positive `radius` means unlimited range.
pub fn compute_fov(map: &GameMap, origin: Position, radius: i32) -> Vec<bool> {
    let mut visible = vec![false; (map.width.max(0) * map.height.max(0)) as usize];
    if !map.in_bounds(origin.x, origin.y) {
        return visible;
    }
    let radius = if radius > 0 {
        radius
    } else {
        map.width.max(map.height)
    };

    let mut caster = Caster {
        map,
        visible: &mut visible,
        origin,
        radius,
    };
    caster.light(origin.x, origin.y);
    for octant in OCTANTS {
        caster.cast(1, 1.0, 0.0, octant);
    }
    visible
}

struct Caster<'a> {
    map: &'a GameMap,
    visible: &'a mut Vec<bool>,
    origin: Position,
    radius: i32,
}

impl Caster<'_> {
    fn light(&mut self, x: i32, y: i32) {
        if self.map.in_bounds(x, y) {
            self.visible[(y * self.map.width + x) as usize] = true;
        }
    }

    fn cast(&mut self, row: i32, mut start: f64, end: f64, (xx, xy, yx, yy): (i32, i32, i32, i32)) {
        if start < end {
            return;
        }
        let radius_sq = self.radius * self.radius;
        let mut new_start = 0.0;

        for distance in row..=self.radius {
            let dy = -distance;
            let mut blocked = false;

            for dx in -distance..=0 {
                let x = self.origin.x + dx * xx + dy * xy;
                let y = self.origin.y + dx * yx + dy * yy;
                let left_slope = (f64::from(dx) - 0.5) / (f64::from(dy) + 0.5);
                let right_slope = (f64::from(dx) + 0.5) / (f64::from(dy) - 0.5);

                if start < right_slope {
                    continue;
                }
                if end > left_slope {
                    break;
                }

                if dx * dx + dy * dy <= radius_sq {
                    self.light(x, y);
                }

                let opaque = !self.map.is_transparent(x, y);
                if blocked {
                    if opaque {
                        new_start = right_slope;
                    } else {
                        blocked = false;
                        start = new_start;
                    }
                } else if opaque && distance < self.radius {
                    blocked = true;
                    self.cast(distance + 1, start, left_slope, (xx, xy, yx, yy));
                    new_start = right_slope;
                }
            }

            if blocked {
                break;
            }
        }
    }
}
