//! Tile grid storage plus the spatial queries shared by generation, placement,
//! and validation.

use std::collections::VecDeque;

use crate::types::{Pos, TileKind};

/// Row-major `width × height` tile storage. Out-of-bounds reads answer Wall
/// so neighbor counting never needs edge special-casing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
}

impl Grid {
    pub fn filled(width: usize, height: usize, kind: TileKind) -> Self {
        Self { width, height, tiles: vec![kind; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn tile_at(&self, pos: Pos) -> TileKind {
        if !self.in_bounds(pos) {
            return TileKind::Wall;
        }
        self.tiles[(pos.y as usize) * self.width + (pos.x as usize)]
    }

    pub fn set_tile(&mut self, pos: Pos, kind: TileKind) {
        debug_assert!(self.in_bounds(pos), "set_tile out of bounds: {pos:?}");
        self.tiles[(pos.y as usize) * self.width + (pos.x as usize)] = kind;
    }

    pub fn is_walkable_at(&self, pos: Pos) -> bool {
        self.tile_at(pos).is_walkable()
    }

    pub fn fill(&mut self, kind: TileKind) {
        self.tiles.fill(kind);
    }

    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    /// All walkable positions in row-major order. The enumeration order is
    /// part of the determinism contract: tie-breaks follow it.
    pub fn walkable_positions(&self) -> Vec<Pos> {
        let mut positions = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Pos { y: y as i32, x: x as i32 };
                if self.is_walkable_at(pos) {
                    positions.push(pos);
                }
            }
        }
        positions
    }

    pub fn geometric_center(&self) -> (f64, f64) {
        ((self.width as f64 - 1.0) * 0.5, (self.height as f64 - 1.0) * 0.5)
    }

    /// Overwrite the outer ring with Wall.
    pub fn seal_border(&mut self) {
        for x in 0..self.width {
            self.set_tile(Pos { y: 0, x: x as i32 }, TileKind::Wall);
            self.set_tile(Pos { y: (self.height - 1) as i32, x: x as i32 }, TileKind::Wall);
        }
        for y in 0..self.height {
            self.set_tile(Pos { y: y as i32, x: 0 }, TileKind::Wall);
            self.set_tile(Pos { y: y as i32, x: (self.width - 1) as i32 }, TileKind::Wall);
        }
    }

    pub fn has_interior_walkable(&self) -> bool {
        for y in 1..self.height.saturating_sub(1) {
            for x in 1..self.width.saturating_sub(1) {
                if self.is_walkable_at(Pos { y: y as i32, x: x as i32 }) {
                    return true;
                }
            }
        }
        false
    }

    /// Connectivity fallback: one-tile horizontal Ground path across the
    /// vertical midline, so at least one walkable region always exists.
    pub fn carve_fallback_path(&mut self) {
        if self.width < 3 || self.height < 3 {
            return;
        }
        let mid_y = (self.height / 2) as i32;
        for x in 1..(self.width - 1) {
            self.set_tile(Pos { y: mid_y, x: x as i32 }, TileKind::Ground);
        }
    }

    /// 4-connected component containing `start`, over cells matching `accept`.
    pub fn flood_fill(&self, start: Pos, accept: impl Fn(TileKind) -> bool) -> Vec<Pos> {
        if !self.in_bounds(start) || !accept(self.tile_at(start)) {
            return Vec::new();
        }
        let mut seen = vec![false; self.area()];
        seen[(start.y as usize) * self.width + (start.x as usize)] = true;
        let mut open = VecDeque::from([start]);
        let mut component = Vec::new();
        while let Some(pos) = open.pop_front() {
            component.push(pos);
            for next in [
                Pos { y: pos.y - 1, x: pos.x },
                Pos { y: pos.y, x: pos.x + 1 },
                Pos { y: pos.y + 1, x: pos.x },
                Pos { y: pos.y, x: pos.x - 1 },
            ] {
                if !self.in_bounds(next) || !accept(self.tile_at(next)) {
                    continue;
                }
                let index = (next.y as usize) * self.width + (next.x as usize);
                if seen[index] {
                    continue;
                }
                seen[index] = true;
                open.push_back(next);
            }
        }
        component
    }

    /// Every 4-connected region of cells matching `accept`, discovered in
    /// row-major order.
    pub fn regions(&self, accept: impl Fn(TileKind) -> bool + Copy) -> Vec<Vec<Pos>> {
        let mut assigned = vec![false; self.area()];
        let mut found = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Pos { y: y as i32, x: x as i32 };
                let index = y * self.width + x;
                if assigned[index] || !accept(self.tile_at(pos)) {
                    continue;
                }
                let region = self.flood_fill(pos, accept);
                for member in &region {
                    assigned[(member.y as usize) * self.width + (member.x as usize)] = true;
                }
                found.push(region);
            }
        }
        found
    }

    pub fn largest_walkable_component(&self) -> usize {
        self.regions(TileKind::is_walkable).into_iter().map(|region| region.len()).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_reads_answer_wall() {
        let grid = Grid::filled(4, 4, TileKind::Ground);
        assert_eq!(grid.tile_at(Pos { y: -1, x: 0 }), TileKind::Wall);
        assert_eq!(grid.tile_at(Pos { y: 0, x: 4 }), TileKind::Wall);
    }

    #[test]
    fn seal_border_walls_the_perimeter_only() {
        let mut grid = Grid::filled(5, 4, TileKind::Ground);
        grid.seal_border();
        for y in 0..4 {
            for x in 0..5 {
                let pos = Pos { y, x };
                let on_ring = y == 0 || y == 3 || x == 0 || x == 4;
                let expected = if on_ring { TileKind::Wall } else { TileKind::Ground };
                assert_eq!(grid.tile_at(pos), expected, "at {pos:?}");
            }
        }
    }

    #[test]
    fn fallback_path_restores_a_walkable_region() {
        let mut grid = Grid::filled(9, 7, TileKind::Wall);
        assert!(!grid.has_interior_walkable());
        grid.carve_fallback_path();
        assert!(grid.has_interior_walkable());
        for x in 1..8 {
            assert_eq!(grid.tile_at(Pos { y: 3, x }), TileKind::Ground);
        }
        assert_eq!(grid.tile_at(Pos { y: 3, x: 0 }), TileKind::Wall);
        assert_eq!(grid.tile_at(Pos { y: 3, x: 8 }), TileKind::Wall);
    }

    #[test]
    fn flood_fill_respects_four_connectivity() {
        let mut grid = Grid::filled(5, 5, TileKind::Wall);
        grid.set_tile(Pos { y: 1, x: 1 }, TileKind::Ground);
        grid.set_tile(Pos { y: 1, x: 2 }, TileKind::Ground);
        // Diagonal neighbor must not join the component.
        grid.set_tile(Pos { y: 2, x: 3 }, TileKind::Ground);

        let component = grid.flood_fill(Pos { y: 1, x: 1 }, TileKind::is_walkable);
        assert_eq!(component.len(), 2);
    }

    #[test]
    fn regions_partition_all_matching_cells() {
        let mut grid = Grid::filled(7, 5, TileKind::Wall);
        grid.set_tile(Pos { y: 1, x: 1 }, TileKind::Ground);
        grid.set_tile(Pos { y: 1, x: 2 }, TileKind::Ground);
        grid.set_tile(Pos { y: 3, x: 4 }, TileKind::Grass);
        grid.set_tile(Pos { y: 3, x: 5 }, TileKind::Sand);

        let found = grid.regions(TileKind::is_walkable);
        assert_eq!(found.len(), 2);
        let total: usize = found.iter().map(|region| region.len()).sum();
        assert_eq!(total, 4);
        assert_eq!(grid.largest_walkable_component(), 2);
    }
}
