//! Maze terrain ("maze"): depth-first spanning-tree carving over the
//! odd-coordinate lattice, optional braiding, and a lower-fidelity simple
//! variant.

use std::collections::BTreeSet;

use crate::types::{Pos, TileKind};

use super::super::events::{GenerationSink, Severity};
use super::super::grid::Grid;
use super::super::params::{MazeParams, MazeVariant, ParamMap};
use super::super::rng::PipelineRng;
use super::TerrainAlgorithm;

pub struct MazeGenerator;

impl TerrainAlgorithm for MazeGenerator {
    fn name(&self) -> &'static str {
        "maze"
    }

    fn default_params(&self) -> ParamMap {
        MazeParams::default_map()
    }

    fn validate_params(&self, params: &ParamMap) -> Vec<String> {
        MazeParams::validate(params)
    }

    fn generate_core(
        &self,
        grid: &mut Grid,
        params: &ParamMap,
        rng: &mut PipelineRng,
        _allowed: &BTreeSet<TileKind>,
        sink: &mut dyn GenerationSink,
    ) {
        let resolved = MazeParams::resolve(params);
        if let Some(requested) = &resolved.fallback_from {
            sink.event(
                Severity::Info,
                "maze variant not implemented; using recursive_backtracking",
                &[("requested", requested.clone())],
            );
        }

        grid.fill(resolved.wall_kind);
        match resolved.variant {
            MazeVariant::RecursiveBacktracking => {
                carve_backtracking(grid, &resolved, rng);
                if resolved.braiding_factor > 0.0 {
                    braid(grid, &resolved, rng);
                }
            }
            MazeVariant::Simple => carve_simple(grid, &resolved, rng),
        }
    }
}

fn lattice_dims(grid: &Grid) -> (usize, usize) {
    (grid.width().saturating_sub(1) / 2, grid.height().saturating_sub(1) / 2)
}

fn cell_pos(cx: usize, cy: usize) -> Pos {
    Pos { y: (2 * cy + 1) as i32, x: (2 * cx + 1) as i32 }
}

/// Depth-first spanning-tree carve. Maze cells sit at odd coordinates two
/// units apart; carving opens both the neighbor cell and the wall between.
/// Produces a perfect maze: all carved cells connected, no loops.
fn carve_backtracking(grid: &mut Grid, params: &MazeParams, rng: &mut PipelineRng) {
    let (cols, rows) = lattice_dims(grid);
    if cols == 0 || rows == 0 {
        return;
    }

    let mut visited = vec![false; cols * rows];
    let start = (rng.next_int(cols as u32) as usize, rng.next_int(rows as u32) as usize);
    visited[start.1 * cols + start.0] = true;
    grid.set_tile(cell_pos(start.0, start.1), params.path_kind);

    let mut stack = vec![start];
    while let Some(&(cx, cy)) = stack.last() {
        let mut unvisited = Vec::new();
        for (dx, dy) in [(0_i32, -1_i32), (1, 0), (0, 1), (-1, 0)] {
            let nx = cx as i32 + dx;
            let ny = cy as i32 + dy;
            if nx < 0 || ny < 0 || nx >= cols as i32 || ny >= rows as i32 {
                continue;
            }
            if !visited[(ny as usize) * cols + nx as usize] {
                unvisited.push((nx as usize, ny as usize));
            }
        }

        let Some(&(nx, ny)) = (if unvisited.is_empty() { None } else { Some(rng.pick(&unvisited)) })
        else {
            stack.pop();
            continue;
        };

        let here = cell_pos(cx, cy);
        let there = cell_pos(nx, ny);
        let midpoint = Pos { y: (here.y + there.y) / 2, x: (here.x + there.x) / 2 };
        grid.set_tile(midpoint, params.path_kind);
        grid.set_tile(there, params.path_kind);
        visited[ny * cols + nx] = true;
        stack.push((nx, ny));
    }
}

/// Open `round(dead_ends × braidingFactor)` dead ends by converting one random
/// adjacent interior wall each, trading tree purity for loops.
fn braid(grid: &mut Grid, params: &MazeParams, rng: &mut PipelineRng) {
    let mut dead_ends = collect_dead_ends(grid, params.path_kind);
    let open_count = (dead_ends.len() as f64 * params.braiding_factor).round() as usize;

    for _ in 0..open_count {
        if dead_ends.is_empty() {
            break;
        }
        let index = rng.next_int(dead_ends.len() as u32) as usize;
        let pos = dead_ends.swap_remove(index);

        let mut walls = Vec::new();
        for neighbor in four_neighbors(pos) {
            if is_interior(grid, neighbor) && grid.tile_at(neighbor) == params.wall_kind {
                walls.push(neighbor);
            }
        }
        if !walls.is_empty() {
            grid.set_tile(*rng.pick(&walls), params.path_kind);
        }
    }
}

/// Path cells with exactly one path neighbor, in row-major order.
fn collect_dead_ends(grid: &Grid, path_kind: TileKind) -> Vec<Pos> {
    let mut dead_ends = Vec::new();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let pos = Pos { y: y as i32, x: x as i32 };
            if grid.tile_at(pos) != path_kind {
                continue;
            }
            let path_neighbors = four_neighbors(pos)
                .into_iter()
                .filter(|&neighbor| grid.tile_at(neighbor) == path_kind)
                .count();
            if path_neighbors == 1 {
                dead_ends.push(pos);
            }
        }
    }
    dead_ends
}

/// Simple variant: a full corridor lattice with stochastic toggles scaled by
/// complexity × density. Connectivity is intentionally not guaranteed.
fn carve_simple(grid: &mut Grid, params: &MazeParams, rng: &mut PipelineRng) {
    let mut corridor_midpoints = Vec::new();
    for y in 1..grid.height().saturating_sub(1) {
        for x in 1..grid.width().saturating_sub(1) {
            let pos = Pos { y: y as i32, x: x as i32 };
            let x_odd = x % 2 == 1;
            let y_odd = y % 2 == 1;
            if x_odd || y_odd {
                grid.set_tile(pos, params.path_kind);
            }
            if x_odd != y_odd {
                corridor_midpoints.push(pos);
            }
        }
    }
    if corridor_midpoints.is_empty() {
        return;
    }

    let toggles =
        (corridor_midpoints.len() as f64 * params.complexity * params.density).round() as usize;
    for _ in 0..toggles {
        let pos = *rng.pick(&corridor_midpoints);
        let flipped = if grid.tile_at(pos) == params.path_kind {
            params.wall_kind
        } else {
            params.path_kind
        };
        grid.set_tile(pos, flipped);
    }
}

fn four_neighbors(pos: Pos) -> [Pos; 4] {
    [
        Pos { y: pos.y - 1, x: pos.x },
        Pos { y: pos.y, x: pos.x + 1 },
        Pos { y: pos.y + 1, x: pos.x },
        Pos { y: pos.y, x: pos.x - 1 },
    ]
}

fn is_interior(grid: &Grid, pos: Pos) -> bool {
    pos.x >= 1
        && pos.y >= 1
        && (pos.x as usize) < grid.width().saturating_sub(1)
        && (pos.y as usize) < grid.height().saturating_sub(1)
}
