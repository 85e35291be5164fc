//! Cellular-automata cave terrain ("cellular"): random fill, double-buffered
//! Moore-neighborhood smoothing, then removal of undersized floor pockets.

use std::collections::BTreeSet;

use crate::types::{Pos, TileKind};

use super::super::events::GenerationSink;
use super::super::grid::Grid;
use super::super::params::{CellularParams, ParamMap};
use super::super::rng::PipelineRng;
use super::TerrainAlgorithm;

pub struct CellularGenerator;

impl TerrainAlgorithm for CellularGenerator {
    fn name(&self) -> &'static str {
        "cellular"
    }

    fn default_params(&self) -> ParamMap {
        CellularParams::default_map()
    }

    fn validate_params(&self, params: &ParamMap) -> Vec<String> {
        CellularParams::validate(params)
    }

    fn generate_core(
        &self,
        grid: &mut Grid,
        params: &ParamMap,
        rng: &mut PipelineRng,
        _allowed: &BTreeSet<TileKind>,
        _sink: &mut dyn GenerationSink,
    ) {
        let resolved = CellularParams::resolve(params);
        fill_interior(grid, &resolved, rng);
        for _ in 0..resolved.iterations {
            step(grid, &resolved);
        }
        remove_small_regions(grid, &resolved);
    }
}

fn fill_interior(grid: &mut Grid, params: &CellularParams, rng: &mut PipelineRng) {
    for y in 1..grid.height().saturating_sub(1) {
        for x in 1..grid.width().saturating_sub(1) {
            let kind = if rng.next_float() < params.initial_fill_probability {
                params.wall_kind
            } else {
                params.floor_kind
            };
            grid.set_tile(Pos { y: y as i32, x: x as i32 }, kind);
        }
    }
}

/// One automaton sweep. Reads come from a snapshot so a cell never sees
/// neighbors updated in the same sweep; the border row stays fixed.
fn step(grid: &mut Grid, params: &CellularParams) {
    let snapshot = grid.clone();
    for y in 1..grid.height().saturating_sub(1) {
        for x in 1..grid.width().saturating_sub(1) {
            let pos = Pos { y: y as i32, x: x as i32 };
            let walls = moore_wall_count(&snapshot, pos, params.floor_kind);
            let next = if snapshot.tile_at(pos) == params.floor_kind {
                if walls > params.birth_limit { params.wall_kind } else { params.floor_kind }
            } else if walls >= params.death_limit {
                params.wall_kind
            } else {
                params.floor_kind
            };
            grid.set_tile(pos, next);
        }
    }
}

/// Non-floor neighbors count as wall; `tile_at` already answers Wall outside
/// the grid, so the untouched border counts as wall as well.
fn moore_wall_count(grid: &Grid, pos: Pos, floor_kind: TileKind) -> u32 {
    let mut count = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let neighbor = Pos { y: pos.y + dy, x: pos.x + dx };
            if grid.tile_at(neighbor) != floor_kind {
                count += 1;
            }
        }
    }
    count
}

/// Flood-fill every floor region (4-connectivity) and convert regions below
/// the minimum area back to wall. Removes cave pockets too small to use.
fn remove_small_regions(grid: &mut Grid, params: &CellularParams) {
    let floor_kind = params.floor_kind;
    let regions = grid.regions(move |kind| kind == floor_kind);
    for region in regions {
        if region.len() < CellularParams::MIN_REGION_AREA {
            for pos in region {
                grid.set_tile(pos, params.wall_kind);
            }
        }
    }
}
