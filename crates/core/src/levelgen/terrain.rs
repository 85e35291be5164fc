//! Shared terrain-generation template and the algorithm registry.

pub mod cellular;
pub mod maze;
pub mod perlin;

use std::collections::BTreeSet;

use crate::types::TileKind;

use super::events::GenerationSink;
use super::grid::Grid;
use super::params::ParamMap;
use super::rng::PipelineRng;

pub use cellular::CellularGenerator;
pub use maze::MazeGenerator;
pub use perlin::PerlinGenerator;

/// One interchangeable terrain core. The surrounding template owns grid
/// initialization and the post-processing invariants.
pub trait TerrainAlgorithm: Sync {
    /// Stable identifier used in configs and level names.
    fn name(&self) -> &'static str;

    fn default_params(&self) -> ParamMap;

    /// Advisory validation: problems are reported, defaults substituted,
    /// generation never blocked.
    fn validate_params(&self, params: &ParamMap) -> Vec<String>;

    fn generate_core(
        &self,
        grid: &mut Grid,
        params: &ParamMap,
        rng: &mut PipelineRng,
        allowed: &BTreeSet<TileKind>,
        sink: &mut dyn GenerationSink,
    );
}

pub fn algorithm_by_name(name: &str) -> Option<&'static dyn TerrainAlgorithm> {
    match name {
        "perlin" => Some(&PerlinGenerator),
        "cellular" => Some(&CellularGenerator),
        "maze" => Some(&MazeGenerator),
        _ => None,
    }
}

pub fn algorithm_names() -> [&'static str; 3] {
    ["perlin", "cellular", "maze"]
}

/// The template every algorithm shares: init to Empty, run the core, seal
/// the border, and carve a fallback path when nothing walkable survived.
pub fn generate_terrain(
    algorithm: &dyn TerrainAlgorithm,
    width: usize,
    height: usize,
    seed: u64,
    params: &ParamMap,
    allowed: &BTreeSet<TileKind>,
    sink: &mut dyn GenerationSink,
) -> Grid {
    let mut rng = PipelineRng::new(seed);
    let mut grid = Grid::filled(width, height, TileKind::Empty);
    algorithm.generate_core(&mut grid, params, &mut rng, allowed, sink);
    grid.seal_border();
    if !grid.has_interior_walkable() {
        grid.carve_fallback_path();
    }
    grid
}
