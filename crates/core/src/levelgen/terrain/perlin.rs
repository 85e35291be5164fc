//! Gradient-noise terrain ("perlin"): octave summation over a seeded
//! permutation lattice, classified into terrain bands.

use std::collections::BTreeSet;

use crate::types::{Pos, TileKind};

use super::super::events::GenerationSink;
use super::super::grid::Grid;
use super::super::params::{ParamMap, PerlinParams};
use super::super::rng::PipelineRng;
use super::TerrainAlgorithm;

/// Values above this (and at or below mountainLevel) classify as Grass.
const GRASS_THRESHOLD: f64 = 0.6;

pub struct PerlinGenerator;

impl TerrainAlgorithm for PerlinGenerator {
    fn name(&self) -> &'static str {
        "perlin"
    }

    fn default_params(&self) -> ParamMap {
        PerlinParams::default_map()
    }

    fn validate_params(&self, params: &ParamMap) -> Vec<String> {
        PerlinParams::validate(params)
    }

    fn generate_core(
        &self,
        grid: &mut Grid,
        params: &ParamMap,
        rng: &mut PipelineRng,
        allowed: &BTreeSet<TileKind>,
        _sink: &mut dyn GenerationSink,
    ) {
        let resolved = PerlinParams::resolve(params);
        let noise = GradientNoise::new(rng);

        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let value = octave_value(&noise, x as f64, y as f64, &resolved);
                let pos = Pos { y: y as i32, x: x as i32 };
                grid.set_tile(pos, classify(value, &resolved, allowed));
            }
        }
    }
}

/// Sum `octaves` noise layers, frequency starting at `scale` and growing by
/// `lacunarity`, amplitude shrinking by `persistence`; normalize by the total
/// amplitude and remap [-1, 1] to [0, 1].
fn octave_value(noise: &GradientNoise, x: f64, y: f64, params: &PerlinParams) -> f64 {
    let mut total = 0.0;
    let mut frequency = params.scale;
    let mut amplitude = 1.0;
    let mut total_amplitude = 0.0;
    for _ in 0..params.octaves {
        total += noise.sample(x * frequency, y * frequency) * amplitude;
        total_amplitude += amplitude;
        amplitude *= params.persistence;
        frequency *= params.lacunarity;
    }
    let normalized = (total / total_amplitude).clamp(-1.0, 1.0);
    (normalized + 1.0) * 0.5
}

fn classify(value: f64, params: &PerlinParams, allowed: &BTreeSet<TileKind>) -> TileKind {
    let chosen = if value < params.water_level {
        TileKind::Water
    } else if value > params.mountain_level {
        TileKind::Stone
    } else if value > GRASS_THRESHOLD {
        TileKind::Grass
    } else {
        TileKind::Ground
    };
    if allowed.contains(&chosen) { chosen } else { TileKind::Ground }
}

/// Classic 2D gradient noise over a shuffled 256-entry permutation table.
/// The table comes from the pipeline RNG, so the macro-structure is fully
/// determined by the generation seed.
struct GradientNoise {
    perm: [u8; 256],
}

impl GradientNoise {
    fn new(rng: &mut PipelineRng) -> Self {
        let mut perm = [0u8; 256];
        for (index, slot) in perm.iter_mut().enumerate() {
            *slot = index as u8;
        }
        // Fisher-Yates from the top.
        for index in (1..256usize).rev() {
            let other = rng.next_int(index as u32 + 1) as usize;
            perm.swap(index, other);
        }
        Self { perm }
    }

    fn hash(&self, x: i64, y: i64) -> u8 {
        let first = self.perm[(x & 255) as usize] as usize;
        self.perm[(first + (y & 255) as usize) & 255]
    }

    fn sample(&self, x: f64, y: f64) -> f64 {
        let cell_x = x.floor();
        let cell_y = y.floor();
        let fx = x - cell_x;
        let fy = y - cell_y;
        let ix = cell_x as i64;
        let iy = cell_y as i64;

        let g00 = gradient_dot(self.hash(ix, iy), fx, fy);
        let g10 = gradient_dot(self.hash(ix + 1, iy), fx - 1.0, fy);
        let g01 = gradient_dot(self.hash(ix, iy + 1), fx, fy - 1.0);
        let g11 = gradient_dot(self.hash(ix + 1, iy + 1), fx - 1.0, fy - 1.0);

        let u = fade(fx);
        let v = fade(fy);
        let top = lerp(g00, g10, u);
        let bottom = lerp(g01, g11, u);
        lerp(top, bottom, v)
    }
}

fn gradient_dot(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 7 {
        0 => x + y,
        1 => x - y,
        2 => -x + y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::levelgen::events::NullSink;

    use super::*;

    fn all_kinds() -> BTreeSet<TileKind> {
        TileKind::ALL.iter().copied().collect()
    }

    fn generate(seed: u64, params: &ParamMap) -> Grid {
        let mut rng = PipelineRng::new(seed);
        let mut grid = Grid::filled(24, 24, TileKind::Empty);
        PerlinGenerator.generate_core(&mut grid, params, &mut rng, &all_kinds(), &mut NullSink);
        grid
    }

    #[test]
    fn same_seed_paints_identical_terrain() {
        let first = generate(42, &ParamMap::new());
        let second = generate(42, &ParamMap::new());
        assert_eq!(first, second);
    }

    #[test]
    fn different_seeds_change_the_macro_structure() {
        let first = generate(1, &ParamMap::new());
        let second = generate(2, &ParamMap::new());
        assert_ne!(first, second);
    }

    #[test]
    fn produced_kinds_stay_within_the_classification_bands() {
        let grid = generate(7, &ParamMap::new());
        for &tile in grid.tiles() {
            assert!(
                matches!(
                    tile,
                    TileKind::Water | TileKind::Stone | TileKind::Grass | TileKind::Ground
                ),
                "unexpected kind {tile:?}"
            );
        }
    }

    #[test]
    fn extreme_water_level_floods_the_map() {
        let mut params = ParamMap::new();
        params.insert("waterLevel".to_owned(), Value::from(1.0));
        params.insert("mountainLevel".to_owned(), Value::from(1.0));
        let grid = generate(3, &params);
        // Everything normalizes below 1.0, so every cell classifies as water.
        assert!(grid.tiles().iter().all(|&tile| tile == TileKind::Water));
    }

    #[test]
    fn disallowed_kind_falls_back_to_ground() {
        let no_water: BTreeSet<TileKind> = all_kinds()
            .into_iter()
            .filter(|&kind| kind != TileKind::Water)
            .collect();
        let params = PerlinParams::default();
        assert_eq!(classify(0.0, &params, &no_water), TileKind::Ground);
        assert_eq!(classify(0.0, &params, &all_kinds()), TileKind::Water);
        assert_eq!(classify(0.9, &params, &all_kinds()), TileKind::Stone);
        assert_eq!(classify(0.65, &params, &all_kinds()), TileKind::Grass);
        assert_eq!(classify(0.5, &params, &all_kinds()), TileKind::Ground);
    }

    #[test]
    fn octave_normalization_stays_in_unit_interval() {
        let mut rng = PipelineRng::new(11);
        let noise = GradientNoise::new(&mut rng);
        let params = PerlinParams { octaves: 10, ..PerlinParams::default() };
        for y in 0..40 {
            for x in 0..40 {
                let value = octave_value(&noise, f64::from(x), f64::from(y), &params);
                assert!((0.0..=1.0).contains(&value), "value {value} out of range");
            }
        }
    }
}
