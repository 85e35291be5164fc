//! Level assembly: merge grid, entities, and config into a named Level record
//! with descriptive statistics.

use std::collections::BTreeMap;

use serde_json::{Value, json};

#[cfg(test)]
use crate::types::TileKind;

use super::config::GenerationConfig;
use super::error::GenerationError;
use super::grid::Grid;
use super::model::{Entity, Level};

/// Tile-count boundaries for the Small/Medium/Large name buckets.
const MEDIUM_AREA: usize = 1000;
const LARGE_AREA: usize = 4000;

pub fn assemble_level(
    grid: Grid,
    entities: Vec<Entity>,
    config: &GenerationConfig,
) -> Result<Level, GenerationError> {
    if grid.area() == 0 {
        return Err(GenerationError::InvalidArgument("grid has zero area".to_owned()));
    }

    let name = level_name(&config.algorithm, grid.area(), entities.len());
    let metadata = build_metadata(&grid, &entities);
    Ok(Level { name, grid, entities, metadata })
}

fn level_name(algorithm: &str, area: usize, entity_count: usize) -> String {
    let bucket = if area < MEDIUM_AREA {
        "Small"
    } else if area < LARGE_AREA {
        "Medium"
    } else {
        "Large"
    };
    let mut label: String = algorithm.chars().take(1).flat_map(char::to_uppercase).collect();
    label.push_str(algorithm.get(1..).unwrap_or(""));
    format!("{label} {bucket} Level ({entity_count} entities)")
}

fn build_metadata(grid: &Grid, entities: &[Entity]) -> BTreeMap<String, Value> {
    let mut metadata = BTreeMap::new();

    let area = grid.area() as f64;
    let mut tile_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut walkable = 0_usize;
    for &tile in grid.tiles() {
        *tile_counts.entry(tile.name()).or_insert(0) += 1;
        if tile.is_walkable() {
            walkable += 1;
        }
    }
    let tile_percentages: BTreeMap<&'static str, f64> = tile_counts
        .iter()
        .map(|(&name, &count)| (name, count as f64 / area * 100.0))
        .collect();

    metadata.insert("tileCounts".to_owned(), json!(tile_counts));
    metadata.insert("tilePercentages".to_owned(), json!(tile_percentages));
    metadata.insert("walkableTiles".to_owned(), json!(walkable));
    metadata.insert("walkableRatio".to_owned(), json!(walkable as f64 / area));

    let mut entity_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for entity in entities {
        *entity_counts.entry(entity.kind.name()).or_insert(0) += 1;
    }
    metadata.insert("entityCounts".to_owned(), json!(entity_counts));
    metadata.insert("entityBounds".to_owned(), entity_bounds(entities));

    metadata.insert(
        "complexity".to_owned(),
        json!({
            "transitionDensity": transition_density(grid),
            "entityComplexity": entity_complexity(entities),
            "sizeScore": size_score(grid.area()),
        }),
    );
    metadata
}

fn entity_bounds(entities: &[Entity]) -> Value {
    if entities.is_empty() {
        return Value::Null;
    }
    let min_x = entities.iter().map(|entity| entity.pos.x).min().unwrap_or(0);
    let max_x = entities.iter().map(|entity| entity.pos.x).max().unwrap_or(0);
    let min_y = entities.iter().map(|entity| entity.pos.y).min().unwrap_or(0);
    let max_y = entities.iter().map(|entity| entity.pos.y).max().unwrap_or(0);
    json!({ "minX": min_x, "minY": min_y, "maxX": max_x, "maxY": max_y })
}

/// Fraction of horizontally/vertically adjacent tile pairs whose kinds differ.
/// Uniform terrain scores 0; checkerboard terrain scores 1.
fn transition_density(grid: &Grid) -> f64 {
    let width = grid.width();
    let height = grid.height();
    let mut transitions = 0_usize;
    let mut pairs = 0_usize;
    for y in 0..height {
        for x in 0..width {
            let here = grid.tiles()[y * width + x];
            if x + 1 < width {
                pairs += 1;
                if grid.tiles()[y * width + x + 1] != here {
                    transitions += 1;
                }
            }
            if y + 1 < height {
                pairs += 1;
                if grid.tiles()[(y + 1) * width + x] != here {
                    transitions += 1;
                }
            }
        }
    }
    if pairs == 0 { 0.0 } else { transitions as f64 / pairs as f64 }
}

/// Entity-type variety plus property richness, per entity.
fn entity_complexity(entities: &[Entity]) -> f64 {
    if entities.is_empty() {
        return 0.0;
    }
    let distinct: std::collections::BTreeSet<_> =
        entities.iter().map(|entity| entity.kind).collect();
    let properties: usize = entities.iter().map(|entity| entity.properties.len()).sum();
    (distinct.len() + properties) as f64 / entities.len() as f64
}

/// Log-scaled size in [0, 1], saturating at a 200×200 grid.
fn size_score(area: usize) -> f64 {
    if area <= 1 {
        return 0.0;
    }
    ((area as f64).ln() / (40_000_f64).ln()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use crate::types::{EntityKind, Pos};

    use super::*;

    fn sample_level() -> Level {
        let mut grid = Grid::filled(10, 10, TileKind::Ground);
        grid.seal_border();
        let entities = vec![
            Entity::new(EntityKind::Player, Pos { y: 5, x: 5 }),
            Entity::new(EntityKind::Exit, Pos { y: 1, x: 1 }),
            Entity::new(EntityKind::Enemy, Pos { y: 3, x: 7 }),
        ];
        let config =
            GenerationConfig { algorithm: "cellular".to_owned(), ..GenerationConfig::default() };
        assemble_level(grid, entities, &config).expect("assemble")
    }

    #[test]
    fn name_combines_algorithm_bucket_and_entity_count() {
        let level = sample_level();
        assert_eq!(level.name, "Cellular Small Level (3 entities)");
    }

    #[test]
    fn size_buckets_follow_tile_count() {
        assert_eq!(level_name("perlin", 999, 0), "Perlin Small Level (0 entities)");
        assert_eq!(level_name("perlin", 1000, 0), "Perlin Medium Level (0 entities)");
        assert_eq!(level_name("maze", 4000, 2), "Maze Large Level (2 entities)");
    }

    #[test]
    fn metadata_counts_tiles_and_entities() {
        let level = sample_level();
        let counts = &level.metadata["tileCounts"];
        assert_eq!(counts["ground"], 64);
        assert_eq!(counts["wall"], 36);
        assert_eq!(level.metadata["walkableTiles"], 64);
        let entity_counts = &level.metadata["entityCounts"];
        assert_eq!(entity_counts["player"], 1);
        assert_eq!(entity_counts["enemy"], 1);
    }

    #[test]
    fn entity_bounds_cover_all_positions() {
        let level = sample_level();
        let bounds = &level.metadata["entityBounds"];
        assert_eq!(bounds["minX"], 1);
        assert_eq!(bounds["maxX"], 7);
        assert_eq!(bounds["minY"], 1);
        assert_eq!(bounds["maxY"], 5);
    }

    #[test]
    fn bounds_are_null_without_entities() {
        let grid = Grid::filled(5, 5, TileKind::Ground);
        let config = GenerationConfig::default();
        let level = assemble_level(grid, Vec::new(), &config).expect("assemble");
        assert_eq!(level.metadata["entityBounds"], Value::Null);
    }

    #[test]
    fn transition_density_is_zero_for_uniform_terrain() {
        let grid = Grid::filled(6, 6, TileKind::Ground);
        assert_eq!(transition_density(&grid), 0.0);
    }

    #[test]
    fn zero_area_grid_is_rejected() {
        let grid = Grid::filled(0, 0, TileKind::Ground);
        let result = assemble_level(grid, Vec::new(), &GenerationConfig::default());
        assert!(matches!(result, Err(GenerationError::InvalidArgument(_))));
    }
}
