//! Greedy constraint-based entity placement.
//!
//! The placer is deterministic for a fixed grid, config, and seed, and it
//! never backtracks: a request that runs out of valid candidates keeps its
//! shortfall and later requests carry on.

use std::collections::BTreeMap;

use crate::types::{EntityKind, PlacementStrategy, Pos};

use super::config::GenerationConfig;
use super::error::GenerationError;
use super::events::{GenerationSink, Severity};
use super::grid::Grid;
use super::model::Entity;
use super::rng::PipelineRng;

/// Candidates within this Chebyshev distance of a same-kind entity qualify
/// for the clustered strategy (a 7×7 window).
const CLUSTER_WINDOW_RADIUS: i32 = 3;

/// Corner strategy keeps candidates within this fraction of the smaller grid
/// dimension from a quadrant center.
const CORNER_RADIUS_FRACTION: f64 = 0.3;

struct ResolvedRequest {
    kind: EntityKind,
    count: usize,
    strategy: PlacementStrategy,
    min_distance: f64,
    max_distance_from_player: Option<f64>,
    properties: BTreeMap<String, String>,
}

/// Place the player plus every request from `config`, in request order.
///
/// The returned list starts with the Player (the anchor for relative-distance
/// strategies), or is empty when the grid has no walkable tile at all.
pub fn place_entities(
    grid: &Grid,
    config: &GenerationConfig,
    seed: u64,
    sink: &mut dyn GenerationSink,
) -> Result<Vec<Entity>, GenerationError> {
    if grid.area() == 0 {
        return Err(GenerationError::InvalidArgument("grid has zero area".to_owned()));
    }
    let requests = resolve_requests(config, sink)?;

    let mut rng = PipelineRng::new(seed);
    let mut placed: Vec<Entity> = Vec::new();

    let Some(player_pos) = central_walkable_position(grid) else {
        return Ok(Vec::new());
    };
    placed.push(Entity::new(EntityKind::Player, player_pos));

    for request in &requests {
        for attempt in 0..request.count {
            let candidates = valid_candidates(grid, &placed, request, player_pos);
            if candidates.is_empty() {
                sink.event(
                    Severity::Info,
                    "placement request under-filled",
                    &[
                        ("entity", request.kind.name().to_owned()),
                        ("placed", attempt.to_string()),
                        ("requested", request.count.to_string()),
                    ],
                );
                break;
            }
            let pos = select_candidate(&candidates, request, grid, &placed, player_pos, &mut rng);
            let mut entity = Entity::new(request.kind, pos);
            entity.properties = request.properties.clone();
            placed.push(entity);
        }
    }

    Ok(placed)
}

fn resolve_requests(
    config: &GenerationConfig,
    sink: &mut dyn GenerationSink,
) -> Result<Vec<ResolvedRequest>, GenerationError> {
    let mut resolved = Vec::with_capacity(config.entity_requests.len());
    for request in &config.entity_requests {
        let kind = EntityKind::from_name(&request.kind).ok_or_else(|| {
            GenerationError::InvalidArgument(format!("unknown entity type '{}'", request.kind))
        })?;
        let strategy = match PlacementStrategy::from_tag(&request.strategy) {
            Some(strategy) => strategy,
            None => {
                sink.event(
                    Severity::Warning,
                    "unrecognized placement strategy; using random",
                    &[("strategy", request.strategy.clone())],
                );
                PlacementStrategy::Random
            }
        };
        resolved.push(ResolvedRequest {
            kind,
            count: request.count,
            strategy,
            min_distance: request.min_distance,
            max_distance_from_player: request.max_distance_from_player,
            properties: request.properties.clone(),
        });
    }
    Ok(resolved)
}

/// Walkable cell nearest the geometric center; row-major enumeration order
/// breaks ties. Favors a central, defensible spawn.
fn central_walkable_position(grid: &Grid) -> Option<Pos> {
    let (center_x, center_y) = grid.geometric_center();
    let mut best: Option<(f64, Pos)> = None;
    for pos in grid.walkable_positions() {
        let dx = f64::from(pos.x) - center_x;
        let dy = f64::from(pos.y) - center_y;
        let distance = (dx * dx + dy * dy).sqrt();
        if best.is_none_or(|(best_distance, _)| distance < best_distance) {
            best = Some((distance, pos));
        }
    }
    best.map(|(_, pos)| pos)
}

/// Recompute the full candidate set against the entities placed so far:
/// walkable, at least max(1.0, minDistance) from every placed entity, and
/// within maxDistanceFromPlayer of the Player when that bound is set.
fn valid_candidates(
    grid: &Grid,
    placed: &[Entity],
    request: &ResolvedRequest,
    player_pos: Pos,
) -> Vec<Pos> {
    let required = request.min_distance.max(1.0);
    grid.walkable_positions()
        .into_iter()
        .filter(|&pos| {
            if placed.iter().any(|entity| pos.distance_to(entity.pos) < required) {
                return false;
            }
            match request.max_distance_from_player {
                Some(limit) => pos.distance_to(player_pos) <= limit,
                None => true,
            }
        })
        .collect()
}

fn select_candidate(
    candidates: &[Pos],
    request: &ResolvedRequest,
    grid: &Grid,
    placed: &[Entity],
    player_pos: Pos,
    rng: &mut PipelineRng,
) -> Pos {
    match request.strategy {
        PlacementStrategy::Random => *rng.pick(candidates),
        PlacementStrategy::Clustered => {
            let anchors: Vec<Pos> = placed
                .iter()
                .filter(|entity| entity.kind == request.kind)
                .map(|entity| entity.pos)
                .collect();
            if anchors.is_empty() {
                return *rng.pick(candidates);
            }
            let windowed: Vec<Pos> = candidates
                .iter()
                .copied()
                .filter(|pos| {
                    anchors.iter().any(|anchor| {
                        (pos.x - anchor.x).abs() <= CLUSTER_WINDOW_RADIUS
                            && (pos.y - anchor.y).abs() <= CLUSTER_WINDOW_RADIUS
                    })
                })
                .collect();
            if windowed.is_empty() { *rng.pick(candidates) } else { *rng.pick(&windowed) }
        }
        PlacementStrategy::Spread => {
            let scored = candidates
                .iter()
                .map(|&pos| {
                    let nearest = placed
                        .iter()
                        .map(|entity| pos.distance_to(entity.pos))
                        .fold(f64::INFINITY, f64::min);
                    (nearest, pos)
                })
                .collect();
            pick_top_quartile(scored, rng)
        }
        PlacementStrategy::NearWalls => {
            let against_walls: Vec<Pos> = candidates
                .iter()
                .copied()
                .filter(|&pos| has_blocked_moore_neighbor(grid, pos))
                .collect();
            if against_walls.is_empty() { *rng.pick(candidates) } else { *rng.pick(&against_walls) }
        }
        PlacementStrategy::Center => {
            let (center_x, center_y) = grid.geometric_center();
            let scored = candidates
                .iter()
                .map(|&pos| {
                    let dx = f64::from(pos.x) - center_x;
                    let dy = f64::from(pos.y) - center_y;
                    // Negated so the quartile picker can always take the top.
                    (-(dx * dx + dy * dy).sqrt(), pos)
                })
                .collect();
            pick_top_quartile(scored, rng)
        }
        PlacementStrategy::FarFromPlayer => {
            let scored =
                candidates.iter().map(|&pos| (pos.distance_to(player_pos), pos)).collect();
            pick_top_quartile(scored, rng)
        }
        PlacementStrategy::Corners => {
            let radius =
                CORNER_RADIUS_FRACTION * grid.width().min(grid.height()) as f64;
            let anchors = quadrant_centers(grid);
            let cornered: Vec<Pos> = candidates
                .iter()
                .copied()
                .filter(|&pos| {
                    anchors.iter().any(|&(ax, ay)| {
                        let dx = f64::from(pos.x) - ax;
                        let dy = f64::from(pos.y) - ay;
                        (dx * dx + dy * dy).sqrt() <= radius
                    })
                })
                .collect();
            if cornered.is_empty() { *rng.pick(candidates) } else { *rng.pick(&cornered) }
        }
    }
}

/// Uniform choice among the best-scoring quartile (at least one candidate).
/// Ties sort by position so the outcome is stable across runs.
fn pick_top_quartile(mut scored: Vec<(f64, Pos)>, rng: &mut PipelineRng) -> Pos {
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    let take = (scored.len() / 4).max(1);
    scored[rng.next_int(take as u32) as usize].1
}

fn has_blocked_moore_neighbor(grid: &Grid, pos: Pos) -> bool {
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            if !grid.is_walkable_at(Pos { y: pos.y + dy, x: pos.x + dx }) {
                return true;
            }
        }
    }
    false
}

fn quadrant_centers(grid: &Grid) -> [(f64, f64); 4] {
    let width = grid.width() as f64;
    let height = grid.height() as f64;
    [
        (width * 0.25, height * 0.25),
        (width * 0.75, height * 0.25),
        (width * 0.25, height * 0.75),
        (width * 0.75, height * 0.75),
    ]
}

#[cfg(test)]
mod tests {
    use crate::levelgen::config::EntityRequest;
    use crate::levelgen::events::NullSink;
    use crate::types::TileKind;

    use super::*;

    fn open_grid(width: usize, height: usize) -> Grid {
        let mut grid = Grid::filled(width, height, TileKind::Ground);
        grid.seal_border();
        grid
    }

    fn config_with(requests: Vec<EntityRequest>) -> GenerationConfig {
        GenerationConfig { entity_requests: requests, ..GenerationConfig::default() }
    }

    #[test]
    fn player_lands_on_the_central_walkable_tile() {
        let grid = open_grid(9, 9);
        let placed =
            place_entities(&grid, &config_with(Vec::new()), 1, &mut NullSink).expect("place");
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].kind, EntityKind::Player);
        assert_eq!(placed[0].pos, Pos { y: 4, x: 4 });
    }

    #[test]
    fn fully_blocked_grid_places_nothing() {
        let grid = Grid::filled(4, 4, TileKind::Wall);
        let config = config_with(vec![EntityRequest::new("enemy", 5, "random")]);
        let placed = place_entities(&grid, &config, 9, &mut NullSink).expect("place");
        assert!(placed.is_empty());
    }

    #[test]
    fn single_walkable_tile_yields_exactly_the_player() {
        let mut grid = Grid::filled(3, 3, TileKind::Wall);
        grid.set_tile(Pos { y: 1, x: 1 }, TileKind::Ground);
        let config = config_with(vec![
            EntityRequest::new("enemy", 3, "random"),
            EntityRequest::new("item", 2, "random"),
        ]);
        let placed = place_entities(&grid, &config, 5, &mut NullSink).expect("place");
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].kind, EntityKind::Player);
        assert_eq!(placed[0].pos, Pos { y: 1, x: 1 });
    }

    #[test]
    fn placement_is_deterministic_for_fixed_inputs() {
        let grid = open_grid(20, 15);
        let config = config_with(vec![
            EntityRequest::new("exit", 1, "far_from_player"),
            EntityRequest::new("enemy", 6, "spread"),
            EntityRequest::new("item", 3, "near_walls"),
        ]);
        let first = place_entities(&grid, &config, 42, &mut NullSink).expect("place");
        let second = place_entities(&grid, &config, 42, &mut NullSink).expect("place");
        assert_eq!(first, second);
    }

    #[test]
    fn every_entity_sits_on_a_walkable_tile() {
        let grid = open_grid(16, 12);
        let config = config_with(vec![
            EntityRequest::new("enemy", 8, "clustered"),
            EntityRequest::new("treasure", 4, "corners"),
        ]);
        let placed = place_entities(&grid, &config, 77, &mut NullSink).expect("place");
        for entity in &placed {
            assert!(grid.is_walkable_at(entity.pos), "{entity:?} on blocked tile");
        }
    }

    #[test]
    fn pairwise_distances_respect_the_request_minimum() {
        let grid = open_grid(24, 18);
        let mut request = EntityRequest::new("enemy", 10, "random");
        request.min_distance = 3.0;
        let placed =
            place_entities(&grid, &config_with(vec![request]), 123, &mut NullSink).expect("place");
        for (index, a) in placed.iter().enumerate() {
            for b in &placed[index + 1..] {
                let floor = if a.kind == EntityKind::Enemy && b.kind == EntityKind::Enemy {
                    3.0
                } else {
                    1.0
                };
                assert!(
                    a.pos.distance_to(b.pos) >= floor,
                    "{:?} and {:?} too close",
                    a.pos,
                    b.pos
                );
            }
        }
    }

    #[test]
    fn excessive_requests_degrade_to_a_partial_result() {
        let grid = open_grid(8, 8);
        let mut request = EntityRequest::new("enemy", 500, "random");
        request.min_distance = 2.5;
        let placed =
            place_entities(&grid, &config_with(vec![request]), 3, &mut NullSink).expect("place");
        // 6×6 interior cannot hold 500 entities at that spacing.
        assert!(placed.len() < 501);
        assert!(placed.len() > 1, "some enemies should still fit");
    }

    #[test]
    fn max_distance_from_player_bounds_the_spawn_ring() {
        let grid = open_grid(30, 30);
        let mut request = EntityRequest::new("npc", 6, "random");
        request.max_distance_from_player = Some(4.0);
        let placed =
            place_entities(&grid, &config_with(vec![request]), 8, &mut NullSink).expect("place");
        let player_pos = placed[0].pos;
        for entity in placed.iter().skip(1) {
            assert!(entity.pos.distance_to(player_pos) <= 4.0);
        }
    }

    #[test]
    fn far_from_player_prefers_distant_cells() {
        let grid = open_grid(20, 20);
        let config = config_with(vec![EntityRequest::new("exit", 1, "far_from_player")]);
        let placed = place_entities(&grid, &config, 21, &mut NullSink).expect("place");
        let player_pos = placed[0].pos;
        let exit_pos = placed[1].pos;
        // The exit must come from the top quartile of distances; the grid
        // center never qualifies.
        assert!(exit_pos.distance_to(player_pos) > 6.0);
    }

    #[test]
    fn near_walls_selects_cells_hugging_blocked_tiles() {
        let grid = open_grid(20, 20);
        let config = config_with(vec![EntityRequest::new("item", 5, "near_walls")]);
        let placed = place_entities(&grid, &config, 31, &mut NullSink).expect("place");
        for entity in placed.iter().skip(1) {
            assert!(has_blocked_moore_neighbor(&grid, entity.pos), "{entity:?}");
        }
    }

    #[test]
    fn clustered_entities_gather_after_the_first_anchor() {
        let grid = open_grid(30, 30);
        let config = config_with(vec![EntityRequest::new("enemy", 6, "clustered")]);
        let placed = place_entities(&grid, &config, 14, &mut NullSink).expect("place");
        let enemies: Vec<Pos> = placed
            .iter()
            .filter(|entity| entity.kind == EntityKind::Enemy)
            .map(|entity| entity.pos)
            .collect();
        assert_eq!(enemies.len(), 6);
        // Every enemy after the anchor sits inside a 7×7 window of another.
        for (index, &pos) in enemies.iter().enumerate().skip(1) {
            let near_another = enemies[..index].iter().any(|other| {
                (pos.x - other.x).abs() <= CLUSTER_WINDOW_RADIUS
                    && (pos.y - other.y).abs() <= CLUSTER_WINDOW_RADIUS
            });
            assert!(near_another, "enemy {index} at {pos:?} is isolated");
        }
    }

    #[test]
    fn unknown_entity_type_fails_fast() {
        let grid = open_grid(10, 10);
        let config = config_with(vec![EntityRequest::new("dragon", 1, "random")]);
        let result = place_entities(&grid, &config, 1, &mut NullSink);
        assert!(matches!(result, Err(GenerationError::InvalidArgument(_))));
    }

    #[test]
    fn unrecognized_strategy_falls_back_to_random_with_a_warning() {
        use crate::levelgen::events::RecordingSink;

        let grid = open_grid(12, 12);
        let config = config_with(vec![EntityRequest::new("item", 2, "diagonal")]);
        let mut sink = RecordingSink::new();
        let placed = place_entities(&grid, &config, 4, &mut sink).expect("place");
        assert_eq!(placed.len(), 3);
        assert!(sink.events.iter().any(|(severity, _)| *severity == Severity::Warning));
    }

    #[test]
    fn request_order_is_preserved_in_the_output() {
        let grid = open_grid(20, 20);
        let config = config_with(vec![
            EntityRequest::new("exit", 1, "far_from_player"),
            EntityRequest::new("enemy", 2, "random"),
            EntityRequest::new("item", 1, "random"),
        ]);
        let placed = place_entities(&grid, &config, 55, &mut NullSink).expect("place");
        let kinds: Vec<EntityKind> = placed.iter().map(|entity| entity.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EntityKind::Player,
                EntityKind::Exit,
                EntityKind::Enemy,
                EntityKind::Enemy,
                EntityKind::Item,
            ]
        );
    }
}
