//! Procedural level generation domain split into coherent submodules.

pub mod assembler;
pub mod config;
pub mod error;
pub mod events;
pub mod grid;
pub mod model;
pub mod params;
pub mod placement;
pub mod rng;
pub mod terrain;
pub mod validator;

use std::time::Instant;

use config::GenerationConfig;
use error::GenerationError;
use events::{GenerationSink, Severity};
use model::Level;

pub use assembler::assemble_level;
pub use placement::place_entities;
pub use terrain::{TerrainAlgorithm, algorithm_by_name, algorithm_names, generate_terrain};

/// Run the whole pipeline: terrain, placement, assembly.
///
/// Terrain and placement both reseed from `config.seed`, so each phase is
/// reproducible on its own with the same seed value. The sink receives
/// parameter warnings and per-phase timings; generation output is identical
/// with or without one attached.
pub fn generate_level(
    config: &GenerationConfig,
    sink: &mut dyn GenerationSink,
) -> Result<Level, GenerationError> {
    if config.width < 3 || config.height < 3 {
        return Err(GenerationError::InvalidArgument(format!(
            "grid must be at least 3x3, got {}x{}",
            config.width, config.height
        )));
    }
    let algorithm = algorithm_by_name(&config.algorithm).ok_or_else(|| {
        GenerationError::InvalidArgument(format!("unknown algorithm '{}'", config.algorithm))
    })?;

    let (allowed, kind_problems) = config.allowed_kinds();
    let problems = algorithm.validate_params(&config.parameters);
    for problem in kind_problems.iter().chain(problems.iter()) {
        sink.event(
            Severity::Warning,
            problem,
            &[("algorithm", config.algorithm.clone()), ("seed", config.seed.to_string())],
        );
    }

    let terrain_started = Instant::now();
    let grid = generate_terrain(
        algorithm,
        config.width,
        config.height,
        config.seed,
        &config.parameters,
        &allowed,
        sink,
    );
    let walkable = grid.tiles().iter().filter(|tile| tile.is_walkable()).count();
    sink.timing(
        "terrain_generation",
        terrain_started.elapsed(),
        &[("walkableTiles", walkable as f64)],
    );

    let placement_started = Instant::now();
    let entities = place_entities(&grid, config, config.seed, sink)?;
    sink.timing(
        "entity_placement",
        placement_started.elapsed(),
        &[("entities", entities.len() as f64)],
    );

    assemble_level(grid, entities, config)
}

#[cfg(test)]
mod tests {
    use super::config::EntityRequest;
    use super::events::{NullSink, RecordingSink};
    use super::*;

    #[test]
    fn rejects_degenerate_dimensions() {
        let config = GenerationConfig { width: 2, height: 40, ..GenerationConfig::default() };
        let result = generate_level(&config, &mut NullSink);
        assert!(matches!(result, Err(GenerationError::InvalidArgument(_))));
    }

    #[test]
    fn rejects_unknown_algorithm() {
        let config =
            GenerationConfig { algorithm: "wavefunction".to_owned(), ..GenerationConfig::default() };
        let result = generate_level(&config, &mut NullSink);
        assert!(matches!(result, Err(GenerationError::InvalidArgument(_))));
    }

    #[test]
    fn sink_receives_phase_timings() {
        let config = GenerationConfig::default();
        let mut sink = RecordingSink::new();
        generate_level(&config, &mut sink).expect("generate");
        assert_eq!(sink.timings, vec!["terrain_generation", "entity_placement"]);
    }

    #[test]
    fn output_is_identical_with_and_without_a_sink() {
        let config = GenerationConfig {
            seed: 314,
            entity_requests: vec![
                EntityRequest::new("exit", 1, "far_from_player"),
                EntityRequest::new("enemy", 5, "spread"),
            ],
            ..GenerationConfig::default()
        };
        let silent = generate_level(&config, &mut NullSink).expect("generate");
        let mut sink = RecordingSink::new();
        let observed = generate_level(&config, &mut sink).expect("generate");
        assert_eq!(silent, observed);
    }

    #[test]
    fn parameter_problems_are_warnings_not_errors() {
        let mut config = GenerationConfig::default();
        config.parameters.insert("octaves".to_owned(), serde_json::Value::from(99));
        let mut sink = RecordingSink::new();
        let level = generate_level(&config, &mut sink).expect("generation proceeds on defaults");
        assert!(level.grid.area() > 0);
        assert!(sink.events.iter().any(|(severity, _)| *severity == Severity::Warning));
    }
}
