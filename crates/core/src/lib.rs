pub mod levelgen;
pub mod types;

pub use levelgen::config::{EntityRequest, GenerationConfig};
pub use levelgen::error::GenerationError;
pub use levelgen::events::{GenerationSink, NullSink, Severity};
pub use levelgen::grid::Grid;
pub use levelgen::model::{Entity, Level};
pub use levelgen::validator::{DEFAULT_MIN_NAVIGABLE_AREA, LevelValidator, ValidationReport};
pub use levelgen::{algorithm_names, generate_level};
pub use types::*;
