//! Playability validation: connectivity, essential entities, and a heuristic
//! quality score.

use crate::types::EntityKind;

use super::model::Level;

/// Minimum size of the largest connected walkable component for a level to
/// count as navigable. Deliberately overridable; the default is the bar used
/// by the stock pipeline.
pub const DEFAULT_MIN_NAVIGABLE_AREA: usize = 100;

/// Target band for entities-per-walkable-tile in the quality score.
const DENSITY_BAND: (f64, f64) = (0.02, 0.10);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
}

pub struct LevelValidator {
    min_navigable_area: usize,
}

impl Default for LevelValidator {
    fn default() -> Self {
        Self { min_navigable_area: DEFAULT_MIN_NAVIGABLE_AREA }
    }
}

impl LevelValidator {
    pub fn with_min_navigable_area(min_navigable_area: usize) -> Self {
        Self { min_navigable_area }
    }

    /// Collect every playability issue. Findings are returned, never thrown;
    /// callers decide whether to reject, regenerate, or accept with warnings.
    pub fn validate(&self, level: &Level) -> ValidationReport {
        let mut issues = Vec::new();

        let largest = level.grid.largest_walkable_component();
        if largest < self.min_navigable_area {
            issues.push(format!(
                "largest walkable region has {largest} tiles, need {}",
                self.min_navigable_area
            ));
        }

        if !level.entities.iter().any(|entity| entity.kind == EntityKind::Player) {
            issues.push("no player entity".to_owned());
        }
        if !level.entities.iter().any(|entity| entity.kind == EntityKind::Exit) {
            issues.push("no exit entity".to_owned());
        }

        for entity in &level.entities {
            if !level.grid.is_walkable_at(entity.pos) {
                issues.push(format!(
                    "{} at ({}, {}) sits on non-walkable {}",
                    entity.kind.name(),
                    entity.pos.x,
                    entity.pos.y,
                    level.grid.tile_at(entity.pos).name()
                ));
            }
        }

        ValidationReport { is_valid: issues.is_empty(), issues }
    }

    pub fn is_playable(&self, level: &Level) -> bool {
        self.validate(level).is_valid
    }

    /// Heuristic in [0, 1]: weighted navigability, entity variety, and
    /// entity density within the target band. A signal, not a gate.
    pub fn evaluate_quality(&self, level: &Level) -> f64 {
        let area = level.grid.area();
        if area == 0 {
            return 0.0;
        }
        let walkable =
            level.grid.tiles().iter().filter(|tile| tile.is_walkable()).count();
        let navigability = walkable as f64 / area as f64;

        let distinct: std::collections::BTreeSet<_> =
            level.entities.iter().map(|entity| entity.kind).collect();
        let variety = distinct.len() as f64 / EntityKind::ALL.len() as f64;

        let density_score = if walkable == 0 {
            0.0
        } else {
            let density = level.entities.len() as f64 / walkable as f64;
            let (low, high) = DENSITY_BAND;
            if (low..=high).contains(&density) {
                1.0
            } else if density < low {
                density / low
            } else {
                (high / density).min(1.0)
            }
        };

        (navigability * 0.4 + variety * 0.3 + density_score * 0.3).clamp(0.0, 1.0)
    }
}
