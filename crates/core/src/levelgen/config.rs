//! External configuration records consumed by the pipeline.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::TileKind;

/// One batch of entities to place. Requests are honored in list order, so
/// earlier requests constrain later ones through the distance rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: usize,
    pub strategy: String,
    pub min_distance: f64,
    pub max_distance_from_player: Option<f64>,
    pub properties: BTreeMap<String, String>,
}

impl Default for EntityRequest {
    fn default() -> Self {
        Self {
            kind: String::new(),
            count: 1,
            strategy: "random".to_owned(),
            min_distance: 1.0,
            max_distance_from_player: None,
            properties: BTreeMap::new(),
        }
    }
}

impl EntityRequest {
    pub fn new(kind: &str, count: usize, strategy: &str) -> Self {
        Self { kind: kind.to_owned(), count, strategy: strategy.to_owned(), ..Self::default() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    pub algorithm: String,
    pub parameters: BTreeMap<String, Value>,
    /// Terrain kind names the generator may emit; empty means all kinds.
    pub terrain_kinds: Vec<String>,
    pub entity_requests: Vec<EntityRequest>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 30,
            seed: 0,
            algorithm: "perlin".to_owned(),
            parameters: BTreeMap::new(),
            terrain_kinds: Vec::new(),
            entity_requests: Vec::new(),
        }
    }
}

impl GenerationConfig {
    /// Resolve the allowed terrain-kind set. Unknown names are advisory
    /// problems, not errors; an empty list allows every kind.
    pub fn allowed_kinds(&self) -> (BTreeSet<TileKind>, Vec<String>) {
        let mut problems = Vec::new();
        if self.terrain_kinds.is_empty() {
            return (TileKind::ALL.iter().copied().collect(), problems);
        }
        let mut allowed = BTreeSet::new();
        for name in &self.terrain_kinds {
            match TileKind::from_name(name) {
                Some(kind) => {
                    allowed.insert(kind);
                }
                None => problems.push(format!("unknown terrain kind '{name}' ignored")),
            }
        }
        if allowed.is_empty() {
            allowed = TileKind::ALL.iter().copied().collect();
            problems.push("no recognizable terrain kinds; allowing all".to_owned());
        }
        (allowed, problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_json() {
        let mut config = GenerationConfig {
            width: 24,
            height: 18,
            seed: 7,
            algorithm: "cellular".to_owned(),
            ..GenerationConfig::default()
        };
        config.parameters.insert("iterations".to_owned(), Value::from(6));
        config.entity_requests.push(EntityRequest::new("enemy", 4, "spread"));

        let text = serde_json::to_string(&config).expect("serialize");
        let back: GenerationConfig = serde_json::from_str(&text).expect("deserialize");
        assert_eq!(back, config);
    }

    #[test]
    fn request_type_field_uses_the_external_name() {
        let request: EntityRequest =
            serde_json::from_str(r#"{"type":"exit","count":1,"strategy":"far_from_player"}"#)
                .expect("deserialize");
        assert_eq!(request.kind, "exit");
        assert_eq!(request.min_distance, 1.0);
        assert_eq!(request.max_distance_from_player, None);
    }

    #[test]
    fn empty_terrain_kind_list_allows_everything() {
        let config = GenerationConfig::default();
        let (allowed, problems) = config.allowed_kinds();
        assert_eq!(allowed.len(), TileKind::ALL.len());
        assert!(problems.is_empty());
    }

    #[test]
    fn unknown_terrain_kind_is_reported_not_fatal() {
        let config = GenerationConfig {
            terrain_kinds: vec!["ground".to_owned(), "quicksand".to_owned()],
            ..GenerationConfig::default()
        };
        let (allowed, problems) = config.allowed_kinds();
        assert!(allowed.contains(&TileKind::Ground));
        assert_eq!(allowed.len(), 1);
        assert_eq!(problems.len(), 1);
    }
}
