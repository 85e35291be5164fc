//! Typed per-algorithm parameter records resolved from the untyped config map.
//!
//! Validation is advisory: problems come back as human-readable strings and
//! generation always proceeds, substituting the documented default for any
//! missing or invalid value.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::types::TileKind;

pub type ParamMap = BTreeMap<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerlinParams {
    pub scale: f64,
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
    pub water_level: f64,
    pub mountain_level: f64,
}

impl Default for PerlinParams {
    fn default() -> Self {
        Self {
            scale: 0.1,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            water_level: 0.3,
            mountain_level: 0.7,
        }
    }
}

impl PerlinParams {
    pub const KEYS: [&'static str; 6] =
        ["scale", "octaves", "persistence", "lacunarity", "waterLevel", "mountainLevel"];

    pub fn resolve(map: &ParamMap) -> Self {
        let defaults = Self::default();
        Self {
            scale: resolve_f64(map, "scale", defaults.scale, |v| v > 0.0 && v <= 1.0),
            octaves: resolve_u32(map, "octaves", defaults.octaves, 1, 10),
            persistence: resolve_f64(map, "persistence", defaults.persistence, unit_range),
            lacunarity: resolve_f64(map, "lacunarity", defaults.lacunarity, |v| {
                (1.0..=4.0).contains(&v)
            }),
            water_level: resolve_f64(map, "waterLevel", defaults.water_level, unit_range),
            mountain_level: resolve_f64(map, "mountainLevel", defaults.mountain_level, unit_range),
        }
    }

    pub fn validate(map: &ParamMap) -> Vec<String> {
        let mut problems = Vec::new();
        report_unknown_keys(map, &Self::KEYS, &mut problems);
        report_number_range(map, "scale", "(0, 1]", |v| v > 0.0 && v <= 1.0, &mut problems);
        report_number_range(map, "octaves", "[1, 10]", |v| (1.0..=10.0).contains(&v), &mut problems);
        report_number_range(map, "persistence", "[0, 1]", unit_range, &mut problems);
        report_number_range(map, "lacunarity", "[1, 4]", |v| (1.0..=4.0).contains(&v), &mut problems);
        report_number_range(map, "waterLevel", "[0, 1]", unit_range, &mut problems);
        report_number_range(map, "mountainLevel", "[0, 1]", unit_range, &mut problems);

        let resolved = Self::resolve(map);
        if resolved.water_level >= resolved.mountain_level {
            problems.push(format!(
                "waterLevel {} should be below mountainLevel {}",
                resolved.water_level, resolved.mountain_level
            ));
        }
        problems
    }

    pub fn default_map() -> ParamMap {
        let defaults = Self::default();
        let mut map = ParamMap::new();
        map.insert("scale".to_owned(), json_number(defaults.scale));
        map.insert("octaves".to_owned(), Value::from(defaults.octaves));
        map.insert("persistence".to_owned(), json_number(defaults.persistence));
        map.insert("lacunarity".to_owned(), json_number(defaults.lacunarity));
        map.insert("waterLevel".to_owned(), json_number(defaults.water_level));
        map.insert("mountainLevel".to_owned(), json_number(defaults.mountain_level));
        map
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellularParams {
    pub initial_fill_probability: f64,
    pub iterations: u32,
    pub birth_limit: u32,
    pub death_limit: u32,
    pub wall_kind: TileKind,
    pub floor_kind: TileKind,
}

impl Default for CellularParams {
    fn default() -> Self {
        Self {
            initial_fill_probability: 0.45,
            iterations: 5,
            birth_limit: 4,
            death_limit: 3,
            wall_kind: TileKind::Wall,
            floor_kind: TileKind::Ground,
        }
    }
}

impl CellularParams {
    pub const KEYS: [&'static str; 6] = [
        "initialFillProbability",
        "iterations",
        "birthLimit",
        "deathLimit",
        "wallTile",
        "floorTile",
    ];

    /// Floor regions smaller than this are filled back in during cleanup.
    pub const MIN_REGION_AREA: usize = 10;

    pub fn resolve(map: &ParamMap) -> Self {
        let defaults = Self::default();
        Self {
            initial_fill_probability: resolve_f64(
                map,
                "initialFillProbability",
                defaults.initial_fill_probability,
                unit_range,
            ),
            iterations: resolve_u32(map, "iterations", defaults.iterations, 1, 20),
            birth_limit: resolve_u32(map, "birthLimit", defaults.birth_limit, 0, 8),
            death_limit: resolve_u32(map, "deathLimit", defaults.death_limit, 0, 8),
            wall_kind: resolve_kind(map, "wallTile", defaults.wall_kind),
            floor_kind: resolve_kind(map, "floorTile", defaults.floor_kind),
        }
    }

    pub fn validate(map: &ParamMap) -> Vec<String> {
        let mut problems = Vec::new();
        report_unknown_keys(map, &Self::KEYS, &mut problems);
        report_number_range(map, "initialFillProbability", "[0, 1]", unit_range, &mut problems);
        report_number_range(
            map,
            "iterations",
            "[1, 20]",
            |v| (1.0..=20.0).contains(&v),
            &mut problems,
        );
        report_number_range(map, "birthLimit", "[0, 8]", |v| (0.0..=8.0).contains(&v), &mut problems);
        report_number_range(map, "deathLimit", "[0, 8]", |v| (0.0..=8.0).contains(&v), &mut problems);
        report_kind(map, "wallTile", &mut problems);
        report_kind(map, "floorTile", &mut problems);
        problems
    }

    pub fn default_map() -> ParamMap {
        let defaults = Self::default();
        let mut map = ParamMap::new();
        map.insert(
            "initialFillProbability".to_owned(),
            json_number(defaults.initial_fill_probability),
        );
        map.insert("iterations".to_owned(), Value::from(defaults.iterations));
        map.insert("birthLimit".to_owned(), Value::from(defaults.birth_limit));
        map.insert("deathLimit".to_owned(), Value::from(defaults.death_limit));
        map.insert("wallTile".to_owned(), Value::from(defaults.wall_kind.name()));
        map.insert("floorTile".to_owned(), Value::from(defaults.floor_kind.name()));
        map
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MazeVariant {
    RecursiveBacktracking,
    Simple,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MazeParams {
    pub variant: MazeVariant,
    /// Set when an accepted-but-unimplemented variant name (kruskal, prim)
    /// fell back to recursive backtracking.
    pub fallback_from: Option<String>,
    pub complexity: f64,
    pub density: f64,
    pub braiding_factor: f64,
    pub wall_kind: TileKind,
    pub path_kind: TileKind,
}

impl Default for MazeParams {
    fn default() -> Self {
        Self {
            variant: MazeVariant::RecursiveBacktracking,
            fallback_from: None,
            complexity: 0.5,
            density: 0.5,
            braiding_factor: 0.0,
            wall_kind: TileKind::Wall,
            path_kind: TileKind::Ground,
        }
    }
}

impl MazeParams {
    pub const KEYS: [&'static str; 6] =
        ["algorithm", "complexity", "density", "braidingFactor", "wallTile", "pathTile"];

    pub const VARIANT_NAMES: [&'static str; 4] =
        ["recursive_backtracking", "simple", "kruskal", "prim"];

    pub fn resolve(map: &ParamMap) -> Self {
        let defaults = Self::default();
        let (variant, fallback_from) = match map.get("algorithm").and_then(Value::as_str) {
            Some("simple") => (MazeVariant::Simple, None),
            Some(name @ ("kruskal" | "prim")) => {
                (MazeVariant::RecursiveBacktracking, Some(name.to_owned()))
            }
            _ => (MazeVariant::RecursiveBacktracking, None),
        };
        Self {
            variant,
            fallback_from,
            complexity: resolve_f64(map, "complexity", defaults.complexity, unit_range),
            density: resolve_f64(map, "density", defaults.density, unit_range),
            braiding_factor: resolve_f64(map, "braidingFactor", defaults.braiding_factor, unit_range),
            wall_kind: resolve_kind(map, "wallTile", defaults.wall_kind),
            path_kind: resolve_kind(map, "pathTile", defaults.path_kind),
        }
    }

    pub fn validate(map: &ParamMap) -> Vec<String> {
        let mut problems = Vec::new();
        report_unknown_keys(map, &Self::KEYS, &mut problems);
        if let Some(value) = map.get("algorithm") {
            match value.as_str() {
                Some(name) if Self::VARIANT_NAMES.contains(&name) => {}
                Some(name) => problems.push(format!(
                    "maze algorithm '{name}' is not recognized; using recursive_backtracking"
                )),
                None => problems.push("maze algorithm must be a string".to_owned()),
            }
        }
        report_number_range(map, "complexity", "[0, 1]", unit_range, &mut problems);
        report_number_range(map, "density", "[0, 1]", unit_range, &mut problems);
        report_number_range(map, "braidingFactor", "[0, 1]", unit_range, &mut problems);
        report_kind(map, "wallTile", &mut problems);
        report_kind(map, "pathTile", &mut problems);
        problems
    }

    pub fn default_map() -> ParamMap {
        let defaults = Self::default();
        let mut map = ParamMap::new();
        map.insert("algorithm".to_owned(), Value::from("recursive_backtracking"));
        map.insert("complexity".to_owned(), json_number(defaults.complexity));
        map.insert("density".to_owned(), json_number(defaults.density));
        map.insert("braidingFactor".to_owned(), json_number(defaults.braiding_factor));
        map.insert("wallTile".to_owned(), Value::from(defaults.wall_kind.name()));
        map.insert("pathTile".to_owned(), Value::from(defaults.path_kind.name()));
        map
    }
}

fn unit_range(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

fn json_number(value: f64) -> Value {
    serde_json::Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

fn number_at(map: &ParamMap, key: &str) -> Option<f64> {
    map.get(key).and_then(Value::as_f64)
}

fn resolve_f64(map: &ParamMap, key: &str, default: f64, in_range: impl Fn(f64) -> bool) -> f64 {
    match number_at(map, key) {
        Some(value) if in_range(value) => value,
        _ => default,
    }
}

fn resolve_u32(map: &ParamMap, key: &str, default: u32, min: u32, max: u32) -> u32 {
    match number_at(map, key) {
        Some(value) if value >= f64::from(min) && value <= f64::from(max) => value.round() as u32,
        _ => default,
    }
}

fn resolve_kind(map: &ParamMap, key: &str, default: TileKind) -> TileKind {
    map.get(key).and_then(Value::as_str).and_then(TileKind::from_name).unwrap_or(default)
}

fn report_unknown_keys(map: &ParamMap, known: &[&str], problems: &mut Vec<String>) {
    for key in map.keys() {
        if !known.contains(&key.as_str()) {
            problems.push(format!("unknown parameter '{key}'"));
        }
    }
}

fn report_number_range(
    map: &ParamMap,
    key: &str,
    range_text: &str,
    in_range: impl Fn(f64) -> bool,
    problems: &mut Vec<String>,
) {
    let Some(value) = map.get(key) else { return };
    match value.as_f64() {
        Some(number) if in_range(number) => {}
        Some(number) => {
            problems.push(format!("parameter '{key}' = {number} is outside {range_text}"));
        }
        None => problems.push(format!("parameter '{key}' must be a number")),
    }
}

fn report_kind(map: &ParamMap, key: &str, problems: &mut Vec<String>) {
    let Some(value) = map.get(key) else { return };
    match value.as_str() {
        Some(name) if TileKind::from_name(name).is_some() => {}
        Some(name) => problems.push(format!("parameter '{key}' names unknown tile kind '{name}'")),
        None => problems.push(format!("parameter '{key}' must be a tile kind name")),
    }
}
