//! Shared tile-space and entity primitives used across the generation pipeline.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn distance_to(self, other: Pos) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Terrain category of a single grid cell. Walkability is fixed per kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Empty,
    Ground,
    Wall,
    Water,
    Grass,
    Stone,
    Sand,
    Lava,
    Ice,
}

impl TileKind {
    pub const ALL: [TileKind; 9] = [
        TileKind::Empty,
        TileKind::Ground,
        TileKind::Wall,
        TileKind::Water,
        TileKind::Grass,
        TileKind::Stone,
        TileKind::Sand,
        TileKind::Lava,
        TileKind::Ice,
    ];

    pub fn is_walkable(self) -> bool {
        matches!(self, TileKind::Ground | TileKind::Grass | TileKind::Sand | TileKind::Ice)
    }

    pub fn name(self) -> &'static str {
        match self {
            TileKind::Empty => "empty",
            TileKind::Ground => "ground",
            TileKind::Wall => "wall",
            TileKind::Water => "water",
            TileKind::Grass => "grass",
            TileKind::Stone => "stone",
            TileKind::Sand => "sand",
            TileKind::Lava => "lava",
            TileKind::Ice => "ice",
        }
    }

    pub fn from_name(name: &str) -> Option<TileKind> {
        TileKind::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    pub fn code(self) -> u8 {
        match self {
            TileKind::Empty => 0,
            TileKind::Ground => 1,
            TileKind::Wall => 2,
            TileKind::Water => 3,
            TileKind::Grass => 4,
            TileKind::Stone => 5,
            TileKind::Sand => 6,
            TileKind::Lava => 7,
            TileKind::Ice => 8,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Exit,
    Enemy,
    Item,
    Npc,
    Treasure,
    Obstacle,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Player,
        EntityKind::Exit,
        EntityKind::Enemy,
        EntityKind::Item,
        EntityKind::Npc,
        EntityKind::Treasure,
        EntityKind::Obstacle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Player => "player",
            EntityKind::Exit => "exit",
            EntityKind::Enemy => "enemy",
            EntityKind::Item => "item",
            EntityKind::Npc => "npc",
            EntityKind::Treasure => "treasure",
            EntityKind::Obstacle => "obstacle",
        }
    }

    pub fn from_name(name: &str) -> Option<EntityKind> {
        EntityKind::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    pub fn code(self) -> u8 {
        match self {
            EntityKind::Player => 0,
            EntityKind::Exit => 1,
            EntityKind::Enemy => 2,
            EntityKind::Item => 3,
            EntityKind::Npc => 4,
            EntityKind::Treasure => 5,
            EntityKind::Obstacle => 6,
        }
    }
}

/// Candidate-selection rule applied by the placer once constraints filtered
/// the candidate set. Unrecognized tags resolve to `Random`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlacementStrategy {
    Random,
    Clustered,
    Spread,
    NearWalls,
    Center,
    FarFromPlayer,
    Corners,
}

impl PlacementStrategy {
    pub fn from_tag(tag: &str) -> Option<PlacementStrategy> {
        match tag {
            "random" => Some(PlacementStrategy::Random),
            "clustered" => Some(PlacementStrategy::Clustered),
            "spread" => Some(PlacementStrategy::Spread),
            "near_walls" => Some(PlacementStrategy::NearWalls),
            "center" => Some(PlacementStrategy::Center),
            "far_from_player" => Some(PlacementStrategy::FarFromPlayer),
            "corners" => Some(PlacementStrategy::Corners),
            _ => None,
        }
    }
}
