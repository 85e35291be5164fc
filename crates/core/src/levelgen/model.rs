//! Public data models for assembled levels and placed entities.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::types::{EntityKind, Pos};

use super::grid::Grid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    pub kind: EntityKind,
    pub pos: Pos,
    /// Open property bag for downstream enrichment; the core never reads it.
    pub properties: BTreeMap<String, String>,
}

impl Entity {
    pub fn new(kind: EntityKind, pos: Pos) -> Self {
        Self { kind, pos, properties: BTreeMap::new() }
    }
}

/// The unit handed to downstream consumers. Immutable once assembled; the
/// metadata map carries statistics and is not semantically load-bearing.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub name: String,
    pub grid: Grid,
    pub entities: Vec<Entity>,
    pub metadata: BTreeMap<String, Value>,
}

impl Level {
    /// Stable byte serialization of everything semantically meaningful,
    /// for fingerprint comparisons. Metadata is derived data and excluded.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.grid.width() as u32).to_le_bytes());
        bytes.extend((self.grid.height() as u32).to_le_bytes());
        for tile in self.grid.tiles() {
            bytes.push(tile.code());
        }
        bytes.extend((self.entities.len() as u32).to_le_bytes());
        for entity in &self.entities {
            bytes.push(entity.kind.code());
            bytes.extend(entity.pos.y.to_le_bytes());
            bytes.extend(entity.pos.x.to_le_bytes());
        }
        bytes
    }
}
