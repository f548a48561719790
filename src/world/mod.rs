//! Read-only snapshot of the game state a query runs against.
//!
//! The hosting game owns the live object graph; the engine only ever sees an
//! immutable `GameState` and never mutates it. Everything derives serde so
//! snapshots can be loaded from JSON fixtures.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A position on a map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThingId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldObjectId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Player,
    Neutral,
    Hostile,
    Wild,
}

/// Pawn-specific data: kind labels for matching, faction for the colony
/// filter, containment for the enclosure filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PawnInfo {
    pub kind_label: String,
    pub kind_def_label: String,
    pub faction: Faction,
    #[serde(default)]
    pub in_container: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ThingKind {
    Item {
        #[serde(default)]
        haulable: bool,
    },
    Pawn(PawnInfo),
}

/// A placed physical object on a map. Pawns are things with a `Pawn` kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thing {
    pub id: ThingId,
    pub label: String,
    pub position: Cell,
    pub kind: ThingKind,
}

impl Thing {
    pub fn as_pawn(&self) -> Option<&PawnInfo> {
        match &self.kind {
            ThingKind::Pawn(pawn) => Some(pawn),
            ThingKind::Item { .. } => None,
        }
    }

    pub fn is_pawn(&self) -> bool {
        self.as_pawn().is_some()
    }

    pub fn is_haulable(&self) -> bool {
        matches!(self.kind, ThingKind::Item { haulable: true })
    }

    /// Whether the entity is enclosed inside a container. Items trivially
    /// count as not contained.
    pub fn is_contained(&self) -> bool {
        self.as_pawn().is_some_and(|pawn| pawn.in_container)
    }
}

/// A bounded local area. `fog` holds the cells currently hidden from the
/// player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    pub id: MapId,
    pub name: String,
    #[serde(default)]
    pub fog: HashSet<Cell>,
    #[serde(default)]
    pub things: Vec<Thing>,
}

impl Map {
    pub fn is_fogged(&self, cell: Cell) -> bool {
        self.fog.contains(&cell)
    }

    pub fn pawns(&self) -> impl Iterator<Item = &Thing> {
        self.things.iter().filter(|thing| thing.is_pawn())
    }

    pub fn haulables(&self) -> impl Iterator<Item = &Thing> {
        self.things.iter().filter(|thing| thing.is_haulable())
    }
}

/// An entity on the planet-level collection rather than on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub id: WorldObjectId,
    pub label: String,
    pub tile: u32,
}

/// Where a result entity lives, for the rendering layer's go-to and select
/// actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JumpTarget {
    MapCell { map: MapId, cell: Cell },
    WorldTile { tile: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    #[serde(default)]
    pub maps: Vec<Map>,
    #[serde(default)]
    pub current_map: Option<MapId>,
    #[serde(default)]
    pub world_objects: Vec<WorldObject>,
}

impl GameState {
    pub fn map(&self, id: MapId) -> Option<&Map> {
        self.maps.iter().find(|map| map.id == id)
    }

    /// The currently visible map, if any. Zero loaded maps is a valid state.
    pub fn active_map(&self) -> Option<&Map> {
        self.current_map.and_then(|id| self.map(id))
    }

    pub fn thing(&self, id: ThingId) -> Option<(&Map, &Thing)> {
        self.maps.iter().find_map(|map| {
            map.things
                .iter()
                .find(|thing| thing.id == id)
                .map(|thing| (map, thing))
        })
    }

    pub fn world_object(&self, id: WorldObjectId) -> Option<&WorldObject> {
        self.world_objects.iter().find(|object| object.id == id)
    }

    pub fn jump_target_for_thing(&self, id: ThingId) -> Option<JumpTarget> {
        self.thing(id).map(|(map, thing)| JumpTarget::MapCell {
            map: map.id,
            cell: thing.position,
        })
    }

    pub fn jump_target_for_world_object(&self, id: WorldObjectId) -> Option<JumpTarget> {
        self.world_object(id)
            .map(|object| JumpTarget::WorldTile { tile: object.tile })
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        serde_json::from_reader(reader).context("invalid world snapshot")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open world snapshot {}", path.display()))?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse world snapshot {}", path.display()))
    }
}
