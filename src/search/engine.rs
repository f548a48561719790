use std::collections::HashSet;
use std::time::{Duration, Instant};

use colored::Colorize;
use tracing::debug;

use crate::query::predicate::{chain_accepts, world_chain_accepts};
use crate::query::{CompiledQuery, compile_query, parse_query};
use crate::world::{GameState, Map, ThingId, WorldObjectId};

/// The three result sets of one evaluation. Pawns and things come from
/// disjoint enumerations, so a matching pawn never shows up among things.
/// Sets hold entity identities; resolve against the snapshot for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub things: HashSet<ThingId>,
    pub pawns: HashSet<ThingId>,
    pub world_objects: HashSet<WorldObjectId>,
}

impl SearchResults {
    pub fn len(&self) -> usize {
        self.things.len() + self.pawns.len() + self.world_objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.things.is_empty() && self.pawns.is_empty() && self.world_objects.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchEngine;

impl SearchEngine {
    pub fn new() -> Self {
        Self
    }

    /// Parse, compile and evaluate in one synchronous call. This is the entry
    /// point the hosting UI invokes when its debounce elapses; each call
    /// rebuilds the result sets wholesale.
    pub fn search(&self, raw: &str, state: &GameState) -> (SearchResults, Duration) {
        let query = parse_query(raw);
        let compiled = compile_query(&query);

        let started = Instant::now();
        let results = self.evaluate(&compiled, state);
        let elapsed = started.elapsed();

        debug!(
            pawns = results.pawns.len(),
            things = results.things.len(),
            world_objects = results.world_objects.len(),
            ?elapsed,
            "query evaluated"
        );

        (results, elapsed)
    }

    /// Evaluate compiled predicates against a snapshot. Stateless single
    /// pass; no active map with `all_maps` unset yields empty sets, not an
    /// error.
    pub fn evaluate(&self, compiled: &CompiledQuery, state: &GameState) -> SearchResults {
        let mut results = SearchResults::default();

        if compiled.query.all_maps {
            for map in &state.maps {
                self.evaluate_map(compiled, map, &mut results);
            }
        } else if let Some(map) = state.active_map() {
            self.evaluate_map(compiled, map, &mut results);
        }

        if compiled.query.world_map {
            for world_object in &state.world_objects {
                if world_chain_accepts(&compiled.world_chain, world_object) {
                    results.world_objects.insert(world_object.id);
                }
            }
        }

        results
    }

    fn evaluate_map(&self, compiled: &CompiledQuery, map: &Map, results: &mut SearchResults) {
        if compiled.query.pawns {
            for pawn in map.pawns() {
                if chain_accepts(&compiled.thing_chain, map, pawn) {
                    results.pawns.insert(pawn.id);
                }
            }
        }

        if compiled.query.items {
            for thing in map.haulables() {
                if chain_accepts(&compiled.thing_chain, map, thing) {
                    results.things.insert(thing.id);
                }
            }
        }
    }
}

/// Format a map-thing result for one-shot CLI output.
pub fn format_thing_result(state: &GameState, id: ThingId, use_color: bool) -> Option<String> {
    let (map, thing) = state.thing(id)?;
    let detail = match thing.as_pawn() {
        Some(pawn) => pawn.kind_label.clone(),
        None => "item".to_string(),
    };
    let location = format!("{} ({}, {})", map.name, thing.position.x, thing.position.z);

    Some(if use_color {
        format!(
            "{} {} [{}]",
            thing.label.bright_yellow(),
            detail.dimmed(),
            location.bright_green()
        )
    } else {
        format!("{} {} [{}]", thing.label, detail, location)
    })
}

/// Format a planet-location result for one-shot CLI output.
pub fn format_world_result(state: &GameState, id: WorldObjectId, use_color: bool) -> Option<String> {
    let object = state.world_object(id)?;
    let location = format!("tile {}", object.tile);

    Some(if use_color {
        format!("{} [{}]", object.label.bright_yellow(), location.bright_green())
    } else {
        format!("{} [{}]", object.label, location)
    })
}
