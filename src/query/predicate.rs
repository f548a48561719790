//! Predicate compilation.
//!
//! A `ParsedQuery` compiles into explicit, ordered predicate chains instead of
//! capturing closures, so a chain can be inspected and tested without running
//! an evaluation. Acceptance is logical AND with short-circuit evaluation.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::query::parser::ParsedQuery;
use crate::world::{Faction, Map, Thing, WorldObject};

/// One test against a map thing (pawn or item).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ThingPredicate {
    /// Rejects things on fogged cells. Always first in the chain so a query
    /// can never leak state the player should not see.
    Visible,
    /// Case-insensitive substring on the thing label; pawns also match on
    /// their kind label and kind definition label. `needle` is stored
    /// lowercased.
    LabelMatch { needle: String },
    /// Pawns must belong to the player faction; non-pawns pass.
    ColonyOnly,
    /// Rejects things enclosed inside a container. Always last.
    NotContained,
}

impl ThingPredicate {
    pub fn accepts(&self, map: &Map, thing: &Thing) -> bool {
        match self {
            ThingPredicate::Visible => !map.is_fogged(thing.position),
            ThingPredicate::LabelMatch { needle } => {
                if let Some(pawn) = thing.as_pawn() {
                    if pawn.kind_label.to_lowercase().contains(needle) {
                        return true;
                    }
                    if pawn.kind_def_label.to_lowercase().contains(needle) {
                        return true;
                    }
                }
                thing.label.to_lowercase().contains(needle)
            }
            ThingPredicate::ColonyOnly => thing
                .as_pawn()
                .is_none_or(|pawn| pawn.faction == Faction::Player),
            ThingPredicate::NotContained => !thing.is_contained(),
        }
    }
}

/// One test against a planet location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorldPredicate {
    Always,
    /// Case-sensitive, unlike the thing label match. Intentional: planet
    /// locations have always compared labels exactly, and the asymmetry is
    /// pinned by test rather than silently unified.
    LabelContains { needle: String },
}

impl WorldPredicate {
    pub fn accepts(&self, world_object: &WorldObject) -> bool {
        match self {
            WorldPredicate::Always => true,
            WorldPredicate::LabelContains { needle } => world_object.label.contains(needle),
        }
    }
}

pub type ThingChain = SmallVec<[ThingPredicate; 4]>;
pub type WorldChain = SmallVec<[WorldPredicate; 1]>;

/// A query plus the predicate chains compiled from it. Pure function of the
/// `ParsedQuery`; the flags ride along because evaluation needs them for
/// map/collection selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    pub query: ParsedQuery,
    pub thing_chain: ThingChain,
    pub world_chain: WorldChain,
}

/// Compile a parsed query into predicate chains. Never fails; every query has
/// a defined chain.
pub fn compile_query(query: &ParsedQuery) -> CompiledQuery {
    let mut thing_chain = ThingChain::new();
    let mut world_chain = WorldChain::new();

    if query.match_all {
        // `*` keeps only the visibility filter; label, colony and containment
        // filters are all bypassed.
        thing_chain.push(ThingPredicate::Visible);
        world_chain.push(WorldPredicate::Always);
    } else {
        thing_chain.push(ThingPredicate::Visible);
        if !query.label.is_empty() {
            thing_chain.push(ThingPredicate::LabelMatch {
                needle: query.label.to_lowercase(),
            });
            world_chain.push(WorldPredicate::LabelContains {
                needle: query.label.clone(),
            });
        }
        if query.colony_only {
            thing_chain.push(ThingPredicate::ColonyOnly);
        }
        thing_chain.push(ThingPredicate::NotContained);
    }

    CompiledQuery {
        query: query.clone(),
        thing_chain,
        world_chain,
    }
}

/// Short-circuit AND over a thing chain: a candidate is accepted only if
/// every predicate holds.
pub fn chain_accepts(chain: &[ThingPredicate], map: &Map, thing: &Thing) -> bool {
    chain.iter().all(|predicate| predicate.accepts(map, thing))
}

/// Short-circuit AND over a world chain.
pub fn world_chain_accepts(chain: &[WorldPredicate], world_object: &WorldObject) -> bool {
    chain.iter().all(|predicate| predicate.accepts(world_object))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parser::parse_query;
    use crate::world::{Cell, MapId, PawnInfo, ThingId, ThingKind, WorldObjectId};
    use std::collections::HashSet;

    fn empty_map() -> Map {
        Map {
            id: MapId(0),
            name: "Colony".to_string(),
            fog: HashSet::new(),
            things: Vec::new(),
        }
    }

    fn trader(label: &str) -> Thing {
        Thing {
            id: ThingId(1),
            label: label.to_string(),
            position: Cell { x: 0, z: 0 },
            kind: ThingKind::Pawn(PawnInfo {
                kind_label: "Trader".to_string(),
                kind_def_label: "orbital trader".to_string(),
                faction: Faction::Neutral,
                in_container: false,
            }),
        }
    }

    fn chunk() -> Thing {
        Thing {
            id: ThingId(2),
            label: "Steel Chunk".to_string(),
            position: Cell { x: 3, z: 3 },
            kind: ThingKind::Item { haulable: true },
        }
    }

    #[test]
    fn test_default_chain_is_visible_then_not_contained() {
        let compiled = compile_query(&parse_query("-."));
        assert_eq!(
            compiled.thing_chain.as_slice(),
            &[ThingPredicate::Visible, ThingPredicate::NotContained]
        );
        assert!(compiled.world_chain.is_empty());
    }

    #[test]
    fn test_label_chain_order() {
        let compiled = compile_query(&parse_query("-#Joe"));
        assert_eq!(
            compiled.thing_chain.as_slice(),
            &[
                ThingPredicate::Visible,
                ThingPredicate::LabelMatch {
                    needle: "joe".to_string()
                },
                ThingPredicate::ColonyOnly,
                ThingPredicate::NotContained,
            ]
        );
        // World needle keeps its original case.
        assert_eq!(
            compiled.world_chain.as_slice(),
            &[WorldPredicate::LabelContains {
                needle: "Joe".to_string()
            }]
        );
    }

    #[test]
    fn test_match_all_bypasses_every_other_filter() {
        let mut query = parse_query("*x");
        // Force the conflicting flags on to prove the bypass.
        query.colony_only = true;
        query.label = "x".to_string();

        let compiled = compile_query(&query);
        assert_eq!(compiled.thing_chain.as_slice(), &[ThingPredicate::Visible]);
        assert_eq!(compiled.world_chain.as_slice(), &[WorldPredicate::Always]);
    }

    #[test]
    fn test_visible_rejects_fogged_position() {
        let mut map = empty_map();
        map.fog.insert(Cell { x: 3, z: 3 });
        let thing = chunk();
        assert!(!ThingPredicate::Visible.accepts(&map, &thing));

        map.fog.clear();
        assert!(ThingPredicate::Visible.accepts(&map, &thing));
    }

    #[test]
    fn test_label_match_is_case_insensitive_for_things() {
        let map = empty_map();
        let predicate = ThingPredicate::LabelMatch {
            needle: "steel".to_string(),
        };
        assert!(predicate.accepts(&map, &chunk()));
    }

    #[test]
    fn test_pawn_matches_on_kind_labels() {
        let map = empty_map();
        let pawn = trader("Joe");

        let by_kind = ThingPredicate::LabelMatch {
            needle: "trader".to_string(),
        };
        let by_kind_def = ThingPredicate::LabelMatch {
            needle: "orbital".to_string(),
        };
        let by_label = ThingPredicate::LabelMatch {
            needle: "joe".to_string(),
        };
        let miss = ThingPredicate::LabelMatch {
            needle: "raider".to_string(),
        };

        assert!(by_kind.accepts(&map, &pawn));
        assert!(by_kind_def.accepts(&map, &pawn));
        assert!(by_label.accepts(&map, &pawn));
        assert!(!miss.accepts(&map, &pawn));
    }

    #[test]
    fn test_colony_only_passes_items_unconditionally() {
        let map = empty_map();
        assert!(ThingPredicate::ColonyOnly.accepts(&map, &chunk()));
        // Neutral trader is filtered out.
        assert!(!ThingPredicate::ColonyOnly.accepts(&map, &trader("Joe")));
    }

    #[test]
    fn test_not_contained_rejects_enclosed_pawn() {
        let map = empty_map();
        let mut pawn = trader("Joe");
        assert!(ThingPredicate::NotContained.accepts(&map, &pawn));

        if let ThingKind::Pawn(info) = &mut pawn.kind {
            info.in_container = true;
        }
        assert!(!ThingPredicate::NotContained.accepts(&map, &pawn));
        assert!(ThingPredicate::NotContained.accepts(&map, &chunk()));
    }

    #[test]
    fn test_world_label_match_is_case_sensitive() {
        let object = WorldObject {
            id: WorldObjectId(0),
            label: "Ancient Ruins".to_string(),
            tile: 7,
        };
        let exact = WorldPredicate::LabelContains {
            needle: "Ruins".to_string(),
        };
        let wrong_case = WorldPredicate::LabelContains {
            needle: "ruins".to_string(),
        };
        assert!(exact.accepts(&object));
        assert!(!wrong_case.accepts(&object));
    }

    #[test]
    fn test_chain_accepts_requires_all() {
        let map = empty_map();
        let chain = compile_query(&parse_query("-#joe")).thing_chain;
        // Neutral trader named Joe fails ColonyOnly even though the label hits.
        assert!(!chain_accepts(&chain, &map, &trader("Joe")));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let query = parse_query("!-#.joe");
        assert_eq!(compile_query(&query), compile_query(&query));
    }
}
