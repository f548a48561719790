use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mapsearch::query::{compile_query, parse_query};
use mapsearch::world::{Cell, Faction, GameState, Map, MapId, PawnInfo, Thing, ThingId, ThingKind, WorldObject, WorldObjectId};
use mapsearch::{SearchEngine, SearchResults};
use std::collections::HashSet;

const MATERIALS: [&str; 5] = ["Steel", "Wood", "Gold", "Silver", "Plasteel"];
const NAMES: [&str; 5] = ["Joe", "Ana", "Kim", "Rex", "Mira"];

fn create_test_state(maps: usize, things_per_map: usize) -> GameState {
    let mut state = GameState {
        maps: Vec::new(),
        current_map: Some(MapId(0)),
        world_objects: Vec::new(),
    };

    let mut next_id = 0u32;
    for m in 0..maps {
        let mut things = Vec::with_capacity(things_per_map);
        for i in 0..things_per_map {
            let position = Cell {
                x: (i % 250) as i32,
                z: (i / 250) as i32,
            };
            let kind = if i % 10 == 0 {
                ThingKind::Pawn(PawnInfo {
                    kind_label: "colonist".to_string(),
                    kind_def_label: "colonist".to_string(),
                    faction: if i % 20 == 0 {
                        Faction::Player
                    } else {
                        Faction::Wild
                    },
                    in_container: false,
                })
            } else {
                ThingKind::Item { haulable: true }
            };
            let label = match &kind {
                ThingKind::Pawn(_) => format!("{} {}", NAMES[i % NAMES.len()], i),
                _ => format!("{} Chunk {}", MATERIALS[i % MATERIALS.len()], i),
            };
            things.push(Thing {
                id: ThingId(next_id),
                label,
                position,
                kind,
            });
            next_id += 1;
        }

        // Fog roughly a tenth of the occupied cells.
        let fog: HashSet<Cell> = (0..things_per_map)
            .step_by(10)
            .map(|i| Cell {
                x: (i % 250) as i32,
                z: (i / 250) as i32,
            })
            .collect();

        state.maps.push(Map {
            id: MapId(m as u32),
            name: format!("Map {m}"),
            fog,
            things,
        });
    }

    for t in 0..100u32 {
        state.world_objects.push(WorldObject {
            id: WorldObjectId(t),
            label: format!("Settlement {t}"),
            tile: t,
        });
    }

    state
}

fn benchmark_label_search(c: &mut Criterion) {
    let state = create_test_state(1, 10_000);
    let engine = SearchEngine::new();
    let compiled = compile_query(&parse_query("-.steel"));

    c.bench_function("label_search_10k", |b| {
        b.iter(|| -> SearchResults { engine.evaluate(black_box(&compiled), &state) });
    });
}

fn benchmark_match_all(c: &mut Criterion) {
    let state = create_test_state(1, 10_000);
    let engine = SearchEngine::new();
    let compiled = compile_query(&parse_query("-.*"));

    c.bench_function("match_all_10k", |b| {
        b.iter(|| -> SearchResults { engine.evaluate(black_box(&compiled), &state) });
    });
}

fn benchmark_all_maps(c: &mut Criterion) {
    let state = create_test_state(4, 2_500);
    let engine = SearchEngine::new();
    let compiled = compile_query(&parse_query("!-.#chunk"));

    c.bench_function("all_maps_search_4x2500", |b| {
        b.iter(|| -> SearchResults { engine.evaluate(black_box(&compiled), &state) });
    });
}

fn benchmark_query_parsing(c: &mut Criterion) {
    c.bench_function("parse_flagged_query", |b| {
        b.iter(|| parse_query(black_box("!-#.steel chunk")));
    });

    c.bench_function("compile_flagged_query", |b| {
        let query = parse_query("!-#.steel chunk");
        b.iter(|| compile_query(black_box(&query)));
    });
}

criterion_group!(
    benches,
    benchmark_label_search,
    benchmark_match_all,
    benchmark_all_maps,
    benchmark_query_parsing
);
criterion_main!(benches);
