pub mod interactive;
pub mod query;
pub mod search;
pub mod settings;
pub mod trace;
pub mod world;

pub use query::{CompiledQuery, FLAG_CHARS, ParsedQuery, compile_query, parse_query};
pub use search::{SearchEngine, SearchResults, format_thing_result, format_world_result};
pub use settings::Settings;
pub use world::{GameState, JumpTarget, Map, MapId, Thing, ThingId, WorldObject, WorldObjectId};
