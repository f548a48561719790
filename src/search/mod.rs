mod engine;

pub use engine::{SearchEngine, SearchResults, format_thing_result, format_world_result};
