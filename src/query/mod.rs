pub mod parser;
pub mod predicate;

pub use parser::{FLAG_CHARS, ParsedQuery, parse_query};
pub use predicate::{
    CompiledQuery, ThingChain, ThingPredicate, WorldChain, WorldPredicate, compile_query,
};
