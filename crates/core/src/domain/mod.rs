pub mod matching;
pub mod preference;
pub mod recommendation;
