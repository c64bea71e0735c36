pub mod extract;
pub mod generator;
pub mod image;
pub mod prompt;
pub mod resolver;

pub use extract::GenerationResult;
pub use generator::{generate, Generation, ModelUnavailable};
pub use resolver::KeywordTable;
