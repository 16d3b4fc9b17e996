// Re-export all model types from submodules
mod filters;
mod search;

pub use filters::*;
pub use search::*;
