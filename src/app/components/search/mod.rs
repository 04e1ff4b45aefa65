mod search;
pub use search::*;

mod search_model;
pub use search_model::*;
