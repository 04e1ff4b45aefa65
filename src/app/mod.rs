pub mod components;
pub use components::*;

pub mod models;
pub mod observable;
pub mod repository;
