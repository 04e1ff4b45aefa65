mod api_models;
mod client;

pub use client::{LocalSearchClient, SearchApiError};
