pub mod errors;
mod collections;
pub mod geometry;
pub mod graph;
pub mod search;
pub mod dispatch;
