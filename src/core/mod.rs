// repairlog - core/mod.rs
//
// Core business logic layer.
// Dependencies: standard library plus parsing/serialisation crates.
// Must NOT depend on: platform or app, and never opens files itself.

pub mod export;
pub mod extract;
pub mod group;
pub mod ingest;
pub mod knowledge;
pub mod model;
