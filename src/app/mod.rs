// repairlog - app/mod.rs
//
// Application layer: orchestration of core logic over real files.
// Dependencies: core, platform.

pub mod analyze;
pub mod query;
