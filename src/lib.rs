//! Chunked voxel world: terrain, budgeted remeshing, player collision and block picking.
#![forbid(unsafe_code)]

pub mod config;
pub mod interact;
pub mod player;
pub mod raycast;

pub use config::EngineConfig;
pub use player::{WalkInput, Walker};
pub use raycast::RayHit;
