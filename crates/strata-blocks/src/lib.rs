//! Block kinds, face roles, and display metadata.
#![forbid(unsafe_code)]

pub mod palette;
pub mod types;

pub use palette::{BlockInfo, Palette, Rgb, Swatch};
pub use types::{BlockType, FaceRole, MaterialSelector};
