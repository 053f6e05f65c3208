//! Kiln Core - Shared value types for the Kiln importer
//!
//! This crate provides the types every other Kiln crate agrees on:
//! - Linear RGBA colors as they appear in material factors
//! - Conversion from the glTF coordinate convention to the host convention

pub mod convert;
pub mod types;

pub use convert::{loc_gltf_to_host, uv_gltf_to_host};
pub use types::Color;
