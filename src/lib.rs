//! Atlasmend repairs generated 3x3 icon/face atlases.
//!
//! An upstream image generator is asked for nine independent
//! illustrations in a 3x3 layout on one 1024x1024 canvas. What comes
//! back rarely honors the grid: silhouettes drift off-center, leak into
//! neighboring cells, or fuse with a neighbor where two outlines happen
//! to touch. Atlasmend turns that raster into a clean atlas the
//! downstream texture tooling can consume.
//!
//! # Pipeline overview
//!
//! 1. **Separate** (silhouette mode only): sever narrow necks between
//!    accidentally fused silhouettes ([`separate_fused_silhouettes`])
//! 2. **Extract**: flood-fill the visible region into discrete parts
//!    ([`extract_parts`])
//! 3. **Resolve**: assign each part to the grid cell that owns it, or
//!    discard it ([`resolve_ownership`])
//! 4. **Compose**: re-seat every cell's approved parts into a fresh
//!    transparent raster ([`compose`])
//!
//! [`process_atlas`] runs the whole pipeline. Key constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical input bytes and mode produce
//!   byte-identical output, which the golden-image tests rely on.
//! - **No IO in the engine**: PNG and texture framing live in
//!   [`codec`]-level helpers the engine never calls.
#![forbid(unsafe_code)]

pub mod codec;
pub mod engine;
pub mod foundation;
pub mod layout;
pub mod segment;

pub use codec::png::{decode_png, encode_png};
pub use codec::texture::{
    PixelFormat, TEXTURE_HEADER_LEN, TEXTURE_MAGIC, TextureHeader, decode_texture, encode_texture,
};
pub use engine::{ATLAS_EDGE, Mode, ProcessStats, process_atlas, process_atlas_with_stats};
pub use foundation::error::{AtlasmendError, AtlasmendResult};
pub use foundation::grid::{CELL_COUNT, CellRect, GRID_DIM, Grid};
pub use foundation::raster::Raster;
pub use layout::compose::{Placement, compose};
pub use layout::ownership::{OwnershipOutcome, cell_counts, resolve_ownership};
pub use segment::bridge::separate_fused_silhouettes;
pub use segment::extract::{NOISE_PIXEL_MAX, Part, VISIBLE_ALPHA_MIN, extract_parts};
