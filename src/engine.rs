use crate::foundation::{
    error::{AtlasmendError, AtlasmendResult},
    grid::Grid,
    raster::Raster,
};
use crate::layout::{
    compose::{Placement, compose},
    ownership::resolve_ownership,
};
use crate::segment::{bridge::separate_fused_silhouettes, extract::extract_parts};

/// The engine only accepts square atlases of exactly this edge length.
pub const ATLAS_EDGE: u32 = 1024;

/// Controls both the ownership filter and the placement policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Compact glyphs, centered in their cells.
    Icon,
    /// Background-tolerant filtering, centered placement.
    Generic,
    /// Character silhouettes: fused neighbors are severed first, strict
    /// shape filtering, bottom-aligned placement.
    Silhouette,
}

impl Mode {
    pub fn placement(self) -> Placement {
        match self {
            Mode::Icon | Mode::Generic => Placement::Center,
            Mode::Silhouette => Placement::Bottom,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Icon => "icon",
            Mode::Generic => "generic",
            Mode::Silhouette => "silhouette",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = AtlasmendError;

    fn from_str(s: &str) -> AtlasmendResult<Self> {
        match s {
            "icon" => Ok(Mode::Icon),
            "generic" => Ok(Mode::Generic),
            "silhouette" => Ok(Mode::Silhouette),
            other => Err(AtlasmendError::validation(format!(
                "unknown alignment mode '{other}' (expected icon, generic or silhouette)"
            ))),
        }
    }
}

/// What one invocation did, for diagnostics and the CLI report.
#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ProcessStats {
    pub parts_found: usize,
    pub parts_rejected: usize,
    pub bridge_cuts: usize,
    pub cells_filled: usize,
}

/// Re-seats a generated 3x3 atlas: discovers the silhouettes that were
/// actually drawn, decides which cell owns each one, and re-renders every
/// cell's content seated inside its cell, discarding noise and mis-owned
/// content.
///
/// Pure per invocation: the input is never mutated (the bridge separator
/// works on a private copy) and no state survives the call.
pub fn process_atlas(input: &Raster, mode: Mode) -> AtlasmendResult<Raster> {
    process_atlas_with_stats(input, mode).map(|(raster, _)| raster)
}

/// [`process_atlas`] plus a [`ProcessStats`] summary.
#[tracing::instrument(skip(input))]
pub fn process_atlas_with_stats(
    input: &Raster,
    mode: Mode,
) -> AtlasmendResult<(Raster, ProcessStats)> {
    validate_shape(input)?;

    let grid = Grid::new(input.width(), input.height());
    let mut work = input.clone();

    let bridge_cuts = if mode == Mode::Silhouette {
        separate_fused_silhouettes(&mut work, &grid)
    } else {
        0
    };

    let parts = extract_parts(&work);
    let parts_found = parts.len();

    let outcome = resolve_ownership(parts, &grid, mode);
    let cells_filled = outcome.cells.iter().filter(|c| !c.is_empty()).count();

    let output = compose(&outcome.cells, &work, &grid, mode.placement());

    let stats = ProcessStats {
        parts_found,
        parts_rejected: outcome.rejected,
        bridge_cuts,
        cells_filled,
    };
    tracing::debug!(?stats, "atlas processed");
    Ok((output, stats))
}

// Raised before any processing; the raster's own channel invariant
// (>= 4) is enforced at construction.
fn validate_shape(input: &Raster) -> AtlasmendResult<()> {
    if input.width() != ATLAS_EDGE || input.height() != ATLAS_EDGE {
        return Err(AtlasmendError::validation(format!(
            "atlas must be {ATLAS_EDGE}x{ATLAS_EDGE}, got {}x{}",
            input.width(),
            input.height()
        )));
    }
    Ok(())
}
