//! Rod description as read from a `rodDict`-style JSON document.
//!
//! Keys keep the `rodDict` spelling so existing dictionaries can be
//! converted one to one. Per-block values are arrays of length `nBlocksFuel` or
//! `nBlocksClad`.

mod resolve;

use serde::{Deserialize, Serialize};

use crate::error::RodMeshResult;
use crate::rod::GeometryMode;

/// How pellet eccentricity offsets are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EccentricityMode {
    /// Uniform random draw bounded by the smallest fuel/clad gap.
    #[default]
    Default,
    /// Offsets taken from `eccentricity_vector`.
    Manual,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RodConfig {
    pub convert_to_meters: f64,
    pub geometry_type: GeometryMode,
    #[serde(default)]
    pub offset_fuel: f64,
    #[serde(default)]
    pub offset_clad: f64,
    /// Degrees. Required by every mode except 3D.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wedge_angle: Option<f64>,

    // Fuel stack
    pub n_blocks_fuel: usize,
    pub block_name_fuel: Vec<String>,
    pub r_inner_fuel: Vec<f64>,
    pub r_outer_fuel: Vec<f64>,
    pub height_fuel: Vec<f64>,
    #[serde(default, rename = "nCellFuelR", skip_serializing_if = "Option::is_none")]
    pub n_cell_fuel_r: Option<Vec<u32>>,
    #[serde(default, rename = "nCellFuelZ", skip_serializing_if = "Option::is_none")]
    pub n_cell_fuel_z: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_pellets_fuel: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r_dish_fuel: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r_curvature_dish: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chamfer_height: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chamfer_width: Option<Vec<f64>>,
    #[serde(default, rename = "nCellsRPellet", skip_serializing_if = "Option::is_none")]
    pub n_cells_r_pellet: Option<Vec<u32>>,
    #[serde(default, rename = "nCellsRDish", skip_serializing_if = "Option::is_none")]
    pub n_cells_r_dish: Option<Vec<u32>>,
    #[serde(default, rename = "nCellsRChamfer", skip_serializing_if = "Option::is_none")]
    pub n_cells_r_chamfer: Option<Vec<u32>>,
    /// Optional cross-check of the land cells left by dish and chamfer.
    #[serde(default, rename = "nCellsRLand", skip_serializing_if = "Option::is_none")]
    pub n_cells_r_land: Option<Vec<u32>>,
    #[serde(default, rename = "nCellsZPellet", skip_serializing_if = "Option::is_none")]
    pub n_cells_z_pellet: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub square_fraction: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_cells_azimuthal_fuel: Option<Vec<u32>>,

    // Cladding stack
    pub n_blocks_clad: usize,
    pub block_name_clad: Vec<String>,
    pub r_inner_clad: Vec<f64>,
    pub r_outer_clad: Vec<f64>,
    pub height_clad: Vec<f64>,
    #[serde(rename = "nCellsRClad")]
    pub n_cells_r_clad: Vec<u32>,
    #[serde(rename = "nCellsZClad")]
    pub n_cells_z_clad: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_cells_azimuthal_clad: Option<Vec<u32>>,

    // End caps
    #[serde(default)]
    pub bottom_cap_height: f64,
    #[serde(default)]
    pub top_cap_height: f64,
    #[serde(default, rename = "nCellsRBottomCap", skip_serializing_if = "Option::is_none")]
    pub n_cells_r_bottom_cap: Option<u32>,
    #[serde(default, rename = "nCellsZBottomCap", skip_serializing_if = "Option::is_none")]
    pub n_cells_z_bottom_cap: Option<u32>,
    #[serde(default, rename = "nCellsRTopCap", skip_serializing_if = "Option::is_none")]
    pub n_cells_r_top_cap: Option<u32>,
    #[serde(default, rename = "nCellsZTopCap", skip_serializing_if = "Option::is_none")]
    pub n_cells_z_top_cap: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub square_fraction_bottom_cap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub square_fraction_top_cap: Option<f64>,

    #[serde(default = "default_true")]
    pub merge_fuel_patch_pairs: bool,
    #[serde(default = "default_true")]
    pub merge_clad_patch_pairs: bool,

    // Pellet eccentricity, 3D only
    #[serde(default)]
    pub eccentricity: bool,
    #[serde(default, rename = "eccentricity_mode")]
    pub eccentricity_mode: EccentricityMode,
    /// One `[x, y]` offset per pellet, bottom to top.
    #[serde(
        default,
        rename = "eccentricity_vector",
        skip_serializing_if = "Option::is_none"
    )]
    pub eccentricity_vector: Option<Vec<[f64; 2]>>,
    #[serde(
        default,
        rename = "eccentricity_seed",
        skip_serializing_if = "Option::is_none"
    )]
    pub eccentricity_seed: Option<u64>,
}

impl RodConfig {
    /// Parses a rod description from JSON.
    ///
    /// # Errors
    /// Returns [`crate::RodMeshError::Json`] for malformed documents or missing
    /// mandatory keys.
    pub fn from_json_str(input: &str) -> RodMeshResult<Self> {
        Ok(serde_json::from_str(input)?)
    }
}
