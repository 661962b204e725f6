//! Resolved description of a rod: ordered fuel and cladding segments.
//!
//! A [`RodLayout`] is what the generation pass consumes. It is normally built
//! by [`crate::config::RodConfig::resolve`], but tests and library users can
//! assemble one directly.

use serde::{Deserialize, Serialize};

use crate::error::{RodMeshError, RodMeshResult, SegmentRef};
use crate::geom::{Tolerance, Vec3};

use super::shape::PelletShape;

/// Geometric abstraction level of the generated mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryMode {
    #[serde(rename = "1D")]
    OneD,
    #[serde(rename = "2D-smeared")]
    TwoDSmeared,
    #[serde(rename = "2D-discrete")]
    TwoDDiscrete,
    #[serde(rename = "3D")]
    ThreeD,
}

impl GeometryMode {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OneD => "1D",
            Self::TwoDSmeared => "2D-smeared",
            Self::TwoDDiscrete => "2D-discrete",
            Self::ThreeD => "3D",
        }
    }

    /// Smeared modes: one wedge block per fuel block, no pellet shapes.
    #[must_use]
    pub const fn is_smeared(self) -> bool {
        matches!(self, Self::OneD | Self::TwoDSmeared)
    }

    /// Modes that slice the rod into a single wedge instead of a full revolution.
    #[must_use]
    pub const fn is_wedge(self) -> bool {
        !matches!(self, Self::ThreeD)
    }
}

/// Spherical dish pressed into both pellet end faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dish {
    pub radius: f64,
    pub curvature: f64,
}

impl Dish {
    /// Axial distance from the dish rim plane down to the sphere centre.
    #[must_use]
    pub fn centre_drop(self) -> f64 {
        (self.curvature * self.curvature - self.radius * self.radius).sqrt()
    }

    /// Spherical-cap sag at radius `r`, measured from the rim plane.
    #[must_use]
    pub fn sag(self, r: f64) -> f64 {
        (self.curvature * self.curvature - r * r).sqrt() - self.centre_drop()
    }

    /// Depth of the dish at the pellet axis.
    #[must_use]
    pub fn depth(self) -> f64 {
        self.curvature - self.centre_drop()
    }
}

/// Bevel on the outer edge of both pellet end faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chamfer {
    pub width: f64,
    pub height: f64,
}

/// Cell counts of one pellet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PelletCells {
    /// Total radial cells from the inner ring to the outer radius.
    pub radial: u32,
    /// Radial cells across the dish band.
    pub dish: u32,
    /// Radial cells across the chamfer band.
    pub chamfer: u32,
    pub axial: u32,
    /// Full-revolution azimuthal cells, 3D only.
    pub azimuthal: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pellet {
    pub name: String,
    pub r_inner: f64,
    pub r_outer: f64,
    pub height: f64,
    pub dish: Option<Dish>,
    pub chamfer: Option<Chamfer>,
    /// Central square size as a fraction of the first ring radius (3D, solid pellets).
    pub square_fraction: f64,
    pub cells: PelletCells,
}

impl Pellet {
    #[must_use]
    pub fn shape(&self) -> PelletShape {
        PelletShape::classify(self.dish.is_some(), self.chamfer.is_some())
    }

    /// End of the flat land, where the chamfer starts.
    #[must_use]
    pub fn r_land(&self) -> f64 {
        self.chamfer
            .map_or(self.r_outer, |chamfer| self.r_outer - chamfer.width)
    }

    #[must_use]
    pub fn is_solid(&self) -> bool {
        Tolerance::DEFAULT.approx_zero_f64(self.r_inner)
    }

    /// 3D solid pellets replace the degenerate axis ring with a square.
    #[must_use]
    pub fn has_square(&self, mode: GeometryMode) -> bool {
        mode == GeometryMode::ThreeD && self.is_solid()
    }

    /// Corner radius of the central square, scaled from the dish rim when dished.
    #[must_use]
    pub fn square_corner_radius(&self) -> f64 {
        let reference = self.dish.map_or(self.r_outer, |dish| dish.radius);
        self.square_fraction * reference
    }

    /// Radius of the first ring outside the axis region.
    fn first_band_edge(&self) -> f64 {
        self.dish.map_or_else(|| self.r_land(), |dish| dish.radius)
    }

    /// Checks every geometric rule of one pellet.
    ///
    /// # Errors
    /// Returns a configuration error naming the first violated parameter.
    pub fn validate(&self, mode: GeometryMode, at: SegmentRef) -> RodMeshResult<()> {
        check_annulus(self.r_inner, self.r_outer, self.height, at, "Fuel")?;
        let r_land = self.r_land();

        if let Some(chamfer) = self.chamfer {
            if chamfer.width >= self.r_outer - self.r_inner {
                return Err(RodMeshError::config_at(
                    at,
                    "chamferWidth",
                    format!(
                        "{} must be smaller than rOuterFuel - rInnerFuel = {}",
                        chamfer.width,
                        self.r_outer - self.r_inner
                    ),
                ));
            }
            if chamfer.height < 0.0 || 2.0 * chamfer.height >= self.height {
                return Err(RodMeshError::config_at(
                    at,
                    "chamferHeight",
                    format!(
                        "{} must be non-negative and below half the pellet height {}",
                        chamfer.height, self.height
                    ),
                ));
            }
        }

        if let Some(dish) = self.dish {
            if dish.radius >= r_land {
                return Err(RodMeshError::config_at(
                    at,
                    "rDishFuel",
                    format!("{} must be smaller than the land radius {r_land}", dish.radius),
                ));
            }
            if !self.is_solid() && dish.radius <= self.r_inner {
                return Err(RodMeshError::config_at(
                    at,
                    "rDishFuel",
                    format!(
                        "{} must be larger than rInnerFuel = {}",
                        dish.radius, self.r_inner
                    ),
                ));
            }
            if dish.curvature < dish.radius {
                return Err(RodMeshError::config_at(
                    at,
                    "rCurvatureDish",
                    format!(
                        "{} is smaller than the dish radius {}",
                        dish.curvature, dish.radius
                    ),
                ));
            }
            if 2.0 * dish.depth() >= self.height {
                return Err(RodMeshError::config_at(
                    at,
                    "rCurvatureDish",
                    format!(
                        "dish depth {} leaves no material in a pellet of height {}",
                        dish.depth(),
                        self.height
                    ),
                ));
            }
        }

        if self.has_square(mode) {
            if !is_open_fraction(self.square_fraction) {
                return Err(RodMeshError::config_at(
                    at,
                    "squareFraction",
                    format!("{} must lie strictly between 0 and 1", self.square_fraction),
                ));
            }
            let corner = self.square_corner_radius();
            let edge = self.first_band_edge();
            if corner >= edge {
                return Err(RodMeshError::config_at(
                    at,
                    "squareFraction",
                    format!("central square corner {corner} must lie inside the first ring at {edge}"),
                ));
            }
        }

        if self.cells.axial == 0 {
            return Err(RodMeshError::config_at(at, "nCellsZPellet", "must be at least 1"));
        }
        if mode == GeometryMode::ThreeD && self.cells.azimuthal == 0 {
            return Err(RodMeshError::config_at(
                at,
                "nCellsAzimuthalFuel",
                "must be at least 1",
            ));
        }
        super::shape::radial_bands(self, mode, at).map(|_| ())
    }
}

/// One fuel or cladding block of the smeared wedge modes.
#[derive(Debug, Clone, PartialEq)]
pub struct WedgeBlock {
    pub name: String,
    pub r_inner: f64,
    pub r_outer: f64,
    pub height: f64,
    pub cells_r: u32,
    pub cells_z: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapEnd {
    Bottom,
    Top,
}

impl CapEnd {
    /// Name of the cap patch that faces the fuel stack.
    #[must_use]
    pub const fn inner_patch(self) -> &'static str {
        match self {
            Self::Bottom => "bottomCapInner",
            Self::Top => "topCapInner",
        }
    }
}

/// Solid end plug closing the cladding tube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cap {
    pub end: CapEnd,
    /// Radial cells between the axis and the cladding inner radius.
    pub cells_r_inner: u32,
    pub square_fraction: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CladBlock {
    pub name: String,
    pub r_inner: f64,
    pub r_outer: f64,
    pub height: f64,
    pub cells_r: u32,
    pub cells_z: u32,
    /// Full-revolution azimuthal cells, 3D only.
    pub cells_azimuthal: u32,
    pub cap: Option<Cap>,
}

impl CladBlock {
    /// Checks the block dimensions and, for caps, the plug cell counts.
    ///
    /// # Errors
    /// Returns a configuration error naming the first violated parameter.
    pub fn validate(&self, mode: GeometryMode, at: SegmentRef) -> RodMeshResult<()> {
        check_annulus(self.r_inner, self.r_outer, self.height, at, "Clad")?;
        if self.r_inner <= 0.0 {
            return Err(RodMeshError::config_at(
                at,
                "rInnerClad",
                format!("{} must be positive", self.r_inner),
            ));
        }
        if self.cells_r == 0 {
            return Err(RodMeshError::config_at(at, "nCellsRClad", "must be at least 1"));
        }
        if self.cells_z == 0 {
            return Err(RodMeshError::config_at(at, "nCellsZClad", "must be at least 1"));
        }
        if mode == GeometryMode::ThreeD && self.cells_azimuthal == 0 {
            return Err(RodMeshError::config_at(
                at,
                "nCellsAzimuthalClad",
                "must be at least 1",
            ));
        }
        if let Some(cap) = self.cap {
            let (cells_key, fraction_key) = match cap.end {
                CapEnd::Bottom => ("nCellsRBottomCap", "squareFractionBottomCap"),
                CapEnd::Top => ("nCellsRTopCap", "squareFractionTopCap"),
            };
            if cap.cells_r_inner == 0 {
                return Err(RodMeshError::config_at(at, cells_key, "must be at least 1"));
            }
            if mode == GeometryMode::ThreeD {
                if !is_open_fraction(cap.square_fraction) {
                    return Err(RodMeshError::config_at(
                        at,
                        fraction_key,
                        format!("{} must lie strictly between 0 and 1", cap.square_fraction),
                    ));
                }
                if cap.cells_r_inner <= quadrant_cells(self.cells_azimuthal) {
                    return Err(RodMeshError::config_at(
                        at,
                        cells_key,
                        format!(
                            "{} leaves no radial cells outside the central square of {} cells",
                            cap.cells_r_inner,
                            quadrant_cells(self.cells_azimuthal)
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Cells along each side of a 3D quadrant block.
#[must_use]
pub const fn quadrant_cells(azimuthal: u32) -> u32 {
    azimuthal.div_ceil(4)
}

#[derive(Debug, Clone, PartialEq)]
pub enum FuelSegment {
    Wedge(WedgeBlock),
    Pellet(Pellet),
}

impl FuelSegment {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Wedge(block) => &block.name,
            Self::Pellet(pellet) => &pellet.name,
        }
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        match self {
            Self::Wedge(block) => block.height,
            Self::Pellet(pellet) => pellet.height,
        }
    }

    #[must_use]
    pub fn r_outer(&self) -> f64 {
        match self {
            Self::Wedge(block) => block.r_outer,
            Self::Pellet(pellet) => pellet.r_outer,
        }
    }
}

/// How pellets are shifted off the rod axis (3D only).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Eccentricity {
    #[default]
    Centred,
    /// Uniform draw over the disc bounded by the smallest fuel/clad gap.
    Random { seed: Option<u64> },
    /// One lateral offset per pellet, bottom to top.
    Manual(Vec<Vec3>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RodLayout {
    pub mode: GeometryMode,
    /// Wedge opening angle in radians, ignored in 3D.
    pub wedge_angle: f64,
    pub convert_to_meters: f64,
    pub fuel_offset: f64,
    pub clad_offset: f64,
    pub fuel: Vec<FuelSegment>,
    pub clad: Vec<CladBlock>,
    pub merge_fuel: bool,
    pub merge_clad: bool,
    pub eccentricity: Eccentricity,
}

impl RodLayout {
    #[must_use]
    pub fn bottom_cap(&self) -> bool {
        self.clad
            .first()
            .is_some_and(|block| block.cap.is_some_and(|cap| cap.end == CapEnd::Bottom))
    }

    #[must_use]
    pub fn top_cap(&self) -> bool {
        self.clad
            .last()
            .is_some_and(|block| block.cap.is_some_and(|cap| cap.end == CapEnd::Top))
    }

    /// Smallest radial clearance between any pellet and any cladding block.
    #[must_use]
    pub fn min_gap(&self) -> f64 {
        let max_fuel = self.fuel.iter().map(FuelSegment::r_outer).fold(0.0, f64::max);
        self.min_clad_inner() - max_fuel
    }

    fn min_clad_inner(&self) -> f64 {
        self.clad
            .iter()
            .map(|block| block.r_inner)
            .fold(f64::INFINITY, f64::min)
    }

    /// Validates the whole layout before any output is produced.
    ///
    /// # Errors
    /// Returns the first configuration error found, scanning fuel then cladding.
    pub fn validate(&self) -> RodMeshResult<()> {
        if self.convert_to_meters <= 0.0 {
            return Err(RodMeshError::config(
                "convertToMeters",
                format!("{} must be positive", self.convert_to_meters),
            ));
        }
        if self.mode.is_wedge() {
            let degrees = self.wedge_angle.to_degrees();
            if !(degrees > 0.0 && degrees < 180.0) {
                return Err(RodMeshError::config(
                    "wedgeAngle",
                    format!("{degrees} degrees must lie strictly between 0 and 180"),
                ));
            }
        }
        if self.fuel.is_empty() {
            return Err(RodMeshError::config("nBlocksFuel", "at least one fuel block is required"));
        }
        if self.clad.is_empty() {
            return Err(RodMeshError::config("nBlocksClad", "at least one cladding block is required"));
        }

        for (i, segment) in self.fuel.iter().enumerate() {
            let at = SegmentRef::fuel(i + 1);
            match segment {
                FuelSegment::Wedge(block) => {
                    if !self.mode.is_smeared() {
                        return Err(RodMeshError::config_at(
                            at,
                            "geometryType",
                            format!("a smeared block cannot be meshed in {} mode", self.mode.label()),
                        ));
                    }
                    check_annulus(block.r_inner, block.r_outer, block.height, at, "Fuel")?;
                    if block.cells_r == 0 {
                        return Err(RodMeshError::config_at(at, "nCellFuelR", "must be at least 1"));
                    }
                    if block.cells_z == 0 {
                        return Err(RodMeshError::config_at(at, "nCellFuelZ", "must be at least 1"));
                    }
                }
                FuelSegment::Pellet(pellet) => {
                    if self.mode.is_smeared() {
                        return Err(RodMeshError::config_at(
                            at,
                            "geometryType",
                            format!("a discrete pellet cannot be meshed in {} mode", self.mode.label()),
                        ));
                    }
                    pellet.validate(self.mode, at)?;
                }
            }
        }

        let last = self.clad.len();
        for (i, block) in self.clad.iter().enumerate() {
            let at = SegmentRef::clad(i + 1);
            block.validate(self.mode, at)?;
            if let Some(cap) = block.cap {
                let placed = match cap.end {
                    CapEnd::Bottom => i == 0,
                    CapEnd::Top => i + 1 == last,
                };
                if !placed || self.mode == GeometryMode::OneD {
                    let key = match cap.end {
                        CapEnd::Bottom => "bottomCapHeight",
                        CapEnd::Top => "topCapHeight",
                    };
                    return Err(RodMeshError::config_at(
                        at,
                        key,
                        format!("end cap cannot be placed here in {} mode", self.mode.label()),
                    ));
                }
            }
        }

        let min_clad_inner = self.min_clad_inner();
        for (i, segment) in self.fuel.iter().enumerate() {
            if segment.r_outer() > min_clad_inner {
                return Err(RodMeshError::config_at(
                    SegmentRef::fuel(i + 1),
                    "rOuterFuel",
                    format!(
                        "{} overlaps the cladding inner radius {min_clad_inner}",
                        segment.r_outer()
                    ),
                ));
            }
        }

        self.validate_eccentricity(min_clad_inner)
    }

    fn validate_eccentricity(&self, min_clad_inner: f64) -> RodMeshResult<()> {
        match &self.eccentricity {
            Eccentricity::Centred => Ok(()),
            _ if self.mode != GeometryMode::ThreeD => Err(RodMeshError::config(
                "eccentricity",
                format!("is only available in 3D, not {}", self.mode.label()),
            )),
            Eccentricity::Random { .. } => {
                if self.min_gap() <= 0.0 {
                    Err(RodMeshError::config(
                        "eccentricity_mode",
                        "random eccentricity needs a positive fuel/clad gap",
                    ))
                } else {
                    Ok(())
                }
            }
            Eccentricity::Manual(shifts) => {
                if shifts.len() != self.fuel.len() {
                    return Err(RodMeshError::config(
                        "eccentricity_vector",
                        format!(
                            "has {} entries but the rod has {} pellets",
                            shifts.len(),
                            self.fuel.len()
                        ),
                    ));
                }
                for (i, (shift, segment)) in shifts.iter().zip(&self.fuel).enumerate() {
                    let gap = min_clad_inner - segment.r_outer();
                    if shift.planar_length() > gap + Tolerance::DEFAULT.eps {
                        return Err(RodMeshError::config_at(
                            SegmentRef::fuel(i + 1),
                            "eccentricity_vector",
                            format!(
                                "offset {} exceeds the radial gap {gap}",
                                shift.planar_length()
                            ),
                        ));
                    }
                }
                Ok(())
            }
        }
    }
}

fn is_open_fraction(value: f64) -> bool {
    value > 0.0 && value < 1.0
}

fn check_annulus(
    r_inner: f64,
    r_outer: f64,
    height: f64,
    at: SegmentRef,
    suffix: &str,
) -> RodMeshResult<()> {
    if r_outer.is_nan() || r_outer <= 0.0 {
        return Err(RodMeshError::config_at(
            at,
            format!("rOuter{suffix}"),
            format!("{r_outer} must be positive"),
        ));
    }
    if height.is_nan() || height <= 0.0 {
        return Err(RodMeshError::config_at(
            at,
            format!("height{suffix}"),
            format!("{height} must be positive"),
        ));
    }
    if !(r_inner >= 0.0 && r_inner < r_outer) {
        return Err(RodMeshError::config_at(
            at,
            format!("rInner{suffix}"),
            format!("{r_inner} must lie in [0, rOuter{suffix} = {r_outer})"),
        ));
    }
    Ok(())
}
