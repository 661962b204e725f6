//! Pellet end-face shapes and the ring/band profile derived from them.

use std::fmt;

use crate::error::{RodMeshError, RodMeshResult, SegmentRef};

use super::layout::{GeometryMode, Pellet, quadrant_cells};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PelletShape {
    Flat,
    Dished,
    Chamfered,
    DishedChamfered,
}

impl PelletShape {
    #[must_use]
    pub const fn classify(dished: bool, chamfered: bool) -> Self {
        match (dished, chamfered) {
            (true, true) => Self::DishedChamfered,
            (true, false) => Self::Dished,
            (false, true) => Self::Chamfered,
            (false, false) => Self::Flat,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Dished => "dished",
            Self::Chamfered => "chamfered",
            Self::DishedChamfered => "dishedChamfered",
        }
    }

    #[must_use]
    pub const fn is_dished(self) -> bool {
        matches!(self, Self::Dished | Self::DishedChamfered)
    }

    #[must_use]
    pub const fn is_chamfered(self) -> bool {
        matches!(self, Self::Chamfered | Self::DishedChamfered)
    }

    /// Vertex rings across one end face, axis ring included.
    #[must_use]
    pub const fn ring_count(self) -> usize {
        2 + self.is_dished() as usize + self.is_chamfered() as usize
    }

    /// Vertices emitted for one pellet of this shape.
    ///
    /// Smeared modes have no pellet shapes and always use the eight-vertex wedge.
    #[must_use]
    pub const fn vertex_count(self, mode: GeometryMode) -> usize {
        let per_ring = match mode {
            GeometryMode::OneD | GeometryMode::TwoDSmeared => return 8,
            GeometryMode::TwoDDiscrete => 2,
            GeometryMode::ThreeD => 4,
        };
        2 * per_ring * self.ring_count()
    }
}

impl fmt::Display for PelletShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How an end-face band meets the neighbouring pellet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceRole {
    /// Flat land that touches the next pellet.
    Contact,
    /// Dish or chamfer surface that never touches the next pellet.
    Recessed,
}

/// One vertex ring on the bottom face: radius and height above the face plane.
///
/// The matching top-face ring sits at `height - lift` below the pellet top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub radius: f64,
    pub lift: f64,
}

/// The annular region between two consecutive rings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub cells: u32,
    pub role: SurfaceRole,
}

/// Rings of the bottom face, from the axis outwards.
///
/// The first ring is the bore, the axis point (2D-discrete) or the corner of the
/// central square (3D solid pellets).
#[must_use]
pub fn ring_profile(pellet: &Pellet, mode: GeometryMode) -> Vec<Ring> {
    let shape = pellet.shape();
    let first_radius = if pellet.has_square(mode) {
        pellet.square_corner_radius()
    } else {
        pellet.r_inner
    };
    let first_lift = pellet.dish.map_or(0.0, |dish| dish.sag(first_radius));

    let mut rings = Vec::with_capacity(shape.ring_count());
    rings.push(Ring {
        radius: first_radius,
        lift: first_lift,
    });
    if let Some(dish) = pellet.dish {
        rings.push(Ring {
            radius: dish.radius,
            lift: 0.0,
        });
    }
    if pellet.chamfer.is_some() {
        rings.push(Ring {
            radius: pellet.r_land(),
            lift: 0.0,
        });
    }
    rings.push(Ring {
        radius: pellet.r_outer,
        lift: pellet.chamfer.map_or(0.0, |chamfer| chamfer.height),
    });
    rings
}

/// Radial bands between consecutive rings, with their cell counts and roles.
///
/// In 3D solid pellets the central square takes `ceil(nAz/4)` radial cells from
/// the first band.
///
/// # Errors
/// Returns a configuration error when the sub-region counts do not leave at least
/// one cell for every band.
pub fn radial_bands(pellet: &Pellet, mode: GeometryMode, at: SegmentRef) -> RodMeshResult<Vec<Band>> {
    let cells = pellet.cells;
    let shape = pellet.shape();
    let dish = if shape.is_dished() { cells.dish } else { 0 };
    let chamfer = if shape.is_chamfered() { cells.chamfer } else { 0 };

    if shape.is_dished() && dish == 0 {
        return Err(RodMeshError::config_at(at, "nCellsRDish", "must be at least 1 for a dished pellet"));
    }
    if shape.is_chamfered() && chamfer == 0 {
        return Err(RodMeshError::config_at(
            at,
            "nCellsRChamfer",
            "must be at least 1 for a chamfered pellet",
        ));
    }
    let land = cells
        .radial
        .checked_sub(dish + chamfer)
        .filter(|land| *land >= 1)
        .ok_or_else(|| {
            RodMeshError::config_at(
                at,
                "nCellsRPellet",
                format!(
                    "{} leaves no land cells after {dish} dish and {chamfer} chamfer cells",
                    cells.radial
                ),
            )
        })?;

    let mut bands = Vec::with_capacity(3);
    if shape.is_dished() {
        bands.push(Band {
            cells: dish,
            role: SurfaceRole::Recessed,
        });
    }
    bands.push(Band {
        cells: land,
        role: SurfaceRole::Contact,
    });
    if shape.is_chamfered() {
        bands.push(Band {
            cells: chamfer,
            role: SurfaceRole::Recessed,
        });
    }

    if pellet.has_square(mode) {
        let square = quadrant_cells(cells.azimuthal);
        let available = bands[0].cells;
        bands[0].cells = available
            .checked_sub(square)
            .filter(|rest| *rest >= 1)
            .ok_or_else(|| {
                RodMeshError::config_at(
                    at,
                    if shape.is_dished() { "nCellsRDish" } else { "nCellsRPellet" },
                    format!(
                        "{available} radial cells do not reach past the central square of {square} cells"
                    ),
                )
            })?;
    }
    Ok(bands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rod::fixtures;
    use approx::assert_relative_eq;

    #[test]
    fn classify_covers_every_combination() {
        assert_eq!(PelletShape::classify(false, false), PelletShape::Flat);
        assert_eq!(PelletShape::classify(true, false), PelletShape::Dished);
        assert_eq!(PelletShape::classify(false, true), PelletShape::Chamfered);
        assert_eq!(PelletShape::classify(true, true), PelletShape::DishedChamfered);
    }

    #[test]
    fn vertex_counts_follow_mode_and_shape() {
        let discrete: Vec<_> = [
            PelletShape::Flat,
            PelletShape::Dished,
            PelletShape::Chamfered,
            PelletShape::DishedChamfered,
        ]
        .iter()
        .map(|shape| {
            (
                shape.vertex_count(GeometryMode::TwoDDiscrete),
                shape.vertex_count(GeometryMode::ThreeD),
            )
        })
        .collect();
        assert_eq!(discrete, vec![(8, 16), (12, 24), (12, 24), (16, 32)]);
        assert_eq!(PelletShape::DishedChamfered.vertex_count(GeometryMode::OneD), 8);
    }

    #[test]
    fn profile_of_dished_chamfered_pellet() {
        let pellet = fixtures::dished_chamfered_pellet(0.0);
        let rings = ring_profile(&pellet, GeometryMode::TwoDDiscrete);
        assert_eq!(rings.len(), 4);
        let dish = pellet.dish.unwrap();
        assert_eq!(rings[0].radius, 0.0);
        assert_relative_eq!(rings[0].lift, dish.depth(), epsilon = 1e-15);
        assert_eq!(rings[1], Ring { radius: dish.radius, lift: 0.0 });
        assert_relative_eq!(rings[2].radius, pellet.r_land());
        assert_eq!(rings[3].lift, pellet.chamfer.unwrap().height);
    }

    #[test]
    fn solid_3d_pellet_starts_with_square_corner() {
        let pellet = fixtures::dished_chamfered_pellet(0.0);
        let rings = ring_profile(&pellet, GeometryMode::ThreeD);
        let dish = pellet.dish.unwrap();
        assert_relative_eq!(rings[0].radius, pellet.square_fraction * dish.radius);
        assert_relative_eq!(rings[0].lift, dish.sag(rings[0].radius));

        let flat = fixtures::flat_pellet(0.0);
        let rings = ring_profile(&flat, GeometryMode::ThreeD);
        assert_relative_eq!(rings[0].radius, flat.square_fraction * flat.r_outer);
        assert_eq!(rings[0].lift, 0.0);
    }

    #[test]
    fn bands_sum_to_total_radial_cells() {
        let pellet = fixtures::dished_chamfered_pellet(0.001);
        let bands = radial_bands(&pellet, GeometryMode::ThreeD, SegmentRef::fuel(1)).unwrap();
        let roles: Vec<_> = bands.iter().map(|band| band.role).collect();
        assert_eq!(
            roles,
            vec![SurfaceRole::Recessed, SurfaceRole::Contact, SurfaceRole::Recessed]
        );
        let total: u32 = bands.iter().map(|band| band.cells).sum();
        assert_eq!(total, pellet.cells.radial);
    }

    #[test]
    fn square_takes_cells_from_first_band() {
        let pellet = fixtures::dished_chamfered_pellet(0.0);
        let bands = radial_bands(&pellet, GeometryMode::ThreeD, SegmentRef::fuel(1)).unwrap();
        let square = quadrant_cells(pellet.cells.azimuthal);
        assert_eq!(bands[0].cells, pellet.cells.dish - square);
    }

    #[test]
    fn too_few_land_cells_is_a_configuration_error() {
        let mut pellet = fixtures::dished_chamfered_pellet(0.001);
        pellet.cells.radial = pellet.cells.dish + pellet.cells.chamfer;
        let err = radial_bands(&pellet, GeometryMode::TwoDDiscrete, SegmentRef::fuel(4)).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("nCellsRPellet"));
    }
}
