//! Vertex coordinates per geometry mode.

use std::f64::consts::SQRT_2;

use crate::geom::{Point3, Vec3};

use super::layout::{CladBlock, Pellet};
use super::model::VertexArena;
use super::shape::Ring;

/// Scale applied to wedge radii so the straight-chord slice keeps the area
/// of the true annular sector.
#[must_use]
pub fn wedge_correction(angle: f64) -> f64 {
    (angle / angle.sin()).sqrt()
}

/// Eight-vertex wedge slice, plus two axis vertices when `centreline` is set.
///
/// Per level the order is inner `-y`, inner `+y`, outer `-y`, outer `+y`.
pub fn push_wedge(
    arena: &mut VertexArena,
    r_inner: f64,
    r_outer: f64,
    height: f64,
    angle: f64,
    offset: f64,
    centreline: bool,
) {
    let correction = wedge_correction(angle);
    for z in [offset, offset + height] {
        for r in [r_inner, r_outer] {
            push_wedge_pair(arena, r * correction, angle, z);
        }
    }
    if centreline {
        arena.push(Point3::new(0.0, 0.0, offset));
        arena.push(Point3::new(0.0, 0.0, offset + height));
    }
}

fn push_wedge_pair(arena: &mut VertexArena, r: f64, angle: f64, z: f64) {
    let (sin, cos) = (angle / 2.0).sin_cos();
    arena.push(Point3::new(r * cos, -r * sin, z));
    arena.push(Point3::new(r * cos, r * sin, z));
}

/// Four vertices at the corners of the ring's inscribed square, starting at
/// `(-xy, -xy)` and turning counter-clockwise.
pub fn push_quadrant_ring(arena: &mut VertexArena, radius: f64, z: f64, shift: Vec3) {
    let xy = radius / SQRT_2;
    let centre = Point3::new(0.0, 0.0, z) + shift;
    for (sx, sy) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        arena.push(centre + Vec3::planar(sx * xy, sy * xy));
    }
}

/// 2D-discrete pellet: two vertices per ring, bottom face then top face.
///
/// Pellet rings are not area-corrected; only the cladding wedge is.
pub fn push_discrete_pellet(
    arena: &mut VertexArena,
    pellet: &Pellet,
    rings: &[Ring],
    angle: f64,
    offset: f64,
) {
    for ring in rings {
        push_wedge_pair(arena, ring.radius, angle, offset + ring.lift);
    }
    for ring in rings {
        push_wedge_pair(arena, ring.radius, angle, offset + pellet.height - ring.lift);
    }
}

/// 3D pellet: four vertices per ring, bottom face then top face.
pub fn push_solid_pellet(
    arena: &mut VertexArena,
    pellet: &Pellet,
    rings: &[Ring],
    offset: f64,
    shift: Vec3,
) {
    for ring in rings {
        push_quadrant_ring(arena, ring.radius, offset + ring.lift, shift);
    }
    for ring in rings {
        push_quadrant_ring(arena, ring.radius, offset + pellet.height - ring.lift, shift);
    }
}

/// 3D cladding block: optional cap square, inner ring, outer ring, per level.
pub fn push_clad_rings(arena: &mut VertexArena, block: &CladBlock, offset: f64) {
    for z in [offset, offset + block.height] {
        if let Some(cap) = block.cap {
            push_quadrant_ring(arena, cap.square_fraction * block.r_inner, z, Vec3::ZERO);
        }
        push_quadrant_ring(arena, block.r_inner, z, Vec3::ZERO);
        push_quadrant_ring(arena, block.r_outer, z, Vec3::ZERO);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rod::fixtures;
    use crate::rod::layout::GeometryMode;
    use crate::rod::shape::ring_profile;
    use approx::assert_relative_eq;

    #[test]
    fn wedge_correction_preserves_sector_area() {
        let angle = 5f64.to_radians();
        let r = 0.005;
        let scaled = r * wedge_correction(angle);
        let triangle = 0.5 * scaled * scaled * angle.sin();
        let sector = 0.5 * r * r * angle;
        assert_relative_eq!(triangle, sector, max_relative = 1e-12);
    }

    #[test]
    fn wedge_layout_with_centreline() {
        let mut arena = VertexArena::new();
        let angle = 5f64.to_radians();
        push_wedge(&mut arena, 0.0051, 0.0061, 0.01, angle, -0.002, true);
        assert_eq!(arena.len(), 10);
        let points = arena.as_slice();
        assert_relative_eq!(points[0].y, -points[1].y);
        assert!(points[2].x > points[0].x);
        assert_relative_eq!(points[4].z, 0.008);
        assert_eq!(points[8], Point3::new(0.0, 0.0, -0.002));
        assert_eq!(points[9], Point3::new(0.0, 0.0, 0.008));
    }

    #[test]
    fn quadrant_ring_is_centred_on_the_shift() {
        let mut arena = VertexArena::new();
        push_quadrant_ring(&mut arena, 0.002, 0.5, Vec3::planar(1e-5, -2e-5));
        for point in arena.as_slice() {
            let local = Point3::new(point.x - 1e-5, point.y + 2e-5, 0.0);
            assert_relative_eq!(local.radius(), 0.002, max_relative = 1e-12);
        }
        assert!(arena.as_slice()[0].x < 0.0 && arena.as_slice()[0].y < 0.0);
        assert!(arena.as_slice()[2].x > 0.0 && arena.as_slice()[2].y > 0.0);
    }

    #[test]
    fn dished_pellet_top_face_mirrors_bottom_face() {
        let pellet = fixtures::dished_pellet(0.001);
        let rings = ring_profile(&pellet, GeometryMode::ThreeD);
        let mut arena = VertexArena::new();
        push_solid_pellet(&mut arena, &pellet, &rings, 1.0, Vec3::ZERO);
        assert_eq!(arena.len(), 24);
        let points = arena.as_slice();
        let sag = pellet.dish.unwrap().sag(pellet.r_inner);
        assert_relative_eq!(points[0].z, 1.0 + sag);
        assert_relative_eq!(points[12].z, 1.0 + pellet.height - sag);
        assert_relative_eq!(points[4].z, 1.0);
    }
}
