//! Arc edges, dish spheres and face projections.

use std::f64::consts::SQRT_2;

use crate::geom::{Point3, Vec3};

use super::faces::{lift, offset_face, quadrant_faces};
use super::layout::{Dish, GeometryMode, Pellet};
use super::model::{BlockMeshModel, FaceProjection, Sphere, VertexId};
use super::shape::Ring;

/// Vertical placement shared by the bottom and top copy of an edge family.
#[derive(Debug, Clone, Copy)]
pub struct Level {
    pub offset: f64,
    pub height: f64,
    pub shift: Vec3,
}

impl Level {
    fn point(self, x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, self.offset + z) + self.shift
    }
}

/// Eight arcs along one ring: four on the bottom face, four mirrored on the top.
///
/// `reach` is the distance from the ring centre to each arc midpoint, which sit on
/// the axes between the ring's corner vertices.
pub fn push_ring_arcs(
    model: &mut BlockMeshModel,
    first: VertexId,
    half: usize,
    reach: f64,
    lift: f64,
    level: Level,
) {
    for (base, z) in [(first, lift), (first + half, level.height - lift)] {
        let midpoints = [(0.0, -reach), (reach, 0.0), (0.0, reach), (-reach, 0.0)];
        for (k, (x, y)) in midpoints.into_iter().enumerate() {
            let end = base + (k + 1) % 4;
            model.push_arc(base + k, end, level.point(x, y, z));
        }
    }
}

/// Eight arcs running radially from one ring to the next along the diagonals.
pub fn push_diagonal_arcs(
    model: &mut BlockMeshModel,
    first: VertexId,
    half: usize,
    radius: f64,
    lift: f64,
    level: Level,
) {
    let xy = radius / SQRT_2;
    for (base, z) in [(first, lift), (first + half, level.height - lift)] {
        let corners = [(-xy, -xy), (xy, -xy), (xy, xy), (-xy, xy)];
        for (k, (x, y)) in corners.into_iter().enumerate() {
            model.push_arc(base + k, base + k + 4, level.point(x, y, z));
        }
    }
}

/// Midpoint of a central-square side projected radially onto the dish sphere.
///
/// Returns the in-plane reach and the lift above the dish rim plane.
#[must_use]
pub fn projected_square_midpoint(dish: Dish, corner: f64) -> (f64, f64) {
    let r = dish.curvature;
    let half_side = corner / SQRT_2;
    let below = (r * r - corner * corner).sqrt();
    let to_side = below.hypot(half_side);
    (half_side * r / to_side, below * r / to_side - dish.centre_drop())
}

/// 3D pellet edges: ring arcs on every ring and, for dished pellets, the diagonal
/// arcs across the dish band.
pub fn push_solid_pellet_arcs(
    model: &mut BlockMeshModel,
    base: VertexId,
    half: usize,
    pellet: &Pellet,
    rings: &[Ring],
    level: Level,
) {
    let first = rings[0];
    match pellet.dish {
        Some(dish) => {
            let (reach, first_lift) = if pellet.is_solid() {
                projected_square_midpoint(dish, first.radius)
            } else {
                (first.radius, first.lift)
            };
            push_ring_arcs(model, base, half, reach, first_lift, level);

            let across = 0.5 * (first.radius + dish.radius);
            push_diagonal_arcs(model, base, half, across, dish.sag(across), level);
        }
        None if !pellet.is_solid() => {
            push_ring_arcs(model, base, half, first.radius, first.lift, level);
        }
        None => {}
    }
    for (j, ring) in rings.iter().enumerate().skip(1) {
        push_ring_arcs(model, base + 4 * j, half, ring.radius, ring.lift, level);
    }
}

/// 2D-discrete dished pellet: the two radial dish edges on each face follow the
/// dish sphere in the plane of the wedge sides.
pub fn push_discrete_dish_arcs(
    model: &mut BlockMeshModel,
    base: VertexId,
    half: usize,
    pellet: &Pellet,
    rings: &[Ring],
    angle: f64,
    level: Level,
) {
    let Some(dish) = pellet.dish else {
        return;
    };
    let across = 0.5 * (rings[0].radius + dish.radius);
    let sag = dish.sag(across);
    let (sin, cos) = (angle / 2.0).sin_cos();
    for (start, z) in [(base, sag), (base + half, level.height - sag)] {
        model.push_arc(start, start + 2, level.point(across * cos, -across * sin, z));
        model.push_arc(start + 1, start + 3, level.point(across * cos, across * sin, z));
    }
}

/// Inner and outer tube arcs of a 3D cladding block.
pub fn push_clad_arcs(
    model: &mut BlockMeshModel,
    base: VertexId,
    half: usize,
    r_inner: f64,
    r_outer: f64,
    capped: bool,
    level: Level,
) {
    let inner = if capped { base + 4 } else { base };
    push_ring_arcs(model, inner, half, r_inner, 0.0, level);
    push_ring_arcs(model, inner + 4, half, r_outer, 0.0, level);
}

/// Bottom and top dish spheres of a 3D pellet. Returns the index of the bottom one.
pub fn push_dish_spheres(model: &mut BlockMeshModel, dish: Dish, level: Level) -> usize {
    let index = model.spheres.len();
    let drop = dish.centre_drop();
    model.spheres.push(Sphere {
        centre: level.point(0.0, 0.0, -drop),
        radius: dish.curvature,
    });
    model.spheres.push(Sphere {
        centre: level.point(0.0, 0.0, level.height + drop),
        radius: dish.curvature,
    });
    index
}

/// Projects the dish-band faces (and the square, if any) onto the pellet's spheres.
pub fn push_dish_projections(
    model: &mut BlockMeshModel,
    base: VertexId,
    half: usize,
    square: bool,
    bottom_sphere: usize,
) {
    let mut faces = Vec::with_capacity(5);
    if square {
        faces.push(offset_face(base, [0, 3, 2, 1]));
    }
    faces.extend(quadrant_faces(offset_face(base, [4, 0, 1, 5])));

    for &face in &faces {
        model.projections.push(FaceProjection {
            face,
            sphere: bottom_sphere,
        });
    }
    for &face in &faces {
        model.projections.push(FaceProjection {
            face: lift(face, half),
            sphere: bottom_sphere + 1,
        });
    }
}

/// Whether a pellet in this mode needs dish spheres.
#[must_use]
pub fn needs_spheres(pellet: &Pellet, mode: GeometryMode) -> bool {
    mode == GeometryMode::ThreeD && pellet.dish.is_some()
}
