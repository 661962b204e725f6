//! Index patterns shared by the block, projection and patch builders.
//!
//! Every helper works on offsets relative to a segment's first vertex and
//! returns absolute vertex ids.

use super::model::{Face, VertexId};

/// Which way a cylindrical side face points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Towards the rod axis (bore, cladding inner surface).
    Inward,
    /// Away from the rod axis.
    Outward,
}

#[must_use]
pub fn offset_face(base: VertexId, face: [usize; 4]) -> Face {
    face.map(|v| v + base)
}

/// Mirrors a bottom-face quad onto the top face `half` vertices above it.
///
/// The winding is reversed so the face keeps pointing out of the block.
#[must_use]
pub fn lift(face: Face, half: usize) -> Face {
    [face[3] + half, face[2] + half, face[1] + half, face[0] + half]
}

/// The four quadrant copies of a bottom face in a 3D ring layout.
///
/// Each copy advances one ring position; the last one closes the loop back onto
/// the first two vertices of `face`.
#[must_use]
pub fn quadrant_faces(face: Face) -> [Face; 4] {
    let step = |k: usize| face.map(|v| v + k);
    let mut closing = step(3);
    closing[2] = face[1];
    closing[3] = face[0];
    [face, step(1), step(2), closing]
}

/// Side faces of one 3D ring spanning bottom to top, one per quadrant.
#[must_use]
pub fn quadrant_ring_faces(first: VertexId, half: usize, facing: Facing) -> [Face; 4] {
    let v = |k: usize| first + k % 4;
    let quad = |k: usize| match facing {
        Facing::Outward => [v(k), v(k + 1), v(k + 1) + half, v(k) + half],
        Facing::Inward => [v(k + 1), v(k), v(k) + half, v(k + 1) + half],
    };
    [quad(0), quad(1), quad(2), quad(3)]
}

/// Side face of one wedge ring (two vertices per ring).
#[must_use]
pub fn wedge_ring_face(first: VertexId, half: usize, facing: Facing) -> Face {
    match facing {
        Facing::Outward => [first, first + 1, first + 1 + half, first + half],
        Facing::Inward => [first + 1, first, first + half, first + 1 + half],
    }
}

/// Front and back wedge faces of the band between two wedge rings.
#[must_use]
pub fn wedge_band_sides(inner: VertexId, outer: VertexId, half: usize) -> (Face, Face) {
    (
        [inner, outer, outer + half, inner + half],
        [inner + 1, inner + 1 + half, outer + 1 + half, outer + 1],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lift_reverses_and_shifts() {
        assert_eq!(lift([0, 1, 3, 2], 4), [6, 7, 5, 4]);
    }

    #[test]
    fn quadrant_faces_close_the_loop() {
        let faces = quadrant_faces([4, 0, 1, 5]);
        assert_eq!(faces, [[4, 0, 1, 5], [5, 1, 2, 6], [6, 2, 3, 7], [7, 3, 0, 4]]);
    }

    #[test]
    fn lifted_quadrants_match_top_closure() {
        let top: Vec<_> = quadrant_faces([4, 0, 1, 5])
            .into_iter()
            .map(|face| lift(face, 12))
            .collect();
        assert_eq!(top[0], [17, 13, 12, 16]);
        assert_eq!(top[3], [16, 12, 15, 19]);
    }

    #[test]
    fn ring_faces_wrap_around_the_ring() {
        let outer = quadrant_ring_faces(12, 16, Facing::Outward);
        assert_eq!(outer[0], [12, 13, 29, 28]);
        assert_eq!(outer[3], [15, 12, 28, 31]);

        let inner = quadrant_ring_faces(0, 8, Facing::Inward);
        assert_eq!(inner[0], [1, 0, 8, 9]);
        assert_eq!(inner[3], [0, 3, 11, 8]);
    }

    #[test]
    fn wedge_faces_of_a_single_band() {
        assert_eq!(wedge_ring_face(2, 4, Facing::Outward), [2, 3, 7, 6]);
        assert_eq!(wedge_band_sides(0, 2, 4), ([0, 2, 6, 4], [1, 5, 7, 3]));
    }
}
