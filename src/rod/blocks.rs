//! Hexahedral block connectivity per geometry mode.

use super::faces::offset_face;
use super::layout::{CladBlock, GeometryMode, Pellet, quadrant_cells};
use super::model::{BlockMeshModel, VertexId};
use super::shape::Band;

fn hex(bottom: [VertexId; 4], top: [VertexId; 4]) -> [VertexId; 8] {
    [
        bottom[0], bottom[1], bottom[2], bottom[3], top[0], top[1], top[2], top[3],
    ]
}

fn shifted(bottom: [VertexId; 4], half: usize) -> [VertexId; 8] {
    hex(bottom, bottom.map(|v| v + half))
}

/// Single wedge block between the inner and outer wedge rings.
pub fn push_wedge_block(model: &mut BlockMeshModel, base: VertexId, name: &str, cells_r: u32, cells_z: u32) {
    model.push_block(shifted(offset_face(base, [0, 2, 3, 1]), 4), name, [cells_r, 1, cells_z]);
}

/// Collapsed wedge filling the cap between the axis and the cladding inner radius.
pub fn push_wedge_cap_block(model: &mut BlockMeshModel, base: VertexId, name: &str, cells_r: u32, cells_z: u32) {
    model.push_block(
        hex(offset_face(base, [8, 0, 1, 8]), offset_face(base, [9, 4, 5, 9])),
        name,
        [cells_r, 1, cells_z],
    );
}

/// 2D-discrete pellet: one wedge block per radial band.
pub fn push_discrete_pellet_blocks(
    model: &mut BlockMeshModel,
    base: VertexId,
    half: usize,
    name: &str,
    bands: &[Band],
    cells_z: u32,
) {
    for (k, band) in bands.iter().enumerate() {
        let a = base + 2 * k;
        model.push_block(shifted([a, a + 2, a + 3, a + 1], half), name, [band.cells, 1, cells_z]);
    }
}

/// Four blocks around the axis built by rotating `face` one ring position at
/// a time; the fourth block closes back onto the first.
pub fn push_quadrant_blocks(
    model: &mut BlockMeshModel,
    base: VertexId,
    face: [usize; 4],
    half: usize,
    name: &str,
    cells: [u32; 3],
) {
    let first = offset_face(base, face);
    let closing = [first[1], first[0]];
    for k in 0..4 {
        let mut bottom = first.map(|v| v + k);
        if k == 3 {
            bottom[2] = closing[0];
            bottom[3] = closing[1];
        }
        model.push_block(shifted(bottom, half), name, cells);
    }
}

/// Central square block of a 3D solid pellet or cap.
pub fn push_square_block(model: &mut BlockMeshModel, base: VertexId, half: usize, name: &str, cells: [u32; 3]) {
    model.push_block(shifted(offset_face(base, [0, 1, 2, 3]), half), name, cells);
}

/// 3D pellet: optional square, then four quadrant blocks per radial band.
pub fn push_solid_pellet_blocks(
    model: &mut BlockMeshModel,
    base: VertexId,
    half: usize,
    pellet: &Pellet,
    bands: &[Band],
) {
    let side = quadrant_cells(pellet.cells.azimuthal);
    let (name, cells_z) = (pellet.name.as_str(), pellet.cells.axial);
    if pellet.has_square(GeometryMode::ThreeD) {
        push_square_block(model, base, half, name, [side, side, cells_z]);
    }
    for (k, band) in bands.iter().enumerate() {
        let ring = 4 * k;
        push_quadrant_blocks(
            model,
            base,
            [ring, ring + 4, ring + 5, ring + 1],
            half,
            name,
            [band.cells, side, cells_z],
        );
    }
}

/// 3D cladding: for caps the square and square-to-tube blocks, then the tube wall.
pub fn push_clad_blocks(model: &mut BlockMeshModel, base: VertexId, half: usize, block: &CladBlock) {
    let side = quadrant_cells(block.cells_azimuthal);
    let wall = if let Some(cap) = block.cap {
        push_square_block(model, base, half, &block.name, [side, side, block.cells_z]);
        push_quadrant_blocks(
            model,
            base,
            [0, 4, 5, 1],
            half,
            &block.name,
            [cap.cells_r_inner - side, side, block.cells_z],
        );
        [4, 8, 9, 5]
    } else {
        [0, 4, 5, 1]
    };
    push_quadrant_blocks(
        model,
        base,
        wall,
        half,
        &block.name,
        [block.cells_r, side, block.cells_z],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rod::fixtures;
    use crate::rod::shape::SurfaceRole;

    #[test]
    fn quadrant_blocks_wrap_to_the_first_ring_position() {
        let mut model = BlockMeshModel::new(1.0);
        push_quadrant_blocks(&mut model, 100, [0, 4, 5, 1], 12, "fuel", [3, 4, 10]);
        assert_eq!(model.blocks.len(), 4);
        assert_eq!(model.blocks[0].vertices, [100, 104, 105, 101, 112, 116, 117, 113]);
        assert_eq!(model.blocks[1].vertices, [101, 105, 106, 102, 113, 117, 118, 114]);
        assert_eq!(model.blocks[3].vertices, [103, 107, 104, 100, 115, 119, 116, 112]);
    }

    #[test]
    fn discrete_pellet_steps_two_vertices_per_band() {
        let mut model = BlockMeshModel::new(1.0);
        let bands = [
            Band { cells: 4, role: SurfaceRole::Recessed },
            Band { cells: 6, role: SurfaceRole::Contact },
        ];
        push_discrete_pellet_blocks(&mut model, 8, 6, "fuel", &bands, 12);
        assert_eq!(model.blocks[0].vertices, [8, 10, 11, 9, 14, 16, 17, 15]);
        assert_eq!(model.blocks[1].vertices, [10, 12, 13, 11, 16, 18, 19, 17]);
        assert_eq!(model.blocks[1].cells, [6, 1, 12]);
    }

    #[test]
    fn solid_pellet_square_uses_quarter_azimuthal_cells() {
        let mut model = BlockMeshModel::new(1.0);
        let mut pellet = fixtures::flat_pellet(0.0);
        pellet.cells.azimuthal = 18;
        pellet.cells.axial = 10;
        let bands = [Band { cells: 6, role: SurfaceRole::Contact }];
        push_solid_pellet_blocks(&mut model, 0, 8, &pellet, &bands);
        assert_eq!(model.blocks.len(), 5);
        assert_eq!(model.blocks[0].vertices, [0, 1, 2, 3, 8, 9, 10, 11]);
        assert_eq!(model.blocks[0].cells, [5, 5, 10]);
        assert_eq!(model.blocks[1].cells, [6, 5, 10]);
    }

    #[test]
    fn wedge_cap_block_collapses_onto_the_axis() {
        let mut model = BlockMeshModel::new(1.0);
        push_wedge_block(&mut model, 20, "cladding", 3, 5);
        push_wedge_cap_block(&mut model, 20, "cladding", 7, 5);
        assert_eq!(model.blocks[0].vertices, [20, 22, 23, 21, 24, 26, 27, 25]);
        assert_eq!(model.blocks[1].vertices, [28, 20, 21, 28, 29, 24, 25, 29]);
        assert_eq!(model.blocks[1].cells, [7, 1, 5]);
    }
}
