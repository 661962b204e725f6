//! OpenFOAM `blockMeshDict` text writer.

use std::fmt::{self, Display, Formatter};

use crate::geom::Point3;
use crate::rod::{BlockMeshModel, Face, Patch, PatchKind, Sphere};

const HEADER: &str = r"
/*--------------------------------*- C++ -*----------------------------------*\
| ========                 |                                                 |
| \      /  F ield         | OpenFOAM: The Open Source CFD Toolbox           |
|  \    /   O peration     | Version:  5.0                                   |
|   \  /    A nd           | Web:      www.OpenFOAM.org                      |
|    \/     M anipulation  |                                                 |
\*---------------------------------------------------------------------------*/
FoamFile
{
    version     5.0;
    format      ascii;
    class       dictionary;
    object      blockMeshDict;
}
// * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * //
";

/// Coordinates closer to zero than this are written as `0`.
const ZERO_SNAP: f64 = 1e-15;

/// Patches whose coupling weights are recomputed when the gap moves.
const AMI_PATCHES: [&str; 2] = ["fuelOuter", "cladInner"];

/// Borrowing view that renders a [`BlockMeshModel`] as a dictionary.
///
/// Sections follow the blockMesh grammar: geometry, vertices, blocks, edges,
/// faces, boundary, mergePatchPairs. Empty optional sections are omitted.
#[derive(Debug, Clone, Copy)]
pub struct BlockMeshDict<'a> {
    model: &'a BlockMeshModel,
}

impl<'a> BlockMeshDict<'a> {
    #[must_use]
    pub const fn new(model: &'a BlockMeshModel) -> Self {
        Self { model }
    }
}

/// Renders the whole dictionary into a string.
#[must_use]
pub fn write_block_mesh_dict(model: &BlockMeshModel) -> String {
    BlockMeshDict::new(model).to_string()
}

struct Scalar(f64);

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let value = if self.0.abs() < ZERO_SNAP { 0.0 } else { self.0 };
        if value != 0.0 && value.abs() < 1e-4 {
            write!(f, "{value:e}")
        } else {
            write!(f, "{value}")
        }
    }
}

struct Coords(Point3);

impl Display for Coords {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.0.to_array();
        write!(f, "({} {} {})", Scalar(x), Scalar(y), Scalar(z))
    }
}

struct Indices<'a>(&'a [usize]);

impl Display for Indices<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

impl BlockMeshDict<'_> {
    fn geometry(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.model.spheres.is_empty() {
            return Ok(());
        }
        f.write_str("\ngeometry\n{\n")?;
        for (i, sphere) in self.model.spheres.iter().enumerate() {
            writeln!(f, "\n    {}\n    {{", Sphere::name(i))?;
            writeln!(f, "        type searchableSphere;")?;
            writeln!(f, "        centre {};", Coords(sphere.centre))?;
            writeln!(f, "        radius {};", Scalar(sphere.radius))?;
            writeln!(f, "    }}")?;
        }
        f.write_str("}\n")
    }

    fn vertices(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("\nvertices\n(\n")?;
        for point in self.model.vertices.as_slice() {
            writeln!(f, "    {}", Coords(*point))?;
        }
        f.write_str(");\n")
    }

    fn blocks(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("\nblocks\n(\n")?;
        for block in &self.model.blocks {
            let [nx, ny, nz] = block.cells;
            writeln!(
                f,
                "    hex ( {} ) {} ({nx} {ny} {nz}) simpleGrading (1 1 1)",
                Indices(&block.vertices),
                block.name
            )?;
        }
        f.write_str(");\n")
    }

    fn edges(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.model.edges.is_empty() {
            return Ok(());
        }
        f.write_str("\nedges\n(\n")?;
        for arc in &self.model.edges {
            writeln!(f, "    arc {} {} {}", arc.start, arc.end, Coords(arc.midpoint))?;
        }
        f.write_str(");\n")
    }

    fn faces(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.model.projections.is_empty() {
            return Ok(());
        }
        f.write_str("\nfaces\n(\n")?;
        for projection in &self.model.projections {
            writeln!(
                f,
                "    project ({}) {}",
                Indices(&projection.face),
                Sphere::name(projection.sphere)
            )?;
        }
        f.write_str(");\n")
    }

    fn boundary(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("\nboundary\n(\n")?;
        for patch in self.model.patches.iter() {
            write_patch(f, patch)?;
        }
        f.write_str(");\n")
    }

    fn merge_pairs(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("\nmergePatchPairs\n(\n")?;
        for pair in &self.model.merge_pairs {
            writeln!(f, "    ({} {})", pair.master, pair.slave)?;
        }
        f.write_str(");\n")
    }
}

fn write_patch(f: &mut Formatter<'_>, patch: &Patch) -> fmt::Result {
    writeln!(f, "    {}\n    {{", patch.name)?;
    writeln!(f, "        type {};", patch.kind.type_name())?;
    if let PatchKind::Coupled { neighbour, owner } = &patch.kind {
        writeln!(f, "        neighbourPatch {neighbour};")?;
        writeln!(f, "        neighbourRegion region0;")?;
        writeln!(f, "        owner {owner};")?;
        let update = AMI_PATCHES.contains(&patch.name.as_str());
        writeln!(f, "        updateAMI {update};")?;
    }
    f.write_str("        faces\n        (\n")?;
    for face in &patch.faces {
        write_face(f, face)?;
    }
    f.write_str("        );\n    }\n\n")
}

fn write_face(f: &mut Formatter<'_>, face: &Face) -> fmt::Result {
    writeln!(f, "            ({})", Indices(face))
}

impl Display for BlockMeshDict<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(HEADER)?;
        writeln!(
            f,
            "\nconvertToMeters {};\n",
            Scalar(self.model.convert_to_meters)
        )?;
        self.geometry(f)?;
        self.vertices(f)?;
        self.blocks(f)?;
        self.edges(f)?;
        self.faces(f)?;
        self.boundary(f)?;
        self.merge_pairs(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rod::{GeometryMode, fixtures, generate};

    fn section_offsets(text: &str, names: &[&str]) -> Vec<usize> {
        names
            .iter()
            .map(|name| {
                text.find(&format!("\n{name}\n"))
                    .unwrap_or_else(|| panic!("missing section {name}"))
            })
            .collect()
    }

    #[test]
    fn test_scalar_snaps_noise_and_uses_exponent_for_small_values() {
        assert_eq!(Scalar(2.4e-19).to_string(), "0");
        assert_eq!(Scalar(-0.0).to_string(), "0");
        assert_eq!(Scalar(0.004).to_string(), "0.004");
        assert_eq!(Scalar(5e-5).to_string(), "5e-5");
        assert_eq!(Scalar(1.0).to_string(), "1");
    }

    #[test]
    fn test_flat_wedge_omits_curved_sections() {
        let model = generate(&fixtures::smeared_layout(GeometryMode::OneD)).unwrap();
        let text = write_block_mesh_dict(&model);
        assert!(text.starts_with("\n/*---"));
        assert!(text.contains("object      blockMeshDict;"));
        assert!(!text.contains("\ngeometry\n"));
        assert!(!text.contains("\nedges\n"));
        assert!(!text.contains("\nfaces\n"));
        let offsets = section_offsets(&text, &["vertices", "blocks", "boundary", "mergePatchPairs"]);
        assert!(offsets.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(text.matches("simpleGrading (1 1 1)").count(), 2);
    }

    #[test]
    fn test_sections_follow_blockmesh_order() {
        let layout =
            fixtures::pellet_layout(GeometryMode::ThreeD, &fixtures::dished_pellet(0.0), 1);
        let model = generate(&layout).unwrap();
        let text = write_block_mesh_dict(&model);
        let offsets = section_offsets(
            &text,
            &["geometry", "vertices", "blocks", "edges", "faces", "boundary", "mergePatchPairs"],
        );
        assert!(offsets.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(text.contains("    sphere_0\n    {\n        type searchableSphere;"));
        assert_eq!(text.matches("    project (").count(), model.projections.len());
        assert_eq!(text.matches("    arc ").count(), model.edges.len());
    }

    #[test]
    fn test_coupled_patches_carry_partner_and_ami_flag() {
        let model = generate(&fixtures::smeared_layout(GeometryMode::TwoDSmeared)).unwrap();
        let text = write_block_mesh_dict(&model);
        let fuel_outer = text
            .split("\n    fuelOuter\n")
            .nth(1)
            .and_then(|rest| rest.split("\n    }\n").next())
            .unwrap();
        assert!(fuel_outer.contains("type regionCoupledOFFBEAT;"));
        assert!(fuel_outer.contains("neighbourPatch cladInner;"));
        assert!(fuel_outer.contains("neighbourRegion region0;"));
        assert!(fuel_outer.contains("updateAMI true;"));
    }

    #[test]
    fn test_merge_pairs_are_listed_master_first() {
        let layout = fixtures::pellet_layout(GeometryMode::TwoDDiscrete, &fixtures::flat_pellet(0.0), 2);
        let model = generate(&layout).unwrap();
        let text = write_block_mesh_dict(&model);
        for pair in &model.merge_pairs {
            assert!(text.contains(&format!("    ({} {})\n", pair.master, pair.slave)));
        }
        assert!(!model.merge_pairs.is_empty());
        assert!(text.ends_with(");\n"));
    }
}
