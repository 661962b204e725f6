//! Small, valid rods shared by the unit tests.

use super::layout::{
    Cap, CapEnd, Chamfer, CladBlock, Dish, Eccentricity, FuelSegment, GeometryMode, Pellet,
    PelletCells, RodLayout, WedgeBlock,
};

pub fn flat_pellet(r_inner: f64) -> Pellet {
    Pellet {
        name: "fuel".into(),
        r_inner,
        r_outer: 0.004,
        height: 0.01,
        dish: None,
        chamfer: None,
        square_fraction: 0.5,
        cells: PelletCells {
            radial: 12,
            dish: 0,
            chamfer: 0,
            axial: 20,
            azimuthal: 16,
        },
    }
}

pub fn dished_pellet(r_inner: f64) -> Pellet {
    Pellet {
        dish: Some(Dish {
            radius: 0.002,
            curvature: 0.01,
        }),
        cells: PelletCells {
            dish: 6,
            ..flat_pellet(r_inner).cells
        },
        ..flat_pellet(r_inner)
    }
}

pub fn chamfered_pellet(r_inner: f64) -> Pellet {
    Pellet {
        chamfer: Some(Chamfer {
            width: 0.0005,
            height: 0.0002,
        }),
        cells: PelletCells {
            chamfer: 2,
            ..flat_pellet(r_inner).cells
        },
        ..flat_pellet(r_inner)
    }
}

pub fn dished_chamfered_pellet(r_inner: f64) -> Pellet {
    Pellet {
        chamfer: chamfered_pellet(r_inner).chamfer,
        cells: PelletCells {
            chamfer: 2,
            ..dished_pellet(r_inner).cells
        },
        ..dished_pellet(r_inner)
    }
}

pub fn clad_block(cap: Option<CapEnd>) -> CladBlock {
    CladBlock {
        name: "cladding".into(),
        r_inner: 0.0041,
        r_outer: 0.0048,
        height: 0.01,
        cells_r: 4,
        cells_z: 20,
        cells_azimuthal: 16,
        cap: cap.map(|end| Cap {
            end,
            cells_r_inner: 8,
            square_fraction: 0.5,
        }),
    }
}

pub fn wedge_block(r_inner: f64, r_outer: f64, name: &str) -> WedgeBlock {
    WedgeBlock {
        name: name.into(),
        r_inner,
        r_outer,
        height: 0.1,
        cells_r: 10,
        cells_z: 50,
    }
}

/// One smeared fuel block inside one cladding block.
pub fn smeared_layout(mode: GeometryMode) -> RodLayout {
    let mut clad = clad_block(None);
    clad.height = 0.1;
    RodLayout {
        mode,
        wedge_angle: 5f64.to_radians(),
        convert_to_meters: 1.0,
        fuel_offset: 0.0,
        clad_offset: 0.0,
        fuel: vec![FuelSegment::Wedge(wedge_block(0.0, 0.004, "fuel"))],
        clad: vec![clad],
        merge_fuel: true,
        merge_clad: true,
        eccentricity: Eccentricity::Centred,
    }
}

/// `count` identical pellets inside `count` cladding blocks of the same height.
pub fn pellet_layout(mode: GeometryMode, pellet: &Pellet, count: usize) -> RodLayout {
    RodLayout {
        mode,
        wedge_angle: 5f64.to_radians(),
        convert_to_meters: 1.0,
        fuel_offset: 0.0,
        clad_offset: 0.0,
        fuel: (0..count).map(|_| FuelSegment::Pellet(pellet.clone())).collect(),
        clad: (0..count).map(|_| clad_block(None)).collect(),
        merge_fuel: true,
        merge_clad: true,
        eccentricity: Eccentricity::Centred,
    }
}

/// Adds a bottom and a top cap below and above the cladding tube.
pub fn with_caps(mut layout: RodLayout) -> RodLayout {
    let mut bottom = clad_block(Some(CapEnd::Bottom));
    let mut top = clad_block(Some(CapEnd::Top));
    bottom.height = 0.002;
    top.height = 0.002;
    layout.clad_offset = -bottom.height;
    layout.clad.insert(0, bottom);
    layout.clad.push(top);
    layout
}
