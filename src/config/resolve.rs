//! Turns a [`RodConfig`] into the ordered segment lists of a [`RodLayout`].

use log::{debug, warn};

use crate::error::{RodMeshError, RodMeshResult, SegmentRef};
use crate::geom::Vec3;
use crate::rod::{
    Cap, CapEnd, Chamfer, CladBlock, Dish, Eccentricity, FuelSegment, GeometryMode, Pellet,
    PelletCells, RodLayout, WedgeBlock,
};

use super::{EccentricityMode, RodConfig};

/// Name given to inserted end caps.
const CAP_NAME: &str = "cladding";

fn required<'a, T>(value: Option<&'a T>, key: &str, mode: GeometryMode) -> RodMeshResult<&'a T> {
    value.ok_or_else(|| {
        RodMeshError::config(key, format!("is required for {} geometry", mode.label()))
    })
}

/// Per-block array with its length checked against the block count.
fn per_block<'a, T>(values: &'a [T], key: &str, count: usize, count_key: &str) -> RodMeshResult<&'a [T]> {
    if values.len() == count {
        Ok(values)
    } else {
        Err(RodMeshError::config(
            key,
            format!("has {} entries but {count_key} is {count}", values.len()),
        ))
    }
}

impl RodConfig {
    fn fuel_array<'a, T>(&self, values: &'a [T], key: &str) -> RodMeshResult<&'a [T]> {
        per_block(values, key, self.n_blocks_fuel, "nBlocksFuel")
    }

    fn fuel_option<'a, T>(&self, values: Option<&'a Vec<T>>, key: &str) -> RodMeshResult<&'a [T]> {
        let values = required(values, key, self.geometry_type)?;
        self.fuel_array(values, key)
    }

    fn clad_array<'a, T>(&self, values: &'a [T], key: &str) -> RodMeshResult<&'a [T]> {
        per_block(values, key, self.n_blocks_clad, "nBlocksClad")
    }

    /// Resolves the configuration into a validated layout.
    ///
    /// Pellet blocks expand into `nPelletsFuel` identical pellets and end caps
    /// are inserted around the cladding stack.
    ///
    /// # Errors
    /// Returns a configuration error for missing, mis-sized or contradictory
    /// parameters.
    pub fn resolve(&self) -> RodMeshResult<RodLayout> {
        let mode = self.geometry_type;
        let wedge_angle = if mode.is_wedge() {
            required(self.wedge_angle.as_ref(), "wedgeAngle", mode)?.to_radians()
        } else {
            0.0
        };

        let fuel = if mode.is_smeared() {
            self.smeared_fuel()?
        } else {
            self.pellets()?
        };
        let (clad, clad_offset) = self.cladding()?;

        let layout = RodLayout {
            mode,
            wedge_angle,
            convert_to_meters: self.convert_to_meters,
            fuel_offset: self.offset_fuel,
            clad_offset,
            eccentricity: self.eccentricity_for(fuel.len())?,
            fuel,
            clad,
            merge_fuel: self.merge_fuel_patch_pairs,
            merge_clad: self.merge_clad_patch_pairs,
        };
        layout.validate()?;
        debug!(
            "resolved {} rod: {} fuel segments, {} cladding blocks",
            mode.label(),
            layout.fuel.len(),
            layout.clad.len()
        );
        Ok(layout)
    }

    fn smeared_fuel(&self) -> RodMeshResult<Vec<FuelSegment>> {
        let names = self.fuel_array(&self.block_name_fuel, "blockNameFuel")?;
        let r_inner = self.fuel_array(&self.r_inner_fuel, "rInnerFuel")?;
        let r_outer = self.fuel_array(&self.r_outer_fuel, "rOuterFuel")?;
        let height = self.fuel_array(&self.height_fuel, "heightFuel")?;
        let cells_r = self.fuel_option(self.n_cell_fuel_r.as_ref(), "nCellFuelR")?;
        let cells_z = self.fuel_option(self.n_cell_fuel_z.as_ref(), "nCellFuelZ")?;

        Ok((0..self.n_blocks_fuel)
            .map(|i| {
                FuelSegment::Wedge(WedgeBlock {
                    name: names[i].clone(),
                    r_inner: r_inner[i],
                    r_outer: r_outer[i],
                    height: height[i],
                    cells_r: cells_r[i],
                    cells_z: cells_z[i],
                })
            })
            .collect())
    }

    fn pellets(&self) -> RodMeshResult<Vec<FuelSegment>> {
        let mode = self.geometry_type;
        let names = self.fuel_array(&self.block_name_fuel, "blockNameFuel")?;
        let r_inner = self.fuel_array(&self.r_inner_fuel, "rInnerFuel")?;
        let r_outer = self.fuel_array(&self.r_outer_fuel, "rOuterFuel")?;
        let height = self.fuel_array(&self.height_fuel, "heightFuel")?;
        let counts = self.fuel_option(self.n_pellets_fuel.as_ref(), "nPelletsFuel")?;
        let r_dish = self.fuel_option(self.r_dish_fuel.as_ref(), "rDishFuel")?;
        let curvature = self.fuel_option(self.r_curvature_dish.as_ref(), "rCurvatureDish")?;
        let chamfer_height = self.fuel_option(self.chamfer_height.as_ref(), "chamferHeight")?;
        let chamfer_width = self.fuel_option(self.chamfer_width.as_ref(), "chamferWidth")?;
        let cells_r = self.fuel_option(self.n_cells_r_pellet.as_ref(), "nCellsRPellet")?;
        let cells_z = self.fuel_option(self.n_cells_z_pellet.as_ref(), "nCellsZPellet")?;
        let cells_dish = self.optional_cells(self.n_cells_r_dish.as_ref(), "nCellsRDish")?;
        let cells_chamfer = self.optional_cells(self.n_cells_r_chamfer.as_ref(), "nCellsRChamfer")?;
        let cells_land = self.optional_cells(self.n_cells_r_land.as_ref(), "nCellsRLand")?;
        let (square, azimuthal) = if mode == GeometryMode::ThreeD {
            (
                self.fuel_option(self.square_fraction.as_ref(), "squareFraction")?,
                self.fuel_option(self.n_cells_azimuthal_fuel.as_ref(), "nCellsAzimuthalFuel")?,
            )
        } else {
            (&[][..], &[][..])
        };

        let mut fuel = Vec::new();
        for i in 0..self.n_blocks_fuel {
            if counts[i] == 0 {
                return Err(RodMeshError::config(
                    "nPelletsFuel",
                    format!("block {} must hold at least one pellet", i + 1),
                ));
            }
            let at = SegmentRef::fuel(fuel.len() + 1);
            for (value, key) in [
                (r_dish[i], "rDishFuel"),
                (curvature[i], "rCurvatureDish"),
                (chamfer_width[i], "chamferWidth"),
                (chamfer_height[i], "chamferHeight"),
            ] {
                non_negative(value, key, at)?;
            }
            let dish = (r_dish[i] > 0.0).then_some(Dish {
                radius: r_dish[i],
                curvature: curvature[i],
            });
            let chamfer = (chamfer_width[i] > 0.0).then_some(Chamfer {
                width: chamfer_width[i],
                height: chamfer_height[i],
            });
            let cells = PelletCells {
                radial: cells_r[i],
                dish: cells_dish.map_or(0, |cells| cells[i]),
                chamfer: cells_chamfer.map_or(0, |cells| cells[i]),
                axial: cells_z[i],
                azimuthal: azimuthal.get(i).copied().unwrap_or(0),
            };
            let pellet = Pellet {
                name: names[i].clone(),
                r_inner: r_inner[i],
                r_outer: r_outer[i],
                height: height[i] / counts[i] as f64,
                dish,
                chamfer,
                square_fraction: square.get(i).copied().unwrap_or(0.0),
                cells,
            };
            if let Some(land) = cells_land.map(|cells| cells[i]) {
                check_land_cells(&pellet, land, at)?;
            }
            fuel.extend(std::iter::repeat_n(FuelSegment::Pellet(pellet), counts[i]));
        }
        Ok(fuel)
    }

    fn optional_cells<'a>(&self, values: Option<&'a Vec<u32>>, key: &str) -> RodMeshResult<Option<&'a [u32]>> {
        values.map(|values| self.fuel_array(values, key)).transpose()
    }

    /// Cladding blocks bottom to top with caps inserted, plus the stack offset.
    fn cladding(&self) -> RodMeshResult<(Vec<CladBlock>, f64)> {
        let mode = self.geometry_type;
        let names = self.clad_array(&self.block_name_clad, "blockNameClad")?;
        let r_inner = self.clad_array(&self.r_inner_clad, "rInnerClad")?;
        let r_outer = self.clad_array(&self.r_outer_clad, "rOuterClad")?;
        let height = self.clad_array(&self.height_clad, "heightClad")?;
        let cells_r = self.clad_array(&self.n_cells_r_clad, "nCellsRClad")?;
        let cells_z = self.clad_array(&self.n_cells_z_clad, "nCellsZClad")?;
        let azimuthal = if mode == GeometryMode::ThreeD {
            let values = required(self.n_cells_azimuthal_clad.as_ref(), "nCellsAzimuthalClad", mode)?;
            self.clad_array(values, "nCellsAzimuthalClad")?
        } else {
            &[][..]
        };

        let mut clad: Vec<CladBlock> = (0..self.n_blocks_clad)
            .map(|i| CladBlock {
                name: names[i].clone(),
                r_inner: r_inner[i],
                r_outer: r_outer[i],
                height: height[i],
                cells_r: cells_r[i],
                cells_z: cells_z[i],
                cells_azimuthal: azimuthal.get(i).copied().unwrap_or(0),
                cap: None,
            })
            .collect();

        let mut offset = self.offset_clad;
        if mode == GeometryMode::OneD {
            if self.bottom_cap_height > 0.0 || self.top_cap_height > 0.0 {
                warn!("end caps are ignored in 1D geometry");
            }
            return Ok((clad, offset));
        }
        if self.bottom_cap_height > 0.0 {
            if let Some(first) = clad.first() {
                let cap = self.cap_block(first, CapEnd::Bottom)?;
                offset -= cap.height;
                clad.insert(0, cap);
            }
        }
        if self.top_cap_height > 0.0 {
            if let Some(last) = clad.last() {
                let cap = self.cap_block(last, CapEnd::Top)?;
                clad.push(cap);
            }
        }
        Ok((clad, offset))
    }

    /// End cap inheriting the radii and cell counts of its neighbouring block.
    fn cap_block(&self, neighbour: &CladBlock, end: CapEnd) -> RodMeshResult<CladBlock> {
        let mode = self.geometry_type;
        let (height, cells_r_inner, cells_z, fraction, fraction_key) = match end {
            CapEnd::Bottom => (
                self.bottom_cap_height,
                required(self.n_cells_r_bottom_cap.as_ref(), "nCellsRBottomCap", mode)?,
                required(self.n_cells_z_bottom_cap.as_ref(), "nCellsZBottomCap", mode)?,
                self.square_fraction_bottom_cap,
                "squareFractionBottomCap",
            ),
            CapEnd::Top => (
                self.top_cap_height,
                required(self.n_cells_r_top_cap.as_ref(), "nCellsRTopCap", mode)?,
                required(self.n_cells_z_top_cap.as_ref(), "nCellsZTopCap", mode)?,
                self.square_fraction_top_cap,
                "squareFractionTopCap",
            ),
        };
        // Only 3D caps mesh a central square.
        let square_fraction = match fraction {
            Some(value) => value,
            None if mode == GeometryMode::ThreeD => {
                return Err(RodMeshError::config(fraction_key, "is required for 3D end caps"));
            }
            None => 0.5,
        };
        Ok(CladBlock {
            name: CAP_NAME.to_owned(),
            height,
            cells_z: *cells_z,
            cap: Some(Cap {
                end,
                cells_r_inner: *cells_r_inner,
                square_fraction,
            }),
            ..neighbour.clone()
        })
    }

    fn eccentricity_for(&self, pellets: usize) -> RodMeshResult<Eccentricity> {
        if !self.eccentricity {
            return Ok(Eccentricity::Centred);
        }
        if self.geometry_type != GeometryMode::ThreeD {
            warn!(
                "eccentricity is ignored in {} geometry",
                self.geometry_type.label()
            );
            return Ok(Eccentricity::Centred);
        }
        match self.eccentricity_mode {
            EccentricityMode::Default => Ok(Eccentricity::Random {
                seed: self.eccentricity_seed,
            }),
            EccentricityMode::Manual => {
                let vector = self.eccentricity_vector.as_ref().ok_or_else(|| {
                    RodMeshError::config(
                        "eccentricity_vector",
                        format!("needs one [x, y] offset for each of the {pellets} pellets"),
                    )
                })?;
                Ok(Eccentricity::Manual(
                    vector.iter().map(|&[x, y]| Vec3::planar(x, y)).collect(),
                ))
            }
        }
    }
}

/// Zero switches a dish or chamfer off; negative sizes are rejected.
fn non_negative(value: f64, key: &str, at: SegmentRef) -> RodMeshResult<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(RodMeshError::config_at(at, key, format!("{value} must not be negative")))
    }
}

/// `nCellsRLand` must match the cells left over by dish and chamfer.
fn check_land_cells(pellet: &Pellet, land: u32, at: SegmentRef) -> RodMeshResult<()> {
    let shape = pellet.shape();
    let dish = if shape.is_dished() { pellet.cells.dish } else { 0 };
    let chamfer = if shape.is_chamfered() { pellet.cells.chamfer } else { 0 };
    let expected = i64::from(pellet.cells.radial) - i64::from(dish) - i64::from(chamfer);
    if i64::from(land) == expected {
        Ok(())
    } else {
        Err(RodMeshError::config_at(
            at,
            "nCellsRLand",
            format!(
                "{land} does not match nCellsRPellet - nCellsRDish - nCellsRChamfer = {expected}"
            ),
        ))
    }
}
