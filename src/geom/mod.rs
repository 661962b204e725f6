mod core;

pub use core::{Point3, Tolerance, Vec3};
