//! Mesh slicing engine for mask photopolymerization printers: plane
//! intersection, contour stitching, layer rasterization and print
//! estimation. The [`slicer::Slicer`] struct drives the whole pipeline.

use nalgebra::Vector3;

pub mod contour;
pub mod error;
pub mod mesh;
pub mod plan;
pub mod raster;
pub mod segments;
pub mod slicer;
pub mod transform;

pub type Pos = Vector3<f32>;
