//! Adaptive octree **signed distance fields** over closed triangle meshes.
//!
//! [`LevelsetOctree::construct`] subdivides the enlarged bounding box of a
//! mesh wherever triangles are near, stitches every cell corner into a
//! shared [point network](network), tiles the domain with tetrahedra and
//! resolves one signed distance per network vertex. Queries then locate the
//! containing tetrahedron and interpolate barycentrically, which gives a
//! continuous field that is negative inside the surface.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon for the resolution pass and batch queries

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod config;
pub mod errors;
pub mod float_types;
pub mod mesh;
pub mod network;
pub mod octree;
pub mod resolve;
pub mod triangle;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use config::{OctreeConfig, VertexNormalWeighting};
pub use errors::{SdfError, SdfResult};
pub use mesh::IndexedMesh;
pub use octree::{BuildReport, DistanceQuery, LevelsetOctree};
