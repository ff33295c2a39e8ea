//! # cube-lut
//!
//! Reader and writer for the DaVinci Resolve `.cube` LUT format.
//!
//! The Resolve dialect extends the plain `.cube` layout with a
//! combined mode: one file can carry a 1D shaper table, a 3D cube
//! table, or both, where the shaper runs as a pre-transform ahead of
//! the cube.
//!
//! # LUT Types
//!
//! - [`Shaper`] - 1-dimensional table of RGB triples
//! - [`Cube`] - 3-dimensional grid, stored r-fastest like the file
//! - [`ShaperCube`] - the combined two-stage pair
//! - [`Lut`] - closed sum over the three shapes a file can hold
//!
//! # Usage
//!
//! ```rust,ignore
//! use cube_lut::{resolve, Cube, Lut};
//!
//! // Read whatever the file declares
//! let lut = resolve::read("grade.cube")?;
//!
//! // Write an identity cube
//! resolve::write("identity.cube", &Lut::Cube(Cube::identity(33)))?;
//! ```
//!
//! # Data ordering
//!
//! Cube rows are flattened in axis-major order: the red grid index
//! varies fastest, the blue index slowest. [`Cube`] stores its data in
//! that same order and exposes the index mapping explicitly.
//!
//! # Dependencies
//!
//! - [`thiserror`] - Error handling

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod cube;
mod domain;
mod error;
mod sequence;
mod shaper;
pub mod resolve;

pub use cube::{Cube, CUBE_MAX_SIZE, CUBE_MIN_SIZE};
pub use domain::Domain;
pub use error::{LutError, LutResult};
pub use sequence::{Lut, ShaperCube};
pub use shaper::{Shaper, SHAPER_MAX_SIZE, SHAPER_MIN_SIZE};
pub use resolve::{read, write, write_with_decimals, DEFAULT_DECIMALS};
