//! Two-stage shaper + cube sequence and the closed LUT sum type.

use crate::{Cube, Shaper};

/// A two-stage transform: a 1D shaper applied before a 3D cube.
///
/// This is the combined form a `.cube` file takes when it carries both
/// a `LUT_1D_SIZE` and a `LUT_3D_SIZE` block.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaperCube {
    /// The pre-transform stage.
    pub shaper: Shaper,
    /// The main cube stage.
    pub cube: Cube,
}

impl ShaperCube {
    /// Creates a sequence from its two stages.
    pub fn new(shaper: Shaper, cube: Cube) -> Self {
        Self { shaper, cube }
    }
}

/// Any LUT a Resolve `.cube` file can hold.
///
/// The reader returns one of these three shapes depending on which
/// size directives the file declares, and the writer accepts exactly
/// these three shapes. There is no other valid combination in the
/// format.
#[derive(Debug, Clone, PartialEq)]
pub enum Lut {
    /// Standalone 1D shaper (`LUT_1D_SIZE` only).
    Shaper(Shaper),
    /// Standalone 3D cube (`LUT_3D_SIZE` only).
    Cube(Cube),
    /// Combined shaper + cube (both directives present).
    Sequence(ShaperCube),
}

impl Lut {
    /// Returns the display name used as the file title.
    ///
    /// For a sequence this is the cube stage's name, matching the
    /// title the writer emits.
    pub fn name(&self) -> &str {
        match self {
            Lut::Shaper(s) => &s.name,
            Lut::Cube(c) => &c.name,
            Lut::Sequence(sc) => &sc.cube.name,
        }
    }
}

impl From<Shaper> for Lut {
    fn from(shaper: Shaper) -> Self {
        Lut::Shaper(shaper)
    }
}

impl From<Cube> for Lut {
    fn from(cube: Cube) -> Self {
        Lut::Cube(cube)
    }
}

impl From<ShaperCube> for Lut {
    fn from(seq: ShaperCube) -> Self {
        Lut::Sequence(seq)
    }
}
