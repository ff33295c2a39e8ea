//! 3-dimensional cube table.
//!
//! A cube maps an RGB input triple to an RGB output triple through a
//! cubic grid of side `size`. The grid is stored flat in the same
//! axis-major order the `.cube` file uses: the red index varies
//! fastest, the blue index slowest.

use crate::{Domain, LutError, LutResult};

/// Smallest cube size the format accepts.
pub const CUBE_MIN_SIZE: usize = 2;
/// Largest cube size the format accepts.
pub const CUBE_MAX_SIZE: usize = 256;

/// A 3-dimensional lookup table.
///
/// # Structure
///
/// - `size³` entries, each an output `[R, G, B]` triple
/// - Flat storage in r-fastest order: `index(r, g, b) = r + g*size + b*size²`
/// - One shared input domain for all channels
///
/// # Example
///
/// ```rust
/// use cube_lut::Cube;
///
/// let cube = Cube::identity(17);
/// assert_eq!(cube.get(16, 0, 0), [1.0, 0.0, 0.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    /// Grid entries, r-fastest
    pub data: Vec<[f32; 3]>,
    /// Grid side length
    pub size: usize,
    /// Input domain
    pub domain: Domain,
    /// Display name
    pub name: String,
    /// Comment lines, without the leading `#`
    pub comments: Vec<String>,
}

impl Cube {
    /// Creates an identity (pass-through) cube over the [0, 1] domain.
    ///
    /// # Panics
    ///
    /// Panics if `size` is below [`CUBE_MIN_SIZE`].
    pub fn identity(size: usize) -> Self {
        assert!(size >= CUBE_MIN_SIZE, "cube size must be at least 2");
        let mut data = Vec::with_capacity(size * size * size);
        let n = (size - 1) as f32;
        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    data.push([r as f32 / n, g as f32 / n, b as f32 / n]);
                }
            }
        }
        Self {
            data,
            size,
            domain: Domain::default(),
            name: String::new(),
            comments: Vec::new(),
        }
    }

    /// Creates a cube from flat rows in r-fastest order.
    ///
    /// Fails if the row count is not exactly `size³`, or if `size` is
    /// so large that `size³` does not fit in `usize`.
    pub fn from_rows(rows: Vec<[f32; 3]>, size: usize) -> LutResult<Self> {
        let expected = size
            .checked_mul(size)
            .and_then(|n| n.checked_mul(size))
            .ok_or(LutError::SizeOutOfRange {
                stage: "cube",
                size,
                min: CUBE_MIN_SIZE,
                max: CUBE_MAX_SIZE,
            })?;
        if rows.len() != expected {
            return Err(LutError::TableSizeMismatch {
                expected,
                found: rows.len(),
            });
        }
        Ok(Self {
            data: rows,
            size,
            domain: Domain::default(),
            name: String::new(),
            comments: Vec::new(),
        })
    }

    /// Sets the input domain.
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the comment lines.
    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }

    /// Returns the flat index for a grid position (r, g, b).
    #[inline]
    pub fn index(&self, r: usize, g: usize, b: usize) -> usize {
        r + self.size * (g + self.size * b)
    }

    /// Returns the grid position (r, g, b) for a flat index.
    ///
    /// Inverse of [`index`](Self::index): `r = i % size`,
    /// `g = (i / size) % size`, `b = i / size²`.
    #[inline]
    pub fn coords(&self, i: usize) -> (usize, usize, usize) {
        (
            i % self.size,
            (i / self.size) % self.size,
            i / (self.size * self.size),
        )
    }

    /// Gets the value at grid position (r, g, b).
    #[inline]
    pub fn get(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        self.data[self.index(r, g, b)]
    }

    /// Sets the value at grid position (r, g, b).
    #[inline]
    pub fn set(&mut self, r: usize, g: usize, b: usize, rgb: [f32; 3]) {
        let i = self.index(r, g, b);
        self.data[i] = rgb;
    }

    /// Returns the total number of entries in the grid.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.size * self.size * self.size
    }
}
