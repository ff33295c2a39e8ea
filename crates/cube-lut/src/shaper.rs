//! 1-dimensional shaper table.
//!
//! A shaper maps a single input value per channel to an output RGB
//! triple. In `.cube` files it appears either standalone
//! (`LUT_1D_SIZE` only) or as a pre-transform ahead of a 3D cube.

use crate::Domain;

/// Smallest shaper size the format accepts.
pub const SHAPER_MIN_SIZE: usize = 2;
/// Largest shaper size the format accepts.
pub const SHAPER_MAX_SIZE: usize = 65536;

/// A 1-dimensional lookup table of RGB triples.
///
/// # Structure
///
/// - `size()` rows, each an output `[R, G, B]` triple
/// - One shared input domain for all channels
/// - Free-text comment lines carried verbatim
///
/// # Example
///
/// ```rust
/// use cube_lut::Shaper;
///
/// let shaper = Shaper::identity(1024);
/// assert_eq!(shaper.size(), 1024);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Shaper {
    /// Table rows in input order
    pub table: Vec<[f32; 3]>,
    /// Input domain
    pub domain: Domain,
    /// Display name
    pub name: String,
    /// Comment lines, without the leading `#`
    pub comments: Vec<String>,
}

impl Shaper {
    /// Creates a shaper from raw rows.
    pub fn new(table: Vec<[f32; 3]>, name: impl Into<String>) -> Self {
        Self {
            table,
            domain: Domain::default(),
            name: name.into(),
            comments: Vec::new(),
        }
    }

    /// Creates an identity (pass-through) shaper over the [0, 1] domain.
    ///
    /// # Panics
    ///
    /// Panics if `size` is below [`SHAPER_MIN_SIZE`].
    pub fn identity(size: usize) -> Self {
        Self::linear_table(size, Domain::default())
    }

    /// Creates a linear ramp spanning the given domain.
    ///
    /// Row `i` holds `min + i / (size - 1) * (max - min)` on every
    /// channel, so applying the table is a no-op over that domain.
    ///
    /// # Panics
    ///
    /// Panics if `size` is below [`SHAPER_MIN_SIZE`].
    pub fn linear_table(size: usize, domain: Domain) -> Self {
        assert!(size >= SHAPER_MIN_SIZE, "shaper size must be at least 2");
        let table = (0..size)
            .map(|i| {
                let t = i as f32 / (size - 1) as f32;
                [
                    domain.min[0] + t * (domain.max[0] - domain.min[0]),
                    domain.min[1] + t * (domain.max[1] - domain.min[1]),
                    domain.min[2] + t * (domain.max[2] - domain.min[2]),
                ]
            })
            .collect();
        Self {
            table,
            domain,
            name: String::new(),
            comments: Vec::new(),
        }
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

    /// Returns the number of rows in the table.
    #[inline]
    pub fn size(&self) -> usize {
        self.table.len()
    }
}
