//! Input domain of a LUT stage.

/// Per-channel input range of a LUT table.
///
/// The `.cube` format can only express a domain where all three
/// channels share the same two endpoints, written as a single
/// `<min> <max>` pair on an `*_INPUT_RANGE` line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    /// Input domain minimum (per channel)
    pub min: [f32; 3],
    /// Input domain maximum (per channel)
    pub max: [f32; 3],
}

impl Default for Domain {
    fn default() -> Self {
        Self {
            min: [0.0, 0.0, 0.0],
            max: [1.0, 1.0, 1.0],
        }
    }
}

impl Domain {
    /// Creates a domain with the same endpoints on all channels.
    pub fn uniform(min: f32, max: f32) -> Self {
        Self {
            min: [min, min, min],
            max: [max, max, max],
        }
    }

    /// Returns true for the implicit [0, 1] domain, which the writer
    /// does not emit a range line for.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Returns the shared (min, max) endpoints if the domain is
    /// uniform across channels, `None` otherwise.
    ///
    /// Uniform here means all three channels share a single minimum
    /// and all three share a single maximum, with the two distinct.
    /// A domain where only two scalar values appear but mixed across
    /// the min and max slots is still rejected: it cannot be written
    /// as one `<min> <max>` pair.
    pub fn endpoints(&self) -> Option<(f32, f32)> {
        let [min, m1, m2] = self.min;
        let [max, x1, x2] = self.max;
        if min == m1 && min == m2 && max == x1 && max == x2 && min != max {
            Some((min, max))
        } else {
            None
        }
    }
}
