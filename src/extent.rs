//! Bounding extent of the points in solid-body data
//!
//! ACIS SAT text describes vertices with lines such as
//!
//! ```text
//! point $-1 -1 $-1 10 20 30 #
//! ```
//!
//! where the fifth to seventh tokens are the coordinates. The scanner folds
//! those coordinates into an axis-aligned box.
//!
//! By default the box starts at the origin rather than at the first point,
//! and coordinates that fail to parse count as zero. Both match what
//! existing output was produced with. [`ExtentSeed::FirstPoint`] and
//! [`ParsePolicy::Strict`] opt out.

use tracing::trace;

use crate::error::{Axis, Error, Result};

/// First token of a point line
pub const POINT_MARKER: &str = "point";

/// Token positions of the x, y and z coordinates
const COORD_TOKENS: [usize; 3] = [4, 5, 6];

/// Axis-aligned box given by its minimum and maximum corners
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Extent {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Degenerate box holding a single point
    pub fn from_point(point: [f64; 3]) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Grow the box to contain `point`
    pub fn include(&mut self, point: [f64; 3]) {
        for axis in 0..3 {
            if point[axis] < self.min[axis] {
                self.min[axis] = point[axis];
            }
            if point[axis] > self.max[axis] {
                self.max[axis] = point[axis];
            }
        }
    }

    /// Smallest box containing both
    pub fn union(&self, other: &Extent) -> Extent {
        let mut out = *self;
        out.include(other.min);
        out.include(other.max);
        out
    }

    pub fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn center(&self) -> [f64; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }
}

/// How malformed coordinates are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Missing or non-numeric coordinates count as zero
    #[default]
    Permissive,
    /// Missing or non-numeric coordinates fail the scan
    Strict,
}

/// Starting value of the fold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtentSeed {
    /// Both corners start at the origin, so the box always contains it
    #[default]
    Origin,
    /// The box starts at the first point found
    FirstPoint,
}

/// Scans text lines for point records
#[derive(Debug, Clone, Default)]
pub struct ExtentScanner {
    policy: ParsePolicy,
    seed: ExtentSeed,
}

impl ExtentScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: ParsePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: ExtentSeed) -> Self {
        self.seed = seed;
        self
    }

    pub fn policy(&self) -> ParsePolicy {
        self.policy
    }

    pub fn seed(&self) -> ExtentSeed {
        self.seed
    }

    /// Compute the extent of all point lines.
    ///
    /// With the permissive policy this never fails. A scan that finds no
    /// point returns the zero extent whatever the seed.
    pub fn scan<I>(&self, lines: I) -> Result<Extent>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut extent: Option<Extent> = match self.seed {
            ExtentSeed::Origin => Some(Extent::default()),
            ExtentSeed::FirstPoint => None,
        };

        for (idx, line) in lines.into_iter().enumerate() {
            let Some(point) = self.parse_line(line.as_ref(), idx + 1)? else {
                continue;
            };
            match extent.as_mut() {
                Some(extent) => extent.include(point),
                None => extent = Some(Extent::from_point(point)),
            }
        }

        Ok(extent.unwrap_or_default())
    }

    /// Coordinates of a point line, `None` for any other line
    fn parse_line(&self, line: &str, line_num: usize) -> Result<Option<[f64; 3]>> {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some(POINT_MARKER) {
            return Ok(None);
        }

        // Tokens after the marker, so positions shift by one
        let rest: Vec<&str> = tokens.take(COORD_TOKENS[2]).collect();
        let mut point = [0.0; 3];
        for (axis, pos) in Axis::ALL.into_iter().zip(COORD_TOKENS) {
            let token = rest.get(pos - 1).copied();
            point[axis.index()] = self.parse_coord(token, axis, line_num)?;
        }
        Ok(Some(point))
    }

    fn parse_coord(&self, token: Option<&str>, axis: Axis, line_num: usize) -> Result<f64> {
        match token.map(|t| (t, t.parse::<f64>())) {
            Some((_, Ok(value))) => Ok(value),
            Some((raw, Err(_))) if self.policy == ParsePolicy::Permissive => {
                trace!(line = line_num, %axis, token = raw, "non-numeric coordinate, using 0");
                Ok(0.0)
            }
            None if self.policy == ParsePolicy::Permissive => {
                trace!(line = line_num, %axis, "missing coordinate, using 0");
                Ok(0.0)
            }
            other => Err(Error::MalformedPointRecord {
                line: line_num,
                axis,
                token: other.map(|(raw, _)| raw.to_string()),
            }),
        }
    }
}

/// Extent of `lines` with the default scanner
pub fn scan_extent<I>(lines: I) -> Extent
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    // The permissive policy has no failure path
    ExtentScanner::new().scan(lines).unwrap_or_default()
}
