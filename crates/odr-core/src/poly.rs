//! Cubic polynomials and the record arrays built from them.
//!
//! Almost every longitudinal quantity in a road description (elevation,
//! superelevation, lane offset, lane width, lane border) is a sequence of
//! [`PolyRecord`]s: a start coordinate plus a cubic evaluated at the local
//! distance `x - start`.  Records are kept sorted by `start`, so lookups are
//! `partition_point` binary searches.

/// `a + b·x + c·x² + d·x³`
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cubic {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Cubic {
    pub const ZERO: Cubic = Cubic { a: 0.0, b: 0.0, c: 0.0, d: 0.0 };

    #[inline]
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    #[inline]
    pub const fn constant(a: f64) -> Self {
        Self { a, b: 0.0, c: 0.0, d: 0.0 }
    }

    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        self.a + x * (self.b + x * (self.c + x * self.d))
    }

    /// First derivative.
    #[inline]
    pub fn slope(&self, x: f64) -> f64 {
        self.b + x * (2.0 * self.c + x * 3.0 * self.d)
    }

    /// Second derivative.
    #[inline]
    pub fn curvature(&self, x: f64) -> f64 {
        2.0 * self.c + 6.0 * self.d * x
    }

    /// The polynomial `q(x) = self(x - origin)`, expanded in powers of `x`.
    pub fn shifted(&self, origin: f64) -> Cubic {
        let o = origin;
        Cubic {
            a: self.a - self.b * o + self.c * o * o - self.d * o * o * o,
            b: self.b - 2.0 * self.c * o + 3.0 * self.d * o * o,
            c: self.c - 3.0 * self.d * o,
            d: self.d,
        }
    }

    #[inline]
    pub fn add(&self, other: &Cubic) -> Cubic {
        Cubic::new(self.a + other.a, self.b + other.b, self.c + other.c, self.d + other.d)
    }

    #[inline]
    pub fn sub(&self, other: &Cubic) -> Cubic {
        Cubic::new(self.a - other.a, self.b - other.b, self.c - other.c, self.d - other.d)
    }

    /// Minimum over the closed interval `[lo, hi]` and where it occurs.
    ///
    /// Exact up to floating-point rounding: the candidates are the interval
    /// ends plus every real root of the derivative inside the interval.
    pub fn min_on(&self, lo: f64, hi: f64) -> (f64, f64) {
        let mut best = (lo, self.eval(lo));
        let mut consider = |x: f64| {
            if x >= lo && x <= hi {
                let v = self.eval(x);
                if v < best.1 {
                    best = (x, v);
                }
            }
        };
        consider(hi);

        // Derivative: 3d·x² + 2c·x + b
        let (qa, qb, qc) = (3.0 * self.d, 2.0 * self.c, self.b);
        if qa.abs() < 1e-15 {
            if qb.abs() > 1e-15 {
                consider(-qc / qb);
            }
        } else {
            let disc = qb * qb - 4.0 * qa * qc;
            if disc >= 0.0 {
                let root = disc.sqrt();
                consider((-qb + root) / (2.0 * qa));
                consider((-qb - root) / (2.0 * qa));
            }
        }
        best
    }
}

// ── PolyRecord ────────────────────────────────────────────────────────────────

/// A cubic valid from `start` up to the next record's `start`, evaluated at
/// the local coordinate `x - start`.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolyRecord {
    /// s (road-relative) or sOffset (section/lane-relative) of the record.
    pub start: f64,
    pub poly:  Cubic,
}

impl PolyRecord {
    #[inline]
    pub const fn new(start: f64, poly: Cubic) -> Self {
        Self { start, poly }
    }

    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        self.poly.eval(x - self.start)
    }

    #[inline]
    pub fn slope(&self, x: f64) -> f64 {
        self.poly.slope(x - self.start)
    }
}

/// Index of the record covering `x` in a start-sorted slice.
///
/// Coordinates before the first record resolve to the first record, so a
/// profile that starts late is extrapolated rather than undefined.  Returns
/// `None` only for an empty slice.
#[inline]
pub fn record_index(records: &[PolyRecord], x: f64) -> Option<usize> {
    if records.is_empty() {
        return None;
    }
    let idx = records.partition_point(|r| r.start <= x);
    Some(idx.saturating_sub(1))
}

/// Evaluate a start-sorted record array at `x`; `None` when empty.
#[inline]
pub fn eval_records(records: &[PolyRecord], x: f64) -> Option<f64> {
    record_index(records, x).map(|i| records[i].eval(x))
}

/// `true` if record starts are non-decreasing.
pub fn is_sorted_by_start(records: &[PolyRecord]) -> bool {
    records.windows(2).all(|w| w[0].start <= w[1].start)
}

// ── Piecewise ─────────────────────────────────────────────────────────────────

/// A piecewise cubic over a closed interval, every piece expressed in the
/// absolute coordinate.
///
/// Sums and differences of record arrays stay piecewise cubic, which makes
/// "is this lane ever narrower than zero" an exact question: take the
/// minimum of each piece.
#[derive(Clone, Debug, PartialEq)]
pub struct Piecewise {
    /// `(lo, hi, poly)` in ascending, contiguous order.
    pieces: Vec<(f64, f64, Cubic)>,
}

impl Piecewise {
    /// The zero function on `[lo, hi]`.
    pub fn zero(lo: f64, hi: f64) -> Self {
        Self { pieces: vec![(lo, hi, Cubic::ZERO)] }
    }

    /// Restrict a record array to `[lo, hi]`.  An empty array is zero.
    pub fn from_records(records: &[PolyRecord], lo: f64, hi: f64) -> Self {
        if records.is_empty() || hi <= lo {
            return Self::zero(lo, hi.max(lo));
        }
        let mut pieces = Vec::with_capacity(records.len());
        let first = record_index(records, lo).unwrap_or(0);
        for (i, rec) in records.iter().enumerate().skip(first) {
            let piece_lo = if i == first { lo } else { rec.start.max(lo) };
            let piece_hi = records.get(i + 1).map_or(hi, |next| next.start.min(hi));
            if piece_lo >= hi {
                break;
            }
            if piece_hi > piece_lo {
                pieces.push((piece_lo, piece_hi, rec.poly.shifted(rec.start)));
            }
        }
        if pieces.is_empty() {
            let rec = &records[first];
            pieces.push((lo, hi, rec.poly.shifted(rec.start)));
        }
        Self { pieces }
    }

    /// Combine two functions over the intersection of their domains.
    fn zip_with(&self, other: &Piecewise, op: impl Fn(&Cubic, &Cubic) -> Cubic) -> Piecewise {
        let mut pieces = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.pieces.len() && j < other.pieces.len() {
            let (alo, ahi, ap) = self.pieces[i];
            let (blo, bhi, bp) = other.pieces[j];
            let lo = alo.max(blo);
            let hi = ahi.min(bhi);
            if hi > lo {
                pieces.push((lo, hi, op(&ap, &bp)));
            }
            if ahi <= bhi {
                i += 1;
            } else {
                j += 1;
            }
        }
        Piecewise { pieces }
    }

    pub fn add(&self, other: &Piecewise) -> Piecewise {
        self.zip_with(other, Cubic::add)
    }

    pub fn sub(&self, other: &Piecewise) -> Piecewise {
        self.zip_with(other, Cubic::sub)
    }

    /// Global minimum `(x, value)`, or `None` for an empty domain.
    pub fn min(&self) -> Option<(f64, f64)> {
        self.pieces
            .iter()
            .map(|(lo, hi, p)| p.min_on(*lo, *hi))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    pub fn eval(&self, x: f64) -> Option<f64> {
        let idx = self.pieces.partition_point(|(lo, _, _)| *lo <= x);
        let (_, _, p) = self.pieces.get(idx.checked_sub(1)?)?;
        Some(p.eval(x))
    }
}
