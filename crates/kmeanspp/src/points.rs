use snafu::prelude::*;
use std::io::BufRead;
use std::num::ParseFloatError;
use std::slice::ChunksExact;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum InputError {
    #[snafu(display("dimensionality must be positive"))]
    ZeroDimensions,

    #[snafu(display("failed to read line {line}"))]
    Read { line: usize, source: std::io::Error },

    #[snafu(display("line {line}: cannot parse {value:?} as a number"))]
    ParseValue {
        line: usize,
        value: String,
        source: ParseFloatError,
    },

    #[snafu(display("line {line}: {value} is not a finite number"))]
    NonFinite { line: usize, value: String },

    #[snafu(display("line {line}: expected {expected} values, got {got}"))]
    DimensionMismatch {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[snafu(display("expected {expected} observations, got {got}"))]
    CountMismatch { expected: usize, got: usize },
}

/// Observations stored row-major in one flat buffer, `dim` values per row.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    dim: usize,
    coords: Vec<f64>,
}

impl PointSet {
    pub fn new(dim: usize, capacity: usize) -> Self {
        assert!(dim > 0, "points must have at least one dimension");
        Self {
            dim,
            coords: Vec::with_capacity(dim * capacity),
        }
    }

    /// Builds a point set from rows, rejecting any row whose length isn't `dim` or that
    /// holds a NaN or an infinity.
    ///
    /// ```
    /// let points = kmeanspp::PointSet::from_rows(2, [[0.0, 1.0], [2.0, 3.0]]).unwrap();
    /// assert_eq!(points.len(), 2);
    /// assert_eq!(points.point(1), &[2.0, 3.0]);
    /// ```
    pub fn from_rows<I, R>(dim: usize, rows: I) -> Result<Self, InputError>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[f64]>,
    {
        ensure!(dim > 0, ZeroDimensionsSnafu);

        let rows = rows.into_iter();
        let mut points = Self::new(dim, rows.size_hint().0);
        for (i, row) in rows.enumerate() {
            let row = row.as_ref();
            ensure!(
                row.len() == dim,
                DimensionMismatchSnafu {
                    line: i + 1,
                    expected: dim,
                    got: row.len(),
                }
            );
            if let Some(x) = row.iter().find(|x| !x.is_finite()) {
                return NonFiniteSnafu {
                    line: i + 1,
                    value: x.to_string(),
                }
                .fail();
            }
            points.push(row);
        }
        Ok(points)
    }

    #[inline(always)]
    pub fn push(&mut self, point: &[f64]) {
        assert_eq!(point.len(), self.dim);
        self.coords.extend_from_slice(point);
    }

    #[inline(always)]
    pub fn point(&self, i: usize) -> &[f64] {
        &self.coords[i * self.dim..(i + 1) * self.dim]
    }

    pub fn iter(&self) -> ChunksExact<'_, f64> {
        self.coords.chunks_exact(self.dim)
    }

    #[cfg(feature = "parallel")]
    pub(crate) fn par_iter(&self) -> rayon::slice::ChunksExact<'_, f64> {
        use rayon::prelude::*;
        self.coords.par_chunks_exact(self.dim)
    }

    pub fn len(&self) -> usize {
        self.coords.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

/// Reads comma-separated rows of exactly `dim` numbers each. Blank lines are skipped and
/// whitespace around values is ignored.
pub fn read_points(reader: impl BufRead, dim: usize) -> Result<PointSet, InputError> {
    ensure!(dim > 0, ZeroDimensionsSnafu);

    let mut points = PointSet::new(dim, 0);
    let mut row = Vec::with_capacity(dim);

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.context(ReadSnafu { line: line_no })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        row.clear();
        for value in line.split(',') {
            let value = value.trim();
            let parsed = value.parse::<f64>().context(ParseValueSnafu {
                line: line_no,
                value,
            })?;
            // `parse` takes "nan" and "inf" too
            ensure!(
                parsed.is_finite(),
                NonFiniteSnafu {
                    line: line_no,
                    value,
                }
            );
            row.push(parsed);
        }

        ensure!(
            row.len() == dim,
            DimensionMismatchSnafu {
                line: line_no,
                expected: dim,
                got: row.len(),
            }
        );
        points.push(&row);
    }

    Ok(points)
}

/// Same as [`read_points`], additionally requiring exactly `n` observations.
pub fn read_exact_points(
    reader: impl BufRead,
    n: usize,
    dim: usize,
) -> Result<PointSet, InputError> {
    let points = read_points(reader, dim)?;
    ensure!(
        points.len() == n,
        CountMismatchSnafu {
            expected: n,
            got: points.len(),
        }
    );
    Ok(points)
}
