use crate::kmeans::{Centroids, Clustering};
use std::fmt::{self, Display, Formatter, Write};

fn write_joined<T>(
    f: &mut impl Write,
    values: impl IntoIterator<Item = T>,
    mut write_one: impl FnMut(&mut dyn Write, T) -> fmt::Result,
) -> fmt::Result {
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            f.write_char(',')?;
        }
        write_one(&mut *f, value)?;
    }
    Ok(())
}

/// Comma-separated seed indices, no trailing newline.
struct SeedIndices<'a>(&'a [usize]);

impl Display for SeedIndices<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_joined(f, self.0, |f, i| write!(f, "{i}"))
    }
}

/// Seed indices on one line, comma-separated, no trailing newline.
pub fn format_indices(indices: &[usize]) -> String {
    SeedIndices(indices).to_string()
}

fn write_centroid(f: &mut impl Write, centroid: &[f64]) -> fmt::Result {
    write_joined(f, centroid, |f, x| write!(f, "{x:.2}"))
}

/// One line per centroid, two decimals per coordinate.
pub fn format_centroids(centroids: &Centroids) -> String {
    centroids.to_string()
}

impl Display for Centroids {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for centroid in self.iter() {
            write_centroid(f, centroid)?;
            f.write_char('\n')?;
        }
        Ok(())
    }
}

/// Renders the run the way the CLI prints it: the seed indices line when k-means++ was
/// used, then the centroids.
impl Display for Clustering {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(indices) = &self.seed_indices {
            writeln!(f, "{}", SeedIndices(indices))?;
        }
        self.centroids.fmt(f)
    }
}
