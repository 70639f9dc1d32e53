use std::{
    fmt::Display,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::{Error, Result};

/// Writes one point per line to `path`, or stdout when `None`.
pub fn write_points<P: Display>(path: Option<&Path>, points: &[P]) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                Error::other(format!("failed to create output file {}: {e}", path.display()))
            })?;
            write_lines(BufWriter::new(file), points)
        }
        None => write_lines(BufWriter::new(io::stdout().lock()), points),
    }
}

fn write_lines<W: Write, P: Display>(mut out: W, points: &[P]) -> Result<()> {
    for point in points {
        writeln!(out, "{point}")?;
    }
    out.flush()?;
    Ok(())
}
