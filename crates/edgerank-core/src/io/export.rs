//! Result exporters.
//!
//! Plain-text files, one record per line:
//!
//! - degree histogram: `"<degree> <count>"` for every degree from 0 to the
//!   maximum, zero counts included;
//! - ranks: one value per node id in `[0, node_count)`, fixed-point with 50
//!   decimal places;
//! - traversal: one visited node id per line, in visitation order.
//!
//! The `write_*` functions take any [`Write`]; the `export_*` helpers open a
//! path (creating parent directories), buffer and flush, and report any
//! failure as an [`ExportError`] naming the path.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use crate::metrics::histogram::DegreeHistogram;
use crate::metrics::traversal::Traversal;

/// Decimal places used for rank values.
pub const RANK_DECIMALS: usize = 50;

/// A result file could not be written.
#[derive(Debug, thiserror::Error)]
#[error("{action} {}", path.display())]
pub struct ExportError {
    /// What was being done: `create`, `write`, ...
    pub action: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl ExportError {
    fn at<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> Self + 'a {
        move |source| Self {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Write `"<d> <count>"` for every histogram bucket.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_degree_histogram<W: Write>(mut w: W, histogram: &DegreeHistogram) -> io::Result<()> {
    for (degree, count) in histogram.iter() {
        writeln!(w, "{degree} {count}")?;
    }
    Ok(())
}

/// Write one rank per line, node id order.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_ranks<W: Write>(mut w: W, ranks: &[f64]) -> io::Result<()> {
    for rank in ranks {
        writeln!(w, "{rank:.prec$}", prec = RANK_DECIMALS)?;
    }
    Ok(())
}

/// Write the visitation order, one node id per line.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_traversal<W: Write>(mut w: W, traversal: &Traversal) -> io::Result<()> {
    for node in traversal.order() {
        writeln!(w, "{node}")?;
    }
    Ok(())
}

/// Write the degree histogram to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn export_degree_histogram(path: &Path, histogram: &DegreeHistogram) -> Result<()> {
    export_with(path, |w| write_degree_histogram(w, histogram))?;
    debug!(path = %path.display(), buckets = histogram.counts().len(), "degree histogram written");
    Ok(())
}

/// Write the rank vector to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn export_ranks(path: &Path, ranks: &[f64]) -> Result<()> {
    export_with(path, |w| write_ranks(w, ranks))?;
    debug!(path = %path.display(), nodes = ranks.len(), "ranks written");
    Ok(())
}

/// Write the traversal order to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn export_traversal(path: &Path, traversal: &Traversal) -> Result<()> {
    export_with(path, |w| write_traversal(w, traversal))?;
    debug!(path = %path.display(), visited = traversal.len(), "traversal written");
    Ok(())
}

fn export_with(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(ExportError::at("create output dir", parent))?;
    }

    let file = File::create(path).map_err(ExportError::at("create", path))?;
    let mut w = BufWriter::new(file);
    write(&mut w).map_err(ExportError::at("write", path))?;
    w.flush().map_err(ExportError::at("flush", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DegreeTable, EdgeStore};
    use crate::metrics::traversal::bfs;

    fn to_string(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).expect("write to vec");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn histogram_lines_cover_every_degree() {
        let store = EdgeStore::from_pairs(&[(0, 1), (0, 2)]);
        let hist = DegreeHistogram::build(&DegreeTable::build(&store).expect("degree table"));
        let text = to_string(|w| write_degree_histogram(w, &hist));
        assert_eq!(text, "0 2\n1 0\n2 1\n");
    }

    #[test]
    fn ranks_use_fixed_fifty_decimals() {
        let text = to_string(|w| write_ranks(w, &[0.5, 1.0 / 3.0]));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("0.{:0<50}", "5"));
        assert!(lines[1].starts_with("0.33333333333333331482961625624739"));
        assert_eq!(lines[1].len(), 52);
    }

    #[test]
    fn ranks_round_trip_exactly() {
        let ranks = [0.1, 2.0e-12, 0.987_654_321_012_345_6];
        let text = to_string(|w| write_ranks(w, &ranks));
        let parsed: Vec<f64> = text.lines().map(|l| l.parse().expect("float")).collect();
        assert_eq!(parsed, ranks.to_vec());
    }

    #[test]
    fn traversal_lines_follow_visit_order() {
        let store = EdgeStore::from_pairs(&[(2, 0), (0, 1)]);
        let t = bfs(&store, 0).expect("bfs");
        let text = to_string(|w| write_traversal(w, &t));
        assert_eq!(text, "0\n2\n1\n");
    }

    #[test]
    fn export_creates_parent_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/out/proba.txt");
        export_ranks(&path, &[0.25, 0.75]).expect("export");
        let text = fs::read_to_string(&path).expect("read back");
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn export_failure_names_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        // A directory cannot be opened as a file.
        let err = export_ranks(dir.path(), &[1.0]).expect_err("should fail");
        let export = err.downcast_ref::<ExportError>().expect("typed error");
        assert_eq!(export.action, "create");
        assert_eq!(export.path, dir.path());
    }
}
