//! Materialize a parsed tree on disk
//!
//!     The root maps to the output directory itself. Directories are created with all their
//!     parents; files are created empty. Nothing that already exists is touched: an existing
//!     directory is reused, an existing file is left as it is. A file standing where the tree
//!     wants a directory (or the reverse) is an error.

use forsure_parser::forsure::ast::Node;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What happened (or, in a dry run, would happen) to one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(PathBuf),
    Existing(PathBuf),
}

impl Outcome {
    pub fn path(&self) -> &Path {
        match self {
            Outcome::Created(path) | Outcome::Existing(path) => path,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScaffoldReport {
    pub outcomes: Vec<Outcome>,
}

impl ScaffoldReport {
    pub fn created(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            Outcome::Created(path) => Some(path.as_path()),
            Outcome::Existing(_) => None,
        })
    }
}

/// Create everything `root` declares under `base`.
pub fn scaffold(root: &Node, base: &Path, dry_run: bool) -> io::Result<ScaffoldReport> {
    let mut report = ScaffoldReport::default();
    ensure_directory(base, dry_run, &mut report)?;
    create_children(root, base, dry_run, &mut report)?;
    debug!(
        "scaffold of {} finished: {} created",
        base.display(),
        report.created().count()
    );
    Ok(report)
}

fn create_children(
    node: &Node,
    path: &Path,
    dry_run: bool,
    report: &mut ScaffoldReport,
) -> io::Result<()> {
    for child in node.children() {
        let child_path = path.join(&child.name);
        if child.is_directory() {
            ensure_directory(&child_path, dry_run, report)?;
            create_children(child, &child_path, dry_run, report)?;
        } else {
            ensure_file(&child_path, dry_run, report)?;
        }
    }
    Ok(())
}

fn ensure_directory(path: &Path, dry_run: bool, report: &mut ScaffoldReport) -> io::Result<()> {
    if path.is_dir() {
        report.outcomes.push(Outcome::Existing(path.to_path_buf()));
        return Ok(());
    }
    if path.exists() {
        return Err(conflict(path, "a directory"));
    }
    if !dry_run {
        fs::create_dir_all(path)?;
        info!("created directory {}", path.display());
    }
    report.outcomes.push(Outcome::Created(path.to_path_buf()));
    Ok(())
}

fn ensure_file(path: &Path, dry_run: bool, report: &mut ScaffoldReport) -> io::Result<()> {
    if path.is_file() {
        report.outcomes.push(Outcome::Existing(path.to_path_buf()));
        return Ok(());
    }
    if path.exists() {
        return Err(conflict(path, "a file"));
    }
    if !dry_run {
        OpenOptions::new().write(true).create_new(true).open(path)?;
        info!("created file {}", path.display());
    }
    report.outcomes.push(Outcome::Created(path.to_path_buf()));
    Ok(())
}

fn conflict(path: &Path, expected: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("{} exists but is not {}", path.display(), expected),
    )
}
