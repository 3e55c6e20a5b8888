// {{{ Copyright (c) Paul R. Tagliamonte <paultag@debian.org>, 2024
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE. }}}

//! Layout Manager: builds and navigates the canonical
//! `<root>/dists/<suite>/<component>/{binary-<arch>|source}/<section>/`
//! tree, and places files within it.
//!
//! Each directory level gets its own path-building function rather than
//! a depth-counting recursive walk, so a caller never has to remember
//! that "level four" means the architecture directory.

use crate::architecture::Architecture;
use std::path::{Path, PathBuf};

/// Error conditions encountered while creating directories, placing
/// files, or walking the tree.
#[derive(Debug)]
pub enum Error {
    /// Underlying i/o error.
    Io(std::io::Error),

    /// A `find_files_from_pattern` glob was malformed.
    Glob(glob::PatternError),

    /// A path matched by a glob could not be read.
    GlobEntry(glob::GlobError),
}
crate::errors::error_enum!(Error);

/// The kind of file [find_files]/[find_files_from_pattern] is looking
/// for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    /// A binary package, `.deb`.
    Deb,
    /// A source description, `.dsc`.
    Dsc,
}

impl FileKind {
    /// The filename suffix this kind is recognised by.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Deb => ".deb",
            Self::Dsc => ".dsc",
        }
    }
}

/// `<root>/dists/<suite>`.
pub fn suite_path(root: &Path, suite: &str) -> PathBuf {
    root.join("dists").join(suite)
}

/// `<root>/dists/<suite>/<component>`.
pub fn component_path(root: &Path, suite: &str, component: &str) -> PathBuf {
    suite_path(root, suite).join(component)
}

/// `<component_path>/binary-<architecture>`.
pub fn binary_path(component_path: &Path, architecture: &Architecture) -> PathBuf {
    component_path.join(format!("binary-{architecture}"))
}

/// `<component_path>/source`.
pub fn source_path(component_path: &Path) -> PathBuf {
    component_path.join("source")
}

/// `<arch_or_source_path>/<section>`.
pub fn section_path(arch_or_source_path: &Path, section: &str) -> PathBuf {
    arch_or_source_path.join(section)
}

/// Create `path` if it does not already exist; a no-op if it does.
pub fn mkdir(path: &Path) -> Result<(), Error> {
    match std::fs::create_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Create `path` and every missing parent directory along the way.
pub fn mkdirs(path: &Path) -> Result<(), Error> {
    std::fs::create_dir_all(path).map_err(Error::Io)
}

fn remove_existing(dst: &Path) -> Result<(), Error> {
    match std::fs::symlink_metadata(dst) {
        Ok(_) => std::fs::remove_file(dst).map_err(Error::Io),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Copy `src` to `dst`, removing any pre-existing file or symlink at
/// `dst` first. Modification time and permissions are carried over from
/// `src`.
pub fn copy_file(src: &Path, dst: &Path) -> Result<(), Error> {
    remove_existing(dst)?;
    std::fs::copy(src, dst).map_err(Error::Io)?;
    let metadata = std::fs::metadata(src).map_err(Error::Io)?;
    let modified = metadata.modified().map_err(Error::Io)?;
    std::fs::File::options()
        .write(true)
        .open(dst)
        .map_err(Error::Io)?
        .set_modified(modified)
        .map_err(Error::Io)?;
    std::fs::set_permissions(dst, metadata.permissions()).map_err(Error::Io)?;
    Ok(())
}

/// Symlink `dst` to the absolute path of `src`, removing any
/// pre-existing file or symlink at `dst` first.
pub fn link_file(src: &Path, dst: &Path) -> Result<(), Error> {
    remove_existing(dst)?;
    let absolute_src = std::fs::canonicalize(src).map_err(Error::Io)?;
    symlink(&absolute_src, dst)
}

#[cfg(unix)]
fn symlink(src: &Path, dst: &Path) -> Result<(), Error> {
    std::os::unix::fs::symlink(src, dst).map_err(Error::Io)
}

#[cfg(not(unix))]
fn symlink(src: &Path, dst: &Path) -> Result<(), Error> {
    std::os::windows::fs::symlink_file(src, dst).map_err(Error::Io)
}

/// Recursively walk `root`, returning every file whose name ends with
/// `kind`'s suffix, in sorted order.
pub fn find_files(root: &Path, kind: FileKind) -> Result<Vec<PathBuf>, Error> {
    let mut found = vec![];
    walk(root, kind.suffix(), &mut found)?;
    found.sort();
    Ok(found)
}

fn walk(dir: &Path, suffix: &str, found: &mut Vec<PathBuf>) -> Result<(), Error> {
    for entry in std::fs::read_dir(dir).map_err(Error::Io)? {
        let entry = entry.map_err(Error::Io)?;
        let path = entry.path();
        if entry.file_type().map_err(Error::Io)?.is_dir() {
            walk(&path, suffix, found)?;
        } else if path.to_string_lossy().ends_with(suffix) {
            found.push(path);
        }
    }
    Ok(())
}

/// Resolve `pattern` as a glob, returning every match whose name ends
/// with `kind`'s suffix, in sorted order.
pub fn find_files_from_pattern(pattern: &str, kind: FileKind) -> Result<Vec<PathBuf>, Error> {
    let mut found = vec![];
    for entry in glob::glob(pattern).map_err(Error::Glob)? {
        let path = entry.map_err(Error::GlobEntry)?;
        if path.to_string_lossy().ends_with(kind.suffix()) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_builders_compose_the_canonical_tree() {
        let root = Path::new("/r");
        let component = component_path(root, "lucid", "experimental");
        assert_eq!(Path::new("/r/dists/lucid/experimental"), component);
        assert_eq!(
            Path::new("/r/dists/lucid/experimental/binary-amd64"),
            binary_path(&component, &Architecture::Amd64)
        );
        assert_eq!(
            Path::new("/r/dists/lucid/experimental/source"),
            source_path(&component)
        );
    }

    #[test]
    fn mkdir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("fresh");
        mkdir(&target).unwrap();
        mkdir(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn mkdirs_creates_the_full_chain() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b/c");
        mkdirs(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn copy_file_overwrites_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.deb");
        let dst = dir.path().join("dst.deb");
        std::fs::write(&src, b"new").unwrap();
        std::fs::write(&dst, b"old").unwrap();
        copy_file(&src, &dst).unwrap();
        assert_eq!(b"new", std::fs::read(&dst).unwrap().as_slice());
    }

    #[test]
    fn find_files_recurses_and_filters_by_suffix() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
        std::fs::write(dir.path().join("a/pkgA_1.0_amd64.deb"), b"").unwrap();
        std::fs::write(dir.path().join("a/b/pkgB_1.0_amd64.deb"), b"").unwrap();
        std::fs::write(dir.path().join("a/b/readme.txt"), b"").unwrap();

        let found = find_files(dir.path(), FileKind::Deb).unwrap();
        assert_eq!(2, found.len());
    }
}

// vim: foldmethod=marker
