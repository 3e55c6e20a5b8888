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

//! `Packages`/`Sources` catalogues: in-memory keyed collections backed by
//! a [std::collections::BTreeMap] so that [Packages::write]/[Sources::write]
//! emit records in deterministic `Package`/`Source`-name order.

use crate::{
    control::{
        paragraph::{FieldValue, RawParagraph},
        paragraph,
    },
    repo::{package, package::PackageRecord, source, source::SourceRecord},
};
use std::{collections::BTreeMap, path::{Path, PathBuf}};

/// Error conditions encountered while reading or writing a catalogue.
#[derive(Debug)]
pub enum Error {
    /// Underlying i/o error reading or writing the index file.
    Io(std::io::Error),

    /// The index file did not parse as a sequence of control paragraphs.
    Paragraph(paragraph::Error),

    /// A [PackageRecord] could not be registered: it has no `Package`
    /// field.
    Package(package::Error),

    /// A [SourceRecord] could not be registered: it has no
    /// `Source`/`Package` field.
    Source(source::Error),
}
crate::errors::error_enum!(Error);

/// Walk `n` path components up from `path`, inferring the repository root
/// from an index file's location.
fn repo_root(path: &Path, n: usize) -> PathBuf {
    path.ancestors()
        .nth(n)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.to_path_buf())
}

fn read_index(path: &Path) -> Result<Option<String>, Error> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Io(e)),
    }
}

/// The `Packages` index for a single `binary-<arch>` directory.
pub struct Packages {
    path: PathBuf,
    records: BTreeMap<String, PackageRecord>,
}

impl Packages {
    /// A catalogue backed by the `Packages` file at `path`. Nothing is
    /// read from disk until [Packages::read] is called.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            records: BTreeMap::new(),
        }
    }

    /// Register `record` under its `Package` field, replacing any record
    /// previously registered under the same name.
    pub fn add_package(&mut self, record: PackageRecord) -> Result<(), Error> {
        let name = record.package().map_err(Error::Package)?.to_owned();
        self.records.insert(name, record);
        Ok(())
    }

    /// Parse every paragraph in the `Packages` file, if it exists, and
    /// register a record reified against the inferred repository root
    /// for each. A missing file is not an error: the catalogue is simply
    /// left empty.
    pub fn read(&mut self) -> Result<(), Error> {
        let Some(text) = read_index(&self.path)? else {
            return Ok(());
        };
        let root = repo_root(&self.path, 5);
        for paragraph in RawParagraph::parse_all(&text).map_err(Error::Paragraph)? {
            let Some(filename) = paragraph.value("Filename") else {
                log::warn!(
                    "Packages entry in {} has no Filename field; skipping",
                    self.path.display()
                );
                continue;
            };
            let record = PackageRecord::from_indexed(root.join(filename), paragraph);
            match record.package() {
                Ok(name) => {
                    self.records.insert(name.to_owned(), record);
                }
                Err(_) => log::warn!(
                    "Packages entry in {} has no Package field; skipping",
                    self.path.display()
                ),
            }
        }
        Ok(())
    }

    /// Truncate the `Packages` file and write every record's
    /// [PackageRecord::packages_text], separated by blank lines, with a
    /// trailing blank line after the last entry.
    pub fn write(&self) -> Result<(), Error> {
        let mut out = String::new();
        for record in self.records.values() {
            match record.packages_text() {
                Ok(text) => {
                    out.push_str(&text);
                    out.push('\n');
                }
                Err(e) => log::warn!("skipping package in {}: {e}", self.path.display()),
            }
        }
        std::fs::write(&self.path, out).map_err(Error::Io)
    }

    /// Look up a record by its `Package` field.
    pub fn find(&self, name: &str) -> Option<&PackageRecord> {
        self.records.get(name)
    }

    /// Every registered record, in `Package`-name order.
    pub fn records(&self) -> impl Iterator<Item = &PackageRecord> {
        self.records.values()
    }

    /// Number of registered records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalogue has no registered records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The `Sources` index for a single component's `source/` directory.
pub struct Sources {
    path: PathBuf,
    records: BTreeMap<String, SourceRecord>,
}

impl Sources {
    /// A catalogue backed by the `Sources` file at `path`. Nothing is
    /// read from disk until [Sources::read] is called.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            records: BTreeMap::new(),
        }
    }

    /// Register `record` under its `Source`/`Package` field, replacing
    /// any record previously registered under the same name.
    pub fn add_source(&mut self, record: SourceRecord) -> Result<(), Error> {
        let name = record.name().map_err(Error::Source)?.to_owned();
        self.records.insert(name, record);
        Ok(())
    }

    /// Parse every paragraph in the `Sources` file, if it exists. Each
    /// paragraph's `.dsc` filename is located by scanning its `Files`
    /// list for the entry ending in `.dsc`, and the record is reified
    /// against `<repo_root>/<Directory>/<dsc>`. A missing file is not an
    /// error: the catalogue is simply left empty.
    pub fn read(&mut self) -> Result<(), Error> {
        let Some(text) = read_index(&self.path)? else {
            return Ok(());
        };
        let root = repo_root(&self.path, 5);
        for paragraph in RawParagraph::parse_all(&text).map_err(Error::Paragraph)? {
            let Some(directory) = paragraph.value("Directory") else {
                log::warn!(
                    "Sources entry in {} has no Directory field; skipping",
                    self.path.display()
                );
                continue;
            };
            let Some(dsc) = dsc_filename(&paragraph) else {
                log::warn!(
                    "Sources entry in {} has no .dsc entry in Files; skipping",
                    self.path.display()
                );
                continue;
            };
            let record = SourceRecord::from_indexed(root.join(directory).join(dsc), paragraph);
            match record.name() {
                Ok(name) => {
                    self.records.insert(name.to_owned(), record);
                }
                Err(_) => log::warn!(
                    "Sources entry in {} has no Source/Package field; skipping",
                    self.path.display()
                ),
            }
        }
        Ok(())
    }

    /// Truncate the `Sources` file and write every record's
    /// [SourceRecord::sources_text], separated by blank lines, with no
    /// trailing blank line -- unlike [Packages::write].
    pub fn write(&self) -> Result<(), Error> {
        let mut out = String::new();
        let mut records = self.records.values().peekable();
        while let Some(record) = records.next() {
            match record.sources_text() {
                Ok(text) => {
                    out.push_str(&text);
                    if records.peek().is_some() {
                        out.push('\n');
                    }
                }
                Err(e) => log::warn!("skipping source in {}: {e}", self.path.display()),
            }
        }
        std::fs::write(&self.path, out).map_err(Error::Io)
    }

    /// Look up a record by its `Source`/`Package` field.
    pub fn find(&self, name: &str) -> Option<&SourceRecord> {
        self.records.get(name)
    }

    /// Every registered record, in name order.
    pub fn records(&self) -> impl Iterator<Item = &SourceRecord> {
        self.records.values()
    }

    /// Number of registered records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalogue has no registered records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn dsc_filename(paragraph: &RawParagraph) -> Option<String> {
    let field = paragraph.field("Files").next()?;
    match &field.value {
        FieldValue::List(items) => items.iter().find_map(|line| {
            let name = line.split_whitespace().last()?;
            name.ends_with(".dsc").then(|| name.to_owned())
        }),
        FieldValue::String(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packages_round_trip_preserves_names_and_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Packages");

        let text = "Package: pkgA\n\
                     Architecture: amd64\n\
                     Section: utils\n\
                     Filename: dists/lucid/main/binary-amd64/utils/pkgA_1.0_amd64.deb\n\
                     Size: 10\n\
                     MD5Sum: deadbeef\n\n\
                     Package: pkgB\n\
                     Architecture: i386\n\
                     Section: net\n\
                     Filename: dists/lucid/main/binary-i386/net/pkgB_1.0_i386.deb\n\
                     Size: 20\n\
                     MD5Sum: cafebabe\n";
        std::fs::write(&path, text).unwrap();

        let mut packages = Packages::new(path.clone());
        packages.read().unwrap();
        assert_eq!(2, packages.len());
        assert_eq!("pkgA", packages.find("pkgA").unwrap().package().unwrap());
        assert!(packages.find("pkgC").is_none());

        packages.write().unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("\n\n"));
    }

    #[test]
    fn sources_write_has_no_trailing_blank_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Sources");

        let first = "Source: foo\n\
                      Version: 1.0-1\n\
                      Binary: foo\n\
                      Files:\n\
                      \x20aaa 1 foo_1.0-1.dsc\n";
        let record = SourceRecord::from_indexed(
            PathBuf::from("/repo/pool/foo_1.0-1.dsc"),
            RawParagraph::parse(first).unwrap(),
        );

        let mut sources = Sources::new(path.clone());
        sources.add_source(record).unwrap();
        sources.write().unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.ends_with("\n\n"));
        assert!(written.starts_with("Package: foo\n"));
    }

    #[test]
    fn missing_index_file_reads_as_empty() {
        let mut packages = Packages::new(PathBuf::from("/nonexistent/Packages"));
        packages.read().unwrap();
        assert!(packages.is_empty());
    }
}

// vim: foldmethod=marker
