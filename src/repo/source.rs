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

//! One `.dsc`, with its companion upstream and diff archives.

use crate::{
    control::{
        paragraph::{self, FieldValue},
        RawParagraph,
    },
    repo::probe::{self, HashAlgorithm},
};
use std::{cell::OnceCell, path::{Path, PathBuf}};

/// Error conditions encountered while loading or rendering a
/// [SourceRecord].
#[derive(Debug)]
pub enum Error {
    /// Failure probing the underlying file or invoking an external tool.
    Probe(probe::Error),

    /// The `.dsc` (or its decrypted cleartext) did not parse.
    Paragraph(paragraph::Error),

    /// A required control field was not present.
    MissingField(&'static str),

    /// `find_section`'s glob pattern was invalid.
    Glob(glob::PatternError),

    /// A path matched by `find_section`'s glob could not be read.
    GlobEntry(glob::GlobError),
}
crate::errors::error_enum!(Error);

const PGP_HEADER: &str = "-----BEGIN PGP SIGNED MESSAGE-----";

/// One `.dsc` file: its fields in original heading order, and the upstream
/// (`.orig.*`) and diff (`.diff.*`) archives it names.
pub struct SourceRecord {
    path: PathBuf,
    paragraph: OnceCell<RawParagraph>,
    cached_text: OnceCell<String>,
}

impl SourceRecord {
    /// A record for a `.dsc` found on disk. Nothing is read until a field
    /// is accessed.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            paragraph: OnceCell::new(),
            cached_text: OnceCell::new(),
        }
    }

    /// A record reconstructed from a paragraph already read out of an
    /// existing `Sources` file. Field access never re-reads the `.dsc`.
    pub fn from_indexed(path: PathBuf, paragraph: RawParagraph) -> Self {
        let record = Self::new(path);
        let cached_text = paragraph.to_preserved_text();
        let _ = record.paragraph.set(paragraph);
        let _ = record.cached_text.set(cached_text);
        record
    }

    /// Path to the underlying `.dsc` on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_text(&self) -> Result<String, Error> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| Error::Probe(probe::Error::Io(e)))?;
        if raw.starts_with(PGP_HEADER) {
            probe::gpg_decrypt(&self.path).map_err(Error::Probe)
        } else {
            Ok(raw)
        }
    }

    fn paragraph(&self) -> Result<&RawParagraph, Error> {
        if let Some(p) = self.paragraph.get() {
            return Ok(p);
        }
        let text = self.load_text()?;
        let parsed = RawParagraph::parse(&text).map_err(Error::Paragraph)?;
        Ok(self.paragraph.get_or_init(|| parsed))
    }

    fn field(&self, name: &'static str) -> Result<&str, Error> {
        self.paragraph()?.value(name).ok_or(Error::MissingField(name))
    }

    /// The source package's name: the `Source:` heading on a freshly
    /// parsed `.dsc`, or `Package:` on a record reconstructed from an
    /// existing `Sources` file (where the heading was already renamed by
    /// a prior [SourceRecord::sources_text]).
    pub fn name(&self) -> Result<&str, Error> {
        let paragraph = self.paragraph()?;
        paragraph
            .value("Source")
            .or_else(|| paragraph.value("Package"))
            .ok_or(Error::MissingField("Source"))
    }

    fn list_field(&self, name: &'static str) -> Result<&[String], Error> {
        let field = self
            .paragraph()?
            .field(name)
            .next()
            .ok_or(Error::MissingField(name))?;
        match &field.value {
            FieldValue::List(items) => Ok(items),
            FieldValue::String(_) => Ok(&[]),
        }
    }

    fn file_names(&self, field_name: &'static str) -> Result<Vec<String>, Error> {
        Ok(self
            .list_field(field_name)?
            .iter()
            .filter_map(|line| line.split_whitespace().last().map(str::to_owned))
            .collect())
    }

    /// Every entry in `Binary`, comma-split and trimmed.
    pub fn binary_names(&self) -> Result<Vec<String>, Error> {
        let field = self
            .paragraph()?
            .field("Binary")
            .next()
            .ok_or(Error::MissingField("Binary"))?;
        let joined = match &field.value {
            FieldValue::String(s) => s.clone(),
            FieldValue::List(items) => items.join(" "),
        };
        Ok(joined
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect())
    }

    /// Entries in `Files` whose filename contains `.orig.`.
    pub fn original_archive_names(&self) -> Result<Vec<String>, Error> {
        Ok(self
            .file_names("Files")?
            .into_iter()
            .filter(|name| name.contains(".orig."))
            .collect())
    }

    /// The first entry in `Files` whose filename contains `.diff.`, if
    /// any.
    pub fn diff_archive_name(&self) -> Result<Option<String>, Error> {
        Ok(self
            .file_names("Files")?
            .into_iter()
            .find(|name| name.contains(".diff.")))
    }

    /// The entry in `Files` ending in `.dsc`, if any -- used to reify a
    /// [SourceRecord] read out of an existing `Sources` catalogue entry.
    pub fn dsc_filename(&self) -> Result<Option<String>, Error> {
        Ok(self
            .file_names("Files")?
            .into_iter()
            .find(|name| name.ends_with(".dsc")))
    }

    /// Every filename listed in `Files`, in order.
    pub fn files(&self) -> Result<Vec<String>, Error> {
        self.file_names("Files")
    }

    /// For each name in `Binary`, glob for
    /// `<component_path>/binary-*/*/<binary>_<version>_*.deb` (with any
    /// epoch stripped from `Version`) and return the section name -- the
    /// directory component immediately above the first match.
    pub fn find_section(&self, component_path: &Path) -> Result<Option<String>, Error> {
        let version = strip_epoch(self.field("Version")?);
        for binary in self.binary_names()? {
            let pattern = component_path
                .join("binary-*")
                .join("*")
                .join(format!("{binary}_{version}_*.deb"));
            let mut matches = glob::glob(&pattern.to_string_lossy()).map_err(Error::Glob)?;
            if let Some(entry) = matches.next() {
                let entry = entry.map_err(Error::GlobEntry)?;
                if let Some(section) = entry.parent().and_then(Path::file_name) {
                    return Ok(Some(section.to_string_lossy().into_owned()));
                }
            }
        }
        Ok(None)
    }

    /// The preserved fields in heading order, with `Source` renamed to
    /// `Package`, a synthetic checksum line for the `.dsc` itself appended
    /// to each of `Files`/`Checksums-Sha1`/`Checksums-Sha256`, and a
    /// trailing `Directory:` field.
    pub fn sources_text(&self) -> Result<String, Error> {
        if let Some(text) = self.cached_text.get() {
            return Ok(text.clone());
        }

        let paragraph = self.paragraph()?;
        let mut text = String::new();

        for field in paragraph.iter() {
            if field.key == "Source" {
                let first = &field.lines[0];
                text.push_str("Package");
                text.push_str(&first[field.key.len()..]);
                for line in &field.lines[1..] {
                    text.push_str(line);
                }
            } else {
                for line in &field.lines {
                    text.push_str(line);
                }
            }

            if let Some(algorithm) = checksum_algorithm(&field.key) {
                let digest = probe::digest(algorithm, &self.path).map_err(Error::Probe)?;
                let size = probe::size(&self.path).map_err(Error::Probe)?;
                let filename = self
                    .path
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_default();
                text.push_str(&format!(" {digest} {size} {filename}\n"));
            }
        }

        let directory = self
            .path
            .parent()
            .map(|p| last_n_components(p, 5))
            .unwrap_or_default();
        text.push_str(&format!("Directory: {directory}\n"));

        let _ = self.cached_text.set(text.clone());
        Ok(text)
    }
}

fn checksum_algorithm(field_name: &str) -> Option<HashAlgorithm> {
    match field_name {
        "Files" => Some(HashAlgorithm::Md5),
        "Checksums-Sha1" => Some(HashAlgorithm::Sha1),
        "Checksums-Sha256" => Some(HashAlgorithm::Sha256),
        _ => None,
    }
}

/// Strip any epoch (text up to and including the last `:`) from a
/// `Version` string, without otherwise canonicalising it.
fn strip_epoch(version: &str) -> &str {
    match version.rfind(':') {
        Some(idx) => &version[idx + 1..],
        None => version,
    }
}

fn last_n_components(path: &Path, n: usize) -> String {
    let components: Vec<_> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let start = components.len().saturating_sub(n);
    components[start..].join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_epoch_removes_up_to_last_colon() {
        assert_eq!("1.0-1", strip_epoch("2:1.0-1"));
        assert_eq!("1.0-1", strip_epoch("1.0-1"));
    }

    #[test]
    fn original_and_diff_archive_detection() {
        let text = "Source: foo\n\
                     Version: 1.0-1\n\
                     Binary: foo\n\
                     Files:\n\
                     \x20aaa 100 foo_1.0.orig.tar.gz\n\
                     \x20bbb 50 foo_1.0-1.diff.gz\n\
                     \x20ccc 200 foo_1.0-1.dsc\n";
        let record = SourceRecord::from_indexed(
            PathBuf::from("/repo/pool/foo_1.0-1.dsc"),
            RawParagraph::parse(text).unwrap(),
        );
        assert_eq!(
            vec!["foo_1.0.orig.tar.gz".to_owned()],
            record.original_archive_names().unwrap()
        );
        assert_eq!(
            Some("foo_1.0-1.diff.gz".to_owned()),
            record.diff_archive_name().unwrap()
        );
        assert_eq!(
            Some("foo_1.0-1.dsc".to_owned()),
            record.dsc_filename().unwrap()
        );
    }

    #[test]
    fn name_falls_back_to_package_heading() {
        let text = "Package: foo\nVersion: 1.0-1\n";
        let record =
            SourceRecord::from_indexed(PathBuf::from("/x.dsc"), RawParagraph::parse(text).unwrap());
        assert_eq!("foo", record.name().unwrap());
    }
}

// vim: foldmethod=marker
