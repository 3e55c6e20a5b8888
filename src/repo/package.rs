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

//! One `.deb`, lazily inspected via `dpkg-deb` on first field access.

use crate::{
    architecture::Architecture,
    control::{paragraph, RawParagraph},
    repo::probe::{self, HashAlgorithm},
};
use std::{cell::OnceCell, path::{Path, PathBuf}};

/// Error conditions encountered while loading or rendering a
/// [PackageRecord].
#[derive(Debug)]
pub enum Error {
    /// Failure probing the underlying file or invoking `dpkg-deb`.
    Probe(probe::Error),

    /// The control paragraph extracted from the `.deb` did not parse.
    Paragraph(paragraph::Error),

    /// A required control field was not present.
    MissingField(&'static str),

    /// The `Architecture:` field did not parse.
    Architecture(crate::architecture::Error),
}
crate::errors::error_enum!(Error);

/// One `.deb`: its control paragraph, computed `Filename`/`Size`, and one
/// hash per configured algorithm. Control data is fetched from `dpkg-deb`
/// on first access and cached for the lifetime of the record.
pub struct PackageRecord {
    path: PathBuf,
    control: OnceCell<RawParagraph>,
    size: OnceCell<u64>,
    hashes: OnceCell<Vec<(HashAlgorithm, String)>>,
    cached_text: OnceCell<String>,
}

impl PackageRecord {
    /// A record for a `.deb` found on disk. Nothing is read until a field
    /// is accessed.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            control: OnceCell::new(),
            size: OnceCell::new(),
            hashes: OnceCell::new(),
            cached_text: OnceCell::new(),
        }
    }

    /// A record reconstructed from a paragraph already read out of an
    /// existing `Packages` file -- one that already carries its synthetic
    /// `Filename`/`Size`/hash fields. Unlike [PackageRecord::new], this
    /// never needs to invoke `dpkg-deb`: the paragraph already has
    /// everything [PackageRecord::packages_text] would otherwise compute.
    pub fn from_indexed(path: PathBuf, paragraph: RawParagraph) -> Self {
        let record = Self::new(path);
        let cached_text = paragraph.to_preserved_text();
        let _ = record.control.set(paragraph);
        let _ = record.cached_text.set(cached_text);
        record
    }

    /// Path to the underlying `.deb` on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn control(&self) -> Result<&RawParagraph, Error> {
        if let Some(p) = self.control.get() {
            return Ok(p);
        }
        let text = probe::deb_control(&self.path).map_err(Error::Probe)?;
        let parsed = RawParagraph::parse(&text).map_err(Error::Paragraph)?;
        Ok(self.control.get_or_init(|| parsed))
    }

    fn field(&self, name: &'static str) -> Result<&str, Error> {
        self.control()?.value(name).ok_or(Error::MissingField(name))
    }

    /// The `Package:` field.
    pub fn package(&self) -> Result<&str, Error> {
        self.field("Package")
    }

    /// The `Architecture:` field, parsed.
    pub fn architecture(&self) -> Result<Architecture, Error> {
        self.field("Architecture")?.parse().map_err(Error::Architecture)
    }

    /// The `Section:` field.
    pub fn section(&self) -> Result<&str, Error> {
        self.field("Section")
    }

    /// The `Source:` field, if this binary was built from a named source
    /// package different from its own name. Unlike the other fields, this
    /// one is genuinely optional.
    pub fn source(&self) -> Result<Option<&str>, Error> {
        Ok(self.control()?.value("Source"))
    }

    /// Repository-relative path: the last six path components of the
    /// on-disk location, joined by `/`.
    pub fn filename(&self) -> String {
        last_n_components(&self.path, 6)
    }

    fn size(&self) -> Result<u64, Error> {
        if let Some(&size) = self.size.get() {
            return Ok(size);
        }
        let size = probe::size(&self.path).map_err(Error::Probe)?;
        Ok(*self.size.get_or_init(|| size))
    }

    fn hashes(&self) -> Result<&[(HashAlgorithm, String)], Error> {
        if let Some(hashes) = self.hashes.get() {
            return Ok(hashes);
        }
        let mut computed = Vec::with_capacity(HashAlgorithm::ALL.len());
        for algorithm in HashAlgorithm::ALL {
            let digest = probe::digest(algorithm, &self.path).map_err(Error::Probe)?;
            computed.push((algorithm, digest));
        }
        Ok(self.hashes.get_or_init(|| computed))
    }

    /// The preserved control-paragraph text, followed by `Filename`,
    /// `Size`, and each hash field on its own line -- the exact text
    /// emitted into a `Packages` file for this record.
    pub fn packages_text(&self) -> Result<String, Error> {
        if let Some(text) = self.cached_text.get() {
            return Ok(text.clone());
        }
        let mut text = self.control()?.to_preserved_text();
        text.push_str(&format!("Filename: {}\n", self.filename()));
        text.push_str(&format!("Size: {}\n", self.size()?));
        for (algorithm, digest) in self.hashes()? {
            text.push_str(&format!("{}: {}\n", algorithm.field_name(), digest));
        }
        let _ = self.cached_text.set(text.clone());
        Ok(text)
    }
}

/// Join the last `n` components of `path` with `/`, regardless of the
/// host path separator -- used to build the repository-relative
/// `Filename:` field, which is always `/`-separated per the on-disk
/// contract.
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
    fn filename_keeps_last_six_components() {
        let record = PackageRecord::new(PathBuf::from(
            "/r/dists/lucid/experimental/binary-amd64/utils/pkgA_1.0_amd64.deb",
        ));
        assert_eq!(
            "dists/lucid/experimental/binary-amd64/utils/pkgA_1.0_amd64.deb",
            record.filename()
        );
    }

    #[test]
    fn filename_with_fewer_than_six_components_keeps_them_all() {
        let record = PackageRecord::new(PathBuf::from("a/b/c.deb"));
        assert_eq!("a/b/c.deb", record.filename());
    }

    #[test]
    fn from_indexed_skips_dpkg_deb_entirely() {
        let text = "Package: pkgA\n\
                     Architecture: amd64\n\
                     Section: utils\n\
                     Filename: dists/lucid/experimental/binary-amd64/utils/pkgA_1.0_amd64.deb\n\
                     Size: 12345\n\
                     MD5Sum: deadbeef\n";
        let paragraph = RawParagraph::parse(text).unwrap();
        let record = PackageRecord::from_indexed(PathBuf::from("/does/not/exist.deb"), paragraph);
        assert_eq!("pkgA", record.package().unwrap());
        assert_eq!(Architecture::Amd64, record.architecture().unwrap());
        assert_eq!(text, record.packages_text().unwrap());
    }
}

// vim: foldmethod=marker
