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

//! Release Writer: emits per-component (architecture-scoped) and
//! per-suite `Release` files.

use crate::{
    architecture::Architecture,
    control::DateTime2822,
    repo::{
        config::{Component, RepoConfig},
        probe::{self, HashAlgorithm},
    },
};
use std::path::{Path, PathBuf};

/// Error conditions encountered while writing a `Release` file.
#[derive(Debug)]
pub enum Error {
    /// Underlying i/o error writing the file.
    Io(std::io::Error),

    /// Failure probing the size or digest of an indexed file.
    Probe(probe::Error),
}
crate::errors::error_enum!(Error);

/// Write a component (architecture-scoped) `Release`: exactly six
/// lines, in fixed order, with `Archive` taken from the suite name and
/// the remaining fields from `config`.
pub fn write_component_release(
    path: &Path,
    config: &RepoConfig,
    suite: &str,
    component: &str,
    architecture: &str,
) -> Result<(), Error> {
    let text = format!(
        "Archive: {suite}\n\
         Component: {component}\n\
         Label: {label}\n\
         Origin: {origin}\n\
         Architecture: {architecture}\n\
         Description: {description}\n",
        label = config.label,
        origin = config.origin,
        description = config.description,
    );
    std::fs::write(path, text).map_err(Error::Io)
}

/// Write a suite `Release`: the eight-line metadata header, followed by
/// one hash block per [HashAlgorithm], one line per file in `files`.
/// `config.date` is used verbatim if present; otherwise the current time
/// fills the `Date:` field. The hash blocks are omitted entirely if
/// `files` is empty.
pub fn write_suite_release(
    path: &Path,
    config: &RepoConfig,
    architectures: &[Architecture],
    components: &[Component],
    files: &[PathBuf],
) -> Result<(), Error> {
    let architectures = architectures
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    let components_joined = components
        .iter()
        .map(|c| c.0.clone())
        .collect::<Vec<_>>()
        .join(" ");
    let date = config.date.clone().unwrap_or_else(DateTime2822::now);

    let mut text = format!(
        "Architectures: {architectures}\n\
         Codename: {codename}\n\
         Components: {components_joined}\n\
         Date: {date}\n\
         Label: {label}\n\
         Origin: {origin}\n\
         Suite: {suite}\n\
         Description: {description}\n",
        codename = config.codename,
        date = date.0,
        label = config.label,
        origin = config.origin,
        suite = config.suite,
        description = config.description,
    );

    if !files.is_empty() {
        let mut sizes = Vec::with_capacity(files.len());
        for file in files {
            sizes.push(probe::size(file).map_err(Error::Probe)?);
        }
        let width = max_width(&sizes);

        for algorithm in HashAlgorithm::ALL {
            text.push_str(&format!("{}:\n", algorithm.field_name()));
            for (file, &size) in files.iter().zip(sizes.iter()) {
                let digest = probe::digest(algorithm, file).map_err(Error::Probe)?;
                let relpath = last_n_components(file, 3);
                text.push_str(&format!(" {digest}{}{size} {relpath}\n", padding_for(size, width)));
            }
        }
    }

    std::fs::write(path, text).map_err(Error::Io)
}

/// Width, in decimal digits, of the largest size in `sizes`.
fn max_width(sizes: &[u64]) -> usize {
    sizes.iter().map(|s| s.to_string().len()).max().unwrap_or(0)
}

/// Four spaces of separator, plus enough left-padding to right-align
/// `size`'s decimal representation to `width` columns.
fn padding_for(size: u64, width: usize) -> String {
    let digits = size.to_string().len();
    format!("    {}", " ".repeat(width.saturating_sub(digits)))
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
    fn padding_right_aligns_to_widest_size() {
        let width = max_width(&[7, 12345]);
        assert_eq!(5, width);
        assert_eq!("        ", padding_for(7, width));
        assert_eq!("    ", padding_for(12345, width));
    }

    #[test]
    fn component_release_has_six_fixed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Release");
        let config = RepoConfig {
            label: "met.no".to_owned(),
            origin: "met.no".to_owned(),
            description: "Experimental packages".to_owned(),
            ..Default::default()
        };
        write_component_release(&path, &config, "lucid", "experimental", "amd64").unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            vec![
                "Archive: lucid",
                "Component: experimental",
                "Label: met.no",
                "Origin: met.no",
                "Architecture: amd64",
                "Description: Experimental packages",
            ],
            lines
        );
    }

    #[test]
    fn suite_release_omits_hash_blocks_when_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Release");
        let config = RepoConfig {
            date: Some(DateTime2822("Mon, 26 Dec 2022 16:30:00 +0100".to_owned())),
            ..Default::default()
        };
        write_suite_release(&path, &config, &[], &[], &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("MD5Sum:"));
        assert!(text.contains("Date: Mon, 26 Dec 2022 16:30:00 +0100"));
    }
}

// vim: foldmethod=marker
