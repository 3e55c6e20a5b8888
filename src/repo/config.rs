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

//! Repository-wide metadata, threaded explicitly through every
//! [crate::repo::operations] call rather than held as process-wide state.

use crate::{architecture::Architecture, control::DateTime2822};
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Read, path::Path};

/// A top-level partition of a suite, such as `main` or `experimental`.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Component(pub String);

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for Component {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Component {
    fn from(s: &str) -> Self {
        Component(s.to_owned())
    }
}

impl From<String> for Component {
    fn from(s: String) -> Self {
        Component(s)
    }
}

/// Repository-wide metadata: the dictionary spec.md describes as held in
/// process-wide state in the reference implementation, here passed as an
/// explicit value to every [crate::repo::operations] function.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Architectures indexed by this repository, e.g. `amd64`, `source`.
    #[serde(default)]
    pub architectures: Vec<Architecture>,

    /// Release codename, e.g. `lucid`.
    #[serde(default)]
    pub codename: String,

    /// Suite name, e.g. `lucid` or `lucid-updates`.
    #[serde(default)]
    pub suite: String,

    /// Components making up the suite, e.g. `main`, `experimental`.
    #[serde(default)]
    pub components: Vec<Component>,

    /// `Date:` heading for the suite `Release` file. `None` means "fill in
    /// the current time at write time" -- see [crate::repo::release].
    #[serde(default)]
    pub date: Option<DateTime2822>,

    /// `Label:` heading.
    #[serde(default)]
    pub label: String,

    /// `Origin:` heading.
    #[serde(default)]
    pub origin: String,

    /// `Description:` heading.
    #[serde(default)]
    pub description: String,
}

/// Error conditions encountered while loading a [RepoConfig].
#[derive(Debug)]
pub enum Error {
    /// Underlying i/o error reading the configuration file.
    Io(std::io::Error),

    /// The configuration file was not well-formed YAML, or did not match
    /// the expected [RepoConfig] shape.
    Yaml(serde_yaml::Error),
}
crate::errors::error_enum!(Error);

impl RepoConfig {
    /// Parse a [RepoConfig] from a YAML document.
    pub fn from_reader<ReadT: Read>(reader: ReadT) -> Result<Self, Error> {
        serde_yaml::from_reader(reader).map_err(Error::Yaml)
    }

    /// Parse a [RepoConfig] from a YAML file on disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path).map_err(Error::Io)?;
        Self::from_reader(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_reader_parses_yaml() {
        let yaml = "\
architectures:
  - amd64
codename: lucid
suite: lucid
components:
  - experimental
label: met.no
origin: met.no
description: Experimental packages
";
        let config = RepoConfig::from_reader(yaml.as_bytes()).unwrap();
        assert_eq!("lucid", config.codename);
        assert_eq!(vec![Architecture::Amd64], config.architectures);
        assert_eq!(vec![Component::from("experimental")], config.components);
        assert!(config.date.is_none());
    }

    #[test]
    fn default_is_empty() {
        let config = RepoConfig::default();
        assert!(config.architectures.is_empty());
        assert!(config.components.is_empty());
        assert_eq!("", config.codename);
    }

    #[test]
    fn from_reader_rejects_malformed_yaml() {
        assert!(RepoConfig::from_reader("architectures: [".as_bytes()).is_err());
    }
}

// vim: foldmethod=marker
