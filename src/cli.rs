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

//! Command-line surface for the `debrepo` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Options shared by every subcommand.
#[derive(Debug, Parser)]
pub struct BaseOptions {
    /// Path to a YAML configuration file describing the repository's
    /// suite/component/architecture metadata.
    ///
    /// Required by `update`; ignored by `create`/`add`/`remove`/`sign`.
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    #[clap(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,
}

/// Split a comma-separated list into its trimmed, non-empty parts.
pub fn split_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// `create`: lay out `dists/<suite>/<component>/` for a set of suites
/// and components.
#[derive(Debug, Parser)]
pub struct CreateOptions {
    /// Path to the repository root.
    pub root: PathBuf,

    /// Comma-separated suite names, e.g. `lucid,lucid-updates`.
    pub suites: String,

    /// Comma-separated component names, e.g. `main,contrib`.
    pub components: String,
}

/// `add`: install one or more `.deb`/`.dsc` files into a component.
#[derive(Debug, Parser)]
pub struct AddOptions {
    /// `dists/<suite>/<component>` to add into.
    pub component_path: PathBuf,

    /// Symlink instead of copying each file into place.
    #[clap(long)]
    pub link: bool,

    /// Files or glob patterns to add.
    #[clap(required = true)]
    pub files: Vec<String>,
}

/// `remove`: delete one or more binary or source packages (and their
/// transitive companions) from a component.
#[derive(Debug, Parser)]
pub struct RemoveOptions {
    /// `dists/<suite>/<component>` to remove from.
    pub component_path: PathBuf,

    /// Binary or source package names to remove.
    #[clap(required = true)]
    pub names: Vec<String>,
}

/// `update`: regenerate every `Packages`/`Sources`/`Release` index from
/// the files actually present on disk.
#[derive(Debug, Parser)]
pub struct UpdateOptions {
    /// Path to the repository root.
    pub root: PathBuf,
}

/// `sign`: detached-sign the `Release` file of one or more suites.
#[derive(Debug, Parser)]
pub struct SignOptions {
    /// Path to the repository root.
    pub root: PathBuf,

    /// Comma-separated suite names, e.g. `lucid,lucid-updates`.
    pub suites: String,
}

/// The repository action to perform.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a repository's suite/component directory tree.
    Create(CreateOptions),
    /// Add packages to a component.
    Add(AddOptions),
    /// Remove packages from a component.
    Remove(RemoveOptions),
    /// Regenerate indices and `Release` files from what's on disk.
    Update(UpdateOptions),
    /// Detached-sign one or more suites.
    Sign(SignOptions),
}

/// Top-level command line: shared options plus the chosen subcommand.
#[derive(Debug, Parser)]
#[clap(name = "debrepo", about = "Build and maintain a local APT repository")]
pub struct Cli {
    #[clap(flatten)]
    pub base: BaseOptions,

    #[clap(subcommand)]
    pub command: Command,
}

// vim: foldmethod=marker
