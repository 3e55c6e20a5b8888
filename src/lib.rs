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

#![deny(missing_docs)]
#![deny(missing_copy_implementations)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unused_import_braces)]
#![deny(unused_qualifications)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

//! The `debrepo` crate builds and maintains a Debian/Ubuntu-style binary
//! APT repository on a local filesystem: a `dists/<suite>/<component>/`
//! tree of binary packages (`.deb`), source packages (`.dsc` plus their
//! upstream and diff archives), and the generated `Packages`, `Sources`,
//! and `Release` index files an APT client expects to find there.
//!
//! # Introduction
//!
//! The crate is organised the way the repository itself is laid out,
//! leaves first:
//!
//! - [control] parses the Debian control-paragraph syntax shared by
//!   `.deb` control members and `.dsc` files.
//! - [architecture] and [version] parse the two small but
//!   structured value types (CPU/ABI tags, package version numbers)
//!   that show up throughout control data.
//! - [repo] is the repository engine proper: [repo::probe] shells out
//!   for file hashes and sizes, [repo::package] and [repo::source]
//!   represent one `.deb`/`.dsc`, [repo::catalogue] maintains the
//!   `Packages`/`Sources` indices, [repo::layout] knows the directory
//!   tree, [repo::release] emits `Release` files, and
//!   [repo::operations] composes all of the above into the
//!   create/add/remove/update/sign actions a caller actually invokes.
//!
//! Dates throughout [control] parse into a [chrono::DateTime], and the
//! small wrapper types in [control] implement [serde::Serialize]/
//! [serde::Deserialize] unconditionally -- the latter is what lets a
//! [repo::config::RepoConfig] load straight out of YAML.

pub mod architecture;
pub mod control;
pub(crate) mod errors;
pub mod repo;
pub mod version;

// vim: foldmethod=marker
