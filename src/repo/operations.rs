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

//! Repository Operations: the five high-level actions (`create`, `add`,
//! `remove`, `update`, `sign`) composing every other module in [crate::repo].
//!
//! Per-item failures (a glob that resolves to nothing, a source with no
//! matching binary, a missing companion archive) are logged via the
//! [log] facade and do not abort the surrounding batch. Only whole-
//! operation failures -- an unreadable repository root, a `sign` failure
//! -- propagate as [Result::Err].

use crate::{
    architecture::Architecture,
    repo::{
        catalogue::{self, Packages, Sources},
        config::{Component, RepoConfig},
        layout::{self, FileKind},
        package::{self, PackageRecord},
        probe, release,
        source::{self, SourceRecord},
    },
};
use std::{
    collections::BTreeSet,
    io::Write,
    path::{Path, PathBuf},
};

/// Error conditions that abort an entire [crate::repo::operations] call,
/// as opposed to the per-item diagnostics logged during `add`/`remove`/
/// `update`.
#[derive(Debug)]
pub enum Error {
    /// Underlying i/o error.
    Io(std::io::Error),

    /// Failure creating a directory or placing a file.
    Layout(layout::Error),

    /// Failure reading or writing a `Packages`/`Sources` catalogue.
    Catalogue(catalogue::Error),

    /// Failure writing a `Release` file.
    Release(release::Error),

    /// Failure invoking an external tool (used by `sign`).
    Probe(probe::Error),
}
crate::errors::error_enum!(Error);

/// `create(root, suites, components)`: ensure `root` exists, and under
/// it, `dists/<suite>/<component>/` for every suite/component pair.
pub fn create(root: &Path, suites: &[String], components: &[Component]) -> Result<(), Error> {
    layout::mkdirs(root).map_err(Error::Layout)?;
    for suite in suites {
        for component in components {
            let path = layout::component_path(root, suite, component);
            layout::mkdirs(&path).map_err(Error::Layout)?;
        }
    }
    Ok(())
}

/// `add(component_path, files, link)`: resolve every entry of `files`
/// (a literal path or a glob) and install each `.deb`/`.dsc` found.
/// Binary packages are installed before source packages, so that
/// `find_section` sees the newly added binaries.
pub fn add(component_path: &Path, files: &[String], link: bool) -> Result<(), Error> {
    let resolved = resolve_inputs(files);
    let mut debs = vec![];
    let mut dscs = vec![];
    for path in resolved {
        let name = path.to_string_lossy().into_owned();
        if name.ends_with(FileKind::Deb.suffix()) {
            debs.push(path);
        } else if name.ends_with(FileKind::Dsc.suffix()) {
            dscs.push(path);
        } else {
            log::warn!("add: {}: not a .deb or .dsc; skipping", path.display());
        }
    }

    for deb in &debs {
        if let Err(e) = add_binary(component_path, deb, link) {
            log::warn!("add: skipping {}: {e}", deb.display());
        }
    }
    for dsc in &dscs {
        if let Err(e) = add_source(component_path, dsc, link) {
            log::warn!("add: skipping {}: {e}", dsc.display());
        }
    }
    Ok(())
}

fn resolve_inputs(files: &[String]) -> Vec<PathBuf> {
    let mut resolved = vec![];
    for pattern in files {
        if is_glob_pattern(pattern) {
            match glob::glob(pattern) {
                Ok(paths) => {
                    for entry in paths {
                        match entry {
                            Ok(path) => resolved.push(path),
                            Err(e) => log::warn!("add: {pattern}: {e}"),
                        }
                    }
                }
                Err(e) => log::warn!("add: invalid glob {pattern}: {e}"),
            }
        } else {
            let path = PathBuf::from(pattern);
            if path.exists() {
                resolved.push(path);
            } else {
                log::warn!("add: {pattern}: no such file");
            }
        }
    }
    resolved
}

fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

fn add_binary(component_path: &Path, deb: &Path, link: bool) -> Result<(), package::Error> {
    let record = PackageRecord::new(deb.to_path_buf());
    let architecture = record.architecture()?;
    let section = record.section()?;
    let dest_dir = layout::section_path(&layout::binary_path(component_path, &architecture), section);
    place(deb, &dest_dir, link);
    Ok(())
}

fn add_source(component_path: &Path, dsc: &Path, link: bool) -> Result<(), source::Error> {
    let record = SourceRecord::new(dsc.to_path_buf());
    let Some(section) = record.find_section(component_path)? else {
        log::warn!("add: {}: no matching binary for section discovery", dsc.display());
        return Ok(());
    };

    let dsc_dir = dsc.parent().unwrap_or_else(|| Path::new("."));
    let originals = record.original_archive_names()?;
    let diff = record.diff_archive_name()?;

    for companion in originals.iter().chain(diff.iter()) {
        if !dsc_dir.join(companion).exists() {
            log::warn!(
                "add: {}: missing companion archive {companion}; not installed",
                dsc.display()
            );
            return Ok(());
        }
    }

    let dest_dir = layout::section_path(&layout::source_path(component_path), &section);
    let mut to_install = vec![dsc.to_path_buf()];
    to_install.extend(originals.iter().map(|name| dsc_dir.join(name)));
    if let Some(name) = &diff {
        to_install.push(dsc_dir.join(name));
    }
    for src in &to_install {
        place(src, &dest_dir, link);
    }
    Ok(())
}

fn place(src: &Path, dest_dir: &Path, link: bool) {
    if let Err(e) = layout::mkdirs(dest_dir) {
        log::warn!("add: could not create {}: {e}", dest_dir.display());
        return;
    }
    let Some(name) = src.file_name() else {
        return;
    };
    let dest = dest_dir.join(name);
    let result = if link {
        layout::link_file(src, &dest)
    } else {
        layout::copy_file(src, &dest)
    };
    if let Err(e) = result {
        log::warn!("add: could not install {}: {e}", src.display());
    }
}

/// `remove(component_path, names)`: compute the transitive closure of
/// `names` across the `Packages` catalogue of every `binary-*`
/// architecture and the component's `Sources` catalogue, then delete
/// every resolved binary and source file. Catalogues are not rewritten;
/// a subsequent `update` regenerates them.
pub fn remove(component_path: &Path, names: &[String]) -> Result<(), Error> {
    let source_dir = component_path.join("source");
    let mut sources = Sources::new(source_dir.join("Sources"));
    if source_dir.is_dir() {
        sources.read().map_err(Error::Catalogue)?;
    }

    let mut packages_by_arch = vec![];
    if component_path.is_dir() {
        for entry in std::fs::read_dir(component_path).map_err(Error::Io)? {
            let entry = entry.map_err(Error::Io)?;
            if entry.file_type().map_err(Error::Io)?.is_dir()
                && entry.file_name().to_string_lossy().starts_with("binary-")
            {
                let mut packages = Packages::new(entry.path().join("Packages"));
                packages.read().map_err(Error::Catalogue)?;
                packages_by_arch.push(packages);
            }
        }
    }

    let mut source_names: BTreeSet<String> = BTreeSet::new();
    for name in names {
        for packages in &packages_by_arch {
            if let Some(record) = packages.find(name) {
                let source_name = record
                    .source()
                    .ok()
                    .flatten()
                    .map(str::to_owned)
                    .unwrap_or_else(|| name.clone());
                source_names.insert(source_name);
            }
        }
    }

    let mut binary_names: BTreeSet<String> = names.iter().cloned().collect();
    for source_name in &source_names {
        if let Some(record) = sources.find(source_name) {
            if let Ok(binaries) = record.binary_names() {
                binary_names.extend(binaries);
            }
        }
    }

    for binary_name in &binary_names {
        let mut found = false;
        for packages in &packages_by_arch {
            if let Some(record) = packages.find(binary_name) {
                found = true;
                remove_file_logged(record.path());
            }
        }
        if !found {
            log::warn!("remove: {binary_name} not found in any Packages catalogue");
        }
    }

    for source_name in &source_names {
        match sources.find(source_name) {
            Some(record) => remove_source_files(record),
            None => log::warn!("remove: {source_name} not found in Sources catalogue"),
        }
    }

    Ok(())
}

fn remove_source_files(record: &SourceRecord) {
    let dir = record.path().parent().unwrap_or_else(|| Path::new("."));
    let mut targets: BTreeSet<PathBuf> = BTreeSet::new();
    targets.insert(record.path().to_path_buf());
    if let Ok(files) = record.files() {
        targets.extend(files.into_iter().map(|name| dir.join(name)));
    }
    for target in &targets {
        remove_file_logged(target);
    }
}

fn remove_file_logged(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            log::warn!("remove: {}: {e}", path.display());
        }
    }
}

/// `update(root)`: walk `dists/<suite>/<component>/`, rebuilding every
/// `Packages`/`Sources` catalogue from the `.deb`/`.dsc` files actually
/// present, writing component and suite `Release` files, and producing
/// `.gz`/`.bz2` compressed copies of each index.
pub fn update(root: &Path, config: &RepoConfig) -> Result<(), Error> {
    let dists = root.join("dists");
    if !dists.is_dir() {
        return Ok(());
    }

    for suite_entry in read_dir_sorted(&dists)? {
        if !suite_entry.file_type().map_err(Error::Io)?.is_dir() {
            continue;
        }
        let suite_name = suite_entry.file_name().to_string_lossy().into_owned();
        let suite_path = suite_entry.path();

        let mut generated_files: Vec<PathBuf> = vec![];
        let mut observed_components: BTreeSet<String> = BTreeSet::new();
        let mut observed_architectures: BTreeSet<Architecture> = BTreeSet::new();

        for component_entry in read_dir_sorted(&suite_path)? {
            if !component_entry.file_type().map_err(Error::Io)?.is_dir() {
                continue;
            }
            let component_name = component_entry.file_name().to_string_lossy().into_owned();
            let component_path = component_entry.path();
            observed_components.insert(component_name.clone());

            update_source_subtree(
                &component_path,
                config,
                &suite_name,
                &component_name,
                &mut generated_files,
            )?;

            update_binary_subtrees(
                &component_path,
                config,
                &suite_name,
                &component_name,
                &mut generated_files,
                &mut observed_architectures,
            )?;
        }

        let components: Vec<Component> = observed_components.into_iter().map(Component::from).collect();
        let architectures: Vec<Architecture> = observed_architectures.into_iter().collect();
        release::write_suite_release(
            &suite_path.join("Release"),
            config,
            &architectures,
            &components,
            &generated_files,
        )
        .map_err(Error::Release)?;
    }

    Ok(())
}

fn update_source_subtree(
    component_path: &Path,
    config: &RepoConfig,
    suite_name: &str,
    component_name: &str,
    generated_files: &mut Vec<PathBuf>,
) -> Result<(), Error> {
    let source_dir = component_path.join("source");
    if !source_dir.is_dir() {
        return Ok(());
    }

    let mut sources = Sources::new(source_dir.join("Sources"));
    for dsc in layout::find_files(&source_dir, FileKind::Dsc).map_err(Error::Layout)? {
        if let Err(e) = sources.add_source(SourceRecord::new(dsc.clone())) {
            log::warn!("update: skipping {}: {e}", dsc.display());
        }
    }
    sources.write().map_err(Error::Catalogue)?;
    generated_files.push(source_dir.join("Sources"));
    generated_files.extend(compress_index(&source_dir.join("Sources"))?);

    release::write_component_release(
        &source_dir.join("Release"),
        config,
        suite_name,
        component_name,
        "source",
    )
    .map_err(Error::Release)?;
    generated_files.push(source_dir.join("Release"));

    Ok(())
}

fn update_binary_subtrees(
    component_path: &Path,
    config: &RepoConfig,
    suite_name: &str,
    component_name: &str,
    generated_files: &mut Vec<PathBuf>,
    observed_architectures: &mut BTreeSet<Architecture>,
) -> Result<(), Error> {
    let mut arch_dirs: Vec<(Architecture, PathBuf)> = vec![];
    for entry in read_dir_sorted(component_path)? {
        if !entry.file_type().map_err(Error::Io)?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(arch_str) = name.strip_prefix("binary-") else {
            continue;
        };
        match arch_str.parse::<Architecture>() {
            Ok(architecture) => arch_dirs.push((architecture, entry.path())),
            Err(_) => log::warn!("update: unrecognised architecture directory {name}"),
        }
    }

    let all_debs: Vec<PathBuf> = arch_dirs
        .iter()
        .find(|(architecture, _)| *architecture == Architecture::All)
        .map(|(_, path)| layout::find_files(path, FileKind::Deb))
        .transpose()
        .map_err(Error::Layout)?
        .unwrap_or_default();

    for (architecture, arch_path) in &arch_dirs {
        observed_architectures.insert(architecture.clone());

        let mut packages = Packages::new(arch_path.join("Packages"));
        for deb in layout::find_files(arch_path, FileKind::Deb).map_err(Error::Layout)? {
            if let Err(e) = packages.add_package(PackageRecord::new(deb.clone())) {
                log::warn!("update: skipping {}: {e}", deb.display());
            }
        }
        if *architecture != Architecture::All {
            for deb in &all_debs {
                if let Err(e) = packages.add_package(PackageRecord::new(deb.clone())) {
                    log::warn!("update: skipping binary-all fan-out {}: {e}", deb.display());
                }
            }
        }
        packages.write().map_err(Error::Catalogue)?;
        generated_files.push(arch_path.join("Packages"));
        generated_files.extend(compress_index(&arch_path.join("Packages"))?);

        release::write_component_release(
            &arch_path.join("Release"),
            config,
            suite_name,
            component_name,
            &architecture.to_string(),
        )
        .map_err(Error::Release)?;
        generated_files.push(arch_path.join("Release"));
    }

    Ok(())
}

fn compress_index(path: &Path) -> Result<Vec<PathBuf>, Error> {
    let data = std::fs::read(path).map_err(Error::Io)?;

    let gz_path = append_extension(path, "gz");
    let mut gz = flate2::write::GzEncoder::new(
        std::fs::File::create(&gz_path).map_err(Error::Io)?,
        flate2::Compression::default(),
    );
    gz.write_all(&data).map_err(Error::Io)?;
    gz.finish().map_err(Error::Io)?;

    let bz2_path = append_extension(path, "bz2");
    let mut bz2 = bzip2::write::BzEncoder::new(
        std::fs::File::create(&bz2_path).map_err(Error::Io)?,
        bzip2::Compression::default(),
    );
    bz2.write_all(&data).map_err(Error::Io)?;
    bz2.finish().map_err(Error::Io)?;

    Ok(vec![gz_path, bz2_path])
}

fn append_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

fn read_dir_sorted(dir: &Path) -> Result<Vec<std::fs::DirEntry>, Error> {
    let mut entries = std::fs::read_dir(dir)
        .map_err(Error::Io)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::Io)?;
    entries.sort_by_key(std::fs::DirEntry::file_name);
    Ok(entries)
}

/// `sign(root, suites)`: detached-sign each suite's `Release`, producing
/// `Release.gpg`. Aborts on the first signer failure.
pub fn sign(root: &Path, suites: &[String]) -> Result<(), Error> {
    for suite in suites {
        let suite_path = root.join("dists").join(suite);
        probe::gpg_sign(&suite_path.join("Release"), &suite_path.join("Release.gpg"))
            .map_err(Error::Probe)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_produces_exactly_the_suite_component_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("r");
        create(&root, &["lucid".to_owned()], &[Component::from("experimental")]).unwrap();

        assert!(root.is_dir());
        assert!(root.join("dists").is_dir());
        assert!(root.join("dists/lucid").is_dir());
        assert!(root.join("dists/lucid/experimental").is_dir());
    }

    #[test]
    fn is_glob_pattern_detects_wildcards() {
        assert!(is_glob_pattern("*.deb"));
        assert!(is_glob_pattern("pkg-[ab].deb"));
        assert!(!is_glob_pattern("pkgA_1.0_amd64.deb"));
    }

    #[test]
    fn remove_of_unknown_name_is_a_no_op_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let component = dir.path().join("experimental");
        std::fs::create_dir_all(&component).unwrap();
        remove(&component, &["nonexistent".to_owned()]).unwrap();
    }
}

// vim: foldmethod=marker
