// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source file discovery.

use std::collections::HashSet;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use miette::{IntoDiagnostic, Result, WrapErr};

/// Extension of the source files cliguard reads.
pub const SOURCE_EXTENSION: &str = "cs";

/// Expands `paths` into `.cs` files, in argument order, without duplicates.
///
/// Directories are walked recursively. Naming a file with another
/// extension, or a path that does not exist, is an error.
pub fn collect_source_files(paths: &[Utf8PathBuf]) -> Result<Vec<Utf8PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for path in paths {
        let found = if path.is_file() {
            if path.extension() != Some(SOURCE_EXTENSION) {
                miette::bail!("File '{path}' is not a .{SOURCE_EXTENSION} source file");
            }
            vec![path.clone()]
        } else if path.is_dir() {
            let mut found = Vec::new();
            collect_files_recursive(path, &mut found)?;
            found.sort();
            found
        } else {
            miette::bail!("Path '{path}' does not exist");
        };
        files.extend(found.into_iter().filter(|file| seen.insert(file.clone())));
    }

    if files.is_empty() {
        miette::bail!("No .{SOURCE_EXTENSION} source files found");
    }
    Ok(files)
}

/// Recursively collect all source files from a directory tree.
///
/// Symlinks are skipped to avoid potential infinite recursion from circular links.
fn collect_files_recursive(dir: &Utf8Path, files: &mut Vec<Utf8PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read directory '{dir}'"))?
    {
        let entry = entry.into_diagnostic()?;
        let file_type = entry.file_type().into_diagnostic()?;
        if file_type.is_symlink() {
            continue;
        }
        let entry_path = Utf8PathBuf::from_path_buf(entry.path())
            .map_err(|_| miette::miette!("Non-UTF-8 path"))?;

        if file_type.is_dir() {
            collect_files_recursive(&entry_path, files)?;
        } else if file_type.is_file() && entry_path.extension() == Some(SOURCE_EXTENSION) {
            files.push(entry_path);
        }
    }
    Ok(())
}
