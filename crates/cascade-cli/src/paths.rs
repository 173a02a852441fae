// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Locating stylesheet sources and choosing their dialect.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use cascade_core::source_analysis::Dialect;
use miette::{Context, IntoDiagnostic, Result};

/// File extensions treated as stylesheets.
pub const STYLESHEET_EXTENSIONS: &[&str] = &["css", "less", "scss"];

/// A stylesheet loaded from disk.
#[derive(Debug)]
pub struct SourceFile {
    pub path: Utf8PathBuf,
    pub text: String,
    pub dialect: Dialect,
}

impl SourceFile {
    /// Reads `path`, using `dialect` if given and the extension otherwise.
    pub fn load(path: &Utf8Path, dialect: Option<Dialect>) -> Result<Self> {
        let text = fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read '{path}'"))?;
        Ok(Self {
            path: path.to_owned(),
            text,
            dialect: dialect.unwrap_or_else(|| dialect_for_path(path)),
        })
    }
}

/// The dialect implied by a file extension; anything but `.less` and
/// `.scss` is plain CSS.
pub fn dialect_for_path(path: &Utf8Path) -> Dialect {
    match path.extension().map(str::to_ascii_lowercase).as_deref() {
        Some("less") => Dialect::Less,
        Some("scss") => Dialect::Scss,
        _ => Dialect::Css,
    }
}

fn is_stylesheet(path: &Utf8Path) -> bool {
    path.extension()
        .is_some_and(|ext| STYLESHEET_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
}

/// Expands `path` into the stylesheets to process.
///
/// A file is taken as-is whatever its extension; a directory is searched
/// recursively for `.css`, `.less` and `.scss` files, in sorted order.
pub fn collect_sources(path: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_owned()]);
    }
    if !path.is_dir() {
        miette::bail!("Path '{path}' does not exist");
    }
    let mut files = Vec::new();
    collect_recursive(path, &mut files)?;
    files.sort();
    if files.is_empty() {
        miette::bail!("No stylesheets found in '{path}'");
    }
    Ok(files)
}

/// Symlinks are skipped so circular links cannot recurse forever.
fn collect_recursive(dir: &Utf8Path, files: &mut Vec<Utf8PathBuf>) -> Result<()> {
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
            .map_err(|_| miette::miette!("Non-UTF-8 path in '{dir}'"))?;

        if file_type.is_dir() {
            collect_recursive(&entry_path, files)?;
        } else if file_type.is_file() && is_stylesheet(&entry_path) {
            files.push(entry_path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_dir() -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        (temp, dir)
    }

    #[test]
    fn dialect_from_extension() {
        assert_eq!(dialect_for_path(Utf8Path::new("a/b.less")), Dialect::Less);
        assert_eq!(dialect_for_path(Utf8Path::new("b.SCSS")), Dialect::Scss);
        assert_eq!(dialect_for_path(Utf8Path::new("b.css")), Dialect::Css);
        assert_eq!(dialect_for_path(Utf8Path::new("README")), Dialect::Css);
    }

    #[test]
    fn collects_stylesheets_recursively_in_order() {
        let (_temp, dir) = temp_dir();
        fs::create_dir(dir.join("nested")).unwrap();
        fs::write(dir.join("b.css"), "").unwrap();
        fs::write(dir.join("nested/a.less"), "").unwrap();
        fs::write(dir.join("notes.txt"), "").unwrap();

        let files = collect_sources(&dir).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(&dir).unwrap().as_str().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["b.css", "nested/a.less"]);
    }

    #[test]
    fn single_file_is_taken_as_is() {
        let (_temp, dir) = temp_dir();
        let file = dir.join("style.txt");
        fs::write(&file, "a {}").unwrap();
        assert_eq!(collect_sources(&file).unwrap(), vec![file]);
    }

    #[test]
    fn missing_path_and_empty_dir_are_errors() {
        let (_temp, dir) = temp_dir();
        assert!(collect_sources(&dir.join("missing")).is_err());
        assert!(collect_sources(&dir).is_err());
    }

    #[test]
    fn load_respects_dialect_override() {
        let (_temp, dir) = temp_dir();
        let file = dir.join("style.less");
        fs::write(&file, "@x: 1;").unwrap();
        assert_eq!(SourceFile::load(&file, None).unwrap().dialect, Dialect::Less);
        let forced = SourceFile::load(&file, Some(Dialect::Css)).unwrap();
        assert_eq!(forced.dialect, Dialect::Css);
        assert_eq!(forced.text, "@x: 1;");
    }
}
