// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! `cascade tree`: print the parse tree of one stylesheet.

use camino::Utf8Path;
use cascade_core::source_analysis::Dialect;
use miette::Result;

use super::OutputFormat;
use super::check;
use crate::paths::SourceFile;

/// Prints the tree dump of the file at `path`, or only the node found at
/// `query` (for example `styleSheet/body/bodyItem|1`), then the
/// diagnostics on stderr.
pub fn run(path: &Utf8Path, dialect: Option<Dialect>, query: Option<&str>) -> Result<()> {
    let source = SourceFile::load(path, dialect)?;
    let result = check::parse(&source);
    match query {
        None => print!("{}", result.tree.dump()),
        Some(query) => match result.tree.query(query) {
            Some(node) => println!("{}", node.image()),
            None => miette::bail!("No node matches '{query}' in '{path}'"),
        },
    }
    check::report(&source, &result.diagnostics, OutputFormat::Text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn unknown_query_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("a.css")).unwrap();
        fs::write(&path, "a { b: c }").unwrap();
        assert!(run(&path, None, Some("styleSheet/body")).is_ok());
        assert!(run(&path, None, None).is_ok());
        let err = run(&path, None, Some("styleSheet/media")).unwrap_err();
        assert!(err.to_string().starts_with("No node matches"));
    }
}
