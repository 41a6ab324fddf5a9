//! Test utilities for loclab
//!
//! Shared helpers across the workspace: centralized temp directories and
//! builders for realistic resource-file fixtures.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates a temporary directory within `.tmp/` at the workspace root
///
/// This keeps all test temporary files in a single gitignored location that
/// is easy to clean up manually if needed. The directory is removed
/// automatically when the returned `TempDir` drops.
///
/// # Panics
///
/// Panics if the current directory cannot be determined or the directory
/// cannot be created.
pub fn temp_dir_in_workspace() -> TempDir {
    let workspace_root = std::env::current_dir().expect("Failed to get current directory");

    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base).expect("Failed to create .tmp directory");

    TempDir::new_in(&tmp_base).expect("Failed to create temporary directory in .tmp/")
}

/// Alternative with Result for non-test code
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let workspace_root = std::env::current_dir()?;
    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}

/// Header emitted by the designer tooling for generated resource files.
///
/// Deliberately includes the stock comment that quotes `<data>` examples:
/// fixtures should exercise the same traps real files do. The schema block
/// is trimmed to the parts parsers actually see.
const FIXTURE_PROLOGUE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<root>
  <!--
    Microsoft ResX Schema

    Example:
    <data name="Name1"><value>this is my long string</value></data>
    <data name="Color1" type="System.Drawing.Color, System.Drawing">Blue</data>
  -->
  <resheader name="resmimetype">
    <value>text/microsoft-resx</value>
  </resheader>
  <resheader name="version">
    <value>2.0</value>
  </resheader>
"#;

/// Builds the text of a resource file holding `entries` in the given order.
///
/// `eol` is applied to every line break ("\n" or "\r\n"). Keys and values
/// are inserted literally, so pass pre-escaped text when testing entities.
pub fn resource_document(entries: &[(&str, &str)], eol: &str) -> String {
    let mut text = String::from(FIXTURE_PROLOGUE);
    for (key, value) in entries {
        text.push_str(&format!(
            "  <data name=\"{key}\" xml:space=\"preserve\">\n    <value>{value}</value>\n  </data>\n"
        ));
    }
    text.push_str("</root>\n");
    if eol == "\n" {
        text
    } else {
        text.replace('\n', eol)
    }
}

/// Writes a fixture resource file into `dir` and returns its path.
pub fn write_resource_file(
    dir: &Path,
    name: &str,
    entries: &[(&str, &str)],
    eol: &str,
) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, resource_document(entries, eol)).expect("Failed to write fixture file");
    path
}
