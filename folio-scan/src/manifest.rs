//! `package.json` and size-capped file reads.

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    #[serde(default)]
    dependencies: Option<Map<String, Value>>,
    #[serde(default)]
    dev_dependencies: Option<Map<String, Value>>,
}

/// Names of all dependencies and dev-dependencies, sorted and deduplicated.
///
/// Malformed JSON yields an empty list.
#[must_use]
pub fn parse_package_deps(text: &str) -> Vec<String> {
    let manifest: PackageJson = match serde_json::from_str(text) {
        Ok(manifest) => manifest,
        Err(e) => {
            debug!(error = %e, "Ignoring malformed package.json");
            return Vec::new();
        }
    };
    let names: BTreeSet<String> = manifest
        .dependencies
        .into_iter()
        .chain(manifest.dev_dependencies)
        .flatten()
        .map(|(name, _)| name)
        .collect();
    names.into_iter().collect()
}

/// Read at most `max_bytes` of `path` as lossy UTF-8.
///
/// Returns `Ok(None)` if the file does not exist.
///
/// # Errors
/// Any other I/O failure.
pub fn read_capped(path: &Path, max_bytes: usize) -> io::Result<Option<String>> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let mut buf = Vec::new();
    file.take(max_bytes as u64).read_to_end(&mut buf)?;
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deps_are_merged_sorted_and_unique() {
        let json = r#"{
            "name": "site",
            "dependencies": { "react": "^18", "three": "^0.160" },
            "devDependencies": { "vite": "^5", "react": "^18", "@types/three": "*" }
        }"#;
        assert_eq!(parse_package_deps(json), vec!["@types/three", "react", "three", "vite"]);
    }

    #[test]
    fn missing_or_null_sections_are_empty() {
        assert!(parse_package_deps(r#"{ "name": "x" }"#).is_empty());
        assert_eq!(parse_package_deps(r#"{ "dependencies": null, "devDependencies": { "jest": "1" } }"#), vec!["jest"]);
    }

    #[test]
    fn malformed_manifest_is_empty() {
        assert!(parse_package_deps("{ nope").is_empty());
        assert!(parse_package_deps("").is_empty());
        assert!(parse_package_deps(r#"{ "dependencies": ["react"] }"#).is_empty());
    }

    #[test]
    fn read_capped_truncates_and_tolerates_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("big.txt");
        fs::write(&path, "abcdefghij").expect("write");
        assert_eq!(read_capped(&path, 4).expect("read").as_deref(), Some("abcd"));
        assert_eq!(read_capped(&dir.path().join("none"), 4).expect("read"), None);
    }

    #[test]
    fn read_capped_is_lossy_on_split_utf8() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("utf8.txt");
        fs::write(&path, "é").expect("write");
        let text = read_capped(&path, 1).expect("read").expect("present");
        assert_eq!(text, "\u{FFFD}");
    }
}
