//! Import path resolution heuristics
//!
//! Maps a module specifier (`./button`, `../mixins/focusable.js`) to a
//! file on disk. Bare (package) specifiers never resolve; package
//! boundaries are not crossed. All probing is read-only and never raises:
//! an unresolved specifier yields `None`.
//!
//! Specifiers are frequently written against build output (`./foo.js` for
//! a `foo.ts` source) or lean on naming conventions (`./button` next to
//! `button-mixin.ts`), so literal lookup is followed by a ladder of
//! fallbacks.

use std::path::{Component, Path, PathBuf};

/// Ranked source-file extensions, probed in order
const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Compiled-output-style extensions
const OUTPUT_STYLE: &[&str] = &["js", "jsx", "mjs", "cjs"];

/// Source-style extensions
const SOURCE_STYLE: &[&str] = &["ts", "tsx", "mts", "cts"];

/// Conventional file-name suffixes tried when the bare name misses
const NAMING_SUFFIXES: &[&str] = &[
    "-mixin",
    "-mixins",
    "-component",
    "-element",
    "-composed",
    "-styles",
    "-base",
];

/// Resolve a module specifier against the file that imports it
///
/// Returns the canonicalized path of the first matching regular file, or
/// `None` when the specifier is bare or nothing matches.
pub fn resolve_specifier(specifier: &str, importing_file: &Path) -> Option<PathBuf> {
    // Package boundaries are never crossed
    if !specifier.starts_with('.') && !specifier.starts_with('/') {
        return None;
    }

    let dir = importing_file.parent().unwrap_or_else(|| Path::new("."));
    let candidate = if specifier.starts_with('/') {
        normalize(Path::new(specifier))
    } else {
        normalize(&dir.join(specifier))
    };

    if let Some(found) = probe_file(&candidate) {
        return Some(finish(found));
    }
    if let Some(found) = probe_swapped_extension(&candidate) {
        return Some(finish(found));
    }
    if let Some(found) = probe_suffixes(&candidate) {
        return Some(finish(found));
    }
    if candidate.is_dir() {
        if let Some(found) = probe_index(&candidate) {
            return Some(finish(found));
        }
    }
    probe_prefix_scan(&candidate, dir).map(finish)
}

/// Lexically normalize `.` and `..` components without touching the disk
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn finish(path: PathBuf) -> PathBuf {
    std::fs::canonicalize(&path).unwrap_or(path)
}

/// Append an extension to the full file name (`foo.styles` -> `foo.styles.ts`)
fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// The extension of `path` when it is one of the recognized set
fn recognized_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;
    SOURCE_EXTENSIONS.iter().find(|e| **e == ext).copied()
}

/// Steps 1-2: the literal path, then the ranked extension list appended
fn probe_file(candidate: &Path) -> Option<PathBuf> {
    if candidate.is_file() {
        return Some(candidate.to_path_buf());
    }
    for ext in SOURCE_EXTENSIONS {
        let probed = append_extension(candidate, ext);
        if probed.is_file() {
            return Some(probed);
        }
    }
    None
}

/// Step 3: swap a recognized extension for the other family's
fn probe_swapped_extension(candidate: &Path) -> Option<PathBuf> {
    let ext = recognized_extension(candidate)?;
    let base = candidate.with_extension("");
    let other_family: &[&str] = if OUTPUT_STYLE.contains(&ext) {
        SOURCE_STYLE
    } else {
        OUTPUT_STYLE
    };
    for swapped in other_family {
        let probed = append_extension(&base, swapped);
        if probed.is_file() {
            return Some(probed);
        }
    }
    None
}

/// Step 4: conventional suffixes on the base file name
fn probe_suffixes(candidate: &Path) -> Option<PathBuf> {
    let base = if recognized_extension(candidate).is_some() {
        candidate.with_extension("")
    } else {
        candidate.to_path_buf()
    };
    let name = base.file_name()?.to_str()?.to_string();
    for suffix in NAMING_SUFFIXES {
        let probed = base.with_file_name(format!("{}{}", name, suffix));
        if let Some(found) = probe_file(&probed) {
            return Some(found);
        }
    }
    None
}

/// Step 5: an index file inside a directory candidate
fn probe_index(dir: &Path) -> Option<PathBuf> {
    for ext in SOURCE_EXTENSIONS {
        let probed = dir.join(format!("index.{}", ext));
        if probed.is_file() {
            return Some(probed);
        }
    }
    None
}

/// Step 6: scan the candidate's directory and the importing directory for
/// anything whose name starts with the specifier's base name, preferring
/// the shortest matching name
fn probe_prefix_scan(candidate: &Path, importing_dir: &Path) -> Option<PathBuf> {
    let base = if recognized_extension(candidate).is_some() {
        candidate.with_extension("")
    } else {
        candidate.to_path_buf()
    };
    let base_name = base.file_name()?.to_str()?.to_string();

    let mut scan_dirs: Vec<&Path> = Vec::new();
    if let Some(parent) = candidate.parent() {
        scan_dirs.push(parent);
    }
    if !scan_dirs.contains(&importing_dir) {
        scan_dirs.push(importing_dir);
    }

    let mut matches: Vec<(usize, PathBuf)> = Vec::new();
    for dir in scan_dirs {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.starts_with(&base_name) {
                continue;
            }
            if path.is_file() && recognized_extension(&path).is_some() {
                matches.push((name.len(), path));
            } else if path.is_dir() {
                if let Some(found) = probe_index(&path) {
                    matches.push((name.len(), found));
                }
            }
        }
    }

    matches.sort_by(|a, b| a.0.cmp(&b.0));
    matches.into_iter().next().map(|(_, path)| path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, "export {};\n").unwrap();
    }

    fn canon(path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap()
    }

    #[test]
    fn test_bare_specifier_never_resolves() {
        let dir = TempDir::new().unwrap();
        let importer = dir.path().join("a.ts");
        touch(&importer);
        assert_eq!(resolve_specifier("lit", &importer), None);
        assert_eq!(resolve_specifier("@scope/pkg", &importer), None);
    }

    #[test]
    fn test_extension_probe() {
        let dir = TempDir::new().unwrap();
        let importer = dir.path().join("a.ts");
        touch(&importer);
        let target = dir.path().join("foo.ts");
        touch(&target);

        assert_eq!(resolve_specifier("./foo", &importer), Some(canon(&target)));
    }

    #[test]
    fn test_directory_index_fallback() {
        let dir = TempDir::new().unwrap();
        let importer = dir.path().join("a.ts");
        touch(&importer);
        fs::create_dir(dir.path().join("foo")).unwrap();
        let index = dir.path().join("foo").join("index.ts");
        touch(&index);

        assert_eq!(resolve_specifier("./foo", &importer), Some(canon(&index)));
    }

    #[test]
    fn test_file_beats_directory_index() {
        let dir = TempDir::new().unwrap();
        let importer = dir.path().join("a.ts");
        touch(&importer);
        let file = dir.path().join("foo.ts");
        touch(&file);
        fs::create_dir(dir.path().join("foo")).unwrap();
        touch(&dir.path().join("foo").join("index.ts"));

        assert_eq!(resolve_specifier("./foo", &importer), Some(canon(&file)));
    }

    #[test]
    fn test_output_style_specifier_finds_source() {
        let dir = TempDir::new().unwrap();
        let importer = dir.path().join("a.ts");
        touch(&importer);
        let target = dir.path().join("foo.ts");
        touch(&target);

        assert_eq!(
            resolve_specifier("./foo.js", &importer),
            Some(canon(&target))
        );
    }

    #[test]
    fn test_conventional_suffix() {
        let dir = TempDir::new().unwrap();
        let importer = dir.path().join("a.ts");
        touch(&importer);
        let target = dir.path().join("button-mixin.ts");
        touch(&target);

        assert_eq!(
            resolve_specifier("./button", &importer),
            Some(canon(&target))
        );
    }

    #[test]
    fn test_prefix_scan_prefers_shortest() {
        let dir = TempDir::new().unwrap();
        let importer = dir.path().join("a.ts");
        touch(&importer);
        let short = dir.path().join("buttonish.ts");
        let long = dir.path().join("buttonish-helpers.ts");
        touch(&short);
        touch(&long);

        assert_eq!(
            resolve_specifier("./buttoni", &importer),
            Some(canon(&short))
        );
    }

    #[test]
    fn test_hopeless_specifier_yields_none() {
        let dir = TempDir::new().unwrap();
        let importer = dir.path().join("a.ts");
        touch(&importer);

        assert_eq!(resolve_specifier("./does-not-exist", &importer), None);
        assert_eq!(resolve_specifier("../nowhere/at/all", &importer), None);
    }

    #[test]
    fn test_parent_relative_specifier() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        let importer = dir.path().join("src").join("a.ts");
        touch(&importer);
        let target = dir.path().join("shared.ts");
        touch(&target);

        assert_eq!(
            resolve_specifier("../shared", &importer),
            Some(canon(&target))
        );
    }
}
