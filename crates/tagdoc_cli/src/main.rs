//! Command-line entry point for tagdoc
//!
//! Walks one or more source roots, resolves every custom element it can
//! find, and writes a single JSON manifest of the results.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tagdoc::{resolve_component_with_diagnostics, ComponentDoc, ComponentPrinter};
use walkdir::WalkDir;

/// Manifest schema version, bumped on breaking output changes
const SCHEMA_VERSION: u32 = 1;

/// Extensions worth parsing; declaration files are filtered separately
const SCAN_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs"];

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let cmd = Command::parse(args)?;
    if cmd.help {
        usage();
        return Ok(());
    }

    let config = cmd.load_config()?;
    let roots = cmd.roots(&config);
    let out_path = cmd.out_path(&config);

    if out_path.exists() && !cmd.force {
        bail!(
            "output file already exists: {} (pass --force to overwrite)",
            out_path.display()
        );
    }

    let mut components: Vec<ComponentDoc> = Vec::new();
    let mut scanned = 0usize;
    let mut failed = 0usize;

    for root in &roots {
        if !root.exists() {
            bail!("source root does not exist: {}", root.display());
        }
        for file in discover(root, &config.exclude) {
            scanned += 1;
            match resolve_component_with_diagnostics(&file) {
                Ok((Some(doc), diagnostics)) => {
                    if !cmd.quiet {
                        ComponentPrinter::new(&doc, true).print_to_stdout();
                        for diagnostic in &diagnostics {
                            eprintln!("  {}", diagnostic.format());
                        }
                    }
                    components.push(doc);
                }
                // Not every source file declares a component
                Ok((None, _)) => {}
                Err(e) => {
                    failed += 1;
                    eprintln!("  warning: {}: {}", file.display(), e);
                }
            }
        }
    }

    components.sort_by(|a, b| a.tag_name.cmp(&b.tag_name));

    let manifest = Manifest {
        schema_version: SCHEMA_VERSION,
        components,
    };
    write_manifest(&manifest, &out_path)?;

    if !cmd.quiet {
        println!(
            "\n{} components from {} files ({} failed) -> {}",
            manifest.components.len(),
            scanned,
            failed,
            out_path.display()
        );
    }

    Ok(())
}

/// Top-level manifest written to disk
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    schema_version: u32,
    components: Vec<ComponentDoc>,
}

/// Parsed command-line arguments
struct Command {
    /// Positional source roots; config/default applies when empty
    roots: Vec<PathBuf>,
    /// Manifest path override
    out: Option<PathBuf>,
    /// Config file path override
    config: Option<PathBuf>,
    /// Overwrite an existing manifest
    force: bool,
    /// Suppress per-component output
    quiet: bool,
    help: bool,
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        let mut cmd = Command {
            roots: Vec::new(),
            out: None,
            config: None,
            force: false,
            quiet: false,
            help: false,
        };

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--out" | "-o" => {
                    if i + 1 < args.len() {
                        cmd.out = Some(PathBuf::from(&args[i + 1]));
                        i += 2;
                    } else {
                        bail!("--out requires a value");
                    }
                }
                "--config" | "-c" => {
                    if i + 1 < args.len() {
                        cmd.config = Some(PathBuf::from(&args[i + 1]));
                        i += 2;
                    } else {
                        bail!("--config requires a value");
                    }
                }
                "--force" => {
                    cmd.force = true;
                    i += 1;
                }
                "--quiet" | "-q" => {
                    cmd.quiet = true;
                    i += 1;
                }
                "--help" | "-h" => {
                    cmd.help = true;
                    i += 1;
                }
                arg if !arg.starts_with('-') => {
                    cmd.roots.push(PathBuf::from(arg));
                    i += 1;
                }
                _ => {
                    bail!("unknown flag: {} (see --help)", args[i]);
                }
            }
        }

        Ok(cmd)
    }

    /// Load tagdoc.toml: the explicit --config path must exist, the
    /// default location is optional.
    fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path),
            None => {
                let default = Path::new("tagdoc.toml");
                if default.exists() {
                    Config::load(default)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    fn roots(&self, config: &Config) -> Vec<PathBuf> {
        if !self.roots.is_empty() {
            return self.roots.clone();
        }
        if !config.include.is_empty() {
            return config.include.iter().map(PathBuf::from).collect();
        }
        vec![PathBuf::from("src")]
    }

    fn out_path(&self, config: &Config) -> PathBuf {
        self.out
            .clone()
            .or_else(|| config.out.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("components.json"))
    }
}

/// Optional project configuration (tagdoc.toml)
#[derive(Deserialize, Default)]
#[serde(default)]
struct Config {
    /// Source roots to scan when none are given on the command line
    include: Vec<String>,
    /// Path substrings to skip during discovery
    exclude: Vec<String>,
    /// Manifest output path
    out: Option<String>,
}

impl Config {
    fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Collect candidate source files under a root, in a stable order
fn discover(root: &Path, exclude: &[String]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != "node_modules")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_candidate(path))
        .collect();
    files.retain(|path| {
        let text = path.to_string_lossy();
        !exclude.iter().any(|pattern| text.contains(pattern.as_str()))
    });
    files
}

fn is_candidate(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    if !SCAN_EXTENSIONS.contains(&ext) {
        return false;
    }
    // foo.d.ts carries no runtime class bodies
    !path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".d.ts") || n.ends_with(".d.mts") || n.ends_with(".d.cts"))
}

fn write_manifest(manifest: &Manifest, out_path: &Path) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(out_path, json)
        .with_context(|| format!("writing manifest {}", out_path.display()))?;
    Ok(())
}

fn usage() {
    eprintln!("tagdoc [options] [roots...]");
    eprintln!();
    eprintln!("Extract custom element documentation into a JSON manifest.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [roots...]            Source directories to scan (default: src)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --out, -o <file>      Manifest path (default: components.json)");
    eprintln!("  --config, -c <file>   Config file (default: tagdoc.toml if present)");
    eprintln!("  --force               Overwrite an existing manifest");
    eprintln!("  --quiet, -q           Suppress per-component output");
    eprintln!("  --help, -h            Show this help");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  tagdoc src/components -o dist/components.json --force");
    eprintln!("  tagdoc --config tooling/tagdoc.toml --quiet");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_flags_and_roots() {
        let args: Vec<String> = ["src", "--out", "docs/manifest.json", "--force", "-q"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let cmd = Command::parse(&args).unwrap();
        assert_eq!(cmd.roots, vec![PathBuf::from("src")]);
        assert_eq!(cmd.out, Some(PathBuf::from("docs/manifest.json")));
        assert!(cmd.force);
        assert!(cmd.quiet);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let args = vec!["--nope".to_string()];
        assert!(Command::parse(&args).is_err());
    }

    #[test]
    fn test_config_defaults_apply() {
        let cmd = Command::parse(&[]).unwrap();
        let config = Config::default();
        assert_eq!(cmd.roots(&config), vec![PathBuf::from("src")]);
        assert_eq!(cmd.out_path(&config), PathBuf::from("components.json"));
    }

    #[test]
    fn test_config_file_parsed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tagdoc.toml");
        fs::write(
            &path,
            "include = [\"packages/ui/src\"]\nexclude = [\".test.\"]\nout = \"dist/c.json\"\n",
        )
        .unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.include, vec!["packages/ui/src"]);
        assert_eq!(config.exclude, vec![".test."]);
        assert_eq!(config.out.as_deref(), Some("dist/c.json"));

        let cmd = Command::parse(&[]).unwrap();
        assert_eq!(cmd.roots(&config), vec![PathBuf::from("packages/ui/src")]);
        assert_eq!(cmd.out_path(&config), PathBuf::from("dist/c.json"));
    }

    #[test]
    fn test_discover_filters_declarations_and_node_modules() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.ts"), "").unwrap();
        fs::write(dir.path().join("a.d.ts"), "").unwrap();
        fs::write(dir.path().join("style.css"), "").unwrap();
        fs::create_dir_all(dir.path().join("node_modules/lit")).unwrap();
        fs::write(dir.path().join("node_modules/lit/index.ts"), "").unwrap();

        let files = discover(dir.path(), &[]);
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.ts"));
    }

    #[test]
    fn test_discover_exclude_substrings() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("button.ts"), "").unwrap();
        fs::write(dir.path().join("button.test.ts"), "").unwrap();

        let files = discover(dir.path(), &[".test.".to_string()]);
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("button.ts"));
    }
}
