//! Repo-local architectural lint for the `api-checks` crate.
//!
//! `api-checks` is split into a `domain` (scenarios, runner, ports), inbound
//! adapters (the command line), and outbound adapters (HTTP transport and the
//! fake backend). This crate parses those sources with `syn` and rejects:
//!
//! - `domain` code importing adapter modules or transport, CLI, and
//!   configuration crates
//! - `inbound` code importing `outbound` modules or the HTTP client
//! - `outbound` code importing `inbound` modules or CLI crates
//!
//! Run it with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use syn::visit::Visit;
use thiserror::Error;

/// Name the linted crate uses for itself in integration paths.
const CRATE_NAME: &str = "api_checks";

const LAYER_DIRS: [&str; 3] = ["domain", "inbound", "outbound"];

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `api-checks/src`.
    pub file: Utf8PathBuf,
    /// Human-readable description of the violated rule.
    pub message: String,
}

/// Failure modes returned by the architecture lint.
#[derive(Debug, Error)]
pub enum ArchitectureLintError {
    /// Filesystem traversal or reading failed.
    #[error("I/O error while linting architecture ({path}): {message}")]
    Io {
        /// Path being read.
        path: Utf8PathBuf,
        /// Underlying I/O error message.
        message: String,
    },
    /// Rust source parsing failed.
    #[error("failed to parse {file} while linting architecture: {message}")]
    Parse {
        /// Offending file.
        file: Utf8PathBuf,
        /// Parser message.
        message: String,
    },
    /// One or more boundary violations were found.
    #[error("{}", render_violations(.0))]
    Violations(Vec<Violation>),
}

fn render_violations(violations: &[Violation]) -> String {
    let mut out = String::from("Architecture boundary violations:");
    for violation in violations {
        // Writing to a String cannot fail.
        drop(write!(out, "\n- {}: {}", violation.file, violation.message));
    }
    out
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `api-checks/src`.
    pub file: Utf8PathBuf,
    /// File contents.
    pub contents: String,
}

/// Lint the crate sources under `crate_dir/src`.
///
/// # Errors
///
/// Returns [`ArchitectureLintError`] when sources cannot be read or parsed,
/// or when any boundary is crossed.
pub fn lint_crate_sources(crate_dir: &Utf8Path) -> Result<(), ArchitectureLintError> {
    let src_path = crate_dir.join("src");
    let src = Dir::open_ambient_dir(&src_path, ambient_authority())
        .map_err(|err| io_error(&src_path, &err))?;
    let mut sources = Vec::new();
    for layer in LAYER_DIRS {
        let layer_path = Utf8PathBuf::from(layer);
        match src.open_dir(layer) {
            Ok(dir) => collect_sources_under(&dir, &layer_path, &mut sources)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(io_error(&src_path.join(layer), &err)),
        }
    }
    lint_sources(&sources)
}

/// Lint the provided Rust sources.
///
/// # Errors
///
/// Returns [`ArchitectureLintError::Parse`] for unparsable sources or files
/// outside the three layers, and [`ArchitectureLintError::Violations`] when
/// any boundary is crossed.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();

    for source in sources {
        let layer = ModuleLayer::infer_from_path(&source.file).ok_or_else(|| {
            ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: "unable to infer module layer from file path".to_owned(),
            }
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(lint_parsed_source(&source.file, layer, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModuleLayer {
    Domain,
    Inbound,
    Outbound,
}

impl ModuleLayer {
    fn infer_from_path(relative_path: &Utf8Path) -> Option<Self> {
        match relative_path.components().next()?.as_str() {
            "domain" => Some(Self::Domain),
            "inbound" => Some(Self::Inbound),
            "outbound" => Some(Self::Outbound),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    fn forbidden_module_roots(self) -> BTreeSet<&'static str> {
        match self {
            Self::Domain => BTreeSet::from(["inbound", "outbound", "config"]),
            Self::Inbound => BTreeSet::from(["outbound"]),
            Self::Outbound => BTreeSet::from(["inbound"]),
        }
    }

    fn forbidden_crate_roots(self) -> BTreeSet<&'static str> {
        match self {
            Self::Domain => BTreeSet::from([
                "clap",
                "color_eyre",
                "ortho_config",
                "reqwest",
                "tracing_subscriber",
                "wiremock",
            ]),
            Self::Inbound => BTreeSet::from(["reqwest", "wiremock"]),
            Self::Outbound => BTreeSet::from(["clap", "ortho_config"]),
        }
    }
}

fn lint_parsed_source(file: &Utf8Path, layer: ModuleLayer, parsed: &syn::File) -> Vec<Violation> {
    let forbidden_modules = layer.forbidden_module_roots();
    let forbidden_crates = layer.forbidden_crate_roots();

    let mut collector = PathCollector::default();
    collector.visit_file(parsed);

    let mut messages = BTreeSet::new();
    for segments in &collector.paths {
        if let Some(root) =
            internal_module_root(segments).and_then(|root| forbidden_modules.get(root))
        {
            messages.insert(format!(
                "{} module must not depend on crate::{root}",
                layer.name()
            ));
        }
        if let Some(root) =
            external_crate_root(segments).and_then(|root| forbidden_crates.get(root))
        {
            messages.insert(format!(
                "{} module must not depend on external crate `{root}`",
                layer.name()
            ));
        }
    }

    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_path_buf(),
            message,
        })
        .collect()
}

fn is_relative_module_segment(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

fn internal_module_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    if LAYER_DIRS.contains(&first) {
        return Some(first);
    }
    let start_index = if is_relative_module_segment(first) {
        segments
            .iter()
            .position(|segment| !is_relative_module_segment(segment))?
    } else if first == CRATE_NAME {
        1
    } else {
        return None;
    };
    segments.get(start_index).map(String::as_str)
}

fn external_crate_root(segments: &[String]) -> Option<&str> {
    let root = segments.first()?.as_str();
    if is_relative_module_segment(root) || root == CRATE_NAME {
        return None;
    }
    Some(root)
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn record_path(&mut self, path: &syn::Path) {
        let segments: Vec<String> = path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
    }

    fn record_use_tree(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.paths.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        self.record_path(node);
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, Vec::new());
    }
}

fn collect_sources_under(
    dir: &Dir,
    relative: &Utf8Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    let mut names = Vec::new();
    for entry in dir.entries().map_err(|err| io_error(relative, &err))? {
        let entry = entry.map_err(|err| io_error(relative, &err))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry
            .file_type()
            .map_err(|err| io_error(&relative.join(&name), &err))?
            .is_dir();
        names.push((name, is_dir));
    }
    names.sort();

    for (name, is_dir) in names {
        let path = relative.join(&name);
        if is_dir {
            let child = dir.open_dir(&name).map_err(|err| io_error(&path, &err))?;
            collect_sources_under(&child, &path, sources)?;
        } else if path.extension() == Some("rs") {
            let contents = dir
                .read_to_string(&name)
                .map_err(|err| io_error(&path, &err))?;
            sources.push(LintSource {
                file: path,
                contents,
            });
        }
    }
    Ok(())
}

fn io_error(path: &Utf8Path, err: &std::io::Error) -> ArchitectureLintError {
    ArchitectureLintError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
