//! CLI entry point for the repo-local architecture lint.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};

fn main() -> ExitCode {
    let Some(root) = repo_root() else {
        report("unable to locate workspace root (directory containing a workspace Cargo.toml)");
        return ExitCode::FAILURE;
    };
    match architecture_lint::lint_crate_sources(&root.join("api-checks")) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

fn report(message: &str) {
    if let Err(err) = writeln!(io::stderr().lock(), "{message}") {
        drop(err);
    }
}

fn repo_root() -> Option<Utf8PathBuf> {
    let from_env = env::var("CARGO_WORKSPACE_DIR").ok().map(Utf8PathBuf::from);
    let from_cwd = env::current_dir()
        .ok()
        .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok());
    let from_manifest = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    from_env
        .as_deref()
        .and_then(find_workspace_root)
        .or_else(|| from_cwd.as_deref().and_then(find_workspace_root))
        .or_else(|| find_workspace_root(&from_manifest))
}

fn find_workspace_root(start: &Utf8Path) -> Option<Utf8PathBuf> {
    start
        .ancestors()
        .find(|dir| {
            fs::read_to_string(dir.join("Cargo.toml"))
                .is_ok_and(|contents| contents.contains("[workspace]"))
        })
        .map(Utf8Path::to_path_buf)
}
