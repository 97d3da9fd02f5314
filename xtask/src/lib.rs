pub mod tasks;

use std::{
    path::{Path, PathBuf},
    process::Command,
};

/// Workspace member that holds the server.
pub const SERVER_PACKAGE: &str = "site_backend";

pub fn project_root() -> PathBuf {
    Path::new(&env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(1)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn dist_dir() -> PathBuf {
    project_root().join("target/dist")
}

pub fn check_nextest_exists() -> Result<(), anyhow::Error> {
    check_cargo_subcommand_exists("nextest", "cargo-nextest")
}

pub fn check_tarpaulin_exists() -> Result<(), anyhow::Error> {
    check_cargo_subcommand_exists("tarpaulin", "cargo-tarpaulin")
}

fn check_cargo_subcommand_exists(subcommand: &str, install_name: &str) -> Result<(), anyhow::Error> {
    let output = Command::new("cargo")
        .current_dir(project_root())
        .args([subcommand, "--version"])
        .output();

    match output {
        Err(ref e) if e.kind() == std::io::ErrorKind::NotFound => {
            anyhow::bail!("Error: 'cargo' is not found on the PATH.")
        }
        Err(e) => anyhow::bail!("An unknown error occurred: {}", e),
        // cargo exits non-zero when the subcommand is not installed
        Ok(output) if !output.status.success() => anyhow::bail!(
            "Error: '{}' is not installed. Please install it to continue.",
            install_name
        ),
        Ok(_) => Ok(()),
    }
}
