use std::process::{Command, ExitStatus};

use crate::{check_tarpaulin_exists, project_root, SERVER_PACKAGE};

pub fn coverage() -> Result<(), anyhow::Error> {
    println!("Running test coverage analysis...");
    run_coverage_test()?;
    Ok(())
}

pub fn run_coverage_test() -> Result<ExitStatus, anyhow::Error> {
    if let Err(e) = check_tarpaulin_exists() {
        anyhow::bail!("Unable to run test coverage analysis. {}", e);
    }
    let test = Command::new("cargo")
        .current_dir(project_root())
        .args(["tarpaulin", "-p", SERVER_PACKAGE, "--out", "Html"])
        .status()?;
    Ok(test)
}
