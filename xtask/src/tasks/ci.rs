use std::process::{Command, ExitStatus};

use owo_colors::OwoColorize;

use crate::{project_root, tasks::test::run_test, SERVER_PACKAGE};

pub fn ci() -> Result<(), anyhow::Error> {
    println!("Running `cargo check`...");
    let check = cargo(&["check", "-p", SERVER_PACKAGE, "--all-targets"])?;

    println!("Running `cargo clippy`...");
    let clippy = cargo(&["clippy", "-p", SERVER_PACKAGE, "--all-targets", "--", "-D", "warnings"])?;

    println!("Running `cargo build`...");
    let build = cargo(&["build", "-p", SERVER_PACKAGE])?;

    println!("Running tests...");
    let test = run_test()?;

    println!("Running `cargo fmt --check`...");
    let fmt = cargo(&["fmt", "--all", "--check"])?;

    let failures = [
        ("cargo check", check),
        ("cargo clippy", clippy),
        ("cargo build", build),
        ("tests", test),
        ("cargo fmt", fmt),
    ]
    .into_iter()
    .filter(|(task, status)| print_error_with_status_code(task, *status))
    .count();

    if failures > 0 {
        anyhow::bail!("{} CI check(s) failed", failures);
    }

    println!(
        "CI checks complete. Consider running `cargo xtask coverage`. \
    Coverage checks are not completed by the CI checks due to the time requirement."
    );
    Ok(())
}

fn cargo(args: &[&str]) -> Result<ExitStatus, anyhow::Error> {
    Ok(Command::new("cargo")
        .current_dir(project_root())
        .args(args)
        .status()?)
}

/// Prints a report for a failed step. Returns whether the step failed.
fn print_error_with_status_code(task: &str, status: ExitStatus) -> bool {
    if status.success() {
        return false;
    }
    let code = match status.code() {
        Some(x) => x.to_string(),
        None => "<< no status code >>".to_string(),
    };
    println!(
        "{} `{}` finished with a non-zero status code: {}",
        "Error:".to_string().red(),
        task.blue(),
        code
    );
    true
}
