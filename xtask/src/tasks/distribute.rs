use std::{
    env, fs,
    process::{Command, Stdio},
};

use man::{Env, Manual};

use crate::{dist_dir, project_root, SERVER_PACKAGE};

pub fn dist() -> Result<(), anyhow::Error> {
    let _ = fs::remove_dir_all(dist_dir());
    fs::create_dir_all(dist_dir())?;

    dist_binary()?;
    dist_configuration()?;
    dist_manpage()?;

    Ok(())
}

pub fn dist_binary() -> Result<(), anyhow::Error> {
    // Get the `cargo` command and then build the release
    let cargo = env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    let status = Command::new(cargo)
        .current_dir(project_root())
        .args(["build", "--release", "-p", SERVER_PACKAGE])
        .status()?;

    if !status.success() {
        anyhow::bail!("cargo build failed");
    }

    // Set file paths based on the architecture
    #[allow(unused_mut)]
    let mut distributable = project_root().join("target/release").join(SERVER_PACKAGE);

    #[allow(unused_mut)]
    let mut destination = dist_dir().join(SERVER_PACKAGE);

    #[cfg(windows)]
    distributable.set_extension("exe");
    #[cfg(windows)]
    destination.set_extension("exe");

    // Copy the binary
    fs::copy(&distributable, &destination)?;

    // Strip the copy, leaving the build output untouched
    if Command::new("strip")
        .arg("--version")
        .stdout(Stdio::null())
        .status()
        .is_ok()
    {
        eprintln!("stripping the binary");
        let status = Command::new("strip").arg(&destination).status()?;
        if !status.success() {
            anyhow::bail!("strip failed");
        }
    } else {
        eprintln!("No `strip` utility found");
    }

    Ok(())
}

/// Copies the configuration files the server reads at startup. `local.yml`
/// is for development only and is left out.
pub fn dist_configuration() -> Result<(), anyhow::Error> {
    let config_src = project_root().join(SERVER_PACKAGE).join("configuration");
    let config_dest = dist_dir().join("configuration");
    fs::create_dir(&config_dest)?;

    for f in fs::read_dir(config_src)? {
        let f = f?;
        if f.file_name().eq("local.yml") {
            continue;
        }
        fs::copy(f.path(), config_dest.join(f.file_name()))?;
    }

    Ok(())
}

pub fn dist_manpage() -> Result<(), anyhow::Error> {
    let page = Manual::new(SERVER_PACKAGE)
        .about("Backend for the company website: contact form, newsletter subscriptions, GitHub repository listing, sitemap and a daily subscriber broadcast.")
        .env(Env::new("APP_ENVIRONMENT").help(
            "Selects configuration/<environment>.yml on top of base.yml. Either `local` (default) or `production`.",
        ))
        .env(Env::new("APP_GITHUB__TOKEN").help("Bearer token for the GitHub API."))
        .env(Env::new("APP_EMAIL_CLIENT__PASSWORD").help("Password for the mail API."))
        .env(Env::new("APP_APPLICATION__PORT").help("Port the HTTP server listens on."))
        .env(Env::new("RUST_LOG").help("Log filter, e.g. `site_backend=debug,info`."))
        .render();
    fs::write(dist_dir().join(format!("{}.man", SERVER_PACKAGE)), page)?;
    Ok(())
}
