use std::env;
use std::process::Command;

fn main() {
    // Only look up the git hash for release builds or when BUILD_VERSION_WITH_HASH is set,
    // so regular debug builds of ufw-manager skip the git call.
    let profile = env::var("PROFILE").unwrap_or_default();
    let force_hash = env::var("BUILD_VERSION_WITH_HASH").is_ok();

    let mut version_string = env::var("CARGO_PKG_VERSION").unwrap_or_default();

    if profile == "release" || force_hash {
        // Attempt to get the short git hash
        let git_output = Command::new("git")
            .args(["rev-parse", "--short", "HEAD"])
            .output();

        if let Ok(output) = git_output {
            if output.status.success() {
                let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !hash.is_empty() {
                    version_string = format!("{} ({})", version_string, hash);
                }
            } else {
                // Not a git checkout, or git refused
                eprintln!(
                    "cargo:warning=Failed to get git hash: {}",
                    String::from_utf8_lossy(&output.stderr)
                );
            }
        } else {
            // git itself could not be started
            eprintln!("cargo:warning=Failed to execute git command. Is git installed and in PATH?");
        }
    } else {
        // Debug builds without the flag are marked as such
        version_string = format!("{} (dev)", version_string);
    }

    // Shown by `ufw-manager --version` and in the menu banner
    println!("cargo:rustc-env=UFWM_BUILD_VERSION={}", version_string);

    // Re-run when HEAD moves so release builds pick up the new hash
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/packed-refs");
    // Version bumps live in Cargo.toml
    println!("cargo:rerun-if-changed=Cargo.toml");
}
