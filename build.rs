use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    let git_hash = run("git", &["rev-parse", "--short", "HEAD"]);
    let git_status = run("git", &["status", "--porcelain"])
        .map(|out| if out.is_empty() { "clean" } else { "dirty" }.to_string());
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    let entries = [
        ("HASH", git_hash.filter(|hash| !hash.is_empty())),
        ("STATUS", git_status),
        ("TIMESTAMP", Some(timestamp)),
        ("TARGET", env::var("TARGET").ok()),
        ("PROFILE", env::var("PROFILE").ok()),
        ("RUSTC", run("rustc", &["--version"])),
    ];
    for (name, value) in entries {
        let value = value.unwrap_or_else(|| "unknown".to_string());
        println!("cargo:rustc-env=PURSEBOOK_BUILD_{name}={value}");
    }
}

/// Trimmed stdout of a successful command.
fn run(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|out| out.trim().to_string())
}
