use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=USER");
    println!("cargo:rerun-if-env-changed=USERNAME");

    // Provenance stamped into the binary, surfaced by `excel-chart-generator info`
    let built_by = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=ECG_BUILT_BY={}", built_by);

    let built_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    println!("cargo:rustc-env=ECG_BUILT_AT={}", built_at);

    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    println!("cargo:rustc-env=ECG_BUILT_RUSTC={}", tool_version(&rustc));

    let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    println!("cargo:rustc-env=ECG_BUILT_CARGO={}", tool_version(&cargo));

    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=ECG_BUILT_PROFILE={}", profile);
}

fn tool_version(program: &str) -> String {
    Command::new(program)
        .arg("--version")
        .output()
        .ok()
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
