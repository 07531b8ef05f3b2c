use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=../../.git/HEAD");
    println!("cargo::rerun-if-env-changed=TODOBOARD_BUILD_COMMIT");

    let commit = std::env::var("TODOBOARD_BUILD_COMMIT")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(short_head)
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo::rustc-env=TODOBOARD_BUILD_COMMIT={commit}");
}

fn short_head() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=10", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}
