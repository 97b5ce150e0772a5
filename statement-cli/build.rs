use std::process::Command;

/// Run git against the workspace root and return trimmed stdout on success.
fn git(root: &str, args: &[&str]) -> Option<String> {
    let out = Command::new("git").arg("-C").arg(root).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn main() {
    let root = concat!(env!("CARGO_MANIFEST_DIR"), "/..");

    // `--version` prints "<pkg version> (<commit>)", with "-dirty" for uncommitted trees.
    let commit = match git(root, &["rev-parse", "--short=10", "HEAD"]) {
        Some(sha) if git(root, &["status", "--porcelain"]).is_some() => format!("{sha}-dirty"),
        Some(sha) => sha,
        None => "unknown".to_string(),
    };

    println!("cargo:rustc-env=STATEMENT_BUILD_SHA={commit}");
    println!("cargo:rerun-if-changed={root}/.git/HEAD");
    println!("cargo:rerun-if-changed={root}/.git/index");
}
