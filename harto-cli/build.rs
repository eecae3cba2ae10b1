use std::path::Path;
use std::process::Command;

fn git(root: &Path, args: &[&str]) -> Option<String> {
    let out = Command::new("git").arg("-C").arg(root).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let s = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!s.is_empty()).then_some(s)
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let root = Path::new(&manifest_dir).join("..");

    let mut sha = git(&root, &["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_string());
    if git(&root, &["status", "--porcelain", "--untracked-files=no"]).is_some() {
        sha.push_str("-dirty");
    }

    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rustc-env=HARTO_BUILD_SHA={sha}");
}
