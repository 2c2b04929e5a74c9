//! Build script for version info

fn main() {
    let now = chrono::Utc::now();
    println!("cargo:rustc-env=BUILD_DATE={}", now.format("%Y-%m-%d"));

    if let Ok(target) = std::env::var("TARGET") {
        println!("cargo:rustc-env=TARGET={}", target);
    }

    if let Ok(output) = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
    {
        if output.status.success() {
            let sha = String::from_utf8_lossy(&output.stdout);
            println!("cargo:rustc-env=GIT_SHA={}", sha.trim());
        }
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
}
