//! Build script for the storefront crate.
//!
//! Fingerprints the static assets so templates can append a cache-busting
//! version to their URLs.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Assets to fingerprint and the compile-time variable each hash lands in.
const ASSETS: &[(&str, &str)] = &[
    ("static/css/main.css", "CSS_HASH"),
    ("static/js/site.js", "JS_HASH"),
];

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");

    for (relative, var) in ASSETS {
        let path = Path::new(&manifest_dir).join(relative);
        println!("cargo:rerun-if-changed={}", path.display());
        println!("cargo:rustc-env={var}={}", fingerprint(&path));
    }
}

/// First 8 hex chars of the file's SHA-256, or empty if it cannot be read.
fn fingerprint(path: &Path) -> String {
    match fs::read(path) {
        Ok(content) => {
            let digest = format!("{:x}", Sha256::digest(&content));
            digest.chars().take(8).collect()
        }
        Err(e) => {
            println!("cargo:warning=Could not read {}: {e}", path.display());
            String::new()
        }
    }
}
