use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const METADATA_KEY: &str = "package.metadata.plmanagement.api_version";

/// Component API version (YYYYMMDD) declared in the package metadata
fn component_api_version(manifest_path: &Path) -> i64 {
    let manifest = fs::read_to_string(manifest_path)
        .expect("component API: cannot read Cargo.toml");
    let manifest: toml::Value = manifest.parse()
        .expect("component API: Cargo.toml is not valid TOML");

    manifest
        .get("package")
        .and_then(|p| p.get("metadata"))
        .and_then(|m| m.get("plmanagement"))
        .and_then(|meta| meta.get("api_version"))
        .and_then(|v| v.as_integer())
        .unwrap_or_else(|| panic!("component API: {} missing or not an integer", METADATA_KEY))
}

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"));
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));

    let api_version = component_api_version(&manifest_dir.join("Cargo.toml"));
    let generated = format!(
        "// Component API version generated from {} = {}\n\
         pub const BASE_API_VERSION: u32 = {};\n",
        METADATA_KEY, api_version, api_version
    );

    fs::write(out_dir.join("version_api.rs"), generated)
        .expect("component API: cannot write version_api.rs");

    println!("cargo:rerun-if-changed=Cargo.toml");
}
