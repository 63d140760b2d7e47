//! Ensures every workspace crate inherits the workspace version and that
//! the internal dependency pin agrees with it.

use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(Path::parent)
        .expect("crate lives two levels below the workspace root")
        .to_path_buf()
}

fn read_toml(path: &Path) -> toml::Value {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    text.parse()
        .unwrap_or_else(|e| panic!("failed to parse {}: {e}", path.display()))
}

#[test]
fn all_members_use_workspace_version() {
    let root = workspace_root();
    let doc = read_toml(&root.join("Cargo.toml"));
    let members = doc["workspace"]["members"]
        .as_array()
        .expect("workspace.members should be an array");

    assert!(!members.is_empty());
    for member in members {
        let member = member.as_str().unwrap();
        let manifest = read_toml(&root.join(member).join("Cargo.toml"));
        let inherits = manifest["package"]["version"]
            .get("workspace")
            .and_then(|v| v.as_bool());
        assert_eq!(
            inherits,
            Some(true),
            "{member} should use version.workspace = true"
        );
    }
}

#[test]
fn workspace_version_matches_cargo_pkg() {
    let doc = read_toml(&workspace_root().join("Cargo.toml"));
    let ws_version = doc["workspace"]["package"]["version"].as_str().unwrap();
    assert_eq!(ws_version, env!("CARGO_PKG_VERSION"));

    let pinned = doc["workspace"]["dependencies"]["bild-launch"]["version"]
        .as_str()
        .unwrap();
    assert_eq!(
        pinned, ws_version,
        "internal dependency pin ({pinned}) != workspace version ({ws_version})"
    );
}
