use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const CONFIG: &str = r#"
common_chunks = ["vendors", "common"]
build_adapter = "weapp"

[chunk_pages]
"pages/home/index" = ["common-ui"]
"#;

const INPUT: &str = r#"{
  "pages": [{ "name": "pages/home/index", "path": "src/pages/home/index.tsx" }],
  "modules": [
    { "id": "components", "raw_request": "@tarojs/components", "used_exports": ["View", "ScrollView"] },
    { "id": "app", "raw_request": "./app", "mini_type": "entry" },
    { "id": "home", "raw_request": "./pages/home/index", "mini_type": "page" }
  ],
  "chunks": [
    { "id": 1, "name": "vendors", "modules": ["components"], "files": ["vendors.js", "vendors.wxss"] },
    { "id": 2, "name": "common", "files": ["common.js"] },
    { "name": "app", "entry_module": "app", "files": ["app.js", "app.wxss"] },
    { "id": "pages/home/index", "name": "home", "entry_module": "home", "files": ["pages/home/index.js"] }
  ],
  "sources": {
    "app": "App({})",
    "pages/home/index": "Page({})"
  },
  "assets": {
    "vendors.wxss": { "value": ".v{}" },
    "app.wxss": { "source": [".app{}"] }
  }
}"#;

fn write_fixture(dir: &Path) {
    fs::write(dir.join("mini-chunks.toml"), CONFIG).unwrap();
    fs::write(dir.join("build.json"), INPUT).unwrap();
}

#[test]
fn build_prints_rewritten_sources() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    Command::cargo_bin("mini-chunks")
        .unwrap()
        .current_dir(dir.path())
        .args(["build", "--input", "build.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"require(\"./common\");\nrequire(\"./vendors\");"#))
        .stdout(predicate::str::contains(r#"require(\"../../common-ui\");"#))
        .stdout(predicate::str::contains("scroll-view"));
}

#[test]
fn build_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let out = dir.path().join("result.json");

    Command::cargo_bin("mini-chunks")
        .unwrap()
        .current_dir(dir.path())
        .args(["build", "--input", "build.json", "--out"])
        .arg(&out)
        .assert()
        .success();

    let result: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(
        result["assets"]["app.wxss"]["source"],
        serde_json::json!(["@import \"./vendors.wxss\";", "\n", ".v{}", ".app{}"])
    );
    assert_eq!(result["components"], serde_json::json!(["scroll-view", "view"]));
}

#[test]
fn build_fails_on_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    Command::cargo_bin("mini-chunks")
        .unwrap()
        .current_dir(dir.path())
        .args(["build", "--input", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read build input"));
}
