//! Integration tests for react-migrate
//!
//! These tests build small React projects on disk and drive the binary
//! through its command-line interface.

use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(unused)]
pub const MANIFEST: &str = r#"{
  "name": "shop",
  "version": "1.0.0",
  "dependencies": {
    "react": "^16.14.0",
    "react-dom": "^16.14.0",
    "react-router-dom": "^5.3.0"
  },
  "devDependencies": {
    "@testing-library/react": "^11.2.7"
  }
}
"#;

#[allow(unused)]
pub const INDEX_JS: &str = "import React from 'react';
import ReactDOM from 'react-dom';
import App from './App';

ReactDOM.render(<App />, document.getElementById('root'));
";

#[allow(unused)]
pub const APP_JS: &str = "import React from 'react';

class App extends React.Component {
  componentWillMount() {
    this.props.load();
  }

  render() {
    return <div>Shop</div>;
  }
}

export default App;
";

#[allow(unused)]
pub const PLAIN_JS: &str = "export const add = (a, b) => a + b;\n";

/// Creates a project at `<temp>/shop` so snapshots land inside the temp dir.
#[allow(unused)]
pub fn create_test_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("shop");
    fs::create_dir_all(root.join("src/utils")).unwrap();

    fs::write(root.join("package.json"), MANIFEST).unwrap();
    fs::write(root.join("src/index.js"), INDEX_JS).unwrap();
    fs::write(root.join("src/App.js"), APP_JS).unwrap();
    fs::write(root.join("src/utils/math.js"), PLAIN_JS).unwrap();

    temp
}

#[allow(unused)]
pub fn project_root(temp: &TempDir) -> PathBuf {
    temp.path().join("shop")
}

#[allow(unused)]
pub fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

#[allow(unused)]
pub fn read_manifest(root: &Path) -> serde_json::Value {
    serde_json::from_str(&read(root, "package.json")).unwrap()
}

/// Helper to run a migration; `--skip-install` keeps the package manager out.
#[allow(unused)]
pub fn run_migrate(root: &Path, target: &str, extra_args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = cargo_bin_cmd!("react-migrate");
    cmd.arg(target)
        .arg(".")
        .arg("--skip-install")
        .args(extra_args)
        .env("NO_COLOR", "1")
        .current_dir(root);

    cmd.assert()
}

/// Helper to run a subcommand from inside the project.
#[allow(unused)]
pub fn run_command(root: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = cargo_bin_cmd!("react-migrate");
    cmd.args(args).env("NO_COLOR", "1").current_dir(root);
    cmd.assert()
}
