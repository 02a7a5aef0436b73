use std::path::{Path, PathBuf};

use anyhow::Context;
use toml::{map::Map, Value};

/// Root of the cargo workspace this crate was built in.
pub fn workspace_dir() -> anyhow::Result<PathBuf> {
    let output = std::process::Command::new(env!("CARGO"))
        .arg("locate-project")
        .arg("--workspace")
        .arg("--message-format=plain")
        .output()
        .context("failed to run cargo locate-project")?
        .stdout;
    let cargo_path = PathBuf::from(
        std::str::from_utf8(&output)
            .context("cargo locate-project printed non utf-8")?
            .trim(),
    );

    cargo_path
        .parent()
        .map(Path::to_path_buf)
        .context("workspace manifest has no parent directory")
}

/// Flat `KEY = "value"` secrets file, read the same way the deployed binary
/// reads its secret store.
#[derive(Debug, Clone, Default)]
pub struct Secrets(Map<String, Value>);

impl Secrets {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let map = toml::from_str::<Map<String, Value>>(text)
            .context("failed to parse secrets")?;

        Ok(Self(map))
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        Self::parse(&text)
    }

    /// String value of `key`. Non-string values count as missing.
    pub fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(Value::as_str).map(str::to_string)
    }

    pub fn require(&self, key: &str) -> anyhow::Result<String> {
        self.get(key)
            .with_context(|| format!("{key} was not found"))
    }
}

/// Loads `file_name` from the workspace root.
pub fn load_env(file_name: &str) -> anyhow::Result<Secrets> {
    Secrets::load(&workspace_dir()?.join(file_name))
}
