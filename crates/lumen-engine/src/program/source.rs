use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Names of the two shader resources a demo is built from.
#[derive(Debug, Clone)]
pub struct ShaderNames {
    pub vertex: String,
    pub fragment: String,
}

impl Default for ShaderNames {
    fn default() -> Self {
        Self {
            vertex: "vshader.wgsl".to_string(),
            fragment: "fshader.wgsl".to_string(),
        }
    }
}

/// Vertex + fragment source text, loaded before startup.
#[derive(Debug, Clone)]
pub struct StageSources {
    pub vertex: String,
    pub fragment: String,
}

/// Retrieves shader source text by name.
pub trait ShaderProvider {
    fn load(&self, name: &str) -> Result<String>;

    fn load_stages(&self, names: &ShaderNames) -> Result<StageSources> {
        Ok(StageSources {
            vertex: self.load(&names.vertex)?,
            fragment: self.load(&names.fragment)?,
        })
    }
}

/// Reads shaders from a directory on disk.
#[derive(Debug, Clone)]
pub struct ShaderDir {
    root: PathBuf,
}

impl ShaderDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ShaderProvider for ShaderDir {
    fn load(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read shader {}", path.display()))?;
        log::debug!("loaded shader {} ({} bytes)", path.display(), text.len());
        Ok(text)
    }
}

/// Shaders compiled into the binary.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedShaders {
    entries: Vec<(&'static str, &'static str)>,
}

impl EmbeddedShaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, source: &'static str) -> Self {
        self.entries.push((name, source));
        self
    }
}

impl ShaderProvider for EmbeddedShaders {
    fn load(&self, name: &str) -> Result<String> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, src)| (*src).to_string())
            .with_context(|| format!("no embedded shader named `{name}`"))
    }
}
