// ABOUTME: Per-run scratch directory holding rendered manifests.
// ABOUTME: Removed when dropped, whichever way the run ends.

use std::path::{Component, Path, PathBuf};

use tempfile::TempDir;

use super::RenderError;

/// Temporary directory for rendered manifests, exclusive to one run.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("rendered-").tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where `source` lands inside the scratch directory.
    ///
    /// Relative structure is preserved; root and prefix components of absolute
    /// paths are dropped. Parent references are rejected.
    pub fn target_for(&self, source: &Path) -> Result<PathBuf, RenderError> {
        let mut target = self.dir.path().to_path_buf();
        for component in source.components() {
            match component {
                Component::Normal(part) => target.push(part),
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
                Component::ParentDir => {
                    return Err(RenderError::PathEscapes(source.to_path_buf()));
                }
            }
        }
        Ok(target)
    }

    /// Write rendered content for `source`, creating parent directories.
    pub fn write(&self, source: &Path, content: &str) -> Result<PathBuf, RenderError> {
        let target = self.target_for(source)?;
        let scratch_err = |e| RenderError::Scratch {
            path: target.clone(),
            source: e,
        };

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(scratch_err)?;
        }
        std::fs::write(&target, content).map_err(scratch_err)?;

        Ok(target)
    }

    /// Remove the directory now, reporting failures instead of ignoring them.
    pub fn close(self) -> std::io::Result<()> {
        self.dir.close()
    }
}
