// ABOUTME: Error types for manifest rendering.
// ABOUTME: All of these occur before any cluster mutation.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("manifest {0} does not exist")]
    ManifestMissing(PathBuf),

    #[error("can't read manifest {path}: {source}")]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest path {0} escapes the working directory")]
    PathEscapes(PathBuf),

    #[error("failed writing rendered manifest to {path}: {source}")]
    Scratch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
