// ABOUTME: Manifest rendering: placeholder substitution and scratch materialization.
// ABOUTME: Produces the rendered files that validation and apply operate on.

mod error;
mod scratch;
mod template;

pub use error::RenderError;
pub use scratch::ScratchDir;
pub use template::render;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A manifest after placeholder substitution, written to the scratch directory.
#[derive(Debug, Clone)]
pub struct RenderedManifest {
    /// Path as listed in the deploy config.
    pub source: PathBuf,
    /// Substituted manifest text.
    pub content: String,
    /// Location of the rendered file inside the scratch directory.
    pub path: PathBuf,
}

/// Read a manifest relative to `base_dir` and substitute placeholders.
///
/// Does not touch the scratch directory; used by `kubeship render`.
pub fn render_file(
    base_dir: &Path,
    source: &Path,
    placeholders: &BTreeMap<String, String>,
) -> Result<String, RenderError> {
    let full_path = base_dir.join(source);
    let text = std::fs::read_to_string(&full_path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => RenderError::ManifestMissing(source.to_path_buf()),
        _ => RenderError::ManifestUnreadable {
            path: source.to_path_buf(),
            source: e,
        },
    })?;
    Ok(render(&text, placeholders))
}

/// Render every manifest in order and write it into `scratch`.
///
/// Fails on the first missing or unreadable manifest; nothing is sent to the
/// cluster at this stage.
pub fn render_all<'a>(
    base_dir: &Path,
    manifests: impl IntoIterator<Item = &'a PathBuf>,
    placeholders: &BTreeMap<String, String>,
    scratch: &ScratchDir,
) -> Result<Vec<RenderedManifest>, RenderError> {
    let mut rendered = Vec::new();

    for source in manifests {
        let content = render_file(base_dir, source, placeholders)?;
        let path = scratch.write(source, &content)?;

        tracing::debug!("Rendered {} to {}", source.display(), path.display());
        tracing::trace!("{}:\n{}", source.display(), content);

        rendered.push(RenderedManifest {
            source: source.clone(),
            content,
            path,
        });
    }

    Ok(rendered)
}
