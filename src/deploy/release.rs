// ABOUTME: Generic release struct parameterized by state marker.
// ABOUTME: Carries the deploy spec and rendered manifests through every phase.

use std::path::Path;

use crate::config::DeploySpec;
use crate::render::{self, RenderedManifest, ScratchDir};
use crate::types::Namespace;

use super::DeployError;
use super::state::Rendered;

/// One run's manifest set, parameterized by the phase it has reached.
///
/// Each transition consumes the release and returns it in the next state, so
/// applying unvalidated manifests doesn't compile.
#[derive(Debug)]
pub struct Release<'a, S> {
    pub(crate) spec: &'a DeploySpec,
    pub(crate) manifests: Vec<RenderedManifest>,
    pub(crate) state: S,
}

impl<'a> Release<'a, Rendered> {
    /// Render every manifest in `spec` (resolved against `base_dir`) into `scratch`.
    pub fn render(
        spec: &'a DeploySpec,
        base_dir: &Path,
        scratch: &ScratchDir,
    ) -> Result<Self, DeployError> {
        let manifests = render::render_all(base_dir, spec.manifests.iter(), &spec.placeholders, scratch)?;
        Ok(Release {
            spec,
            manifests,
            state: Rendered,
        })
    }
}

impl<S> Release<'_, S> {
    /// Get the deploy spec.
    pub fn spec(&self) -> &DeploySpec {
        self.spec
    }

    /// Get the rendered manifests, in apply order.
    pub fn manifests(&self) -> &[RenderedManifest] {
        &self.manifests
    }

    /// Get the target namespace.
    pub fn namespace(&self) -> &Namespace {
        &self.spec.namespace
    }
}
