// ABOUTME: Render command implementation.
// ABOUTME: Prints substituted manifests as a multi-document YAML stream.

use kubeship::config::DeploySpec;
use kubeship::error::Result;
use kubeship::render::render_file;
use std::path::Path;

/// Render every manifest in `spec` and print it to stdout.
pub fn render(spec: &DeploySpec, workdir: &Path) -> Result<()> {
    for manifest in spec.manifests.iter() {
        let content = render_file(workdir, manifest, &spec.placeholders)?;
        println!("---");
        println!("# Source: {}", manifest.display());
        print!("{content}");
        if !content.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
