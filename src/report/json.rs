use anyhow::Result;

use crate::artifact::ArtifactDocument;

/// Print the `_meta` block of `doc` to stdout.
pub fn render(doc: &ArtifactDocument) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&doc.meta)?);
    Ok(())
}
