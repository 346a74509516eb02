//! Reading a dropped file into a pending artifact.

use std::path::Path;

use tixproof_core::models::Artifact;
use tixproof_core::EngineError;

/// Read `path` into a pending artifact named after the file.
///
/// No validation happens here; the pool applies the artifact rules on add.
pub async fn load_pending(path: impl AsRef<Path>) -> Result<Artifact, EngineError> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            EngineError::InvalidArtifact(format!("{} has no file name", path.display()))
        })?
        .to_string();

    let data = tokio::fs::read(path).await?;
    tracing::debug!(name = %name, size = data.len(), "Loaded file for preview");

    let content_type = content_type_for(&name);
    Ok(Artifact::pending(name, content_type, data))
}

/// Guess a MIME type from the file extension.
pub fn content_type_for(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pkpass" => "application/vnd.apple.pkpass",
        _ => "application/octet-stream",
    }
}
