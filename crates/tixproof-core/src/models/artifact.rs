use std::fmt::{Display, Formatter, Result as FmtResult};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::EngineSettings;
use crate::error::EngineError;

/// Identity of an artifact: client-generated for pending items, server id for baseline items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ArtifactId {
    Local(Uuid),
    Server(String),
}

impl ArtifactId {
    pub fn new_local() -> Self {
        ArtifactId::Local(Uuid::new_v4())
    }

    /// Server id, if this artifact already exists on the backend
    pub fn server_id(&self) -> Option<&str> {
        match self {
            ArtifactId::Server(id) => Some(id.as_str()),
            ArtifactId::Local(_) => None,
        }
    }
}

impl Display for ArtifactId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ArtifactId::Local(id) => write!(f, "local:{}", id),
            ArtifactId::Server(id) => write!(f, "{}", id),
        }
    }
}

/// Where the artifact content lives. A pending artifact carries raw bytes and no
/// URL, an existing one carries a URL and no bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ArtifactSource {
    Pending {
        content_type: String,
        #[serde(skip)]
        data: Bytes,
    },
    Existing {
        url: String,
    },
}

/// A ticket proof: an uploaded file, a courier document or a QR code image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: ArtifactId,
    /// Display name (original filename for pending items)
    pub name: String,
    #[serde(flatten)]
    pub source: ArtifactSource,
}

impl Artifact {
    /// Create a pending artifact from raw bytes with a fresh client id.
    pub fn pending(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            id: ArtifactId::new_local(),
            name: name.into(),
            source: ArtifactSource::Pending {
                content_type: content_type.into(),
                data: data.into(),
            },
        }
    }

    /// Create an artifact already stored on the backend.
    pub fn existing(
        id: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: ArtifactId::Server(id.into()),
            name: name.into(),
            source: ArtifactSource::Existing { url: url.into() },
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.source, ArtifactSource::Pending { .. })
    }

    pub fn is_existing(&self) -> bool {
        matches!(self.source, ArtifactSource::Existing { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match &self.source {
            ArtifactSource::Existing { url } => Some(url.as_str()),
            ArtifactSource::Pending { .. } => None,
        }
    }

    pub fn data(&self) -> Option<&Bytes> {
        match &self.source {
            ArtifactSource::Pending { data, .. } => Some(data),
            ArtifactSource::Existing { .. } => None,
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        match &self.source {
            ArtifactSource::Pending { content_type, .. } => Some(content_type.as_str()),
            ArtifactSource::Existing { .. } => None,
        }
    }

    /// Lowercase file extension of the display name, without the dot
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// Intake rules deciding whether an artifact may enter a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactRules {
    pub max_file_size: usize,
    pub allowed_extensions: Vec<String>,
}

impl From<&EngineSettings> for ArtifactRules {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            max_file_size: settings.max_file_size_bytes,
            allowed_extensions: settings.allowed_extensions.clone(),
        }
    }
}

impl Default for ArtifactRules {
    fn default() -> Self {
        ArtifactRules::from(&EngineSettings::default())
    }
}

impl ArtifactRules {
    pub fn check(&self, artifact: &Artifact) -> Result<(), EngineError> {
        match &artifact.source {
            ArtifactSource::Existing { url } => {
                if url.trim().is_empty() {
                    return Err(EngineError::InvalidArtifact(format!(
                        "{} has no URL",
                        artifact.id
                    )));
                }
            }
            ArtifactSource::Pending { data, .. } => {
                if data.is_empty() {
                    return Err(EngineError::InvalidArtifact(format!(
                        "{} is empty",
                        artifact.name
                    )));
                }
                if data.len() > self.max_file_size {
                    return Err(EngineError::InvalidArtifact(format!(
                        "{} is {} bytes, limit is {}",
                        artifact.name,
                        data.len(),
                        self.max_file_size
                    )));
                }
                let allowed = artifact
                    .extension()
                    .map(|ext| self.allowed_extensions.iter().any(|a| *a == ext))
                    .unwrap_or(false);
                if !allowed {
                    return Err(EngineError::InvalidArtifact(format!(
                        "{} has an unsupported extension",
                        artifact.name
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn is_valid(&self, artifact: &Artifact) -> bool {
        self.check(artifact).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_and_existing_are_exclusive() {
        let pending = Artifact::pending("ticket.pdf", "application/pdf", b"%PDF".to_vec());
        assert!(pending.is_pending());
        assert!(pending.url().is_none());
        assert_eq!(pending.data().map(|d| d.len()), Some(4));

        let existing = Artifact::existing("55", "ticket.pdf", "https://cdn.example.com/55.pdf");
        assert!(existing.is_existing());
        assert!(existing.data().is_none());
        assert_eq!(existing.id.server_id(), Some("55"));
    }

    #[test]
    fn test_rules_reject_blank_and_oversized() {
        let rules = ArtifactRules {
            max_file_size: 4,
            allowed_extensions: vec!["pdf".to_string()],
        };
        assert!(rules.is_valid(&Artifact::pending("a.PDF", "application/pdf", b"1234".to_vec())));
        assert!(!rules.is_valid(&Artifact::pending("a.pdf", "application/pdf", Vec::new())));
        assert!(!rules.is_valid(&Artifact::pending("a.pdf", "application/pdf", b"12345".to_vec())));
        assert!(!rules.is_valid(&Artifact::pending(
            "a.exe",
            "application/octet-stream",
            b"1".to_vec()
        )));
        assert!(!rules.is_valid(&Artifact::existing("1", "a.pdf", "  ")));
    }

    #[test]
    fn test_artifact_id_display() {
        assert_eq!(ArtifactId::Server("42".to_string()).to_string(), "42");
        assert!(ArtifactId::new_local().to_string().starts_with("local:"));
    }
}
