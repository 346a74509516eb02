use serde::{Deserialize, Serialize};

/// Baseline entry as reported by the server when a session starts.
///
/// The slot may be omitted, in which case entries are laid out in order
/// into the lowest free slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineEntry {
    #[serde(default)]
    pub slot: Option<u32>,
    /// Server id of the attached artifact
    pub id: String,
    #[serde(default, alias = "originalUrl")]
    pub original_url: Option<String>,
    #[serde(default, alias = "ticketDetailId")]
    pub ticket_detail_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Normalized baseline record for one server-known slot. Immutable after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineAssignment {
    pub slot: u32,
    pub original_artifact_id: String,
    pub original_url: Option<String>,
    pub ticket_detail_id: Option<i64>,
    pub name: Option<String>,
}

impl BaselineAssignment {
    /// Whether the slot carried an actual artifact at session start.
    /// Blank URLs mark a ticket the server knows about but that has no proof yet.
    pub fn is_backed(&self) -> bool {
        self.original_url
            .as_deref()
            .map(|url| !url.trim().is_empty())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_accepts_camel_case_aliases() {
        let entry: BaselineEntry = serde_json::from_str(
            r#"{"id": "9", "originalUrl": "https://x/9.pdf", "ticketDetailId": 101}"#,
        )
        .unwrap();
        assert_eq!(entry.slot, None);
        assert_eq!(entry.ticket_detail_id, Some(101));
        assert_eq!(entry.original_url.as_deref(), Some("https://x/9.pdf"));
    }

    #[test]
    fn test_blank_url_is_not_backed() {
        let mut assignment = BaselineAssignment {
            slot: 1,
            original_artifact_id: "9".to_string(),
            original_url: Some(" ".to_string()),
            ticket_detail_id: Some(101),
            name: None,
        };
        assert!(!assignment.is_backed());
        assignment.original_url = Some("https://x/9.pdf".to_string());
        assert!(assignment.is_backed());
    }
}
