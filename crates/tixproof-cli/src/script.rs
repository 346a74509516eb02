//! Session scripts: a baseline plus a list of user actions replayed through a flow.
//!
//! ```json
//! {
//!   "flow": "files",
//!   "container_id": 42,
//!   "max_quantity": 2,
//!   "baseline": [
//!     { "slot": 1, "id": "orig-1", "originalUrl": "https://...", "ticketDetailId": 101 }
//!   ],
//!   "actions": [
//!     { "op": "delete", "slot": 1 },
//!     { "op": "add_file", "path": "ticket-1.pdf" },
//!     { "op": "transfer", "file": "ticket-1.pdf", "slot": 1 }
//!   ]
//! }
//! ```
//!
//! File paths are resolved against the script's directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tixproof_core::models::{
    Artifact, ArtifactId, BaselineEntry, CompletionStatus, CourierDetails, CourierField,
    DiffPayload, FlowKind, LinkField, QrLinkBaseline, SessionContext, SubmitOutcome,
};
use tixproof_core::{EngineError, EngineSettings, ErrorMetadata, SubmissionEndpoint};
use tixproof_engine::preview::load_pending;
use tixproof_engine::{CourierFlow, FileFlow, FlowState, QrFlow, SlotDiffEngine};

#[derive(Debug, Clone, Deserialize)]
pub struct SessionScript {
    pub flow: FlowKind,
    pub container_id: i64,
    pub max_quantity: u32,
    /// File-slot baseline
    #[serde(default)]
    pub baseline: Vec<BaselineEntry>,
    #[serde(default)]
    pub qr_baseline: Vec<QrLinkBaseline>,
    #[serde(default)]
    pub courier: CourierDetails,
    /// Files already attached to the courier record
    #[serde(default)]
    pub courier_files: Vec<BaselineEntry>,
    #[serde(default)]
    pub actions: Vec<ScriptAction>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptAction {
    AddFile {
        path: PathBuf,
    },
    RemovePending {
        file: String,
    },
    Transfer {
        file: String,
        #[serde(default)]
        slot: Option<u32>,
    },
    Delete {
        slot: u32,
    },
    SetLink {
        slot: u32,
        field: LinkField,
        value: String,
    },
    RevertLinks {
        #[serde(default)]
        slot: Option<u32>,
    },
    Update {
        field: CourierField,
        value: String,
    },
    AttachFile {
        path: PathBuf,
    },
    DetachFile {
        file: String,
    },
    Reset,
}

impl ScriptAction {
    fn name(&self) -> &'static str {
        match self {
            ScriptAction::AddFile { .. } => "add_file",
            ScriptAction::RemovePending { .. } => "remove_pending",
            ScriptAction::Transfer { .. } => "transfer",
            ScriptAction::Delete { .. } => "delete",
            ScriptAction::SetLink { .. } => "set_link",
            ScriptAction::RevertLinks { .. } => "revert_links",
            ScriptAction::Update { .. } => "update",
            ScriptAction::AttachFile { .. } => "attach_file",
            ScriptAction::DetachFile { .. } => "detach_file",
            ScriptAction::Reset => "reset",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub flow: FlowKind,
    pub completion: CompletionStatus,
    pub valid: bool,
    pub payload: DiffPayload,
    /// User-facing messages raised while replaying (e.g. slot limit reached)
    pub notices: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<SubmitOutcome>,
}

impl SessionScript {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Invalid script: {}", path.display()))
    }

    fn context(&self) -> SessionContext {
        SessionContext {
            container_id: self.container_id,
            max_quantity: self.max_quantity,
        }
    }
}

struct Replayer<'a> {
    base_dir: &'a Path,
    endpoint: &'a dyn SubmissionEndpoint,
    /// File name to artifact id, for actions that refer to files
    files: HashMap<String, ArtifactId>,
    notices: Vec<String>,
}

impl<'a> Replayer<'a> {
    async fn load(&self, path: &Path) -> Result<Artifact> {
        let full = self.base_dir.join(path);
        load_pending(&full)
            .await
            .with_context(|| format!("Failed to load {}", full.display()))
    }

    fn file_id(&self, file: &str) -> Result<ArtifactId> {
        self.files
            .get(file)
            .cloned()
            .with_context(|| format!("Unknown file: {}", file))
    }

    /// User-visible errors become notices; anything else aborts the replay.
    fn tolerate<T>(&mut self, result: Result<T, EngineError>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_user_visible() => {
                self.notices.push(e.client_message());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn remember(&mut self, name: String, id: Option<ArtifactId>) {
        match id {
            Some(id) => {
                self.files.insert(name, id);
            }
            None => self.notices.push(format!("{} was not accepted", name)),
        }
    }

    async fn apply_files(&mut self, flow: &mut FileFlow, action: &ScriptAction) -> Result<()> {
        match action {
            ScriptAction::AddFile { path } => {
                let artifact = self.load(path).await?;
                let name = artifact.name.clone();
                let id = flow.add_pending(artifact);
                self.remember(name, id);
            }
            ScriptAction::RemovePending { file } => {
                let id = self.file_id(file)?;
                flow.remove_pending(&id);
            }
            ScriptAction::Transfer { file, slot } => {
                let id = self.file_id(file)?;
                self.tolerate(flow.transfer(&id, *slot))?;
            }
            ScriptAction::Delete { slot } => {
                flow.delete_slot(*slot, self.endpoint).await?;
            }
            ScriptAction::Reset => flow.reset(),
            other => unsupported(FlowKind::Files, other)?,
        }
        Ok(())
    }

    fn apply_qr(&mut self, flow: &mut QrFlow, action: &ScriptAction) -> Result<()> {
        match action {
            ScriptAction::SetLink { slot, field, value } => {
                flow.set_link(*slot, *field, value.clone())?;
            }
            ScriptAction::RevertLinks { slot } => flow.revert(*slot),
            ScriptAction::Reset => flow.reset(),
            other => unsupported(FlowKind::QrLinks, other)?,
        }
        Ok(())
    }

    async fn apply_courier(&mut self, flow: &mut CourierFlow, action: &ScriptAction) -> Result<()> {
        match action {
            ScriptAction::Update { field, value } => flow.update(*field, value.clone()),
            ScriptAction::AttachFile { path } => {
                let artifact = self.load(path).await?;
                let name = artifact.name.clone();
                let id = flow.attach_file(artifact);
                self.remember(name, id);
            }
            ScriptAction::DetachFile { file } => {
                let id = self
                    .file_id(file)
                    .unwrap_or_else(|_| ArtifactId::Server(file.clone()));
                flow.detach_file(&id);
            }
            ScriptAction::Reset => flow.reset(),
            other => unsupported(FlowKind::Courier, other)?,
        }
        Ok(())
    }

    async fn finish<S: FlowState>(
        self,
        mut flow: SlotDiffEngine<S>,
        submit: bool,
    ) -> Result<ReplayReport> {
        let mut report = ReplayReport {
            flow: flow.kind(),
            completion: flow.completion_status(),
            valid: flow.is_valid(),
            payload: flow.build(),
            notices: self.notices,
            outcome: None,
        };

        if submit {
            report.outcome = Some(
                flow.submit(self.endpoint)
                    .await
                    .context("Submission failed")?,
            );
        }

        Ok(report)
    }
}

fn unsupported(flow: FlowKind, action: &ScriptAction) -> Result<()> {
    Err(anyhow::anyhow!(
        "Action {} is not available in the {} flow",
        action.name(),
        flow
    ))
}

/// Replay `script` and report the resulting diff. With `submit`, the diff is
/// then sent through `endpoint`; slot deletes always go through it.
pub async fn replay(
    script: &SessionScript,
    base_dir: &Path,
    settings: EngineSettings,
    endpoint: &dyn SubmissionEndpoint,
    submit: bool,
) -> Result<ReplayReport> {
    let mut replayer = Replayer {
        base_dir,
        endpoint,
        files: HashMap::new(),
        notices: Vec::new(),
    };

    tracing::info!(
        flow = %script.flow,
        container_id = script.container_id,
        actions = script.actions.len(),
        "Replaying session"
    );

    match script.flow {
        FlowKind::Files => {
            let mut flow = FileFlow::files(script.context(), settings, script.baseline.clone());
            for action in &script.actions {
                replayer.apply_files(&mut flow, action).await?;
            }
            replayer.finish(flow, submit).await
        }
        FlowKind::QrLinks => {
            let mut flow = QrFlow::qr_links(script.context(), settings, script.qr_baseline.clone());
            for action in &script.actions {
                replayer.apply_qr(&mut flow, action)?;
            }
            replayer.finish(flow, submit).await
        }
        FlowKind::Courier => {
            let files = script
                .courier_files
                .iter()
                .map(|f| {
                    Artifact::existing(
                        f.id.clone(),
                        f.name.clone().unwrap_or_else(|| f.id.clone()),
                        f.original_url.clone().unwrap_or_default(),
                    )
                })
                .collect();
            let mut flow =
                CourierFlow::courier(script.context(), settings, script.courier.clone(), files);
            for action in &script.actions {
                replayer.apply_courier(&mut flow, action).await?;
            }
            replayer.finish(flow, submit).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tixproof_core::NoOpSubmissionEndpoint;

    fn script(json: serde_json::Value) -> SessionScript {
        serde_json::from_value(json).unwrap()
    }

    #[tokio::test]
    async fn replays_file_flow_into_reuploaded_payload() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("t1.pdf"), b"%PDF-1.4").unwrap();

        let script = script(serde_json::json!({
            "flow": "files",
            "container_id": 42,
            "max_quantity": 2,
            "baseline": [
                {
                    "slot": 1,
                    "id": "orig-1",
                    "originalUrl": "https://cdn.example.com/1.pdf",
                    "ticketDetailId": 101
                }
            ],
            "actions": [
                { "op": "delete", "slot": 1 },
                { "op": "add_file", "path": "t1.pdf" },
                { "op": "transfer", "file": "t1.pdf", "slot": 1 }
            ]
        }));

        let report = replay(
            &script,
            dir.path(),
            EngineSettings::default(),
            &NoOpSubmissionEndpoint,
            false,
        )
        .await
        .unwrap();

        let DiffPayload::Files(files) = report.payload else {
            panic!("expected a files payload");
        };
        assert_eq!(files.uploads.len(), 1);
        assert_eq!(files.uploads[0].ticket_id, Some(101));
        assert_eq!(files.uploads[0].original_id.as_deref(), Some("orig-1"));
        assert_eq!(report.completion, CompletionStatus::new(1, 2));
        assert!(report.outcome.is_none());
    }

    #[tokio::test]
    async fn capacity_limit_becomes_a_notice() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"%PDF").unwrap();
        std::fs::write(dir.path().join("b.pdf"), b"%PDF").unwrap();

        let script = script(serde_json::json!({
            "flow": "files",
            "container_id": 1,
            "max_quantity": 1,
            "actions": [
                { "op": "add_file", "path": "a.pdf" },
                { "op": "add_file", "path": "b.pdf" },
                { "op": "transfer", "file": "a.pdf" },
                { "op": "transfer", "file": "b.pdf" }
            ]
        }));

        let report = replay(
            &script,
            dir.path(),
            EngineSettings::default(),
            &NoOpSubmissionEndpoint,
            true,
        )
        .await
        .unwrap();

        assert_eq!(report.notices.len(), 1);
        assert_eq!(report.outcome, Some(SubmitOutcome::Submitted));
    }

    #[tokio::test]
    async fn unchanged_qr_session_has_nothing_to_submit() {
        let script = script(serde_json::json!({
            "flow": "qr_links",
            "container_id": 1,
            "max_quantity": 1,
            "qr_baseline": [{ "slot": 1, "ticketId": "t1", "android": "a", "ios": "i" }],
            "actions": [
                { "op": "set_link", "slot": 1, "field": "android", "value": "b" },
                { "op": "set_link", "slot": 1, "field": "android", "value": "a" }
            ]
        }));

        let report = replay(
            &script,
            Path::new("."),
            EngineSettings::default(),
            &NoOpSubmissionEndpoint,
            true,
        )
        .await
        .unwrap();

        assert_eq!(report.outcome, Some(SubmitOutcome::NothingToSubmit));
        assert!(report.valid);
    }

    #[tokio::test]
    async fn action_from_another_flow_is_rejected() {
        let script = script(serde_json::json!({
            "flow": "courier",
            "container_id": 1,
            "max_quantity": 1,
            "actions": [{ "op": "delete", "slot": 1 }]
        }));

        let result = replay(
            &script,
            Path::new("."),
            EngineSettings::default(),
            &NoOpSubmissionEndpoint,
            false,
        )
        .await;
        assert!(result.is_err());
    }
}
