use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, Context};
use log::info;
use serde::{Serialize, Deserialize};

use crate::event_bus::{EventBus, Event};
use crate::impl_event_emitter;

/// A file written for the user to keep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
    pub bytes: usize,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Writes downloadable question files into the output directory
pub struct ArtifactManager {
    artifact_dir: PathBuf,
    event_bus: Option<Arc<EventBus>>,
}

impl ArtifactManager {
    pub fn new(artifact_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&artifact_dir)
            .with_context(|| format!("Failed to create output directory: {}", artifact_dir.display()))?;

        Ok(Self {
            artifact_dir,
            event_bus: None,
        })
    }

    /// Save the raw question text as `<role>_interview_questions.txt`.
    pub async fn export_questions(&self, role: &str, raw_text: &str) -> Result<Artifact> {
        let name = file_name_for_role(role);
        let path = self.artifact_dir.join(&name);

        let mut file = fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        file.write_all(raw_text.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;

        let artifact = Artifact {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            path,
            bytes: raw_text.len(),
            created_at: chrono::Utc::now(),
        };
        info!("Saved questions to {}", artifact.path.display());

        if let Some(bus) = &self.event_bus {
            let _ = bus.emit(Event::ArtifactCreated {
                name: artifact.name.clone(),
                path: artifact.path.to_string_lossy().to_string(),
            }).await;
        }

        Ok(artifact)
    }
}

impl_event_emitter!(ArtifactManager);

/// Download file name for a role, with anything unsafe in a path replaced by `_`.
pub fn file_name_for_role(role: &str) -> String {
    let stem: String = role
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') { c } else { '_' })
        .collect();
    let stem = stem.trim_matches('.');
    let stem = if stem.is_empty() { "role" } else { stem };
    format!("{}_interview_questions.txt", stem)
}
