//! Static catalog: the three JSON collections loaded once at startup and
//! shared read-only behind an `Arc`. Nothing in the request path mutates it.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::models::domain::{EducationItem, JobItem, PolicyItem};
use crate::models::program::ProgramItem;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub jobs: Vec<JobItem>,
    pub policies: Vec<PolicyItem>,
    pub educations: Vec<EducationItem>,
}

impl Catalog {
    pub fn load(data_dir: &Path) -> Result<Self> {
        Ok(Catalog {
            jobs: load_json(&data_dir.join("jobs.json"))?,
            policies: load_json(&data_dir.join("policies.json"))?,
            educations: load_json(&data_dir.join("educations.json"))?,
        })
    }

    /// Every catalog entry normalized to the program shape, jobs first.
    pub fn to_programs(&self) -> Vec<ProgramItem> {
        self.jobs
            .iter()
            .map(ProgramItem::from)
            .chain(self.policies.iter().map(ProgramItem::from))
            .chain(self.educations.iter().map(ProgramItem::from))
            .collect()
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse catalog file {}", path.display()))
}
