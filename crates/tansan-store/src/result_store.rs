//! Ordered artifact history for one session.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use tansan_models::{Artifact, ArtifactId, NewArtifact};

/// Most-recent-first collection of completed artifacts.
///
/// Order is insertion order and is never re-sorted. Every append gets an id
/// that has not been used before in this store, even if the draft's contents
/// collide with an existing entry.
#[derive(Debug, Default)]
pub struct ResultStore {
    entries: VecDeque<Artifact>,
    /// Every id ever issued, including deleted ones. Never pruned: it lives
    /// as long as the session so a deleted id is never handed out again.
    issued: HashSet<ArtifactId>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the head of the history and return the stored artifact.
    pub fn append(&mut self, draft: NewArtifact) -> Artifact {
        let id = self.fresh_id();
        let artifact = Artifact::from_draft(id, draft);
        debug!(
            artifact_id = %artifact.id,
            job_id = %artifact.source_job_id,
            "Appending artifact to history"
        );
        self.entries.push_front(artifact.clone());
        artifact
    }

    /// Remove the artifact with `id`.
    ///
    /// Returns whether anything was removed; absence is not an error.
    pub fn delete(&mut self, id: &ArtifactId) -> bool {
        match self.entries.iter().position(|a| &a.id == id) {
            Some(index) => {
                self.entries.remove(index);
                debug!(artifact_id = %id, "Deleted artifact from history");
                true
            }
            None => false,
        }
    }

    /// Empty the history. Returns how many artifacts were removed.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    /// Current history, most recent first.
    pub fn list(&self) -> Vec<Artifact> {
        self.entries.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.entries.iter()
    }

    pub fn get(&self, id: &ArtifactId) -> Option<&Artifact> {
        self.entries.iter().find(|a| &a.id == id)
    }

    pub fn contains(&self, id: &ArtifactId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn fresh_id(&mut self) -> ArtifactId {
        loop {
            let id = ArtifactId::new();
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }
}
