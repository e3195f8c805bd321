//! Cross-player playback policy.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tansan_models::ArtifactId;

use crate::controller::PlaybackController;
use crate::error::PlaybackResult;

/// Whether more than one artifact may play at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPolicy {
    /// Every player is independent; several may report playing
    #[default]
    Concurrent,
    /// Starting one player pauses all others
    Exclusive,
}

/// Owns one controller per artifact and applies the playback policy.
#[derive(Debug, Default)]
pub struct PlaybackCoordinator {
    policy: PlaybackPolicy,
    default_volume: f64,
    players: HashMap<ArtifactId, PlaybackController>,
}

impl PlaybackCoordinator {
    pub fn new(policy: PlaybackPolicy, default_volume: f64) -> Self {
        Self {
            policy,
            default_volume,
            players: HashMap::new(),
        }
    }

    pub fn policy(&self) -> PlaybackPolicy {
        self.policy
    }

    /// Changing the policy does not touch players that are already playing.
    pub fn set_policy(&mut self, policy: PlaybackPolicy) {
        self.policy = policy;
    }

    /// Register a player for `id` loaded with `duration_secs`.
    ///
    /// An existing player is returned as is, keeping its transport state.
    pub fn open(&mut self, id: &ArtifactId, duration_secs: f64) -> PlaybackResult<&mut PlaybackController> {
        match self.players.entry(id.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let mut player = PlaybackController::with_volume(self.default_volume);
                player.load(duration_secs)?;
                debug!(artifact_id = %id, duration_secs, "Opened player");
                Ok(entry.insert(player))
            }
        }
    }

    pub fn controller(&mut self, id: &ArtifactId) -> Option<&mut PlaybackController> {
        self.players.get_mut(id)
    }

    pub fn get(&self, id: &ArtifactId) -> Option<&PlaybackController> {
        self.players.get(id)
    }

    /// Start `id`. Returns the artifacts paused to honor the policy, or
    /// `None` if `id` has no player.
    pub fn play(&mut self, id: &ArtifactId) -> Option<Vec<ArtifactId>> {
        if !self.players.contains_key(id) {
            return None;
        }
        let mut paused = Vec::new();
        if self.policy == PlaybackPolicy::Exclusive {
            for (other_id, player) in self.players.iter_mut() {
                if other_id != id && player.is_playing {
                    player.pause();
                    paused.push(other_id.clone());
                }
            }
        }
        if !paused.is_empty() {
            debug!(artifact_id = %id, paused = paused.len(), "Paused other players");
        }
        self.players.get_mut(id)?.play();
        Some(paused)
    }

    /// Pause `id`. Returns false if it has no player.
    pub fn pause(&mut self, id: &ArtifactId) -> bool {
        match self.players.get_mut(id) {
            Some(player) => {
                player.pause();
                true
            }
            None => false,
        }
    }

    /// Artifacts currently playing.
    pub fn playing(&self) -> Vec<ArtifactId> {
        self.players
            .iter()
            .filter(|(_, player)| player.is_playing)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Drop the player for `id`. Returns whether one existed.
    pub fn remove(&mut self, id: &ArtifactId) -> bool {
        self.players.remove(id).is_some()
    }

    pub fn clear(&mut self) {
        self.players.clear();
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
