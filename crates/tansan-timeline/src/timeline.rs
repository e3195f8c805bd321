//! Track list and geometry operations.

use serde::{Deserialize, Serialize};
use tracing::debug;

use tansan_models::{ArtifactId, Track, TrackId, TrackKind};

use crate::error::{TimelineError, TimelineResult};

/// Presentation tags used by the studio's own tracks.
pub mod colors {
    pub const VIDEO: &str = "bg-teal-500";
    pub const MUSIC: &str = "bg-orange-500";
    pub const VOICEOVER: &str = "bg-blue-500";
}

/// Ordered set of tracks, rendered top to bottom in insertion order.
///
/// No lane packing or collision avoidance is done. Tracks may overlap and may
/// run past 100%; callers that want tighter placement enforce it themselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    tracks: Vec<Track>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timeline seeded with the studio's background video and music lanes.
    pub fn with_background_tracks() -> Self {
        let mut timeline = Self::new();
        timeline.push(Track {
            id: TrackId::new(),
            kind: TrackKind::Video,
            name: "Background Video.mp4".to_string(),
            offset_pct: 0.0,
            duration_pct: 100.0,
            color: colors::VIDEO.to_string(),
            artifact_id: None,
            muted: false,
        });
        timeline.push(Track {
            id: TrackId::new(),
            kind: TrackKind::Music,
            name: "Background Music.mp3".to_string(),
            offset_pct: 0.0,
            duration_pct: 100.0,
            color: colors::MUSIC.to_string(),
            artifact_id: None,
            muted: false,
        });
        timeline
    }

    /// Append a track to the bottom of the timeline.
    pub fn add_track(
        &mut self,
        kind: TrackKind,
        name: impl Into<String>,
        offset_pct: f64,
        duration_pct: f64,
        color: impl Into<String>,
    ) -> TimelineResult<TrackId> {
        self.insert(None, kind, name.into(), offset_pct, duration_pct, color.into())
    }

    /// Append a track generated from an artifact.
    pub fn add_artifact_track(
        &mut self,
        artifact_id: ArtifactId,
        kind: TrackKind,
        name: impl Into<String>,
        offset_pct: f64,
        duration_pct: f64,
        color: impl Into<String>,
    ) -> TimelineResult<TrackId> {
        self.insert(Some(artifact_id), kind, name.into(), offset_pct, duration_pct, color.into())
    }

    /// Remove a track. Returns whether it existed.
    pub fn remove_track(&mut self, id: &TrackId) -> bool {
        let before = self.tracks.len();
        self.tracks.retain(|t| &t.id != id);
        before != self.tracks.len()
    }

    /// Set a track's offset, leaving its duration alone.
    ///
    /// Returns `Ok(false)` when the track does not exist.
    pub fn move_track(&mut self, id: &TrackId, new_offset_pct: f64) -> TimelineResult<bool> {
        let offset = TimelineError::check_offset(new_offset_pct)?;
        Ok(self.update(id, |t| t.offset_pct = offset))
    }

    /// Set a track's duration, leaving its offset alone.
    ///
    /// Returns `Ok(false)` when the track does not exist.
    pub fn resize_track(&mut self, id: &TrackId, new_duration_pct: f64) -> TimelineResult<bool> {
        let duration = TimelineError::check_duration(new_duration_pct)?;
        Ok(self.update(id, |t| t.duration_pct = duration))
    }

    /// Flip a track's mute flag. Returns the new state, or `None` if absent.
    pub fn toggle_mute(&mut self, id: &TrackId) -> Option<bool> {
        let track = self.tracks.iter_mut().find(|t| &t.id == id)?;
        track.muted = !track.muted;
        Some(track.muted)
    }

    /// Tracks in rendering order.
    pub fn list(&self) -> Vec<Track> {
        self.tracks.clone()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    /// Track generated from `artifact_id`, if any.
    pub fn track_for_artifact(&self, artifact_id: &ArtifactId) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|t| t.artifact_id.as_ref() == Some(artifact_id))
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Right-most edge across all tracks, in percent. Can exceed 100.
    pub fn extent_pct(&self) -> f64 {
        self.tracks.iter().map(Track::end_pct).fold(0.0, f64::max)
    }

    /// Tracks that run past the 100% mark. Reported, never clamped.
    pub fn overflowing(&self) -> Vec<&Track> {
        self.tracks.iter().filter(|t| t.overflows()).collect()
    }

    fn insert(
        &mut self,
        artifact_id: Option<ArtifactId>,
        kind: TrackKind,
        name: String,
        offset_pct: f64,
        duration_pct: f64,
        color: String,
    ) -> TimelineResult<TrackId> {
        let offset_pct = TimelineError::check_offset(offset_pct)?;
        let duration_pct = TimelineError::check_duration(duration_pct)?;

        let track = Track {
            id: TrackId::new(),
            kind,
            name,
            offset_pct,
            duration_pct,
            color,
            artifact_id,
            muted: false,
        };
        let id = track.id.clone();
        debug!(
            track_id = %id,
            kind = %kind,
            offset_pct,
            duration_pct,
            "Adding timeline track"
        );
        self.push(track);
        Ok(id)
    }

    fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    fn update(&mut self, id: &TrackId, apply: impl FnOnce(&mut Track)) -> bool {
        match self.tracks.iter_mut().find(|t| &t.id == id) {
            Some(track) => {
                apply(track);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_then_list() {
        let mut timeline = Timeline::new();
        let id = timeline
            .add_track(TrackKind::Audio, "Narration", 10.0, 25.0, colors::VOICEOVER)
            .unwrap();

        let tracks = timeline.list();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, id);
        assert_eq!(tracks[0].offset_pct, 10.0);
        assert_eq!(tracks[0].duration_pct, 25.0);
        assert!(tracks[0].artifact_id.is_none());
    }

    #[test]
    fn test_move_keeps_duration() {
        let mut timeline = Timeline::new();
        let id = timeline
            .add_track(TrackKind::Audio, "Narration", 10.0, 25.0, colors::VOICEOVER)
            .unwrap();

        assert!(timeline.move_track(&id, 50.0).unwrap());
        let track = timeline.get(&id).unwrap();
        assert_eq!(track.offset_pct, 50.0);
        assert_eq!(track.duration_pct, 25.0);
    }

    #[test]
    fn test_resize_keeps_offset() {
        let mut timeline = Timeline::new();
        let id = timeline
            .add_track(TrackKind::Music, "Bed", 5.0, 40.0, colors::MUSIC)
            .unwrap();

        assert!(timeline.resize_track(&id, 60.0).unwrap());
        let track = timeline.get(&id).unwrap();
        assert_eq!(track.offset_pct, 5.0);
        assert_eq!(track.duration_pct, 60.0);
    }

    #[test]
    fn test_geometry_bounds() {
        let mut timeline = Timeline::new();
        assert_eq!(
            timeline.add_track(TrackKind::Video, "bad", -1.0, 10.0, colors::VIDEO),
            Err(TimelineError::InvalidOffset(-1.0))
        );
        assert_eq!(
            timeline.add_track(TrackKind::Video, "bad", 0.0, 0.0, colors::VIDEO),
            Err(TimelineError::InvalidDuration(0.0))
        );
        assert!(timeline
            .add_track(TrackKind::Video, "bad", f64::NAN, 10.0, colors::VIDEO)
            .is_err());
        assert!(timeline.is_empty());

        let id = timeline
            .add_track(TrackKind::Video, "ok", 0.0, 10.0, colors::VIDEO)
            .unwrap();
        assert!(timeline.move_track(&id, -5.0).is_err());
        assert!(timeline.resize_track(&id, -5.0).is_err());
        assert_eq!(timeline.get(&id).unwrap().offset_pct, 0.0);
    }

    #[test]
    fn test_overflow_is_permitted_and_reported() {
        let mut timeline = Timeline::new();
        let id = timeline
            .add_track(TrackKind::Audio, "Long take", 80.0, 60.0, colors::VOICEOVER)
            .unwrap();

        assert_eq!(timeline.get(&id).unwrap().duration_pct, 60.0);
        assert_eq!(timeline.extent_pct(), 140.0);
        assert_eq!(timeline.overflowing().len(), 1);
    }

    #[test]
    fn test_overlap_is_permitted() {
        let mut timeline = Timeline::new();
        timeline.add_track(TrackKind::Audio, "A", 0.0, 50.0, colors::VOICEOVER).unwrap();
        timeline.add_track(TrackKind::Audio, "B", 25.0, 50.0, colors::VOICEOVER).unwrap();

        let names: Vec<_> = timeline.tracks().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_remove_and_missing_ids() {
        let mut timeline = Timeline::with_background_tracks();
        assert_eq!(timeline.len(), 2);

        let missing = TrackId::from_string("missing");
        assert!(!timeline.remove_track(&missing));
        assert_eq!(timeline.move_track(&missing, 10.0), Ok(false));
        assert_eq!(timeline.resize_track(&missing, 10.0), Ok(false));
        assert_eq!(timeline.toggle_mute(&missing), None);

        let first = timeline.tracks()[0].id.clone();
        assert!(timeline.remove_track(&first));
        assert!(!timeline.remove_track(&first));
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.tracks()[0].kind, TrackKind::Music);
    }

    #[test]
    fn test_artifact_track_lookup_and_mute() {
        let mut timeline = Timeline::new();
        let artifact_id = ArtifactId::new();
        let id = timeline
            .add_artifact_track(artifact_id.clone(), TrackKind::Audio, "Voiceover", 0.0, 20.0, colors::VOICEOVER)
            .unwrap();

        assert_eq!(timeline.track_for_artifact(&artifact_id).map(|t| &t.id), Some(&id));
        assert_eq!(timeline.toggle_mute(&id), Some(true));
        assert_eq!(timeline.toggle_mute(&id), Some(false));
    }

    #[test]
    fn test_serializes_track_list() {
        let timeline = Timeline::with_background_tracks();
        let json = serde_json::to_value(&timeline).unwrap();
        assert_eq!(json["tracks"][0]["kind"], "video");
        assert_eq!(json["tracks"][1]["duration_pct"], 100.0);
    }
}
