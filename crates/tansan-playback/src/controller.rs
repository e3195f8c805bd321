//! Transport state for a single artifact.

use std::time::Duration;

use serde::Serialize;

use crate::error::{PlaybackError, PlaybackResult};

/// Volume a freshly created player starts at.
pub const DEFAULT_VOLUME: f64 = 0.8;

/// Play/pause/seek/volume state for one artifact.
///
/// Controllers know nothing about each other; see
/// [`PlaybackCoordinator`](crate::PlaybackCoordinator) for cross-player policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackController {
    pub is_playing: bool,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub volume: f64,
    pub is_muted: bool,
}

impl PlaybackController {
    pub fn new() -> Self {
        Self::with_volume(DEFAULT_VOLUME)
    }

    /// Volume is clamped to `[0, 1]`; non-finite values use the default.
    pub fn with_volume(volume: f64) -> Self {
        let volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            DEFAULT_VOLUME
        };
        Self {
            is_playing: false,
            position_secs: 0.0,
            duration_secs: 0.0,
            volume,
            is_muted: false,
        }
    }

    /// Attach media metadata. Resets position and stops playback.
    pub fn load(&mut self, duration_secs: f64) -> PlaybackResult<()> {
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(PlaybackError::InvalidDuration(duration_secs));
        }
        self.duration_secs = duration_secs;
        self.position_secs = 0.0;
        self.is_playing = false;
        Ok(())
    }

    pub fn play(&mut self) {
        self.is_playing = true;
    }

    pub fn pause(&mut self) {
        self.is_playing = false;
    }

    /// Flip between playing and paused. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.is_playing = !self.is_playing;
        self.is_playing
    }

    /// Move the playhead, clamped to `[0, duration]`. Returns the new position.
    pub fn seek(&mut self, secs: f64) -> PlaybackResult<f64> {
        if !secs.is_finite() {
            return Err(PlaybackError::InvalidPosition(secs));
        }
        self.position_secs = secs.clamp(0.0, self.duration_secs);
        Ok(self.position_secs)
    }

    /// Set the volume, clamped to `[0, 1]`. A positive volume unmutes.
    pub fn set_volume(&mut self, volume: f64) -> PlaybackResult<f64> {
        if !volume.is_finite() {
            return Err(PlaybackError::InvalidVolume(volume));
        }
        self.volume = volume.clamp(0.0, 1.0);
        if self.volume > 0.0 {
            self.is_muted = false;
        }
        Ok(self.volume)
    }

    /// Returns the new mute state.
    pub fn toggle_mute(&mut self) -> bool {
        self.is_muted = !self.is_muted;
        self.is_muted
    }

    /// Volume actually heard.
    pub fn effective_volume(&self) -> f64 {
        if self.is_muted {
            0.0
        } else {
            self.volume
        }
    }

    /// Advance the playhead while playing.
    ///
    /// Returns true when this call reached the end of the media, which also
    /// stops playback.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if !self.is_playing {
            return false;
        }
        self.position_secs = (self.position_secs + elapsed.as_secs_f64()).min(self.duration_secs);
        if self.position_secs >= self.duration_secs {
            self.is_playing = false;
            return true;
        }
        false
    }

    /// `position / duration` in `[0, 1]`, or 0 before metadata is loaded.
    pub fn progress(&self) -> f64 {
        if self.duration_secs > 0.0 {
            self.position_secs / self.duration_secs
        } else {
            0.0
        }
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}

/// Format seconds as `m:ss`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return "0:00".to_string();
    }
    let whole = secs.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(duration: f64) -> PlaybackController {
        let mut player = PlaybackController::new();
        player.load(duration).unwrap();
        player
    }

    #[test]
    fn test_defaults() {
        let player = PlaybackController::new();
        assert!(!player.is_playing);
        assert_eq!(player.volume, DEFAULT_VOLUME);
        assert!(!player.is_muted);
        assert_eq!(player.progress(), 0.0);
    }

    #[test]
    fn test_seek_clamps_to_bounds() {
        let mut player = loaded(120.0);
        assert_eq!(player.seek(300.0).unwrap(), 120.0);
        assert_eq!(player.seek(-4.0).unwrap(), 0.0);
        assert_eq!(player.seek(42.5).unwrap(), 42.5);
        assert!(matches!(player.seek(f64::NAN), Err(PlaybackError::InvalidPosition(_))));
        assert_eq!(player.position_secs, 42.5);
    }

    #[test]
    fn test_seek_before_load_stays_at_zero() {
        let mut player = PlaybackController::new();
        assert_eq!(player.seek(10.0).unwrap(), 0.0);
    }

    #[test]
    fn test_volume_clamps_and_unmutes() {
        let mut player = loaded(60.0);
        assert!(player.toggle_mute());
        assert_eq!(player.effective_volume(), 0.0);

        assert_eq!(player.set_volume(1.7).unwrap(), 1.0);
        assert!(!player.is_muted);

        assert!(player.toggle_mute());
        assert_eq!(player.set_volume(0.0).unwrap(), 0.0);
        assert!(player.is_muted);

        assert!(player.set_volume(f64::INFINITY).is_err());
    }

    #[test]
    fn test_advance_stops_at_end() {
        let mut player = loaded(10.0);
        assert!(!player.advance(Duration::from_secs(3)));
        assert_eq!(player.position_secs, 0.0);

        player.play();
        assert!(!player.advance(Duration::from_secs(4)));
        assert_eq!(player.position_secs, 4.0);
        assert!(player.advance(Duration::from_secs(60)));
        assert_eq!(player.position_secs, 10.0);
        assert!(!player.is_playing);
    }

    #[test]
    fn test_load_resets_transport() {
        let mut player = loaded(30.0);
        player.play();
        player.seek(12.0).unwrap();
        player.load(90.0).unwrap();

        assert!(!player.is_playing);
        assert_eq!(player.position_secs, 0.0);
        assert!(player.load(-1.0).is_err());
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(7.9), "0:07");
        assert_eq!(format_time(125.0), "2:05");
    }
}
