//! The zone player seam consumed by the bridge
//!
//! A `PlayerSource` is whatever tracks the selected zone's transport: it
//! answers state queries from its last known values and forwards commands
//! to the zone. The bridge never blocks on it beyond these calls.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// Transport state
// ============================================================================

/// UPnP AVTransport `TransportState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportState {
    Playing,
    PausedPlayback,
    Stopped,
    Transitioning,
    NoMediaPresent,
}

impl TransportState {
    /// Parse a wire value, treating anything unrecognized as `Stopped`
    pub fn from_upnp(value: &str) -> Self {
        value.parse().unwrap_or(TransportState::Stopped)
    }

    pub fn as_upnp(&self) -> &'static str {
        match self {
            TransportState::Playing => "PLAYING",
            TransportState::PausedPlayback => "PAUSED_PLAYBACK",
            TransportState::Stopped => "STOPPED",
            TransportState::Transitioning => "TRANSITIONING",
            TransportState::NoMediaPresent => "NO_MEDIA_PRESENT",
        }
    }

    pub fn is_playing(&self) -> bool {
        *self == TransportState::Playing
    }
}

impl FromStr for TransportState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLAYING" => Ok(TransportState::Playing),
            "PAUSED_PLAYBACK" => Ok(TransportState::PausedPlayback),
            "STOPPED" => Ok(TransportState::Stopped),
            "TRANSITIONING" => Ok(TransportState::Transitioning),
            "NO_MEDIA_PRESENT" => Ok(TransportState::NoMediaPresent),
            other => Err(format!("unknown transport state '{}'", other)),
        }
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_upnp())
    }
}

// ============================================================================
// Play mode
// ============================================================================

/// Sonos `CurrentPlayMode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayMode {
    Normal,
    RepeatAll,
    RepeatOne,
    /// Shuffle with repeat
    Shuffle,
    ShuffleNoRepeat,
    ShuffleRepeatOne,
}

impl PlayMode {
    /// Parse a wire value, treating anything unrecognized as `Normal`
    pub fn from_upnp(value: &str) -> Self {
        value.parse().unwrap_or(PlayMode::Normal)
    }

    pub fn as_upnp(&self) -> &'static str {
        match self {
            PlayMode::Normal => "NORMAL",
            PlayMode::RepeatAll => "REPEAT_ALL",
            PlayMode::RepeatOne => "REPEAT_ONE",
            PlayMode::Shuffle => "SHUFFLE",
            PlayMode::ShuffleNoRepeat => "SHUFFLE_NOREPEAT",
            PlayMode::ShuffleRepeatOne => "SHUFFLE_REPEAT_ONE",
        }
    }

    pub fn is_shuffle(&self) -> bool {
        matches!(self, PlayMode::Shuffle | PlayMode::ShuffleNoRepeat)
    }
}

impl FromStr for PlayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NORMAL" => Ok(PlayMode::Normal),
            "REPEAT_ALL" => Ok(PlayMode::RepeatAll),
            "REPEAT_ONE" => Ok(PlayMode::RepeatOne),
            "SHUFFLE" => Ok(PlayMode::Shuffle),
            "SHUFFLE_NOREPEAT" => Ok(PlayMode::ShuffleNoRepeat),
            "SHUFFLE_REPEAT_ONE" => Ok(PlayMode::ShuffleRepeatOne),
            other => Err(format!("unknown play mode '{}'", other)),
        }
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_upnp())
    }
}

// ============================================================================
// PlayerSource
// ============================================================================

/// State and commands of the selected zone player
///
/// Durations and positions are whole seconds. Volume is the group master
/// volume in `0..=100`.
pub trait PlayerSource: Send + Sync {
    fn connected(&self) -> bool;

    /// Short zone name; grouped zones are joined with `+`
    fn zone_short_name(&self) -> String;

    fn playback_state(&self) -> TransportState;
    fn play_mode(&self) -> PlayMode;

    /// Index of the current track in the queue
    fn current_index(&self) -> usize;
    fn current_track_duration(&self) -> u64;
    fn current_track_position(&self) -> u64;

    fn current_meta_title(&self) -> String;
    fn current_meta_album(&self) -> String;
    fn current_meta_artist(&self) -> String;
    fn current_meta_art(&self) -> String;

    fn volume_master(&self) -> u32;

    fn can_go_next(&self) -> bool;
    fn can_go_previous(&self) -> bool;
    fn can_seek(&self) -> bool;

    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    fn next(&self);
    fn previous(&self);
    fn toggle_repeat(&self);
    fn toggle_shuffle(&self);
    fn set_group_volume(&self, volume: u32);
    fn seek_time(&self, seconds: u64);
}
