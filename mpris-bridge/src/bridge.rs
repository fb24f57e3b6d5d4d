//! MPRIS2 `MediaPlayer2` and `MediaPlayer2.Player` on top of a zone player
//!
//! The bridge owns one bus name per connected zone. Player change hooks
//! (`playback_state_changed`, `volume_changed`, ...) are called by the
//! owner whenever the underlying player reports a change; each one sends
//! the matching group of properties as a `PropertiesChanged` signal.
//!
//! ```text
//! PlayerSource ──change hooks──▶ MprisBridge ──PropertiesChanged──▶ SessionBus
//!      ▲                             │
//!      └──────── commands ───────────┘  (Play, Next, SetVolume, ...)
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use list_sync::normalize::normalized_string;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::bus::SessionBus;
use crate::config::BridgeConfig;
use crate::desktop;
use crate::error::{BridgeError, Result};
use crate::player::{PlayMode, PlayerSource, TransportState};
use crate::value::{MprisValue, PropertyMap};

pub const MPRIS_OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
pub const MEDIA_PLAYER_SERVICE: &str = "org.mpris.MediaPlayer2";
pub const ROOT_INTERFACE: &str = "org.mpris.MediaPlayer2";
pub const PLAYER_INTERFACE: &str = "org.mpris.MediaPlayer2.Player";

const SUPPORTED_URI_SCHEMES: [&str; 2] = ["file", "http"];

const SUPPORTED_MIME_TYPES: [&str; 8] = [
    "audio/aac",
    "audio/mp3",
    "audio/flac",
    "audio/ogg",
    "application/ogg",
    "audio/x-mp3",
    "audio/x-flac",
    "application/x-ogg",
];

const MICROS_PER_SECOND: i64 = 1_000_000;

// ============================================================================
// Status strings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Playing,
    Paused,
    Stopped,
}

impl PlaybackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackStatus::Playing => "Playing",
            PlaybackStatus::Paused => "Paused",
            PlaybackStatus::Stopped => "Stopped",
        }
    }
}

impl From<TransportState> for PlaybackStatus {
    fn from(state: TransportState) -> Self {
        match state {
            TransportState::Playing => PlaybackStatus::Playing,
            TransportState::PausedPlayback => PlaybackStatus::Paused,
            _ => PlaybackStatus::Stopped,
        }
    }
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStatus {
    None,
    Track,
    Playlist,
}

impl LoopStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoopStatus::None => "None",
            LoopStatus::Track => "Track",
            LoopStatus::Playlist => "Playlist",
        }
    }
}

impl From<PlayMode> for LoopStatus {
    fn from(mode: PlayMode) -> Self {
        match mode {
            PlayMode::Shuffle | PlayMode::RepeatAll => LoopStatus::Playlist,
            PlayMode::RepeatOne => LoopStatus::Track,
            _ => LoopStatus::None,
        }
    }
}

impl FromStr for LoopStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "None" => Ok(LoopStatus::None),
            "Track" => Ok(LoopStatus::Track),
            "Playlist" => Ok(LoopStatus::Playlist),
            other => Err(format!("unknown loop status '{}'", other)),
        }
    }
}

impl fmt::Display for LoopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Service naming
// ============================================================================

/// Bus-safe identifier for a zone
///
/// Uses the first zone of a `+`-joined group, normalized, with every
/// character outside `[A-Za-z0-9]` replaced by `_`. A leading digit gets a
/// `_` prefix so the result is a valid bus name element.
pub fn zone_id(zone_short_name: &str) -> String {
    let first = zone_short_name.split('+').next().unwrap_or_default();
    let mut id: String = normalized_string(first)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if id.starts_with(|c: char| c.is_ascii_digit()) {
        id.insert(0, '_');
    }
    id
}

/// Names derived for one zone registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceNames {
    pub zone_id: String,
    /// `<DisplayName>.<zone>`
    pub identity: String,
    /// `org.mpris.MediaPlayer2.<DisplayName>.<zone>`
    pub service_name: String,
    /// `/<application/name>/<zone>`, prefix of track ids
    pub service_path: String,
}

impl ServiceNames {
    pub fn for_zone(config: &BridgeConfig, zone_short_name: &str) -> Self {
        let zone_id = zone_id(zone_short_name);
        Self {
            identity: format!("{}.{}", config.display_name, zone_id),
            service_name: format!("{}.{}.{}", MEDIA_PLAYER_SERVICE, config.display_name, zone_id),
            service_path: format!("/{}/{}", config.application_name.replace('.', "/"), zone_id),
            zone_id,
        }
    }

    pub fn track_id(&self, index: usize) -> String {
        format!("{}/track/{}", self.service_path, index)
    }
}

// ============================================================================
// MprisBridge
// ============================================================================

#[derive(Debug, Default)]
struct BridgeState {
    names: Option<ServiceNames>,
    registered: bool,
    metadata: PropertyMap,
}

/// MPRIS2 endpoint for one zone player
pub struct MprisBridge {
    player: Arc<dyn PlayerSource>,
    bus: Arc<dyn SessionBus>,
    config: BridgeConfig,
    state: Mutex<BridgeState>,
}

impl MprisBridge {
    /// Create the bridge and register it if the player is connected
    ///
    /// A bus that refuses the name is logged and leaves the bridge
    /// unregistered; only an invalid configuration is an error.
    pub fn new(
        player: Arc<dyn PlayerSource>,
        bus: Arc<dyn SessionBus>,
        config: BridgeConfig,
    ) -> Result<Self> {
        config.validate()?;
        let bridge = Self {
            player,
            bus,
            config,
            state: Mutex::new(BridgeState::default()),
        };
        if let Err(e) = bridge.init_service() {
            warn!(error = %e, "MPRIS service not registered");
        }
        Ok(bridge)
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn is_registered(&self) -> bool {
        self.state.lock().registered
    }

    /// Names of the current (or last) registration
    pub fn service_names(&self) -> Option<ServiceNames> {
        self.state.lock().names.clone()
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Drop any registration and register again for the player's zone
    ///
    /// Returns `Ok(false)` when the player is disconnected.
    pub fn init_service(&self) -> Result<bool> {
        self.unregister();

        if !self.player.connected() {
            debug!("Player disconnected, MPRIS service withdrawn");
            return Ok(false);
        }

        let names = ServiceNames::for_zone(&self.config, &self.player.zone_short_name());
        self.state.lock().names = Some(names.clone());

        self.bus
            .register_service(&names.service_name)
            .map_err(|source| BridgeError::ServiceRegistration {
                service: names.service_name.clone(),
                source,
            })?;

        if let Err(source) = self.bus.register_object(MPRIS_OBJECT_PATH) {
            self.bus.unregister_service(&names.service_name);
            return Err(BridgeError::ObjectRegistration {
                path: MPRIS_OBJECT_PATH.to_string(),
                source,
            });
        }

        {
            let mut state = self.state.lock();
            state.registered = true;
            state.metadata = PropertyMap::new();
        }

        self.current_track_changed();
        self.playback_state_changed();
        self.play_mode_changed();
        self.volume_changed();

        info!(service = %names.service_name, "Registered on the session bus");
        Ok(true)
    }

    fn unregister(&self) {
        let released = {
            let mut state = self.state.lock();
            if !state.registered {
                return;
            }
            state.registered = false;
            state.names.as_ref().map(|names| names.service_name.clone())
        };
        if let Some(service) = released {
            self.bus.unregister_service(&service);
            debug!(service = %service, "Unregistered from the session bus");
        }
    }

    // ------------------------------------------------------------------
    // Change hooks
    // ------------------------------------------------------------------

    pub fn connection_changed(&self) {
        if let Err(e) = self.init_service() {
            warn!(error = %e, "MPRIS service not registered");
        }
    }

    pub fn playback_state_changed(&self) {
        let mut changed = PropertyMap::new();
        changed.insert("CanPlay".into(), self.can_play().into());
        changed.insert("CanPause".into(), self.can_pause().into());
        changed.insert("PlaybackStatus".into(), self.playback_status().as_str().into());
        if self.player.playback_state().is_playing() {
            changed.insert("CanSeek".into(), self.can_seek().into());
        }
        self.emit_player(changed);
    }

    pub fn volume_changed(&self) {
        let mut changed = PropertyMap::new();
        changed.insert("Volume".into(), self.volume().into());
        self.emit_player(changed);
    }

    pub fn play_mode_changed(&self) {
        let mut changed = PropertyMap::new();
        changed.insert("Shuffle".into(), self.shuffle().into());
        changed.insert("LoopStatus".into(), self.loop_status().as_str().into());
        changed.insert("CanGoNext".into(), self.can_go_next().into());
        changed.insert("CanGoPrevious".into(), self.can_go_previous().into());
        self.emit_player(changed);
    }

    /// Rebuild the track metadata and announce it with the capabilities
    pub fn current_track_changed(&self) {
        let metadata = self.build_metadata();
        self.state.lock().metadata = metadata.clone();

        let mut changed = PropertyMap::new();
        changed.insert("CanPlay".into(), self.can_play().into());
        changed.insert("CanPause".into(), self.can_pause().into());
        changed.insert("CanGoNext".into(), self.can_go_next().into());
        changed.insert("CanGoPrevious".into(), self.can_go_previous().into());
        changed.insert("CanSeek".into(), self.can_seek().into());
        changed.insert("Metadata".into(), metadata.into());
        self.emit_player(changed);
    }

    fn emit_player(&self, changed: PropertyMap) {
        if !self.is_registered() {
            return;
        }
        self.bus
            .emit_properties_changed(MPRIS_OBJECT_PATH, PLAYER_INTERFACE, changed);
    }

    fn build_metadata(&self) -> PropertyMap {
        let mut metadata = PropertyMap::new();
        if let Some(track_id) = self.current_track_id() {
            metadata.insert("mpris:trackid".into(), MprisValue::ObjectPath(track_id));
        }
        let length = MICROS_PER_SECOND.saturating_mul(self.player.current_track_duration() as i64);
        metadata.insert("mpris:length".into(), length.into());

        let mut text = |key: &str, value: String| {
            if !value.is_empty() {
                metadata.insert(key.into(), value.into());
            }
        };
        text("mpris:artUrl", self.player.current_meta_art());
        text("xesam:title", self.player.current_meta_title());
        text("xesam:album", self.player.current_meta_album());

        let artist = self.player.current_meta_artist();
        if !artist.is_empty() {
            metadata.insert("xesam:artist".into(), MprisValue::StrList(vec![artist]));
        }
        metadata
    }

    fn current_track_id(&self) -> Option<String> {
        let index = self.player.current_index();
        self.state.lock().names.as_ref().map(|names| names.track_id(index))
    }

    // ------------------------------------------------------------------
    // org.mpris.MediaPlayer2
    // ------------------------------------------------------------------

    pub fn identity(&self) -> String {
        self.state
            .lock()
            .names
            .as_ref()
            .map(|names| names.identity.clone())
            .unwrap_or_default()
    }

    pub fn desktop_entry(&self) -> String {
        self.config.application_name.to_lowercase()
    }

    pub fn desktop_entry_absolute_path(&self) -> Option<PathBuf> {
        desktop::locate_desktop_entry(&self.desktop_entry())
    }

    pub fn supported_uri_schemes(&self) -> &'static [&'static str] {
        &SUPPORTED_URI_SCHEMES
    }

    pub fn supported_mime_types(&self) -> &'static [&'static str] {
        &SUPPORTED_MIME_TYPES
    }

    pub fn can_quit(&self) -> bool {
        false
    }

    pub fn can_raise(&self) -> bool {
        false
    }

    pub fn has_track_list(&self) -> bool {
        false
    }

    pub fn raise(&self) {}

    pub fn quit(&self) {}

    /// Every root property, for `Properties.GetAll`
    pub fn root_properties(&self) -> PropertyMap {
        let list = |items: &[&str]| MprisValue::StrList(items.iter().map(|s| s.to_string()).collect());
        let mut props = PropertyMap::new();
        props.insert("Identity".into(), self.identity().into());
        props.insert("DesktopEntry".into(), self.desktop_entry().into());
        props.insert("SupportedUriSchemes".into(), list(self.supported_uri_schemes()));
        props.insert("SupportedMimeTypes".into(), list(self.supported_mime_types()));
        props.insert("CanQuit".into(), self.can_quit().into());
        props.insert("CanRaise".into(), self.can_raise().into());
        props.insert("HasTrackList".into(), self.has_track_list().into());
        props
    }

    // ------------------------------------------------------------------
    // org.mpris.MediaPlayer2.Player properties
    // ------------------------------------------------------------------

    pub fn playback_status(&self) -> PlaybackStatus {
        self.player.playback_state().into()
    }

    pub fn loop_status(&self) -> LoopStatus {
        self.player.play_mode().into()
    }

    /// Toggle repeat when it moves the player toward `value`
    ///
    /// `Track` cannot be reached by toggling and is ignored.
    pub fn set_loop_status(&self, value: LoopStatus) {
        let mode = self.player.play_mode();
        let toggle = match value {
            LoopStatus::None => matches!(
                mode,
                PlayMode::RepeatAll | PlayMode::Shuffle | PlayMode::RepeatOne
            ),
            LoopStatus::Playlist => matches!(mode, PlayMode::Normal | PlayMode::ShuffleNoRepeat),
            LoopStatus::Track => false,
        };
        if toggle {
            self.player.toggle_repeat();
        }
    }

    pub fn rate(&self) -> f64 {
        1.0
    }

    pub fn minimum_rate(&self) -> f64 {
        1.0
    }

    pub fn maximum_rate(&self) -> f64 {
        1.0
    }

    /// A rate of zero pauses; other rates are ignored
    pub fn set_rate(&self, rate: f64) {
        if rate == 0.0 {
            self.player.pause();
        }
    }

    pub fn shuffle(&self) -> bool {
        self.player.play_mode().is_shuffle()
    }

    pub fn set_shuffle(&self, enable: bool) {
        if self.shuffle() != enable {
            self.player.toggle_shuffle();
        }
    }

    pub fn metadata(&self) -> PropertyMap {
        self.state.lock().metadata.clone()
    }

    /// Master volume as a fraction of full scale
    pub fn volume(&self) -> f64 {
        f64::from(self.player.volume_master()) / 100.0
    }

    pub fn set_volume(&self, value: f64) {
        let volume = (value * 100.0).round().clamp(0.0, 100.0) as u32;
        self.player.set_group_volume(volume);
    }

    /// Track position in microseconds
    pub fn position(&self) -> i64 {
        MICROS_PER_SECOND.saturating_mul(self.player.current_track_position() as i64)
    }

    pub fn can_go_next(&self) -> bool {
        self.player.can_go_next()
    }

    pub fn can_go_previous(&self) -> bool {
        self.player.can_go_previous()
    }

    pub fn can_play(&self) -> bool {
        true
    }

    pub fn can_pause(&self) -> bool {
        true
    }

    pub fn can_seek(&self) -> bool {
        self.player.can_seek()
    }

    pub fn can_control(&self) -> bool {
        true
    }

    /// Every player property, for `Properties.GetAll`
    pub fn player_properties(&self) -> PropertyMap {
        let mut props = PropertyMap::new();
        props.insert("PlaybackStatus".into(), self.playback_status().as_str().into());
        props.insert("LoopStatus".into(), self.loop_status().as_str().into());
        props.insert("Rate".into(), self.rate().into());
        props.insert("Shuffle".into(), self.shuffle().into());
        props.insert("Metadata".into(), self.metadata().into());
        props.insert("Volume".into(), self.volume().into());
        props.insert("Position".into(), self.position().into());
        props.insert("MinimumRate".into(), self.minimum_rate().into());
        props.insert("MaximumRate".into(), self.maximum_rate().into());
        props.insert("CanGoNext".into(), self.can_go_next().into());
        props.insert("CanGoPrevious".into(), self.can_go_previous().into());
        props.insert("CanPlay".into(), self.can_play().into());
        props.insert("CanPause".into(), self.can_pause().into());
        props.insert("CanSeek".into(), self.can_seek().into());
        props.insert("CanControl".into(), self.can_control().into());
        props
    }

    // ------------------------------------------------------------------
    // org.mpris.MediaPlayer2.Player methods
    // ------------------------------------------------------------------

    pub fn next(&self) {
        if self.can_go_next() {
            self.player.next();
        }
    }

    pub fn previous(&self) {
        if self.can_go_previous() {
            self.player.previous();
        }
    }

    pub fn pause(&self) {
        if self.can_pause() && self.player.playback_state().is_playing() {
            self.player.pause();
        }
    }

    pub fn play_pause(&self) {
        if !self.can_pause() {
            return;
        }
        match self.player.playback_state() {
            TransportState::Playing => self.player.pause(),
            TransportState::Stopped | TransportState::PausedPlayback => self.player.play(),
            _ => {}
        }
    }

    pub fn stop(&self) {
        self.player.stop();
    }

    pub fn play(&self) {
        if self.can_play() {
            self.player.play();
        }
    }

    /// Seek relative to the current position by `offset` microseconds
    pub fn seek(&self, offset: i64) {
        if !self.can_seek() {
            return;
        }
        let position = self.player.current_track_position() as i64;
        let target = position.saturating_add(offset / MICROS_PER_SECOND).max(0);
        self.player.seek_time(target as u64);
    }

    /// Seek to `offset` microseconds if `track_id` is the current track
    pub fn set_position(&self, track_id: &str, offset: i64) {
        if !self.can_seek() || offset < 0 {
            return;
        }
        if self.current_track_id().as_deref() == Some(track_id) {
            self.player.seek_time((offset / MICROS_PER_SECOND) as u64);
        }
    }

    pub fn open_uri(&self, uri: &str) {
        debug!(uri = %uri, "OpenUri not supported");
    }
}

impl Drop for MprisBridge {
    fn drop(&mut self) {
        self.unregister();
    }
}

impl fmt::Debug for MprisBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MprisBridge")
            .field("config", &self.config)
            .field("names", &state.names)
            .field("registered", &state.registered)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Living Room", "living_room")]
    #[case("Kitchen+Bedroom", "kitchen")]
    #[case("Salle à manger", "salle_a_manger")]
    #[case("5th Floor", "_5th_floor")]
    #[case("Büro/Office", "buro_office")]
    fn test_zone_id(#[case] zone: &str, #[case] expected: &str) {
        assert_eq!(zone_id(zone), expected);
    }

    #[test]
    fn test_service_names() {
        let names = ServiceNames::for_zone(&BridgeConfig::default(), "Living Room+Kitchen");
        assert_eq!(names.identity, "Noson.living_room");
        assert_eq!(names.service_name, "org.mpris.MediaPlayer2.Noson.living_room");
        assert_eq!(names.service_path, "/io/github/janbar/noson/living_room");
        assert_eq!(names.track_id(3), "/io/github/janbar/noson/living_room/track/3");
    }

    #[rstest]
    #[case(TransportState::Playing, PlaybackStatus::Playing)]
    #[case(TransportState::PausedPlayback, PlaybackStatus::Paused)]
    #[case(TransportState::Stopped, PlaybackStatus::Stopped)]
    #[case(TransportState::Transitioning, PlaybackStatus::Stopped)]
    fn test_playback_status_mapping(#[case] state: TransportState, #[case] expected: PlaybackStatus) {
        assert_eq!(PlaybackStatus::from(state), expected);
    }

    #[rstest]
    #[case(PlayMode::Normal, LoopStatus::None)]
    #[case(PlayMode::RepeatAll, LoopStatus::Playlist)]
    #[case(PlayMode::Shuffle, LoopStatus::Playlist)]
    #[case(PlayMode::RepeatOne, LoopStatus::Track)]
    #[case(PlayMode::ShuffleNoRepeat, LoopStatus::None)]
    fn test_loop_status_mapping(#[case] mode: PlayMode, #[case] expected: LoopStatus) {
        assert_eq!(LoopStatus::from(mode), expected);
    }

    #[test]
    fn test_loop_status_parse() {
        assert_eq!("Playlist".parse::<LoopStatus>(), Ok(LoopStatus::Playlist));
        assert!("Repeat".parse::<LoopStatus>().is_err());
    }
}
