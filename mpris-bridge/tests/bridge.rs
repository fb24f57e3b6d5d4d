//! Bridge behaviour against a scripted player and an in-memory bus

use std::sync::Arc;

use mpris_bridge::prelude::*;
use mpris_bridge::{MPRIS_OBJECT_PATH, PLAYER_INTERFACE};
use parking_lot::Mutex;

// ============================================================================
// Test Helpers
// ============================================================================

#[derive(Debug, Clone)]
struct PlayerState {
    connected: bool,
    zone: String,
    transport: TransportState,
    mode: PlayMode,
    index: usize,
    duration: u64,
    position: u64,
    title: String,
    album: String,
    artist: String,
    art: String,
    volume: u32,
    can_next: bool,
    can_previous: bool,
    can_seek: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            connected: true,
            zone: "Living Room+Kitchen".to_string(),
            transport: TransportState::Stopped,
            mode: PlayMode::Normal,
            index: 2,
            duration: 245,
            position: 30,
            title: "Teardrop".to_string(),
            album: "Mezzanine".to_string(),
            artist: "Massive Attack".to_string(),
            art: "http://192.168.1.20:1400/getaa?u=x".to_string(),
            volume: 35,
            can_next: true,
            can_previous: false,
            can_seek: true,
        }
    }
}

#[derive(Default)]
struct MockPlayer {
    state: Mutex<PlayerState>,
    commands: Mutex<Vec<String>>,
}

impl MockPlayer {
    fn with(edit: impl FnOnce(&mut PlayerState)) -> Arc<Self> {
        let player = Self::default();
        edit(&mut player.state.lock());
        Arc::new(player)
    }

    fn update(&self, edit: impl FnOnce(&mut PlayerState)) {
        edit(&mut self.state.lock());
    }

    fn record(&self, command: impl Into<String>) {
        self.commands.lock().push(command.into());
    }

    fn take_commands(&self) -> Vec<String> {
        std::mem::take(&mut *self.commands.lock())
    }
}

impl PlayerSource for MockPlayer {
    fn connected(&self) -> bool {
        self.state.lock().connected
    }
    fn zone_short_name(&self) -> String {
        self.state.lock().zone.clone()
    }
    fn playback_state(&self) -> TransportState {
        self.state.lock().transport
    }
    fn play_mode(&self) -> PlayMode {
        self.state.lock().mode
    }
    fn current_index(&self) -> usize {
        self.state.lock().index
    }
    fn current_track_duration(&self) -> u64 {
        self.state.lock().duration
    }
    fn current_track_position(&self) -> u64 {
        self.state.lock().position
    }
    fn current_meta_title(&self) -> String {
        self.state.lock().title.clone()
    }
    fn current_meta_album(&self) -> String {
        self.state.lock().album.clone()
    }
    fn current_meta_artist(&self) -> String {
        self.state.lock().artist.clone()
    }
    fn current_meta_art(&self) -> String {
        self.state.lock().art.clone()
    }
    fn volume_master(&self) -> u32 {
        self.state.lock().volume
    }
    fn can_go_next(&self) -> bool {
        self.state.lock().can_next
    }
    fn can_go_previous(&self) -> bool {
        self.state.lock().can_previous
    }
    fn can_seek(&self) -> bool {
        self.state.lock().can_seek
    }
    fn play(&self) {
        self.record("play");
    }
    fn pause(&self) {
        self.record("pause");
    }
    fn stop(&self) {
        self.record("stop");
    }
    fn next(&self) {
        self.record("next");
    }
    fn previous(&self) {
        self.record("previous");
    }
    fn toggle_repeat(&self) {
        self.record("toggle_repeat");
    }
    fn toggle_shuffle(&self) {
        self.record("toggle_shuffle");
    }
    fn set_group_volume(&self, volume: u32) {
        self.record(format!("volume {}", volume));
    }
    fn seek_time(&self, seconds: u64) {
        self.record(format!("seek {}", seconds));
    }
}

type Signal = (String, String, PropertyMap);

#[derive(Default)]
struct MockBus {
    services: Mutex<Vec<String>>,
    objects: Mutex<Vec<String>>,
    signals: Mutex<Vec<Signal>>,
    refuse_names: Mutex<bool>,
}

impl MockBus {
    fn services(&self) -> Vec<String> {
        self.services.lock().clone()
    }

    fn take_signals(&self) -> Vec<Signal> {
        std::mem::take(&mut *self.signals.lock())
    }

    /// Property names of every signal, in emission order
    fn take_changed_names(&self) -> Vec<Vec<String>> {
        self.take_signals()
            .into_iter()
            .map(|(_, _, changed)| changed.into_keys().collect())
            .collect()
    }
}

impl SessionBus for MockBus {
    fn register_service(&self, name: &str) -> Result<(), BusError> {
        if *self.refuse_names.lock() {
            return Err(BusError::new("name already taken"));
        }
        self.services.lock().push(name.to_string());
        Ok(())
    }

    fn unregister_service(&self, name: &str) {
        self.services.lock().retain(|s| s != name);
    }

    fn register_object(&self, path: &str) -> Result<(), BusError> {
        self.objects.lock().push(path.to_string());
        Ok(())
    }

    fn emit_properties_changed(&self, path: &str, interface: &str, changed: PropertyMap) {
        self.signals
            .lock()
            .push((path.to_string(), interface.to_string(), changed));
    }
}

fn names(list: &[&str]) -> Vec<String> {
    let mut names: Vec<String> = list.iter().map(|s| s.to_string()).collect();
    names.sort();
    names
}

fn bridge_for(player: &Arc<MockPlayer>, bus: &Arc<MockBus>) -> MprisBridge {
    MprisBridge::new(player.clone(), bus.clone(), BridgeConfig::default()).unwrap()
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_registers_connected_zone() {
    let player = Arc::new(MockPlayer::default());
    let bus = Arc::new(MockBus::default());
    let bridge = bridge_for(&player, &bus);

    assert!(bridge.is_registered());
    assert_eq!(bus.services(), vec!["org.mpris.MediaPlayer2.Noson.living_room"]);
    assert_eq!(*bus.objects.lock(), vec![MPRIS_OBJECT_PATH.to_string()]);
    assert_eq!(bridge.identity(), "Noson.living_room");
    assert_eq!(bridge.desktop_entry(), "io.github.janbar.noson");

    let signals = bus.take_signals();
    assert!(signals
        .iter()
        .all(|(path, interface, _)| path == MPRIS_OBJECT_PATH && interface == PLAYER_INTERFACE));
    let groups: Vec<Vec<String>> = signals.into_iter().map(|(_, _, c)| c.into_keys().collect()).collect();
    assert_eq!(
        groups,
        vec![
            names(&["CanPlay", "CanPause", "CanGoNext", "CanGoPrevious", "CanSeek", "Metadata"]),
            names(&["CanPlay", "CanPause", "PlaybackStatus"]),
            names(&["Shuffle", "LoopStatus", "CanGoNext", "CanGoPrevious"]),
            names(&["Volume"]),
        ]
    );
}

#[test]
fn test_disconnected_player_is_not_registered() {
    let player = MockPlayer::with(|s| s.connected = false);
    let bus = Arc::new(MockBus::default());
    let bridge = bridge_for(&player, &bus);

    assert!(!bridge.is_registered());
    assert!(bus.services().is_empty());

    bridge.volume_changed();
    assert!(bus.take_signals().is_empty());
}

#[test]
fn test_refused_name_leaves_bridge_unregistered() {
    let player = Arc::new(MockPlayer::default());
    let bus = Arc::new(MockBus::default());
    *bus.refuse_names.lock() = true;

    let bridge = bridge_for(&player, &bus);
    assert!(!bridge.is_registered());
    assert!(bus.take_signals().is_empty());
    assert!(matches!(
        bridge.init_service(),
        Err(BridgeError::ServiceRegistration { .. })
    ));
}

#[test]
fn test_reconnect_moves_to_new_zone_name() {
    let player = Arc::new(MockPlayer::default());
    let bus = Arc::new(MockBus::default());
    let bridge = bridge_for(&player, &bus);

    player.update(|s| s.connected = false);
    bridge.connection_changed();
    assert!(!bridge.is_registered());
    assert!(bus.services().is_empty());

    player.update(|s| {
        s.connected = true;
        s.zone = "Büro".to_string();
    });
    bridge.connection_changed();
    assert_eq!(bus.services(), vec!["org.mpris.MediaPlayer2.Noson.buro"]);
}

#[test]
fn test_drop_releases_name() {
    let player = Arc::new(MockPlayer::default());
    let bus = Arc::new(MockBus::default());
    let bridge = bridge_for(&player, &bus);
    assert_eq!(bus.services().len(), 1);

    drop(bridge);
    assert!(bus.services().is_empty());
}

#[test]
fn test_invalid_config_is_rejected() {
    let player = Arc::new(MockPlayer::default());
    let bus = Arc::new(MockBus::default());
    let result = MprisBridge::new(player, bus.clone(), BridgeConfig::new("io.noson", "9lives"));

    assert!(matches!(result, Err(BridgeError::Configuration(_))));
    assert!(bus.services().is_empty());
}

// ============================================================================
// Notifications
// ============================================================================

#[test]
fn test_metadata_contents() {
    let player = Arc::new(MockPlayer::default());
    let bus = Arc::new(MockBus::default());
    let bridge = bridge_for(&player, &bus);

    let metadata = bridge.metadata();
    assert_eq!(
        metadata["mpris:trackid"],
        MprisValue::ObjectPath("/io/github/janbar/noson/living_room/track/2".into())
    );
    assert_eq!(metadata["mpris:length"], MprisValue::Int64(245_000_000));
    assert_eq!(metadata["xesam:title"].as_str(), Some("Teardrop"));
    assert_eq!(metadata["xesam:album"].as_str(), Some("Mezzanine"));
    assert_eq!(
        metadata["xesam:artist"],
        MprisValue::StrList(vec!["Massive Attack".into()])
    );
    assert_eq!(
        metadata["mpris:artUrl"].as_str(),
        Some("http://192.168.1.20:1400/getaa?u=x")
    );
}

#[test]
fn test_track_change_replaces_metadata() {
    let player = Arc::new(MockPlayer::default());
    let bus = Arc::new(MockBus::default());
    let bridge = bridge_for(&player, &bus);
    bus.take_signals();

    player.update(|s| {
        s.index = 3;
        s.title = "Angel".into();
        s.artist = String::new();
    });
    bridge.current_track_changed();

    let signals = bus.take_signals();
    assert_eq!(signals.len(), 1);
    let metadata = signals[0].2["Metadata"].as_map().unwrap();
    assert_eq!(metadata["xesam:title"].as_str(), Some("Angel"));
    assert!(!metadata.contains_key("xesam:artist"));
    assert_eq!(
        metadata["mpris:trackid"].as_str(),
        Some("/io/github/janbar/noson/living_room/track/3")
    );
    assert_eq!(bridge.metadata(), *metadata);
}

#[test]
fn test_can_seek_only_announced_while_playing() {
    let player = Arc::new(MockPlayer::default());
    let bus = Arc::new(MockBus::default());
    let bridge = bridge_for(&player, &bus);
    bus.take_signals();

    bridge.playback_state_changed();
    player.update(|s| s.transport = TransportState::Playing);
    bridge.playback_state_changed();

    assert_eq!(
        bus.take_changed_names(),
        vec![
            names(&["CanPlay", "CanPause", "PlaybackStatus"]),
            names(&["CanPlay", "CanPause", "PlaybackStatus", "CanSeek"]),
        ]
    );
    assert_eq!(bridge.playback_status(), PlaybackStatus::Playing);
}

#[test]
fn test_volume_is_a_fraction() {
    let player = Arc::new(MockPlayer::default());
    let bus = Arc::new(MockBus::default());
    let bridge = bridge_for(&player, &bus);
    bus.take_signals();

    player.update(|s| s.volume = 80);
    bridge.volume_changed();

    let signals = bus.take_signals();
    assert_eq!(signals[0].2["Volume"], MprisValue::Double(0.8));
}

// ============================================================================
// Player properties and methods
// ============================================================================

#[test]
fn test_loop_status_toggles_repeat() {
    let player = Arc::new(MockPlayer::default());
    let bus = Arc::new(MockBus::default());
    let bridge = bridge_for(&player, &bus);

    bridge.set_loop_status(LoopStatus::Playlist);
    bridge.set_loop_status(LoopStatus::None);
    bridge.set_loop_status(LoopStatus::Track);
    assert_eq!(player.take_commands(), vec!["toggle_repeat"]);

    player.update(|s| s.mode = PlayMode::Shuffle);
    assert_eq!(bridge.loop_status(), LoopStatus::Playlist);
    bridge.set_loop_status(LoopStatus::None);
    bridge.set_loop_status(LoopStatus::Playlist);
    assert_eq!(player.take_commands(), vec!["toggle_repeat"]);
}

#[test]
fn test_shuffle_toggles_only_on_change() {
    let player = MockPlayer::with(|s| s.mode = PlayMode::ShuffleNoRepeat);
    let bus = Arc::new(MockBus::default());
    let bridge = bridge_for(&player, &bus);

    assert!(bridge.shuffle());
    bridge.set_shuffle(true);
    assert!(player.take_commands().is_empty());
    bridge.set_shuffle(false);
    assert_eq!(player.take_commands(), vec!["toggle_shuffle"]);
}

#[test]
fn test_transport_methods() {
    let player = Arc::new(MockPlayer::default());
    let bus = Arc::new(MockBus::default());
    let bridge = bridge_for(&player, &bus);

    // Stopped: pause is ignored, play_pause plays
    bridge.pause();
    bridge.play_pause();
    // can_previous is false
    bridge.previous();
    bridge.next();
    bridge.stop();
    bridge.set_rate(1.0);
    assert_eq!(player.take_commands(), vec!["play", "next", "stop"]);

    player.update(|s| s.transport = TransportState::Playing);
    bridge.play_pause();
    bridge.pause();
    bridge.set_rate(0.0);
    assert_eq!(player.take_commands(), vec!["pause", "pause", "pause"]);

    player.update(|s| s.transport = TransportState::Transitioning);
    bridge.play_pause();
    bridge.play();
    assert_eq!(player.take_commands(), vec!["play"]);
}

#[test]
fn test_volume_and_position_units() {
    let player = Arc::new(MockPlayer::default());
    let bus = Arc::new(MockBus::default());
    let bridge = bridge_for(&player, &bus);

    assert_eq!(bridge.volume(), 0.35);
    assert_eq!(bridge.position(), 30_000_000);

    bridge.set_volume(0.29);
    bridge.set_volume(1.5);
    assert_eq!(player.take_commands(), vec!["volume 29", "volume 100"]);
}

#[test]
fn test_seek_and_set_position() {
    let player = Arc::new(MockPlayer::default());
    let bus = Arc::new(MockBus::default());
    let bridge = bridge_for(&player, &bus);

    bridge.seek(15_000_000);
    bridge.seek(-60_000_000);
    bridge.set_position("/io/github/janbar/noson/living_room/track/2", 90_000_000);
    bridge.set_position("/io/github/janbar/noson/living_room/track/9", 90_000_000);
    bridge.set_position("/io/github/janbar/noson/living_room/track/2", -1);
    assert_eq!(player.take_commands(), vec!["seek 45", "seek 0", "seek 90"]);

    player.update(|s| s.can_seek = false);
    bridge.seek(1_000_000);
    assert!(player.take_commands().is_empty());
}

#[test]
fn test_get_all_properties() {
    let player = Arc::new(MockPlayer::default());
    let bus = Arc::new(MockBus::default());
    let bridge = bridge_for(&player, &bus);

    let root = bridge.root_properties();
    assert_eq!(root["Identity"].as_str(), Some("Noson.living_room"));
    assert_eq!(
        root["SupportedUriSchemes"],
        MprisValue::StrList(vec!["file".into(), "http".into()])
    );
    assert_eq!(root["SupportedMimeTypes"].as_str_list().map(|l| l.len()), Some(8));

    let props = bridge.player_properties();
    assert_eq!(props["PlaybackStatus"].as_str(), Some("Stopped"));
    assert_eq!(props["LoopStatus"].as_str(), Some("None"));
    assert_eq!(props["Rate"].as_f64(), Some(1.0));
    assert_eq!(props["CanControl"].as_bool(), Some(true));
    assert_eq!(props["CanGoPrevious"].as_bool(), Some(false));
}
