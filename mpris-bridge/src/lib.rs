//! MPRIS2 bridge for the noson zone player
//!
//! Publishes the selected zone as an `org.mpris.MediaPlayer2` player on the
//! desktop session bus so media keys, panel applets and lock screens can
//! show and drive it. The bus transport and the player are both traits;
//! the bridge only maps between them.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mpris_bridge::prelude::*;
//!
//! let bridge = MprisBridge::new(player, session_bus, BridgeConfig::default())?;
//! assert_eq!(bridge.identity(), "Noson.living_room");
//!
//! // Forward player notifications as they arrive
//! bridge.playback_state_changed();
//! bridge.current_track_changed();
//! ```
//!
//! # Architecture
//!
//! ```text
//! PlayerSource (zone transport)
//!     │ state queries / commands
//!     ▼
//! MprisBridge
//!     ├── ServiceNames      org.mpris.MediaPlayer2.<Display>.<zone>
//!     ├── metadata          rebuilt on current_track_changed
//!     │
//!     ▼ register_service / register_object / emit_properties_changed
//! SessionBus
//! ```

pub mod bridge;
pub mod bus;
pub mod config;
pub mod desktop;
pub mod error;
pub mod player;
pub mod value;

pub use bridge::{
    zone_id, LoopStatus, MprisBridge, PlaybackStatus, ServiceNames, MEDIA_PLAYER_SERVICE,
    MPRIS_OBJECT_PATH, PLAYER_INTERFACE, ROOT_INTERFACE,
};
pub use bus::SessionBus;
pub use config::BridgeConfig;
pub use error::{BridgeError, BusError, Result};
pub use player::{PlayMode, PlayerSource, TransportState};
pub use value::{MprisValue, PropertyMap};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bridge::{LoopStatus, MprisBridge, PlaybackStatus};
    pub use crate::bus::SessionBus;
    pub use crate::config::BridgeConfig;
    pub use crate::error::{BridgeError, BusError};
    pub use crate::player::{PlayMode, PlayerSource, TransportState};
    pub use crate::value::{MprisValue, PropertyMap};
}
