//! The session bus seam
//!
//! Only the four operations the bridge needs are abstracted; the wire
//! transport lives behind an implementation of `SessionBus`.

use crate::error::BusError;
use crate::value::PropertyMap;

pub trait SessionBus: Send + Sync {
    /// Claim a well-known bus name
    fn register_service(&self, name: &str) -> Result<(), BusError>;

    /// Release a previously claimed bus name
    fn unregister_service(&self, name: &str);

    /// Export the bridge at an object path
    fn register_object(&self, path: &str) -> Result<(), BusError>;

    /// Send `org.freedesktop.DBus.Properties.PropertiesChanged` from `path`
    fn emit_properties_changed(&self, path: &str, interface: &str, changed: PropertyMap);
}
