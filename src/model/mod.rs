//! The in-memory topology model (§3 "Data model"): the local device, its
//! interfaces and radios, and everything known about neighboring 1905 devices.
//! Neighbor cross-links are naturally cyclic (A points at B, B points at A), so
//! this is the one place the original's intrusive `hlist`/`dlist` graph is
//! replaced wholesale by a generational [`crate::container::Arena`] instead of
//! owned fields.

mod device;
mod interface;
mod network;
mod radio;
mod registrar;

pub use device::{AlDevice, DeviceState};
pub use interface::{Interface, InterfaceKind, InterfaceWifi};
pub use network::Network;
pub use radio::{Radio, RadioBand};
pub use registrar::Registrar;
