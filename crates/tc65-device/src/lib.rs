//! TC65 Device Session
//!
//! Drives a Cinterion TC65 module over one serial line that carries two
//! protocols in turn: the AT command channel and an OBEX file transfer
//! session. The [`Device`] tracks which one the module currently expects and
//! switches transparently:
//!
//! ```text
//!            AT\Q3, AT^SQWE=0, AT^SQWE=3, CONNECT
//!   AtMode ─────────────────────────────────────────► ObexMode
//!          ◄─────────────────────────────────────────
//!                DISCONNECT, +++ (retried), ATE1
//! ```
//!
//! File operations enter OBEX mode, AT commands leave it. Every request is
//! followed by a polling wait with its own deadline (see [`Timeouts`]).
//!
//! # Example
//!
//! ```no_run
//! use tc65_device::{Device, DeviceConfig};
//!
//! let mut device = Device::connect(DeviceConfig::default())?;
//! device.init_device()?;
//! for entry in device.list_folder()? {
//!     println!("{}", entry);
//! }
//! device.disconnect()?;
//! # Ok::<(), tc65_device::DeviceError>(())
//! ```

mod config;
mod device;
mod error;
mod mode;
mod transfer;
mod transport;
mod waiter;

pub use config::*;
pub use device::*;
pub use error::*;
pub use mode::*;
pub use transfer::*;
pub use transport::*;
pub use waiter::*;
