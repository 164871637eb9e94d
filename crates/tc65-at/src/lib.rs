//! TC65 AT Command Channel
//!
//! This crate provides types and utilities for the text side of the TC65
//! serial interface. Unlike the OBEX file transfer, which uses binary frames,
//! the AT channel is a simple line-based text protocol.
//!
//! # Protocol Overview
//!
//! - **Commands** (host → module): text prefixed `AT`, terminated with `\r`
//! - **Responses** (module → host): free text, terminated by a final result
//!   code such as `OK` or `ERROR`
//! - **Unsolicited codes**: `^SYSSTART` when the module has powered up
//! - **Escape**: the bare sequence `+++` leaves data (OBEX) mode
//!
//! Success is recognized by the substring `OK` appearing anywhere in the
//! accumulated response text.
//!
//! # Example
//!
//! ```rust
//! use tc65_at::{AtCommand, AtCodec, AtResponse};
//!
//! let frame = AtCommand::ObexQuoting { mode: 3 }.encode();
//! assert_eq!(frame, b"AT^SQWE=3\r");
//!
//! let mut codec = AtCodec::new();
//! codec.push(b"AT^SQWE=3\r\r\nOK\r\n");
//! assert_eq!(AtResponse::classify(&codec.text()), AtResponse::Ok);
//! ```

mod codec;
mod commands;
mod responses;

pub use codec::*;
pub use commands::*;
pub use responses::*;
