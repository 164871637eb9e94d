//! TC65 OBEX Protocol
//!
//! This crate provides types and utilities for speaking the subset of OBEX
//! (Object Exchange) that the TC65 module firmware exposes for its flash file
//! system. Once the module has been switched into OBEX mode over its AT
//! channel, every exchange is a binary request frame answered by a binary
//! response frame.
//!
//! # Protocol Overview
//!
//! Every frame starts with a 3-byte prefix:
//!
//! ```text
//! +--------+---------+---------+---------------------------+
//! | opcode | len_hi  | len_lo  | prefix bytes + headers... |
//! +--------+---------+---------+---------------------------+
//! ```
//!
//! The length is big-endian and counts the whole frame, prefix included.
//! Headers are either length-prefixed (`id`, 2-byte length including the
//! 3-byte header prefix, payload) or, for the LENGTH header only, a fixed
//! 5-byte `id` + 4-byte big-endian value.
//!
//! - **Requests** (host → module): `REQUEST_*` opcodes, optionally with the
//!   FINAL bit set
//! - **Responses** (module → host): `RESPONSE_*` codes; a CONTINUE response
//!   means more data follows for a GET
//!
//! # Example
//!
//! ```rust
//! use tc65_obex::{encode_request, Header, REQUEST_GET, REQUEST_FINAL, FOLDER_LISTING_TYPE};
//!
//! let request = encode_request(
//!     REQUEST_GET | REQUEST_FINAL,
//!     &[],
//!     &[Header::mime_type(FOLDER_LISTING_TYPE)],
//! );
//! assert_eq!(request[0], 0x83);
//! ```

mod buffer;
mod constants;
mod error;
mod frame;
mod header;
mod listing;
mod time;
mod types;

pub use buffer::*;
pub use constants::*;
pub use error::*;
pub use frame::*;
pub use header::*;
pub use listing::*;
pub use time::*;
pub use types::*;
