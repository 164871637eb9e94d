//! Protocol constants
//!
//! Header identifiers, request opcodes, SETPATH flags and response codes as
//! defined by OBEX 1.2, restricted to what the TC65 file system uses, plus the
//! few vendor values the module expects.

// ============================================================================
// Header Identifiers
// ============================================================================

/// Number of objects (4-byte value).
pub const HEADER_COUNT: u8 = 0xC0;
/// Object name, UTF-16 text.
pub const HEADER_NAME: u8 = 0x01;
/// Object type, ASCII MIME string.
pub const HEADER_TYPE: u8 = 0x42;
/// Object length (4-byte value, no length field).
pub const HEADER_LENGTH: u8 = 0xC3;
/// ISO 8601 timestamp as a byte sequence.
pub const HEADER_TIME: u8 = 0x44;
/// Text description.
pub const HEADER_DESCRIPTION: u8 = 0x05;
/// Service target of a CONNECT.
pub const HEADER_TARGET: u8 = 0x46;
/// A chunk of the object body.
pub const HEADER_BODY: u8 = 0x48;
/// The final chunk of the object body.
pub const HEADER_END_OF_BODY: u8 = 0x49;
/// Identifies the responding service.
pub const HEADER_WHO: u8 = 0x4A;
/// Connection identifier (4-byte value).
pub const HEADER_CONNECTION_ID: u8 = 0xCB;
/// Application specific parameters.
pub const HEADER_APP_PARAMETERS: u8 = 0x4C;

// ============================================================================
// Request Opcodes (host → module)
// ============================================================================

/// Open an OBEX session.
pub const REQUEST_CONNECT: u8 = 0x80;
/// Close the OBEX session.
pub const REQUEST_DISCONNECT: u8 = 0x81;
/// Send an object (or delete it when no body is present).
pub const REQUEST_PUT: u8 = 0x02;
/// Fetch an object.
pub const REQUEST_GET: u8 = 0x03;
/// Change the current folder.
pub const REQUEST_SETPATH: u8 = 0x85;
/// Abort the current operation.
pub const REQUEST_ABORT: u8 = 0xFF;
/// FINAL bit, or-ed into PUT/GET on the last packet of a request.
pub const REQUEST_FINAL: u8 = 0x80;

// ============================================================================
// SETPATH Flags
// ============================================================================

/// Enter the named folder, creating it when missing.
pub const FLAG_SETPATH_CREATE: u8 = 0x00;
/// Enter the named folder, failing when missing.
pub const FLAG_SETPATH_NOCREATE: u8 = 0x02;
/// Go up one level (backup bit plus don't-create bit).
pub const FLAG_SETPATH_PARENT_FOLDER: u8 = 0x03;

// ============================================================================
// Response Codes (module → host)
// ============================================================================

/// Success bit.
pub const RESPONSE_SUCCESS: u8 = 0x20;
/// Continue bit: more response packets follow.
pub const RESPONSE_CONTINUE: u8 = 0x10;
/// Object created.
pub const RESPONSE_CREATED: u8 = 0x21;
/// Bad request.
pub const RESPONSE_BAD_REQUEST: u8 = 0x40;
/// FINAL bit as set on every response code.
pub const RESPONSE_FINAL: u8 = 0x80;

// ============================================================================
// CONNECT Parameters
// ============================================================================

/// OBEX protocol version 1.3 as sent in CONNECT.
pub const OBEX_VERSION: u8 = 0x13;
/// CONNECT flags byte.
pub const CONNECT_FLAGS: u8 = 0x00;
/// Maximum packet length announced in CONNECT.
pub const MAX_PACKET_LENGTH: u16 = 0xFFFF;

/// Target UUID of the OBEX file-system browsing service
/// (`6b01cb31-4106-11d4-9a77-0050da3f471f`).
pub const FILE_SYSTEM_TARGET: [u8; 16] = [
    0x6b, 0x01, 0xcb, 0x31, 0x41, 0x06, 0x11, 0xd4, 0x9a, 0x77, 0x00, 0x50, 0xda, 0x3f, 0x47, 0x1f,
];

// ============================================================================
// Miscellaneous
// ============================================================================

/// MIME type requesting a listing of the current folder.
pub const FOLDER_LISTING_TYPE: &str = "x-obex/folder-listing";

/// Vendor application parameter that makes the module format its flash disk.
pub const ERASE_DISK_PARAMETERS: [u8; 2] = [0x31, 0x00];

/// Size of the opcode + length prefix of every frame.
pub const FRAME_PREFIX_SIZE: usize = 3;
/// Size of the id + length prefix of a length-prefixed header.
pub const HEADER_PREFIX_SIZE: usize = 3;
/// Total size of the fixed LENGTH header (id + 4-byte value).
pub const LENGTH_HEADER_SIZE: usize = 5;
/// Length of an encoded `YYYYMMDDTHHMMSS` timestamp.
pub const TIMESTAMP_LEN: usize = 15;
