//! Integration tests for OBEX file operations.

mod common;

use chrono::NaiveDate;
use common::*;
use tc65_device::{Device, DeviceError, GetTarget};
use tc65_obex::{
    bytes_to_int, decode_headers, ByteBuffer, FileContent, FileEntry, Header, HEADER_BODY,
    HEADER_END_OF_BODY, HEADER_LENGTH, HEADER_NAME, HEADER_TIME,
};

/// Device already switched to OBEX mode.
fn obex_device(transport: &ScriptedTransport) -> Device<ScriptedTransport> {
    script_obex_switch(transport);
    let mut dev = Device::with_transport(transport.clone(), fast_config());
    dev.ensure_obex().expect("switch should succeed");
    dev
}

fn requests_after_switch(transport: &ScriptedTransport) -> Vec<Vec<u8>> {
    transport.writes().split_off(OBEX_SWITCH_WRITES)
}

fn headers_of(request: &[u8]) -> Vec<Header> {
    decode_headers(&request[3..]).expect("request headers should decode")
}

// ============================================================================
// PUT
// ============================================================================

#[test]
fn test_put_chunks() {
    let transport = ScriptedTransport::new();
    let mut dev = obex_device(&transport);
    transport.reply(&response(0x90, &[])).reply(&response(0x90, &[])).reply(&response(0xA0, &[]));

    let data: Vec<u8> = (0..1300u32).map(|i| (i % 251) as u8).collect();
    let modified = NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(12, 30, 0))
        .expect("valid timestamp");
    let content = FileContent::new(
        FileEntry::file("data.bin", 1300, Some(modified)),
        ByteBuffer::from(data.clone()),
    );
    dev.put(&content, 512).expect("put should succeed");

    let requests = requests_after_switch(&transport);
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0][0], 0x02);
    assert_eq!(requests[1][0], 0x02);
    assert_eq!(requests[2][0], 0x82);

    let first = headers_of(&requests[0]);
    let ids: Vec<u8> = first.iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![HEADER_NAME, HEADER_LENGTH, HEADER_TIME, HEADER_BODY]);
    assert_eq!(bytes_to_int(&first[1].payload), 1300);
    assert_eq!(first[2].payload, b"20240501T123000");

    let middle = headers_of(&requests[1]);
    assert_eq!(middle.len(), 1);
    assert_eq!(middle[0].id, HEADER_BODY);

    let last = headers_of(&requests[2]);
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].id, HEADER_END_OF_BODY);

    let sent: Vec<u8> = [&first[3], &middle[0], &last[0]]
        .iter()
        .flat_map(|h| h.payload.iter().copied())
        .collect();
    assert_eq!(first[3].payload.len(), 512);
    assert_eq!(last[0].payload.len(), 276);
    assert_eq!(sent, data);
}

#[test]
fn test_put_single_chunk_without_time() {
    let transport = ScriptedTransport::new();
    let mut dev = obex_device(&transport);
    transport.reply(&response(0xA0, &[]));

    let content = FileContent::new(FileEntry::file("a.txt", 5, None), ByteBuffer::from(&b"hello"[..]));
    dev.put_file(&content).expect("put should succeed");

    let requests = requests_after_switch(&transport);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0][0], 0x82);
    let headers = headers_of(&requests[0]);
    let ids: Vec<u8> = headers.iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![HEADER_NAME, HEADER_LENGTH, HEADER_END_OF_BODY]);
    assert_eq!(headers[2].payload, b"hello");
}

#[test]
fn test_put_empty_file() {
    let transport = ScriptedTransport::new();
    let mut dev = obex_device(&transport);
    transport.reply(&response(0xA0, &[]));

    let content = FileContent::new(FileEntry::file("empty", 0, None), ByteBuffer::new());
    dev.put(&content, 512).expect("put should succeed");

    let requests = requests_after_switch(&transport);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0][0], 0x82);
    let headers = headers_of(&requests[0]);
    assert_eq!(headers.last(), Some(&Header::body(&[], true)));
    assert_eq!(bytes_to_int(&headers[1].payload), 0);
}

#[test]
fn test_put_rejected() {
    let transport = ScriptedTransport::new();
    let mut dev = obex_device(&transport);
    transport.reply(&response(0xC3, &[]));

    let content = FileContent::new(FileEntry::file("a.txt", 1, None), ByteBuffer::from(&b"x"[..]));
    match dev.put(&content, 512) {
        Err(DeviceError::Protocol { code }) => assert_eq!(code, 0xC3),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_put_requires_name() {
    let transport = ScriptedTransport::new();
    let mut dev = obex_device(&transport);
    let content = FileContent::new(FileEntry::default(), ByteBuffer::from(&b"x"[..]));
    assert!(matches!(dev.put(&content, 512), Err(DeviceError::Format(_))));
    assert!(requests_after_switch(&transport).is_empty());
}

// ============================================================================
// GET
// ============================================================================

#[test]
fn test_get_single_response() {
    let transport = ScriptedTransport::new();
    let mut dev = obex_device(&transport);
    let payload: Vec<u8> = (0..100u8).collect();
    transport.reply(&response(0xA0, &[Header::body(&payload, true)]));

    let content = dev.get_file("a.bin").expect("get should succeed");
    assert_eq!(content.bytes.as_slice(), &payload[..]);
    assert_eq!(content.info.size, Some(100));
    assert_eq!(content.info.name.as_deref(), Some("a.bin"));
    assert!(content.info.modified.is_none());

    let requests = requests_after_switch(&transport);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0][0], 0x83);
    assert_eq!(headers_of(&requests[0]), vec![Header::name("a.bin")]);
}

#[test]
fn test_get_follows_continue() {
    let transport = ScriptedTransport::new();
    let mut dev = obex_device(&transport);
    transport
        .reply(&response(0x90, &[Header::length(11), Header::body(b"hello ", false)]))
        .reply(&response(0xA0, &[Header::body(b"world", true)]));

    let body = dev.get(GetTarget::File("greeting.txt")).expect("get should succeed");
    assert_eq!(body.as_slice(), b"hello world");

    let requests = requests_after_switch(&transport);
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1], vec![0x03, 0x00, 0x03]);
}

#[test]
fn test_list_folder() {
    let transport = ScriptedTransport::new();
    let mut dev = obex_device(&transport);
    let xml = "<?xml version=\"1.0\"?>\n\
               <folder-listing version=\"1.0\">\n\
               <file name=\"a.txt\" size=\"42\" modified=\"20240501T120000\"/>\n\
               <folder name=\"docs\" modified=\"20240102T030405\"/>\n\
               </folder-listing>\n";
    transport.reply(&response(0xA0, &[Header::body(xml.as_bytes(), true)]));

    let entries = dev.list_folder().expect("listing should succeed");
    assert_eq!(entries.len(), 2);
    assert!(entries[0].is_directory);
    assert_eq!(entries[0].name.as_deref(), Some("docs"));
    assert_eq!(entries[1].size, Some(42));

    let requests = requests_after_switch(&transport);
    assert_eq!(
        headers_of(&requests[0]),
        vec![Header::mime_type("x-obex/folder-listing")]
    );
}

#[test]
fn test_get_timeout() {
    let transport = ScriptedTransport::new();
    let mut dev = obex_device(&transport);
    transport.reply(&[0xA0, 0x00, 0x10, 0x49]);

    match dev.get_file("missing") {
        Err(DeviceError::Timeout { received, .. }) => assert_eq!(received, 4),
        other => panic!("unexpected result: {:?}", other),
    }
}

// ============================================================================
// SETPATH, delete, erase
// ============================================================================

#[test]
fn test_set_path_parent_aliases() {
    for alias in ["", "/", "..", "a:", "A:/"] {
        let transport = ScriptedTransport::new();
        let mut dev = obex_device(&transport);
        transport.reply(&response(0xA0, &[]));

        dev.change_dir(alias).expect("setpath should succeed");
        assert_eq!(
            requests_after_switch(&transport),
            vec![vec![0x85, 0x00, 0x05, 0x03, 0x00]],
            "alias {:?}",
            alias
        );
    }
}

#[test]
fn test_set_path_into_folder() {
    let transport = ScriptedTransport::new();
    let mut dev = obex_device(&transport);
    transport.reply(&response(0xA0, &[]));

    dev.change_dir("docs").expect("setpath should succeed");
    let requests = requests_after_switch(&transport);
    assert_eq!(&requests[0][..1], &[0x85]);
    assert_eq!(&requests[0][3..5], &[0x02, 0x00]);
    assert_eq!(decode_headers(&requests[0][5..]).expect("headers"), vec![Header::name("docs")]);
}

#[test]
fn test_make_dir_returns_to_parent() {
    let transport = ScriptedTransport::new();
    let mut dev = obex_device(&transport);
    transport.reply(&response(0xA0, &[])).reply(&response(0xA0, &[]));

    dev.make_dir("logs").expect("mkdir should succeed");
    let requests = requests_after_switch(&transport);
    assert_eq!(requests.len(), 2);
    assert_eq!(&requests[0][3..5], &[0x00, 0x00]);
    assert_eq!(decode_headers(&requests[0][5..]).expect("headers"), vec![Header::name("logs")]);
    assert_eq!(requests[1], vec![0x85, 0x00, 0x05, 0x03, 0x00]);
}

#[test]
fn test_delete() {
    let transport = ScriptedTransport::new();
    let mut dev = obex_device(&transport);
    transport.reply(&response(0xA0, &[]));

    dev.delete("old.txt").expect("delete should succeed");
    let requests = requests_after_switch(&transport);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0][0], 0x82);
    assert_eq!(headers_of(&requests[0]), vec![Header::name("old.txt")]);
}

#[test]
fn test_erase_disk() {
    let transport = ScriptedTransport::new();
    let mut dev = obex_device(&transport);
    transport.reply(&response(0xA0, &[]));

    dev.erase_disk().expect("erase should succeed");
    assert_eq!(
        requests_after_switch(&transport),
        vec![vec![0x82, 0x00, 0x08, 0x4C, 0x00, 0x05, 0x31, 0x00]]
    );
}

#[test]
fn test_file_operation_switches_mode() {
    let transport = ScriptedTransport::new();
    script_obex_switch(&transport);
    transport.reply(&response(0xA0, &[]));
    let mut dev = Device::with_transport(transport.clone(), fast_config());

    dev.delete("x").expect("delete should succeed");
    let writes = transport.writes();
    assert_eq!(writes.len(), OBEX_SWITCH_WRITES + 1);
    assert_eq!(writes[0], b"AT\\Q3\r");
}
