//! `ZBXD` packet framing shared by sender requests and server replies.
//!
//! A packet is the 5-byte magic `ZBXD\x01`, the payload length as an 8-byte
//! little-endian unsigned integer, then the payload itself.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::SenderError;

/// Protocol magic: `ZBXD` followed by the protocol flags byte
pub const MAGIC: &[u8; 5] = b"ZBXD\x01";

/// Header size in bytes (magic + length)
pub const HEADER_SIZE: usize = MAGIC.len() + 8;

/// Largest reply body accepted from a server (16 MiB)
pub const MAX_RESPONSE_SIZE: u64 = 16 * 1024 * 1024;

/// Frame `payload` into a packet. Pure; never fails.
pub fn build_packet(payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    buf.put_slice(MAGIC);
    buf.put_u64_le(payload.len() as u64);
    buf.put_slice(payload);
    buf.freeze()
}

/// Validate a received header and return the declared body length.
///
/// A wrong magic or an empty body is rejected. Bodies over
/// [`MAX_RESPONSE_SIZE`] are refused so a corrupt length cannot force a huge allocation.
pub fn decode_header(header: &[u8; HEADER_SIZE]) -> Result<u64, SenderError> {
    if &header[..MAGIC.len()] != MAGIC {
        return Err(SenderError::InvalidHeader {
            found: header[..MAGIC.len()].to_vec(),
        });
    }

    let mut length = [0u8; 8];
    length.copy_from_slice(&header[MAGIC.len()..]);
    let length = u64::from_le_bytes(length);

    if length == 0 {
        return Err(SenderError::EmptyResponse);
    }

    if length > MAX_RESPONSE_SIZE {
        return Err(SenderError::ResponseTooLarge {
            size: length,
            max_size: MAX_RESPONSE_SIZE,
        });
    }

    Ok(length)
}
