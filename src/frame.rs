//! On-carrier byte layout.
//!
//! A frame is a 4-byte big-endian payload length followed by exactly that
//! many raw payload bytes. Payload bytes pass through untouched.

/// Size of the length prefix in bytes.
pub const HEADER_SIZE: usize = 4;

/// Length prefix for a payload of `len` bytes.
pub fn encode_header(len: u32) -> [u8; HEADER_SIZE] {
    len.to_be_bytes()
}

/// Payload length described by a length prefix.
pub fn decode_header(header: [u8; HEADER_SIZE]) -> u32 {
    u32::from_be_bytes(header)
}

/// Every byte of the frame for `payload`, header first.
///
/// `payload` must be at most `u32::MAX` bytes long; callers bound it by
/// [`crate::capacity()`] before framing.
pub fn frame_bytes(payload: &[u8]) -> impl Iterator<Item = u8> + '_ {
    debug_assert!(payload.len() <= u32::MAX as usize);
    encode_header(payload.len() as u32)
        .into_iter()
        .chain(payload.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_big_endian() {
        assert_eq!(encode_header(5), [0, 0, 0, 5]);
        assert_eq!(encode_header(0x0102_0304), [1, 2, 3, 4]);
        assert_eq!(decode_header([0, 0, 1, 0]), 256);
    }

    #[test]
    fn header_extremes() {
        assert_eq!(decode_header(encode_header(0)), 0);
        assert_eq!(decode_header(encode_header(u32::MAX)), u32::MAX);
    }

    #[test]
    fn frame_prefixes_length() {
        let frame: Vec<u8> = frame_bytes(b"HELLO").collect();
        assert_eq!(frame, b"\0\0\0\x05HELLO");
    }

    #[test]
    fn empty_payload_is_header_only() {
        assert_eq!(frame_bytes(&[]).collect::<Vec<_>>(), vec![0, 0, 0, 0]);
    }
}
