//! Opaque-cursor pagination for the session history endpoint.
//!
//! A cursor encodes the offset of the next page. Clients treat cursors as
//! opaque strings and hand them back verbatim to continue a listing.

use serde::Deserialize;

/// Page size used when the client does not send `count`.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound on the client-requested page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameters of a paginated request.
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    /// Cursor returned by a previous page, if any.
    pub cursor: Option<String>,
    /// Requested page size.
    pub count: Option<u32>,
}

impl PageQuery {
    /// Page size after applying the default and the `[1, MAX_PAGE_SIZE]` clamp.
    pub fn limit(&self) -> u32 {
        self.count.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Start offset recovered from the cursor.
    ///
    /// An absent or undecodable cursor starts the listing from the beginning
    /// rather than failing the request.
    pub fn offset(&self) -> u64 {
        match self.cursor.as_deref() {
            Some(cursor) => offset_from_cursor(cursor).unwrap_or(0),
            None => 0,
        }
    }
}

/// Wrap an offset in an opaque cursor.
pub fn cursor_for_offset(offset: u64) -> String {
    base64_encode(offset.to_string().as_bytes())
}

/// Recover the offset from a cursor produced by [`cursor_for_offset`].
pub fn offset_from_cursor(cursor: &str) -> Option<u64> {
    let decoded = base64_decode(cursor)?;
    String::from_utf8(decoded).ok()?.parse().ok()
}

/// Cursor for the page following one that started at `offset` and returned
/// `returned` items. A short page is the last page and yields `None`.
pub fn next_cursor(offset: u64, returned: usize, limit: u32) -> Option<String> {
    if (returned as u32) >= limit {
        Some(cursor_for_offset(offset + returned as u64))
    } else {
        None
    }
}

// Hand-rolled base64; cursors are this module's only consumer.

const BASE64_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn base64_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);
    for chunk in data.chunks(3) {
        let mut triple = 0u32;
        for (i, &byte) in chunk.iter().enumerate() {
            triple |= u32::from(byte) << (16 - 8 * i);
        }
        for slot in 0..4 {
            if slot <= chunk.len() {
                out.push(BASE64_CHARS[((triple >> (18 - 6 * slot)) & 0x3F) as usize] as char);
            } else {
                out.push('=');
            }
        }
    }
    out
}

fn base64_decode(input: &str) -> Option<Vec<u8>> {
    fn sextet(c: u8) -> Option<u32> {
        let v = match c {
            b'A'..=b'Z' => c - b'A',
            b'a'..=b'z' => c - b'a' + 26,
            b'0'..=b'9' => c - b'0' + 52,
            b'+' => 62,
            b'/' => 63,
            _ => return None,
        };
        Some(u32::from(v))
    }
    let digits: Vec<u32> = input
        .bytes()
        .filter(|&b| b != b'=')
        .map(sextet)
        .collect::<Option<_>>()?;
    let mut out = Vec::with_capacity(digits.len() * 3 / 4);
    for group in digits.chunks(4) {
        let mut window = 0u32;
        for (i, &digit) in group.iter().enumerate() {
            window |= digit << (18 - 6 * i);
        }
        let byte_count = match group.len() {
            4 => 3,
            3 => 2,
            2 => 1,
            // A lone trailing digit cannot encode a whole byte.
            _ => return None,
        };
        for i in 0..byte_count {
            out.push((window >> (16 - 8 * i)) as u8);
        }
    }
    Some(out)
}
