//! Conversions between host text and the engines' view of it.
//!
//! Engines report byte offsets into UTF-8. Hosts index text by code point,
//! and some hand it over as fixed-width UTF-32 units. Everything that crosses
//! that boundary goes through here; buffers are owned values so they are
//! released on every return path.

use crate::error::TranscodeError;

/// Decode fixed-width UTF-32 units into a `String`.
pub fn utf32_to_string(units: &[u32]) -> Result<String, TranscodeError> {
    let mut out = String::with_capacity(units.len());
    for (index, &value) in units.iter().enumerate() {
        match char::from_u32(value) {
            Some(c) => out.push(c),
            None => return Err(TranscodeError::InvalidCodePoint { index, value }),
        }
    }
    Ok(out)
}

/// Encode text as fixed-width UTF-32 units.
pub fn string_to_utf32(text: &str) -> Vec<u32> {
    text.chars().map(u32::from).collect()
}

/// Validate host bytes as UTF-8 without copying.
pub fn utf8_from_bytes(bytes: &[u8]) -> Result<&str, TranscodeError> {
    std::str::from_utf8(bytes).map_err(|e| TranscodeError::InvalidUtf8 { offset: e.valid_up_to() })
}

/// Maps UTF-8 byte offsets of one text to code-point offsets.
pub struct CodePointMap {
    // byte offset of every char; `None` when the text is ASCII
    starts: Option<Vec<usize>>,
    byte_len: usize,
}

impl CodePointMap {
    pub fn new(text: &str) -> Self {
        let starts = if text.is_ascii() {
            None
        } else {
            Some(text.char_indices().map(|(i, _)| i).collect())
        };
        CodePointMap { starts, byte_len: text.len() }
    }

    /// Code-point offset of `byte`, which must lie on a char boundary.
    pub fn code_point(&self, byte: usize) -> usize {
        debug_assert!(byte <= self.byte_len);
        match &self.starts {
            None => byte,
            Some(starts) => starts.partition_point(|&b| b < byte),
        }
    }

    /// Number of code points in the mapped text.
    pub fn len(&self) -> usize {
        self.code_point(self.byte_len)
    }

    pub fn is_empty(&self) -> bool {
        self.byte_len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf32_roundtrip_multibyte() {
        let s = "añ日😀";
        let units = string_to_utf32(s);
        assert_eq!(units, vec![0x61, 0xF1, 0x65E5, 0x1F600]);
        assert_eq!(utf32_to_string(&units).unwrap(), s);
    }

    #[test]
    fn utf32_rejects_surrogates_and_out_of_range() {
        assert_eq!(
            utf32_to_string(&[0x61, 0xD800]),
            Err(TranscodeError::InvalidCodePoint { index: 1, value: 0xD800 })
        );
        assert!(utf32_to_string(&[0x110000]).is_err());
    }

    #[test]
    fn utf8_validation_reports_offset() {
        assert_eq!(utf8_from_bytes(b"ab\xffc"), Err(TranscodeError::InvalidUtf8 { offset: 2 }));
        assert_eq!(utf8_from_bytes("é".as_bytes()).unwrap(), "é");
    }

    #[test]
    fn code_point_map_ascii_is_identity() {
        let m = CodePointMap::new("hello");
        assert_eq!(m.code_point(0), 0);
        assert_eq!(m.code_point(3), 3);
        assert_eq!(m.len(), 5);
    }

    #[test]
    fn code_point_map_multibyte() {
        // a(1) ñ(2) 日(3) 😀(4) b(1)
        let s = "añ日😀b";
        let m = CodePointMap::new(s);
        assert_eq!(m.code_point(0), 0);
        assert_eq!(m.code_point(1), 1);
        assert_eq!(m.code_point(3), 2);
        assert_eq!(m.code_point(6), 3);
        assert_eq!(m.code_point(10), 4);
        assert_eq!(m.code_point(s.len()), 5);
        assert_eq!(m.len(), 5);
        assert!(!m.is_empty());
    }
}
