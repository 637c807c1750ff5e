/// Capacity of the native text-input buffer, terminator included.
pub const TEXT_INPUT_SIZE: usize = 32;

/// Decode a NUL-terminated native UTF-8 buffer into `out`.
///
/// Reads at most `max_len` bytes and stops at the first NUL; the terminator is
/// never emitted. Malformed sequences decode to U+FFFD. Returns the number of
/// chars appended.
pub fn decode_text_input(buf: &[u8], max_len: usize, out: &mut Vec<char>) -> usize {
    let bytes = nul_terminated(buf, max_len);
    if bytes.is_empty() {
        return 0;
    }

    let before = out.len();
    match std::str::from_utf8(bytes) {
        Ok(s) => out.extend(s.chars()),
        Err(_) => out.extend(String::from_utf8_lossy(bytes).chars()),
    }
    out.len() - before
}

/// Decode a NUL-terminated native string (e.g. a dropped file path).
pub fn decode_native_string(buf: &[u8]) -> String {
    String::from_utf8_lossy(nul_terminated(buf, buf.len())).into_owned()
}

#[inline]
fn nul_terminated(buf: &[u8], max_len: usize) -> &[u8] {
    let limit = buf.len().min(max_len);
    let end = buf[..limit].iter().position(|&b| b == 0).unwrap_or(limit);
    &buf[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_byte_char_in_small_buffer() {
        let mut buf = [0u8; 8];
        buf[..2].copy_from_slice("é".as_bytes());

        let mut out = Vec::new();
        assert_eq!(decode_text_input(&buf, buf.len(), &mut out), 1);
        assert_eq!(out, vec!['é']);
    }

    #[test]
    fn stops_at_max_len_without_terminator() {
        let buf = *b"abcdef";
        let mut out = Vec::new();
        assert_eq!(decode_text_input(&buf, 4, &mut out), 4);
        assert_eq!(out, vec!['a', 'b', 'c', 'd']);
    }

    #[test]
    fn empty_and_leading_nul_produce_nothing() {
        let mut out = Vec::new();
        assert_eq!(decode_text_input(&[], TEXT_INPUT_SIZE, &mut out), 0);
        assert_eq!(decode_text_input(&[0, b'a'], TEXT_INPUT_SIZE, &mut out), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn appends_in_arrival_order() {
        let mut out = vec!['x'];
        decode_text_input(b"hi\0zz", TEXT_INPUT_SIZE, &mut out);
        assert_eq!(out, vec!['x', 'h', 'i']);
    }

    #[test]
    fn malformed_utf8_is_replaced() {
        let mut out = Vec::new();
        decode_text_input(&[b'a', 0xFF, b'b', 0], TEXT_INPUT_SIZE, &mut out);
        assert_eq!(out, vec!['a', '\u{FFFD}', 'b']);
    }

    #[test]
    fn native_string_stops_at_nul() {
        assert_eq!(decode_native_string(b"/tmp/a.png\0junk"), "/tmp/a.png");
        assert_eq!(decode_native_string(b"/no/terminator"), "/no/terminator");
    }
}
