//! Question name extraction and header validation over raw DNS messages.
//!
//! Only the pieces of the wire format the probe needs are decoded: the 16-bit flags field and
//! the name of the first question. Everything else is treated as opaque bytes and echoed back
//! by the [response synthesizer][crate::dns::response].

use crate::error::Error;

/// Size of the fixed DNS header in bytes.
pub const HEADER_LEN: usize = 12;

/// Offset of the first question's name, immediately after the header.
pub const QUESTION_OFFSET: usize = HEADER_LEN;

const FLAGS_OFFSET: usize = 2;
const MAX_LABEL_LEN: u8 = 63;

/// Bits that must be clear in a standard query: QR (`0x8000`) and the low nibble (`0x000F`).
pub const STANDARD_QUERY_MASK: u16 = 0x800F;

/// Read the big-endian `u16` at `offset`, if the message is long enough.
pub(crate) fn read_u16(message: &[u8], offset: usize) -> Option<u16> {
    let bytes = message.get(offset..offset + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

/// Returns the header flags field, or [`Error::MalformedMessage`] if the message is shorter than
/// a DNS header.
///
/// # Errors
///
/// Returns [`Error::MalformedMessage`] for messages under [`HEADER_LEN`] bytes.
pub fn flags(message: &[u8]) -> Result<u16, Error> {
    if message.len() < HEADER_LEN {
        return Err(Error::MalformedMessage(message.len()));
    }
    read_u16(message, FLAGS_OFFSET).ok_or(Error::MalformedMessage(message.len()))
}

/// Whether the message is a standard query: `(flags & 0x800F) == 0`.
///
/// This rejects responses (QR set) and anything with a non-zero low nibble. It is not a full
/// OPCODE decode: a non-zero opcode alone (bits 11-14) passes. Messages too short to carry a
/// flags field are not standard queries.
#[must_use]
pub fn is_standard_query(message: &[u8]) -> bool {
    match read_u16(message, FLAGS_OFFSET) {
        Some(flags) => flags & STANDARD_QUERY_MASK == 0,
        None => false,
    }
}

/// Extract the first question's name from a DNS message as dotted text.
///
/// Labels are copied as received, no case folding is done. A message whose first length byte
/// is zero yields the empty (root) name.
///
/// # Errors
///
/// - [`Error::MalformedMessage`] if the message is shorter than the header.
/// - [`Error::TruncatedName`] if a label or the terminating zero runs past the end of the
///   message.
/// - [`Error::LabelTooLong`] if a length byte is above 63.
/// - [`Error::DottedLabel`] if a label contains a `.` byte.
pub fn parse_domain(message: &[u8]) -> Result<String, Error> {
    if message.len() < HEADER_LEN {
        return Err(Error::MalformedMessage(message.len()));
    }

    let mut labels: Vec<String> = Vec::new();
    let mut cursor = QUESTION_OFFSET;
    loop {
        let len = *message.get(cursor).ok_or(Error::TruncatedName)?;
        if len == 0 {
            break;
        }
        if len > MAX_LABEL_LEN {
            return Err(Error::LabelTooLong(len));
        }
        let start = cursor + 1;
        let end = start + usize::from(len);
        let label = message.get(start..end).ok_or(Error::TruncatedName)?;
        if label.contains(&b'.') {
            return Err(Error::DottedLabel(String::from_utf8_lossy(label).into_owned()));
        }
        labels.push(String::from_utf8_lossy(label).into_owned());
        cursor = end;
    }
    Ok(labels.join("."))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a minimal one-question query: header with the given flags, the name, QTYPE A,
    /// QCLASS IN.
    pub(crate) fn query(id: u16, flags: u16, name: &str) -> Vec<u8> {
        let labels: Vec<&[u8]> = name
            .split('.')
            .filter(|l| !l.is_empty())
            .map(str::as_bytes)
            .collect();
        query_labels(id, flags, &labels)
    }

    /// Like [`query`], with the wire labels given verbatim.
    pub(crate) fn query_labels(id: u16, flags: u16, labels: &[&[u8]]) -> Vec<u8> {
        let mut msg = Vec::new();
        msg.extend_from_slice(&id.to_be_bytes());
        msg.extend_from_slice(&flags.to_be_bytes());
        msg.extend_from_slice(&[0, 1, 0, 0, 0, 0, 0, 0]);
        for label in labels {
            msg.push(u8::try_from(label.len()).unwrap());
            msg.extend_from_slice(label);
        }
        msg.push(0);
        msg.extend_from_slice(&[0, 1, 0, 1]);
        msg
    }

    #[test]
    fn test_parse_simple_name() {
        let msg = query(0x1234, 0x0100, "probe.example.com");
        assert_eq!(parse_domain(&msg).unwrap(), "probe.example.com");
    }

    #[test]
    fn test_labels_reencode_to_original_name() {
        for name in ["a", "www.example.com", "x.y.z.probe.example.com", "dash-ed.ex_ample.org"] {
            let msg = query(1, 0, name);
            let parsed = parse_domain(&msg).unwrap();
            assert_eq!(parsed, name);
            assert_eq!(query(1, 0, &parsed), msg);
        }
    }

    #[test]
    fn test_case_is_preserved() {
        let msg = query(7, 0, "PrObE.ExAmPlE.cOm");
        assert_eq!(parse_domain(&msg).unwrap(), "PrObE.ExAmPlE.cOm");
    }

    #[test]
    fn test_root_name_is_empty() {
        let msg = query(7, 0, "");
        assert_eq!(parse_domain(&msg).unwrap(), "");
    }

    #[test]
    fn test_short_message_is_malformed() {
        let msg = [0u8; 11];
        assert!(matches!(parse_domain(&msg), Err(Error::MalformedMessage(11))));
        assert!(matches!(flags(&msg), Err(Error::MalformedMessage(11))));
    }

    #[test]
    fn test_header_only_is_truncated() {
        let msg = [0u8; 12];
        assert!(matches!(parse_domain(&msg), Err(Error::TruncatedName)));
    }

    #[test]
    fn test_label_past_end_is_truncated() {
        let mut msg = query(1, 0, "example.com");
        // Claim a 20 byte first label.
        msg[QUESTION_OFFSET] = 20;
        msg.truncate(QUESTION_OFFSET + 10);
        assert!(matches!(parse_domain(&msg), Err(Error::TruncatedName)));
    }

    #[test]
    fn test_missing_terminator_is_truncated() {
        let msg = query(1, 0, "example.com");
        // Cut just before the zero length label.
        let cut = QUESTION_OFFSET + 1 + 7 + 1 + 3;
        assert!(matches!(parse_domain(&msg[..cut]), Err(Error::TruncatedName)));
    }

    #[test]
    fn test_compression_pointer_in_question_rejected() {
        let mut msg = query(1, 0, "");
        msg[QUESTION_OFFSET] = 0xC0;
        msg.insert(QUESTION_OFFSET + 1, 0x0C);
        assert!(matches!(parse_domain(&msg), Err(Error::LabelTooLong(0xC0))));
    }

    #[test]
    fn test_dot_inside_label_rejected() {
        // Two labels, "x.example" and "com", would join to the three label x.example.com.
        let msg = query_labels(1, 0, &[&b"x.example"[..], &b"com"[..]]);
        assert!(matches!(
            parse_domain(&msg),
            Err(Error::DottedLabel(label)) if label == "x.example"
        ));
    }

    #[test]
    fn test_standard_query_flags() {
        // RD set.
        assert!(is_standard_query(&query(1, 0x0100, "a.b")));
        assert!(is_standard_query(&query(1, 0x0000, "a.b")));
        // Opcode bits alone pass the simplified check.
        assert!(is_standard_query(&query(1, 0x0800, "a.b")));
        // QR set.
        assert!(!is_standard_query(&query(1, 0x8000, "a.b")));
        assert!(!is_standard_query(&query(1, 0x8180, "a.b")));
        // Low nibble set.
        assert!(!is_standard_query(&query(1, 0x0001, "a.b")));
        assert!(!is_standard_query(&query(1, 0x000F, "a.b")));
    }

    #[test]
    fn test_standard_query_needs_flags_field() {
        assert!(!is_standard_query(&[0x12]));
        assert!(!is_standard_query(&[]));
    }

    #[test]
    fn test_flags_read_big_endian() {
        let msg = query(1, 0x0120, "a");
        assert_eq!(flags(&msg).unwrap(), 0x0120);
    }
}
