//! Error types.

use std::net::SocketAddr;

/// Error enumerates the possible OOB Crab error states.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when a datagram is too short to hold the fixed 12 byte DNS header.
    #[error("message too short for a DNS header: {0} bytes")]
    MalformedMessage(usize),

    /// Returned when a datagram's header flags fail the standard query check, see
    /// [`is_standard_query`][crate::dns::codec::is_standard_query]. Holds the raw flags field.
    #[error("not a standard query: flags {0:#06x}")]
    NotAStandardQuery(u16),

    /// Returned when the question name runs past the end of the message before a terminating
    /// zero length label is found.
    #[error("question name is truncated")]
    TruncatedName,

    /// Returned when a question name label length byte is above 63. Compression pointers
    /// (`0xC0` and up) land here too, they have no place in a question name.
    #[error("question name label length {0} exceeds 63")]
    LabelTooLong(u8),

    /// Returned when a question name label contains a `.` byte. Joined as dotted text it
    /// would read as a different name with a different key.
    #[error("question name label contains a dot: \"{0}\"")]
    DottedLabel(String),

    /// Returned when an answer address can't be encoded as the four octets of an `A` record.
    #[error("invalid A record address: \"{0}\"")]
    InvalidAddress(String),

    /// Returned when a DNS response could not be sent back to the requester.
    #[error("failed to send response to {0}: {1}")]
    SendFailure(SocketAddr, std::io::Error),

    /// Returned when a callback request arrives without a usable `Host` header.
    #[error("missing or invalid Host header")]
    MissingHost,

    /// Returned when a generic IO error occurs.
    #[error("an IO error occurred")]
    IO(#[from] std::io::Error),

    /// Returned when [loading a `Config`][crate::config::Config::try_from_file] fails due to
    /// invalid JSON content.
    #[error("invalid JSON")]
    InvalidJSON(#[from] serde_json::Error),
}
