//! Byte-exact `A` record response synthesis.
//!
//! A response is the request copied verbatim with four header fields rewritten, followed by a
//! single 16 byte answer record:
//!
//! ```text
//!  request bytes (header patched)                   answer record
//! +--------------------------------------------+----+----+----+--------+----+---------+
//! | ID | 8000 | QD | 0001 | 0000 | 0000 | Q... |C00C|0001|0001|00000E10|0004| a.b.c.d |
//! +--------------------------------------------+----+----+----+--------+----+---------+
//! ```
//!
//! The answer name is a compression pointer to offset 12, the first question's name. Nothing
//! after the header is reinterpreted, so any additional records in the request (e.g. an EDNS
//! `OPT` record) are carried as trailing question-section bytes while `ARCOUNT` is zeroed.

use crate::dns::codec::HEADER_LEN;
use crate::error::Error;
use std::net::{IpAddr, Ipv4Addr};

/// Size of the appended answer record in bytes.
pub const ANSWER_LEN: usize = 16;

/// TTL of every synthesized answer, in seconds.
pub const ANSWER_TTL: u32 = 3600;

const RESPONSE_FLAGS: u16 = 0x8000;
// Pointer to offset 12.
const NAME_POINTER: u16 = 0xC00C;
const TYPE_A: u16 = 0x0001;
const CLASS_IN: u16 = 0x0001;
const RDLENGTH_A: u16 = 0x0004;

const FLAGS_OFFSET: usize = 2;
const ANCOUNT_OFFSET: usize = 6;
const NSCOUNT_OFFSET: usize = 8;
const ARCOUNT_OFFSET: usize = 10;

/// The single `A` record appended to a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAnswer {
    pub domain: String,
    pub addr: Ipv4Addr,
    pub ttl: u32,
}

impl ResolvedAnswer {
    pub fn new(domain: impl Into<String>, addr: Ipv4Addr) -> Self {
        ResolvedAnswer {
            domain: domain.into(),
            addr,
            ttl: ANSWER_TTL,
        }
    }

    /// Answer `domain` with an address that must be IPv4.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] for IPv6 addresses.
    pub fn for_ip(domain: impl Into<String>, addr: IpAddr) -> Result<Self, Error> {
        Ok(Self::new(domain, require_ipv4(addr)?))
    }

    /// Answer `domain` with a dotted-quad address string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] unless `addr` is exactly four decimal octets in
    /// `0..=255`.
    pub fn parse(domain: impl Into<String>, addr: &str) -> Result<Self, Error> {
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| Error::InvalidAddress(addr.to_string()))?;
        Ok(Self::new(domain, addr))
    }
}

pub(crate) fn require_ipv4(addr: IpAddr) -> Result<Ipv4Addr, Error> {
    match addr {
        IpAddr::V4(v4) => Ok(v4),
        IpAddr::V6(_) => Err(Error::InvalidAddress(addr.to_string())),
    }
}

/// Build the response to `request` carrying `answer`.
///
/// The output is `request.len() + 16` bytes. The request is not modified.
///
/// # Errors
///
/// Returns [`Error::MalformedMessage`] if `request` is shorter than the DNS header.
pub fn build_response(request: &[u8], answer: &ResolvedAnswer) -> Result<Vec<u8>, Error> {
    if request.len() < HEADER_LEN {
        return Err(Error::MalformedMessage(request.len()));
    }

    let mut response = Vec::with_capacity(request.len() + ANSWER_LEN);
    response.extend_from_slice(request);

    put_u16(&mut response, FLAGS_OFFSET, RESPONSE_FLAGS);
    put_u16(&mut response, ANCOUNT_OFFSET, 1);
    put_u16(&mut response, NSCOUNT_OFFSET, 0);
    put_u16(&mut response, ARCOUNT_OFFSET, 0);

    response.extend_from_slice(&NAME_POINTER.to_be_bytes());
    response.extend_from_slice(&TYPE_A.to_be_bytes());
    response.extend_from_slice(&CLASS_IN.to_be_bytes());
    response.extend_from_slice(&answer.ttl.to_be_bytes());
    response.extend_from_slice(&RDLENGTH_A.to_be_bytes());
    response.extend_from_slice(&answer.addr.octets());

    Ok(response)
}

fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}
