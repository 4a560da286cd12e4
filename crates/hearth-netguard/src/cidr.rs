use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::addr::{demap, strip_brackets};
use crate::error::CidrParseError;
use crate::matcher::prefix_match;

/// Bits covered by the `::ffff:0:0/96` IPv4-mapped block.
const MAPPED_PREFIX_BITS: u8 = 96;

/// Number of bits in an address of the given family.
pub fn family_bits(ip: &IpAddr) -> u8 {
    match ip {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

/// A network address paired with a prefix length.
///
/// The prefix length never exceeds the bit width of the address family.
/// Host bits below the prefix are kept as written (`10.1.2.3/24` stays
/// `10.1.2.3/24`); matching ignores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cidr {
    addr: IpAddr,
    prefix_len: u8,
}

impl Cidr {
    /// Build a range, rejecting prefix lengths wider than the family.
    pub fn new(addr: IpAddr, prefix_len: u8) -> Result<Self, CidrParseError> {
        let max = family_bits(&addr);
        if prefix_len > max {
            return Err(CidrParseError::PrefixOutOfRange {
                prefix: u32::from(prefix_len),
                max,
            });
        }
        Ok(Self { addr, prefix_len })
    }

    /// A single-host range (`/32` or `/128`).
    pub fn host(addr: IpAddr) -> Self {
        Self {
            addr,
            prefix_len: family_bits(&addr),
        }
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Rewrite an IPv4-mapped network to its IPv4 equivalent.
    ///
    /// `::ffff:a.b.c.d/N` becomes `a.b.c.d/(N-96)` when `N >= 96`. A shorter
    /// prefix reaches outside the mapped block and is left as IPv6, so it can
    /// never match a (demapped) IPv4 address.
    pub fn normalized(self) -> Self {
        match demap(self.addr) {
            IpAddr::V4(v4) if self.addr.is_ipv6() => {
                if self.prefix_len >= MAPPED_PREFIX_BITS {
                    Self {
                        addr: IpAddr::V4(v4),
                        prefix_len: self.prefix_len - MAPPED_PREFIX_BITS,
                    }
                } else {
                    self
                }
            }
            _ => self,
        }
    }

    /// Containment test. Addresses of the other family never match.
    ///
    /// Both sides are compared as given; callers normalize first.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        match (self.addr, ip) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                prefix_match(&ip.octets(), &net.octets(), self.prefix_len)
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                prefix_match(&ip.octets(), &net.octets(), self.prefix_len)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

impl FromStr for Cidr {
    type Err = CidrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cidr(s)
    }
}

/// Parse `address` or `address/prefix` notation.
///
/// A bare address gets the full-length prefix of its family. The prefix must
/// be plain decimal digits. Surrounding whitespace and one pair of brackets
/// around the address part (`[::1]/128`) are accepted. Mapped addresses are
/// returned as written; see [`Cidr::normalized`].
pub fn parse_cidr(input: &str) -> Result<Cidr, CidrParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CidrParseError::EmptyInput);
    }

    let (addr_part, prefix_part) = match input.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (input, None),
    };

    let addr: IpAddr = strip_brackets(addr_part)
        .parse()
        .map_err(|_| CidrParseError::InvalidAddress(addr_part.to_string()))?;

    let Some(prefix_part) = prefix_part else {
        return Ok(Cidr::host(addr));
    };

    if prefix_part.is_empty() || !prefix_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CidrParseError::InvalidPrefix(prefix_part.to_string()));
    }

    let max = family_bits(&addr);
    // digits-only input can still overflow u32; treat that as out of range
    let prefix: u32 = prefix_part
        .parse()
        .map_err(|_| CidrParseError::PrefixOutOfRange {
            prefix: u32::MAX,
            max,
        })?;
    let prefix = u8::try_from(prefix)
        .ok()
        .filter(|p| *p <= max)
        .ok_or(CidrParseError::PrefixOutOfRange { prefix, max })?;

    Cidr::new(addr, prefix)
}
