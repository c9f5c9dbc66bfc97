//! Dotted-quad node addresses.
//!
//! An [`Address`] is a 32-bit value packed big-endian from four octets. It is
//! the node identity used by the topology, so ordering and hashing are both
//! defined on the packed value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

const OCTET_COUNT: usize = 4;
const HIGHEST_OCTET: u32 = 255;

/// Errors that can occur while parsing dotted-quad text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    #[error("empty input is not a valid address")]
    Empty,

    #[error("expected 3 dots in '{input}', found {dots}")]
    DotCount { input: String, dots: usize },

    #[error("empty octet in '{input}'")]
    EmptyOctet { input: String },

    #[error("leading zeros are not allowed: '{octet}'")]
    LeadingZero { octet: String },

    #[error("negative octets are not allowed: '{octet}'")]
    Negative { octet: String },

    #[error("octet is not a number: '{octet}'")]
    NotANumber { octet: String },

    #[error("octet is out of range 0-255: '{octet}'")]
    OutOfRange { octet: String },
}

/// A node address in the topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(u32);

impl Address {
    /// Build an address from its four octets, most significant first
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Address(u32::from_be_bytes([a, b, c, d]))
    }

    /// The packed 32-bit value
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    /// The four octets, most significant first
    pub const fn octets(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

fn parse_octet(octet: &str, input: &str) -> Result<u32, AddressParseError> {
    if octet.is_empty() {
        return Err(AddressParseError::EmptyOctet { input: input.to_string() });
    }
    if octet.starts_with('-') {
        return Err(AddressParseError::Negative { octet: octet.to_string() });
    }
    if octet.starts_with('0') && octet.len() != 1 {
        return Err(AddressParseError::LeadingZero { octet: octet.to_string() });
    }
    // u32::from_str would accept a leading '+'
    if !octet.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AddressParseError::NotANumber { octet: octet.to_string() });
    }

    match octet.parse::<u32>() {
        Ok(value) if value <= HIGHEST_OCTET => Ok(value),
        _ => Err(AddressParseError::OutOfRange { octet: octet.to_string() }),
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(AddressParseError::Empty);
        }

        let dots = s.matches('.').count();
        if dots != OCTET_COUNT - 1 {
            return Err(AddressParseError::DotCount { input: s.to_string(), dots });
        }

        let mut packed = 0u32;
        for octet in s.split('.') {
            packed = (packed << 8) | parse_octet(octet, s)?;
        }

        Ok(Address(packed))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.octets();
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl From<u32> for Address {
    fn from(bits: u32) -> Self {
        Address(bits)
    }
}

impl From<Address> for u32 {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Self {
        Address(u32::from(ip))
    }
}

impl From<Address> for Ipv4Addr {
    fn from(address: Address) -> Self {
        Ipv4Addr::from(address.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_addresses() {
        assert_eq!("0.0.0.0".parse::<Address>().unwrap().to_bits(), 0);
        assert_eq!("255.255.255.255".parse::<Address>().unwrap().to_bits(), u32::MAX);
        assert_eq!("192.168.0.1".parse::<Address>().unwrap(), Address::new(192, 168, 0, 1));
        assert_eq!("10.0.0.1".parse::<Address>().unwrap().octets(), [10, 0, 0, 1]);
    }

    #[test]
    fn test_display_is_canonical() {
        let inputs = ["0.0.0.0", "1.2.3.4", "10.0.0.255", "192.168.100.7", "255.255.255.255"];
        for input in inputs {
            let address: Address = input.parse().unwrap();
            assert_eq!(address.to_string(), input);
            assert_eq!(address.to_string().parse::<Address>().unwrap(), address);
        }
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert_eq!("".parse::<Address>(), Err(AddressParseError::Empty));
        assert!(matches!("1.2.3".parse::<Address>(), Err(AddressParseError::DotCount { dots: 2, .. })));
        assert!(matches!("1.2.3.4.5".parse::<Address>(), Err(AddressParseError::DotCount { dots: 4, .. })));
        assert!(matches!("256.0.0.1".parse::<Address>(), Err(AddressParseError::OutOfRange { .. })));
        assert!(matches!("01.0.0.1".parse::<Address>(), Err(AddressParseError::LeadingZero { .. })));
        assert!(matches!("-1.0.0.1".parse::<Address>(), Err(AddressParseError::Negative { .. })));
        assert!(matches!("-0.0.0.1".parse::<Address>(), Err(AddressParseError::Negative { .. })));
        assert!(matches!("1..2.3".parse::<Address>(), Err(AddressParseError::EmptyOctet { .. })));
        assert!(matches!("1.2.3.".parse::<Address>(), Err(AddressParseError::EmptyOctet { .. })));
        assert!(matches!("a.b.c.d".parse::<Address>(), Err(AddressParseError::NotANumber { .. })));
        assert!(matches!("+1.2.3.4".parse::<Address>(), Err(AddressParseError::NotANumber { .. })));
        assert!(matches!("1.2.3.4)".parse::<Address>(), Err(AddressParseError::NotANumber { .. })));
        assert!(matches!("99999999999.0.0.1".parse::<Address>(), Err(AddressParseError::OutOfRange { .. })));
    }

    #[test]
    fn test_ordering_is_unsigned() {
        let low: Address = "127.255.255.255".parse().unwrap();
        let high: Address = "128.0.0.0".parse().unwrap();
        let top: Address = "255.0.0.0".parse().unwrap();
        assert!(low < high);
        assert!(high < top);

        let mut addresses = vec![top, low, high];
        addresses.sort();
        assert_eq!(addresses, vec![low, high, top]);
    }

    #[test]
    fn test_ipv4_conversions() {
        let ip = Ipv4Addr::new(172, 16, 4, 2);
        let address = Address::from(ip);
        assert_eq!(address, Address::new(172, 16, 4, 2));
        assert_eq!(Ipv4Addr::from(address), ip);
        assert_eq!(u32::from(address), u32::from(ip));
    }

    #[test]
    fn test_serde_uses_dotted_quad() {
        let address: Address = serde_yaml::from_str("\"10.1.2.3\"").unwrap();
        assert_eq!(address, Address::new(10, 1, 2, 3));
        assert_eq!(serde_json::to_string(&address).unwrap(), "\"10.1.2.3\"");
        assert!(serde_yaml::from_str::<Address>("\"10.01.2.3\"").is_err());
    }
}
