//! Symmetric host↔wire value codecs.
//!
//! The wire form of every scalar is a big-endian byte string trimmed to the
//! field width (`ceil(bits / 8)` bytes). Host forms are the values a test
//! author writes: integers, MAC/IPv4/IPv6 strings, bools, doubles, UTF-8
//! identifiers and raw byte arrays. Which parser applies to a string value is
//! decided by the field's annotation kind.

use std::net::{Ipv4Addr, Ipv6Addr};

use byteorder::{BigEndian, ByteOrder};

use crate::error::{BfrtError, Result};

/// Semantic kind driving host↔wire conversion of a field.
///
/// Registered per field via the table annotation API; `Bytes` disables
/// string parsing entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Mac,
    Ipv4,
    Ipv6,
    Bytes,
}

impl FieldKind {
    /// Parses the annotation name used by test authors.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "mac" => Some(FieldKind::Mac),
            "ipv4" => Some(FieldKind::Ipv4),
            "ipv6" => Some(FieldKind::Ipv6),
            "bytes" => Some(FieldKind::Bytes),
            _ => None,
        }
    }
}

/// A host-side scalar value prior to wire encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Int(u64),
    Bool(bool),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
}

impl From<u64> for HostValue {
    fn from(v: u64) -> Self {
        HostValue::Int(v)
    }
}

impl From<u32> for HostValue {
    fn from(v: u32) -> Self {
        HostValue::Int(u64::from(v))
    }
}

impl From<u16> for HostValue {
    fn from(v: u16) -> Self {
        HostValue::Int(u64::from(v))
    }
}

impl From<u8> for HostValue {
    fn from(v: u8) -> Self {
        HostValue::Int(u64::from(v))
    }
}

impl From<bool> for HostValue {
    fn from(v: bool) -> Self {
        HostValue::Bool(v)
    }
}

impl From<f64> for HostValue {
    fn from(v: f64) -> Self {
        HostValue::Float(v)
    }
}

impl From<&str> for HostValue {
    fn from(v: &str) -> Self {
        HostValue::Str(v.to_string())
    }
}

impl From<String> for HostValue {
    fn from(v: String) -> Self {
        HostValue::Str(v)
    }
}

impl From<Vec<u8>> for HostValue {
    fn from(v: Vec<u8>) -> Self {
        HostValue::Bytes(v)
    }
}

impl From<&[u8]> for HostValue {
    fn from(v: &[u8]) -> Self {
        HostValue::Bytes(v.to_vec())
    }
}

/// Number of wire bytes for a field of `bits` width.
pub fn wire_width(bits: u16) -> usize {
    usize::from(bits).div_ceil(8)
}

/// Encodes an integer big-endian, trimmed to the field width.
///
/// Fails when the value does not fit in `bits`.
pub fn encode_int(value: u64, bits: u16) -> Result<Vec<u8>> {
    if bits == 0 || bits > 64 {
        return Err(BfrtError::invalid_argument(format!(
            "unsupported integer field width {bits}"
        )));
    }
    if bits < 64 && value >= (1u64 << bits) {
        return Err(BfrtError::invalid_argument(format!(
            "value {value} does not fit in {bits} bits"
        )));
    }
    let mut buf = [0u8; 8];
    BigEndian::write_u64(&mut buf, value);
    Ok(buf[8 - wire_width(bits)..].to_vec())
}

/// Decodes a big-endian byte string of at most 8 bytes into an integer.
pub fn decode_int(bytes: &[u8]) -> Result<u64> {
    if bytes.len() > 8 {
        return Err(BfrtError::invalid_argument(format!(
            "{}-byte value too wide for an integer decode",
            bytes.len()
        )));
    }
    let mut buf = [0u8; 8];
    buf[8 - bytes.len()..].copy_from_slice(bytes);
    Ok(BigEndian::read_u64(&buf))
}

/// Encodes a `hh:hh:hh:hh:hh:hh` MAC string, high-order octet first.
pub fn encode_mac(s: &str) -> Result<Vec<u8>> {
    let octets: Vec<&str> = s.split(':').collect();
    if octets.len() != 6 {
        return Err(BfrtError::invalid_argument(format!("bad MAC address {s:?}")));
    }
    octets
        .iter()
        .map(|o| {
            u8::from_str_radix(o, 16)
                .map_err(|_| BfrtError::invalid_argument(format!("bad MAC address {s:?}")))
        })
        .collect()
}

/// Formats 6 wire bytes as a MAC string.
pub fn decode_mac(bytes: &[u8]) -> Result<String> {
    if bytes.len() != 6 {
        return Err(BfrtError::invalid_argument(format!(
            "MAC field has {} bytes, expected 6",
            bytes.len()
        )));
    }
    Ok(bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":"))
}

/// Encodes a dotted-quad IPv4 string.
pub fn encode_ipv4(s: &str) -> Result<Vec<u8>> {
    let addr: Ipv4Addr = s
        .parse()
        .map_err(|_| BfrtError::invalid_argument(format!("bad IPv4 address {s:?}")))?;
    Ok(addr.octets().to_vec())
}

/// Formats 4 wire bytes as a dotted quad.
pub fn decode_ipv4(bytes: &[u8]) -> Result<String> {
    let octets: [u8; 4] = bytes.try_into().map_err(|_| {
        BfrtError::invalid_argument(format!("IPv4 field has {} bytes, expected 4", bytes.len()))
    })?;
    Ok(Ipv4Addr::from(octets).to_string())
}

/// Encodes an IPv6 string.
pub fn encode_ipv6(s: &str) -> Result<Vec<u8>> {
    let addr: Ipv6Addr = s
        .parse()
        .map_err(|_| BfrtError::invalid_argument(format!("bad IPv6 address {s:?}")))?;
    Ok(addr.octets().to_vec())
}

/// Formats 16 wire bytes in RFC 5952 form.
pub fn decode_ipv6(bytes: &[u8]) -> Result<String> {
    let octets: [u8; 16] = bytes.try_into().map_err(|_| {
        BfrtError::invalid_argument(format!("IPv6 field has {} bytes, expected 16", bytes.len()))
    })?;
    Ok(Ipv6Addr::from(octets).to_string())
}

/// Encodes a host value against a field of `bits` width and annotation kind.
///
/// Raw byte values must already match the wire width exactly; shorter inputs
/// are not padded, the mismatch is a test-authoring error.
pub fn encode_value(value: &HostValue, bits: u16, kind: Option<FieldKind>) -> Result<Vec<u8>> {
    let encoded = match (value, kind) {
        (HostValue::Str(s), Some(FieldKind::Mac)) => encode_mac(s)?,
        (HostValue::Str(s), Some(FieldKind::Ipv4)) => encode_ipv4(s)?,
        (HostValue::Str(s), Some(FieldKind::Ipv6)) => encode_ipv6(s)?,
        (HostValue::Str(s), _) => {
            // Unannotated strings auto-detect the address forms; this is
            // what lets `22:22:22:22:22:22` work without registration.
            if let Ok(v) = encode_mac(s) {
                v
            } else if let Ok(v) = encode_ipv4(s) {
                v
            } else if s.contains(':') {
                encode_ipv6(s)?
            } else {
                return Err(BfrtError::invalid_argument(format!(
                    "string value {s:?} needs a mac/ipv4/ipv6 annotation or address syntax"
                )));
            }
        }
        (HostValue::Int(v), _) => return encode_int(*v, bits),
        (HostValue::Bool(b), _) => vec![u8::from(*b)],
        (HostValue::Float(v), _) => v.to_be_bytes().to_vec(),
        (HostValue::Bytes(b), _) => b.clone(),
    };
    // Width 0 marks a variable-length byte field, e.g. the pktgen buffer.
    let want = wire_width(bits);
    if bits != 0 && encoded.len() != want {
        return Err(BfrtError::invalid_argument(format!(
            "encoded value is {} bytes, field takes {want}",
            encoded.len()
        )));
    }
    Ok(encoded)
}

/// Decodes a wire byte string back into its annotated host form.
pub fn decode_value(bytes: &[u8], kind: Option<FieldKind>) -> Result<HostValue> {
    match kind {
        Some(FieldKind::Mac) => Ok(HostValue::Str(decode_mac(bytes)?)),
        Some(FieldKind::Ipv4) => Ok(HostValue::Str(decode_ipv4(bytes)?)),
        Some(FieldKind::Ipv6) => Ok(HostValue::Str(decode_ipv6(bytes)?)),
        Some(FieldKind::Bytes) => Ok(HostValue::Bytes(bytes.to_vec())),
        None => {
            if bytes.len() <= 8 {
                Ok(HostValue::Int(decode_int(bytes)?))
            } else {
                Ok(HostValue::Bytes(bytes.to_vec()))
            }
        }
    }
}

/// Builds the byte mask selecting the first `prefix_len` bits of a field.
pub fn prefix_mask(prefix_len: u16, bits: u16) -> Result<Vec<u8>> {
    if prefix_len > bits {
        return Err(BfrtError::invalid_argument(format!(
            "prefix length {prefix_len} exceeds field width {bits}"
        )));
    }
    let width_bytes = wire_width(bits);
    let mut mask = vec![0u8; width_bytes];
    // The field's most significant bit sits after the byte-alignment padding.
    let pad = width_bytes * 8 - usize::from(bits);
    for i in 0..usize::from(prefix_len) {
        let bit = pad + i;
        mask[bit / 8] |= 0x80 >> (bit % 8);
    }
    Ok(mask)
}

/// Applies `mask` to `value` byte-wise, as the device does on read-back.
pub fn apply_mask(value: &[u8], mask: &[u8]) -> Vec<u8> {
    value.iter().zip(mask.iter()).map(|(v, m)| v & m).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_int_width_trimming() {
        assert_eq!(encode_int(0x11, 8).unwrap(), vec![0x11]);
        assert_eq!(encode_int(0x1234, 12).unwrap(), vec![0x12, 0x34]);
        assert_eq!(encode_int(1, 32).unwrap(), vec![0, 0, 0, 1]);
        assert_eq!(encode_int(u64::MAX, 64).unwrap(), vec![0xFF; 8]);
    }

    #[test]
    fn test_int_overflow_rejected() {
        assert!(encode_int(0x100, 8).is_err());
        assert!(encode_int(0x1000, 12).is_err());
    }

    #[test]
    fn test_int_round_trip() {
        for v in [0u64, 1, 0xFF, 0x1234, 0xFFFF_FFFF, u64::MAX] {
            let bits = 64;
            assert_eq!(decode_int(&encode_int(v, bits).unwrap()).unwrap(), v);
        }
    }

    #[test]
    fn test_mac_round_trip() {
        let wire = encode_mac("22:22:22:22:22:22").unwrap();
        assert_eq!(wire, vec![0x22; 6]);
        assert_eq!(decode_mac(&wire).unwrap(), "22:22:22:22:22:22");
    }

    #[test]
    fn test_mac_rejects_short() {
        assert!(encode_mac("22:22:22").is_err());
        assert!(encode_mac("gg:22:22:22:22:22").is_err());
    }

    #[test]
    fn test_ipv4_round_trip() {
        let wire = encode_ipv4("10.10.0.1").unwrap();
        assert_eq!(wire, vec![10, 10, 0, 1]);
        assert_eq!(decode_ipv4(&wire).unwrap(), "10.10.0.1");
    }

    #[test]
    fn test_ipv6_rfc5952_form() {
        let wire = encode_ipv6("2001:db8::1").unwrap();
        assert_eq!(wire.len(), 16);
        assert_eq!(decode_ipv6(&wire).unwrap(), "2001:db8::1");
    }

    #[test]
    fn test_annotated_string_encoding() {
        let v = HostValue::from("10.10.0.1");
        assert_eq!(
            encode_value(&v, 32, Some(FieldKind::Ipv4)).unwrap(),
            vec![10, 10, 0, 1]
        );
    }

    #[test]
    fn test_unannotated_string_autodetect() {
        let mac = HostValue::from("aa:bb:cc:dd:ee:ff");
        assert_eq!(encode_value(&mac, 48, None).unwrap().len(), 6);
        let v4 = HostValue::from("1.2.3.4");
        assert_eq!(encode_value(&v4, 32, None).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let v = HostValue::from("10.10.0.1");
        assert!(encode_value(&v, 16, Some(FieldKind::Ipv4)).is_err());
    }

    #[test]
    fn test_float_wire_form() {
        let v = HostValue::Float(2.5);
        let wire = encode_value(&v, 64, None).unwrap();
        assert_eq!(wire, 2.5f64.to_be_bytes().to_vec());
    }

    #[test]
    fn test_decode_value_by_kind() {
        assert_eq!(
            decode_value(&[10, 10, 0, 1], Some(FieldKind::Ipv4)).unwrap(),
            HostValue::Str("10.10.0.1".to_string())
        );
        assert_eq!(
            decode_value(&[0x22; 6], Some(FieldKind::Mac)).unwrap(),
            HostValue::Str("22:22:22:22:22:22".to_string())
        );
        assert_eq!(decode_value(&[0, 5], None).unwrap(), HostValue::Int(5));
        let wide = vec![1u8; 12];
        assert_eq!(
            decode_value(&wide, None).unwrap(),
            HostValue::Bytes(wide.clone())
        );
    }

    #[test]
    fn test_prefix_mask() {
        assert_eq!(prefix_mask(16, 32).unwrap(), vec![0xFF, 0xFF, 0, 0]);
        assert_eq!(prefix_mask(0, 32).unwrap(), vec![0, 0, 0, 0]);
        assert_eq!(prefix_mask(32, 32).unwrap(), vec![0xFF; 4]);
        // 12-bit field: the value sits in the low 12 bits of 2 wire bytes.
        assert_eq!(prefix_mask(12, 12).unwrap(), vec![0x0F, 0xFF]);
        assert_eq!(prefix_mask(8, 12).unwrap(), vec![0x0F, 0xF0]);
        assert!(prefix_mask(33, 32).is_err());
    }

    #[test]
    fn test_apply_mask() {
        assert_eq!(
            apply_mask(&[10, 10, 5, 5], &[0xFF, 0xFF, 0, 0]),
            vec![10, 10, 0, 0]
        );
    }
}
