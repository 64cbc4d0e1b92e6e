//! Minimal test-frame construction and field access.
//!
//! Scenarios only need simple, well-formed Ethernet/IPv4/TCP frames and a
//! way to compare what egressed against what was sent; anything beyond that
//! belongs to the dataplane library, not the harness.

use byteorder::{BigEndian, ByteOrder};

use bfrt_client::codec;

const ETHERTYPE_IPV4: u16 = 0x0800;
const IPPROTO_TCP: u8 = 6;

/// Builder for a simple TCP-in-IPv4 Ethernet frame.
#[derive(Debug, Clone)]
pub struct TcpPacket {
    pub eth_dst: String,
    pub eth_src: String,
    pub ip_src: String,
    pub ip_dst: String,
    pub ip_ttl: u8,
    pub tcp_sport: u16,
    pub tcp_dport: u16,
    pub payload_len: usize,
}

impl Default for TcpPacket {
    fn default() -> Self {
        Self {
            eth_dst: "00:01:02:03:04:05".to_string(),
            eth_src: "00:06:07:08:09:0a".to_string(),
            ip_src: "192.168.0.1".to_string(),
            ip_dst: "192.168.0.2".to_string(),
            ip_ttl: 64,
            tcp_sport: 1234,
            tcp_dport: 80,
            payload_len: 18,
        }
    }
}

impl TcpPacket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eth_dst(mut self, mac: impl Into<String>) -> Self {
        self.eth_dst = mac.into();
        self
    }

    pub fn eth_src(mut self, mac: impl Into<String>) -> Self {
        self.eth_src = mac.into();
        self
    }

    pub fn ip_dst(mut self, addr: impl Into<String>) -> Self {
        self.ip_dst = addr.into();
        self
    }

    pub fn ip_src(mut self, addr: impl Into<String>) -> Self {
        self.ip_src = addr.into();
        self
    }

    /// Serializes the frame. Panics on malformed addresses, which is a test
    /// authoring error.
    pub fn build(&self) -> Vec<u8> {
        let eth_dst = codec::encode_mac(&self.eth_dst).expect("bad eth_dst");
        let eth_src = codec::encode_mac(&self.eth_src).expect("bad eth_src");
        let ip_src = codec::encode_ipv4(&self.ip_src).expect("bad ip_src");
        let ip_dst = codec::encode_ipv4(&self.ip_dst).expect("bad ip_dst");

        let ip_len = 20 + 20 + self.payload_len;
        let mut frame = Vec::with_capacity(14 + ip_len);

        // Ethernet II
        frame.extend_from_slice(&eth_dst);
        frame.extend_from_slice(&eth_src);
        frame.extend_from_slice(&ETHERTYPE_IPV4.to_be_bytes());

        // IPv4 header
        let ip_start = frame.len();
        frame.push(0x45);
        frame.push(0);
        frame.extend_from_slice(&(ip_len as u16).to_be_bytes());
        frame.extend_from_slice(&[0, 0, 0, 0]); // id, flags/frag
        frame.push(self.ip_ttl);
        frame.push(IPPROTO_TCP);
        frame.extend_from_slice(&[0, 0]); // checksum placeholder
        frame.extend_from_slice(&ip_src);
        frame.extend_from_slice(&ip_dst);
        let ip_csum = checksum(&frame[ip_start..ip_start + 20]);
        BigEndian::write_u16(&mut frame[ip_start + 10..ip_start + 12], ip_csum);

        // TCP header
        let tcp_start = frame.len();
        frame.extend_from_slice(&self.tcp_sport.to_be_bytes());
        frame.extend_from_slice(&self.tcp_dport.to_be_bytes());
        frame.extend_from_slice(&[0; 8]); // seq, ack
        frame.push(0x50); // data offset
        frame.push(0x02); // SYN
        frame.extend_from_slice(&[0x20, 0x00]); // window
        frame.extend_from_slice(&[0, 0, 0, 0]); // checksum, urgent
        frame.extend(std::iter::repeat(0).take(self.payload_len));

        // TCP checksum over the pseudo header and segment.
        let tcp_len = frame.len() - tcp_start;
        let mut pseudo = Vec::with_capacity(12 + tcp_len);
        pseudo.extend_from_slice(&ip_src);
        pseudo.extend_from_slice(&ip_dst);
        pseudo.push(0);
        pseudo.push(IPPROTO_TCP);
        pseudo.extend_from_slice(&(tcp_len as u16).to_be_bytes());
        pseudo.extend_from_slice(&frame[tcp_start..]);
        let tcp_csum = checksum(&pseudo);
        BigEndian::write_u16(&mut frame[tcp_start + 16..tcp_start + 18], tcp_csum);

        frame
    }
}

/// RFC 1071 ones-complement checksum.
fn checksum(bytes: &[u8]) -> u16 {
    let mut sum = 0u32;
    for chunk in bytes.chunks(2) {
        let word = if chunk.len() == 2 {
            u32::from(BigEndian::read_u16(chunk))
        } else {
            u32::from(chunk[0]) << 8
        };
        sum = sum.wrapping_add(word);
    }
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    !(sum as u16)
}

/// Destination MAC of a frame.
pub fn eth_dst(frame: &[u8]) -> Option<&[u8]> {
    frame.get(0..6)
}

/// Source MAC of a frame.
pub fn eth_src(frame: &[u8]) -> Option<&[u8]> {
    frame.get(6..12)
}

/// IPv4 destination of a frame, when it carries IPv4.
pub fn ipv4_dst(frame: &[u8]) -> Option<[u8; 4]> {
    if frame.get(12..14)? != ETHERTYPE_IPV4.to_be_bytes() {
        return None;
    }
    frame.get(30..34)?.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_frame_layout() {
        let frame = TcpPacket::new()
            .eth_dst("22:22:22:22:22:22")
            .ip_dst("10.10.0.1")
            .build();
        assert_eq!(eth_dst(&frame).unwrap(), &[0x22; 6]);
        assert_eq!(ipv4_dst(&frame).unwrap(), [10, 10, 0, 1]);
        // 14 eth + 20 ip + 20 tcp + default payload
        assert_eq!(frame.len(), 14 + 20 + 20 + 18);
    }

    #[test]
    fn test_ip_header_checksum_valid() {
        let frame = TcpPacket::new().build();
        // A correct header sums to zero with its checksum in place.
        assert_eq!(checksum(&frame[14..34]), 0);
    }

    #[test]
    fn test_checksum_known_vector() {
        // Example header from RFC 1071 discussions.
        let header: [u8; 20] = [
            0x45, 0x00, 0x00, 0x73, 0x00, 0x00, 0x40, 0x00, 0x40, 0x11, 0x00, 0x00, 0xc0, 0xa8,
            0x00, 0x01, 0xc0, 0xa8, 0x00, 0xc7,
        ];
        assert_eq!(checksum(&header), 0xb861);
    }
}
