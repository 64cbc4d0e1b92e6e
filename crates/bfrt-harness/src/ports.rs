//! Pipe and port arithmetic.
//!
//! A dev port encodes `(pipe, local_port)` as `(pipe << 7) | local_port`.

use bfrt_client::pktgen::Arch;

/// Builds a dev port from a pipe and a pipe-local port.
pub fn make_port(pipe: u8, local_port: u8) -> u32 {
    (u32::from(pipe) << 7) | u32::from(local_port)
}

/// The pipe a dev port belongs to.
pub fn port_to_pipe(dev_port: u32) -> u8 {
    (dev_port >> 7) as u8
}

/// The pipe-local part of a dev port.
pub fn port_to_local(dev_port: u32) -> u8 {
    (dev_port & 0x7F) as u8
}

/// The packet-generator source port of a pipe.
pub fn pktgen_port(arch: Arch, pipe: u8) -> u32 {
    make_port(pipe, arch.pktgen_local_port() as u8)
}

/// All pipe ids of a device with `num_pipes` pipes.
pub fn pipes(num_pipes: u8) -> impl Iterator<Item = u8> {
    0..num_pipes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_round_trip() {
        let port = make_port(2, 12);
        assert_eq!(port, (2 << 7) | 12);
        assert_eq!(port_to_pipe(port), 2);
        assert_eq!(port_to_local(port), 12);
    }

    #[test]
    fn test_pktgen_port() {
        assert_eq!(pktgen_port(Arch::Tofino, 0), 68);
        assert_eq!(pktgen_port(Arch::Tofino, 1), (1 << 7) | 68);
        assert_eq!(pktgen_port(Arch::Tofino2, 3), (3 << 7) | 6);
    }
}
