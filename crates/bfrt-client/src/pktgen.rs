//! Typed wrappers for the packet generator tables.
//!
//! A pktgen app is a programmable source of synthetic packets inside the
//! ASIC, triggered by a timer or a port-down event. The generated frame's
//! first six bytes (the dst-MAC position) encode the originating pipe, app,
//! batch and packet ids; the layout differs per device family.

use crate::data::DataTuple;
use crate::error::{BfrtError, Result};
use crate::key::KeyTuple;
use crate::session::ClientInterface;
use crate::table::Table;
use crate::target::Target;

/// Device family; selects pipe layout, table names, and header encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Arch {
    #[default]
    Tofino,
    Tofino2,
}

impl Arch {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "tofino" => Ok(Arch::Tofino),
            "tofino2" => Ok(Arch::Tofino2),
            other => Err(BfrtError::invalid_argument(format!(
                "unknown arch {other:?}"
            ))),
        }
    }

    fn app_cfg_table(self) -> &'static str {
        match self {
            Arch::Tofino => "tf1.pktgen.app_cfg",
            Arch::Tofino2 => "tf2.pktgen.app_cfg",
        }
    }

    fn port_cfg_table(self) -> &'static str {
        match self {
            Arch::Tofino => "tf1.pktgen.port_cfg",
            Arch::Tofino2 => "tf2.pktgen.port_cfg",
        }
    }

    fn pkt_buffer_table(self) -> &'static str {
        match self {
            Arch::Tofino => "tf1.pktgen.pkt_buffer",
            Arch::Tofino2 => "tf2.pktgen.pkt_buffer",
        }
    }

    /// Local port of each pipe's packet generator.
    pub fn pktgen_local_port(self) -> u32 {
        match self {
            Arch::Tofino => 68,
            Arch::Tofino2 => 6,
        }
    }
}

/// The ids a generated packet carries in its first six bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PktgenHeader {
    pub pipe: u8,
    pub app_id: u8,
    pub batch_id: u16,
    pub packet_id: u16,
}

impl PktgenHeader {
    /// Encodes the header at the dst-MAC position of a generated frame.
    pub fn encode(&self, arch: Arch) -> [u8; 6] {
        let b = self.batch_id.to_be_bytes();
        let p = self.packet_id.to_be_bytes();
        match arch {
            Arch::Tofino => [
                (self.pipe << 3) | (self.app_id & 0x07),
                0,
                b[0],
                b[1],
                p[0],
                p[1],
            ],
            Arch::Tofino2 => [self.app_id, self.pipe, b[0], b[1], p[0], p[1]],
        }
    }

    /// Decodes the header from the first six bytes of a received frame.
    pub fn decode(bytes: &[u8], arch: Arch) -> Result<Self> {
        if bytes.len() < 6 {
            return Err(BfrtError::invalid_argument(
                "frame too short for a pktgen header".to_string(),
            ));
        }
        let batch_id = u16::from_be_bytes([bytes[2], bytes[3]]);
        let packet_id = u16::from_be_bytes([bytes[4], bytes[5]]);
        Ok(match arch {
            Arch::Tofino => PktgenHeader {
                pipe: bytes[0] >> 3,
                app_id: bytes[0] & 0x07,
                batch_id,
                packet_id,
            },
            Arch::Tofino2 => PktgenHeader {
                pipe: bytes[1],
                app_id: bytes[0],
                batch_id,
                packet_id,
            },
        })
    }
}

/// What starts a configured app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PktgenTrigger {
    /// Fire every `timer_nanosec` nanoseconds.
    Timer { timer_nanosec: u32 },
    /// Fire when a port goes down.
    PortDown,
}

/// Configuration of one pktgen application.
#[derive(Debug, Clone)]
pub struct PktgenAppConfig {
    pub app_id: u8,
    pub trigger: PktgenTrigger,
    pub batch_count: u16,
    pub packets_per_batch: u16,
    /// Offset of the payload in the shared packet buffer.
    pub pkt_buffer_offset: u16,
    pub pkt_len: u16,
    /// Pipe-local source port the generated packets enter on.
    pub source_port: u32,
    pub enable: bool,
}

/// Handle over the pktgen app, port and buffer tables of one device family.
pub struct Pktgen {
    arch: Arch,
    app_cfg: Table,
    port_cfg: Table,
    pkt_buffer: Table,
}

impl Pktgen {
    pub async fn new(client: &ClientInterface, arch: Arch) -> Result<Self> {
        Ok(Self {
            arch,
            app_cfg: client.table(arch.app_cfg_table()).await?,
            port_cfg: client.table(arch.port_cfg_table()).await?,
            pkt_buffer: client.table(arch.pkt_buffer_table()).await?,
        })
    }

    pub fn arch(&self) -> Arch {
        self.arch
    }

    /// Enables generation on a pipe's pktgen port.
    pub async fn port_enable(&self, target: Target, dev_port: u32) -> Result<()> {
        let key = self.port_cfg.make_key(&[KeyTuple::exact("dev_port", dev_port)])?;
        let data = self
            .port_cfg
            .make_data(&[DataTuple::new("pktgen_enable", true)], None)?;
        self.port_cfg.entry_mod(target, &[key], &[data]).await
    }

    /// Writes payload bytes into the shared packet buffer.
    pub async fn buffer_write(&self, target: Target, offset: u16, payload: &[u8]) -> Result<()> {
        let key = self.pkt_buffer.make_key(&[
            KeyTuple::exact("pkt_buffer_offset", offset),
            KeyTuple::exact("pkt_buffer_size", payload.len() as u32),
        ])?;
        let data = self
            .pkt_buffer
            .make_data(&[DataTuple::new("buffer", payload.to_vec())], None)?;
        self.pkt_buffer.entry_mod(target, &[key], &[data]).await
    }

    /// Programs and arms one application.
    pub async fn app_configure(&self, target: Target, config: &PktgenAppConfig) -> Result<()> {
        let key = self
            .app_cfg
            .make_key(&[KeyTuple::exact("app_id", config.app_id)])?;
        let mut tuples = vec![
            DataTuple::new("batch_count_cfg", config.batch_count),
            DataTuple::new("packets_per_batch_cfg", config.packets_per_batch),
            DataTuple::new("pkt_len", config.pkt_len),
            DataTuple::new("pkt_buffer_offset", config.pkt_buffer_offset),
            DataTuple::new("pipe_local_source_port", config.source_port),
            DataTuple::new("app_enable", config.enable),
        ];
        let action = match config.trigger {
            PktgenTrigger::Timer { timer_nanosec } => {
                tuples.push(DataTuple::new("timer_nanosec", timer_nanosec));
                "trigger_timer_periodic"
            }
            PktgenTrigger::PortDown => "trigger_port_down",
        };
        let data = self.app_cfg.make_data(&tuples, Some(action))?;
        self.app_cfg.entry_mod(target, &[key], &[data]).await
    }

    /// Disarms one application.
    pub async fn app_disable(&self, target: Target, app_id: u8) -> Result<()> {
        let key = self.app_cfg.make_key(&[KeyTuple::exact("app_id", app_id)])?;
        let data = self
            .app_cfg
            .make_data(&[DataTuple::new("app_enable", false)], None)?;
        self.app_cfg.entry_mod(target, &[key], &[data]).await
    }

    /// Expected number of packets one trigger burst produces.
    pub fn packets_per_burst(config: &PktgenAppConfig) -> u32 {
        u32::from(config.batch_count) * u32::from(config.packets_per_batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_round_trip_tofino() {
        let hdr = PktgenHeader {
            pipe: 2,
            app_id: 5,
            batch_id: 3,
            packet_id: 1,
        };
        let bytes = hdr.encode(Arch::Tofino);
        assert_eq!(bytes[0], (2 << 3) | 5);
        assert_eq!(PktgenHeader::decode(&bytes, Arch::Tofino).unwrap(), hdr);
    }

    #[test]
    fn test_header_round_trip_tofino2() {
        let hdr = PktgenHeader {
            pipe: 1,
            app_id: 9,
            batch_id: 300,
            packet_id: 7,
        };
        let bytes = hdr.encode(Arch::Tofino2);
        assert_eq!(bytes[0], 9);
        assert_eq!(bytes[1], 1);
        assert_eq!(PktgenHeader::decode(&bytes, Arch::Tofino2).unwrap(), hdr);
    }

    #[test]
    fn test_header_decode_short_frame() {
        assert!(PktgenHeader::decode(&[0, 1, 2], Arch::Tofino).is_err());
    }

    #[test]
    fn test_arch_parse() {
        assert_eq!(Arch::parse("tofino").unwrap(), Arch::Tofino);
        assert_eq!(Arch::parse("tofino2").unwrap(), Arch::Tofino2);
        assert!(Arch::parse("tofino3").is_err());
    }

    #[test]
    fn test_pktgen_port() {
        assert_eq!(Arch::Tofino.pktgen_local_port(), 68);
        assert_eq!(Arch::Tofino2.pktgen_local_port(), 6);
    }
}
