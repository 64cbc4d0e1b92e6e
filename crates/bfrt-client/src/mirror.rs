//! Typed wrapper for the mirror configuration table (`$mirror.cfg`).

use crate::data::DataTuple;
use crate::error::Result;
use crate::key::KeyTuple;
use crate::session::ClientInterface;
use crate::table::Table;
use crate::target::Target;

/// Direction a mirror session copies from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorDirection {
    Ingress,
    Egress,
    Both,
}

impl MirrorDirection {
    fn as_str(self) -> &'static str {
        match self {
            MirrorDirection::Ingress => "INGRESS",
            MirrorDirection::Egress => "EGRESS",
            MirrorDirection::Both => "BOTH",
        }
    }
}

/// Configuration of one normal (non-coalescing) mirror session.
#[derive(Debug, Clone)]
pub struct MirrorSessionConfig {
    pub session_id: u16,
    pub direction: MirrorDirection,
    pub ucast_egress_port: u32,
    /// Copies longer than this are truncated.
    pub max_pkt_len: u16,
    pub enable: bool,
}

/// Handle over the mirror configuration table.
pub struct Mirror {
    cfg: Table,
}

impl Mirror {
    pub async fn new(client: &ClientInterface) -> Result<Self> {
        Ok(Self {
            cfg: client.table("$mirror.cfg").await?,
        })
    }

    /// Creates a session under the `$normal` action.
    pub async fn session_add(&self, target: Target, config: &MirrorSessionConfig) -> Result<()> {
        let key = self
            .cfg
            .make_key(&[KeyTuple::exact("$sid", config.session_id)])?;
        let data = self.cfg.make_data(
            &[
                DataTuple::new("$session_enable", config.enable),
                DataTuple::new("$direction", config.direction.as_str()),
                DataTuple::new("$ucast_egress_port", config.ucast_egress_port),
                DataTuple::new("$ucast_egress_port_valid", true),
                DataTuple::new("$max_pkt_len", config.max_pkt_len),
            ],
            Some("$normal"),
        )?;
        self.cfg.entry_add(target, &[key], &[data]).await
    }

    pub async fn session_del(&self, target: Target, session_id: u16) -> Result<()> {
        let key = self.cfg.make_key(&[KeyTuple::exact("$sid", session_id)])?;
        self.cfg.entry_del(target, Some(&[key])).await
    }

    /// Reads a session back.
    pub async fn session_get(&self, target: Target, session_id: u16) -> Result<MirrorSessionConfig> {
        let key = self.cfg.make_key(&[KeyTuple::exact("$sid", session_id)])?;
        let mut entries = self.cfg.entry_get(target, Some(&[key]), false, None).await?;
        let (_, data) = entries.pop().ok_or_else(|| {
            crate::error::BfrtError::not_found(format!("mirror session {session_id} absent"))
        })?;
        let direction = match data.get_str("$direction")? {
            "INGRESS" => MirrorDirection::Ingress,
            "EGRESS" => MirrorDirection::Egress,
            _ => MirrorDirection::Both,
        };
        Ok(MirrorSessionConfig {
            session_id,
            direction,
            ucast_egress_port: data.get_int("$ucast_egress_port")? as u32,
            max_pkt_len: data.get_int("$max_pkt_len")? as u16,
            enable: data.get_bool("$session_enable")?,
        })
    }
}
