//! Device/pipe/direction addressing for table operations.

use bfrt_proto::bfrt::TargetDevice;

/// Pipe id addressing every pipe of the device.
pub const PIPE_ALL: u16 = 0xFFFF;

/// Traffic direction of a scoped operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Ingress,
    Egress,
    /// Both directions.
    #[default]
    All,
}

impl Direction {
    fn to_wire(self) -> u32 {
        match self {
            Direction::Ingress => 0,
            Direction::Egress => 1,
            Direction::All => 0xFF,
        }
    }

    fn from_wire(v: u32) -> Self {
        match v {
            0 => Direction::Ingress,
            1 => Direction::Egress,
            _ => Direction::All,
        }
    }
}

/// The scope of a single table operation: `(device_id, pipe_id, direction)`.
///
/// Immutable per call. `pipe_id == PIPE_ALL` targets every pipe; a specific
/// pipe id addresses a pipe-asymmetric scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    pub device_id: u32,
    pub pipe_id: u16,
    pub direction: Direction,
}

impl Target {
    /// All pipes, both directions.
    pub fn new(device_id: u32) -> Self {
        Self {
            device_id,
            pipe_id: PIPE_ALL,
            direction: Direction::All,
        }
    }

    /// Narrows the target to one pipe.
    pub fn with_pipe(mut self, pipe_id: u16) -> Self {
        self.pipe_id = pipe_id;
        self
    }

    /// Narrows the target to one direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Returns true if the target addresses all pipes.
    pub fn is_all_pipes(&self) -> bool {
        self.pipe_id == PIPE_ALL
    }

    pub(crate) fn to_proto(self) -> TargetDevice {
        TargetDevice {
            device_id: self.device_id,
            pipe_id: u32::from(self.pipe_id),
            direction: self.direction.to_wire(),
            prsr_id: 0xFF,
        }
    }

    pub(crate) fn from_proto(t: &TargetDevice) -> Self {
        Self {
            device_id: t.device_id,
            pipe_id: t.pipe_id as u16,
            direction: Direction::from_wire(t.direction),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dev {}", self.device_id)?;
        if self.is_all_pipes() {
            write!(f, "/all-pipes")?;
        } else {
            write!(f, "/pipe {}", self.pipe_id)?;
        }
        match self.direction {
            Direction::Ingress => write!(f, "/ingress"),
            Direction::Egress => write!(f, "/egress"),
            Direction::All => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_pipes_default() {
        let t = Target::new(0);
        assert!(t.is_all_pipes());
        assert_eq!(t.direction, Direction::All);
    }

    #[test]
    fn test_proto_round_trip() {
        let t = Target::new(1).with_pipe(2).with_direction(Direction::Egress);
        let p = t.to_proto();
        assert_eq!(p.pipe_id, 2);
        assert_eq!(p.direction, 1);
        assert_eq!(Target::from_proto(&p), t);
    }
}
