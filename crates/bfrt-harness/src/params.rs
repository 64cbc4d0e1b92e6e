//! Command-line test parameters.
//!
//! Every scenario receives its configuration through an explicit
//! [`TestParams`] value; nothing is read from process-wide state. Defaults
//! match the common single-device model setup.

use clap::{Parser, ValueEnum};

use bfrt_client::pktgen::Arch;

/// Where the runtime under test lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetKind {
    /// Live hardware; gates tests that need a physical device.
    Hw,
    /// The software device model.
    AsicModel,
}

/// Device family selector accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ArchParam {
    Tofino,
    Tofino2,
}

impl From<ArchParam> for Arch {
    fn from(p: ArchParam) -> Self {
        match p {
            ArchParam::Tofino => Arch::Tofino,
            ArchParam::Tofino2 => Arch::Tofino2,
        }
    }
}

/// Recognized test parameters.
#[derive(Debug, Clone, Parser)]
#[command(name = "bfrt-harness", about = "BfRuntime conformance test parameters")]
pub struct TestParams {
    /// Device family; selects pipe layout and packet-gen header encoding.
    #[arg(long, value_enum, default_value = "tofino")]
    pub arch: ArchParam,

    /// Number of pipes on the device.
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub num_pipes: u8,

    /// Runtime flavor under test.
    #[arg(long, value_enum, default_value = "asic-model")]
    pub target: TargetKind,

    /// Random seed; a fresh one is drawn and logged when unset.
    #[arg(long)]
    pub test_seed: Option<u64>,

    /// Where the runtime picks pipeline artifacts from.
    #[arg(long, default_value = "/tmp/bfrt-artifacts")]
    pub base_pick_path: String,

    /// Where pushed pipeline artifacts are placed.
    #[arg(long, default_value = "/tmp/bfrt-artifacts")]
    pub base_put_path: String,

    /// gRPC endpoint of the runtime.
    #[arg(long, default_value = "http://127.0.0.1:50052")]
    pub grpc_addr: String,

    /// Device id under test.
    #[arg(long, default_value_t = 0)]
    pub device_id: u32,
}

impl Default for TestParams {
    fn default() -> Self {
        // Defaults mirror the argument declarations.
        Self::parse_from(["bfrt-harness"])
    }
}

impl TestParams {
    /// True when the scenario needs live hardware.
    pub fn on_hardware(&self) -> bool {
        self.target == TargetKind::Hw
    }

    pub fn arch(&self) -> Arch {
        self.arch.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = TestParams::default();
        assert_eq!(params.num_pipes, 4);
        assert_eq!(params.arch(), Arch::Tofino);
        assert_eq!(params.target, TargetKind::AsicModel);
        assert!(params.test_seed.is_none());
    }

    #[test]
    fn test_parse_overrides() {
        let params = TestParams::parse_from([
            "bfrt-harness",
            "--arch",
            "tofino2",
            "--num-pipes",
            "2",
            "--test-seed",
            "42",
            "--target",
            "hw",
        ]);
        assert_eq!(params.arch(), Arch::Tofino2);
        assert_eq!(params.num_pipes, 2);
        assert_eq!(params.test_seed, Some(42));
        assert!(params.on_hardware());
    }

    #[test]
    fn test_num_pipes_range_enforced() {
        let result = TestParams::try_parse_from(["bfrt-harness", "--num-pipes", "5"]);
        assert!(result.is_err());
    }
}
