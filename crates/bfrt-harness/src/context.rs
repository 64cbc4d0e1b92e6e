//! Per-run test context.
//!
//! One [`TestContext`] is built from parsed parameters and passed to every
//! scenario. It owns the seeded RNG and the switch-port list; the seed is
//! always logged so a failing run can be reproduced.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::info;

use crate::params::TestParams;
use crate::ports::make_port;

/// Pipe-local ports used for test traffic on each pipe.
const DEFAULT_LOCAL_PORTS: [u8; 4] = [0, 4, 8, 12];

/// Shared state of one test run.
pub struct TestContext {
    params: TestParams,
    seed: u64,
    rng: Mutex<StdRng>,
    swports: Vec<u32>,
}

impl TestContext {
    /// Builds a context, drawing and logging a fresh seed when none is set.
    pub fn new(params: TestParams) -> Self {
        let seed = params.test_seed.unwrap_or_else(|| rand::thread_rng().next_u64());
        info!(seed, "test context seed");
        let swports = (0..params.num_pipes)
            .flat_map(|pipe| DEFAULT_LOCAL_PORTS.map(|local| make_port(pipe, local)))
            .collect();
        Self {
            params,
            seed,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            swports,
        }
    }

    pub fn params(&self) -> &TestParams {
        &self.params
    }

    /// The seed this run executes under.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Dev ports available for test traffic, across all pipes.
    pub fn swports(&self) -> &[u32] {
        &self.swports
    }

    /// The n-th test port; panics past the end, which is a harness bug.
    pub fn swport(&self, index: usize) -> u32 {
        self.swports[index]
    }

    /// A uniformly random value from the seeded stream.
    pub fn random<T>(&self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.rng.lock().gen()
    }

    /// A random value in `[low, high)`.
    pub fn random_range(&self, low: u64, high: u64) -> u64 {
        self.rng.lock().gen_range(low..high)
    }

    /// A random unicast MAC string.
    pub fn random_mac(&self) -> String {
        let mut rng = self.rng.lock();
        let mut octets = [0u8; 6];
        rng.fill_bytes(&mut octets);
        // Clear multicast, set locally administered.
        octets[0] = (octets[0] & 0xFC) | 0x02;
        octets
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(":")
    }

    /// A random IPv4 address string.
    pub fn random_ipv4(&self) -> String {
        let v: u32 = self.rng.lock().gen();
        std::net::Ipv4Addr::from(v).to_string()
    }
}
