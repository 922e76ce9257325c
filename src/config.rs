use std::env;
use std::str::FromStr;

use crate::error::{MdError, Result};

/// Edge length of the cache-resident benchmark box
pub const SMALL_EDGE: usize = 80;

/// Edge length of the memory-bound benchmark box
pub const LARGE_EDGE: usize = 400;

const DEFAULT_SEED: u64 = 0x5eed;

/// Which of the registered problem sizes to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeSelection {
    Small,
    Large,
    #[default]
    All,
}

impl SizeSelection {
    pub fn includes(&self, edge: usize) -> bool {
        match self {
            SizeSelection::Small => edge == SMALL_EDGE,
            SizeSelection::Large => edge == LARGE_EDGE,
            SizeSelection::All => true,
        }
    }
}

impl FromStr for SizeSelection {
    type Err = MdError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(SizeSelection::Small),
            "large" => Ok(SizeSelection::Large),
            "all" => Ok(SizeSelection::All),
            _ => Err(MdError::Config {
                key: "STENCIL_SIZES",
                value: s.to_string(),
            }),
        }
    }
}

/// Benchmark knobs read from the environment.
///
/// Iteration counts, sample sizes and output format stay with the
/// benchmark harness's own flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchConfig {
    /// Seed for the random fill
    pub seed: u64,
    pub sizes: SizeSelection,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            sizes: SizeSelection::All,
        }
    }
}

impl BenchConfig {
    /// Read `STENCIL_SEED` and `STENCIL_SIZES`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("STENCIL_SEED") {
            config.seed = v.trim().parse::<u64>().map_err(|_| MdError::Config {
                key: "STENCIL_SEED",
                value: v.clone(),
            })?;
        }

        if let Some(v) = lookup("STENCIL_SIZES") {
            config.sizes = v.parse()?;
        }

        log::debug!("bench config: {:?}", config);
        Ok(config)
    }
}
