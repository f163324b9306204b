//! Argument parsing: the collaborator the core never talks to
//! directly. Produces a validated [`Config`] or a `SwitchError::Config`.

use clap::Parser;

use crate::config::Config;
use crate::error::SwitchError;

/// A user-space learning Ethernet switch with IGMP snooping.
#[derive(Parser, Debug)]
#[command(name = "ethersw", version, about)]
pub struct Args {
    /// Minimum CAM entry TTL, in seconds.
    #[arg(short = 't', long = "min-ttl", default_value_t = crate::cam::DEFAULT_MIN_TTL_SECS)]
    pub min_ttl_seconds: u64,

    /// Aging sweep period, in seconds.
    #[arg(short = 'c', long = "cleanup-period", default_value_t = 1)]
    pub cleanup_period_seconds: u64,
}

impl Args {
    pub fn into_config(self) -> Result<Config, SwitchError> {
        Config {
            min_ttl_seconds: self.min_ttl_seconds,
            cleanup_period_seconds: self.cleanup_period_seconds,
        }
        .validate()
    }
}

/// Parse `argv`, mapping a clap usage/help exit straight through (clap
/// already prints and exits 0/2 on `--help`/bad syntax) and a
/// validation failure onto `SwitchError::Config`.
pub fn parse() -> Result<Config, SwitchError> {
    Args::parse().into_config()
}
