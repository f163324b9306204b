/// All errors produced by `ethersw`.
///
/// Variants fall into the two recoverable categories from the error
/// taxonomy: configuration errors (bad flag/value) and initialization
/// errors (NIC enumeration, capture open). Transient recv misses and
/// policy drops are not errors at all — they are handled inline by the
/// traffic loop and the CAM/multicast tables. Captured-length mismatches
/// and other programming-invariant violations are not represented here
/// either; they are fatal and unwind via `panic!`/`assert!`.
#[derive(thiserror::Error, Debug)]
pub enum SwitchError {
    #[error("invalid value for -{flag}: {reason}")]
    Config { flag: char, reason: String },

    #[error("device enumeration failed: {0}")]
    Enumeration(String),

    #[error("fewer than two valid interfaces available")]
    NotEnoughInterfaces,

    #[error("failed to open interface {name}: {reason}")]
    OpenFailed { name: String, reason: String },

    #[error("hardware address probe failed for {name}")]
    HwAddrUnavailable { name: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SwitchError {
    /// Process exit code for a top-level failure, per the startup-error
    /// contract: configuration and initialization failures both exit 1.
    pub fn exit_code(&self) -> u8 {
        1
    }
}
