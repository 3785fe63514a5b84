//! Diagnostics.
//!
//! Routes through `defmt` on the embedded build (`defmt-logging` feature)
//! and through `tracing` on host builds (`std` feature, matching `sim`).
//! Neither is mandatory: building with neither feature compiles these calls
//! away to nothing.

use crate::error::{CorruptionError, PrepError};

#[inline]
pub(crate) fn prep_rejected(_err: PrepError) {
    #[cfg(feature = "defmt-logging")]
    defmt::warn!("prep_line rejected: {:?}", defmt::Debug2Format(&_err));
    #[cfg(all(feature = "std", not(feature = "defmt-logging")))]
    tracing::warn!(?_err, "prep_line rejected");
}

/// Logged exactly once per corruption event: callers guard repeat calls
/// with a swap so only the first reason is reported.
#[inline]
pub(crate) fn corruption_detected(_which: CorruptionError) {
    #[cfg(feature = "defmt-logging")]
    defmt::error!("sentinel mismatch: {:?}", defmt::Debug2Format(&_which));
    #[cfg(all(feature = "std", not(feature = "defmt-logging")))]
    tracing::error!(which = ?_which, "sentinel mismatch — memory corruption suspected");
}
