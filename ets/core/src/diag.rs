//! Fire-and-forget diagnostics
//!
//! The runtime never depends on logging for correctness; with the `defmt`
//! feature disabled every diagnostic expands to nothing.

/// Emit an informational diagnostic via `defmt` when available
///
/// No-op without the `defmt` feature, so callers can log unconditionally.
/// The `cfg` resolves against the calling crate, which is why every member
/// crate forwards its own `defmt` feature.
#[macro_export]
macro_rules! ets_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::info!($($arg)*);
    }};
}
