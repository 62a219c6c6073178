//! bestfit-core: best-fit fallback for legacy code page encoders.
//!
//! When an encoder meets a character its code page cannot represent, it asks
//! a fallback for a substitute. This crate provides the pieces of the
//! best-fit fallback, which substitutes the closest character the code page
//! does have:
//!
//! - [`MappingTable`]: sorted (source, replacement) pairs for one code page,
//!   with binary-search [`lookup`](MappingTable::lookup)
//! - [`BestFitFallback`]: a per-code-page provider that loads its table once,
//!   lazily, and shares it across threads
//! - [`BestFitBuffer`]: the per-episode [`FallbackBuffer`] an encoder pulls
//!   substitute characters from

pub mod buffer;
pub mod error;
pub mod options;
pub mod provider;
pub mod table;

pub use buffer::{BestFitBuffer, BufferState, FallbackBuffer, PLACEHOLDER};
pub use error::{FallbackError, HIGH_SURROGATE_RANGE, LOW_SURROGATE_RANGE, check_surrogate_pair};
pub use options::LoadOptions;
pub use provider::{BestFitFallback, BestFitSource};
pub use table::{BestFitPair, MappingTable};
