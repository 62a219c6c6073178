//! bestfit: best-fit encoder fallback for legacy code pages.
//!
//! This is the public API facade crate. It re-exports types from
//! bestfit-core and bestfit-parse and adds a [`FallbackRegistry`] that
//! shares one provider per code page.
//!
//! # Architecture
//!
//! - **bestfit-core**: mapping tables, lookup, fallback buffers, providers
//! - **bestfit-parse**: best-fit file parsing and table sources
//! - **bestfit** (this crate): public API that ties everything together
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use bestfit::{FallbackBuffer, FallbackRegistry, MemorySource};
//!
//! let source = MemorySource::new().with_text(
//!     1252,
//!     "CODEPAGE 1252\nMBTABLE 1\n0x41 0x0041\nWCTABLE 1\n0x00c0 0x41\nENDCODEPAGE\n",
//! );
//! let registry = FallbackRegistry::new(Arc::new(source));
//! let provider = registry.provider(1252);
//!
//! let mut buffer = provider.create_buffer().unwrap();
//! buffer.fallback(0x00C0);
//! assert_eq!(buffer.next_char(), Some('A'));
//! assert_eq!(buffer.next_char(), None);
//! ```

pub mod registry;

pub use bestfit_core;
pub use bestfit_core::{
    BestFitBuffer, BestFitFallback, BestFitPair, BestFitSource, BufferState, FallbackBuffer,
    FallbackError, LoadOptions, MappingTable, PLACEHOLDER,
};
pub use bestfit_parse;
pub use bestfit_parse::{
    BestFitFile, DirectorySource, MemorySource, ParseError, code_page_for_label,
    encoding_for_code_page, load_table, parse_bestfit,
};
pub use registry::FallbackRegistry;
