//! bestfit-parse: best-fit table data for bestfit-core.
//!
//! Parses the Windows best-fit code page files, derives the Unicode →
//! Unicode [`MappingTable`](bestfit_core::MappingTable) a best-fit fallback
//! needs, and provides [`BestFitSource`](bestfit_core::BestFitSource)
//! implementations that read those files from disk or memory.

pub mod bestfit_file;
pub mod code_page;
pub mod error;
pub mod source;

pub use bestfit_core;
pub use bestfit_file::{BestFitFile, load_table, parse_bestfit};
pub use code_page::{code_page_for_label, encoding_for_code_page};
pub use error::ParseError;
pub use source::{DirectorySource, MemorySource};
