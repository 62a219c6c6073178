//! Per-code-page best-fit providers with lazy, shared table loading.
//!
//! A [`BestFitFallback`] owns the best-fit table of one code page. The table
//! is loaded from a [`BestFitSource`] the first time anyone needs it and is
//! then shared read-only by every buffer the provider creates, on any thread.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::buffer::BestFitBuffer;
use crate::error::FallbackError;
use crate::table::MappingTable;

/// Serializes first-time table loads across all providers.
static TABLE_LOAD_LOCK: Mutex<()> = Mutex::new(());

/// Supplies the best-fit table for a code page.
///
/// Implemented for closures, which is convenient for in-memory data:
///
/// ```
/// use std::sync::Arc;
/// use bestfit_core::{BestFitFallback, BestFitPair, FallbackError, MappingTable};
///
/// let source = |code_page: u16| -> Result<MappingTable, FallbackError> {
///     match code_page {
///         1252 => Ok(MappingTable::from_pairs(vec![BestFitPair::new(0x0100, 'A')])),
///         _ => Err(FallbackError::unavailable(code_page, "unknown code page")),
///     }
/// };
/// let provider = BestFitFallback::new(1252, Arc::new(source));
/// assert_eq!(provider.table().unwrap().lookup(0x0100), Some('A'));
/// ```
pub trait BestFitSource: Send + Sync {
    /// Load the table for `code_page`.
    ///
    /// Called at most once per provider on success. Must not load a table
    /// through another [`BestFitFallback`], since loads are serialized.
    ///
    /// # Errors
    ///
    /// Returns an error if the data for `code_page` is missing or malformed.
    fn load(&self, code_page: u16) -> Result<MappingTable, FallbackError>;
}

impl<F> BestFitSource for F
where
    F: Fn(u16) -> Result<MappingTable, FallbackError> + Send + Sync,
{
    fn load(&self, code_page: u16) -> Result<MappingTable, FallbackError> {
        self(code_page)
    }
}

/// The best-fit fallback for one code page.
///
/// Two providers are equal when their code pages are equal, whatever their
/// sources or load state, so providers can be cached and compared by code
/// page.
pub struct BestFitFallback {
    code_page: u16,
    source: Arc<dyn BestFitSource>,
    table: OnceLock<MappingTable>,
}

impl BestFitFallback {
    /// Create a provider that loads its table from `source` on first use.
    pub fn new(code_page: u16, source: Arc<dyn BestFitSource>) -> Self {
        Self {
            code_page,
            source,
            table: OnceLock::new(),
        }
    }

    /// Create a provider whose table is already loaded.
    pub fn from_table(code_page: u16, table: MappingTable) -> Self {
        let source = |code_page: u16| -> Result<MappingTable, FallbackError> {
            Err(FallbackError::unavailable(code_page, "provider has no source"))
        };
        Self {
            code_page,
            source: Arc::new(source),
            table: OnceLock::from(table),
        }
    }

    /// The code page this provider serves.
    pub fn code_page(&self) -> u16 {
        self.code_page
    }

    /// Returns true once the table has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    /// The best-fit table, loading it on first use.
    ///
    /// Concurrent first callers block on a process-wide lock; exactly one of
    /// them loads and the rest receive the published table.
    ///
    /// # Errors
    ///
    /// Returns the source's error if the table cannot be loaded. Nothing is
    /// cached on failure.
    pub fn table(&self) -> Result<&MappingTable, FallbackError> {
        if let Some(table) = self.table.get() {
            return Ok(table);
        }

        let _guard = TABLE_LOAD_LOCK
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = self.table.get() {
            return Ok(table);
        }

        let table = self.source.load(self.code_page)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            code_page = self.code_page,
            entries = table.len(),
            "loaded best-fit table"
        );
        Ok(self.table.get_or_init(|| table))
    }

    /// Create a buffer for one fallback episode, loading the table if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be loaded.
    pub fn create_buffer(&self) -> Result<BestFitBuffer<'_>, FallbackError> {
        self.table().map(BestFitBuffer::new)
    }

    /// Maximum number of characters a single-character fallback produces.
    pub fn max_char_count(&self) -> usize {
        1
    }
}

impl fmt::Debug for BestFitFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BestFitFallback")
            .field("code_page", &self.code_page)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

impl PartialEq for BestFitFallback {
    fn eq(&self, other: &Self) -> bool {
        self.code_page == other.code_page
    }
}

impl Eq for BestFitFallback {}

impl Hash for BestFitFallback {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code_page.hash(state);
    }
}
