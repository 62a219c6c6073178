//! Shared providers keyed by code page.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use bestfit_core::{BestFitFallback, BestFitSource};
use bestfit_parse::code_page_for_label;

/// Hands out one shared [`BestFitFallback`] per code page.
///
/// Every provider draws its table from the registry's source. Asking twice
/// for the same code page returns the same provider, so its table is
/// loaded once no matter how many encoders use it.
pub struct FallbackRegistry {
    source: Arc<dyn BestFitSource>,
    providers: Mutex<HashMap<u16, Arc<BestFitFallback>>>,
}

impl FallbackRegistry {
    /// Create a registry over `source`.
    pub fn new(source: Arc<dyn BestFitSource>) -> Self {
        Self {
            source,
            providers: Mutex::new(HashMap::new()),
        }
    }

    /// The provider for `code_page`, created on first request.
    ///
    /// Creating a provider does not load its table.
    pub fn provider(&self, code_page: u16) -> Arc<BestFitFallback> {
        let mut providers = self
            .providers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        providers
            .entry(code_page)
            .or_insert_with(|| Arc::new(BestFitFallback::new(code_page, self.source.clone())))
            .clone()
    }

    /// The provider for an encoding label such as `"windows-1252"`.
    ///
    /// Returns `None` if the label names no known code page.
    pub fn provider_for_label(&self, label: &str) -> Option<Arc<BestFitFallback>> {
        code_page_for_label(label).map(|code_page| self.provider(code_page))
    }

    /// Number of providers created so far.
    pub fn len(&self) -> usize {
        self.providers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no provider has been created.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Code pages whose tables are loaded, in ascending order.
    pub fn loaded_code_pages(&self) -> Vec<u16> {
        let providers = self
            .providers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut loaded: Vec<u16> = providers
            .values()
            .filter(|provider| provider.is_loaded())
            .map(|provider| provider.code_page())
            .collect();
        loaded.sort_unstable();
        loaded
    }
}

impl std::fmt::Debug for FallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackRegistry")
            .field("providers", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bestfit_core::{FallbackError, MappingTable};

    fn registry() -> FallbackRegistry {
        let source = |code_page: u16| -> Result<MappingTable, FallbackError> {
            match code_page {
                1250 | 1252 => MappingTable::from_flat(&[0x0100, 0x0041]),
                _ => Err(FallbackError::unavailable(code_page, "no data")),
            }
        };
        FallbackRegistry::new(Arc::new(source))
    }

    #[test]
    fn same_code_page_same_provider() {
        let registry = registry();
        let a = registry.provider(1252);
        let b = registry.provider(1252);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn different_code_pages_different_providers() {
        let registry = registry();
        let a = registry.provider(1252);
        let b = registry.provider(1250);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn provider_creation_is_lazy() {
        let registry = registry();
        assert!(registry.is_empty());
        let provider = registry.provider(1252);
        assert!(!provider.is_loaded());
        assert!(registry.loaded_code_pages().is_empty());

        provider.table().unwrap();
        assert_eq!(registry.loaded_code_pages(), vec![1252]);
    }

    #[test]
    fn failed_load_not_reported_as_loaded() {
        let registry = registry();
        assert!(registry.provider(437).table().is_err());
        assert!(registry.loaded_code_pages().is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn provider_for_label() {
        let registry = registry();
        let by_label = registry.provider_for_label("windows-1252").unwrap();
        assert!(Arc::ptr_eq(&by_label, &registry.provider(1252)));
        assert!(registry.provider_for_label("utf-8").is_none());
    }
}
