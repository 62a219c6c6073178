//! [`BestFitSource`] implementations backed by best-fit files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bestfit_core::{BestFitSource, FallbackError, LoadOptions, MappingTable};

use crate::bestfit_file::load_table;

/// Loads `bestfit<code page>.txt` files from a directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    options: LoadOptions,
}

impl DirectorySource {
    /// Read best-fit files from `dir` with default options.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            options: LoadOptions::default(),
        }
    }

    /// Use `options` when parsing.
    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    /// The directory files are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file for `code_page`.
    pub fn path_for(&self, code_page: u16) -> PathBuf {
        self.dir.join(format!("bestfit{code_page}.txt"))
    }
}

impl BestFitSource for DirectorySource {
    fn load(&self, code_page: u16) -> Result<MappingTable, FallbackError> {
        let path = self.path_for(code_page);
        let text = std::fs::read_to_string(&path).map_err(|e| {
            FallbackError::unavailable(code_page, format!("{}: {e}", path.display()))
        })?;
        Ok(load_table(&text, code_page, &self.options)?)
    }
}

/// Holds best-fit file texts in memory, keyed by code page.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    texts: HashMap<u16, String>,
    options: LoadOptions,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `options` when parsing.
    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    /// Add the best-fit file text for `code_page`.
    pub fn with_text(mut self, code_page: u16, text: impl Into<String>) -> Self {
        self.insert(code_page, text);
        self
    }

    /// Add or replace the best-fit file text for `code_page`.
    pub fn insert(&mut self, code_page: u16, text: impl Into<String>) {
        self.texts.insert(code_page, text.into());
    }

    /// Returns true if text for `code_page` is present.
    pub fn contains(&self, code_page: u16) -> bool {
        self.texts.contains_key(&code_page)
    }
}

impl BestFitSource for MemorySource {
    fn load(&self, code_page: u16) -> Result<MappingTable, FallbackError> {
        let text = self
            .texts
            .get(&code_page)
            .ok_or_else(|| FallbackError::unavailable(code_page, "no best-fit data"))?;
        Ok(load_table(text, code_page, &self.options)?)
    }
}
