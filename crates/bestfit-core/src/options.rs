//! Options controlling how best-fit table data is loaded.

/// Options for loading best-fit table data from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadOptions {
    /// Maximum number of entries accepted in any one table section (default: 65,536).
    pub max_table_entries: usize,
    /// When true, recoverable data problems such as a section whose declared
    /// count disagrees with its contents are errors instead of warnings
    /// (default: false).
    pub strict: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_table_entries: 65_536,
            strict: false,
        }
    }
}

impl LoadOptions {
    /// Options that reject any inconsistency in the table data.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}
