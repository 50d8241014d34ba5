use serde::{Deserialize, Serialize};

/// `modules.datasets.config`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetsConfig {
    /// Page size used when the client does not ask for one.
    pub default_page_size: u64,
    /// Upper bound on the page size a client may request.
    pub max_page_size: u64,
}

impl Default for DatasetsConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 1000,
        }
    }
}

impl DatasetsConfig {
    /// # Errors
    /// Fails on zero page sizes or a default above the maximum.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.default_page_size >= 1 && self.max_page_size >= 1,
            "datasets page sizes must be at least 1"
        );
        anyhow::ensure!(
            self.default_page_size <= self.max_page_size,
            "datasets.default_page_size ({}) exceeds max_page_size ({})",
            self.default_page_size,
            self.max_page_size
        );
        Ok(())
    }
}
