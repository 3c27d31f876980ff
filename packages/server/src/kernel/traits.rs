// Trait definitions for dependency injection
//
// Infrastructure traits only, no business logic.
// Naming convention: Base* for trait names (e.g., BaseSheetsClient)

use anyhow::Result;
use async_trait::async_trait;
use sheets::SheetSpec;

// =============================================================================
// Spreadsheet Trait (Infrastructure - tabular mirror target)
// =============================================================================

#[async_trait]
pub trait BaseSheetsClient: Send + Sync {
    /// Obtain (or refresh) credentials for subsequent calls
    async fn authenticate(&self) -> Result<()>;

    /// Create a spreadsheet with the given sheets, returning its id
    async fn create_spreadsheet(&self, title: &str, sheets: &[SheetSpec]) -> Result<String>;

    /// Overwrite `range` with row-major values
    async fn write_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<()>;

    /// Clear all values in `range`
    async fn clear_range(&self, spreadsheet_id: &str, range: &str) -> Result<()>;
}
