//! Sync pass reporting and statistics

use super::SyncResult;

/// Sync pass reporter
pub struct SyncReporter;

impl SyncReporter {
    /// Generate a summary report
    #[must_use]
    pub fn generate_summary(result: &SyncResult) -> String {
        let mut output = String::new();

        output.push_str("\n=== Sync Summary ===\n");
        output.push_str(&format!("Created:  {}\n", result.created));
        output.push_str(&format!("Updated:  {}\n", result.updated));
        output.push_str(&format!("Deleted:  {}\n", result.deleted));

        if !result.errors.is_empty() {
            output.push_str(&format!("\nErrors ({}):\n", result.errors.len()));
            for error in &result.errors {
                output.push_str(&format!("  - {error}\n"));
            }
        }

        output.push_str(&format!(
            "\nTotal operations: {}\n",
            result.total_operations()
        ));

        if result.interrupted {
            output.push_str("Status: interrupted\n");
        } else if result.is_success() {
            output.push_str("Status: ✓ Success\n");
        } else {
            output.push_str("Status: ✗ Completed with errors\n");
        }

        output
    }

    /// One-line summary suitable for a log record
    #[must_use]
    pub fn one_line(result: &SyncResult) -> String {
        format!(
            "created={} updated={} deleted={} errors={}{}",
            result.created,
            result.updated,
            result.deleted,
            result.errors.len(),
            if result.interrupted { " (interrupted)" } else { "" }
        )
    }
}
