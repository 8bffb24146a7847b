use crate::shared::Result;

/// OutputPresenter port for presenting final output
///
/// Abstracts the destination (stdout, file) of the formatted graph.
pub trait OutputPresenter {
    /// # Errors
    /// Returns an error if:
    /// - Writing to the output destination fails
    /// - The destination is a symlink or otherwise unsafe to write
    fn present(&self, content: &str) -> Result<()>;
}
