/// ProgressReporter port for user feedback during resolution
///
/// Implementations must be shareable across threads: progress counters are
/// updated from the builder while the spinner runs on its own thread.
pub trait ProgressReporter: Send + Sync {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports how many packages are resolved out of those discovered so far
    ///
    /// `total` grows as the graph is explored.
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports an error or warning message
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);
}
