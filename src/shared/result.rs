/// Crate-wide Result alias over `anyhow::Error`.
///
/// Typed failures are `DepGraphError` values wrapped inside the anyhow error.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
