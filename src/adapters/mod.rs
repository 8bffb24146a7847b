/// Adapters layer - Infrastructure implementations
///
/// Concrete implementations of the outbound ports: the deps.dev client,
/// filesystem readers and writers, formatters and console progress.
pub mod outbound;
