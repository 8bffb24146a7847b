/// Formatter adapters for the supported output formats
mod cyclonedx_formatter;
mod list_formatter;
mod text_formatter;
mod tree_formatter;

pub use cyclonedx_formatter::{purl, CycloneDxFormatter};
pub use list_formatter::ListFormatter;
pub use text_formatter::TextFormatter;
pub use tree_formatter::TreeFormatter;
