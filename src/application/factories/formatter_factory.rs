use crate::adapters::outbound::formatters::{
    CycloneDxFormatter, ListFormatter, TextFormatter, TreeFormatter,
};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::GraphFormatter;

/// Factory for creating graph formatters
///
/// Selects the formatter adapter for an output format. `colored` only
/// affects the tree format; the others are plain text or JSON.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter instance for the specified output format
    ///
    /// # Examples
    /// ```
    /// use depgraph_sbom::application::dto::OutputFormat;
    /// use depgraph_sbom::application::factories::FormatterFactory;
    ///
    /// let formatter = FormatterFactory::create(OutputFormat::Tree, false);
    /// ```
    pub fn create(format: OutputFormat, colored: bool) -> Box<dyn GraphFormatter> {
        match format {
            OutputFormat::Tree => Box::new(TreeFormatter::new(colored)),
            OutputFormat::Text => Box::new(TextFormatter::new()),
            OutputFormat::List => Box::new(ListFormatter::new()),
            OutputFormat::Json => Box::new(CycloneDxFormatter::new()),
        }
    }

    /// Returns the progress message for the specified output format
    pub fn progress_message(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Tree => "📝 Rendering dependency tree...",
            OutputFormat::Text => "📝 Rendering text report...",
            OutputFormat::List => "📝 Generating package list...",
            OutputFormat::Json => "📝 Generating CycloneDX JSON format output...",
        }
    }
}
