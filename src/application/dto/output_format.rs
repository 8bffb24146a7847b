/// Output format enumeration for graph rendering
///
/// Both the CLI and the formatter factory need to agree on this set, so it
/// lives in the application layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Indented Unicode tree (default)
    #[default]
    Tree,
    /// ASCII tree with a resolution summary footer
    Text,
    /// Sorted, deduplicated coordinate list
    List,
    /// CycloneDX JSON document
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tree" => Ok(OutputFormat::Tree),
            "text" | "txt" => Ok(OutputFormat::Text),
            "list" => Ok(OutputFormat::List),
            "json" | "cyclonedx" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Invalid format: {}. Please specify 'tree', 'text', 'list' or 'json'",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Tree => write!(f, "tree"),
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::List => write!(f, "list"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
