/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (metadata service, file system, console).
pub mod dependency_repository;
pub mod formatter;
pub mod manifest_reader;
pub mod output_presenter;
pub mod progress_reporter;

pub use dependency_repository::{
    DependencyDataRepository, FetchOutcome, RawEdge, RawGraphData, RawNode, RawVersionKey,
};
pub use formatter::GraphFormatter;
pub use manifest_reader::ManifestReader;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
