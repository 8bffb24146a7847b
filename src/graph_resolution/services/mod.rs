pub mod graph_builder;
pub mod tree_renderer;
pub mod version_reconciler;

pub use graph_builder::{
    GraphBuilder, GraphBuilderOptions, ProgressCallback, DEFAULT_CONCURRENCY, MAX_CONCURRENCY,
};
pub use tree_renderer::{BranchStyle, TreeLine, TreeLines, TreeRenderer};
pub use version_reconciler::VersionReconciler;
