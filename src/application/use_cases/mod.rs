/// Use cases module containing application business logic orchestration
mod resolve_graph;

pub use resolve_graph::ResolveGraphUseCase;
