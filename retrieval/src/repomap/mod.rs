//! The code-map core (design docs §4.3-§4.7): tag graph, renderer, rankers, and the
//! orchestrator that ties them together behind a token budget.

pub mod budget;
pub mod graph;
pub mod important_files;
pub mod orchestrator;
pub mod pagerank;
pub mod rank;
pub mod renderer;
pub mod tree_context;

pub use graph::{build_tag_graph, only_defs, EdgeMeta, ParentChain, TagGraph};
pub use orchestrator::{RepoMap, SearchTermAdapter};
pub use rank::ArgRecord;
pub use renderer::{RenderEntry, Renderer};
