pub mod batch;
pub mod dijkstra;
pub mod dispatch;
pub mod flows;
pub mod interaction;
pub mod tree;

pub use batch::Metric;
pub use dijkstra::ShortestPathEngine;
pub use dispatch::{CancellationToken, Dispatcher};
pub use tree::ShortestPathTree;
