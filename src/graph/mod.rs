pub mod traits;
pub mod directed;
pub mod edge_list;
pub mod generators;
pub mod vertex_map;

pub use traits::{EdgeRef, Graph};
pub use directed::DirectedGraph;
pub use edge_list::EdgeList;
pub use vertex_map::VertexMap;
pub use crate::data_structures::Matrix;
