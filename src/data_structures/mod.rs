pub mod binary_heap;
pub mod forest_heap;
pub mod linear_heap;
pub mod matrix;
pub mod priority_queue;
pub mod radix_heap;
pub mod set_heap;

pub use matrix::Matrix;
pub use priority_queue::{HeapType, PriorityQueue};
