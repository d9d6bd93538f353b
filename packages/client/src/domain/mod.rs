//! Client-side domain: the locally known part of the tree and the thread
//! view navigating it.

mod error;
mod thread_view;
mod tree;

pub use error::NavigationError;
pub use thread_view::{MAX_THREAD_LENGTH, Side, ThreadView};
pub use tree::{MessageTree, TreeStore};
