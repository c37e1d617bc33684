pub mod stats;
pub mod sync;
pub mod trie;
pub mod types;

pub use sync::{NameIndex, ProjectionSource};
pub use trie::PrefixIndex;
pub use types::*;
