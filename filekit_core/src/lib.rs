pub mod vfs;
pub mod comparator;
pub mod reporter;

pub use vfs::{LocalVfs, MemoryVfs};
pub use comparator::{TreeComparator, MOD_TIME_TOLERANCE};
pub use reporter::ResultReporter;
