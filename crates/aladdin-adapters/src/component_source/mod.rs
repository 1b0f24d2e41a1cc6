//! Component source adapters.

mod local;
mod memory;

pub use local::LocalComponentSource;
pub use memory::MemoryComponentSource;
