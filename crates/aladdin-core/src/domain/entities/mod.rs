pub mod descriptor;
pub mod resolved;

pub use descriptor::{ComponentDescriptor, ImageSpec};
pub use resolved::{ResolvedComponentConfig, ResolvedImage};
