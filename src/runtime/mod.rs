pub mod error;
pub mod handle;
pub mod invoker;
pub mod registry;
pub mod value;

pub use handle::Handle;
pub use invoker::{CallMode, Invoker};
pub use registry::{HandleResolver, Registry};
