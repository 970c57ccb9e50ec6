pub mod adapters;
pub mod counted;
pub mod error;
pub mod iterated;
pub mod loops;
pub mod shape;
pub mod try_finally;
pub mod while_loop;

pub use adapters::{
    as_collector, as_collector_trailing, as_spreader, as_spreader_trailing, fold_arguments,
    fold_arguments_with, with_varargs,
};
pub use counted::{counted_loop, counted_loop_n};
pub use error::{ShapeError, ShapeResult};
pub use iterated::iterated_loop;
pub use loops::{loop_handle, loop_nullable, Clause};
pub use try_finally::try_finally;
pub use while_loop::{do_while_loop, while_loop};
