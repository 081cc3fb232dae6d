pub mod error;
pub mod consts;
pub mod buffer;
pub mod sched;
pub mod filters;
pub mod io;
pub mod pipeline;
