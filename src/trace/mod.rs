pub mod resolve;
pub mod tracer;

pub use resolve::*;
pub use tracer::*;
