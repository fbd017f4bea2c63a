pub mod prober;
pub mod socket;

pub use prober::*;
pub use socket::*;
