pub mod grid;
pub mod loader;
pub mod projection;
pub mod style;
pub mod world;

pub use grid::*;
pub use loader::*;
pub use projection::*;
pub use style::*;
pub use world::*;
