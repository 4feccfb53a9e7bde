mod fixed;
mod interface;
mod system;

pub use fixed::*;
pub use interface::*;
pub use system::*;
