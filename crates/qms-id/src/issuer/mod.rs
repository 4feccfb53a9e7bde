mod interface;
mod lock;
mod retry;

pub use interface::*;
pub use lock::*;
pub use retry::*;
