mod identifier;
mod partition;
mod period;
mod prefix;
pub(crate) mod sequence;

pub use identifier::*;
pub use partition::*;
pub use period::*;
pub use prefix::*;
pub use sequence::MIN_WIDTH;
