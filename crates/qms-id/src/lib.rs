#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod allocator;
mod calendar;
mod category;
mod error;
mod id;
mod issuer;
mod mutex;
mod store;

pub use crate::allocator::*;
pub use crate::calendar::*;
pub use crate::category::*;
pub use crate::error::*;
pub use crate::id::*;
pub use crate::issuer::*;
pub use crate::store::*;
