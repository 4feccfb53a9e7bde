mod allocation;
mod basic;
#[cfg(test)]
mod tests;

pub use allocation::*;
pub use basic::*;
