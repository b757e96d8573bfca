pub mod common;
pub mod order;
pub mod pagination;
pub mod profile;

pub use common::*;
pub use order::*;
pub use pagination::*;
pub use profile::*;
