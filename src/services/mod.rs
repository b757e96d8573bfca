pub mod order_service;
pub mod profile_service;

pub use order_service::*;
pub use profile_service::*;
