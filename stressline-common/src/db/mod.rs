//! Database initialization and shared experiment vocabulary

pub mod init;
pub mod models;

pub use init::*;
pub use models::*;
