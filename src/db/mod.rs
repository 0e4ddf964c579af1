pub mod connection;
pub mod listings;
pub mod password_resets;
pub mod sessions;
pub mod users;

pub use connection::{init_db, Database};
