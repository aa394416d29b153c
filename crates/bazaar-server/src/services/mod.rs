//! Domain services shared by handlers.

pub mod password;

pub use password::{hash_password, verify_password, verify_unknown_account};
