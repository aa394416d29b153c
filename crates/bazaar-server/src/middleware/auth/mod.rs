//! Authentication middleware for the Bazaar API server.

pub mod extractor;
pub mod jwt;
pub mod layer;
pub mod types;

pub use extractor::{Auth, Authorized};
pub use jwt::{IssuedToken, TokenService};
pub use layer::{AuthLayer, AuthMiddleware};
pub use types::{AuthUser, Claims};
