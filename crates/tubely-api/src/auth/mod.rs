//! Bearer-token authentication
//!
//! Access tokens are HS256 JWTs issued by the account service with issuer
//! `tubely-access`; the subject is the user id.

mod jwt;
mod middleware;
mod models;

pub use jwt::{AccessClaims, JwtService};
pub use middleware::{auth_middleware, bearer_token};
pub use models::AuthUser;
