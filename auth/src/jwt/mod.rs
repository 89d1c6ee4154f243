pub mod claims;
pub mod errors;
pub mod handler;
pub mod service;

pub use claims::AccessClaims;
pub use claims::RefreshClaims;
pub use errors::TokenConfigError;
pub use errors::TokenError;
pub use handler::JwtHandler;
pub use service::TokenService;
