pub mod cookie;
pub mod extractors;
pub mod jwt;
pub mod password;
pub mod reset;

pub use extractors::AuthUser;
pub use jwt::JwtKeys;
