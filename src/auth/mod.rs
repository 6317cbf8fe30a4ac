//! Authentication and authorization module

pub mod hashid;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use hashid::{DecodeError, IdObfuscator};
pub use jwt::{Claims, JwtService, TokenError, TokenPair, TokenType};
pub use middleware::{extract_token, jwt_auth_middleware, require_roles, role_gate, AuthContext};
pub use password::PasswordHasher;
