pub mod password;
pub mod session;
pub mod token;
pub mod user;

pub use password::PasswordHasher;
pub use session::SessionManager;
pub use token::{Claims, TokenIssuer, TokenKind, TokenPair};
pub use user::User;
