use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
    pub admin: bool,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The identity the token asserts. Chat operations re-check it against the
    /// `users` table, whose `admin` flag decides the role.
    pub fn actor(&self) -> services::chat_policy::Actor {
        services::chat_policy::Actor {
            id: self.0.sub,
            admin: self.0.admin,
        }
    }
}
