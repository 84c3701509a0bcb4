/// Login session persisted between runs so the app can skip the login
/// screen while the token is still valid.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub token: String,
    pub user_id: String,
    pub name: String,
    pub role: String,
}
