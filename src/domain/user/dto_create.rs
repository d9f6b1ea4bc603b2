use super::UserRole;

/// Fields for a new account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub password_hash: String,
}
