use async_trait::async_trait;

use super::{CreateUserDto, GetUserDto, User, UserImage};
use crate::domain::product::NewImage;
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>>;
    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    /// Match either the username or the e-mail.
    async fn get_user_by_login(&self, login: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn count_users(&self) -> DomainResult<u64>;

    async fn update_user_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()>;
    async fn record_login(&self, id: &str) -> DomainResult<()>;

    /// Store a new profile picture, dropping the previous one.
    async fn set_image(&self, id: &str, image: NewImage) -> DomainResult<User>;
    /// Returns `false` if the user had no picture.
    async fn remove_image(&self, id: &str) -> DomainResult<bool>;
    async fn image(&self, id: &str) -> DomainResult<Option<UserImage>>;
}
