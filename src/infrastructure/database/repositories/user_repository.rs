use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{db_err, is_unique_violation};
use crate::domain::product::NewImage;
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, GetUserDto, User, UserImage, UserRepository,
    UserRole,
};
use crate::infrastructure::database::entities::{user, user_image};
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::Customer => UserRole::Customer,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Admin => user::UserRole::Admin,
        UserRole::Customer => user::UserRole::Customer,
    }
}

fn image_model_to_domain(model: user_image::Model) -> UserImage {
    UserImage {
        id: model.id,
        user_id: model.user_id,
        content_type: model.content_type,
        data: model.data,
        created_at: model.created_at,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        name: model.name,
        password_hash: model.password_hash,
        role: entity_role_to_domain(model.role),
        is_active: model.is_active,
        image_id: model.image_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
        last_login_at: model.last_login_at,
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = Utc::now();

        let new_user = user::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            username: Set(dto.username),
            email: Set(dto.email.to_lowercase()),
            name: Set(dto.name),
            password_hash: Set(dto.password_hash),
            role: Set(domain_role_to_entity(dto.role)),
            is_active: Set(true),
            image_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: Set(None),
        };

        let model = new_user.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::Conflict("Username or email already exists".to_string())
            } else {
                db_err(e)
            }
        })?;

        Ok(user_model_to_domain(model))
    }

    async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
        let pagination = PaginationParams::new(dto.page, dto.page_size);

        let mut query = user::Entity::find();

        if let Some(ref search) = dto.search {
            query = query.filter(
                Condition::any()
                    .add(user::Column::Username.contains(search))
                    .add(user::Column::Email.contains(search)),
            );
        }

        if let Some(role) = dto.role {
            query = query.filter(user::Column::Role.eq(domain_role_to_entity(role)));
        }

        query = match dto.sort_by.as_deref() {
            Some("username") => query.order_by_asc(user::Column::Username),
            Some("email") => query.order_by_asc(user::Column::Email),
            Some("role") => query.order_by_asc(user::Column::Role),
            _ => query.order_by_desc(user::Column::CreatedAt),
        };

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let models = query
            .offset(pagination.offset())
            .limit(pagination.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items = models.into_iter().map(user_model_to_domain).collect();

        Ok(PaginatedResult::new(items, total, pagination.page, pagination.limit))
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_login(&self, login: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(login))
                    .add(user::Column::Email.eq(login.to_lowercase())),
            )
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn count_users(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn update_user_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("User", "id", id))?;

        let mut active: user::ActiveModel = existing.into();
        active.password_hash = Set(new_password_hash.to_string());
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(db_err)?;

        Ok(())
    }

    async fn record_login(&self, id: &str) -> DomainResult<()> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("User", "id", id))?;

        let mut active: user::ActiveModel = existing.into();
        active.last_login_at = Set(Some(Utc::now()));
        active.update(&self.db).await.map_err(db_err)?;

        Ok(())
    }

    async fn set_image(&self, id: &str, image: NewImage) -> DomainResult<User> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = user::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("User", "id", id))?;

        user_image::Entity::delete_many()
            .filter(user_image::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let now = Utc::now();
        let image_id = uuid::Uuid::new_v4().to_string();
        user_image::ActiveModel {
            id: Set(image_id.clone()),
            user_id: Set(id.to_string()),
            content_type: Set(image.content_type),
            data: Set(image.data),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        let mut active: user::ActiveModel = existing.into();
        active.image_id = Set(Some(image_id));
        active.updated_at = Set(now);
        let model = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(user_model_to_domain(model))
    }

    async fn remove_image(&self, id: &str) -> DomainResult<bool> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let removed = user_image::Entity::delete_many()
            .filter(user_image::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?
            .rows_affected;

        user::Entity::update_many()
            .col_expr(user::Column::ImageId, Expr::value(Option::<String>::None))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(removed > 0)
    }

    async fn image(&self, id: &str) -> DomainResult<Option<UserImage>> {
        let model = user_image::Entity::find()
            .filter(user_image::Column::UserId.eq(id))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(image_model_to_domain))
    }
}
