use async_trait::async_trait;
use chrono::Utc;
use factura_auth::Role;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

use crate::domain::error::DomainError;
use crate::domain::model::{NewUser, PendingCredential, User};
use crate::domain::repo::{PendingCredentials, UsersRepository};

use super::entities::{pending_credential, user};

pub struct SeaOrmUsersRepository {
    db: DatabaseConnection,
}

impl SeaOrmUsersRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn role_from_db(role: &str) -> Result<Role, DomainError> {
    match role {
        "admin" => Ok(Role::Admin),
        "seller" => Ok(Role::Seller),
        other => Err(DomainError::database(format!(
            "unknown role in user store: {other}"
        ))),
    }
}

fn user_to_domain(model: user::Model) -> Result<User, DomainError> {
    Ok(User {
        id: model.id,
        username: model.username,
        password_hash: model.password_hash,
        role: role_from_db(&model.role)?,
        display_name: model.display_name,
        created_at: model.created_at,
    })
}

#[async_trait]
impl UsersRepository for SeaOrmUsersRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        found.map(user_to_domain).transpose()
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    async fn insert(&self, new: NewUser) -> Result<User, DomainError> {
        let model = user::ActiveModel {
            username: Set(new.username),
            password_hash: Set(new.password_hash),
            role: Set(new.role.as_str().to_owned()),
            display_name: Set(new.display_name),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        user_to_domain(model.insert(&self.db).await?)
    }

    async fn update_password_hash(&self, id: i64, password_hash: &str) -> Result<(), DomainError> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::PasswordHash, Expr::value(password_hash))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(DomainError::user_not_found(id.to_string()));
        }
        Ok(())
    }

    async fn latest_seller(&self) -> Result<Option<User>, DomainError> {
        let found = user::Entity::find()
            .filter(user::Column::Role.eq(Role::Seller.as_str()))
            .order_by_desc(user::Column::Id)
            .one(&self.db)
            .await?;
        found.map(user_to_domain).transpose()
    }
}

/// SQLite-backed single-use secret store. The take is transactional: the
/// row returned is deleted before the call returns.
pub struct SeaOrmPendingCredentials {
    db: DatabaseConnection,
}

impl SeaOrmPendingCredentials {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn pending_to_domain(model: pending_credential::Model) -> PendingCredential {
    PendingCredential {
        username: model.username,
        password: model.password,
        created_at: model.created_at,
    }
}

#[async_trait]
impl PendingCredentials for SeaOrmPendingCredentials {
    async fn put(&self, username: &str, password: &str) -> Result<(), DomainError> {
        let model = pending_credential::ActiveModel {
            username: Set(username.to_owned()),
            password: Set(password.to_owned()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        pending_credential::Entity::insert(model)
            .on_conflict(
                OnConflict::column(pending_credential::Column::Username)
                    .update_columns([
                        pending_credential::Column::Password,
                        pending_credential::Column::CreatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn take_latest(&self) -> Result<Option<PendingCredential>, DomainError> {
        let txn = self.db.begin().await?;

        let found = pending_credential::Entity::find()
            .order_by_desc(pending_credential::Column::CreatedAt)
            .order_by_desc(pending_credential::Column::Id)
            .one(&txn)
            .await?;

        let Some(model) = found else {
            txn.commit().await?;
            return Ok(None);
        };

        pending_credential::Entity::delete_by_id(model.id)
            .exec(&txn)
            .await?;
        txn.commit().await?;

        Ok(Some(pending_to_domain(model)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::storage::migrations::Migrator;
    use sea_orm::{ConnectOptions, Database};
    use sea_orm_migration::MigratorTrait;

    async fn test_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        // A single connection keeps the in-memory database shared.
        options.max_connections(1);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    fn new_user(username: &str, role: Role) -> NewUser {
        NewUser {
            username: username.to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            role,
            display_name: "Someone".to_owned(),
        }
    }

    #[tokio::test]
    async fn insert_and_find_round_trips_role() {
        let db = test_db().await;
        let repo = SeaOrmUsersRepository::new(db);

        let created = repo.insert(new_user("admin", Role::Admin)).await.unwrap();
        assert!(created.id > 0);

        let found = repo.find_by_username("admin").await.unwrap().unwrap();
        assert_eq!(found.role, Role::Admin);
        assert_eq!(found.username, "admin");

        assert!(repo.find_by_username("ghost").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_password_hash_replaces_stored_hash() {
        let db = test_db().await;
        let repo = SeaOrmUsersRepository::new(db);
        let created = repo
            .insert(new_user("seller_20260806", Role::Seller))
            .await
            .unwrap();

        repo.update_password_hash(created.id, "$argon2id$new")
            .await
            .unwrap();
        let found = repo
            .find_by_username("seller_20260806")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.password_hash, "$argon2id$new");

        let missing = repo.update_password_hash(9999, "$argon2id$x").await;
        assert!(matches!(missing, Err(DomainError::UserNotFound { .. })));
    }

    #[tokio::test]
    async fn latest_seller_ignores_admins_and_picks_newest() {
        let db = test_db().await;
        let repo = SeaOrmUsersRepository::new(db);

        repo.insert(new_user("admin", Role::Admin)).await.unwrap();
        assert!(repo.latest_seller().await.unwrap().is_none());

        repo.insert(new_user("seller_20260805", Role::Seller))
            .await
            .unwrap();
        repo.insert(new_user("seller_20260806", Role::Seller))
            .await
            .unwrap();

        let latest = repo.latest_seller().await.unwrap().unwrap();
        assert_eq!(latest.username, "seller_20260806");
    }

    #[tokio::test]
    async fn put_overwrites_the_entry_for_a_username() {
        let db = test_db().await;
        let store = SeaOrmPendingCredentials::new(db);

        store.put("seller_20260806", "first").await.unwrap();
        store.put("seller_20260806", "second").await.unwrap();

        let taken = store.take_latest().await.unwrap().unwrap();
        assert_eq!(taken.username, "seller_20260806");
        assert_eq!(taken.password, "second");
        assert!(store.take_latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn take_latest_removes_what_it_returns() {
        let db = test_db().await;
        let store = SeaOrmPendingCredentials::new(db);

        store.put("admin", "aaaa").await.unwrap();
        store.put("seller_20260806", "bbbb").await.unwrap();

        let first = store.take_latest().await.unwrap().unwrap();
        assert_eq!(first.username, "seller_20260806");

        let second = store.take_latest().await.unwrap().unwrap();
        assert_eq!(second.username, "admin");

        assert!(store.take_latest().await.unwrap().is_none());
    }
}
