use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use fifahub_auth_schema::{recovery_codes, users};

use crate::domain::repository::CredentialStore;
use crate::domain::types::{AuthUser, RecoveryCode};
use crate::error::AuthServiceError;

#[derive(Clone)]
pub struct DbCredentialStore {
    pub db: DatabaseConnection,
}

impl CredentialStore for DbCredentialStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &AuthUser) -> Result<(), AuthServiceError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            two_factor_secret: Set(user.two_factor_secret.clone()),
            two_factor_enabled: Set(user.two_factor_enabled),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AuthServiceError::EmailInUse)
            }
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn set_pending_secret(
        &self,
        user_id: Uuid,
        encrypted_secret: &str,
    ) -> Result<(), AuthServiceError> {
        let secret = encrypted_secret.to_owned();
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    update_two_factor(txn, user_id, Some(secret), false).await?;
                    delete_recovery_codes(txn, user_id).await?;
                    Ok(())
                })
            })
            .await
            .context("store pending 2fa secret")?;
        Ok(())
    }

    async fn enable_two_factor(
        &self,
        user_id: Uuid,
        encrypted_codes: &[String],
    ) -> Result<(), AuthServiceError> {
        let codes = encrypted_codes.to_vec();
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    users::ActiveModel {
                        id: Set(user_id),
                        two_factor_enabled: Set(true),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    delete_recovery_codes(txn, user_id).await?;
                    insert_recovery_codes(txn, user_id, &codes).await?;
                    Ok(())
                })
            })
            .await
            .context("enable 2fa")?;
        Ok(())
    }

    async fn replace_recovery_codes(
        &self,
        user_id: Uuid,
        encrypted_codes: &[String],
    ) -> Result<(), AuthServiceError> {
        let codes = encrypted_codes.to_vec();
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    delete_recovery_codes(txn, user_id).await?;
                    insert_recovery_codes(txn, user_id, &codes).await?;
                    Ok(())
                })
            })
            .await
            .context("replace recovery codes")?;
        Ok(())
    }

    async fn list_recovery_codes(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RecoveryCode>, AuthServiceError> {
        let models = recovery_codes::Entity::find()
            .filter(recovery_codes::Column::UserId.eq(user_id))
            .order_by_asc(recovery_codes::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list recovery codes")?;
        Ok(models.into_iter().map(recovery_code_from_model).collect())
    }

    async fn consume_recovery_code(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        let result = recovery_codes::Entity::delete_many()
            .filter(recovery_codes::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("consume recovery code")?;
        Ok(result.rows_affected > 0)
    }

    async fn disable_two_factor(&self, user_id: Uuid) -> Result<(), AuthServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    update_two_factor(txn, user_id, None, false).await?;
                    delete_recovery_codes(txn, user_id).await?;
                    Ok(())
                })
            })
            .await
            .context("disable 2fa")?;
        Ok(())
    }
}

async fn update_two_factor(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    secret: Option<String>,
    enabled: bool,
) -> Result<(), sea_orm::DbErr> {
    users::ActiveModel {
        id: Set(user_id),
        two_factor_secret: Set(secret),
        two_factor_enabled: Set(enabled),
        ..Default::default()
    }
    .update(txn)
    .await?;
    Ok(())
}

async fn delete_recovery_codes(
    txn: &DatabaseTransaction,
    user_id: Uuid,
) -> Result<(), sea_orm::DbErr> {
    recovery_codes::Entity::delete_many()
        .filter(recovery_codes::Column::UserId.eq(user_id))
        .exec(txn)
        .await?;
    Ok(())
}

async fn insert_recovery_codes(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    codes: &[String],
) -> Result<(), sea_orm::DbErr> {
    if codes.is_empty() {
        return Ok(());
    }
    let now = Utc::now();
    let models = codes.iter().map(|code| recovery_codes::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        encrypted_code: Set(code.clone()),
        created_at: Set(now),
    });
    recovery_codes::Entity::insert_many(models).exec(txn).await?;
    Ok(())
}

fn user_from_model(model: users::Model) -> AuthUser {
    AuthUser {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        two_factor_secret: model.two_factor_secret,
        two_factor_enabled: model.two_factor_enabled,
        created_at: model.created_at,
    }
}

fn recovery_code_from_model(model: recovery_codes::Model) -> RecoveryCode {
    RecoveryCode {
        id: model.id,
        user_id: model.user_id,
        encrypted_code: model.encrypted_code,
        created_at: model.created_at,
    }
}
