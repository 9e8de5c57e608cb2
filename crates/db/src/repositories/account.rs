//! Account repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::{accounts, sea_orm_active_enums::KycStatus};

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an account by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new account. Fresh accounts start unverified and cannot
    /// move money until KYC approval lands.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        full_name: &str,
    ) -> Result<accounts::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            full_name: Set(full_name.to_string()),
            kyc_status: Set(KycStatus::Unverified),
            kyc_updated_at: Set(None),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        account.insert(&self.db).await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Updates the verification status of an account.
    ///
    /// Returns `None` when the account does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_kyc_status(
        &self,
        id: Uuid,
        status: KycStatus,
    ) -> Result<Option<accounts::Model>, DbErr> {
        let Some(account) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().into();
        let mut active: accounts::ActiveModel = account.into();
        active.kyc_status = Set(status);
        active.kyc_updated_at = Set(Some(now));
        active.updated_at = Set(now);

        let updated = active.update(&self.db).await?;
        Ok(Some(updated))
    }

    /// Deactivates an account. Deactivated accounts keep their history and
    /// balances but are rejected by every money-moving operation.
    ///
    /// Returns `None` when the account does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn deactivate(&self, id: Uuid) -> Result<Option<accounts::Model>, DbErr> {
        let Some(account) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: accounts::ActiveModel = account.into();
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(&self.db).await?;
        Ok(Some(updated))
    }
}
