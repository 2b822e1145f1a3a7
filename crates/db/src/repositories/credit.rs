//! Credit repository for inbound-funds records.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    Set,
};
use uuid::Uuid;

use tally_shared::types::pagination::{Page, QueryOptions};

use crate::entities::credits;
use crate::repositories::paginate::{Paginable, paginate};

/// Error types for credit operations.
#[derive(Debug, thiserror::Error)]
pub enum CreditError {
    /// Credit not found.
    #[error("Credit not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a credit.
#[derive(Debug, Clone)]
pub struct CreateCreditInput {
    /// Owning account.
    pub account_id: String,
    /// Counterparty that paid the account.
    pub from: String,
    /// Free-text description.
    pub description: String,
    /// Amount received. Required by the create contract even though the
    /// column is nullable.
    pub amount: Decimal,
    /// When the credit occurred.
    pub date: DateTimeWithTimeZone,
}

/// Input for a partial update. Only supplied fields change; `amount` can be
/// set but never cleared.
#[derive(Debug, Clone, Default)]
pub struct UpdateCreditInput {
    /// Counterparty that paid the account.
    pub from: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Amount received.
    pub amount: Option<Decimal>,
    /// When the credit occurred.
    pub date: Option<DateTimeWithTimeZone>,
}

impl UpdateCreditInput {
    /// Returns true when the patch supplies no fields at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.from.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && self.date.is_none()
    }
}

/// Equality filters accepted by the credit list endpoint.
#[derive(Debug, Clone, Default)]
pub struct CreditFilter {
    /// Match on counterparty.
    pub from: Option<String>,
    /// Match on amount.
    pub amount: Option<Decimal>,
    /// Match on occurrence date.
    pub date: Option<DateTimeWithTimeZone>,
}

impl CreditFilter {
    /// Builds the exact-match condition; absent fields add no predicate.
    fn condition(self) -> Condition {
        let mut condition = Condition::all();
        if let Some(from) = self.from {
            condition = condition.add(credits::Column::From.eq(from));
        }
        if let Some(amount) = self.amount {
            condition = condition.add(credits::Column::Amount.eq(amount));
        }
        if let Some(date) = self.date {
            condition = condition.add(credits::Column::Date.eq(date));
        }
        condition
    }
}

impl Paginable for credits::Entity {
    fn sort_column(field: &str) -> Option<Self::Column> {
        match field {
            "accountId" => Some(credits::Column::AccountId),
            "amount" => Some(credits::Column::Amount),
            "description" => Some(credits::Column::Description),
            "from" => Some(credits::Column::From),
            "date" => Some(credits::Column::Date),
            "createdAt" => Some(credits::Column::CreatedAt),
            "updatedAt" => Some(credits::Column::UpdatedAt),
            _ => None,
        }
    }

    fn default_sort_column() -> Self::Column {
        credits::Column::CreatedAt
    }

    fn id_column() -> Self::Column {
        credits::Column::Id
    }
}

/// Credit repository for CRUD operations and paginated queries.
#[derive(Debug, Clone)]
pub struct CreditRepository {
    db: DatabaseConnection,
}

impl CreditRepository {
    /// Creates a new credit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new credit with a system-assigned id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails; nothing is persisted in that
    /// case.
    pub async fn create(&self, input: CreateCreditInput) -> Result<credits::Model, CreditError> {
        let now = Utc::now().into();

        let credit = credits::ActiveModel {
            id: Set(Uuid::new_v4()),
            account_id: Set(input.account_id),
            amount: Set(Some(input.amount)),
            description: Set(input.description),
            from: Set(input.from),
            date: Set(input.date),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(credit.insert(&self.db).await?)
    }

    /// Queries credits matching the filter, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub async fn query(
        &self,
        filter: CreditFilter,
        options: &QueryOptions,
    ) -> Result<Page<credits::Model>, CreditError> {
        let page = paginate::<credits::Entity>(&self.db, filter.condition(), options).await?;
        Ok(page)
    }

    /// Fetches a credit by id. Absence is a value, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<credits::Model>, CreditError> {
        Ok(credits::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Merges a partial update onto an existing credit and refreshes
    /// `updated_at`. Patch values win for every supplied field.
    ///
    /// # Errors
    ///
    /// Returns `CreditError::NotFound` if the credit does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateCreditInput,
    ) -> Result<credits::Model, CreditError> {
        let credit = credits::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CreditError::NotFound(id))?;

        let mut active: credits::ActiveModel = credit.into();
        if let Some(from) = input.from {
            active.from = Set(from);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(amount) = input.amount {
            active.amount = Set(Some(amount));
        }
        if let Some(date) = input.date {
            active.date = Set(date);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a credit and returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns `CreditError::NotFound` if the credit does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<credits::Model, CreditError> {
        let credit = credits::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CreditError::NotFound(id))?;

        credit.clone().delete(&self.db).await?;
        Ok(credit)
    }
}
