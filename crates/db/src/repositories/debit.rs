//! Debit repository for outbound-funds records.
//!
//! Structurally parallel to the credit repository, with `to` as the
//! counterparty field.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    Set,
};
use uuid::Uuid;

use tally_shared::types::pagination::{Page, QueryOptions};

use crate::entities::debits;
use crate::repositories::paginate::{Paginable, paginate};

/// Error types for debit operations.
#[derive(Debug, thiserror::Error)]
pub enum DebitError {
    /// Debit not found.
    #[error("Debit not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a debit.
#[derive(Debug, Clone)]
pub struct CreateDebitInput {
    /// Owning account.
    pub account_id: String,
    /// Counterparty the account paid.
    pub to: String,
    /// Free-text description.
    pub description: String,
    /// Amount paid. Required by the create contract even though the column
    /// is nullable.
    pub amount: Decimal,
    /// When the debit occurred.
    pub date: DateTimeWithTimeZone,
}

/// Input for a partial update. Only supplied fields change; `amount` can be
/// set but never cleared.
#[derive(Debug, Clone, Default)]
pub struct UpdateDebitInput {
    /// Counterparty the account paid.
    pub to: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Amount paid.
    pub amount: Option<Decimal>,
    /// When the debit occurred.
    pub date: Option<DateTimeWithTimeZone>,
}

impl UpdateDebitInput {
    /// Returns true when the patch supplies no fields at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.to.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && self.date.is_none()
    }
}

/// Equality filters accepted by the debit list endpoint.
#[derive(Debug, Clone, Default)]
pub struct DebitFilter {
    /// Match on counterparty.
    pub to: Option<String>,
    /// Match on amount.
    pub amount: Option<Decimal>,
    /// Match on occurrence date.
    pub date: Option<DateTimeWithTimeZone>,
}

impl DebitFilter {
    /// Builds the exact-match condition; absent fields add no predicate.
    fn condition(self) -> Condition {
        let mut condition = Condition::all();
        if let Some(to) = self.to {
            condition = condition.add(debits::Column::To.eq(to));
        }
        if let Some(amount) = self.amount {
            condition = condition.add(debits::Column::Amount.eq(amount));
        }
        if let Some(date) = self.date {
            condition = condition.add(debits::Column::Date.eq(date));
        }
        condition
    }
}

impl Paginable for debits::Entity {
    fn sort_column(field: &str) -> Option<Self::Column> {
        match field {
            "accountId" => Some(debits::Column::AccountId),
            "amount" => Some(debits::Column::Amount),
            "description" => Some(debits::Column::Description),
            "to" => Some(debits::Column::To),
            "date" => Some(debits::Column::Date),
            "createdAt" => Some(debits::Column::CreatedAt),
            "updatedAt" => Some(debits::Column::UpdatedAt),
            _ => None,
        }
    }

    fn default_sort_column() -> Self::Column {
        debits::Column::CreatedAt
    }

    fn id_column() -> Self::Column {
        debits::Column::Id
    }
}

/// Debit repository for CRUD operations and paginated queries.
#[derive(Debug, Clone)]
pub struct DebitRepository {
    db: DatabaseConnection,
}

impl DebitRepository {
    /// Creates a new debit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new debit with a system-assigned id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails; nothing is persisted in that
    /// case.
    pub async fn create(&self, input: CreateDebitInput) -> Result<debits::Model, DebitError> {
        let now = Utc::now().into();

        let debit = debits::ActiveModel {
            id: Set(Uuid::new_v4()),
            account_id: Set(input.account_id),
            amount: Set(Some(input.amount)),
            description: Set(input.description),
            to: Set(input.to),
            date: Set(input.date),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(debit.insert(&self.db).await?)
    }

    /// Queries debits matching the filter, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub async fn query(
        &self,
        filter: DebitFilter,
        options: &QueryOptions,
    ) -> Result<Page<debits::Model>, DebitError> {
        let page = paginate::<debits::Entity>(&self.db, filter.condition(), options).await?;
        Ok(page)
    }

    /// Fetches a debit by id. Absence is a value, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<debits::Model>, DebitError> {
        Ok(debits::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Merges a partial update onto an existing debit and refreshes
    /// `updated_at`. Patch values win for every supplied field.
    ///
    /// # Errors
    ///
    /// Returns `DebitError::NotFound` if the debit does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateDebitInput,
    ) -> Result<debits::Model, DebitError> {
        let debit = debits::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DebitError::NotFound(id))?;

        let mut active: debits::ActiveModel = debit.into();
        if let Some(to) = input.to {
            active.to = Set(to);
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

    /// Deletes a debit and returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns `DebitError::NotFound` if the debit does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<debits::Model, DebitError> {
        let debit = debits::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DebitError::NotFound(id))?;

        debit.clone().delete(&self.db).await?;
        Ok(debit)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, QueryFilter, QueryTrait};

    use super::*;

    #[test]
    fn test_sort_column_mapping() {
        assert!(matches!(
            debits::Entity::sort_column("to"),
            Some(debits::Column::To)
        ));
        assert!(matches!(
            debits::Entity::sort_column("date"),
            Some(debits::Column::Date)
        ));
        assert!(debits::Entity::sort_column("from").is_none());
    }

    #[test]
    fn test_filter_condition_uses_to_counterparty() {
        let filter = DebitFilter {
            to: Some("Initech".to_string()),
            amount: None,
            date: None,
        };

        let sql = debits::Entity::find()
            .filter(filter.condition())
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""debits"."to" = 'Initech'"#));
        assert!(!sql.contains(r#""debits"."amount""#));
    }

    #[test]
    fn test_empty_patch_detection() {
        assert!(UpdateDebitInput::default().is_empty());
        assert!(
            !UpdateDebitInput {
                amount: Some(dec!(5)),
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[tokio::test]
    async fn test_create_persists_supplied_fields() {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let inserted = debits::Model {
            id: Uuid::new_v4(),
            account_id: "acct-9".to_string(),
            amount: Some(dec!(75)),
            description: "hosting bill".to_string(),
            to: "Initech".to_string(),
            date: now,
            created_at: now,
            updated_at: now,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[inserted.clone()]])
            .into_connection();
        let repo = DebitRepository::new(db.clone());

        let debit = repo
            .create(CreateDebitInput {
                account_id: "acct-9".to_string(),
                to: "Initech".to_string(),
                description: "hosting bill".to_string(),
                amount: dec!(75),
                date: now,
            })
            .await
            .unwrap();
        assert_eq!(debit, inserted);

        // The log renders with Debug, so quoted identifiers appear escaped.
        let log = format!("{:?}", db.into_transaction_log());
        let insert_stmt = log.split("INSERT").nth(1).expect("no INSERT was issued");
        assert!(insert_stmt.contains(r#"\"account_id\""#));
        assert!(insert_stmt.contains(r#"\"to\""#));
        assert!(insert_stmt.contains(r#"\"amount\""#));
        assert!(insert_stmt.contains(r#"\"created_at\""#));
    }

    #[tokio::test]
    async fn test_update_missing_debit_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<debits::Model>::new()])
            .into_connection();
        let repo = DebitRepository::new(db);

        let id = Uuid::new_v4();
        let result = repo
            .update(
                id,
                UpdateDebitInput {
                    to: Some("Initrode".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(DebitError::NotFound(missing)) if missing == id));
    }
}
