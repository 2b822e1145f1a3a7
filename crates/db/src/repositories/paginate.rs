//! Filtered-pagination query engine shared by the record repositories.
//!
//! Turns an equality filter plus sort/page/limit options into a bounded,
//! ordered result page with page-count metadata. The engine is a standalone
//! function parameterized by entity; repositories pass their own connection
//! and filter, so there is no shared registry of resource types.

use sea_orm::{
    Condition, DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
};

use tally_shared::types::pagination::{Page, QueryOptions, SortDirection};

/// Maps client-facing sort fields onto entity columns.
///
/// Implemented by each paginated entity so the engine can resolve `sortBy`
/// clauses without knowing the entity's shape.
pub trait Paginable: EntityTrait {
    /// Resolves a client-facing field name (camelCase) to a sortable column.
    /// Unknown fields return `None` and the clause is ignored.
    fn sort_column(field: &str) -> Option<Self::Column>;

    /// Column used when no sort clause resolves.
    fn default_sort_column() -> Self::Column;

    /// Unique column appended to every ordering as a stable tie-breaker, so
    /// page boundaries are deterministic run-to-run.
    fn id_column() -> Self::Column;
}

/// Builds the filtered, ordered, offset/limited select for one page.
fn page_query<E: Paginable>(filter: Condition, options: &QueryOptions) -> Select<E> {
    let mut query = E::find().filter(filter);

    let mut sorted = false;
    for clause in options.sort_clauses() {
        let Some(column) = E::sort_column(&clause.field) else {
            continue;
        };
        let order = match clause.direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };
        query = query.order_by(column, order);
        sorted = true;
    }
    if !sorted {
        query = query.order_by_asc(E::default_sort_column());
    }

    query
        .order_by_asc(E::id_column())
        .offset(options.offset())
        .limit(options.limit())
}

/// Runs a filtered, paginated query and returns one page plus metadata.
///
/// An empty filter matches all records. Pages past the last one yield an
/// empty `results` sequence with unchanged totals, not an error.
///
/// # Errors
///
/// Returns an error if the count or fetch query fails.
pub async fn paginate<E>(
    db: &DatabaseConnection,
    filter: Condition,
    options: &QueryOptions,
) -> Result<Page<E::Model>, DbErr>
where
    E: Paginable,
    E::Model: Sync,
{
    let total_results = E::find().filter(filter.clone()).count(db).await?;
    let results = page_query::<E>(filter, options).all(db).await?;

    Ok(Page::new(
        results,
        options.page(),
        options.limit(),
        total_results,
    ))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sea_orm::{
        ColumnTrait, DatabaseBackend, MockDatabase, QueryTrait, Value,
    };
    use std::collections::BTreeMap;
    use uuid::Uuid;

    use crate::entities::credits;

    use super::*;

    fn opts(sort_by: Option<&str>, limit: Option<i64>, page: Option<i64>) -> QueryOptions {
        QueryOptions {
            sort_by: sort_by.map(str::to_string),
            limit,
            page,
        }
    }

    fn render(filter: Condition, options: &QueryOptions) -> String {
        page_query::<credits::Entity>(filter, options)
            .build(DatabaseBackend::Postgres)
            .to_string()
    }

    fn credit(from: &str, amount: i64) -> credits::Model {
        let now = Utc::now().into();
        credits::Model {
            id: Uuid::new_v4(),
            account_id: "acct-1".to_string(),
            amount: Some(Decimal::from(amount)),
            description: "test credit".to_string(),
            from: from.to_string(),
            date: now,
            created_at: now,
            updated_at: now,
        }
    }

    fn count_row(total: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::BigInt(Some(total)))])
    }

    #[test]
    fn test_default_ordering_is_created_at_then_id() {
        let sql = render(Condition::all(), &opts(None, None, None));
        assert!(sql.contains(r#"ORDER BY "credits"."created_at" ASC, "credits"."id" ASC"#));
        assert!(sql.contains("LIMIT 10"));
        assert!(sql.contains("OFFSET 0"));
    }

    #[test]
    fn test_sort_clause_overrides_default() {
        let sql = render(Condition::all(), &opts(Some("amount:desc"), None, None));
        assert!(sql.contains(r#"ORDER BY "credits"."amount" DESC, "credits"."id" ASC"#));
        assert!(!sql.contains(r#""created_at" ASC"#));
    }

    #[test]
    fn test_multiple_sort_clauses_in_listed_order() {
        let sql = render(Condition::all(), &opts(Some("amount:desc,date"), None, None));
        assert!(sql.contains(
            r#"ORDER BY "credits"."amount" DESC, "credits"."date" ASC, "credits"."id" ASC"#
        ));
    }

    #[test]
    fn test_unknown_sort_field_falls_back_to_default() {
        let sql = render(Condition::all(), &opts(Some("bogus:desc"), None, None));
        assert!(sql.contains(r#"ORDER BY "credits"."created_at" ASC, "credits"."id" ASC"#));
    }

    #[test]
    fn test_offset_and_limit_from_options() {
        let sql = render(Condition::all(), &opts(None, Some(5), Some(3)));
        assert!(sql.contains("LIMIT 5"));
        assert!(sql.contains("OFFSET 10"));
    }

    #[test]
    fn test_equality_filter_is_exact_match() {
        let filter = Condition::all().add(credits::Column::From.eq("Acme"));
        let sql = render(filter, &opts(None, None, None));
        assert!(sql.contains(r#""credits"."from" = 'Acme'"#));
        assert!(!sql.contains("LIKE"));
    }

    #[tokio::test]
    async fn test_paginate_metadata() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(2)]])
            .append_query_results([vec![credit("Acme", 20)]])
            .into_connection();

        let page = paginate::<credits::Entity>(
            &db,
            Condition::all(),
            &opts(Some("amount:desc"), Some(1), Some(1)),
        )
        .await
        .unwrap();

        assert_eq!(page.results.len(), 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 1);
        assert_eq!(page.total_results, 2);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn test_page_beyond_last_is_empty_with_unchanged_totals() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(2)]])
            .append_query_results([Vec::<credits::Model>::new()])
            .into_connection();

        let page = paginate::<credits::Entity>(
            &db,
            Condition::all(),
            &opts(None, Some(10), Some(5)),
        )
        .await
        .unwrap();

        assert!(page.results.is_empty());
        assert_eq!(page.total_results, 2);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 5);
    }

    #[tokio::test]
    async fn test_empty_result_set_reports_one_page() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(0)]])
            .append_query_results([Vec::<credits::Model>::new()])
            .into_connection();

        let page = paginate::<credits::Entity>(&db, Condition::all(), &opts(None, None, None))
            .await
            .unwrap();

        assert!(page.results.is_empty());
        assert_eq!(page.total_results, 0);
        assert_eq!(page.total_pages, 1);
    }
}
