//! Pagination types for list endpoints.
//!
//! `QueryOptions` carries the raw `sortBy`/`limit`/`page` values a client
//! supplied and resolves them to usable query parameters; `Page` is the
//! response wrapper with page-count metadata.

use serde::{Deserialize, Serialize};

/// Page size used when the client supplies none (or an unusable one).
pub const DEFAULT_LIMIT: u64 = 10;

/// Page number used when the client supplies none (or an unusable one).
pub const DEFAULT_PAGE: u64 = 1;

/// Sort direction for a single sort clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

/// One parsed `field:direction` clause from a `sortBy` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause {
    /// Client-facing field name (camelCase, e.g. `createdAt`).
    pub field: String,
    /// Requested direction.
    pub direction: SortDirection,
}

/// Raw query options for paginated list endpoints.
///
/// All fields are optional; resolution to concrete values happens in the
/// accessor methods, not at deserialization time. Non-positive `limit` or
/// `page` values clamp to the defaults rather than erroring or producing an
/// unbounded page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    /// Sort specification: comma-separated `field:direction` clauses,
    /// direction one of `asc`/`desc` and defaulting to `asc`.
    pub sort_by: Option<String>,
    /// Requested page size.
    pub limit: Option<i64>,
    /// Requested page number (1-indexed).
    pub page: Option<i64>,
}

impl QueryOptions {
    /// Resolved page size: the supplied limit if positive, otherwise
    /// [`DEFAULT_LIMIT`].
    #[must_use]
    pub fn limit(&self) -> u64 {
        match self.limit {
            Some(limit) if limit > 0 => limit.unsigned_abs(),
            _ => DEFAULT_LIMIT,
        }
    }

    /// Resolved page number: the supplied page if positive, otherwise
    /// [`DEFAULT_PAGE`].
    #[must_use]
    pub fn page(&self) -> u64 {
        match self.page {
            Some(page) if page > 0 => page.unsigned_abs(),
            _ => DEFAULT_PAGE,
        }
    }

    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page().saturating_sub(1).saturating_mul(self.limit())
    }

    /// Parses `sortBy` into ordered sort clauses.
    ///
    /// Clauses are evaluated in listed order. A missing or unrecognized
    /// direction falls back to ascending; empty clauses are skipped. An
    /// absent `sortBy` yields no clauses, leaving the caller to apply its
    /// default ordering.
    #[must_use]
    pub fn sort_clauses(&self) -> Vec<SortClause> {
        let Some(sort_by) = self.sort_by.as_deref() else {
            return Vec::new();
        };

        sort_by
            .split(',')
            .filter_map(|clause| {
                let mut parts = clause.splitn(2, ':');
                let field = parts.next().unwrap_or_default().trim();
                if field.is_empty() {
                    return None;
                }
                let direction = match parts.next().map(str::trim) {
                    Some("desc") => SortDirection::Desc,
                    _ => SortDirection::Asc,
                };
                Some(SortClause {
                    field: field.to_string(),
                    direction,
                })
            })
            .collect()
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The records on the current page, in sort order.
    pub results: Vec<T>,
    /// Current page number (1-indexed).
    pub page: u64,
    /// Page size used for this query.
    pub limit: u64,
    /// Total number of pages. An empty result set still reports one page, so
    /// callers always see a well-formed page-1 response.
    pub total_pages: u64,
    /// Total number of records matching the filter across all pages.
    pub total_results: u64,
}

impl<T> Page<T> {
    /// Creates a new paginated response.
    ///
    /// `limit` is the resolved, non-zero page size (see
    /// [`QueryOptions::limit`]).
    #[must_use]
    pub fn new(results: Vec<T>, page: u64, limit: u64, total_results: u64) -> Self {
        let total_pages = if total_results == 0 {
            1
        } else {
            total_results.div_ceil(limit)
        };

        Self {
            results,
            page,
            limit,
            total_pages,
            total_results,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn options(sort_by: Option<&str>, limit: Option<i64>, page: Option<i64>) -> QueryOptions {
        QueryOptions {
            sort_by: sort_by.map(str::to_string),
            limit,
            page,
        }
    }

    #[test]
    fn test_defaults_when_absent() {
        let opts = QueryOptions::default();
        assert_eq!(opts.limit(), 10);
        assert_eq!(opts.page(), 1);
        assert_eq!(opts.offset(), 0);
        assert!(opts.sort_clauses().is_empty());
    }

    #[rstest]
    #[case(Some(0), 10)]
    #[case(Some(-5), 10)]
    #[case(Some(1), 1)]
    #[case(Some(25), 25)]
    fn test_limit_clamps_to_default(#[case] limit: Option<i64>, #[case] expected: u64) {
        assert_eq!(options(None, limit, None).limit(), expected);
    }

    #[rstest]
    #[case(Some(0), 1)]
    #[case(Some(-1), 1)]
    #[case(Some(3), 3)]
    fn test_page_clamps_to_default(#[case] page: Option<i64>, #[case] expected: u64) {
        assert_eq!(options(None, None, page).page(), expected);
    }

    #[test]
    fn test_offset() {
        assert_eq!(options(None, Some(20), Some(1)).offset(), 0);
        assert_eq!(options(None, Some(20), Some(2)).offset(), 20);
        assert_eq!(options(None, Some(7), Some(4)).offset(), 21);
    }

    #[test]
    fn test_sort_clauses_single() {
        let clauses = options(Some("amount:desc"), None, None).sort_clauses();
        assert_eq!(
            clauses,
            vec![SortClause {
                field: "amount".to_string(),
                direction: SortDirection::Desc,
            }]
        );
    }

    #[test]
    fn test_sort_clauses_direction_defaults_to_asc() {
        let clauses = options(Some("date"), None, None).sort_clauses();
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].field, "date");
        assert_eq!(clauses[0].direction, SortDirection::Asc);
    }

    #[test]
    fn test_sort_clauses_multiple_in_listed_order() {
        let clauses = options(Some("amount:desc,date:asc,createdAt"), None, None).sort_clauses();
        assert_eq!(clauses.len(), 3);
        assert_eq!(clauses[0].field, "amount");
        assert_eq!(clauses[0].direction, SortDirection::Desc);
        assert_eq!(clauses[1].field, "date");
        assert_eq!(clauses[1].direction, SortDirection::Asc);
        assert_eq!(clauses[2].field, "createdAt");
        assert_eq!(clauses[2].direction, SortDirection::Asc);
    }

    #[test]
    fn test_sort_clauses_skips_empty_and_tolerates_junk_direction() {
        let clauses = options(Some(",amount:sideways,"), None, None).sort_clauses();
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].field, "amount");
        assert_eq!(clauses[0].direction, SortDirection::Asc);
    }

    #[test]
    fn test_page_new() {
        let page = Page::new(vec![1, 2, 3], 1, 10, 3);
        assert_eq!(page.results, vec![1, 2, 3]);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 10);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_results, 3);
    }

    #[test]
    fn test_page_count_rounds_up() {
        // 25 items, 10 per page -> 3 pages
        let page: Page<i32> = Page::new(vec![], 3, 10, 25);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_empty_result_set_still_reports_one_page() {
        let page: Page<i32> = Page::new(vec![], 1, 10, 0);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_results, 0);
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let page = Page::new(vec![1], 1, 10, 1);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["results"], serde_json::json!([1]));
        assert_eq!(json["page"], 1);
        assert_eq!(json["limit"], 10);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["totalResults"], 1);
    }

    proptest! {
        /// The page count always covers every result, and never by more than
        /// one page worth of slack.
        #[test]
        fn prop_page_count_covers_all_results(
            total in 0u64..100_000,
            limit in 1u64..1_000,
        ) {
            let page: Page<i32> = Page::new(vec![], 1, limit, total);

            prop_assert!(page.total_pages >= 1);
            prop_assert!(page.total_pages * limit >= total);
            if total > 0 {
                prop_assert!((page.total_pages - 1) * limit < total);
            }
        }

        /// Option resolution never yields a zero limit or page.
        #[test]
        fn prop_resolved_options_are_positive(
            limit in proptest::option::of(-1_000i64..1_000),
            page in proptest::option::of(-1_000i64..1_000),
        ) {
            let opts = QueryOptions { sort_by: None, limit, page };
            prop_assert!(opts.limit() >= 1);
            prop_assert!(opts.page() >= 1);
        }
    }
}
