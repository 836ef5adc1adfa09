//! The native query shape understood by document stores.
//!
//! The underlying store exposes only a limited, chained query builder:
//! per-field `where` filters (equality, single-field inequalities, and an
//! array-membership check), `orderBy`, `limit`, and `offset`. There is no
//! native OR and no positional array filtering; anything beyond these
//! operators has to be re-applied client-side after the fetch.
//!
//! # Building
//!
//! ```ignore
//! use reclayer_core::query::{NativeQuery, SortDirection, WhereOp};
//!
//! let query = NativeQuery::new()
//!     .filter("age", WhereOp::Gte, 36)
//!     .filter("age", WhereOp::Lte, 38)
//!     .order_by("age", SortDirection::Asc)
//!     .limit(10)
//!     .offset(0);
//! ```
//!
//! The builder is order-sensitive: clauses are kept and applied in the
//! order they were chained.

use bson::Bson;

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order (A to Z, 0 to 9, earliest to latest).
    Asc,
    /// Descending order (Z to A, 9 to 0, latest to earliest).
    Desc,
}

/// Per-field filter operators the store can evaluate server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhereOp {
    /// Field equals the value.
    Eq,
    /// Field is greater than or equal to the value.
    Gte,
    /// Field is less than or equal to the value.
    Lte,
    /// Array field contains the value as an element.
    ArrayContains,
}

/// One chained `where` clause.
#[derive(Debug, Clone)]
pub struct WhereClause {
    /// The field name to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: WhereOp,
    /// The value to compare against, already in store-native form.
    pub value: Bson,
}

/// One chained `orderBy` clause.
#[derive(Debug, Clone)]
pub struct OrderBy {
    /// The field name to sort by.
    pub field: String,
    /// The sort direction.
    pub direction: SortDirection,
}

/// A native store query: chained filters and sort clauses plus pagination.
///
/// This is the translation target for the adapter's query translator; the
/// store executes it as-is without further interpretation.
#[derive(Debug, Clone, Default)]
pub struct NativeQuery {
    /// Where clauses, combined with implicit AND, in chain order.
    pub clauses: Vec<WhereClause>,
    /// Sort clauses in chain order.
    pub order_by: Vec<OrderBy>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
    /// Number of documents to skip.
    pub offset: Option<usize>,
}

impl NativeQuery {
    /// Creates a new empty query with no filters or limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Chains a `where` clause onto the query.
    pub fn filter(mut self, field: impl Into<String>, op: WhereOp, value: impl Into<Bson>) -> Self {
        self.clauses.push(WhereClause {
            field: field.into(),
            op,
            value: value.into(),
        });
        self
    }

    /// Chains an `orderBy` clause onto the query.
    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by.push(OrderBy { field: field.into(), direction });
        self
    }

    /// Sets the maximum number of documents to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the number of documents to skip.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clauses_keep_chain_order() {
        let query = NativeQuery::new()
            .filter("age", WhereOp::Gte, 36)
            .filter("age", WhereOp::Lte, 38)
            .order_by("name", SortDirection::Desc)
            .limit(5)
            .offset(2);

        assert_eq!(query.clauses.len(), 2);
        assert_eq!(query.clauses[0].op, WhereOp::Gte);
        assert_eq!(query.clauses[1].op, WhereOp::Lte);
        assert_eq!(query.order_by[0].field, "name");
        assert_eq!(query.limit, Some(5));
        assert_eq!(query.offset, Some(2));
    }
}
