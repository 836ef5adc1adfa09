//! Per-call value objects of the adapter protocol.
//!
//! [`FindOptions`] carries the abstract query surface (`range`, `match`,
//! `sort`, `exists`, `limit`, `offset`) over typed fields; [`Update`] carries
//! the `replace`/`push`/`pull` update directive. Both are ephemeral and never
//! persisted. [`Records`] is the result shape for `find` and `create`,
//! carrying the record array together with its final count.

use bson::{Bson, Document};
use std::ops::Deref;

use crate::query::SortDirection;

/// A match value: either a single scalar or a list with intended OR
/// semantics.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Match the field against one value.
    One(Bson),
    /// Match the field against any of the listed values. The store has no
    /// native OR, so list matches on plain fields are applied client-side.
    Any(Vec<Bson>),
}

/// Range bounds for one field. Either bound may be absent.
pub type Bounds = (Option<Bson>, Option<Bson>);

/// Options for a `find` call.
///
/// Sub-options keep their insertion order; sort clauses in particular are
/// applied in the order they were added.
///
/// ```ignore
/// use reclayer_core::options::FindOptions;
/// use reclayer_core::query::SortDirection;
///
/// let options = FindOptions::new()
///     .range("age", Some(36), Some(38))
///     .sort("age", SortDirection::Asc)
///     .limit(10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Per-field `[lower, upper]` bounds.
    pub range: Vec<(String, Bounds)>,
    /// Per-field match values.
    pub matches: Vec<(String, Matcher)>,
    /// Per-field sort directions, in application order.
    pub sort: Vec<(String, SortDirection)>,
    /// Per-field existence predicates.
    pub exists: Vec<(String, bool)>,
    /// Maximum number of records to return.
    pub limit: Option<usize>,
    /// Number of records to skip.
    pub offset: Option<usize>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a range predicate on a field. A `None` bound is open.
    pub fn range(
        mut self,
        field: impl Into<String>,
        lower: Option<impl Into<Bson>>,
        upper: Option<impl Into<Bson>>,
    ) -> Self {
        self.range
            .push((field.into(), (lower.map(Into::into), upper.map(Into::into))));
        self
    }

    /// Adds an equality match on a field.
    pub fn matching(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.matches
            .push((field.into(), Matcher::One(value.into())));
        self
    }

    /// Adds a list match on a field (logical OR over the values).
    pub fn matching_any(
        mut self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<Bson>>,
    ) -> Self {
        self.matches.push((
            field.into(),
            Matcher::Any(values.into_iter().map(Into::into).collect()),
        ));
        self
    }

    /// Adds a sort clause on a field.
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push((field.into(), direction));
        self
    }

    /// Adds an existence predicate on a field.
    pub fn exists(mut self, field: impl Into<String>, should_exist: bool) -> Self {
        self.exists.push((field.into(), should_exist));
        self
    }

    /// Sets the maximum number of records to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the number of records to skip.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// An update directive for one record.
///
/// `replace` sets fields directly; `push` appends to array fields; `pull`
/// removes all matching values from array fields. `push`/`pull` force a
/// read-modify-write of the target document, `replace` alone does not.
#[derive(Debug, Clone)]
pub struct Update {
    /// Primary-key value of the record to update.
    pub id: Bson,
    /// Fields to set directly.
    pub replace: Document,
    /// Values to append to array fields. A scalar appends one element, an
    /// array appends all of its elements.
    pub push: Document,
    /// Values to remove from array fields. A scalar removes all occurrences
    /// of that value, an array removes all occurrences of each element.
    pub pull: Document,
}

impl Update {
    pub fn new(id: impl Into<Bson>) -> Self {
        Self {
            id: id.into(),
            replace: Document::new(),
            push: Document::new(),
            pull: Document::new(),
        }
    }

    /// Sets a field to a new value.
    pub fn replace(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.replace.insert(field.into(), value.into());
        self
    }

    /// Appends a value (or all values of an array) to an array field.
    pub fn push(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.push.insert(field.into(), value.into());
        self
    }

    /// Removes all occurrences of a value (or of each value of an array)
    /// from an array field.
    pub fn pull(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.pull.insert(field.into(), value.into());
        self
    }

    /// Whether this update requires reading the current document first.
    pub fn needs_read(&self) -> bool {
        !self.push.is_empty() || !self.pull.is_empty()
    }
}

/// Result of a `find` or `create` call: typed records plus their count.
///
/// `count` always equals the number of records remaining after post
/// filtering; it is carried explicitly because the adapter contract exposes
/// it alongside the array.
#[derive(Debug, Clone, Default)]
pub struct Records {
    /// The decoded records, in result order.
    pub records: Vec<Document>,
    /// Final record count.
    pub count: usize,
}

impl Records {
    pub fn new(records: Vec<Document>) -> Self {
        let count = records.len();
        Self { records, count }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl Deref for Records {
    type Target = [Document];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

impl IntoIterator for Records {
    type Item = Document;
    type IntoIter = std::vec::IntoIter<Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
