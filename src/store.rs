use crate::{
    data::student::{NewStudent, Student, StudentPatch},
    error::RosterResult,
};
use async_trait::async_trait;
use std::fmt::Debug;

#[cfg(test)]
pub mod failing;
pub mod memory;
pub mod postgres;

/// Canonical storage for students.
///
/// Lookups report absence through `Option`/`bool` rather than an error, and a
/// write that would give two students the same email fails with
/// [`RosterError::EmailTaken`](crate::error::RosterError::EmailTaken).
#[async_trait]
pub trait StudentStore: Debug + Send + Sync {
    /// All students, ascending by id.
    async fn list(&self) -> RosterResult<Vec<Student>>;
    async fn get(&self, id: i64) -> RosterResult<Option<Student>>;
    /// Id of the student currently using `email`, if any.
    async fn email_owner(&self, email: &str) -> RosterResult<Option<i64>>;
    async fn insert(&self, new: NewStudent) -> RosterResult<Student>;
    async fn patch(&self, id: i64, patch: StudentPatch) -> RosterResult<Option<Student>>;
    /// `false` when there was nothing to remove.
    async fn remove(&self, id: i64) -> RosterResult<bool>;
    async fn count(&self) -> RosterResult<usize>;
}
