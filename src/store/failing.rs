use crate::{
    data::student::{NewStudent, Student, StudentPatch},
    error::{RosterError, RosterResult},
    store::StudentStore,
};
use async_trait::async_trait;

/// A store whose database is always unreachable.
#[derive(Debug, Default)]
pub struct FailingStudentStore;

fn database_down<T>() -> RosterResult<T> {
    Err(RosterError::MakeQuery {
        source: sqlx::Error::PoolTimedOut,
    })
}

#[async_trait]
impl StudentStore for FailingStudentStore {
    async fn list(&self) -> RosterResult<Vec<Student>> {
        database_down()
    }

    async fn get(&self, _id: i64) -> RosterResult<Option<Student>> {
        database_down()
    }

    async fn email_owner(&self, _email: &str) -> RosterResult<Option<i64>> {
        database_down()
    }

    async fn insert(&self, _new: NewStudent) -> RosterResult<Student> {
        database_down()
    }

    async fn patch(&self, _id: i64, _patch: StudentPatch) -> RosterResult<Option<Student>> {
        database_down()
    }

    async fn remove(&self, _id: i64) -> RosterResult<bool> {
        database_down()
    }

    async fn count(&self) -> RosterResult<usize> {
        database_down()
    }
}
