use crate::{
    data::student::{NewStudent, Student, StudentPatch},
    error::{RosterError, RosterResult},
    store::StudentStore,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Student>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl Table {
    fn email_owner(&self, email: &str) -> Option<i64> {
        self.rows
            .values()
            .find(|student| student.email == email)
            .map(|student| student.id)
    }
}

/// Keeps students in process memory. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryStudentStore {
    table: RwLock<Table>,
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn list(&self) -> RosterResult<Vec<Student>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> RosterResult<Option<Student>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn email_owner(&self, email: &str) -> RosterResult<Option<i64>> {
        Ok(self.table.read().await.email_owner(email))
    }

    async fn insert(&self, new: NewStudent) -> RosterResult<Student> {
        let mut table = self.table.write().await;
        if table.email_owner(&new.email).is_some() {
            return Err(RosterError::EmailTaken { email: new.email });
        }

        let id = table.next_id;
        table.next_id += 1;

        let student = new.into_student(id);
        table.rows.insert(id, student.clone());
        Ok(student)
    }

    async fn patch(&self, id: i64, patch: StudentPatch) -> RosterResult<Option<Student>> {
        let mut table = self.table.write().await;

        if let Some(email) = patch.email.as_deref() {
            if table.email_owner(email).is_some_and(|owner| owner != id) {
                return Err(RosterError::EmailTaken {
                    email: email.to_string(),
                });
            }
        }

        let Some(student) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(student);
        Ok(Some(student.clone()))
    }

    async fn remove(&self, id: i64) -> RosterResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn count(&self) -> RosterResult<usize> {
        Ok(self.table.read().await.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_student(email: &str) -> NewStudent {
        NewStudent {
            email: email.to_string(),
            first_name: "Katherine".into(),
            last_name: "Johnson".into(),
            middle_name: None,
            age: 22,
            gender: "Female".into(),
            course: "Science".into(),
            year_level: "4th".into(),
            section: "D".into(),
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_in_order_and_never_reused() {
        let store = MemoryStudentStore::default();
        let a = store.insert(new_student("a@example.com")).await.unwrap();
        let b = store.insert(new_student("b@example.com")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        assert!(store.remove(b.id).await.unwrap());
        let c = store.insert(new_student("c@example.com")).await.unwrap();
        assert_eq!(c.id, 3);

        let ids: Vec<_> = store.list().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, [1, 3]);
    }

    #[tokio::test]
    async fn duplicate_email_leaves_cardinality_unchanged() {
        let store = MemoryStudentStore::default();
        store.insert(new_student("same@example.com")).await.unwrap();

        let err = store
            .insert(new_student("same@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::EmailTaken { .. }));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn emails_compare_case_sensitively() {
        let store = MemoryStudentStore::default();
        store.insert(new_student("Case@example.com")).await.unwrap();
        assert!(store.insert(new_student("case@example.com")).await.is_ok());
    }

    #[tokio::test]
    async fn patch_cannot_steal_another_email() {
        let store = MemoryStudentStore::default();
        let a = store.insert(new_student("a@example.com")).await.unwrap();
        store.insert(new_student("b@example.com")).await.unwrap();

        let steal = StudentPatch {
            email: Some("b@example.com".into()),
            ..StudentPatch::default()
        };
        assert!(store.patch(a.id, steal).await.is_err());

        let keep = StudentPatch {
            email: Some("a@example.com".into()),
            age: Some(23),
            ..StudentPatch::default()
        };
        let patched = store.patch(a.id, keep).await.unwrap().unwrap();
        assert_eq!(patched.age, 23);
    }

    #[tokio::test]
    async fn missing_rows_are_reported_not_faulted() {
        let store = MemoryStudentStore::default();
        assert!(store.get(9).await.unwrap().is_none());
        let patched = store.patch(9, StudentPatch::default()).await.unwrap();
        assert!(patched.is_none());
        assert!(!store.remove(9).await.unwrap());
    }
}
