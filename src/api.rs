use crate::{
    data::{
        student::{Student, StudentPayload},
        validation::{validate_new, validate_patch},
    },
    error::{MissingStudentSnafu, RosterResult},
    store::StudentStore,
};
use snafu::{OptionExt, ensure};
use std::sync::Arc;

/// The five student operations, shared by the JSON routes and the pages.
///
/// Each call stands alone: nothing is cached between requests and the last
/// successful write wins.
#[derive(Clone, Debug)]
pub struct StudentsApi {
    store: Arc<dyn StudentStore>,
}

impl StudentsApi {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> RosterResult<Vec<Student>> {
        self.store.list().await
    }

    pub async fn create(&self, payload: StudentPayload) -> RosterResult<Student> {
        let new = validate_new(payload, &*self.store).await?;
        let student = self.store.insert(new).await?;
        info!(id = student.id, "Created student");
        Ok(student)
    }

    pub async fn read(&self, id: i64) -> RosterResult<Student> {
        self.store
            .get(id)
            .await?
            .context(MissingStudentSnafu { id })
    }

    pub async fn update(&self, id: i64, payload: StudentPayload) -> RosterResult<Student> {
        self.read(id).await?;

        let patch = validate_patch(id, payload, &*self.store).await?;
        let student = self
            .store
            .patch(id, patch)
            .await?
            .context(MissingStudentSnafu { id })?;
        info!(id, "Updated student");
        Ok(student)
    }

    pub async fn delete(&self, id: i64) -> RosterResult<()> {
        ensure!(self.store.remove(id).await?, MissingStudentSnafu { id });
        info!(id, "Deleted student");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::RosterError, store::memory::MemoryStudentStore};
    use serde_json::{Value, json};

    fn api() -> StudentsApi {
        StudentsApi::new(Arc::new(MemoryStudentStore::default()))
    }

    fn payload(value: Value) -> StudentPayload {
        serde_json::from_value(value).unwrap()
    }

    fn body(email: &str) -> Value {
        json!({
            "email": email,
            "firstName": "Mary",
            "lastName": "Jackson",
            "middleName": "Winston",
            "age": "25",
            "gender": "Female",
            "course": "Engineering",
            "yearLevel": "5th",
            "section": "A",
        })
    }

    #[tokio::test]
    async fn created_record_reads_back_identically() {
        let api = api();
        let created = api.create(payload(body("mary@example.com"))).await.unwrap();

        assert_eq!(created.email, "mary@example.com");
        assert_eq!(created.middle_name.as_deref(), Some("Winston"));
        assert_eq!(created.age, 25);
        assert_eq!(api.read(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn repeating_a_create_makes_a_second_record_unless_the_email_clashes() {
        let api = api();
        api.create(payload(body("one@example.com"))).await.unwrap();
        let err = api
            .create(payload(body("one@example.com")))
            .await
            .unwrap_err();
        assert!(err.field_errors().unwrap().contains_key("email"));

        api.create(payload(body("two@example.com"))).await.unwrap();
        assert_eq!(api.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn partial_update_keeps_everything_else() {
        let api = api();
        let original = api.create(payload(body("sec@example.com"))).await.unwrap();

        let updated = api
            .update(original.id, payload(json!({ "section": "B" })))
            .await
            .unwrap();

        assert_eq!(
            updated,
            Student {
                section: "B".into(),
                ..original
            }
        );
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found_before_validation() {
        let err = api()
            .update(77, payload(json!({ "email": "broken" })))
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::MissingStudent { id: 77 }));
    }

    #[tokio::test]
    async fn delete_then_read_is_not_found() {
        let api = api();
        let created = api.create(payload(body("gone@example.com"))).await.unwrap();

        api.delete(created.id).await.unwrap();
        assert!(matches!(
            api.read(created.id).await,
            Err(RosterError::MissingStudent { .. })
        ));
        assert!(matches!(
            api.delete(created.id).await,
            Err(RosterError::MissingStudent { .. })
        ));
    }
}
