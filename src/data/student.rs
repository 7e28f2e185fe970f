use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// A stored student, as it appears on the wire and in the `students` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub age: i32,
    pub gender: String,
    pub course: String,
    pub year_level: String,
    pub section: String,
}

impl Student {
    pub fn full_name(&self) -> String {
        match self.middle_name.as_deref() {
            Some(middle) => format!("{} {middle} {}", self.first_name, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

/// What a request said about one field.
///
/// Strings are trimmed on the way in and an empty string counts as `Null`,
/// so "present but blank" and "explicitly null" are validated the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Supplied<T> {
    #[default]
    Absent,
    Null,
    Given(T),
    WrongType,
}

pub trait FieldValue: Sized {
    /// How validation messages describe the expected type.
    const KIND: &'static str;

    fn from_json(value: Value) -> Supplied<Self>;
}

impl FieldValue for String {
    const KIND: &'static str = "a string";

    fn from_json(value: Value) -> Supplied<Self> {
        match value {
            Value::Null => Supplied::Null,
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Supplied::Null
                } else {
                    Supplied::Given(trimmed.to_string())
                }
            }
            _ => Supplied::WrongType,
        }
    }
}

/// `20` and `20.0` are both whole numbers, `20.5` is not.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn whole_number(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        let f = n.as_f64()?;
        (f.fract() == 0.0 && f.abs() < 1e15).then_some(f as i64)
    })
}

impl FieldValue for i32 {
    const KIND: &'static str = "an integer";

    fn from_json(value: Value) -> Supplied<Self> {
        match value {
            Value::Null => Supplied::Null,
            Value::Number(n) => whole_number(&n)
                .and_then(|n| i32::try_from(n).ok())
                .map_or(Supplied::WrongType, Supplied::Given),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Supplied::Null
                } else {
                    trimmed.parse().map_or(Supplied::WrongType, Supplied::Given)
                }
            }
            _ => Supplied::WrongType,
        }
    }
}

impl<'de, T: FieldValue> Deserialize<'de> for Supplied<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(T::from_json)
    }
}

/// Request body for create and update. Every field is optional here; which
/// ones are actually required depends on the validation mode.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentPayload {
    pub email: Supplied<String>,
    pub first_name: Supplied<String>,
    pub last_name: Supplied<String>,
    pub middle_name: Supplied<String>,
    pub age: Supplied<i32>,
    pub gender: Supplied<String>,
    pub course: Supplied<String>,
    pub year_level: Supplied<String>,
    pub section: Supplied<String>,
}

/// A fully validated student that has not been given an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub age: i32,
    pub gender: String,
    pub course: String,
    pub year_level: String,
    pub section: String,
}

impl NewStudent {
    pub fn into_student(self, id: i64) -> Student {
        Student {
            id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            middle_name: self.middle_name,
            age: self.age,
            gender: self.gender,
            course: self.course,
            year_level: self.year_level,
            section: self.section,
        }
    }
}

/// Validated changes to an existing student. `None` leaves the field alone;
/// for `middle_name`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<Option<String>>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub course: Option<String>,
    pub year_level: Option<String>,
    pub section: Option<String>,
}

impl StudentPatch {
    pub fn apply_to(self, student: &mut Student) {
        if let Some(email) = self.email {
            student.email = email;
        }
        if let Some(first_name) = self.first_name {
            student.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            student.last_name = last_name;
        }
        if let Some(middle_name) = self.middle_name {
            student.middle_name = middle_name;
        }
        if let Some(age) = self.age {
            student.age = age;
        }
        if let Some(gender) = self.gender {
            student.gender = gender;
        }
        if let Some(course) = self.course {
            student.course = course;
        }
        if let Some(year_level) = self.year_level {
            student.year_level = year_level;
        }
        if let Some(section) = self.section {
            student.section = section;
        }
    }

    /// Only succeeds when every required field was supplied.
    pub fn into_new(self) -> Option<NewStudent> {
        Some(NewStudent {
            email: self.email?,
            first_name: self.first_name?,
            last_name: self.last_name?,
            middle_name: self.middle_name.flatten(),
            age: self.age?,
            gender: self.gender?,
            course: self.course?,
            year_level: self.year_level?,
            section: self.section?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_distinguishes_absent_null_and_wrong_types() {
        let payload: StudentPayload = serde_json::from_value(json!({
            "email": "  ada@example.com ",
            "firstName": null,
            "lastName": "",
            "age": "21",
            "course": 42,
        }))
        .unwrap();

        assert_eq!(payload.email, Supplied::Given("ada@example.com".into()));
        assert_eq!(payload.first_name, Supplied::Null);
        assert_eq!(payload.last_name, Supplied::Null);
        assert_eq!(payload.age, Supplied::Given(21));
        assert_eq!(payload.course, Supplied::WrongType);
        assert_eq!(payload.section, Supplied::Absent);
        assert_eq!(payload.middle_name, Supplied::Absent);
    }

    #[test]
    fn age_must_be_a_whole_number() {
        for bad in [
            json!(20.5),
            json!("twenty"),
            json!(true),
            json!(4_000_000_000_i64),
            json!(4e9),
        ] {
            assert_eq!(i32::from_json(bad), Supplied::WrongType);
        }
        assert_eq!(i32::from_json(json!(19)), Supplied::Given(19));
        assert_eq!(i32::from_json(json!(20.0)), Supplied::Given(20));
        assert_eq!(i32::from_json(json!(-3.0)), Supplied::Given(-3));
        assert_eq!(i32::from_json(json!(" 7 ")), Supplied::Given(7));
    }

    #[test]
    fn student_serialises_with_camel_case_names() {
        let student = Student {
            id: 1,
            email: "ada@example.com".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            middle_name: None,
            age: 36,
            gender: "Female".into(),
            course: "Science".into(),
            year_level: "4th".into(),
            section: "A".into(),
        };
        let value = serde_json::to_value(&student).unwrap();
        assert_eq!(value["firstName"], "Ada");
        assert_eq!(value["yearLevel"], "4th");
        assert_eq!(value["middleName"], Value::Null);
        assert_eq!(student.full_name(), "Ada Lovelace");
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut student = NewStudent {
            email: "grace@example.com".into(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            middle_name: Some("Brewster".into()),
            age: 30,
            gender: "Female".into(),
            course: "Computer Science".into(),
            year_level: "2nd".into(),
            section: "A".into(),
        }
        .into_student(4);
        let before = student.clone();

        StudentPatch {
            section: Some("B".into()),
            middle_name: Some(None),
            ..StudentPatch::default()
        }
        .apply_to(&mut student);

        assert_eq!(student.section, "B");
        assert_eq!(student.middle_name, None);
        assert_eq!(
            Student {
                section: before.section.clone(),
                middle_name: before.middle_name.clone(),
                ..student
            },
            before
        );
    }
}
