use crate::{
    data::student::NewStudent,
    error::RosterResult,
    form::{GENDERS, YEAR_LEVELS},
    store::StudentStore,
};
use rand::{Rng, seq::IndexedRandom};

const FIRST_NAMES: [&str; 12] = [
    "Amelia", "Bruno", "Carmen", "Dmitri", "Elena", "Farid", "Grace", "Hiro", "Isla", "Jonas",
    "Kalinda", "Luis",
];
const LAST_NAMES: [&str; 10] = [
    "Santos", "Okafor", "Lindqvist", "Nakamura", "Moreau", "Haddad", "Kowalski", "Reyes",
    "Schmidt", "Abara",
];
const COURSES: [&str; 5] = ["Computer Science", "Engineering", "Business", "Arts", "Science"];
const SECTIONS: [&str; 4] = ["A", "B", "C", "D"];

fn pick<'a>(rng: &mut impl Rng, from: &[&'a str]) -> &'a str {
    from.choose(rng).copied().unwrap_or_default()
}

/// Makes `count` plausible students. Emails embed `offset + index`, so
/// batches with different offsets never collide.
pub fn random_students(rng: &mut impl Rng, count: usize, offset: usize) -> Vec<NewStudent> {
    (0..count)
        .map(|i| {
            let first_name = pick(rng, &FIRST_NAMES);
            let last_name = pick(rng, &LAST_NAMES);
            let middle_name = rng
                .random_bool(0.5)
                .then(|| pick(rng, &FIRST_NAMES).to_string());

            NewStudent {
                email: format!(
                    "{}.{}{}@example.com",
                    first_name.to_lowercase(),
                    last_name.to_lowercase(),
                    offset + i
                ),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                middle_name,
                age: rng.random_range(17..=30),
                gender: pick(rng, &GENDERS).to_string(),
                course: pick(rng, &COURSES).to_string(),
                year_level: pick(rng, &YEAR_LEVELS).to_string(),
                section: pick(rng, &SECTIONS).to_string(),
            }
        })
        .collect()
}

/// Fills an empty store with demo data. Does nothing if anyone is already there.
pub async fn seed_if_empty(store: &dyn StudentStore, count: usize) -> RosterResult<usize> {
    if count == 0 || store.count().await? > 0 {
        return Ok(0);
    }

    let batch = random_students(&mut rand::rng(), count, 1);
    for new in batch {
        store.insert(new).await?;
    }
    info!(count, "Seeded demo students");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStudentStore;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashSet;

    #[test]
    fn generated_students_look_like_the_real_thing() {
        let mut rng = StdRng::seed_from_u64(7);
        let students = random_students(&mut rng, 50, 0);

        let emails: HashSet<_> = students.iter().map(|s| s.email.as_str()).collect();
        assert_eq!(emails.len(), 50);
        for s in &students {
            assert!((17..=30).contains(&s.age));
            assert!(GENDERS.contains(&s.gender.as_str()));
            assert!(YEAR_LEVELS.contains(&s.year_level.as_str()));
            assert!(COURSES.contains(&s.course.as_str()));
            assert!(SECTIONS.contains(&s.section.as_str()));
        }
    }

    #[tokio::test]
    async fn seeding_only_happens_once() {
        let store = MemoryStudentStore::default();
        assert_eq!(seed_if_empty(&store, 12).await.unwrap(), 12);
        assert_eq!(seed_if_empty(&store, 12).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 12);
    }
}
