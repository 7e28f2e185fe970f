//! Search, paging and row padding over one fetched snapshot of students.

use crate::data::student::Student;

pub const PAGE_SIZE: usize = 8;

/// One line of the students table. A page always holds [`PAGE_SIZE`] rows so
/// the table keeps the same height on every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row<'a> {
    Student(&'a Student),
    Blank,
}

#[derive(Debug, Clone)]
pub struct ListView {
    snapshot: Vec<Student>,
    search: String,
    page: usize,
}

/// Match against first name, last name, email and course. `needle` must
/// already be lowercase.
fn matches(student: &Student, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [
        &student.first_name,
        &student.last_name,
        &student.email,
        &student.course,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

impl ListView {
    pub fn new(snapshot: Vec<Student>) -> Self {
        Self {
            snapshot,
            search: String::new(),
            page: 1,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Changing the search always goes back to the first page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn filtered(&self) -> impl Iterator<Item = &Student> {
        let needle = self.search.to_lowercase();
        self.snapshot
            .iter()
            .filter(move |student| matches(student, &needle))
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered().count()
    }

    pub fn total_pages(&self) -> usize {
        self.filtered_count().div_ceil(PAGE_SIZE)
    }

    pub const fn page(&self) -> usize {
        self.page
    }

    /// Moves to `page`, clamped into `1..=total_pages`.
    pub fn go_to(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn next(&mut self) {
        if self.has_next() {
            self.page += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.has_previous() {
            self.page -= 1;
        }
    }

    /// Students on the current page, in snapshot order.
    pub fn page_students(&self) -> Vec<&Student> {
        self.filtered()
            .skip((self.page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect()
    }

    /// The current page padded with blank rows up to [`PAGE_SIZE`].
    pub fn page_rows(&self) -> Vec<Row<'_>> {
        let mut rows: Vec<Row> = self
            .page_students()
            .into_iter()
            .map(Row::Student)
            .collect();
        rows.resize(PAGE_SIZE, Row::Blank);
        rows
    }

    /// Drops a student from the snapshot once the server confirmed the delete.
    /// The page is re-clamped in case the last row of the last page went.
    pub fn forget(&mut self, id: i64) {
        self.snapshot.retain(|student| student.id != id);
        self.go_to(self.page);
    }
}
