use crate::{
    data::student::Student,
    error::RosterError,
    form::{
        FormController, FormMode, FormTarget, GENDERS, ModeHint, SAVED_REDIRECT_DELAY,
        SubmitOutcome, YEAR_LEVELS,
    },
    list_view::{ListView, PAGE_SIZE, Row},
    maud_conveniences::{
        INPUT_CLASSES, alert, form_submit_button, render_table, select_form_element,
        simple_form_element, title,
    },
    state::{RosterState, page},
};
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use serde_json::json;

const RED_ALERT: &str = "bg-red-900 border-red-600 text-red-200";
const GREEN_ALERT: &str = "bg-green-900 border-green-600 text-green-200";
const TABLE_URL: &str = "/internal/students_table";
const SAVED_MESSAGE: &str = "Student saved successfully! Redirecting...";
const DELETE_FAILED: &str = "Failed to delete student";
const COLUMNS: [&str; 8] = [
    "ID",
    "Name",
    "Email",
    "Age",
    "Gender",
    "Course",
    "Year & Section",
    "Actions",
];

/// A [`RosterError`] shown as HTML rather than JSON.
#[derive(Debug)]
pub struct HtmlError {
    source: RosterError,
    full_page: bool,
}

impl HtmlError {
    /// For errors on routes the browser navigates to directly.
    pub fn page(source: RosterError) -> Self {
        Self {
            source,
            full_page: true,
        }
    }
}

impl From<RosterError> for HtmlError {
    fn from(source: RosterError) -> Self {
        Self {
            source,
            full_page: false,
        }
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        let status_code = self.source.status_code();
        if status_code.is_server_error() {
            error!(source = ?self.source, "Error rendering page");
        } else {
            debug!(source = ?self.source, "Unable to render page");
        }

        let message = match &self.source {
            RosterError::MissingStudent { id } => format!("Student {id} not found"),
            e if status_code.is_client_error() => e.to_string(),
            _ => "Something went wrong. Please try again.".to_string(),
        };
        let markup = html! {
            div class="bg-gray-800 p-8 rounded shadow-md max-w-md w-full" {
                (alert(RED_ALERT, "Error!", message))
                a href="/ui/students" class="hover:text-blue-300 underline" {"Back to students"}
            }
        };

        let markup = if self.full_page { page(markup) } else { markup };
        (status_code, markup).into_response()
    }
}

type HtmlResult<T> = Result<T, HtmlError>;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    search: String,
    page: Option<usize>,
}

impl ListQuery {
    fn view_over(self, snapshot: Vec<Student>) -> ListView {
        let mut view = ListView::new(snapshot);
        view.set_search(self.search);
        view.go_to(self.page.unwrap_or(1));
        view
    }
}

const PAGE_BUTTONS: usize = 5;
const PAGE_CLASSES: &str = "bg-slate-600 hover:bg-slate-800 py-1 px-3 rounded";
const CURRENT_PAGE_CLASSES: &str = "bg-blue-600 font-bold py-1 px-3 rounded";

fn list_vals(view: &ListView, page: usize) -> String {
    json!({ "search": view.search(), "page": page }).to_string()
}

fn pager(view: &ListView) -> Markup {
    let count = view.filtered_count();
    let shown = view.page_students().len();
    let first = if count == 0 {
        0
    } else {
        (view.page() - 1) * PAGE_SIZE + 1
    };
    let last = if count == 0 { 0 } else { first + shown - 1 };

    let mut previous = view.clone();
    previous.previous();
    let mut next = view.clone();
    next.next();

    html! {
        div class="flex flex-row justify-between items-center mt-4" {
            div class="text-sm text-gray-400" {
                "Showing " span class="font-medium" {(first)} " to " span class="font-medium" {(last)} " of " span class="font-medium" {(count)} " results"
            }
            div class="flex flex-row gap-2 items-center" {
                button class="bg-slate-600 hover:bg-slate-800 disabled:opacity-40 py-1 px-3 rounded" disabled[!view.has_previous()] hx-get=(TABLE_URL) hx-vals=(list_vals(view, previous.page())) hx-target="#student_table" hx-swap="outerHTML" {
                    "Previous"
                }
                @for number in 1..=view.total_pages().min(PAGE_BUTTONS) {
                    button class=(if number == view.page() { CURRENT_PAGE_CLASSES } else { PAGE_CLASSES }) hx-get=(TABLE_URL) hx-vals=(list_vals(view, number)) hx-target="#student_table" hx-swap="outerHTML" {
                        (number)
                    }
                }
                @if view.total_pages() > PAGE_BUTTONS {
                    span class="px-2 py-1 text-gray-400" {"..."}
                }
                button class="bg-slate-600 hover:bg-slate-800 disabled:opacity-40 py-1 px-3 rounded" disabled[!view.has_next()] hx-get=(TABLE_URL) hx-vals=(list_vals(view, next.page())) hx-target="#student_table" hx-swap="outerHTML" {
                    "Next"
                }
            }
        }
    }
}

fn students_table(view: &ListView, delete_failed: bool) -> Markup {
    let rows = view.page_rows();
    let mut blank_rows = rows.iter().filter(|row| **row == Row::Blank).count();
    let items: Vec<_> = rows
        .into_iter()
        .filter_map(|row| match row {
            Row::Student(student) => Some(student),
            Row::Blank => None,
        })
        .map(|student| {
            let delete_confirm = format!(
                "Are you sure you want to delete {} {}? This action cannot be undone.",
                student.first_name, student.last_name
            );
            [
                html! {(student.id)},
                html! {(student.full_name())},
                html! {(student.email)},
                html! {(student.age)},
                html! {(student.gender)},
                html! {(student.course)},
                html! {(student.year_level) " - " (student.section)},
                html! {
                    div class="flex flex-row gap-2" {
                        a href={"/ui/students/" (student.id) "?view=true"} class="text-blue-400 hover:text-blue-200 underline" {"View"}
                        a href={"/ui/students/" (student.id) "?edit=true"} class="text-green-400 hover:text-green-200 underline" {"Edit"}
                        button class="text-red-400 hover:text-red-200 underline" hx-delete={"/ui/students/" (student.id)} hx-vals=(list_vals(view, view.page())) hx-confirm=(delete_confirm) hx-target="#student_table" hx-swap="outerHTML" {
                            "Delete"
                        }
                    }
                },
            ]
        })
        .collect();

    //the "no students" row takes the place of one blank
    if items.is_empty() {
        blank_rows = blank_rows.saturating_sub(1);
    }

    html! {
        div id="student_table" {
            @if delete_failed {
                (alert(RED_ALERT, "Error!", DELETE_FAILED))
            }
            (render_table(COLUMNS, items, blank_rows, "No students found"))
            (pager(view))
        }
    }
}

pub async fn get_students_page(
    State(state): State<RosterState>,
    Query(query): Query<ListQuery>,
) -> HtmlResult<Markup> {
    let view = query.view_over(state.list().await.map_err(HtmlError::page)?);

    Ok(state.render(html! {
        div class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-6xl w-full flex flex-col space-y-4" {
            div class="flex flex-row justify-between items-center gap-4" {
                (title("Student List"))
                div class="flex flex-row gap-3" {
                    input type="search" name="search" value=(view.search()) placeholder="Search students..." hx-get=(TABLE_URL) hx-trigger="input changed delay:500ms, keyup[key=='Enter']" hx-target="#student_table" hx-swap="outerHTML" class=(INPUT_CLASSES);
                    a href="/ui/students/new" class="bg-blue-600 hover:bg-blue-800 font-bold py-2 px-4 rounded whitespace-nowrap" {
                        "+ Student"
                    }
                }
            }
            (students_table(&view, false))
        }
    }))
}

pub async fn internal_get_students_table(
    State(state): State<RosterState>,
    Query(query): Query<ListQuery>,
) -> HtmlResult<Markup> {
    let view = query.view_over(state.list().await?);
    Ok(students_table(&view, false))
}

pub async fn delete_student_row(
    State(state): State<RosterState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> HtmlResult<Markup> {
    let FormTarget::Existing(id) = FormTarget::parse(&id)? else {
        return Err(RosterError::InvalidStudentId { original: id }.into());
    };
    let mut view = query.view_over(state.list().await?);

    let delete_failed = match state.delete(id).await {
        Ok(()) => {
            view.forget(id);
            false
        }
        Err(e) => {
            warn!(?e, id, "Error deleting student");
            true
        }
    };

    Ok(students_table(&view, delete_failed))
}

#[derive(Debug, Default, Deserialize)]
pub struct ModeQuery {
    #[serde(default)]
    view: bool,
    #[serde(default)]
    edit: bool,
}

impl From<ModeQuery> for ModeHint {
    fn from(ModeQuery { view, edit }: ModeQuery) -> Self {
        Self { view, edit }
    }
}

/// Where the view/edit switch points, if the form has one.
fn toggle_link(form: &FormController) -> Option<(String, &'static str)> {
    if !form.can_toggle() {
        return None;
    }

    let mut toggled = form.clone();
    toggled.toggle_mode();
    let href = format!("/ui/students/{}", form.target().path_segment());
    Some(match toggled.mode() {
        FormMode::View => (format!("{href}?view=true"), "View"),
        _ => (format!("{href}?edit=true"), "Edit"),
    })
}

fn student_form(form: &FormController) -> Markup {
    let draft = form.draft();
    let disabled = form.mode() == FormMode::View;
    let error = |field: &str| form.errors().get(field).map(String::as_str);
    let action = format!("/ui/students/{}", form.target().path_segment());
    let redirect_trigger = format!("load delay:{}ms", SAVED_REDIRECT_DELAY.as_millis());
    let submit_text = if form.mode() == FormMode::Create {
        "Create Student"
    } else {
        "Update Student"
    };

    html! {
        div id="student_form" class="bg-gray-800 p-8 rounded shadow-md max-w-3xl w-full" {
            div class="flex flex-row justify-between items-center mb-4" {
                a href="/ui/students" class="hover:text-blue-300 underline" {"Back"}
                @if let Some((href, text)) = toggle_link(form) {
                    a href=(href) class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded" {(text)}
                }
            }
            (title(form.title()))

            @if form.saved().is_some() {
                (alert(GREEN_ALERT, "Success!", SAVED_MESSAGE))
                div hx-get="/ui/students" hx-trigger=(redirect_trigger) hx-target="body" hx-push-url="true" {}
            }
            @if let Some(message) = form.submit_error() {
                (alert(RED_ALERT, "Error!", message))
            }

            form hx-post=(action) hx-target="#student_form" hx-swap="outerHTML" class="p-4" {
                div class="grid grid-cols-1 md:grid-cols-3 gap-4" {
                    (simple_form_element("firstName", "First Name", None, &draft.first_name, disabled, error("firstName")))
                    (simple_form_element("middleName", "Middle Name (optional)", None, &draft.middle_name, disabled, error("middleName")))
                    (simple_form_element("lastName", "Last Name", None, &draft.last_name, disabled, error("lastName")))
                }
                div class="grid grid-cols-1 md:grid-cols-2 gap-4" {
                    (simple_form_element("email", "Email", None, &draft.email, disabled, error("email")))
                    (simple_form_element("age", "Age", Some("number"), &draft.age, disabled, error("age")))
                    (select_form_element("gender", "Gender", &GENDERS, &draft.gender, disabled, error("gender")))
                    (simple_form_element("course", "Course", None, &draft.course, disabled, error("course")))
                    (select_form_element("yearLevel", "Year Level", &YEAR_LEVELS, &draft.year_level, disabled, error("yearLevel")))
                    (simple_form_element("section", "Section", None, &draft.section, disabled, error("section")))
                }
                @if !disabled {
                    (form_submit_button(Some(submit_text)))
                }
            }
        }
    }
}

pub async fn get_student_page(
    State(state): State<RosterState>,
    Path(id): Path<String>,
    Query(mode): Query<ModeQuery>,
) -> HtmlResult<Markup> {
    let target = FormTarget::parse(&id).map_err(HtmlError::page)?;
    let mut form = FormController::new(target, mode.into());
    if let FormTarget::Existing(id) = target {
        let student = state.read(id).await.map_err(HtmlError::page)?;
        form.load(&student);
    }

    Ok(state.render(student_form(&form)))
}

pub async fn post_student_form(
    State(state): State<RosterState>,
    Path(id): Path<String>,
    Form(fields): Form<Vec<(String, String)>>,
) -> HtmlResult<Markup> {
    let target = FormTarget::parse(&id)?;
    let mut form = FormController::new(target, ModeHint::default());
    for (field, value) in fields {
        form.edit_field(&field, value);
    }
    match form.submit(&state).await {
        SubmitOutcome::Saved(student) => debug!(id = student.id, "Saved student from form"),
        outcome => debug!(?outcome, "Student form not saved"),
    }

    Ok(student_form(&form))
}

#[cfg(test)]
mod tests {
    use crate::{
        data::student::StudentPayload,
        routes::{app, ui::CURRENT_PAGE_CLASSES},
        state::RosterState,
        store::memory::MemoryStudentStore,
    };
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn app_with(courses: &[&str]) -> (Router, RosterState) {
        let state = RosterState::new(Arc::new(MemoryStudentStore::default()));
        for (i, course) in courses.iter().enumerate() {
            let payload: StudentPayload = serde_json::from_value(json!({
                "email": format!("s{i}@example.com"),
                "firstName": format!("First{i}"),
                "lastName": "Okafor",
                "age": 20,
                "gender": "Male",
                "course": course,
                "yearLevel": "3rd",
                "section": "B",
            }))
            .unwrap();
            state.create(payload).await.unwrap();
        }
        (app(state.clone()), state)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn empty_list_keeps_its_height() {
        let (app, _) = app_with(&[]).await;
        let (status, html) = send(&app, get("/ui/students")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("No students found"));
        assert_eq!(html.matches("<tr class=\"h-[54px]\">").count(), 8);
    }

    #[tokio::test]
    async fn table_fragment_filters_and_pages() {
        let courses = ["Computer Science"; 3]
            .into_iter()
            .chain(["Arts"; 7])
            .collect::<Vec<_>>();
        let (app, _) = app_with(&courses).await;

        let (_, html) = send(&app, get("/internal/students_table?search=computer")).await;
        assert!(html.contains("First0") && html.contains("First2"));
        assert!(!html.contains("First3"));
        assert!(html.contains("&quot;page&quot;:1,"));
        assert!(!html.contains("&quot;page&quot;:2,"));
        assert!(!html.contains(">...</span>"));

        let (_, html) = send(&app, get("/internal/students_table?page=2")).await;
        assert!(html.contains("First8") && html.contains("First9"));
        assert!(!html.contains("First7 "));
        assert_eq!(html.matches("<tr class=\"h-[54px]\">").count(), 8);
    }

    #[tokio::test]
    async fn pager_numbers_the_first_five_pages() {
        let (app, _) = app_with(&["Arts"; 50]).await;

        let (_, html) = send(&app, get("/internal/students_table")).await;
        for page in 1..=5 {
            assert!(html.contains(&format!("&quot;page&quot;:{page},")));
        }
        assert!(!html.contains("&quot;page&quot;:6,"));
        assert!(html.contains(">...</span>"));
        assert!(html.contains(&format!("class=\"{CURRENT_PAGE_CLASSES}\"")));
    }

    #[tokio::test]
    async fn deleting_a_row_rerenders_without_it() {
        let (app, state) = app_with(&["Arts", "Business"]).await;
        let id = state.list().await.unwrap()[0].id;

        let request = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/ui/students/{id}?page=1"))
            .body(Body::empty())
            .unwrap();
        let (status, html) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(!html.contains("First0"));
        assert!(html.contains("First1"));
        assert_eq!(state.list().await.unwrap().len(), 1);

        let (_, html) = send(&app, request_delete(id)).await;
        assert!(html.contains("Failed to delete student"));
    }

    fn request_delete(id: i64) -> Request<Body> {
        Request::builder()
            .method(Method::DELETE)
            .uri(format!("/ui/students/{id}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn detail_page_titles_follow_the_mode() {
        let (app, state) = app_with(&["Arts"]).await;
        let id = state.list().await.unwrap()[0].id;

        let (_, html) = send(&app, get("/ui/students/new")).await;
        assert!(html.contains("Add New Student"));
        assert!(html.contains("Create Student"));

        let (_, html) = send(&app, get(&format!("/ui/students/{id}?view=true"))).await;
        assert!(html.contains("Student Details"));
        assert!(html.contains("disabled class="));
        assert!(!html.contains("Update Student"));
        assert!(html.contains(&format!("/ui/students/{id}?edit=true")));

        let (_, html) = send(&app, get(&format!("/ui/students/{id}?view=true&edit=true"))).await;
        assert!(html.contains("Edit Student"));
        assert!(html.contains("Update Student"));

        let (status, html) = send(&app, get("/ui/students/999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(html.contains("Student 999 not found"));
    }

    #[tokio::test]
    async fn submitting_the_form_validates_then_saves() {
        let (app, state) = app_with(&[]).await;

        let invalid = post_form("/ui/students/new", "firstName=Ada&age=abc");
        let (status, html) = send(&app, invalid).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Email is required"));
        assert!(html.contains("Age must be a valid number"));
        assert!(html.contains("value=\"Ada\""));
        assert!(state.list().await.unwrap().is_empty());

        let body = "firstName=Ada&middleName=&lastName=Lovelace&email=ada%40example.com&age=36&gender=Female&course=Mathematics&yearLevel=4th&section=A";
        let (_, html) = send(&app, post_form("/ui/students/new", body)).await;
        assert!(html.contains("Student saved successfully! Redirecting..."));
        assert!(html.contains("load delay:1500ms"));

        let saved = state.list().await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].middle_name, None);

        let (_, html) = send(&app, post_form("/ui/students/new", body)).await;
        assert!(html.contains("The email has already been taken."));
    }
}
