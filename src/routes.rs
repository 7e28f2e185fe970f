use crate::state::{RosterState, page};
use axum::{Router, http::StatusCode, routing::get};
use maud::{Markup, html};

pub mod index;
pub mod students;
pub mod ui;

async fn not_found() -> (StatusCode, Markup) {
    (
        StatusCode::NOT_FOUND,
        page(html! {
            div class="bg-gray-800 p-8 rounded shadow-md max-w-md w-full text-center" {
                h1 class="text-2xl font-semibold mb-4 text-gray-400 tracking-wider" {"404 | Not Found"}
                a href="/" class="hover:text-blue-300 underline" {"Go back to Home"}
            }
        }),
    )
}

/// Every route the server answers, minus the outer layers.
pub fn app(state: RosterState) -> Router {
    Router::new()
        .route("/", get(index::get_index_route))
        .route("/health", get(index::get_health))
        .route(
            "/students",
            get(students::get_students).post(students::post_student),
        )
        .route(
            "/students/{id}",
            get(students::get_student)
                .put(students::put_student)
                .delete(students::delete_student),
        )
        .route("/ui/students", get(ui::get_students_page))
        .route(
            "/ui/students/{id}",
            get(ui::get_student_page)
                .post(ui::post_student_form)
                .delete(ui::delete_student_row),
        )
        .route(
            "/internal/students_table",
            get(ui::internal_get_students_table),
        )
        .fallback(not_found)
        .with_state(state)
}
