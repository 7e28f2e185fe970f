use crate::state::RosterState;
use axum::extract::State;
use maud::{Markup, html};

pub async fn get_index_route(State(state): State<RosterState>) -> Markup {
    state.render(html! {
        div class="bg-gray-800 p-8 rounded shadow-md max-w-md w-full" {
            h1 class="text-2xl font-semibold mb-6 text-center" {
                "Roster"
            }

            div class="flex flex-row space-x-4 justify-center" {
                a href="/ui/students" class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded"  {
                    "View Students"
                }
                a href="/ui/students/new" class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded"  {
                    "Add Student"
                }
            }
        }
    })
}

pub async fn get_health() -> &'static str {
    "ok"
}
