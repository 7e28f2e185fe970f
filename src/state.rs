use crate::{api::StudentsApi, store::StudentStore};
use maud::{DOCTYPE, Markup, html};
use std::{ops::Deref, sync::Arc};

#[derive(Clone, Debug)]
pub struct RosterState {
    api: StudentsApi,
}

impl RosterState {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self {
            api: StudentsApi::new(store),
        }
    }

    #[allow(clippy::unused_self)] //in case self is ever needed :)
    pub fn render(&self, markup: Markup) -> Markup {
        page(markup)
    }
}

/// The document every full page is wrapped in. Error pages use it directly as
/// they have no state to hand.
#[allow(clippy::needless_pass_by_value)] //to allow direct html! usage
pub fn page(markup: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8" {}
                meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                title { "Roster" }
            }
            body class="bg-gray-900 min-h-screen flex flex-col items-center justify-center text-white" {
                (markup)
            }
        }
    }
}

impl Deref for RosterState {
    type Target = StudentsApi;

    fn deref(&self) -> &Self::Target {
        &self.api
    }
}
