use maud::{Markup, Render, html};

pub const INPUT_CLASSES: &str = "shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600 disabled:opacity-60";

/// A table that always renders `titles.len()` columns and pads its body with
/// `blank_rows` empty rows, so it keeps its height as the row count changes.
pub fn render_table<const N: usize>(
    titles: [&'static str; N],
    items: Vec<[Markup; N]>,
    blank_rows: usize,
    empty_message: &str,
) -> Markup {
    html! {
        div class="overflow-x-auto" {
            table class="min-w-full bg-gray-800 rounded shadow-md" {
                thead class="bg-gray-700" {
                    tr {
                        @for title in titles {
                            th class="py-2 px-4 text-left font-semibold text-gray-300" {(title)}
                        }
                    }
                }
                tbody {
                    @if items.is_empty() {
                        tr class="h-[54px]" {
                            td colspan=(N) class="py-2 px-4 border-b border-gray-600 text-center text-gray-400 italic" {(empty_message)}
                        }
                    }
                    @for row in items {
                        tr class="h-[54px]" {
                            @for col in row {
                                td class="py-2 px-4 border-b border-gray-600 text-gray-200" {(col)}
                            }
                        }
                    }
                    @for _ in 0..blank_rows {
                        tr class="h-[54px]" {
                            td colspan=(N) class="py-2 px-4 border-b border-gray-600" {(maud::PreEscaped("&nbsp;"))}
                        }
                    }
                }
            }
        }
    }
}

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn form_element(id: &'static str, label: &str, error: Option<&str>, element: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-bold mb-2 text-gray-300" {(label)}
            (element)
            @if let Some(error) = error {
                p class="text-red-400 text-xs italic mt-1" {(error)}
            }
        }
    }
}

pub fn simple_form_element(
    id: &'static str,
    label: &str,
    ty: Option<&str>,
    value: &str,
    disabled: bool,
    error: Option<&str>,
) -> Markup {
    form_element(
        id,
        label,
        error,
        html! {
            input type=(ty.unwrap_or("text")) id=(id) name=(id) value=(value) disabled[disabled] class=(INPUT_CLASSES) {}
        },
    )
}

pub fn select_form_element(
    id: &'static str,
    label: &str,
    options: &[&str],
    value: &str,
    disabled: bool,
    error: Option<&str>,
) -> Markup {
    let placeholder = format!("Select {}", label.to_lowercase());
    form_element(
        id,
        label,
        error,
        html! {
            select id=(id) name=(id) disabled[disabled] class=(INPUT_CLASSES) {
                option value="" selected[value.is_empty()] {(placeholder)}
                @for option in options {
                    option value=(option) selected[*option == value] {(option)}
                }
                @if !value.is_empty() && !options.contains(&value) {
                    option value=(value) selected {(value)}
                }
            }
        },
    )
}

pub fn form_submit_button(text: Option<&str>) -> Markup {
    html! {
        div class="flex items-center justify-between" {
            button type="submit" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
                (text.unwrap_or("Submit"))
            }
        }
    }
}

pub fn alert(kind_classes: &str, heading: &str, message: impl Render) -> Markup {
    html! {
        div role="alert" class={"border px-4 py-3 rounded relative mb-4 " (kind_classes)} {
            strong class="font-bold" {(heading)}
            " "
            span {(message)}
        }
    }
}
