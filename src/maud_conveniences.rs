use crate::validation::ValidationError;
use maud::{Markup, Render, html};

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn field_error(id: &str, error: Option<&ValidationError>) -> Markup {
    html! {
        span id=(id) class="text-sm text-red-400" {
            @if let Some(error) = error {
                (error.to_string())
            }
        }
    }
}

pub fn validated_form_element(
    name: &str,
    label: &str,
    value: &str,
    input_type: Option<&str>,
    validate_url: &str,
    error: Option<&ValidationError>,
) -> Markup {
    let error_id = format!("{name}_error");

    html! {
        div class="mb-4" {
            label for=(name) class="block text-sm font-bold mb-2 text-gray-300" {(label)}
            input type=(input_type.unwrap_or("text")) id=(name) name=(name) value=(value) hx-post=(validate_url) hx-trigger="blur" hx-target={"#" (error_id)} hx-swap="outerHTML" class="shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600" {}
            (field_error(&error_id, error))
        }
    }
}

pub fn form_submit_button(text: &str) -> Markup {
    html! {
        div class="flex items-center justify-between" {
            button type="submit" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
                (text)
            }
        }
    }
}
