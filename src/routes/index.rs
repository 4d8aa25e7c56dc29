use crate::{
    controller::Action,
    error::RosterResult,
    maud_conveniences::title,
    routes::students::{render_student_form, render_students},
    state::RosterState,
};
use axum::extract::State;
use maud::{Markup, html};

pub async fn get_index_route(State(state): State<RosterState>) -> RosterResult<Markup> {
    let mut controller = state.controller().await;
    controller.dispatch(Action::Load).await?;

    Ok(state.render(html! {
        div class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-4xl w-full flex flex-col space-y-4" {
            (title("Students"))
            div id="student_form" class="max-w-md w-full mx-auto" {
                (render_student_form(controller.state()))
            }
            div id="all_students" class="mt-4" {
                (render_students(&controller))
            }
        }
    }))
}
