use crate::{
    controller::{Action, Controller, ControllerState, FormMode},
    data::{
        IdForm,
        student::{Student, StudentDraft, StudentId},
    },
    error::RosterResult,
    maud_conveniences::{field_error, form_submit_button, validated_form_element},
    state::RosterState,
    table::{self, Column, SortKey},
    validation::Field,
};
use axum::{
    Form,
    extract::{Path, Query, State},
};
use maud::{Markup, html};
use serde::Deserialize;
use serde_json::json;

pub fn student_columns() -> Vec<Column<Student>> {
    vec![
        Column::accessor("ID", |s: &Student| match &s.id {
            StudentId::Number(n) => SortKey::Number(n.clone()),
            StudentId::Text(t) => SortKey::Text(t.clone()),
        }),
        Column::accessor("FIRST NAME", |s: &Student| {
            SortKey::Text(s.first_name.clone())
        }),
        Column::accessor("LAST NAME", |s: &Student| SortKey::Text(s.last_name.clone())),
        Column::accessor("EMAIL", |s: &Student| SortKey::Text(s.email.clone())),
        Column::renderer("FUNCTION", student_actions),
    ]
}

fn student_actions(student: &Student) -> Markup {
    let hx_vals = json!({"id": student.id.to_string()}).to_string();

    html! {
        div class="flex flex-row space-x-2" {
            button class="bg-green-600 hover:bg-green-800 font-bold py-2 px-4 rounded text-sm" hx-post="/students/edit" hx-vals=(hx_vals) hx-target="#student_form" {
                "UPDATE"
            }
            button class="bg-red-600 hover:bg-red-800 font-bold py-2 px-4 rounded text-sm" hx-delete="/students" hx-vals=(hx_vals) hx-target="#all_students" {
                "DELETE"
            }
        }
    }
}

pub fn render_student_form(state: &ControllerState) -> Markup {
    let submit_text = match state.mode {
        FormMode::Create => "Submit",
        FormMode::Update => "Update",
    };

    html! {
        form hx-post="/students" hx-trigger="submit" hx-target="#student_form" class="p-4" {
            @for field in Field::ALL {
                (validated_form_element(
                    field.name(),
                    field.label(),
                    state.draft.field(field),
                    (field == Field::Email).then_some("email"),
                    &format!("/internal/validate/{}", field.name()),
                    state.errors.get(&field),
                ))
            }
            (form_submit_button(submit_text))
        }
    }
}

pub fn render_students(controller: &Controller) -> Markup {
    table::render(
        controller.columns(),
        &controller.state().students,
        controller.state().sort,
        "/internal/sort",
        "#all_students",
    )
}

pub async fn internal_get_students(State(state): State<RosterState>) -> Markup {
    render_students(&*state.controller().await)
}

pub async fn internal_get_student_form(State(state): State<RosterState>) -> Markup {
    render_student_form(state.controller().await.state())
}

pub async fn post_submit_student(
    State(state): State<RosterState>,
    Form(draft): Form<StudentDraft>,
) -> RosterResult<Markup> {
    let mut controller = state.controller().await;
    controller.dispatch(Action::Submit(draft)).await?;

    Ok(html! {
        (render_student_form(controller.state()))
        div hx-swap-oob="true" id="all_students" class="mt-4" {
            (render_students(&controller))
        }
    })
}

pub async fn post_edit_student(
    State(state): State<RosterState>,
    Form(id_form): Form<IdForm>,
) -> RosterResult<Markup> {
    let mut controller = state.controller().await;
    let controller_state = controller
        .dispatch(Action::EditRequested(id_form.id))
        .await?;

    Ok(render_student_form(controller_state))
}

pub async fn delete_student(
    State(state): State<RosterState>,
    Query(id_form): Query<IdForm>,
) -> RosterResult<Markup> {
    let mut controller = state.controller().await;
    controller
        .dispatch(Action::DeleteRequested(id_form.id))
        .await?;

    Ok(render_students(&controller))
}

pub async fn internal_post_validate_field(
    State(state): State<RosterState>,
    Path(field): Path<Field>,
    Form(draft): Form<StudentDraft>,
) -> RosterResult<Markup> {
    let mut controller = state.controller().await;
    let value = draft.field(field).to_string();
    let controller_state = controller
        .dispatch(Action::FieldBlurred { field, value })
        .await?;

    Ok(field_error(
        &format!("{}_error", field.name()),
        controller_state.errors.get(&field),
    ))
}

#[derive(Deserialize)]
pub struct SortForm {
    column: usize,
}

pub async fn internal_post_sort(
    State(state): State<RosterState>,
    Form(SortForm { column }): Form<SortForm>,
) -> RosterResult<Markup> {
    let mut controller = state.controller().await;
    controller.dispatch(Action::SortToggled(column)).await?;

    Ok(render_students(&controller))
}

#[cfg(test)]
mod tests {
    use crate::{
        config::{ApiConfig, DEFAULT_API_BASE_URL, DEFAULT_SERVER_IP, RuntimeConfiguration},
        data::student::Student,
        routes::router,
        state::RosterState,
        testing::{FakeBackend, ann_lee},
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header::CONTENT_TYPE},
    };
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state_over(backend: &Arc<FakeBackend>) -> RosterState {
        let config = RuntimeConfiguration::with_api_config(
            ApiConfig::from_base_url(DEFAULT_API_BASE_URL).unwrap(),
            DEFAULT_SERVER_IP,
        )
        .unwrap();
        RosterState::with_transport(config, backend.clone())
    }

    async fn send(state: &RosterState, method: Method, uri: &str, form: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();

        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn index_renders_the_fetched_students() {
        let backend = FakeBackend::with_students(vec![ann_lee()]);
        let state = state_over(&backend);

        let (status, body) = send(&state, Method::GET, "/", "").await;

        assert_eq!(status, StatusCode::OK);
        for expected in ["ID", "FIRST NAME", "LAST NAME", "EMAIL", "FUNCTION", "Ann", "a@x.com", "UPDATE", "DELETE", "Submit"] {
            assert!(body.contains(expected), "missing {expected:?}");
        }
    }

    #[tokio::test]
    async fn invalid_submit_shows_the_field_message() {
        let backend = FakeBackend::with_students(vec![ann_lee()]);
        let state = state_over(&backend);
        send(&state, Method::GET, "/", "").await;

        let (status, body) = send(
            &state,
            Method::POST,
            "/students",
            "first_name=1Bad&last_name=Lee&email=b%40x.com",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("First name must not contain numbers or special characters"));
        assert!(body.contains("value=\"1Bad\""));
        assert_eq!(backend.requests().len(), 1);
        assert_eq!(backend.students(), vec![ann_lee()]);
    }

    #[tokio::test]
    async fn valid_submit_returns_an_empty_form_and_the_new_row() {
        let backend = FakeBackend::with_students(vec![ann_lee()]);
        let state = state_over(&backend);
        send(&state, Method::GET, "/", "").await;

        let (status, body) = send(
            &state,
            Method::POST,
            "/students",
            "first_name=Bo&last_name=Kim&email=bo%40kim.org",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("bo@kim.org"));
        assert!(body.contains("hx-swap-oob=\"true\""));
        assert!(!body.contains("value=\"Bo\""));
        assert_eq!(backend.students().len(), 2);
    }

    #[tokio::test]
    async fn edit_then_delete_round_trip() {
        let backend = FakeBackend::with_students(vec![ann_lee()]);
        let state = state_over(&backend);
        send(&state, Method::GET, "/", "").await;

        let (status, form) = send(&state, Method::POST, "/students/edit", "id=1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(form.contains("value=\"Ann\""));
        assert!(form.contains("Update"));

        let (status, table) = send(&state, Method::DELETE, "/students?id=1", "").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!table.contains("a@x.com"));

        let (_, form) = send(&state, Method::GET, "/internal/get_student_form", "").await;
        assert!(form.contains("Update"));
    }

    #[tokio::test]
    async fn editing_an_unknown_student_is_not_found() {
        let backend = FakeBackend::with_students(vec![ann_lee()]);
        let state = state_over(&backend);
        send(&state, Method::GET, "/", "").await;

        let (status, body) = send(&state, Method::POST, "/students/edit", "id=404").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Unable to find student with ID: 404"));
    }

    #[tokio::test]
    async fn text_ids_round_trip_through_the_row_buttons() {
        let padded: Student = serde_json::from_value(
            json!({"id": "007", "first_name": "Jay", "last_name": "Bond", "email": "j@b.uk"}),
        )
        .unwrap();
        let backend = FakeBackend::with_students(vec![padded]);
        let state = state_over(&backend);

        let (_, page) = send(&state, Method::GET, "/", "").await;
        assert!(page.contains("&quot;id&quot;:&quot;007&quot;"));

        let (status, form) = send(&state, Method::POST, "/students/edit", "id=007").await;
        assert_eq!(status, StatusCode::OK);
        assert!(form.contains("value=\"Jay\""));

        let (status, _) = send(&state, Method::DELETE, "/students?id=007", "").await;
        assert_eq!(status, StatusCode::OK);
        assert!(backend.students().is_empty());
    }

    #[tokio::test]
    async fn blur_returns_just_the_field_error() {
        let backend = FakeBackend::with_students(vec![]);
        let state = state_over(&backend);

        let (status, body) = send(
            &state,
            Method::POST,
            "/internal/validate/email",
            "first_name=&last_name=&email=nope",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("<span id=\"email_error\""));
        assert!(body.contains("email must be a valid email"));
        assert!(!body.contains("first_name is a required field"));
    }

    #[tokio::test]
    async fn sort_header_toggles_the_arrow() {
        let backend = FakeBackend::with_students(vec![ann_lee()]);
        let state = state_over(&backend);
        send(&state, Method::GET, "/", "").await;

        let (_, ascending) = send(&state, Method::POST, "/internal/sort", "column=1").await;
        assert!(ascending.contains("FIRST NAME<span> ▲</span>"));

        let (_, descending) = send(&state, Method::POST, "/internal/sort", "column=1").await;
        assert!(descending.contains("FIRST NAME<span> ▼</span>"));

        send(&state, Method::POST, "/internal/sort", "column=1").await;
        let (_, cleared) = send(&state, Method::GET, "/internal/get_students", "").await;
        assert!(cleared.contains("FIRST NAME<span></span>"));
    }

    #[tokio::test]
    async fn failed_create_surfaces_as_bad_gateway() {
        let backend = FakeBackend::with_students(vec![ann_lee()]);
        let state = state_over(&backend);
        send(&state, Method::GET, "/", "").await;

        backend.fail_next(StatusCode::INTERNAL_SERVER_ERROR);
        let (status, body) = send(
            &state,
            Method::POST,
            "/students",
            "first_name=Bo&last_name=Kim&email=bo%40kim.org",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("Roster Error"));
        assert_eq!(backend.students(), vec![ann_lee()]);
    }
}
