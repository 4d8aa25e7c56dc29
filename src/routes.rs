use crate::{
    routes::{
        index::get_index_route,
        students::{
            delete_student, internal_get_student_form, internal_get_students,
            internal_post_sort, internal_post_validate_field, post_edit_student,
            post_submit_student,
        },
    },
    state::RosterState,
};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

pub mod index;
pub mod students;

pub fn router(state: RosterState) -> Router {
    Router::new()
        .route("/", get(get_index_route))
        .route(
            "/students",
            post(post_submit_student).delete(delete_student),
        )
        .route("/students/edit", post(post_edit_student))
        .route("/internal/get_students", get(internal_get_students))
        .route("/internal/get_student_form", get(internal_get_student_form))
        .route(
            "/internal/validate/{field}",
            post(internal_post_validate_field),
        )
        .route("/internal/sort", post(internal_post_sort))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
