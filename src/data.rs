use serde::Deserialize;

pub mod student;

/// A student id as the browser sends it back from a row button.
#[derive(Deserialize)]
pub struct IdForm {
    pub id: String,
}
