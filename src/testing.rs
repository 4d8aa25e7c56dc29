//! In-memory stand-in for the student API.

use crate::{
    data::student::{Student, StudentDraft, StudentId},
    error::{StatusSnafu, TransportError},
    transport::Transport,
};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

pub fn ann_lee() -> Student {
    Student {
        id: StudentId::from(1),
        first_name: "Ann".into(),
        last_name: "Lee".into(),
        email: "a@x.com".into(),
    }
}

#[derive(Debug, Default)]
struct BackendState {
    students: Vec<Student>,
    next_id: i64,
    requests: Vec<(Method, Vec<String>)>,
    fail_next: Option<StatusCode>,
    fail_next_on: Option<(Method, StatusCode)>,
    respond_next: Option<Value>,
}

#[derive(Debug, Default)]
pub struct FakeBackend {
    state: Mutex<BackendState>,
}

impl FakeBackend {
    pub fn with_students(students: Vec<Student>) -> Arc<Self> {
        let next_id = students
            .iter()
            .filter_map(|s| match &s.id {
                StudentId::Number(n) => n.as_i64(),
                StudentId::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        Arc::new(Self {
            state: Mutex::new(BackendState {
                students,
                next_id,
                ..BackendState::default()
            }),
        })
    }

    pub fn students(&self) -> Vec<Student> {
        self.state.lock().unwrap().students.clone()
    }

    /// Every request seen so far, as its method and unencoded path segments.
    pub fn requests(&self) -> Vec<(Method, Vec<String>)> {
        self.state.lock().unwrap().requests.clone()
    }

    /// The next request is recorded but answered with `status` and left unapplied.
    pub fn fail_next(&self, status: StatusCode) {
        self.state.lock().unwrap().fail_next = Some(status);
    }

    /// Like `fail_next`, but for the next request made with `method`.
    pub fn fail_next_on(&self, method: Method, status: StatusCode) {
        self.state.lock().unwrap().fail_next_on = Some((method, status));
    }

    /// The next request is answered with `body` verbatim.
    pub fn respond_next(&self, body: Value) {
        self.state.lock().unwrap().respond_next = Some(body);
    }
}

#[async_trait]
impl Transport for FakeBackend {
    async fn request(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<Value, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push((
            method.clone(),
            segments.iter().map(ToString::to_string).collect(),
        ));

        let fail_on_method = state
            .fail_next_on
            .as_ref()
            .is_some_and(|(failing, _)| *failing == method);
        let status = if fail_on_method {
            state.fail_next_on.take().map(|(_, status)| status)
        } else {
            state.fail_next.take()
        };
        if let Some(status) = status {
            return StatusSnafu {
                status,
                payload: json!({"message": "rejected by test"}),
            }
            .fail();
        }
        if let Some(body) = state.respond_next.take() {
            return Ok(body);
        }

        let draft = || -> StudentDraft {
            serde_json::from_value(body.clone().unwrap_or_default()).unwrap()
        };
        let not_found = || {
            StatusSnafu {
                status: StatusCode::NOT_FOUND,
                payload: json!({"message": "not found"}),
            }
            .fail()
        };

        match (method.as_str(), segments) {
            ("GET", ["students"]) => Ok(serde_json::to_value(&state.students).unwrap()),
            ("POST", ["students"]) => {
                let draft = draft();
                let student = Student {
                    id: StudentId::from(state.next_id),
                    first_name: draft.first_name,
                    last_name: draft.last_name,
                    email: draft.email,
                };
                state.next_id += 1;
                state.students.push(student.clone());
                Ok(serde_json::to_value(student).unwrap())
            }
            ("PUT", ["students", id]) => {
                let draft = draft();
                let Some(student) = state
                    .students
                    .iter_mut()
                    .find(|s| s.id.to_string() == *id)
                else {
                    return not_found();
                };
                student.first_name = draft.first_name;
                student.last_name = draft.last_name;
                student.email = draft.email;
                Ok(serde_json::to_value(student.clone()).unwrap())
            }
            ("DELETE", ["students", id]) => {
                let before = state.students.len();
                state.students.retain(|s| s.id.to_string() != *id);
                if state.students.len() == before {
                    return not_found();
                }
                Ok(Value::Null)
            }
            _ => not_found(),
        }
    }
}
