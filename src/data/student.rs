use crate::{
    error::{DecodeSnafu, EncodeSnafu, TransportError},
    transport::Transport,
    validation::Field,
};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use snafu::ResultExt;
use std::{
    fmt::{Display, Formatter},
    sync::Arc,
};

const COLLECTION: &str = "students";

/// Server-assigned identifier, held exactly as the server sent it and written back unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudentId {
    Number(Number),
    Text(String),
}

impl From<i64> for StudentId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl Display for StudentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// What the form edits and what gets sent to the API - a student without its id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDraft {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl StudentDraft {
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
        }
    }

    pub fn set_field(&mut self, field: Field, value: String) {
        match field {
            Field::FirstName => self.first_name = value,
            Field::LastName => self.last_name = value,
            Field::Email => self.email = value,
        }
    }
}

impl From<&Student> for StudentDraft {
    fn from(student: &Student) -> Self {
        Self {
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            email: student.email.clone(),
        }
    }
}

/// The four CRUD calls for the `students` collection. Errors are the transport's, untouched.
#[derive(Clone, Debug)]
pub struct StudentClient {
    transport: Arc<dyn Transport>,
}

impl StudentClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<Student>, TransportError> {
        let body = self
            .transport
            .request(Method::GET, &[COLLECTION], None)
            .await?;
        serde_json::from_value(body).context(DecodeSnafu)
    }

    pub async fn create(&self, draft: &StudentDraft) -> Result<Student, TransportError> {
        let draft = serde_json::to_value(draft).context(EncodeSnafu)?;
        let body = self
            .transport
            .request(Method::POST, &[COLLECTION], Some(draft))
            .await?;
        serde_json::from_value(body).context(DecodeSnafu)
    }

    pub async fn update(
        &self,
        id: &StudentId,
        draft: &StudentDraft,
    ) -> Result<Student, TransportError> {
        let draft = serde_json::to_value(draft).context(EncodeSnafu)?;
        let id = id.to_string();
        let body = self
            .transport
            .request(Method::PUT, &[COLLECTION, &id], Some(draft))
            .await?;
        serde_json::from_value(body).context(DecodeSnafu)
    }

    pub async fn delete(&self, id: &StudentId) -> Result<(), TransportError> {
        let id = id.to_string();
        self.transport
            .request(Method::DELETE, &[COLLECTION, &id], None)
            .await?;
        Ok(())
    }
}
