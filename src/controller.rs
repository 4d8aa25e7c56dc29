//! The form/list state machine behind the page.
//!
//! Every user interaction arrives as an [`Action`]; [`Controller::dispatch`] applies it and hands
//! back the new [`ControllerState`]. The list is never patched locally - every successful
//! mutation is followed by a full re-fetch.

use crate::{
    data::student::{Student, StudentClient, StudentDraft},
    error::{MissingStudentSnafu, RosterResult, TransportSnafu},
    table::{Column, SortState},
    validation::{Field, FieldErrors, validate_draft, validate_field},
};
use snafu::{OptionExt, ResultExt};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Create,
    Update,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ControllerState {
    pub students: Vec<Student>,
    pub draft: StudentDraft,
    pub mode: FormMode,
    /// only ever `Some` in [`FormMode::Update`]
    pub selection: Option<Student>,
    pub errors: FieldErrors,
    pub sort: SortState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Load,
    /// carries the id exactly as the browser sent it back
    EditRequested(String),
    FieldBlurred { field: Field, value: String },
    Submit(StudentDraft),
    DeleteRequested(String),
    SortToggled(usize),
}

#[derive(Debug)]
pub struct Controller {
    client: StudentClient,
    columns: Vec<Column<Student>>,
    state: ControllerState,
}

impl Controller {
    pub fn new(client: StudentClient, columns: Vec<Column<Student>>) -> Self {
        Self {
            client,
            columns,
            state: ControllerState::default(),
        }
    }

    pub const fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn columns(&self) -> &[Column<Student>] {
        &self.columns
    }

    /// Mutation failures from the API are passed straight back with the list left as it was.
    pub async fn dispatch(&mut self, action: Action) -> RosterResult<&ControllerState> {
        match action {
            Action::Load => self.refresh().await,
            Action::EditRequested(id) => self.select_for_edit(&id)?,
            Action::FieldBlurred { field, value } => self.blur(field, value),
            Action::Submit(draft) => self.submit(draft).await?,
            Action::DeleteRequested(id) => self.delete(&id).await?,
            Action::SortToggled(column) => self.state.sort.toggle(&self.columns, column),
        }

        Ok(&self.state)
    }

    async fn refresh(&mut self) {
        match self.client.list().await {
            Ok(students) => {
                debug!(count = students.len(), "Fetched students");
                self.state.students = students;
            }
            Err(e) => error!(?e, "Error fetching students"),
        }
    }

    /// Rows are matched on the id's text, which is what the rendered buttons carry.
    fn find(&self, id: &str) -> RosterResult<&Student> {
        self.state
            .students
            .iter()
            .find(|student| student.id.to_string() == id)
            .context(MissingStudentSnafu { id })
    }

    fn select_for_edit(&mut self, id: &str) -> RosterResult<()> {
        let student = self.find(id)?.clone();

        self.state.draft = StudentDraft::from(&student);
        self.state.selection = Some(student);
        self.state.mode = FormMode::Update;
        self.state.errors.clear();
        Ok(())
    }

    fn blur(&mut self, field: Field, value: String) {
        match validate_field(field, &value) {
            Ok(()) => {
                self.state.errors.remove(&field);
            }
            Err(e) => {
                self.state.errors.insert(field, e);
            }
        }
        self.state.draft.set_field(field, value);
    }

    async fn submit(&mut self, draft: StudentDraft) -> RosterResult<()> {
        self.state.draft = draft;

        if let Err(errors) = validate_draft(&self.state.draft) {
            debug!(?errors, "Submit blocked by validation");
            self.state.errors = errors;
            return Ok(());
        }
        self.state.errors.clear();

        match self.state.selection.as_ref().map(|s| s.id.clone()) {
            Some(selected_id) => {
                let updated = self
                    .client
                    .update(&selected_id, &self.state.draft)
                    .await
                    .context(TransportSnafu)?;
                info!(id = %updated.id, "Updated student");

                self.refresh().await;
                self.state.draft = StudentDraft::default();
                self.state.mode = FormMode::Create;
                self.state.selection = None;
            }
            None => {
                let created = self
                    .client
                    .create(&self.state.draft)
                    .await
                    .context(TransportSnafu)?;
                info!(id = %created.id, "Created student");

                self.refresh().await;
                self.state.draft = StudentDraft::default();
            }
        }

        Ok(())
    }

    // form state and selection are left alone, even when the deleted row is the one being edited
    async fn delete(&mut self, id: &str) -> RosterResult<()> {
        let id = self.find(id)?.id.clone();
        self.client.delete(&id).await.context(TransportSnafu)?;
        info!(%id, "Deleted student");

        self.refresh().await;
        Ok(())
    }
}
