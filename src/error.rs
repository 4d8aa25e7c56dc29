use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::html;
use serde_json::Value;
use snafu::Snafu;
use std::net::AddrParseError;

pub type RosterResult<T> = Result<T, RosterError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TransportError {
    #[snafu(display("Unable to reach the student API at {url}"))]
    Network { source: reqwest::Error, url: String },
    #[snafu(display("Student API responded with {status}: {payload}"))]
    Status {
        status: reqwest::StatusCode,
        payload: Value,
    },
    #[snafu(display("Base URL {url} cannot take path segments"))]
    NotABase { url: String },
    #[snafu(display("Error encoding request body for the student API"))]
    Encode { source: serde_json::Error },
    #[snafu(display("Error decoding response from the student API"))]
    Decode { source: serde_json::Error },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RosterError {
    #[snafu(display("Error talking to the student API"))]
    Transport { source: TransportError },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse API base URL {:?}", original))]
    ParseUrl {
        source: url::ParseError,
        original: String,
    },
    #[snafu(display("API base URL {:?} must be an http:// or https:// URL with a host", original))]
    InvalidBaseUrl { original: String },
    #[snafu(display("Unable to parse server IP {:?}", original))]
    ParseServerIp {
        source: AddrParseError,
        original: String,
    },
    #[snafu(display("Unable to find student with ID: {}", id))]
    MissingStudent { id: String },
}

impl IntoResponse for RosterError {
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BG: StatusCode = StatusCode::BAD_GATEWAY; //upstream api failed

        let basic_error = |desc| {
            html! {
                div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
                    strong class="font-bold" {"Roster Error"}
                    " "
                    span {(desc)}
                }
            }
        };

        let status_code = match &self {
            Self::Transport { .. } => BG,
            Self::BadEnvVar { .. }
            | Self::ParseUrl { .. }
            | Self::InvalidBaseUrl { .. }
            | Self::ParseServerIp { .. } => ISE,
            Self::MissingStudent { .. } => NF,
        };

        let description = match &self {
            Self::Transport { source } => format!("{self}: {source}"),
            _ => self.to_string(),
        };

        error!(?self, "Error!");
        (status_code, Html(basic_error(description))).into_response()
    }
}
