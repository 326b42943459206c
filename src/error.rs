use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use snafu::Snafu;
use std::num::ParseIntError;

pub type AlumnadoResult<T> = Result<T, AlumnadoError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum AlumnadoError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error bootstrapping DB schema"))]
    MigrateError { source: sqlx::migrate::MigrateError },
    #[snafu(display("{message}"))]
    MakeQuery {
        source: sqlx::Error,
        message: &'static str,
    },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse IP port"))]
    ParsePort { source: ParseIntError },
    #[snafu(display("Faltan campos obligatorios"))]
    MissingFields { fields: Vec<&'static str> },
    #[snafu(display("{message}"))]
    NotFound { message: &'static str },
    #[snafu(display("Cuerpo JSON inválido: {}", source.body_text()))]
    InvalidBody { source: JsonRejection },
    #[snafu(display("Identificador inválido: {}", source.body_text()))]
    InvalidId { source: PathRejection },
    #[snafu(display("Parámetros de consulta inválidos: {}", source.body_text()))]
    InvalidQuery { source: QueryRejection },
}

/// The single error payload shape every endpoint answers with.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl AlumnadoError {
    #[allow(clippy::match_same_arms)]
    pub const fn status_code(&self) -> StatusCode {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        match self {
            Self::OpenDatabase { .. } | Self::MigrateError { .. } => ISE,
            Self::MakeQuery { .. } => ISE,
            Self::BadEnvVar { .. } | Self::ParsePort { .. } => ISE,
            Self::MissingFields { .. } => BI,
            Self::NotFound { .. } => NF,
            Self::InvalidBody { .. } | Self::InvalidId { .. } | Self::InvalidQuery { .. } => BI,
        }
    }
}

impl IntoResponse for AlumnadoError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            error!(?self, "Error!");
        } else if let Self::MissingFields { fields } = &self {
            debug!(?fields, "Missing required fields");
        } else {
            debug!(?self, %status_code, "Rejected request");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status_code, Json(body)).into_response()
    }
}
