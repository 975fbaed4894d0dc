use api_types::{ErrorBody, page::Page as PageView};
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::{EngineError, ErrorCode, Page};

pub use i18n::Lang;
pub use server::{ServerState, app, run_with_listener};

mod categories;
mod extract;
mod i18n;
mod payments;
mod products;
mod server;
mod transactions;
mod users;

/// Convert an engine page into its response shape.
pub(crate) fn page_view<T, U>(page: Page<T>, map: impl FnMut(T) -> U) -> PageView<U> {
    let page = page.map(map);
    PageView {
        content: page.content,
        page: page.page,
        size: page.size,
        total_elements: page.total_elements,
        total_pages: page.total_pages,
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    /// Malformed or structurally invalid request.
    Validation(String),
}

/// What went wrong, kept on the response so the message can be localized
/// once the request language is known.
#[derive(Clone, Debug)]
pub(crate) struct ErrorReport {
    code: ErrorCode,
    detail: Option<String>,
}

impl ErrorReport {
    pub(crate) fn body(&self, lang: Lang) -> ErrorBody {
        let text = i18n::message(self.code, lang);
        let message = match &self.detail {
            Some(detail) => format!("{text}: {detail}"),
            None => text.to_string(),
        };
        ErrorBody {
            code: self.code.code(),
            message,
        }
    }
}

impl ServerError {
    fn report(self) -> (StatusCode, ErrorReport) {
        match self {
            ServerError::Engine(EngineError::Database(db_err)) => {
                tracing::error!("database error: {db_err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorReport {
                        code: ErrorCode::InternalError,
                        detail: None,
                    },
                )
            }
            ServerError::Engine(err) => {
                let code = err.code();
                tracing::warn!(code = code.code(), "request rejected: {err}");
                let detail = (code == ErrorCode::ValidationFailed).then(|| err.to_string());
                (StatusCode::BAD_REQUEST, ErrorReport { code, detail })
            }
            ServerError::Validation(detail) => {
                tracing::warn!("invalid request: {detail}");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorReport {
                        code: ErrorCode::ValidationFailed,
                        detail: Some(detail),
                    },
                )
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, report) = self.report();
        let mut response = (status, Json(report.body(Lang::default()))).into_response();
        response.extensions_mut().insert(report);
        response
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<api_types::ValidationError> for ServerError {
    fn from(value: api_types::ValidationError) -> Self {
        Self::Validation(value.to_string())
    }
}
