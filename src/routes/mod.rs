mod health_check;
mod subscriptions;
mod subscriptions_confirm;
mod unsubscribe;
mod unsupported_method;
mod weather;

pub use health_check::*;
pub use subscriptions::*;
pub use subscriptions_confirm::*;
pub use unsubscribe::*;
pub use unsupported_method::*;
pub use weather::*;

use crate::services::SubscriptionError;
use rocket::http::{ContentType, Status};
use rocket::response::Responder;
use rocket::{Request, Response};
use std::io::Cursor;

const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

/// Plain-text response; server errors never leak their details.
fn plain_response(status: Status, message: String) -> rocket::response::Result<'static> {
    let body = if status.code >= 500 {
        GENERIC_ERROR_MESSAGE.to_string()
    } else {
        message
    };
    Response::build()
        .status(status)
        .header(ContentType::Plain)
        .sized_body(body.len(), Cursor::new(body))
        .ok()
}

impl<'r> Responder<'r, 'static> for SubscriptionError {
    fn respond_to(self, _request: &'r Request<'_>) -> rocket::response::Result<'static> {
        let status = match self {
            SubscriptionError::Validation(_)
            | SubscriptionError::TokenEmpty
            | SubscriptionError::TokenWrongType => Status::BadRequest,
            SubscriptionError::UserAlreadyExists | SubscriptionError::Conflict(_) => {
                Status::Conflict
            }
            SubscriptionError::TokenNotFound => Status::NotFound,
            SubscriptionError::ConfirmationMail(_) | SubscriptionError::Unexpected(_) => {
                Status::InternalServerError
            }
        };
        if status == Status::InternalServerError {
            tracing::error!(error.cause_chain = ?self, "SubscriptionError");
        } else {
            tracing::warn!("SubscriptionError: {}", self);
        }
        plain_response(status, self.to_string())
    }
}
