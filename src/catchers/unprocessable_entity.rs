use rocket::http::Status;
use rocket::Request;

/// Missing or malformed form fields are a client error like any other validation failure.
#[catch(422)]
pub fn unprocessable_entity_to_bad_request(req: &Request) -> (Status, &'static str) {
    tracing::warn!(uri = %req.uri(), "Rejecting a malformed request body");
    (Status::BadRequest, "Invalid request body")
}
