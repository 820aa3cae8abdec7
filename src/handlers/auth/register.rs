// POST /auth/registration/ - create an account without leaking which
// identifiers already exist.

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::services::registration::{
    self, RegisterRequest, RegistrationOutcome, GENERIC_ERR_MSG, GENERIC_REGISTRATION_MSG,
};
use crate::state::AppState;

/// POST /auth/registration/ - Register a new account
///
/// A missing required field is the only failure reported distinctly (400 with
/// a stable code). Everything else - success, collision, weak password,
/// mismatched confirmation - answers 201 with the same generic body.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> (StatusCode, Json<Value>) {
    let outcome = registration::register(&state.pool, &state.password_policy, &payload).await;
    outcome_response(outcome)
}

/// The single outcome-to-response mapping for the registration flow.
fn outcome_response(outcome: RegistrationOutcome) -> (StatusCode, Json<Value>) {
    match outcome {
        RegistrationOutcome::Registered(_) | RegistrationOutcome::Suppressed => (
            StatusCode::CREATED,
            Json(json!({ "detail": GENERIC_REGISTRATION_MSG })),
        ),
        RegistrationOutcome::MissingField(field) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": field.message, "code": field.code })),
        ),
        RegistrationOutcome::Failed => (
            StatusCode::CREATED,
            Json(json!({ "detail": GENERIC_ERR_MSG })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::registration::{CODE_EMAIL_REQUIRED, REQUIRED_FIELDS};

    #[test]
    fn test_suppressed_and_failed_share_the_created_status() {
        let (suppressed, Json(suppressed_body)) = outcome_response(RegistrationOutcome::Suppressed);
        let (failed, Json(failed_body)) = outcome_response(RegistrationOutcome::Failed);

        assert_eq!(suppressed, StatusCode::CREATED);
        assert_eq!(failed, StatusCode::CREATED);
        // distinct generic messages, same shape
        assert_eq!(suppressed_body["detail"], GENERIC_REGISTRATION_MSG);
        assert_eq!(failed_body["detail"], GENERIC_ERR_MSG);
        assert!(suppressed_body.get("code").is_none());
    }

    #[test]
    fn test_missing_field_maps_to_bad_request_with_code() {
        let (status, Json(body)) = outcome_response(RegistrationOutcome::MissingField(&REQUIRED_FIELDS[0]));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], CODE_EMAIL_REQUIRED);
        assert_eq!(body["detail"], "Email is required");
    }
}
