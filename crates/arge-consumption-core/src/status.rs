//! Status code classification.
//!
//! Every status code maps to exactly one outcome. Only the code is
//! inspected; the body is kept verbatim for codes the API does not define.

use crate::error::ConsumptionError;

/// Classify an HTTP status code.
///
/// | Status | Outcome |
/// |---|---|
/// | 200 | `Ok(())`, the body should be validated |
/// | 401 | [`ConsumptionError::AuthorizationFailure`] |
/// | 403 | [`ConsumptionError::PermissionDenied`] |
/// | 404 | [`ConsumptionError::NotFound`] |
/// | 500 | [`ConsumptionError::TechnicalError`] |
/// | 501 | [`ConsumptionError::UnsupportedOperation`] |
/// | other | [`ConsumptionError::UnsupportedResponse`] with status and body |
///
/// # Errors
///
/// Returns the mapped error for every code other than 200.
pub fn classify_status(status: u16, body: &[u8]) -> Result<(), ConsumptionError> {
    match status {
        200 => Ok(()),
        401 => Err(ConsumptionError::AuthorizationFailure),
        403 => Err(ConsumptionError::PermissionDenied),
        404 => Err(ConsumptionError::NotFound),
        500 => Err(ConsumptionError::TechnicalError),
        501 => Err(ConsumptionError::UnsupportedOperation),
        // Other 2xx codes included; the API only defines 200.
        _ => Err(ConsumptionError::UnsupportedResponse {
            status,
            body: body.to_vec(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defined_codes_ignore_body() {
        for body in [&b""[..], &b"{\"error\":\"x\"}"[..], &b"\xff\xfe"[..]] {
            assert_eq!(classify_status(200, body), Ok(()));
            assert_eq!(
                classify_status(401, body),
                Err(ConsumptionError::AuthorizationFailure)
            );
            assert_eq!(classify_status(403, body), Err(ConsumptionError::PermissionDenied));
            assert_eq!(classify_status(404, body), Err(ConsumptionError::NotFound));
            assert_eq!(classify_status(500, body), Err(ConsumptionError::TechnicalError));
            assert_eq!(
                classify_status(501, body),
                Err(ConsumptionError::UnsupportedOperation)
            );
        }
    }

    #[test]
    fn unknown_codes_keep_status_and_body() {
        for status in [0, 100, 201, 204, 304, 400, 418, 502, 503, 999, u16::MAX] {
            assert_eq!(
                classify_status(status, b"teapot"),
                Err(ConsumptionError::UnsupportedResponse {
                    status,
                    body: b"teapot".to_vec()
                })
            );
        }
    }

    #[test]
    fn total_over_all_codes() {
        for status in 0..=u16::MAX {
            let outcome = classify_status(status, b"");
            match status {
                200 => assert!(outcome.is_ok()),
                401 | 403 | 404 | 500 | 501 => {
                    assert_eq!(outcome.unwrap_err().status_code(), Some(status));
                }
                _ => assert!(matches!(
                    outcome,
                    Err(ConsumptionError::UnsupportedResponse { status: s, .. }) if s == status
                )),
            }
        }
    }
}
