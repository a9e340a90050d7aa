//! Conversions from external infrastructure errors into domain errors.

use clustersync_domain::constants::REQUEST_ERROR;
use clustersync_domain::ApiError;
use reqwest::Error as HttpError;

/// Extension trait that keeps the conversion logic on the infrastructure
/// side; `ApiError` and `reqwest::Error` are both foreign to this crate.
pub(crate) trait IntoApiError {
    fn into_api_error(self) -> ApiError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ApiError */
/* -------------------------------------------------------------------------- */

impl IntoApiError for HttpError {
    fn into_api_error(self) -> ApiError {
        // A request that could not be built fails the same way every time.
        if self.is_builder() {
            return ApiError::permanent(REQUEST_ERROR, format!("failed to build request: {self}"));
        }

        if self.is_timeout() {
            return ApiError::timeout(format!("HTTP request timed out: {self}"));
        }

        if self.is_connect() {
            return ApiError::network(format!("HTTP connection failure: {self}"));
        }

        ApiError::network(format!("HTTP transport failure: {self}"))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
