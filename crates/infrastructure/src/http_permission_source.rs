use async_trait::async_trait;
use fieldops_application::PermissionSource;
use fieldops_core::{AppError, AppResult, RoleId, UserSession};
use fieldops_domain::PermissionRecord;
use reqwest::{StatusCode, header};
use serde::Deserialize;
use tracing::debug;
use url::Url;

#[cfg(test)]
mod tests;

/// Permission payload shapes accepted from the backend.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PermissionPayload {
    Wrapped { features: Vec<PermissionRecord> },
    Bare(Vec<PermissionRecord>),
}

impl PermissionPayload {
    fn into_records(self) -> Vec<PermissionRecord> {
        match self {
            Self::Wrapped { features } | Self::Bare(features) => features,
        }
    }
}

/// HTTP-based permission source calling `GET /roles/{role_id}/permissions`.
pub struct HttpPermissionSource {
    http_client: reqwest::Client,
    api_base_url: Url,
}

impl HttpPermissionSource {
    /// Creates a permission source for the API rooted at `api_base_url`.
    pub fn new(http_client: reqwest::Client, api_base_url: Url) -> AppResult<Self> {
        if api_base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "api base url '{api_base_url}' cannot carry a path"
            )));
        }

        Ok(Self {
            http_client,
            api_base_url,
        })
    }

    fn endpoint_for(&self, role_id: &RoleId) -> AppResult<Url> {
        let mut endpoint = self.api_base_url.clone();
        endpoint
            .path_segments_mut()
            .map_err(|()| {
                AppError::Validation(format!(
                    "api base url '{}' cannot carry a path",
                    self.api_base_url
                ))
            })?
            .pop_if_empty()
            .extend(["roles", role_id.as_str(), "permissions"]);

        Ok(endpoint)
    }
}

#[async_trait]
impl PermissionSource for HttpPermissionSource {
    async fn fetch_permissions(
        &self,
        role_id: &RoleId,
        session: &UserSession,
    ) -> AppResult<Vec<PermissionRecord>> {
        let endpoint = self.endpoint_for(role_id)?;
        debug!(role_id = %role_id, endpoint = %endpoint, "fetching role permissions");

        let mut request = self
            .http_client
            .get(endpoint)
            .header(header::ACCEPT, "application/json");
        if !session.token().is_empty() {
            request = request.header(
                header::AUTHORIZATION,
                format!("Bearer {}", session.token()),
            );
        }

        let response = request.send().await.map_err(|error| {
            AppError::Unavailable(format!("failed to call permission endpoint: {error}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_owned());
            let message = format!(
                "permission endpoint returned status {}: {body}",
                status.as_u16()
            );
            return Err(match status {
                StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
                StatusCode::FORBIDDEN => AppError::Forbidden(message),
                StatusCode::NOT_FOUND => AppError::NotFound(message),
                _ => AppError::Unavailable(message),
            });
        }

        let payload = response
            .json::<PermissionPayload>()
            .await
            .map_err(|error| {
                AppError::Validation(format!(
                    "failed to parse permission endpoint response body: {error}"
                ))
            })?;

        Ok(payload.into_records())
    }
}
