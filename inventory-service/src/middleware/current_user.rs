use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use service_core::error::AppError;

pub const USER_CODE_HEADER: &str = "X-User-Code";

/// The signed-in user acting on a request, plus the client address used
/// for audit entries.
///
/// `X-User-Code` is set by the trusted front end after login; requests
/// without it are rejected with 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_code: i32,
    pub ip_address: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_CODE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized(anyhow::anyhow!("Missing {} header", USER_CODE_HEADER))
            })?;

        let user_code = raw.trim().parse::<i32>().map_err(|_| {
            AppError::Unauthorized(anyhow::anyhow!("Invalid {} header", USER_CODE_HEADER))
        })?;

        tracing::Span::current().record("user_code", user_code);

        Ok(CurrentUser {
            user_code,
            ip_address: client_ip(&parts.headers),
        })
    }
}

/// Client address: first hop of `X-Forwarded-For`, else `X-Real-IP`.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    header("X-Forwarded-For")
        .and_then(|v| {
            v.split(',')
                .next()
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
                .map(str::to_string)
        })
        .or_else(|| {
            header("X-Real-IP")
                .map(|v| v.trim().to_string())
                .filter(|ip| !ip.is_empty())
        })
}
