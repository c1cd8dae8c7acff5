//! HTTP response types

use cc_json::JsonSettings;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::HttpError;

/// HTTP Response type - generic over the body type R and error type E
pub type Response<R, E = HttpError> = Result<R, E>;

/// Result of reading a JSON response body.
///
/// Always carries a usable value: when the body could not be used the value
/// is `T::default()` and the reason is kept next to it.
#[derive(Debug)]
pub enum JsonOutcome<T> {
    /// Body parsed into the target type
    Parsed {
        /// Response status
        status: StatusCode,
        /// Parsed body
        value: T,
    },
    /// Body not used; the value is the target type's default
    Fallback {
        /// Response status
        status: StatusCode,
        /// Default value of the target type
        value: T,
        /// Why the body was not used
        reason: HttpError,
    },
}

impl<T> JsonOutcome<T> {
    fn fallback(status: StatusCode, reason: HttpError) -> Self
    where
        T: Default,
    {
        tracing::warn!(
            status = status.as_u16(),
            "Using default response value: {reason}"
        );
        Self::Fallback {
            status,
            value: T::default(),
            reason,
        }
    }

    /// Response status
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Parsed { status, .. } | Self::Fallback { status, .. } => *status,
        }
    }

    /// Whether the body was parsed
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed { .. })
    }

    /// Why the body was not used, if it was not
    pub fn reason(&self) -> Option<&HttpError> {
        match self {
            Self::Parsed { .. } => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }

    /// Parsed or default value
    pub fn value(&self) -> &T {
        match self {
            Self::Parsed { value, .. } | Self::Fallback { value, .. } => value,
        }
    }

    /// Take the parsed or default value
    pub fn into_value(self) -> T {
        match self {
            Self::Parsed { value, .. } | Self::Fallback { value, .. } => value,
        }
    }

    /// Parsed value, or the reason it could not be produced
    pub fn into_result(self) -> Response<T> {
        match self {
            Self::Parsed { value, .. } => Ok(value),
            Self::Fallback { reason, .. } => Err(reason),
        }
    }
}

/// Whether a body with this status is worth parsing: any success, or a bad
/// request whose body usually describes the problem
pub fn accepts_body(status: StatusCode) -> bool {
    status.is_success() || status == StatusCode::BAD_REQUEST
}

/// Parse a response body received with `status`.
///
/// Reads with [`JsonSettings::for_response`], so null members never replace
/// field defaults. Numeric fields follow whatever conversion rule the target
/// type binds to them (see [`cc_json::decimal`] and [`cc_json::integer`]).
pub fn parse_body<T>(status: StatusCode, body: &str, settings: Option<&JsonSettings>) -> JsonOutcome<T>
where
    T: DeserializeOwned + Default,
{
    if !accepts_body(status) {
        return JsonOutcome::fallback(
            status,
            HttpError::Status {
                status: status.as_u16(),
                message: body.to_string(),
            },
        );
    }

    match JsonSettings::for_response(settings).from_str(body) {
        Ok(value) => JsonOutcome::Parsed { status, value },
        Err(err) => JsonOutcome::fallback(status, err.into()),
    }
}

/// Extension methods for reading responses
pub trait ResponseExt {
    /// Deserialize a JSON body into `T`.
    ///
    /// Success and bad-request bodies are parsed on the blocking pool, so the
    /// awaiting task is never held up by a large body. Any other status, a
    /// body that cannot be read, or a body that does not parse yields
    /// [`JsonOutcome::Fallback`]. There is no timeout or cancellation beyond
    /// what the client is configured with.
    ///
    /// Null members are always skipped. The decimal and integer rules only
    /// apply to fields of `T` that opt in with
    /// `#[serde(with = "cc_json::decimal")]` or
    /// `#[serde(with = "cc_json::integer")]`. Any other numeric field uses its
    /// own `Deserialize` impl, so a plain `Decimal` field rejects `""` and the
    /// whole body falls back.
    fn deserialize_response<T>(
        self,
        settings: Option<&JsonSettings>,
    ) -> impl std::future::Future<Output = JsonOutcome<T>> + Send
    where
        T: DeserializeOwned + Default + Send + 'static;
}

impl ResponseExt for reqwest::Response {
    async fn deserialize_response<T>(self, settings: Option<&JsonSettings>) -> JsonOutcome<T>
    where
        T: DeserializeOwned + Default + Send + 'static,
    {
        let status = self.status();
        let settings = settings.cloned();

        let body = match self.text().await {
            Ok(body) => body,
            Err(err) => return JsonOutcome::fallback(status, err.into()),
        };

        if !accepts_body(status) {
            return parse_body(status, &body, settings.as_ref());
        }

        tracing::debug!(
            status = status.as_u16(),
            "Parsing JSON response of {} bytes",
            body.len()
        );

        tokio::task::spawn_blocking(move || parse_body(status, &body, settings.as_ref()))
            .await
            .unwrap_or_else(|err| {
                JsonOutcome::fallback(
                    status,
                    HttpError::Other(format!("Response parsing task failed: {err}")),
                )
            })
    }
}
