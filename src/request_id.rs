use http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::{Level, Span};
use uuid::Uuid;

const X_REQUEST_ID: &str = "x-request-id";

/// Generate a random UUID as the 'x-request-id' header value.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _req: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::from)
    }
}

/// Make span from a request using its 'x-request-id' header.
#[derive(Debug, Clone)]
pub struct MakeSpanWithRequestId {
    level: Level,
}

impl MakeSpanWithRequestId {
    pub fn new() -> Self {
        MakeSpanWithRequestId {
            level: Level::DEBUG,
        }
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

impl Default for MakeSpanWithRequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, req: &Request<B>) -> Span {
        let request_id = req
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        // span! needs the level known at the callsite
        macro_rules! make_span {
            ($level:expr) => {
                tracing::span!(
                    $level,
                    "request",
                    method = %req.method(),
                    uri = %req.uri(),
                    version = ?req.version(),
                    request_id = %request_id,
                )
            };
        }

        match self.level {
            Level::ERROR => make_span!(Level::ERROR),
            Level::WARN => make_span!(Level::WARN),
            Level::INFO => make_span!(Level::INFO),
            Level::DEBUG => make_span!(Level::DEBUG),
            Level::TRACE => make_span!(Level::TRACE),
        }
    }
}
