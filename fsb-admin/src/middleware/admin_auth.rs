// Admin API authorization
// The policy is injected into app state and checked at the top of every
// /api handler. With no token configured the API is open and a warning is
// logged at startup.

use actix_web::HttpRequest;

use crate::error::AdminError;

#[derive(Clone)]
pub enum AccessPolicy {
    Open,
    BearerToken(String),
}

impl std::fmt::Debug for AccessPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::BearerToken(_) => write!(f, "BearerToken(<redacted>)"),
        }
    }
}

impl AccessPolicy {
    /// Blank tokens count as unset
    pub fn from_token(token: Option<String>) -> Self {
        match token {
            Some(t) if !t.trim().is_empty() => Self::BearerToken(t.trim().to_string()),
            _ => Self::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    pub fn authorize(&self, req: &HttpRequest) -> Result<(), AdminError> {
        self.authorize_with_query(req, None)
    }

    /// Like [`authorize`](Self::authorize) but also accepts a token passed in
    /// the query string, for WebSocket upgrades where browsers cannot set
    /// headers.
    pub fn authorize_with_query(
        &self,
        req: &HttpRequest,
        query_token: Option<&str>,
    ) -> Result<(), AdminError> {
        let expected = match self {
            Self::Open => return Ok(()),
            Self::BearerToken(expected) => expected,
        };

        let presented = extract_token(req).or_else(|| query_token.map(str::to_string));
        match presented {
            None => Err(AdminError::Unauthorized(
                "No authorization token provided".to_string(),
            )),
            Some(token) if tokens_match(&token, expected) => Ok(()),
            Some(_) => Err(AdminError::Unauthorized("Invalid admin token".to_string())),
        }
    }
}

pub fn extract_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.trim_start_matches("Bearer ").to_string())
}

// Compares every byte regardless of where the first mismatch is
fn tokens_match(presented: &str, expected: &str) -> bool {
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_open_policy_allows_everything() {
        let policy = AccessPolicy::from_token(Some("   ".to_string()));
        assert!(policy.is_open());
        assert!(policy.authorize(&TestRequest::default().to_http_request()).is_ok());
    }

    #[test]
    fn test_bearer_token_required() {
        let policy = AccessPolicy::from_token(Some("s3cret".to_string()));

        let req = TestRequest::default().to_http_request();
        assert!(matches!(policy.authorize(&req), Err(AdminError::Unauthorized(_))));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer wrong"))
            .to_http_request();
        assert!(policy.authorize(&req).is_err());

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer s3cret"))
            .to_http_request();
        assert!(policy.authorize(&req).is_ok());
    }

    #[test]
    fn test_query_token_fallback() {
        let policy = AccessPolicy::from_token(Some("s3cret".to_string()));
        let req = TestRequest::default().to_http_request();

        assert!(policy.authorize_with_query(&req, Some("s3cret")).is_ok());
        assert!(policy.authorize_with_query(&req, Some("nope")).is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let policy = AccessPolicy::from_token(Some("s3cret".to_string()));
        assert!(!format!("{:?}", policy).contains("s3cret"));
    }
}
