use axum::async_trait;
use serde::Deserialize;
use tracing::warn;

const TOKENINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/tokeninfo";

/// Identity claims extracted from a verified Google credential.
#[derive(Debug, Clone)]
pub struct GoogleClaims {
    pub google_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_verified: bool,
}

/// Verifies a raw Google ID token. `None` covers every failure mode: network
/// errors, non-success status, missing claims and audience mismatch. The
/// caller never sees a provider error, only success or failure.
#[async_trait]
pub trait GoogleTokenVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Option<GoogleClaims>;
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmailVerified {
    Flag(bool),
    Text(String),
}

impl EmailVerified {
    fn as_bool(&self) -> bool {
        match self {
            EmailVerified::Flag(b) => *b,
            EmailVerified::Text(s) => s == "true",
        }
    }
}

/// Body of Google's tokeninfo response. The endpoint reports
/// `email_verified` as a string, so both representations are accepted.
#[derive(Debug, Deserialize)]
struct TokenInfo {
    sub: Option<String>,
    email: Option<String>,
    aud: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    email_verified: Option<EmailVerified>,
}

fn claims_from_token_info(info: TokenInfo, client_id: &str) -> Option<GoogleClaims> {
    let google_id = match info.sub {
        Some(sub) if !sub.is_empty() => sub,
        _ => {
            warn!("google token missing sub claim");
            return None;
        }
    };
    let email = match info.email {
        Some(email) if !email.is_empty() => email,
        _ => {
            warn!("google token missing email claim");
            return None;
        }
    };
    if info.aud.as_deref() != Some(client_id) {
        warn!(aud = ?info.aud, "google token audience mismatch");
        return None;
    }
    Some(GoogleClaims {
        google_id,
        email,
        first_name: info.given_name,
        last_name: info.family_name,
        is_verified: info.email_verified.map(|v| v.as_bool()).unwrap_or(false),
    })
}

/// Live verifier backed by Google's tokeninfo endpoint.
pub struct GoogleTokenInfoVerifier {
    http: reqwest::Client,
    client_id: String,
}

impl GoogleTokenInfoVerifier {
    pub fn new(client_id: String) -> anyhow::Result<Self> {
        // A hung provider call would otherwise stall the request forever.
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self { http, client_id })
    }
}

#[async_trait]
impl GoogleTokenVerifier for GoogleTokenInfoVerifier {
    async fn verify(&self, credential: &str) -> Option<GoogleClaims> {
        let response = match self
            .http
            .get(TOKENINFO_URL)
            .query(&[("id_token", credential)])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "google tokeninfo request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "google tokeninfo rejected credential");
            return None;
        }

        let info: TokenInfo = match response.json().await {
            Ok(i) => i,
            Err(e) => {
                warn!(error = %e, "google tokeninfo returned malformed body");
                return None;
            }
        };

        claims_from_token_info(info, &self.client_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TokenInfo {
        TokenInfo {
            sub: Some("google-user-id-123".into()),
            email: Some("test@gmail.com".into()),
            aud: Some("mock-client-id".into()),
            given_name: Some("Test".into()),
            family_name: Some("User".into()),
            email_verified: Some(EmailVerified::Text("true".into())),
        }
    }

    #[test]
    fn extracts_claims_from_valid_token_info() {
        let claims = claims_from_token_info(sample(), "mock-client-id").expect("claims");
        assert_eq!(claims.google_id, "google-user-id-123");
        assert_eq!(claims.email, "test@gmail.com");
        assert_eq!(claims.first_name.as_deref(), Some("Test"));
        assert_eq!(claims.last_name.as_deref(), Some("User"));
        assert!(claims.is_verified);
    }

    #[test]
    fn rejects_missing_sub_or_email() {
        let mut info = sample();
        info.sub = None;
        assert!(claims_from_token_info(info, "mock-client-id").is_none());

        let mut info = sample();
        info.email = Some(String::new());
        assert!(claims_from_token_info(info, "mock-client-id").is_none());
    }

    #[test]
    fn rejects_audience_mismatch() {
        let info = sample();
        assert!(claims_from_token_info(info, "someone-elses-client-id").is_none());
    }

    #[test]
    fn email_verified_accepts_bool_and_string() {
        let mut info = sample();
        info.email_verified = Some(EmailVerified::Flag(true));
        assert!(claims_from_token_info(info, "mock-client-id").unwrap().is_verified);

        let mut info = sample();
        info.email_verified = Some(EmailVerified::Text("false".into()));
        assert!(!claims_from_token_info(info, "mock-client-id").unwrap().is_verified);

        let mut info = sample();
        info.email_verified = None;
        assert!(!claims_from_token_info(info, "mock-client-id").unwrap().is_verified);
    }

    #[test]
    fn token_info_deserializes_google_wire_shape() {
        let info: TokenInfo = serde_json::from_str(
            r#"{
                "sub": "110169484474386276334",
                "aud": "mock-client-id",
                "email": "test@gmail.com",
                "email_verified": "true",
                "given_name": "Test",
                "family_name": "User",
                "iss": "https://accounts.google.com"
            }"#,
        )
        .expect("deserialize tokeninfo");
        let claims = claims_from_token_info(info, "mock-client-id").expect("claims");
        assert!(claims.is_verified);
    }
}
