use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Short-lived bearer credential. Opaque to this client apart from the
/// expiry timestamp embedded in its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(pub String);

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: i64,
}

impl AccessToken {
    /// Reads the expiry out of the token payload. The signature is not
    /// checked: the client only needs the timestamp, the backend stays the
    /// authority on validity.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        let data =
            decode::<ExpiryClaims>(&self.0, &DecodingKey::from_secret(&[]), &validation).ok()?;
        Utc.timestamp_opt(data.claims.exp, 0).single()
    }

    /// A token whose expiry cannot be decoded counts as expired, so the
    /// gate takes the refresh path instead of sending a garbage credential.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(exp) => exp <= now,
            None => true,
        }
    }
}

#[cfg(test)]
pub fn token_expiring_in(secs: i64) -> AccessToken {
    use jsonwebtoken::{EncodingKey, Header, encode};

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        iat: i64,
        exp: i64,
    }

    let now = Utc::now();
    let claims = Claims {
        sub: "test-user".to_owned(),
        iat: now.timestamp(),
        exp: now.timestamp() + secs,
    };
    let jwt = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .expect("encode test token");
    AccessToken(jwt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpired_token_decodes_and_passes() {
        let token = token_expiring_in(3600);
        assert!(token.expires_at().is_some());
        assert!(!token.is_expired(Utc::now()));
    }

    #[test]
    fn expired_token_is_detected() {
        let token = token_expiring_in(-60);
        assert!(token.is_expired(Utc::now()));
    }

    #[test]
    fn garbage_token_counts_as_expired() {
        let token = AccessToken("not-a-jwt".to_owned());
        assert_eq!(token.expires_at(), None);
        assert!(token.is_expired(Utc::now()));
    }
}
