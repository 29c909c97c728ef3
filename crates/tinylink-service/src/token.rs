use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tinylink_core::UserId;
use tracing::warn;

/// Issuer claim stamped on and required from every token.
pub const TOKEN_ISSUER: &str = "amtinyurl";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iss: String,
    iat: i64,
}

/// Issues and verifies the HS256 bearer tokens the API uses.
///
/// Tokens carry the lowercased user id as subject and do not expire;
/// verification checks the signature and the issuer.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["iss", "sub"]);
        validation.validate_exp = false;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a token for the given user.
    pub fn issue(&self, user: &UserId) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: user.as_str().to_owned(),
            iss: TOKEN_ISSUER.to_owned(),
            iat: jiff::Timestamp::now().as_second(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Verifies a token and returns its subject. Any failure (bad
    /// signature, wrong issuer, malformed subject) yields `None`.
    pub fn verify(&self, token: &str) -> Option<UserId> {
        let data = match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "token verification failed");
                return None;
            }
        };

        match UserId::parse(&data.claims.sub) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "token subject is not a valid user id");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_and_verify_round_trip() {
        let tokens = TokenService::new("test-secret");
        let user = UserId::parse("AbC123").unwrap();

        let token = tokens.issue(&user).unwrap();
        let verified = tokens.verify(&token).unwrap();
        assert_eq!(verified.as_str(), "abc123");
    }

    #[test]
    fn rejects_wrong_secret() {
        let issuer = TokenService::new("secret-a");
        let verifier = TokenService::new("secret-b");
        let user = UserId::parse("abc123").unwrap();

        let token = issuer.issue(&user).unwrap();
        assert!(verifier.verify(&token).is_none());
    }

    #[test]
    fn rejects_garbage() {
        let tokens = TokenService::new("test-secret");
        assert!(tokens.verify("not-a-jwt").is_none());
        assert!(tokens.verify("").is_none());
    }
}
