//! HS256 `TokenIssuer` adapter built on `jsonwebtoken`.

use std::sync::Arc;

use chrono::TimeDelta;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{IssuedToken, TokenError, TokenIssuer, TokenSubject};
use crate::domain::{User, UserId};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    username: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies HS256 tokens with a shared secret.
pub struct JwtIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl JwtIssuer {
    /// Build an issuer from raw secret bytes. The keys copy the secret, so
    /// callers may zeroize their buffer afterwards.
    pub fn new(secret: &[u8], ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
            clock,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue(&self, user: &User) -> Result<IssuedToken, TokenError> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at + self.ttl;
        let claims = Claims {
            sub: user.id().to_string(),
            username: user.username().to_string(),
            role: user.role().to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))?;
        Ok(IssuedToken { token, expires_at })
    }

    fn verify(&self, token: &str) -> Result<TokenSubject, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Self::validation())
            .map_err(|_| TokenError::invalid())?;
        let id = data
            .claims
            .sub
            .parse::<i32>()
            .map_err(|_| TokenError::invalid())?;
        Ok(TokenSubject {
            user_id: UserId::new(id),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{Email, Role, Username};
    use crate::test_support::MutableClock;
    use chrono::Utc;
    use mockable::DefaultClock;
    use rstest::{fixture, rstest};

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[fixture]
    fn user() -> User {
        User::new(
            UserId::new(5),
            Username::new("carol").expect("username"),
            Email::new("carol@example.com").expect("email"),
            Role::User,
        )
    }

    fn issuer(clock: Arc<dyn Clock>) -> JwtIssuer {
        JwtIssuer::new(SECRET, TimeDelta::minutes(60), clock)
    }

    #[rstest]
    fn issued_tokens_verify_to_subject(user: User) {
        let issuer = issuer(Arc::new(DefaultClock));
        let issued = issuer.issue(&user).expect("issue");
        let subject = issuer.verify(&issued.token).expect("verify");
        assert_eq!(subject.user_id, UserId::new(5));
    }

    #[rstest]
    fn expired_tokens_are_rejected(user: User) {
        let past = Utc::now() - TimeDelta::hours(2);
        let issuer = issuer(Arc::new(MutableClock::new(past)));
        let issued = issuer.issue(&user).expect("issue");
        assert_eq!(issuer.verify(&issued.token), Err(TokenError::Invalid));
    }

    #[rstest]
    fn tokens_signed_with_another_secret_are_rejected(user: User) {
        let forger = JwtIssuer::new(b"supersecret", TimeDelta::minutes(60), Arc::new(DefaultClock));
        let forged = forger.issue(&user).expect("issue");
        let issuer = issuer(Arc::new(DefaultClock));
        assert_eq!(issuer.verify(&forged.token), Err(TokenError::Invalid));
    }

    #[rstest]
    #[case("")]
    #[case("not.a.jwt")]
    #[case("eyJhbGciOiJub25lIn0.eyJzdWIiOiIxIiwiZXhwIjo5OTk5OTk5OTk5fQ.")]
    fn malformed_or_unsigned_tokens_are_rejected(#[case] token: &str) {
        let issuer = issuer(Arc::new(DefaultClock));
        assert_eq!(issuer.verify(token), Err(TokenError::Invalid));
    }
}
