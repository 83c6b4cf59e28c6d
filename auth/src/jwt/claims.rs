use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity token payload.
///
/// Only the registered claims this system relies on: who the token is for,
/// when it was issued and when it stops being valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject, valid for `lifetime` from now.
    ///
    /// # Arguments
    /// * `subject` - Unique user identifier
    /// * `lifetime` - Time until the token expires
    ///
    /// # Returns
    /// Claims with sub, iat and exp set
    pub fn for_subject(subject: impl ToString, lifetime: Duration) -> Self {
        Self::issued_at(subject, Utc::now(), lifetime)
    }

    /// Create claims for a subject as if issued at `issued_at`.
    pub fn issued_at(subject: impl ToString, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        let expiration = issued_at + lifetime;

        Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Expiration as a timestamp, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_subject() {
        let claims = Claims::for_subject(42, Duration::hours(24));

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_issued_at() {
        let issued = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = Claims::issued_at("7", issued, Duration::hours(1));

        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_003_600);
        assert_eq!(
            claims.expires_at(),
            DateTime::from_timestamp(1_700_003_600, 0)
        );
    }
}
