use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::Error as JsonWebTokenError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// JWT token handler for encoding and decoding tokens.
///
/// Generic over the claims type. Signs with HS256 and accepts nothing else on
/// the way back in, so a token that announces a different algorithm is
/// rejected before its signature is even considered.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Returns
    /// JwtHandler instance configured with HS256 algorithm
    ///
    /// # Errors
    /// * `EmptySecret` - An empty key would make every token forgeable
    pub fn new(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::EmptySecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        })
    }

    /// Encode claims into a JWT token.
    ///
    /// # Arguments
    /// * `claims` - Claims to encode (must implement Serialize)
    ///
    /// # Returns
    /// JWT token string
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT token.
    ///
    /// Requires `sub` and `exp` claims. Expiry is checked with zero leeway.
    ///
    /// # Arguments
    /// * `token` - JWT token string to decode
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `Malformed` - Token cannot be parsed or lacks a required claim
    /// * `SignatureInvalid` - Signature mismatch or disallowed algorithm
    /// * `Expired` - Token has expired
    pub fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = 0;

        let token_data = decode::<T>(token, &self.decoding_key, &validation)
            .map_err(|e| classify_error(token, e))?;

        Ok(token_data.claims)
    }
}

fn classify_error(token: &str, error: JsonWebTokenError) -> JwtError {
    match error.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
            JwtError::SignatureInvalid(error.to_string())
        }
        // `alg` values jsonwebtoken has no variant for (e.g. "none") surface
        // as a header parse failure.
        ErrorKind::Json(_) => match unsupported_algorithm(token) {
            Some(alg) => JwtError::SignatureInvalid(format!("algorithm '{}' is not accepted", alg)),
            None => JwtError::Malformed(error.to_string()),
        },
        _ => JwtError::Malformed(error.to_string()),
    }
}

/// The header's `alg`, if present and not a known algorithm name.
fn unsupported_algorithm(token: &str) -> Option<String> {
    let header = token.split('.').next()?;
    let bytes = URL_SAFE_NO_PAD.decode(header).ok()?;
    let header: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let alg = header.get("alg")?.as_str()?;

    match alg.parse::<Algorithm>() {
        Ok(_) => None,
        Err(_) => Some(alg.to_string()),
    }
}
