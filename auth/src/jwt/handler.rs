use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use super::errors::TokenError;

/// Algorithms a token may declare in its header. Anything outside the HMAC
/// family is refused before the signature is looked at.
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// JWT signer/verifier bound to a single HMAC secret.
///
/// Generic over the claims type. Signs with HS256 and accepts any HMAC
/// algorithm on decode. Expiry is not checked here: callers compare `exp`
/// against their own clock.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

#[derive(Deserialize)]
struct DeclaredHeader {
    alg: String,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Never share one secret between token classes
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Encode claims into a signed compact token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing or serialization failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token's algorithm and signature and decode its claims.
    ///
    /// # Errors
    /// * `InvalidAlgorithm` - Header declares a non-HMAC algorithm (including `none`)
    /// * `InvalidSignature` - Signature does not match this handler's secret
    /// * `Malformed` - Token structure, header, or claims could not be decoded
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        let declared = declared_algorithm(token)?;
        let is_hmac = Algorithm::from_str(&declared)
            .map(|alg| HMAC_ALGORITHMS.contains(&alg))
            .unwrap_or(false);
        if !is_hmac {
            return Err(TokenError::InvalidAlgorithm(declared));
        }

        let mut validation = Validation::new(self.algorithm);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        // exp is checked by the caller against its own clock
        validation.validate_exp = false;
        validation.leeway = 0;

        let token_data = decode::<T>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => TokenError::InvalidAlgorithm(declared.clone()),
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}

/// Read the `alg` a token claims for itself, without trusting anything else.
fn declared_algorithm(token: &str) -> Result<String, TokenError> {
    let encoded_header = token
        .split('.')
        .next()
        .filter(|part| !part.is_empty())
        .ok_or_else(|| TokenError::Malformed("missing header segment".to_string()))?;

    let raw = URL_SAFE_NO_PAD
        .decode(encoded_header)
        .map_err(|e| TokenError::Malformed(format!("header is not base64url: {}", e)))?;

    let header: DeclaredHeader = serde_json::from_slice(&raw)
        .map_err(|e| TokenError::Malformed(format!("header is not valid JSON: {}", e)))?;

    Ok(header.alg)
}
