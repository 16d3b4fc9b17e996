use std::convert::Infallible;

use aes_gcm::aead::{Aead, Payload};
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use anyhow::Context;
use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hkdf::Hkdf;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use sha2::Sha256;

const SESSION_COOKIES: [&str; 2] = [
    "__Secure-next-auth.session-token",
    "next-auth.session-token",
];

// HKDF info string NextAuth uses to derive its JWE content key
const ENCRYPTION_INFO: &[u8] = b"NextAuth.js Generated Encryption Key";

/// Seconds of clock skew tolerated when checking `exp` on encrypted sessions.
const CLOCK_TOLERANCE: i64 = 15;

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    exp: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct JweHeader {
    alg: String,
    enc: String,
}

#[derive(Clone)]
struct Keys {
    decoding: DecodingKey,
    encryption: [u8; 32],
}

/// Key material for session tokens; `None` disables identification.
///
/// Five-segment tokens are NextAuth JWE sessions (`dir` + `A256GCM`, key
/// derived from the secret with HKDF-SHA256). Three-segment tokens are
/// HS256 JWTs signed with the secret itself.
#[derive(Clone)]
pub struct SessionKeys {
    keys: Option<Keys>,
}

impl SessionKeys {
    pub fn new(secret: Option<&str>) -> Self {
        let keys = secret.and_then(|s| {
            Some(Keys {
                decoding: DecodingKey::from_secret(s.as_bytes()),
                encryption: derive_encryption_key(s)?,
            })
        });
        Self { keys }
    }

    /// Subject of a valid session token in `headers`, if any.
    pub fn identify(&self, headers: &HeaderMap) -> Option<String> {
        let keys = self.keys.as_ref()?;
        let token = bearer_token(headers)
            .map(str::to_string)
            .or_else(|| session_cookie(headers))?;

        let claims = match token.split('.').count() {
            5 => decrypt_session(&token, &keys.encryption),
            _ => decode::<Claims>(&token, &keys.decoding, &Validation::new(Algorithm::HS256))
                .map(|data| data.claims)
                .map_err(anyhow::Error::from),
        };

        match claims {
            Ok(claims) => Some(claims.sub),
            Err(err) => {
                tracing::debug!("Ignoring invalid session token: {:#}", err);
                None
            }
        }
    }
}

fn derive_encryption_key(secret: &str) -> Option<[u8; 32]> {
    let mut key = [0u8; 32];
    Hkdf::<Sha256>::new(Some(b"".as_slice()), secret.as_bytes())
        .expand(ENCRYPTION_INFO, &mut key)
        .ok()?;
    Some(key)
}

/// Decrypt a compact JWE session (`header..iv.ciphertext.tag`) and check its expiry.
fn decrypt_session(token: &str, key: &[u8; 32]) -> anyhow::Result<Claims> {
    let segments: Vec<&str> = token.split('.').collect();
    let [header_b64, encrypted_key, iv_b64, ciphertext_b64, tag_b64] = segments[..] else {
        anyhow::bail!("expected 5 JWE segments, got {}", segments.len());
    };

    let header: JweHeader = serde_json::from_slice(
        &URL_SAFE_NO_PAD
            .decode(header_b64)
            .context("invalid base64 in JWE header")?,
    )
    .context("invalid JWE header")?;
    if header.alg != "dir" || header.enc != "A256GCM" {
        anyhow::bail!("unsupported JWE algorithm {}/{}", header.alg, header.enc);
    }
    if !encrypted_key.is_empty() {
        anyhow::bail!("direct encryption must not carry an encrypted key");
    }

    let iv = URL_SAFE_NO_PAD.decode(iv_b64).context("invalid base64 in JWE iv")?;
    if iv.len() != 12 {
        anyhow::bail!("JWE iv must be 12 bytes, got {}", iv.len());
    }
    let mut sealed = URL_SAFE_NO_PAD
        .decode(ciphertext_b64)
        .context("invalid base64 in JWE ciphertext")?;
    let tag = URL_SAFE_NO_PAD.decode(tag_b64).context("invalid base64 in JWE tag")?;
    if tag.len() != 16 {
        anyhow::bail!("JWE tag must be 16 bytes, got {}", tag.len());
    }
    // aes-gcm expects the tag appended to the ciphertext
    sealed.extend_from_slice(&tag);

    let cipher = Aes256Gcm::new(key.into());
    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(&iv),
            Payload {
                msg: &sealed,
                aad: header_b64.as_bytes(),
            },
        )
        .map_err(|e| anyhow::anyhow!("decryption failed: {e}"))?;

    let claims: Claims = serde_json::from_slice(&plaintext).context("invalid session claims")?;
    let exp = claims.exp.context("session token has no exp claim")?;
    if exp + CLOCK_TOLERANCE < chrono::Utc::now().timestamp() {
        anyhow::bail!("session token expired at {}", exp);
    }
    Ok(claims)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Session cookie value. Large sessions are split by NextAuth into
/// `<name>.0`, `<name>.1`, ... chunks, which are joined back in index order.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let pairs: Vec<(&str, &str)> = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .collect();

    for name in SESSION_COOKIES {
        if let Some((_, token)) = pairs.iter().find(|(n, _)| *n == name) {
            return Some(token.to_string());
        }

        let mut chunks: Vec<(usize, &str)> = pairs
            .iter()
            .filter_map(|(n, v)| {
                let index = n.strip_prefix(name)?.strip_prefix('.')?.parse().ok()?;
                Some((index, *v))
            })
            .collect();
        if !chunks.is_empty() {
            chunks.sort_by_key(|(index, _)| *index);
            return Some(chunks.into_iter().map(|(_, v)| v).collect());
        }
    }
    None
}

/// Identity of the signed-in caller. Missing or invalid tokens yield `Caller(None)`.
#[derive(Debug, Clone)]
pub struct Caller(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    SessionKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);
        Ok(Caller(keys.identify(&parts.headers)))
    }
}
