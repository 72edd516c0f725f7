//! JWKS fetching and caching for the Keycloak realm.
//!
//! Keycloak rotates realm signing keys; tokens carry the `kid` of the key
//! that signed them. The client caches the fetched key set and re-fetches
//! on a kid miss, so a rotation is picked up without restarting.

use crate::error::AuthError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// A JSON Web Key (RFC 7517), RSA members only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    /// Key type (e.g. "RSA").
    pub kty: String,

    /// Key ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// Public key use ("sig" for signature keys).
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,

    /// Algorithm (e.g. "RS256").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,

    /// RSA modulus, Base64URL encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,

    /// RSA exponent, Base64URL encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
}

impl Jwk {
    /// Convert this RSA JWK into a PEM-encoded SubjectPublicKeyInfo.
    pub fn to_pem(&self) -> Result<Vec<u8>, AuthError> {
        if self.kty != "RSA" {
            return Err(AuthError::InvalidKey(format!(
                "Unsupported key type: {}",
                self.kty
            )));
        }

        let n = self
            .n
            .as_ref()
            .ok_or_else(|| AuthError::InvalidKey("Missing modulus (n)".to_string()))?;
        let e = self
            .e
            .as_ref()
            .ok_or_else(|| AuthError::InvalidKey("Missing exponent (e)".to_string()))?;

        let n_bytes = URL_SAFE_NO_PAD
            .decode(n)
            .map_err(|e| AuthError::InvalidKey(format!("Invalid modulus encoding: {e}")))?;
        let e_bytes = URL_SAFE_NO_PAD
            .decode(e)
            .map_err(|e| AuthError::InvalidKey(format!("Invalid exponent encoding: {e}")))?;

        let der = rsa_spki_der(&n_bytes, &e_bytes);

        use base64::engine::general_purpose::STANDARD;
        let pem = format!(
            "-----BEGIN PUBLIC KEY-----\n{}\n-----END PUBLIC KEY-----\n",
            STANDARD.encode(&der)
        );

        Ok(pem.into_bytes())
    }
}

// SubjectPublicKeyInfo:
//   SEQUENCE { SEQUENCE { OID rsaEncryption, NULL },
//              BIT STRING { SEQUENCE { INTEGER n, INTEGER e } } }
fn rsa_spki_der(n: &[u8], e: &[u8]) -> Vec<u8> {
    // OID 1.2.840.113549.1.1.1
    const RSA_OID: [u8; 11] = [
        0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01,
    ];
    const NULL: [u8; 2] = [0x05, 0x00];

    let key_seq = der_sequence(&[&der_integer(n), &der_integer(e)]);
    let bit_string = der_bit_string(&key_seq);
    let algo_seq = der_sequence(&[&RSA_OID, &NULL]);
    der_sequence(&[&algo_seq, &bit_string])
}

fn der_length(len: usize) -> Vec<u8> {
    if len < 128 {
        vec![len as u8]
    } else if len < 256 {
        vec![0x81, len as u8]
    } else {
        vec![0x82, (len >> 8) as u8, (len & 0xff) as u8]
    }
}

fn der_integer(data: &[u8]) -> Vec<u8> {
    // Leading zero keeps the value positive when the high bit is set.
    let pad = !data.is_empty() && (data[0] & 0x80) != 0;
    let mut out = vec![0x02];
    out.extend(der_length(data.len() + usize::from(pad)));
    if pad {
        out.push(0x00);
    }
    out.extend_from_slice(data);
    out
}

fn der_sequence(items: &[&[u8]]) -> Vec<u8> {
    let content: Vec<u8> = items.iter().flat_map(|item| item.iter().copied()).collect();
    let mut out = vec![0x30];
    out.extend(der_length(content.len()));
    out.extend(content);
    out
}

fn der_bit_string(data: &[u8]) -> Vec<u8> {
    let mut out = vec![0x03];
    out.extend(der_length(data.len() + 1));
    out.push(0x00);
    out.extend_from_slice(data);
    out
}

/// A JSON Web Key Set (RFC 7517).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwkSet {
    /// Array of keys.
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    /// Find a key by its kid.
    #[must_use]
    pub fn find_key(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid.as_deref() == Some(kid))
    }

    /// The first signature key, for tokens without a kid header.
    #[must_use]
    pub fn first_signing_key(&self) -> Option<&Jwk> {
        self.keys
            .iter()
            .find(|k| k.key_use.as_deref() != Some("enc"))
    }
}

struct CachedJwks {
    jwks: JwkSet,
    fetched_at: Instant,
}

/// JWKS client with TTL caching and re-fetch on kid miss.
#[derive(Clone)]
pub struct JwksClient {
    url: String,
    cache: Arc<RwLock<Option<CachedJwks>>>,
    cache_ttl: Duration,
    http_client: reqwest::Client,
}

impl JwksClient {
    /// Create a client for a JWKS endpoint (Keycloak:
    /// `{issuer}/protocol/openid-connect/certs`).
    pub fn new(url: impl Into<String>) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                AuthError::JwksFetchFailed(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            url: url.into(),
            cache: Arc::new(RwLock::new(None)),
            cache_ttl: Duration::from_secs(300),
            http_client,
        })
    }

    /// Override the cache TTL.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Fetch the key set from the endpoint, updating the cache.
    pub async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AuthError::JwksFetchFailed(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AuthError::JwksFetchFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let jwks: JwkSet = response
            .json()
            .await
            .map_err(|e| AuthError::JwksFetchFailed(format!("Invalid JSON: {e}")))?;

        let mut cache = self.cache.write().await;
        *cache = Some(CachedJwks {
            jwks: jwks.clone(),
            fetched_at: Instant::now(),
        });

        Ok(jwks)
    }

    /// Get the key set, served from cache while fresh.
    pub async fn get_jwks(&self) -> Result<JwkSet, AuthError> {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.fetched_at.elapsed() < self.cache_ttl {
                    return Ok(cached.jwks.clone());
                }
            }
        }

        self.fetch_jwks().await
    }

    /// Resolve a verification key as PEM for the given kid.
    ///
    /// A kid miss forces one re-fetch before failing, which is how a key
    /// rotation propagates.
    pub async fn get_key_pem(&self, kid: Option<&str>) -> Result<Vec<u8>, AuthError> {
        let jwks = self.get_jwks().await?;

        if let Some(jwk) = select_key(&jwks, kid) {
            return jwk.to_pem();
        }

        let jwks = self.fetch_jwks().await?;
        select_key(&jwks, kid)
            .ok_or_else(|| AuthError::KeyNotFound(kid.unwrap_or("<none>").to_string()))?
            .to_pem()
    }
}

fn select_key<'a>(jwks: &'a JwkSet, kid: Option<&str>) -> Option<&'a Jwk> {
    match kid {
        Some(kid) => jwks.find_key(kid),
        None => jwks.first_signing_key(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rsa_jwk(kid: &str) -> Jwk {
        // Modulus/exponent of the 2048-bit test key used across the crate.
        Jwk {
            kty: "RSA".to_string(),
            kid: Some(kid.to_string()),
            key_use: Some("sig".to_string()),
            alg: Some("RS256".to_string()),
            n: Some(
                "uOs2bjkrVK1Vi6uSrZAGjy_YTQlC0eMz4YLJHVDgdXPm8UYjonBBykwbKm-C0p4syG93yBDeV7lC\
                 -U8zgSk94QHP4CilO9VShORDHG37iy1cU6o9PCto-z8wgoc88nWRowFn4rJ3QEnkDyCdRzNy4d1Y\
                 V2q97sMW6U9iqsefQu0g6Qkx7GcLy1TLqchIi_tfKxSO7w75Zx8bqBuXZBmYcmay3ysdQN3l-PVI\
                 m4ic_CpuFLW0XmeTvlUp3R2JoSxVySh3faTq-18cspk7nBiW5mTpko2924GiIWMh_graaMU7agn1\
                 ItpBwmXQtXBhfd1J6i5jSKu53NGG4SSXPvu9jQ"
                    .to_string(),
            ),
            e: Some("AQAB".to_string()),
        }
    }

    #[test]
    fn test_jwk_to_pem_produces_valid_decoding_key() {
        let pem = rsa_jwk("k1").to_pem().unwrap();
        let text = String::from_utf8(pem.clone()).unwrap();
        assert!(text.starts_with("-----BEGIN PUBLIC KEY-----"));
        // The produced PEM must be accepted by the JWT decoder's key parser.
        assert!(jsonwebtoken::DecodingKey::from_rsa_pem(&pem).is_ok());
    }

    #[test]
    fn test_jwk_to_pem_rejects_non_rsa() {
        let jwk = Jwk {
            kty: "EC".to_string(),
            kid: None,
            key_use: None,
            alg: None,
            n: None,
            e: None,
        };
        assert!(matches!(jwk.to_pem(), Err(AuthError::InvalidKey(_))));
    }

    #[test]
    fn test_find_key_by_kid() {
        let set = JwkSet {
            keys: vec![rsa_jwk("a"), rsa_jwk("b")],
        };
        assert!(set.find_key("b").is_some());
        assert!(set.find_key("c").is_none());
    }

    #[test]
    fn test_first_signing_key_skips_encryption_keys() {
        let mut enc = rsa_jwk("enc-key");
        enc.key_use = Some("enc".to_string());
        let set = JwkSet {
            keys: vec![enc, rsa_jwk("sig-key")],
        };
        assert_eq!(
            set.first_signing_key().and_then(|k| k.kid.as_deref()),
            Some("sig-key")
        );
    }

    #[test]
    fn test_der_integer_pads_high_bit() {
        let der = der_integer(&[0x80, 0x01]);
        assert_eq!(der, vec![0x02, 0x03, 0x00, 0x80, 0x01]);

        let der = der_integer(&[0x7f]);
        assert_eq!(der, vec![0x02, 0x01, 0x7f]);
    }
}
