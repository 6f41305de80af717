// crates/vc-interop-client/src/zcap.rs
// ============================================================================
// Module: Capability Invocation Signing
// Description: HTTP signatures for authorization capability (zcap) invocation.
// Purpose: Sign outbound POSTs with an Ed25519 key derived from a seed.
// Dependencies: ed25519-dalek, multibase, sha2, base64, flate2
// ============================================================================

//! ## Overview
//! A zcap-protected endpoint expects four signed headers on each request:
//! `capability-invocation` names the capability being invoked, `digest`
//! binds the body, and `authorization` carries an HTTP signature over the
//! request target, host, content type, digest, and invocation header.
//!
//! The signing key is an Ed25519 key derived from a multibase (`z`,
//! base58btc) seed. Its `did:key` identifier doubles as the signature
//! `keyId`. Root capabilities are referenced by id; delegated capabilities
//! are embedded as gzip-compressed, base64url-encoded JSON.
//!
//! Security posture: seeds and signatures are secrets; the signer's `Debug`
//! output is redacted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use ed25519_dalek::Signer;
use ed25519_dalek::SigningKey;
use ed25519_dalek::VerifyingKey;
use flate2::Compression;
use flate2::write::GzEncoder;
use multibase::Base;
use serde_json::Value;
use sha2::Digest;
use sha2::Sha256;
use url::Url;
use vc_interop_config::ROOT_CAPABILITY_PREFIX;

use crate::client::ClientError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header naming the invoked capability.
pub const CAPABILITY_INVOCATION_HEADER: &str = "capability-invocation";
/// Header carrying the body digest.
pub const DIGEST_HEADER: &str = "digest";
/// Capability action used for POST requests.
pub const WRITE_ACTION: &str = "write";
/// Signature validity window in seconds.
pub const SIGNATURE_TTL_SECS: u64 = 600;
/// Identity multihash prefix of an encoded 32-byte seed.
const SEED_PREFIX: [u8; 2] = [0x00, 0x20];
/// Multicodec prefix of an Ed25519 public key.
const ED25519_PUB_PREFIX: [u8; 2] = [0xed, 0x01];
/// Multihash prefix of a SHA-256 digest.
const SHA256_MULTIHASH_PREFIX: [u8; 2] = [0x12, 0x20];
/// Headers covered by the signature, in signing order.
pub const COVERED_HEADERS: [&str; 8] = [
    "(key-id)",
    "(created)",
    "(expires)",
    "(request-target)",
    "host",
    CAPABILITY_INVOCATION_HEADER,
    "content-type",
    DIGEST_HEADER,
];
/// Content type of signed requests.
const JSON_CONTENT_TYPE: &str = "application/json";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Request facts covered by an invocation signature.
#[derive(Debug, Clone, Copy)]
pub struct InvocationRequest<'a> {
    /// Target URL.
    pub url: &'a Url,
    /// HTTP method (lowercased when signed).
    pub method: &'a str,
    /// Exact request body bytes.
    pub body: &'a [u8],
    /// Capability to invoke; `None` invokes the root capability of `url`.
    pub capability: Option<&'a Value>,
    /// Capability action.
    pub action: &'a str,
    /// Signature creation time (seconds since epoch).
    pub created: u64,
}

/// Signed header values for one request.
#[derive(Clone, PartialEq, Eq)]
pub struct InvocationHeaders {
    /// `authorization` header value.
    pub authorization: String,
    /// `capability-invocation` header value.
    pub capability_invocation: String,
    /// `digest` header value.
    pub digest: String,
    /// `host` value covered by the signature.
    pub host: String,
}

impl fmt::Debug for InvocationHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationHeaders")
            .field("authorization", &"<redacted>")
            .field("capability_invocation", &self.capability_invocation)
            .field("digest", &self.digest)
            .field("host", &self.host)
            .finish()
    }
}

/// Ed25519 invocation signer bound to a `did:key` identifier.
pub struct InvocationSigner {
    /// Signing key derived from the seed.
    signing_key: SigningKey,
    /// `did:key` verification method id.
    key_id: String,
}

impl fmt::Debug for InvocationSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationSigner")
            .field("key_id", &self.key_id)
            .field("signing_key", &"<redacted>")
            .finish()
    }
}

impl InvocationSigner {
    /// Derives a signer from a multibase base58btc seed.
    ///
    /// Accepts an identity-multihash seed (`0x00 0x20` plus 32 bytes) or a
    /// bare 32-byte seed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Auth`] when the seed cannot be decoded.
    pub fn from_seed(seed: &str) -> Result<Self, ClientError> {
        let (base, bytes) = multibase::decode(seed.trim())
            .map_err(|err| ClientError::Auth(format!("invalid key seed encoding: {err}")))?;
        if base != Base::Base58Btc {
            return Err(ClientError::Auth("key seed must be base58btc multibase".to_string()));
        }
        let raw = bytes
            .strip_prefix(SEED_PREFIX.as_slice())
            .filter(|rest| rest.len() == 32)
            .unwrap_or(bytes.as_slice());
        let seed: [u8; 32] = raw
            .try_into()
            .map_err(|_| ClientError::Auth("key seed must hold 32 bytes".to_string()))?;
        let signing_key = SigningKey::from_bytes(&seed);
        let fingerprint = did_key_fingerprint(&signing_key.verifying_key());
        Ok(Self {
            key_id: format!("did:key:{fingerprint}#{fingerprint}"),
            signing_key,
        })
    }

    /// Returns the `did:key` verification method id.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Returns the public verification key.
    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Signs a request and returns the headers to attach.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Auth`] when the capability cannot be encoded or
    /// the URL has no host.
    pub fn sign_request(
        &self,
        request: &InvocationRequest<'_>,
    ) -> Result<InvocationHeaders, ClientError> {
        let host = host_value(request.url)?;
        let capability_invocation =
            capability_header(request.capability, request.url, request.action)?;
        let digest = digest_header(request.body);
        let created = request.created.to_string();
        let expires = request.created.saturating_add(SIGNATURE_TTL_SECS).to_string();
        let target = request_target(request.method, request.url);
        let values = [
            self.key_id.as_str(),
            created.as_str(),
            expires.as_str(),
            target.as_str(),
            host.as_str(),
            capability_invocation.as_str(),
            JSON_CONTENT_TYPE,
            digest.as_str(),
        ];
        let message = signing_string(&values);
        let signature = STANDARD.encode(self.signing_key.sign(message.as_bytes()).to_bytes());
        let authorization = format!(
            "Signature keyId=\"{}\",headers=\"{}\",signature=\"{signature}\",created=\"{created}\",\
             expires=\"{expires}\"",
            self.key_id,
            COVERED_HEADERS.join(" "),
        );
        Ok(InvocationHeaders {
            authorization,
            capability_invocation,
            digest,
            host,
        })
    }
}

// ============================================================================
// SECTION: Header Construction
// ============================================================================

/// Returns the multibase base58btc `did:key` fingerprint of a public key.
#[must_use]
pub fn did_key_fingerprint(key: &VerifyingKey) -> String {
    let mut bytes = Vec::with_capacity(ED25519_PUB_PREFIX.len() + 32);
    bytes.extend_from_slice(&ED25519_PUB_PREFIX);
    bytes.extend_from_slice(key.as_bytes());
    multibase::encode(Base::Base58Btc, bytes)
}

/// Returns the `mh=` multihash digest header value for a body.
#[must_use]
pub fn digest_header(body: &[u8]) -> String {
    let mut multihash = Vec::with_capacity(SHA256_MULTIHASH_PREFIX.len() + 32);
    multihash.extend_from_slice(&SHA256_MULTIHASH_PREFIX);
    multihash.extend_from_slice(&Sha256::digest(body));
    format!("mh={}", multibase::encode(Base::Base64Url, multihash))
}

/// Returns the root capability id for a target URL.
#[must_use]
pub fn root_capability_id(url: &Url) -> String {
    format!("{ROOT_CAPABILITY_PREFIX}{}", urlencoding::encode(url.as_str()))
}

/// Builds the `capability-invocation` header value.
///
/// # Errors
///
/// Returns [`ClientError::Auth`] when the capability is neither an id nor an
/// object, or cannot be compressed.
pub fn capability_header(
    capability: Option<&Value>,
    url: &Url,
    action: &str,
) -> Result<String, ClientError> {
    match capability {
        None => Ok(format!("zcap id=\"{}\",action=\"{action}\"", root_capability_id(url))),
        Some(Value::String(id)) => Ok(format!("zcap id=\"{id}\",action=\"{action}\"")),
        Some(object @ Value::Object(_)) => {
            let json = serde_json::to_vec(object)
                .map_err(|err| ClientError::Auth(format!("capability encoding failed: {err}")))?;
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder
                .write_all(&json)
                .map_err(|err| ClientError::Auth(format!("capability compression failed: {err}")))?;
            let compressed = encoder
                .finish()
                .map_err(|err| ClientError::Auth(format!("capability compression failed: {err}")))?;
            Ok(format!(
                "zcap capability=\"{}\",action=\"{action}\"",
                URL_SAFE_NO_PAD.encode(compressed)
            ))
        }
        Some(_) => Err(ClientError::Auth(
            "capability must be an object or a capability id".to_string(),
        )),
    }
}

/// Returns the host header value, including a non-default port.
pub(crate) fn host_value(url: &Url) -> Result<String, ClientError> {
    let host = url
        .host_str()
        .ok_or_else(|| ClientError::Auth("signed request url has no host".to_string()))?;
    Ok(url.port().map_or_else(|| host.to_string(), |port| format!("{host}:{port}")))
}

/// Returns the `(request-target)` value: lowercase method, path, and query.
pub(crate) fn request_target(method: &str, url: &Url) -> String {
    let method = method.to_ascii_lowercase();
    match url.query() {
        Some(query) => format!("{method} {}?{query}", url.path()),
        None => format!("{method} {}", url.path()),
    }
}

/// Joins covered header names and values into the signing string.
pub(crate) fn signing_string(values: &[&str; 8]) -> String {
    COVERED_HEADERS
        .iter()
        .zip(values)
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
