//! OAuth 1.0a request signing (RFC 5849).

mod values;

pub use values::{OAuthVersion, SignatureMethod, OAUTH_VALUE_VERSION};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet};
use sha1::Sha1;
use std::borrow::Cow;
use url::Url;
use uuid::Uuid;

type HmacSha1 = Hmac<Sha1>;

// https://tools.ietf.org/html/rfc5849#section-3.6
// * ALPHA, DIGIT, '-', '.', '_', '~' MUST NOT be encoded.
// * All other characters MUST be encoded.
// * The two hexadecimal characters used to represent encoded
//   characters MUST be uppercase.
const TARGETS_FOR_PARAMS: &AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const OAUTH_HEADER: &str = "OAuth";
const OAUTH_PARAM_KEY_CONSUMER_KEY: &str = "oauth_consumer_key";
const OAUTH_PARAM_KEY_NONCE: &str = "oauth_nonce";
const OAUTH_PARAM_KEY_SIGNATURE: &str = "oauth_signature";
const OAUTH_PARAM_KEY_SIGNATURE_METHOD: &str = "oauth_signature_method";
const OAUTH_PARAM_KEY_TIMESTAMP: &str = "oauth_timestamp";
const OAUTH_PARAM_KEY_TOKEN: &str = "oauth_token";
const OAUTH_PARAM_KEY_VERSION: &str = "oauth_version";

// excluded from the signature base string
const REALM: &str = "realm";

/// OAuth Signature Builder
#[derive(Clone, Debug)]
pub struct Signer {
    consumer_key: String,
    token: Option<String>,
    nonce: Option<String>,
    signature_method: SignatureMethod,
    version: OAuthVersion,
    timestamp: Option<i64>,
    encoded_parameters: Vec<(String, String)>,
}

/// Result of signing one request.
#[derive(Clone, Debug)]
pub struct Signature {
    /// Base64 signature, not percent-encoded.
    pub signature: String,
    pub nonce: String,
    pub timestamp: i64,
    // encoded oauth_* protocol parameters, without the signature
    protocol_params: Vec<(String, String)>,
}

impl Signer {
    /// Builder for requests signed by the application alone.
    pub fn new(consumer_key: impl Into<String>) -> Self {
        Signer {
            consumer_key: consumer_key.into(),
            token: None,
            nonce: None,
            signature_method: SignatureMethod::default(),
            version: OAuthVersion::Default,
            timestamp: None,
            encoded_parameters: Vec::new(),
        }
    }

    /// Builder for requests made on behalf of a user. An empty token means
    /// anonymous signing and leaves `oauth_token` out.
    pub fn new_with_token(consumer_key: impl Into<String>, token: impl Into<String>) -> Self {
        let mut signer = Signer::new(consumer_key);
        signer.oauth_token(token);
        signer
    }

    pub fn oauth_token(&mut self, token: impl Into<String>) -> &mut Signer {
        let token = token.into();
        self.token = if token.is_empty() { None } else { Some(token) };
        self
    }

    pub fn oauth_nonce(&mut self, nonce: impl Into<String>) -> &mut Signer {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn oauth_signature_method(&mut self, method: SignatureMethod) -> &mut Signer {
        self.signature_method = method;
        self
    }

    pub fn oauth_version(&mut self, version: OAuthVersion) -> &mut Signer {
        self.version = version;
        self
    }

    pub fn oauth_timestamp(&mut self, timestamp: i64) -> &mut Signer {
        self.timestamp = Some(timestamp);
        self
    }

    /// Adds a body parameter that takes part in the signature.
    pub fn add_param(&mut self, key: &str, value: &str) -> &mut Signer {
        self.encoded_parameters
            .push((percent_encode(key), percent_encode(value)));
        self
    }

    /// Signs a request to `url`. Query parameters of `url` take part in the
    /// signature; the secrets are passed unencoded.
    pub fn sign(
        &self,
        url: &Url,
        http_method: &str,
        consumer_secret: &str,
        token_secret: &str,
    ) -> Signature {
        let timestamp = self
            .timestamp
            .unwrap_or_else(|| Utc::now().timestamp());
        let nonce = self
            .nonce
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let protocol_params = self.protocol_params(&nonce, timestamp);

        let signature = match self.signature_method {
            SignatureMethod::PlainText => signature_plaintext(consumer_secret, token_secret),
            SignatureMethod::HmacSha1 => {
                let (endpoint, query) = split_url(url);
                let mut params = [protocol_params.clone(), query, self.encoded_parameters.clone()]
                    .concat::<(String, String)>();
                // then, alphabetic sort by key
                params.sort();
                signature_hmacsha1(consumer_secret, token_secret, http_method, &endpoint, &params)
            }
        };

        Signature {
            signature,
            nonce,
            timestamp,
            protocol_params,
        }
    }

    fn protocol_params(&self, nonce: &str, timestamp: i64) -> Vec<(String, String)> {
        let params = vec![
            (OAUTH_PARAM_KEY_CONSUMER_KEY, Some(Cow::from(self.consumer_key.as_str()))),
            (OAUTH_PARAM_KEY_NONCE, Some(Cow::from(nonce))),
            (
                OAUTH_PARAM_KEY_SIGNATURE_METHOD,
                Some(Cow::from(self.signature_method.as_str())),
            ),
            (OAUTH_PARAM_KEY_TIMESTAMP, Some(Cow::from(timestamp.to_string()))),
            (OAUTH_PARAM_KEY_TOKEN, self.token.as_deref().map(Cow::from)),
            (OAUTH_PARAM_KEY_VERSION, self.version.value().map(Cow::from)),
        ];
        params
            .into_iter()
            // trim None value
            .filter_map(|(k, v)| v.map(|v| (k.to_string(), percent_encode(&v))))
            .collect()
    }
}

impl Signature {
    /// Value for the `Authorization` header.
    pub fn authorization_header(&self) -> String {
        let mut params = self
            .protocol_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, v))
            .collect::<Vec<String>>();
        params.push(format!(
            "{}=\"{}\"",
            OAUTH_PARAM_KEY_SIGNATURE,
            percent_encode(&self.signature)
        ));
        params.sort();
        format!("{} {}", OAUTH_HEADER, params.join(", "))
    }
}

/// Splits `url` into the base string URI and its encoded query pairs.
fn split_url(url: &Url) -> (String, Vec<(String, String)>) {
    let query = url
        .query_pairs()
        .map(|(k, v)| (percent_encode(&k), percent_encode(&v)))
        .collect();
    let mut endpoint = url.clone();
    endpoint.set_query(None);
    endpoint.set_fragment(None);
    (endpoint.to_string(), query)
}

fn signature_plaintext(consumer_secret: &str, token_secret: &str) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    )
}

fn signature_hmacsha1(
    consumer_secret: &str,
    token_secret: &str,
    http_method: &str,
    endpoint: &str,
    encoded_params: &[(String, String)],
) -> String {
    let param_str = encoded_params
        .iter()
        .filter(|(k, _)| k != REALM)
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<String>>()
        .join("&");

    // parameters are encoded twice
    let base_str = format!(
        "{}&{}&{}",
        percent_encode(&http_method.to_ascii_uppercase()),
        percent_encode(endpoint),
        percent_encode(&param_str)
    );
    let sign_key = signature_plaintext(consumer_secret, token_secret);

    let mut mac = HmacSha1::new_from_slice(sign_key.as_bytes())
        .expect("HMAC-SHA1 accepts keys of any length");
    mac.update(base_str.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, TARGETS_FOR_PARAMS).to_string()
}
