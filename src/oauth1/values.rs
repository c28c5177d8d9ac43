pub const OAUTH_VALUE_VERSION: &str = "1.0";

pub const OAUTH_VALUE_SIGMETHOD_HMACSHA1: &str = "HMAC-SHA1";
pub const OAUTH_VALUE_SIGMETHOD_PLAINTEXT: &str = "PLAINTEXT";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SignatureMethod {
    PlainText,
    #[default]
    HmacSha1,
}

impl SignatureMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            SignatureMethod::PlainText => OAUTH_VALUE_SIGMETHOD_PLAINTEXT,
            SignatureMethod::HmacSha1 => OAUTH_VALUE_SIGMETHOD_HMACSHA1,
        }
    }
}

/// Value of `oauth_version`; `None` leaves the parameter out entirely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OAuthVersion {
    None,
    #[default]
    Default,
}

impl OAuthVersion {
    pub fn value(self) -> Option<&'static str> {
        match self {
            OAuthVersion::None => None,
            OAuthVersion::Default => Some(OAUTH_VALUE_VERSION),
        }
    }
}
