use std::env;
use std::fmt;

use crate::error::{Error, Result};

pub const ENV_CONSUMER_KEY: &str = "TUMBLR_CONSUMER_KEY";
pub const ENV_CONSUMER_SECRET: &str = "TUMBLR_CONSUMER_SECRET";
pub const ENV_TOKEN: &str = "TUMBLR_TOKEN";
pub const ENV_TOKEN_SECRET: &str = "TUMBLR_TOKEN_SECRET";

/// Application key and secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Consumer {
    pub key: String,
    pub secret: String,
}

/// User token and secret. Both empty means anonymous signing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Token {
    pub token: String,
    pub secret: String,
}

impl Consumer {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Consumer {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

impl Token {
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Token {
            token: token.into(),
            secret: secret.into(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.token.is_empty() && self.secret.is_empty()
    }
}

// keep secrets out of logs
impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("key", &self.key)
            .field("secret", &"***")
            .finish()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("token", &self.token)
            .field("secret", &"***")
            .finish()
    }
}

/// Consumer credentials plus optional user credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub consumer: Consumer,
    pub token: Option<Token>,
}

impl Credentials {
    pub fn new(consumer: Consumer) -> Self {
        Credentials {
            consumer,
            token: None,
        }
    }

    pub fn with_token(consumer: Consumer, token: Token) -> Self {
        Credentials {
            consumer,
            token: Some(token),
        }
    }

    /// Reads credentials from the environment, loading `.env` first when
    /// present. The token pair is optional but must be complete when given.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Credentials::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| Error::Configuration(format!("{} is not set", name)))
        };
        let consumer = Consumer::new(required(ENV_CONSUMER_KEY)?, required(ENV_CONSUMER_SECRET)?);
        let token = match (lookup(ENV_TOKEN), lookup(ENV_TOKEN_SECRET)) {
            (Some(token), Some(secret)) => Some(Token::new(token, secret)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(Error::Configuration(format!(
                    "{} is set without {}",
                    ENV_TOKEN, ENV_TOKEN_SECRET
                )))
            }
            (None, Some(_)) => {
                return Err(Error::Configuration(format!(
                    "{} is set without {}",
                    ENV_TOKEN_SECRET, ENV_TOKEN
                )))
            }
        };
        Ok(Credentials { consumer, token })
    }
}
