//! Credential slots and the signing HTTP client derived from them.

use log::{debug, trace};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{redirect, Method};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use url::Url;

use crate::config::ClientConfig;
use crate::credentials::{Consumer, Credentials, Token};
use crate::error::{BoxError, Error, Result};
use crate::oauth1::Signer;
use crate::response::{self, RawResponse, Response};
use crate::uri::Params;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Blocking HTTP client that signs every request with one fixed pair of
/// consumer and user credentials. Redirects are never followed.
#[derive(Debug)]
pub struct SigningClient {
    http: reqwest::blocking::Client,
    consumer: Consumer,
    token: Token,
}

impl SigningClient {
    pub fn new(consumer: Consumer, token: Token, config: &ClientConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .redirect(redirect::Policy::none())
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;
        Ok(SigningClient {
            http,
            consumer,
            token,
        })
    }

    pub fn consumer(&self) -> &Consumer {
        &self.consumer
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Signs and sends one request, then classifies the outcome.
    ///
    /// `form` goes out as an urlencoded body. Without it, every verb but GET
    /// sends an empty body.
    pub fn execute(&self, method: Method, uri: &str, form: Option<&Params>) -> Result<Response> {
        let invalid = |source: BoxError| Error::InvalidRequest {
            uri: uri.to_string(),
            source,
        };
        let url = Url::parse(uri).map_err(|e| invalid(Box::new(e)))?;

        let mut signer = Signer::new_with_token(&self.consumer.key, &self.token.token);
        if let Some(form) = form {
            for (k, v) in form.iter() {
                signer.add_param(k, v);
            }
        }
        let signature = signer.sign(
            &url,
            method.as_str(),
            &self.consumer.secret,
            &self.token.secret,
        );

        let builder = self
            .http
            .request(method.clone(), url)
            .header(AUTHORIZATION, signature.authorization_header());
        let builder = match form {
            Some(form) => builder
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(form.encode()),
            None if method == Method::GET => builder,
            None => builder.body(""),
        };
        let request = builder.build().map_err(|e| invalid(Box::new(e)))?;

        debug!("{} {}", method, uri);
        response::classify(
            self.http
                .execute(request)
                .map(RawResponse::<reqwest::blocking::Response>::from)
                .map_err(Error::from),
        )
    }
}

#[derive(Default)]
struct CacheState {
    consumer: Option<Consumer>,
    token: Option<Token>,
    client: Option<Arc<SigningClient>>,
}

impl CacheState {
    fn invalidate(&mut self) {
        if self.client.take().is_some() {
            trace!("credentials changed, dropping cached signing client");
        }
    }
}

/// Consumer and user credentials plus the signing client built from them.
///
/// All state sits behind one lock: setting either credential pair drops the
/// cached client, and the next [`ClientCache::http_client`] builds a fresh
/// one from whatever is current.
pub struct ClientCache {
    config: ClientConfig,
    state: Mutex<CacheState>,
}

impl ClientCache {
    pub fn new(config: ClientConfig) -> Self {
        ClientCache {
            config,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // the state is consistent after every critical section
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_consumer(&self, key: impl Into<String>, secret: impl Into<String>) {
        let mut state = self.lock();
        state.consumer = Some(Consumer::new(key, secret));
        state.invalidate();
    }

    pub fn set_token(&self, token: impl Into<String>, secret: impl Into<String>) {
        let mut state = self.lock();
        state.token = Some(Token::new(token, secret));
        state.invalidate();
    }

    pub fn consumer(&self) -> Option<Consumer> {
        self.lock().consumer.clone()
    }

    pub fn token(&self) -> Option<Token> {
        self.lock().token.clone()
    }

    /// Both credential pairs as one snapshot, or `None` without a consumer.
    pub fn credentials(&self) -> Option<Credentials> {
        let state = self.lock();
        state.consumer.clone().map(|consumer| Credentials {
            consumer,
            token: state.token.clone(),
        })
    }

    pub fn has_cached_client(&self) -> bool {
        self.lock().client.is_some()
    }

    /// The signing client for the current credentials, built on first use.
    ///
    /// Fails with [`Error::Configuration`] until consumer credentials are
    /// set. Missing user credentials default to an empty pair.
    pub fn http_client(&self) -> Result<Arc<SigningClient>> {
        let mut state = self.lock();
        let consumer = state
            .consumer
            .clone()
            .ok_or_else(|| Error::Configuration("consumer credentials are not set".into()))?;
        let token = state.token.get_or_insert_with(Token::default).clone();

        if let Some(client) = &state.client {
            return Ok(Arc::clone(client));
        }

        debug!(
            "building signing client for consumer {} ({})",
            consumer.key,
            if token.is_anonymous() { "anonymous" } else { "user" }
        );
        let client = Arc::new(SigningClient::new(consumer, token, &self.config)?);
        state.client = Some(Arc::clone(&client));
        Ok(client)
    }
}
