use reqwest::Method;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::domain::{self, BlogRef, Dashboard, Likes, PostRef, SearchResults, User};
use crate::error::Result;
use crate::response::Response;
use crate::transport::{ClientCache, SigningClient};
use crate::uri::{append_path, create_request_uri, Params};

/// The request primitives every API call is built from.
///
/// Domain handles only ever talk to this trait, so anything that can issue
/// the four verbs can back them.
pub trait ClientInterface {
    fn get_with_params(&self, endpoint: &str, params: &Params) -> Result<Response>;

    fn post_with_params(&self, endpoint: &str, params: &Params) -> Result<Response>;

    fn put_with_params(&self, endpoint: &str, params: &Params) -> Result<Response>;

    fn delete_with_params(&self, endpoint: &str, params: &Params) -> Result<Response>;

    fn get(&self, endpoint: &str) -> Result<Response> {
        self.get_with_params(endpoint, &Params::new())
    }

    fn post(&self, endpoint: &str) -> Result<Response> {
        self.post_with_params(endpoint, &Params::new())
    }

    fn put(&self, endpoint: &str) -> Result<Response> {
        self.put_with_params(endpoint, &Params::new())
    }

    fn delete(&self, endpoint: &str) -> Result<Response> {
        self.delete_with_params(endpoint, &Params::new())
    }
}

/// Tumblr API client.
///
/// Holds the credentials and lazily builds the signing HTTP client from them.
/// Every call blocks until the response is classified.
pub struct Client {
    cache: ClientCache,
}

impl Client {
    /// Client signing with the application credentials only.
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        let client = Client::with_config(ClientConfig::default());
        client.set_consumer(consumer_key, consumer_secret);
        client
    }

    /// Client acting on behalf of a user.
    pub fn with_token(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        let client = Client::new(consumer_key, consumer_secret);
        client.set_token(token, token_secret);
        client
    }

    /// Client without credentials. Requests fail with a configuration error
    /// until [`Client::set_consumer`] is called.
    pub fn with_config(config: ClientConfig) -> Self {
        Client {
            cache: ClientCache::new(config),
        }
    }

    pub fn from_credentials(credentials: Credentials, config: ClientConfig) -> Self {
        let client = Client::with_config(config);
        let Credentials { consumer, token } = credentials;
        client.set_consumer(consumer.key, consumer.secret);
        if let Some(token) = token {
            client.set_token(token.token, token.secret);
        }
        client
    }

    /// Client configured from `TUMBLR_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Client::from_credentials(
            Credentials::from_env()?,
            ClientConfig::default(),
        ))
    }

    /// Replaces the consumer credentials and drops the cached HTTP client.
    pub fn set_consumer(&self, consumer_key: impl Into<String>, consumer_secret: impl Into<String>) {
        self.cache.set_consumer(consumer_key, consumer_secret);
    }

    /// Replaces the user credentials and drops the cached HTTP client.
    pub fn set_token(&self, token: impl Into<String>, token_secret: impl Into<String>) {
        self.cache.set_token(token, token_secret);
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.cache.credentials()
    }

    pub fn config(&self) -> &ClientConfig {
        self.cache.config()
    }

    /// The signing HTTP client for the current credentials.
    pub fn http_client(&self) -> Result<Arc<SigningClient>> {
        self.cache.http_client()
    }

    fn endpoint_uri(&self, endpoint: &str) -> String {
        append_path(&self.config().api_base, endpoint)
    }

    /// GET with params in the query string.
    pub fn get_with_params(&self, endpoint: &str, params: &Params) -> Result<Response> {
        let uri = create_request_uri(&self.endpoint_uri(endpoint), params);
        self.http_client()?.execute(Method::GET, &uri, None)
    }

    /// POST with params as a form body.
    pub fn post_with_params(&self, endpoint: &str, params: &Params) -> Result<Response> {
        let uri = self.endpoint_uri(endpoint);
        self.http_client()?.execute(Method::POST, &uri, Some(params))
    }

    /// PUT with an empty body and params in the query string.
    pub fn put_with_params(&self, endpoint: &str, params: &Params) -> Result<Response> {
        let uri = create_request_uri(&self.endpoint_uri(endpoint), params);
        self.http_client()?.execute(Method::PUT, &uri, None)
    }

    /// DELETE with an empty body and params in the query string.
    pub fn delete_with_params(&self, endpoint: &str, params: &Params) -> Result<Response> {
        let uri = create_request_uri(&self.endpoint_uri(endpoint), params);
        self.http_client()?.execute(Method::DELETE, &uri, None)
    }

    pub fn get(&self, endpoint: &str) -> Result<Response> {
        ClientInterface::get(self, endpoint)
    }

    pub fn post(&self, endpoint: &str) -> Result<Response> {
        ClientInterface::post(self, endpoint)
    }

    pub fn put(&self, endpoint: &str) -> Result<Response> {
        ClientInterface::put(self, endpoint)
    }

    pub fn delete(&self, endpoint: &str) -> Result<Response> {
        ClientInterface::delete(self, endpoint)
    }

    pub fn post_ref(&self, id: u64, blog_name: impl Into<String>) -> PostRef<'_, Client> {
        PostRef::new(self, id, blog_name)
    }

    pub fn blog_ref(&self, name: impl Into<String>) -> BlogRef<'_, Client> {
        BlogRef::new(self, name)
    }

    /// Info about the user the token belongs to.
    pub fn user(&self) -> Result<User> {
        domain::user_info(self)
    }

    pub fn dashboard(&self) -> Result<Dashboard> {
        self.dashboard_with_params(&Params::new())
    }

    pub fn dashboard_with_params(&self, params: &Params) -> Result<Dashboard> {
        domain::dashboard(self, params)
    }

    /// Posts the current user has liked.
    pub fn likes(&self) -> Result<Likes> {
        self.likes_with_params(&Params::new())
    }

    pub fn likes_with_params(&self, params: &Params) -> Result<Likes> {
        domain::likes(self, params)
    }

    pub fn tagged_search(&self, tag: &str) -> Result<SearchResults> {
        self.tagged_search_with_params(tag, &Params::new())
    }

    pub fn tagged_search_with_params(&self, tag: &str, params: &Params) -> Result<SearchResults> {
        domain::tagged_search(self, tag, params)
    }
}

impl ClientInterface for Client {
    fn get_with_params(&self, endpoint: &str, params: &Params) -> Result<Response> {
        Client::get_with_params(self, endpoint, params)
    }

    fn post_with_params(&self, endpoint: &str, params: &Params) -> Result<Response> {
        Client::post_with_params(self, endpoint, params)
    }

    fn put_with_params(&self, endpoint: &str, params: &Params) -> Result<Response> {
        Client::put_with_params(self, endpoint, params)
    }

    fn delete_with_params(&self, endpoint: &str, params: &Params) -> Result<Response> {
        Client::delete_with_params(self, endpoint, params)
    }
}
