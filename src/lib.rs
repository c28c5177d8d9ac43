//! Blocking, OAuth1 signed client for the Tumblr v2 API.
//!
//! ```no_run
//! use tumblr_client::{Client, Params};
//!
//! let client = Client::with_token("consumer key", "consumer secret", "token", "token secret");
//! let dashboard = client.dashboard_with_params(&Params::from([("limit", "5")]))?;
//! println!("{} posts", dashboard.posts.len());
//! # Ok::<(), tumblr_client::Error>(())
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod oauth1;
pub mod response;
pub mod transport;
pub mod uri;

pub use client::{Client, ClientInterface};
pub use config::ClientConfig;
pub use credentials::{Consumer, Credentials, Token};
pub use error::{Error, Result};
pub use response::Response;
pub use uri::Params;
