//! Zabbix API client
//!
//! [`ZabbixClient`] ties the call engine to a session token and the server
//! version negotiated at construction.
//!
//! # Client Lifecycle
//!
//! 1. **Connect**: build the transport, ask the server for its version
//! 2. **Login**: obtain a session token (optional for some methods)
//! 3. **Use**: issue calls, possibly from many tasks at once
//!
//! # Sharing
//!
//! Call methods take `&self`, so a client can be shared (e.g. in an `Arc`)
//! across tasks. Methods that change the token ([`login`](ZabbixClient::login),
//! [`logout`](ZabbixClient::logout), [`suspend_auth`](ZabbixClient::suspend_auth))
//! take `&mut self`: the token is not locked, and the borrow checker keeps
//! those from running alongside other calls.

use crate::engine::CallEngine;
use crate::session::{self, Session, SuspendedAuth};
use crate::ClientBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use zapi_core::{ApiVersion, Error, Params, Response, Result};

/// Method returning the server's API version
pub const VERSION_METHOD: &str = "apiinfo.version";

/// Method exchanging credentials for a session token
pub const LOGIN_METHOD: &str = "user.login";

/// Method invalidating the current session token
pub const LOGOUT_METHOD: &str = "user.logout";

/// JSON-RPC client for the Zabbix API
#[derive(Debug)]
pub struct ZabbixClient {
    pub(crate) url: String,
    pub(crate) engine: CallEngine,
    pub(crate) session: Session,
    pub(crate) version: ApiVersion,
    pub(crate) version_string: String,
}

impl ZabbixClient {
    /// Connect with default settings
    ///
    /// Typical URLs are `http://host/api_jsonrpc.php` or
    /// `http://host/zabbix/api_jsonrpc.php`.
    pub async fn connect(url: &str) -> Result<Self> {
        ClientBuilder::new(url).connect().await
    }

    /// Start configuring a client
    pub fn builder(url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(url)
    }

    pub(crate) fn new(url: String, engine: CallEngine) -> Self {
        Self {
            url,
            engine,
            session: Session::new(),
            version: ApiVersion::default(),
            version_string: String::new(),
        }
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Server version negotiated at construction
    pub fn version(&self) -> ApiVersion {
        self.version
    }

    /// Version string as reported by the server, e.g. "6.0.25"
    pub fn version_string(&self) -> &str {
        &self.version_string
    }

    /// Whether calls are serialized through a single in-flight request
    pub fn is_serialized(&self) -> bool {
        self.engine.is_serialized()
    }

    /// Correlation id of the most recent call
    pub fn last_request_id(&self) -> i32 {
        self.engine.last_id()
    }

    /// Current session token, if authenticated
    pub fn auth_token(&self) -> Option<&str> {
        self.session.token()
    }

    /// Use an existing token, e.g. an API token created in the frontend
    pub fn set_auth_token(&mut self, token: impl Into<String>) {
        self.session.set(token);
    }

    /// Drop the current token without telling the server
    pub fn clear_auth_token(&mut self) {
        self.session.clear();
    }

    /// Issue a call; API errors are returned inside the response
    ///
    /// `Err` only covers transport, encoding and decoding failures.
    pub async fn call<P: Serialize>(&self, method: &str, params: P) -> Result<Response> {
        self.engine
            .call(method, params, &self.session, self.version)
            .await
    }

    /// Issue a call and return an API error as `Err(Error::Api)`
    pub async fn call_checked<P: Serialize>(&self, method: &str, params: P) -> Result<Response> {
        self.engine
            .call_checked(method, params, &self.session, self.version)
            .await
    }

    /// Issue a call and decode the result into `T`
    ///
    /// ```rust,no_run
    /// # async fn example(client: &zapi_client::ZabbixClient) -> zapi_core::Result<()> {
    /// #[derive(serde::Deserialize)]
    /// struct Host {
    ///     hostid: String,
    ///     host: String,
    /// }
    ///
    /// let hosts: Vec<Host> = client
    ///     .call_typed("host.get", serde_json::json!({"output": ["hostid", "host"]}))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call_typed<T, P>(&self, method: &str, params: P) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        self.engine
            .call_typed(method, params, &self.session, self.version)
            .await
    }

    /// Clear the token until the returned guard is dropped
    pub fn suspend_auth(&mut self) -> SuspendedAuth<'_> {
        SuspendedAuth::new(self)
    }

    /// Log in and keep the returned token for later calls
    ///
    /// The user name parameter is `username` on 5.4 and later, `user` before.
    /// The call itself goes out without a token. On failure the previous
    /// token is kept.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&mut self, username: &str, password: &str) -> Result<String> {
        let params = session::login_params(self.version, username, password);
        let token: String = {
            let anonymous = self.suspend_auth();
            anonymous.call_typed(LOGIN_METHOD, params).await?
        };

        self.session.set(token.clone());
        tracing::info!("Logged in");
        Ok(token)
    }

    /// Invalidate the session on the server and forget the token
    pub async fn logout(&mut self) -> Result<()> {
        self.call_checked(LOGOUT_METHOD, Vec::<()>::new()).await?;
        self.session.clear();
        tracing::info!("Logged out");
        Ok(())
    }

    /// Ask the server for its API version string
    ///
    /// The call goes out without a token, as documented for the method. Some
    /// servers nevertheless answer that with "Invalid params."; in that case
    /// the call is repeated once with the token.
    pub async fn fetch_version(&mut self) -> Result<String> {
        let first: Result<String> = {
            let anonymous = self.suspend_auth();
            anonymous.call_typed(VERSION_METHOD, Params::new()).await
        };

        match first {
            Err(Error::Api(e)) if e.is_invalid_params() => {
                tracing::warn!(error = %e, "Version request rejected without auth, retrying with token");
                self.call_typed(VERSION_METHOD, Params::new()).await
            }
            other => other,
        }
    }

    /// Fetch and parse the server version; run once by the builder
    pub(crate) async fn negotiate_version(&mut self) -> Result<()> {
        let raw = self.fetch_version().await?;
        self.version = ApiVersion::parse(&raw)?;
        self.version_string = raw;
        tracing::info!(
            version = %self.version_string,
            encoded = self.version.as_i64(),
            "Negotiated API version"
        );
        Ok(())
    }
}
