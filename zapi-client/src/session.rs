//! Session token handling
//!
//! The token returned by `user.login` is attached to every later call in two
//! places: the `Authorization: Bearer` header and the envelope's `auth`
//! member. Older servers only read the envelope, newer ones read the header,
//! and from 7.2 on the envelope member is rejected outright, so it is left out
//! for those servers.
//!
//! Some calls have to go out without a token (`user.login`, and
//! `apiinfo.version` on most versions). [`SuspendedAuth`] clears the token for
//! the lifetime of a guard and puts it back when the guard is dropped, on
//! every exit path.

use crate::transport::OutboundRequest;
use crate::ZabbixClient;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use std::ops::Deref;
use zapi_core::{ApiVersion, Error, Params, RequestEnvelope, Result};

/// Current authentication state of a client
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: String,
}

impl Session {
    /// Create an unauthenticated session
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token, `None` when unauthenticated
    pub fn token(&self) -> Option<&str> {
        if self.token.is_empty() {
            None
        } else {
            Some(&self.token)
        }
    }

    /// Replace the token
    pub fn set(&mut self, token: impl Into<String>) {
        self.token = token.into();
    }

    /// Forget the token
    pub fn clear(&mut self) {
        self.token.clear();
    }

    fn take(&mut self) -> String {
        std::mem::take(&mut self.token)
    }

    /// Attach the token to an outgoing call
    ///
    /// Does nothing when unauthenticated, so the envelope keeps an empty
    /// `auth` (which the codec omits) and no header is added.
    pub(crate) fn attach_token(
        &self,
        envelope: &mut RequestEnvelope,
        request: &mut OutboundRequest,
        version: ApiVersion,
    ) -> Result<()> {
        if self.token.is_empty() {
            return Ok(());
        }

        let header = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|e| Error::Encode(format!("token is not a valid header value: {}", e)))?;
        request.headers.insert(AUTHORIZATION, header);

        if version < ApiVersion::V7_2 {
            envelope.auth = self.token.clone();
        }
        Ok(())
    }
}

/// Parameters for `user.login`
///
/// The user name key was renamed from `user` to `username` in 5.4.
pub fn login_params(version: ApiVersion, username: &str, password: &str) -> Params {
    let user_key = if version >= ApiVersion::V5_4 {
        "username"
    } else {
        "user"
    };

    let mut params = Params::new();
    params.insert(user_key.to_string(), username.into());
    params.insert("password".to_string(), password.into());
    params
}

/// A client borrowed with its token temporarily cleared
///
/// Calls made through the guard (it derefs to [`ZabbixClient`]) go out
/// unauthenticated. The previous token comes back when the guard is dropped.
///
/// ```rust,no_run
/// # async fn example(client: &mut zapi_client::ZabbixClient) -> zapi_core::Result<()> {
/// let version: String = {
///     let anonymous = client.suspend_auth();
///     anonymous.call_typed("apiinfo.version", zapi_core::Params::new()).await?
/// };
/// # Ok(())
/// # }
/// ```
pub struct SuspendedAuth<'a> {
    client: &'a mut ZabbixClient,
    saved: String,
}

impl<'a> SuspendedAuth<'a> {
    pub(crate) fn new(client: &'a mut ZabbixClient) -> Self {
        let saved = client.session.take();
        Self { client, saved }
    }
}

impl Deref for SuspendedAuth<'_> {
    type Target = ZabbixClient;

    fn deref(&self) -> &ZabbixClient {
        &*self.client
    }
}

impl Drop for SuspendedAuth<'_> {
    fn drop(&mut self) {
        self.client.session.set(std::mem::take(&mut self.saved));
    }
}
