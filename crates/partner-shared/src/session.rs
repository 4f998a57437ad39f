use secrecy::{ExposeSecret as _, SecretString};
use std::fmt::Debug;

/// Credential issued by the backend on login
///
/// The token is opaque to the client and is attached unchanged to every
/// request made after login
#[derive(Clone)]
pub struct Session {
    pub username: String,
    pub company_db: String,
    token: SecretString,
}

impl Session {
    pub fn new(username: String, company_db: String, token: SecretString) -> Self {
        Self {
            username,
            company_db,
            token,
        }
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    /// Builds the token from the `Set-Cookie` header values of the login
    /// response. Only the `name=value` part of each cookie is kept.
    ///
    /// Returns `None` if there are no cookies
    pub fn token_from_set_cookies<'a, I>(set_cookies: I) -> Option<SecretString>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let pairs: Vec<&str> = set_cookies
            .into_iter()
            .filter_map(|cookie| cookie.split(';').next())
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .collect();
        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; ").into())
        }
    }
}

impl Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("company_db", &self.company_db)
            .field("has_token", &!self.token.expose_secret().is_empty())
            .finish()
    }
}
