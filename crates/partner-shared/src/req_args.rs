//! This module stores the expected format of the arguments for the requests

use secrecy::{ExposeSecret, SecretString};
use std::fmt::Debug;

#[derive(serde::Deserialize, Clone)]
pub struct LoginReqArgs {
    pub username: String,
    pub password: SecretString,
    /// The company database (tenant) to open the session against
    pub company_db: String,
}

impl LoginReqArgs {
    pub fn new<S: Into<String>, C: Into<String>>(
        username: S,
        password: SecretString,
        company_db: C,
    ) -> Self {
        Self {
            username: username.into(),
            password,
            company_db: company_db.into(),
        }
    }

    pub fn username(mut self, username: String) -> Self {
        self.username = username;
        self
    }

    pub fn password(mut self, password: SecretString) -> Self {
        self.password = password;
        self
    }

    pub fn company_db(mut self, company_db: String) -> Self {
        self.company_db = company_db;
        self
    }

    /// Body of the login request as the Service Layer expects it
    pub fn to_login_body(&self) -> serde_json::Value {
        serde_json::json!({
            "CompanyDB": self.company_db,
            "UserName": self.username,
            "Password": self.password.expose_secret(),
        })
    }
}

impl Debug for LoginReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginReqArgs")
            .field("username", &self.username)
            .field("has_password", &!self.password.expose_secret().is_empty())
            .field("company_db", &self.company_db)
            .finish()
    }
}
