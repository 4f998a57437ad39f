use std::borrow::Cow;

use reqwest::{Method, Url};

use crate::business_partner::CardCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    pub path: Cow<'static, str>,
    pub method: Method,
}

impl PathSpec {
    pub const fn get(path: &'static str) -> Self {
        Self {
            path: Cow::Borrowed(path),
            method: Method::GET,
        }
    }

    pub const fn post(path: &'static str) -> Self {
        Self {
            path: Cow::Borrowed(path),
            method: Method::POST,
        }
    }

    pub const fn patch(path: &'static str) -> Self {
        Self {
            path: Cow::Borrowed(path),
            method: Method::PATCH,
        }
    }

    pub const fn delete(path: &'static str) -> Self {
        Self {
            path: Cow::Borrowed(path),
            method: Method::DELETE,
        }
    }

    /// Addresses a single entity of the collection, `/Collection('{key}')`
    ///
    /// The key is percent-encoded so characters such as `#`, `?` or `/`
    /// stay part of the key
    pub fn with_key(&self, key: &CardCode) -> Self {
        let key_segment = encode_path_segment(&format!("('{}')", key.as_odata_key()));
        Self {
            path: Cow::Owned(format!("{}{key_segment}", self.path)),
            method: self.method.clone(),
        }
    }
}

fn encode_path_segment(segment: &str) -> String {
    let mut url = Url::parse("http://localhost/").expect("static url is valid");
    url.path_segments_mut()
        .expect("http urls can have path segments")
        .push(segment);
    url.path().trim_start_matches('/').to_string()
}
