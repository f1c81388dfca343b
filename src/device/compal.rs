// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! HTTP session against the Compal CH7465LG web interface.
//!
//! The modem keeps a `sessionToken` cookie that rotates with every response
//! and has to be echoed back as the `token` form field of the next request.
//! After a successful login the `SID` cookie identifies the session.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{redirect, StatusCode};
use tracing::debug;
use url::Url;

use crate::device::traits::{DeviceClient, DeviceSession};
use crate::device::{DocumentId, SetterFunction};
use crate::error::ConnectivityError;

const LOGIN_PAGE_PATH: &str = "/common_page/login.html";
const GETTER_PATH: &str = "/xml/getter.xml";
const SETTER_PATH: &str = "/xml/setter.xml";
const ACCESS_DENIED_SUFFIX: &str = "common_page/Access-denied.html";
const LOGIN_SUCCESS_PREFIX: &str = "successful;SID=";
const SESSION_TOKEN_COOKIE: &str = "sessionToken";

#[derive(Debug, Clone)]
struct Endpoints {
    base: Url,
    login_page: Url,
    getter: Url,
    setter: Url,
}

impl Endpoints {
    fn new(address: &str) -> Result<Self, ConnectivityError> {
        let base = if address.starts_with("http://") || address.starts_with("https://") {
            address.to_string()
        } else {
            format!("http://{address}")
        };
        let invalid = |_| ConnectivityError::InvalidAddress(address.to_string());
        let base = Url::parse(&base).map_err(invalid)?;

        Ok(Self {
            login_page: base.join(LOGIN_PAGE_PATH).map_err(invalid)?,
            getter: base.join(GETTER_PATH).map_err(invalid)?,
            setter: base.join(SETTER_PATH).map_err(invalid)?,
            base,
        })
    }
}

/// Logs into the modem over HTTP.
#[derive(Debug, Clone)]
pub struct CompalClient {
    endpoints: Endpoints,
    password: String,
    timeout: Duration,
}

impl CompalClient {
    /// `address` is a host (`192.168.0.1`) or a full base URL.
    pub fn new(
        address: &str,
        password: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ConnectivityError> {
        Ok(Self {
            endpoints: Endpoints::new(address)?,
            password: password.into(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.endpoints.base
    }
}

#[async_trait]
impl DeviceClient for CompalClient {
    type Session = CompalSession;

    async fn open(&self) -> Result<CompalSession, ConnectivityError> {
        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            // the modem answers a rejected login with a redirect we need to see
            .redirect(redirect::Policy::none())
            .timeout(self.timeout)
            .connect_timeout(self.timeout)
            .build()
            .map_err(|e| ConnectivityError::from_reqwest(e, self.endpoints.base.as_str()))?;

        let session = CompalSession {
            http,
            jar,
            endpoints: self.endpoints.clone(),
        };
        session.request_session_token().await?;
        session.login(&self.password).await?;
        Ok(session)
    }
}

/// A logged-in session holding the modem's cookies.
pub struct CompalSession {
    http: reqwest::Client,
    jar: Arc<Jar>,
    endpoints: Endpoints,
}

impl CompalSession {
    /// Loading the login page makes the modem hand out the first session token.
    async fn request_session_token(&self) -> Result<(), ConnectivityError> {
        let url = &self.endpoints.login_page;
        debug!("Requesting session token from {url}");
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ConnectivityError::from_reqwest(e, url.as_str()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ConnectivityError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        // the body is irrelevant, only the cookie matters
        response
            .bytes()
            .await
            .map_err(|e| ConnectivityError::from_reqwest(e, url.as_str()))?;
        self.session_token().map(|_| ())
    }

    async fn login(&self, password: &str) -> Result<(), ConnectivityError> {
        let response = self
            .post_setter(
                SetterFunction::LOGIN,
                &[("Username", "NULL"), ("Password", password)],
            )
            .await?;

        let status = response.status();
        if status.is_redirection() {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            if location.ends_with(ACCESS_DENIED_SUFFIX) {
                return Err(ConnectivityError::AccessDenied);
            }
        }
        if status != StatusCode::OK {
            return Err(ConnectivityError::UnexpectedStatus {
                url: self.endpoints.setter.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ConnectivityError::from_reqwest(e, self.endpoints.setter.as_str()))?;
        match body.strip_prefix(LOGIN_SUCCESS_PREFIX) {
            Some(sid) => {
                self.jar
                    .add_cookie_str(&format!("SID={}; Path=/", sid.trim()), &self.endpoints.base);
                debug!("Logged in at {}", self.endpoints.base);
                Ok(())
            }
            None => Err(ConnectivityError::LoginRejected(body)),
        }
    }

    /// The current value of the rotating `sessionToken` cookie.
    fn session_token(&self) -> Result<String, ConnectivityError> {
        let header = self
            .jar
            .cookies(&self.endpoints.base)
            .ok_or(ConnectivityError::MissingSessionToken)?;
        let cookies = header
            .to_str()
            .map_err(|_| ConnectivityError::MissingSessionToken)?;

        cookies
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_TOKEN_COOKIE)
            .map(|(_, value)| value.to_string())
            .ok_or(ConnectivityError::MissingSessionToken)
    }

    async fn post_setter(
        &self,
        function: u16,
        fields: &[(&str, &str)],
    ) -> Result<reqwest::Response, ConnectivityError> {
        let url = &self.endpoints.setter;
        // the token has to be the first field
        let mut form = vec![
            ("token".to_string(), self.session_token()?),
            ("fun".to_string(), function.to_string()),
        ];
        form.extend(fields.iter().map(|(k, v)| (k.to_string(), v.to_string())));

        self.http
            .post(url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| ConnectivityError::from_reqwest(e, url.as_str()))
    }
}

#[async_trait]
impl DeviceSession for CompalSession {
    async fn fetch(&mut self, function: DocumentId) -> Result<Vec<u8>, ConnectivityError> {
        let url = &self.endpoints.getter;
        let form = [
            ("token", self.session_token()?),
            ("fun", function.to_string()),
        ];

        let response = self
            .http
            .post(url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| ConnectivityError::from_reqwest(e, url.as_str()))?;

        if !response.status().is_success() {
            return Err(ConnectivityError::UnexpectedStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ConnectivityError::from_reqwest(e, url.as_str()))?;
        Ok(body.to_vec())
    }

    async fn close(&mut self) -> Result<(), ConnectivityError> {
        let response = self.post_setter(SetterFunction::LOGOUT, &[]).await?;
        if !response.status().is_success() {
            return Err(ConnectivityError::UnexpectedStatus {
                url: self.endpoints.setter.to_string(),
                status: response.status().as_u16(),
            });
        }
        debug!("Logged out from {}", self.endpoints.base);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_from_bare_host() {
        let endpoints = Endpoints::new("192.168.0.1").unwrap();
        assert_eq!(endpoints.base.as_str(), "http://192.168.0.1/");
        assert_eq!(endpoints.getter.as_str(), "http://192.168.0.1/xml/getter.xml");
        assert_eq!(endpoints.setter.as_str(), "http://192.168.0.1/xml/setter.xml");
        assert_eq!(
            endpoints.login_page.as_str(),
            "http://192.168.0.1/common_page/login.html"
        );
    }

    #[test]
    fn test_endpoints_from_url_with_port() {
        let endpoints = Endpoints::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(
            endpoints.getter.as_str(),
            "http://127.0.0.1:8080/xml/getter.xml"
        );
    }

    #[test]
    fn test_invalid_address() {
        let err = CompalClient::new("http://[::1", "secret", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ConnectivityError::InvalidAddress(_)));
    }
}
