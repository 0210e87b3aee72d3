//! APIC session lifecycle over blocking HTTP.
//!
//! The APIC hands out an `APIC-cookie` token on login; the client's cookie
//! store replays it on every following request until logout.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use url::Url;

use super::{ApicError, ImData};
use crate::constants;
use crate::model::ManagedObject;

/// Connection parameters for one APIC session.
#[derive(Clone)]
pub struct SessionSettings {
    pub url: String,
    pub login: String,
    pub password: String,
    pub verify_tls: bool,
    pub timeout: Duration,
}

impl std::fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("url", &self.url)
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("verify_tls", &self.verify_tls)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// An authenticated (or about to be) APIC REST session.
pub struct Session {
    base_url: String,
    login: String,
    password: String,
    client: Client,
    logged_in: bool,
}

impl Session {
    /// Build the HTTP client. No request is sent until [`Session::login`].
    pub fn new(settings: SessionSettings) -> Result<Self, ApicError> {
        let parsed =
            Url::parse(&settings.url).map_err(|_| ApicError::InvalidUrl(settings.url.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApicError::InvalidUrl(settings.url));
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .cookie_store(true)
            .danger_accept_invalid_certs(!settings.verify_tls)
            .user_agent(format!("{}/{}", constants::APP_NAME, constants::APP_VERSION))
            .build()
            .map_err(ApicError::Client)?;

        Ok(Self {
            base_url: settings.url.trim_end_matches('/').to_string(),
            login: settings.login,
            password: settings.password,
            client,
            logged_in: false,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<ImData, ApicError> {
        let mut request = self.client.request(method.clone(), self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().map_err(|source| ApicError::Transport {
            path: path.to_string(),
            source,
        })?;
        let status = response.status();
        debug!(%method, path, %status, "APIC request");

        let text = response.text().map_err(|source| ApicError::Transport {
            path: path.to_string(),
            source,
        })?;
        let parsed = if text.trim().is_empty() {
            Ok(ImData::default())
        } else {
            serde_json::from_str::<ImData>(&text)
        };

        if !status.is_success() {
            let apic_error = parsed.ok().and_then(|data| {
                let text = data.error_text()?.to_string();
                Some((data.error_code().map(str::to_string), text))
            });
            let (code, detail) = apic_error.unwrap_or((None, text));
            if let Some(code) = &code {
                debug!(path, code = %code, "APIC error object");
            }
            return Err(ApicError::Status {
                status,
                path: path.to_string(),
                code,
                text: detail,
            });
        }

        parsed.map_err(|source| ApicError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// Authenticate with `aaaLogin`.
    pub fn login(&mut self) -> Result<(), ApicError> {
        let body = json!({
            "aaaUser": {"attributes": {"name": self.login, "pwd": self.password}}
        });

        let data = self
            .send(Method::POST, constants::API_LOGIN, Some(&body))
            .map_err(|e| match e {
                ApicError::Status { text, .. } => ApicError::Login {
                    user: self.login.clone(),
                    reason: text,
                },
                other => other,
            })?;

        if let Some(reason) = data.error_text() {
            return Err(ApicError::Login {
                user: self.login.clone(),
                reason: reason.to_string(),
            });
        }

        self.logged_in = true;
        info!(url = %self.base_url, user = %self.login, "logged in to APIC");
        Ok(())
    }

    /// GET a path such as a [`super::ClassQuery`] path.
    pub fn get(&self, path: &str) -> Result<ImData, ApicError> {
        self.send(Method::GET, path, None)
    }

    /// POST a JSON document.
    pub fn push(&self, path: &str, body: &Value) -> Result<ImData, ApicError> {
        self.send(Method::POST, path, Some(body))
    }

    /// POST a managed-object tree.
    pub fn push_mo(&self, path: &str, mo: &ManagedObject) -> Result<ImData, ApicError> {
        self.push(path, &mo.to_json())
    }

    /// Log out. Failures are logged, not returned.
    pub fn close(self) {
        if !self.logged_in {
            return;
        }
        let body = json!({"aaaUser": {"attributes": {"name": self.login}}});
        match self.send(Method::POST, constants::API_LOGOUT, Some(&body)) {
            Ok(_) => debug!(user = %self.login, "logged out of APIC"),
            Err(e) => warn!("APIC logout failed: {e}"),
        }
    }
}
