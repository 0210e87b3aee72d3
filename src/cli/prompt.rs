//! Prompts for controller credentials that were not supplied up front.

use std::io;

use color_eyre::eyre::{bail, Result};
use crossterm::tty::IsTty;
use dialoguer::{Input, Password};

use crate::apic::SessionSettings;
use crate::config::ControllerSettings;

/// A credential value that can be prompted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Url,
    Login,
    Password,
}

impl Field {
    fn label(self) -> &'static str {
        match self {
            Self::Url => "APIC URL",
            Self::Login => "APIC login",
            Self::Password => "APIC password",
        }
    }

    fn flag(self) -> &'static str {
        match self {
            Self::Url => "--url / APIC_URL",
            Self::Login => "--login / APIC_LOGIN",
            Self::Password => "--password / APIC_PASSWORD",
        }
    }
}

/// Fill missing credentials, prompting on a terminal.
pub fn complete(settings: ControllerSettings) -> Result<SessionSettings> {
    let interactive = io::stdin().is_tty();
    complete_with(settings, |field| {
        if !interactive {
            bail!("{} is required: pass {} or set it in the config file", field.label(), field.flag());
        }
        let value = match field {
            Field::Password => Password::new().with_prompt(field.label()).interact()?,
            _ => Input::<String>::new().with_prompt(field.label()).interact_text()?,
        };
        Ok(value)
    })
}

/// Fill missing credentials through `ask`.
pub fn complete_with<F>(settings: ControllerSettings, mut ask: F) -> Result<SessionSettings>
where
    F: FnMut(Field) -> Result<String>,
{
    let url = match settings.url {
        Some(url) => url,
        None => ask(Field::Url)?.trim().trim_end_matches('/').to_string(),
    };
    let login = match settings.login {
        Some(login) => login,
        None => ask(Field::Login)?.trim().to_string(),
    };
    let password = match settings.password {
        Some(password) => password,
        None => ask(Field::Password)?,
    };

    Ok(SessionSettings {
        url,
        login,
        password,
        verify_tls: settings.verify_tls,
        timeout: settings.timeout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn settings(url: Option<&str>, login: Option<&str>, password: Option<&str>) -> ControllerSettings {
        ControllerSettings {
            url: url.map(str::to_string),
            login: login.map(str::to_string),
            password: password.map(str::to_string),
            verify_tls: false,
            timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn test_nothing_missing_never_asks() {
        let resolved = complete_with(
            settings(Some("https://apic"), Some("admin"), Some("pw")),
            |field| panic!("unexpected prompt for {field:?}"),
        )
        .unwrap();
        assert_eq!(resolved.url, "https://apic");
        assert_eq!(resolved.password, "pw");
    }

    #[test]
    fn test_asks_only_for_missing_fields() {
        let mut asked = Vec::new();
        let resolved = complete_with(settings(Some("https://apic"), None, None), |field| {
            asked.push(field);
            Ok(match field {
                Field::Login => " admin ".to_string(),
                _ => "pw".to_string(),
            })
        })
        .unwrap();
        assert_eq!(asked, vec![Field::Login, Field::Password]);
        assert_eq!(resolved.login, "admin");
    }

    #[test]
    fn test_prompted_url_is_trimmed() {
        let resolved = complete_with(settings(None, Some("admin"), Some("pw")), |_| {
            Ok("https://apic/ ".to_string())
        })
        .unwrap();
        assert_eq!(resolved.url, "https://apic");
    }

    #[test]
    fn test_prompt_error_propagates() {
        let result = complete_with(settings(None, None, None), |field| {
            bail!("{} is required", field.label())
        });
        assert_eq!(result.unwrap_err().to_string(), "APIC URL is required");
    }
}
