//! Secrets read from the process environment.
//!
//! Values are wrapped in [`SecretString`] as soon as they are read, so they
//! never show up in `Debug` output or logs.

use secrecy::SecretString;

use crate::domain::error::StockSageError;

pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const NEWS_API_KEY: &str = "NEWS_API_KEY";
pub const EMAIL_SENDER: &str = "EMAIL_SENDER";
pub const EMAIL_PASSWORD: &str = "EMAIL_PASSWORD";
pub const EMAIL_RECEIVER: &str = "EMAIL_RECEIVER";

#[derive(Debug)]
pub struct EmailCredentials {
    pub sender: String,
    pub password: SecretString,
    pub receiver: String,
}

#[derive(Debug)]
pub struct Credentials {
    pub gemini_api_key: SecretString,
    /// Present when news lookups are enabled.
    pub news_api_key: Option<SecretString>,
    /// Present when email alerts are enabled.
    pub email: Option<EmailCredentials>,
}

impl Credentials {
    pub fn from_env(news_enabled: bool, email_enabled: bool) -> Result<Self, StockSageError> {
        Self::from_lookup(|name| std::env::var(name).ok(), news_enabled, email_enabled)
    }

    /// Resolve credentials through `lookup`. Blank values count as missing.
    pub fn from_lookup<F>(
        lookup: F,
        news_enabled: bool,
        email_enabled: bool,
    ) -> Result<Self, StockSageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| -> Result<String, StockSageError> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| StockSageError::MissingCredential {
                    name: name.to_string(),
                })
        };

        let gemini_api_key = SecretString::new(require(GEMINI_API_KEY)?.into());

        let news_api_key = if news_enabled {
            Some(SecretString::new(require(NEWS_API_KEY)?.into()))
        } else {
            None
        };

        let email = if email_enabled {
            Some(EmailCredentials {
                sender: require(EMAIL_SENDER)?,
                password: SecretString::new(require(EMAIL_PASSWORD)?.into()),
                receiver: require(EMAIL_RECEIVER)?,
            })
        } else {
            None
        };

        Ok(Self {
            gemini_api_key,
            news_api_key,
            email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn missing_name(err: StockSageError) -> String {
        match err {
            StockSageError::MissingCredential { name } => name,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn all_credentials_present() {
        let vars = env(&[
            (GEMINI_API_KEY, "g-key"),
            (NEWS_API_KEY, "n-key"),
            (EMAIL_SENDER, "bot@example.com"),
            (EMAIL_PASSWORD, "app-password"),
            (EMAIL_RECEIVER, "me@example.com"),
        ]);
        let creds = Credentials::from_lookup(|k| vars.get(k).cloned(), true, true).unwrap();

        assert_eq!(creds.gemini_api_key.expose_secret(), "g-key");
        assert_eq!(creds.news_api_key.unwrap().expose_secret(), "n-key");
        let email = creds.email.unwrap();
        assert_eq!(email.sender, "bot@example.com");
        assert_eq!(email.receiver, "me@example.com");
        assert_eq!(email.password.expose_secret(), "app-password");
    }

    #[test]
    fn gemini_key_always_required() {
        let vars = env(&[]);
        let err = Credentials::from_lookup(|k| vars.get(k).cloned(), false, false).unwrap_err();
        assert_eq!(missing_name(err), GEMINI_API_KEY);
    }

    #[test]
    fn disabled_features_need_no_credentials() {
        let vars = env(&[(GEMINI_API_KEY, "g-key")]);
        let creds = Credentials::from_lookup(|k| vars.get(k).cloned(), false, false).unwrap();
        assert!(creds.news_api_key.is_none());
        assert!(creds.email.is_none());
    }

    #[test]
    fn news_key_required_when_enabled() {
        let vars = env(&[(GEMINI_API_KEY, "g-key")]);
        let err = Credentials::from_lookup(|k| vars.get(k).cloned(), true, false).unwrap_err();
        assert_eq!(missing_name(err), NEWS_API_KEY);
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let vars = env(&[
            (GEMINI_API_KEY, "g-key"),
            (EMAIL_SENDER, "bot@example.com"),
            (EMAIL_PASSWORD, "   "),
            (EMAIL_RECEIVER, "me@example.com"),
        ]);
        let err = Credentials::from_lookup(|k| vars.get(k).cloned(), false, true).unwrap_err();
        assert_eq!(missing_name(err), EMAIL_PASSWORD);
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let vars = env(&[(GEMINI_API_KEY, "super-secret-key")]);
        let creds = Credentials::from_lookup(|k| vars.get(k).cloned(), false, false).unwrap();
        assert!(!format!("{:?}", creds).contains("super-secret-key"));
    }
}
