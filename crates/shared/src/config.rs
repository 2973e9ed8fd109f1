use anyhow::Result;
use std::env;

use crate::resolver::DEFAULT_HOSTILE_DOMAINS;

pub const DEFAULT_BLOG_URL: &str = "http://ritholtz.com/";
pub const DEFAULT_POST_LINK_SELECTOR: &str = ".post-title-link";
pub const DEFAULT_ARTICLE_BODY_SELECTOR: &str = ".entry-content";
pub const DEFAULT_MAILGUN_API_BASE: &str = "https://api.mailgun.net";

const MAILGUN_VARS: [&str; 3] = ["MAILGUN_SANDBOX_ID", "MAILGUN_API_KEY", "EMAIL_ADDRESS"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailgunConfig {
    pub sandbox_id: String,
    pub api_key: String,
    pub email_address: String,
    pub email_name: Option<String>,
    pub api_base: String,
}

/// Where a run's result goes. Chosen once at startup and passed down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    Local,
    Mailgun(MailgunConfig),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub blog_url: String,
    pub post_url: Option<String>,
    pub hostile_domains: Vec<String>,
    pub post_link_selector: String,
    pub article_body_selector: String,
    pub mailgun: Option<MailgunConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blog_url: DEFAULT_BLOG_URL.to_string(),
            post_url: None,
            hostile_domains: DEFAULT_HOSTILE_DOMAINS.iter().map(|d| d.to_string()).collect(),
            post_link_selector: DEFAULT_POST_LINK_SELECTOR.to_string(),
            article_body_selector: DEFAULT_ARTICLE_BODY_SELECTOR.to_string(),
            mailgun: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Try to load .env from multiple locations
        Self::try_load_dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let hostile_domains = match get("HOSTILE_DOMAINS") {
            Some(list) => list
                .split(',')
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect(),
            None => defaults.hostile_domains,
        };

        let present: Vec<&str> = MAILGUN_VARS.iter().copied().filter(|&k| get(k).is_some()).collect();
        let mailgun = match present.len() {
            0 => None,
            n if n == MAILGUN_VARS.len() => Some(MailgunConfig {
                sandbox_id: get("MAILGUN_SANDBOX_ID").unwrap_or_default(),
                api_key: get("MAILGUN_API_KEY").unwrap_or_default(),
                email_address: get("EMAIL_ADDRESS").unwrap_or_default(),
                email_name: get("EMAIL_NAME"),
                api_base: get("MAILGUN_API_BASE")
                    .unwrap_or_else(|| DEFAULT_MAILGUN_API_BASE.to_string()),
            }),
            _ => {
                let missing: Vec<&str> = MAILGUN_VARS
                    .iter()
                    .copied()
                    .filter(|k| !present.contains(k))
                    .collect();
                anyhow::bail!(
                    "Incomplete Mailgun settings, missing: {}.\n\n\
                    Set all of MAILGUN_SANDBOX_ID, MAILGUN_API_KEY and EMAIL_ADDRESS to send email,\n\
                    or none of them to print the reading list locally.",
                    missing.join(", ")
                );
            }
        };

        Ok(Self {
            blog_url: get("BLOG_URL").unwrap_or(defaults.blog_url),
            post_url: get("POST_URL"),
            hostile_domains,
            post_link_selector: get("POST_LINK_SELECTOR").unwrap_or(defaults.post_link_selector),
            article_body_selector: get("ARTICLE_BODY_SELECTOR")
                .unwrap_or(defaults.article_body_selector),
            mailgun,
        })
    }

    /// Local unless email is configured and not overridden.
    pub fn run_mode(&self, force_local: bool) -> RunMode {
        match (&self.mailgun, force_local) {
            (Some(mailgun), false) => RunMode::Mailgun(mailgun.clone()),
            _ => RunMode::Local,
        }
    }

    fn try_load_dotenv() {
        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/big-picture-reads/.env
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("big-picture-reads").join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                let _ = dotenvy::from_path(&home_path);
            }
        }
    }
}
