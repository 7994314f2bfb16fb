//! Test data for scenario preconditions and the requests that create it.
//!
//! Every generated value is `<prefix><unix millis>-<random>`, computed afresh on
//! each call. The random part keeps two fixtures built in the same millisecond
//! apart.
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::client::{ApiClient, ApiResponse};
use crate::config::Config;
use crate::error::HarnessError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// Fields to force on a generated user. `None` keeps the generated value.
#[derive(Debug, Clone, Default)]
pub struct UserOverrides {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UserOverrides {
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub description: String,
    pub body: String,
    #[serde(rename = "tagList")]
    pub tag_list: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ArticleOverrides {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub tag_list: Option<Vec<String>>,
}

/// Builds uniquely named fixtures inside the configured namespace.
#[derive(Debug, Clone)]
pub struct FixtureFactory {
    prefix: String,
    email_domain: String,
}

impl FixtureFactory {
    pub fn new(prefix: impl Into<String>, email_domain: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            email_domain: email_domain.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.prefix.clone(), config.email_domain.clone())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn unique(&self) -> String {
        let random = Uuid::new_v4().simple().to_string();
        format!(
            "{}{}-{}",
            self.prefix,
            Utc::now().timestamp_millis(),
            &random[..8]
        )
    }

    /// Appends the configured domain when `email` has no `@`.
    ///
    /// Lets callers pass a bare token as the email. An empty string becomes
    /// `@<domain>`, which the API rejects as malformed.
    pub fn complete_email(&self, email: String) -> String {
        if email.contains('@') {
            email
        } else {
            format!("{email}@{}", self.email_domain)
        }
    }

    pub fn user(&self, overrides: UserOverrides) -> NewUser {
        let email = overrides
            .email
            .unwrap_or_else(|| format!("{}@{}", self.unique(), self.email_domain));
        NewUser {
            username: overrides.username.unwrap_or_else(|| self.unique()),
            email: self.complete_email(email),
            password: overrides.password.unwrap_or_else(|| self.unique()),
        }
    }

    pub fn article(&self, overrides: ArticleOverrides) -> NewArticle {
        NewArticle {
            title: overrides.title.unwrap_or_else(|| self.unique()),
            description: overrides.description.unwrap_or_else(|| self.unique()),
            body: overrides.body.unwrap_or_else(|| self.unique()),
            tag_list: overrides.tag_list.unwrap_or_else(|| vec![self.unique()]),
        }
    }
}

/// `POST /api/users`
#[instrument(skip(client, user), fields(username = %user.username))]
pub async fn register_user(
    client: &ApiClient,
    user: &NewUser,
) -> Result<ApiResponse, HarnessError> {
    client.post("/api/users", &json!({ "user": user }), None).await
}

/// `POST /api/users/login`
#[instrument(skip(client, credentials), fields(email = %credentials.email))]
pub async fn login(
    client: &ApiClient,
    credentials: &Credentials,
) -> Result<ApiResponse, HarnessError> {
    client
        .post("/api/users/login", &json!({ "user": credentials }), None)
        .await
}

/// `POST /api/articles`
#[instrument(skip(client, article, token), fields(title = %article.title))]
pub async fn create_article(
    client: &ApiClient,
    article: &NewArticle,
    token: &str,
) -> Result<ApiResponse, HarnessError> {
    client
        .post("/api/articles", &json!({ "article": article }), Some(token))
        .await
}
