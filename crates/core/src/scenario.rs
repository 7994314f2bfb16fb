//! Scenarios and the state they carry between steps.
//!
//! A scenario is plain `async` code: every step is awaited before the next one
//! starts, so a value captured in [`Aliases`] is always written before any later
//! step reads it. Nothing inside a scenario runs concurrently.
use std::fmt;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::client::{ApiClient, ApiResponse};
use crate::error::HarnessError;
use crate::fixtures::{self, ArticleOverrides, Credentials, FixtureFactory, NewArticle, NewUser, UserOverrides};
use crate::store::Aliases;

pub type ScenarioResult = Result<(), HarnessError>;

pub type ScenarioFn = for<'a> fn(&'a mut ScenarioContext) -> BoxFuture<'a, ScenarioResult>;

/// A named test case.
#[derive(Clone, Copy)]
pub struct Scenario {
    /// Path-like location used for selection, e.g. `api/user`.
    pub file: &'static str,
    /// The endpoint or feature being exercised, e.g. `@POST login`.
    pub group: &'static str,
    /// The expected outcome, e.g. `KO @401 : incorrect password`.
    pub name: &'static str,
    pub run: ScenarioFn,
}

impl Scenario {
    pub fn id(&self) -> String {
        format!("{} › {} › {}", self.file, self.group, self.name)
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("file", &self.file)
            .field("group", &self.group)
            .field("name", &self.name)
            .finish()
    }
}

/// Everything a running scenario can reach.
///
/// The runner builds a fresh context for each scenario.
#[derive(Debug)]
pub struct ScenarioContext {
    pub client: ApiClient,
    pub fixtures: FixtureFactory,
    pub aliases: Aliases,
}

impl ScenarioContext {
    pub fn new(client: ApiClient, fixtures: FixtureFactory) -> Self {
        Self {
            client,
            fixtures,
            aliases: Aliases::new(),
        }
    }

    /// Generates a user from `overrides` and registers it.
    pub async fn register_user(
        &self,
        overrides: UserOverrides,
    ) -> Result<(NewUser, ApiResponse), HarnessError> {
        let user = self.fixtures.user(overrides);
        let response = fixtures::register_user(&self.client, &user).await?;
        Ok((user, response))
    }

    /// Registers a fresh user, requiring 201, and captures its `user` object
    /// under `alias`.
    pub async fn arrange_user(&mut self, alias: &str) -> Result<NewUser, HarnessError> {
        let (user, response) = self.register_user(UserOverrides::default()).await?;
        response.expect_status(201)?;
        let registered = response.json("/user").cloned().unwrap_or(Value::Null);
        self.aliases.capture(alias, registered)?;
        Ok(user)
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<ApiResponse, HarnessError> {
        fixtures::login(&self.client, credentials).await
    }

    /// Generates an article from `overrides` and creates it as `token`'s owner.
    pub async fn create_article(
        &self,
        overrides: ArticleOverrides,
        token: &str,
    ) -> Result<(NewArticle, ApiResponse), HarnessError> {
        let article = self.fixtures.article(overrides);
        let response = fixtures::create_article(&self.client, &article, token).await?;
        Ok((article, response))
    }

    pub async fn post(
        &self,
        path: &str,
        body: &Value,
        token: Option<&str>,
    ) -> Result<ApiResponse, HarnessError> {
        self.client.post(path, body, token).await
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<ApiResponse, HarnessError> {
        self.client.get(path, token).await
    }

    pub async fn put(
        &self,
        path: &str,
        body: &Value,
        token: Option<&str>,
    ) -> Result<ApiResponse, HarnessError> {
        self.client.put(path, body, token).await
    }

    pub async fn delete(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<ApiResponse, HarnessError> {
        self.client.delete(path, token).await
    }

    /// Reads a captured string, e.g. a token.
    pub fn alias(&self, name: &str) -> Result<String, HarnessError> {
        self.aliases.str(name).map(str::to_string)
    }
}
