//! Built-in scenarios, grouped by the file they are selected under.
mod article;
mod profile;
mod user;

use serde::Deserialize;

use crate::scenario::Scenario;

/// Image the API reports for users who never set one.
pub const DEFAULT_USER_IMAGE: &str = "https://api.realworld.io/images/smiley-cyrus.jpeg";

pub const MISSING_CREDENTIALS: &str = "missing authorization credentials";

/// The `user` object of a registration response, as captured by
/// [`crate::scenario::ScenarioContext::arrange_user`].
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RegisteredUser {
    pub username: String,
    pub token: String,
}

pub fn all() -> Vec<Scenario> {
    let mut scenarios = user::scenarios();
    scenarios.extend(profile::scenarios());
    scenarios.extend(article::scenarios());
    scenarios
}
