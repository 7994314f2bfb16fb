use futures::future::BoxFuture;
use serde_json::{Value, json};

use super::{DEFAULT_USER_IMAGE, MISSING_CREDENTIALS, RegisteredUser};
use crate::error::HarnessError;
use crate::fixtures::{ArticleOverrides, UserOverrides};
use crate::scenario::{Scenario, ScenarioContext, ScenarioFn, ScenarioResult};

const FILE: &str = "e2e/profile";

fn scenario(group: &'static str, name: &'static str, run: ScenarioFn) -> Scenario {
    Scenario {
        file: FILE,
        group,
        name,
        run,
    }
}

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        scenario("@GET profile", "OK @200", profile_ok),
        scenario("@GET profile", "KO @404", profile_not_found),
        scenario("@POST follow user", "OK @200", follow_ok),
        scenario("@POST follow user", "KO @401", follow_unauthorized),
        scenario("@POST follow user", "KO @401 : unknown profile", follow_unknown_unauthorized),
        scenario("@DELETE unfollow user", "OK @200", unfollow_ok),
        scenario("@DELETE unfollow user", "KO @401", unfollow_unauthorized),
        scenario(
            "@DELETE unfollow user",
            "KO @401 : unknown profile",
            unfollow_unknown_unauthorized,
        ),
    ]
}

fn follow_path(username: &str) -> String {
    format!("/api/profiles/{username}/follow")
}

/// Registers a second user, suffixed `-2`, and captures its token as
/// `followerToken`.
async fn arrange_follower(ctx: &mut ScenarioContext) -> Result<(), HarnessError> {
    let suffixed = |value: String| format!("{value}-2");
    let overrides = UserOverrides::default()
        .username(suffixed(ctx.fixtures.unique()))
        .email(suffixed(ctx.fixtures.unique()))
        .password(suffixed(ctx.fixtures.unique()));
    let (_, response) = ctx.register_user(overrides).await?;
    let token = response.expect_status(201)?.require_str("/user/token")?;
    ctx.aliases.capture("followerToken", token)
}

fn profile_ok(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        // Given
        ctx.arrange_user("user").await?;

        // When
        let user: RegisteredUser = ctx.aliases.get("user")?;
        let response = ctx
            .get(&format!("/api/profiles/{}", user.username), None)
            .await?;

        // Then
        response
            .expect_status(200)?
            .expect_eq("/profile/username", user.username.as_str())?
            .expect_eq("/profile/bio", Value::Null)?
            .expect_eq("/profile/image", DEFAULT_USER_IMAGE)?
            .expect_eq("/profile/following", false)?;
        Ok(())
    })
}

fn profile_not_found(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        let unknown = format!("{}-unknown", ctx.fixtures.unique());

        let response = ctx.get(&format!("/api/profiles/{unknown}"), None).await?;

        response.expect_status(404)?;
        Ok(())
    })
}

fn follow_ok(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        // Given
        ctx.arrange_user("user").await?;
        let author: RegisteredUser = ctx.aliases.get("user")?;
        let (article, created) = ctx
            .create_article(ArticleOverrides::default(), &author.token)
            .await?;
        created.expect_status(201)?;
        arrange_follower(ctx).await?;

        // When
        let follower_token = ctx.alias("followerToken")?;
        let response = ctx
            .post(&follow_path(&author.username), &json!({}), Some(&follower_token))
            .await?;

        // Then
        response
            .expect_status(200)?
            .expect_eq("/profile/following", true)?
            .expect_eq("/profile/username", author.username.as_str())?;

        let profile = ctx
            .get(&format!("/api/profiles/{}", author.username), Some(&follower_token))
            .await?;
        profile
            .expect_status(200)?
            .expect_eq("/profile/following", true)?;

        let feed = ctx.get("/api/articles/feed", Some(&follower_token)).await?;
        feed.expect_status(200)?
            .expect_eq("/articlesCount", 1)?
            .expect_len("/articles", 1)?
            .expect_eq("/articles/0/title", article.title.as_str())?
            .expect_eq("/articles/0/description", article.description.as_str())?
            .expect_eq("/articles/0/body", article.body.as_str())?
            .expect_eq("/articles/0/tagList", article.tag_list.clone())?
            .expect_eq("/articles/0/author/username", author.username.as_str())?;
        Ok(())
    })
}

fn follow_unauthorized(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        ctx.arrange_user("user").await?;

        let user: RegisteredUser = ctx.aliases.get("user")?;
        let response = ctx
            .post(&follow_path(&user.username), &json!({}), None)
            .await?;

        response
            .expect_status(401)?
            .expect_message(MISSING_CREDENTIALS)?;
        Ok(())
    })
}

fn follow_unknown_unauthorized(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        let unknown = format!("{}-unknown", ctx.fixtures.unique());

        let response = ctx.post(&follow_path(&unknown), &json!({}), None).await?;

        response
            .expect_status(401)?
            .expect_message(MISSING_CREDENTIALS)?;
        Ok(())
    })
}

fn unfollow_ok(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        // Given
        ctx.arrange_user("user").await?;
        arrange_follower(ctx).await?;
        let user: RegisteredUser = ctx.aliases.get("user")?;
        let follower_token = ctx.alias("followerToken")?;
        ctx.post(&follow_path(&user.username), &json!({}), Some(&follower_token))
            .await?
            .expect_status(200)?;

        // When
        let response = ctx
            .delete(&follow_path(&user.username), Some(&follower_token))
            .await?;

        // Then
        response
            .expect_status(200)?
            .expect_eq("/profile/following", false)?
            .expect_eq("/profile/username", user.username.as_str())?;

        let profile = ctx
            .get(&format!("/api/profiles/{}", user.username), Some(&follower_token))
            .await?;
        profile
            .expect_status(200)?
            .expect_eq("/profile/following", false)?;
        Ok(())
    })
}

fn unfollow_unauthorized(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        ctx.arrange_user("user").await?;

        let user: RegisteredUser = ctx.aliases.get("user")?;
        let response = ctx.delete(&follow_path(&user.username), None).await?;

        response
            .expect_status(401)?
            .expect_message(MISSING_CREDENTIALS)?;
        Ok(())
    })
}

fn unfollow_unknown_unauthorized(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        let unknown = format!("{}-unknown", ctx.fixtures.unique());

        let response = ctx.delete(&follow_path(&unknown), None).await?;

        response
            .expect_status(401)?
            .expect_message(MISSING_CREDENTIALS)?;
        Ok(())
    })
}
