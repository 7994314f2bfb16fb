use futures::future::BoxFuture;
use serde_json::json;

use super::{MISSING_CREDENTIALS, RegisteredUser};
use crate::fixtures::{ArticleOverrides, create_article};
use crate::scenario::{Scenario, ScenarioContext, ScenarioFn, ScenarioResult};

const FILE: &str = "api/article";

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
        scenario("@POST article", "OK @201", create_ok),
        scenario("@POST article", "KO @401", create_unauthorized),
        scenario("@POST article", "KO @422 : empty title", create_empty_title),
        scenario("@GET article", "OK @200", retrieve_ok),
        scenario("@GET article", "KO @404", retrieve_not_found),
        scenario("@POST favorite article", "OK @200", favorite_ok),
        scenario("@DELETE article", "OK @204", destroy_ok),
        scenario("@DELETE article", "KO @403 : not the author", destroy_forbidden),
    ]
}

fn article_path(slug: &str) -> String {
    format!("/api/articles/{slug}")
}

fn create_ok(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        // Given
        ctx.arrange_user("user").await?;
        let author: RegisteredUser = ctx.aliases.get("user")?;
        let article = ctx.fixtures.article(ArticleOverrides::default());

        // When
        let response = create_article(&ctx.client, &article, &author.token).await?;

        // Then
        response
            .expect_status(201)?
            .expect_present("/article/slug")?
            .expect_eq("/article/title", article.title.as_str())?
            .expect_eq("/article/description", article.description.as_str())?
            .expect_eq("/article/body", article.body.as_str())?
            .expect_eq("/article/tagList", article.tag_list.clone())?
            .expect_eq("/article/favorited", false)?
            .expect_eq("/article/favoritesCount", 0)?
            .expect_eq("/article/author/username", author.username.as_str())?;
        Ok(())
    })
}

fn create_unauthorized(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        let article = ctx.fixtures.article(ArticleOverrides::default());

        let response = ctx
            .post("/api/articles", &json!({ "article": article }), None)
            .await?;

        response
            .expect_status(401)?
            .expect_message(MISSING_CREDENTIALS)?;
        Ok(())
    })
}

fn create_empty_title(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        ctx.arrange_user("user").await?;
        let author: RegisteredUser = ctx.aliases.get("user")?;

        let (_, response) = ctx
            .create_article(
                ArticleOverrides {
                    title: Some(String::new()),
                    ..Default::default()
                },
                &author.token,
            )
            .await?;

        response.expect_status(422)?;
        Ok(())
    })
}

fn retrieve_ok(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        // Given
        ctx.arrange_user("user").await?;
        let author: RegisteredUser = ctx.aliases.get("user")?;
        let (article, created) = ctx
            .create_article(ArticleOverrides::default(), &author.token)
            .await?;
        let slug = created.expect_status(201)?.require_str("/article/slug")?;
        ctx.aliases.capture("slug", slug)?;

        // When
        let slug = ctx.alias("slug")?;
        let response = ctx.get(&article_path(&slug), None).await?;

        // Then
        response
            .expect_status(200)?
            .expect_eq("/article/slug", slug.as_str())?
            .expect_eq("/article/title", article.title.as_str())?
            .expect_eq("/article/author/username", author.username.as_str())?
            .expect_eq("/article/author/following", false)?;
        Ok(())
    })
}

fn retrieve_not_found(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        let unknown = format!("{}-unknown", ctx.fixtures.unique());

        let response = ctx.get(&article_path(&unknown), None).await?;

        response.expect_status(404)?;
        Ok(())
    })
}

fn favorite_ok(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        // Given
        ctx.arrange_user("user").await?;
        ctx.arrange_user("reader").await?;
        let author: RegisteredUser = ctx.aliases.get("user")?;
        let reader: RegisteredUser = ctx.aliases.get("reader")?;
        let (_, created) = ctx
            .create_article(ArticleOverrides::default(), &author.token)
            .await?;
        let slug = created
            .expect_status(201)?
            .require_str("/article/slug")?
            .to_string();

        // When
        let response = ctx
            .post(
                &format!("{}/favorite", article_path(&slug)),
                &json!({}),
                Some(&reader.token),
            )
            .await?;

        // Then
        response
            .expect_status(200)?
            .expect_eq("/article/favorited", true)?
            .expect_eq("/article/favoritesCount", 1)?;
        Ok(())
    })
}

fn destroy_ok(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        // Given
        ctx.arrange_user("user").await?;
        let author: RegisteredUser = ctx.aliases.get("user")?;
        let (_, created) = ctx
            .create_article(ArticleOverrides::default(), &author.token)
            .await?;
        let slug = created
            .expect_status(201)?
            .require_str("/article/slug")?
            .to_string();

        // When
        let response = ctx.delete(&article_path(&slug), Some(&author.token)).await?;

        // Then
        response.expect_status(204)?;
        ctx.get(&article_path(&slug), None)
            .await?
            .expect_status(404)?;
        Ok(())
    })
}

fn destroy_forbidden(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        // Given
        ctx.arrange_user("user").await?;
        ctx.arrange_user("intruder").await?;
        let author: RegisteredUser = ctx.aliases.get("user")?;
        let intruder: RegisteredUser = ctx.aliases.get("intruder")?;
        let (_, created) = ctx
            .create_article(ArticleOverrides::default(), &author.token)
            .await?;
        let slug = created
            .expect_status(201)?
            .require_str("/article/slug")?
            .to_string();

        // When
        let response = ctx.delete(&article_path(&slug), Some(&intruder.token)).await?;

        // Then
        response.expect_status(403)?;
        ctx.get(&article_path(&slug), None)
            .await?
            .expect_status(200)?;
        Ok(())
    })
}
