use futures::future::BoxFuture;
use serde_json::json;

use crate::fixtures::{Credentials, UserOverrides, register_user};
use crate::scenario::{Scenario, ScenarioContext, ScenarioFn, ScenarioResult};

const FILE: &str = "api/user";

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
        scenario("@POST register user", "OK @201", register_ok),
        scenario("@POST register user", "KO @422 : empty username", register_empty_username),
        scenario("@POST register user", "KO @422 : empty email", register_empty_email),
        scenario("@POST register user", "KO @422 : empty password", register_empty_password),
        scenario("@POST register user", "KO @409 : existing credentials", register_existing),
        scenario("@POST login", "OK @200", login_ok),
        scenario("@POST login", "KO @422 : empty email", login_empty_email),
        scenario("@POST login", "KO @422 : empty password", login_empty_password),
        scenario("@POST login", "KO @401 : incorrect password", login_incorrect_password),
        scenario("@GET current user", "OK @200", current_user_ok),
        scenario("@GET current user", "KO @401", current_user_unauthorized),
        scenario("@PUT update user", "OK @200", update_user_ok),
        scenario("@PUT update user", "KO @401", update_user_unauthorized),
    ]
}

fn register_ok(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        // Given
        let user = ctx.fixtures.user(UserOverrides::default());

        // When
        let response = register_user(&ctx.client, &user).await?;

        // Then
        response
            .expect_status(201)?
            .expect_eq("/user/username", user.username.as_str())?
            .expect_eq("/user/email", user.email.as_str())?
            .expect_present("/user/token")?;
        Ok(())
    })
}

fn register_empty_username(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        let (_, response) = ctx
            .register_user(UserOverrides::default().username(""))
            .await?;

        response
            .expect_status(422)?
            .expect_eq("/detail/0/ctx/error", "can't be blank")?;
        Ok(())
    })
}

fn register_empty_email(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        let (_, response) = ctx.register_user(UserOverrides::default().email("")).await?;

        // The message depends on the API's email validator
        response.expect_status(422)?;
        Ok(())
    })
}

fn register_empty_password(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        let (_, response) = ctx
            .register_user(UserOverrides::default().password(""))
            .await?;

        response
            .expect_status(422)?
            .expect_eq("/detail/0/ctx/error", "can't be blank")?;
        Ok(())
    })
}

fn register_existing(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        // Given
        let user = ctx.fixtures.user(UserOverrides::default());
        register_user(&ctx.client, &user).await?.expect_status(201)?;

        // When
        let response = register_user(&ctx.client, &user).await?;

        // Then
        response.expect_status(409)?;
        Ok(())
    })
}

fn login_ok(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        // Given
        let (user, registered) = ctx.register_user(UserOverrides::default()).await?;
        registered.expect_status(201)?;

        // When
        let response = ctx.login(&user.credentials()).await?;

        // Then
        response
            .expect_status(200)?
            .expect_eq("/user/username", user.username.as_str())?
            .expect_eq("/user/email", user.email.as_str())?
            .expect_present("/user/token")?;
        Ok(())
    })
}

fn login_empty_email(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        let (user, registered) = ctx.register_user(UserOverrides::default()).await?;
        registered.expect_status(201)?;

        let response = ctx
            .login(&Credentials {
                email: String::new(),
                password: user.password,
            })
            .await?;

        response
            .expect_status(422)?
            .expect_eq("/detail/0/ctx/error", "can't be blank")?;
        Ok(())
    })
}

fn login_empty_password(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        let (user, registered) = ctx.register_user(UserOverrides::default()).await?;
        registered.expect_status(201)?;

        let response = ctx
            .login(&Credentials {
                email: user.email,
                password: String::new(),
            })
            .await?;

        response
            .expect_status(422)?
            .expect_eq("/detail/0/ctx/error", "can't be blank")?;
        Ok(())
    })
}

fn login_incorrect_password(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        let (user, registered) = ctx.register_user(UserOverrides::default()).await?;
        registered.expect_status(201)?;

        let response = ctx
            .login(&Credentials {
                email: user.email,
                password: "incorrect".to_string(),
            })
            .await?;

        response
            .expect_status(401)?
            .expect_message("incorrect credentials")?;
        Ok(())
    })
}

fn current_user_ok(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        // Given
        let (user, registered) = ctx.register_user(UserOverrides::default()).await?;
        let token = registered.expect_status(201)?.require_str("/user/token")?;
        ctx.aliases.capture("token", token)?;

        // When
        let token = ctx.alias("token")?;
        let response = ctx.get("/api/user", Some(&token)).await?;

        // Then
        response
            .expect_status(200)?
            .expect_eq("/user/username", user.username.as_str())?
            .expect_eq("/user/email", user.email.as_str())?;
        Ok(())
    })
}

fn current_user_unauthorized(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        let response = ctx.get("/api/user", None).await?;

        response.expect_status(401)?;
        Ok(())
    })
}

fn update_user_ok(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        // Given
        let (_, registered) = ctx.register_user(UserOverrides::default()).await?;
        let token = registered.expect_status(201)?.require_str("/user/token")?;
        ctx.aliases.capture("token", token)?;

        // When
        let username = format!("{}-2", ctx.fixtures.unique());
        let email = ctx.fixtures.complete_email(format!("{}-2", ctx.fixtures.unique()));
        let body = json!({ "user": { "username": username, "email": email } });
        let token = ctx.alias("token")?;
        let response = ctx.put("/api/user", &body, Some(&token)).await?;

        // Then
        let refreshed = response
            .expect_status(200)?
            .expect_eq("/user/username", username.as_str())?
            .expect_eq("/user/email", email.as_str())?
            .require_str("/user/token")?;
        ctx.aliases.capture("token", refreshed)?;

        let token = ctx.alias("token")?;
        let response = ctx.get("/api/user", Some(&token)).await?;
        response
            .expect_status(200)?
            .expect_eq("/user/username", username.as_str())?
            .expect_eq("/user/email", email.as_str())?;
        Ok(())
    })
}

fn update_user_unauthorized(ctx: &mut ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
    Box::pin(async move {
        let user = ctx.fixtures.user(UserOverrides::default());
        let body = json!({ "user": { "username": user.username, "email": user.email } });

        let response = ctx.put("/api/user", &body, None).await?;

        response.expect_status(401)?;
        Ok(())
    })
}
