//! In-memory stand-in for a Conduit API, served through wiremock.
//!
//! Implements just enough of the users, profiles and articles endpoints, with
//! the same status codes and error envelopes, for the built-in scenarios to
//! run without a real server.
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use serde_json::{Value, json};
use wiremock::{Request, Respond, ResponseTemplate};

pub const DEFAULT_IMAGE: &str = "https://api.realworld.io/images/smiley-cyrus.jpeg";

#[derive(Debug, Clone)]
struct UserRecord {
    username: String,
    email: String,
    password: String,
    followers: BTreeSet<String>,
}

#[derive(Debug, Clone)]
struct ArticleRecord {
    slug: String,
    title: String,
    description: String,
    body: String,
    tag_list: Vec<String>,
    author: String,
    favorited_by: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct State {
    users: Vec<UserRecord>,
    tokens: HashMap<String, String>,
    articles: Vec<ArticleRecord>,
    issued: u64,
}

#[derive(Debug, Default)]
pub struct FakeConduit {
    state: Mutex<State>,
}

fn blank(field: &str) -> ResponseTemplate {
    ResponseTemplate::new(422).set_body_json(json!({
        "detail": [{
            "type": "value_error",
            "loc": ["body", "data", field],
            "msg": "Value error, can't be blank",
            "ctx": {"error": "can't be blank"}
        }]
    }))
}

fn invalid_email() -> ResponseTemplate {
    ResponseTemplate::new(422).set_body_json(json!({
        "detail": [{
            "type": "value_error",
            "loc": ["body", "data", "user", "email"],
            "msg": "value is not a valid email address"
        }]
    }))
}

fn unauthorized() -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(json!({
        "message": "missing authorization credentials"
    }))
}

fn not_found(resource: &str) -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({"errors": {resource: ["not found"]}}))
}

fn text<'a>(body: &'a Value, pointer: &str) -> Option<&'a str> {
    body.pointer(pointer).and_then(Value::as_str)
}

fn slugify(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}

impl State {
    fn issue_token(&mut self, username: &str) -> String {
        self.issued += 1;
        let token = format!("token-{}-{}", self.issued, username);
        self.tokens.insert(token.clone(), username.to_string());
        token
    }

    fn user(&self, username: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.username == username)
    }

    fn user_mut(&mut self, username: &str) -> Option<&mut UserRecord> {
        self.users.iter_mut().find(|u| u.username == username)
    }

    fn user_json(&self, user: &UserRecord, token: &str) -> Value {
        json!({
            "user": {
                "username": user.username,
                "email": user.email,
                "bio": null,
                "image": DEFAULT_IMAGE,
                "token": token,
            }
        })
    }

    fn profile_json(&self, user: &UserRecord, viewer: Option<&str>) -> Value {
        json!({
            "username": user.username,
            "bio": null,
            "image": DEFAULT_IMAGE,
            "following": viewer.is_some_and(|v| user.followers.contains(v)),
        })
    }

    fn article_json(&self, article: &ArticleRecord, viewer: Option<&str>) -> Value {
        let author = self
            .user(&article.author)
            .map(|u| self.profile_json(u, viewer))
            .unwrap_or(Value::Null);
        json!({
            "slug": article.slug,
            "title": article.title,
            "description": article.description,
            "body": article.body,
            "tagList": article.tag_list,
            "favorited": viewer.is_some_and(|v| article.favorited_by.contains(v)),
            "favoritesCount": article.favorited_by.len(),
            "author": author,
        })
    }

    fn register(&mut self, body: &Value) -> ResponseTemplate {
        let username = text(body, "/user/username").unwrap_or_default().to_string();
        let email = text(body, "/user/email").unwrap_or_default().to_string();
        let password = text(body, "/user/password").unwrap_or_default().to_string();
        if username.is_empty() {
            return blank("username");
        }
        if !is_valid_email(&email) {
            return invalid_email();
        }
        if password.is_empty() {
            return blank("password");
        }
        if self
            .users
            .iter()
            .any(|u| u.username == username || u.email == email)
        {
            return ResponseTemplate::new(409).set_body_json(json!({"already_existing": "username"}));
        }

        let user = UserRecord {
            username: username.clone(),
            email,
            password,
            followers: BTreeSet::new(),
        };
        self.users.push(user.clone());
        let token = self.issue_token(&username);
        ResponseTemplate::new(201).set_body_json(self.user_json(&user, &token))
    }

    fn login(&mut self, body: &Value) -> ResponseTemplate {
        let email = text(body, "/user/email").unwrap_or_default();
        let password = text(body, "/user/password").unwrap_or_default();
        if email.is_empty() {
            return blank("email");
        }
        if password.is_empty() {
            return blank("password");
        }
        let Some(user) = self
            .users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .cloned()
        else {
            return ResponseTemplate::new(401)
                .set_body_json(json!({"detail": [{"msg": "incorrect credentials"}]}));
        };
        let token = self.issue_token(&user.username);
        ResponseTemplate::new(200).set_body_json(self.user_json(&user, &token))
    }

    fn current_user(&mut self, viewer: &str, token: &str) -> ResponseTemplate {
        match self.user(viewer).cloned() {
            Some(user) => ResponseTemplate::new(200).set_body_json(self.user_json(&user, token)),
            None => unauthorized(),
        }
    }

    fn update_user(&mut self, viewer: &str, body: &Value) -> ResponseTemplate {
        let Some(mut user) = self.user(viewer).cloned() else {
            return unauthorized();
        };
        if let Some(username) = text(body, "/user/username") {
            user.username = username.to_string();
        }
        if let Some(email) = text(body, "/user/email") {
            user.email = email.to_string();
        }
        if let Some(password) = text(body, "/user/password") {
            user.password = password.to_string();
        }
        let renamed = user.username != viewer;
        if let Some(record) = self.user_mut(viewer) {
            *record = user.clone();
        }
        if renamed {
            for token_owner in self.tokens.values_mut() {
                if *token_owner == viewer {
                    *token_owner = user.username.clone();
                }
            }
            for article in self.articles.iter_mut().filter(|a| a.author == viewer) {
                article.author = user.username.clone();
            }
        }
        let token = self.issue_token(&user.username);
        ResponseTemplate::new(200).set_body_json(self.user_json(&user, &token))
    }

    fn profile(&self, username: &str, viewer: Option<&str>) -> ResponseTemplate {
        match self.user(username) {
            Some(user) => ResponseTemplate::new(200)
                .set_body_json(json!({"profile": self.profile_json(user, viewer)})),
            None => not_found("profile"),
        }
    }

    fn set_following(&mut self, username: &str, viewer: &str, follow: bool) -> ResponseTemplate {
        if username == viewer {
            return ResponseTemplate::new(403).set_body_json(json!({"errors": {"profile": ["forbidden"]}}));
        }
        let Some(user) = self.user_mut(username) else {
            return not_found("profile");
        };
        let changed = if follow {
            user.followers.insert(viewer.to_string())
        } else {
            user.followers.remove(viewer)
        };
        if !changed {
            return ResponseTemplate::new(409);
        }
        self.profile(username, Some(viewer))
    }

    fn feed(&self, viewer: &str) -> ResponseTemplate {
        let articles: Vec<Value> = self
            .articles
            .iter()
            .rev()
            .filter(|a| {
                self.user(&a.author)
                    .is_some_and(|author| author.followers.contains(viewer))
            })
            .map(|a| self.article_json(a, Some(viewer)))
            .collect();
        ResponseTemplate::new(200).set_body_json(json!({
            "articlesCount": articles.len(),
            "articles": articles,
        }))
    }

    fn create_article(&mut self, viewer: &str, body: &Value) -> ResponseTemplate {
        let title = text(body, "/article/title").unwrap_or_default();
        if title.is_empty() {
            return blank("title");
        }
        let slug = slugify(title);
        if self.articles.iter().any(|a| a.slug == slug) {
            return ResponseTemplate::new(409).set_body_json(json!({"already_existing": "slug"}));
        }
        let article = ArticleRecord {
            slug,
            title: title.to_string(),
            description: text(body, "/article/description").unwrap_or_default().to_string(),
            body: text(body, "/article/body").unwrap_or_default().to_string(),
            tag_list: body
                .pointer("/article/tagList")
                .and_then(Value::as_array)
                .map(|tags| {
                    tags.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            author: viewer.to_string(),
            favorited_by: BTreeSet::new(),
        };
        let response = json!({"article": self.article_json(&article, Some(viewer))});
        self.articles.push(article);
        ResponseTemplate::new(201).set_body_json(response)
    }

    fn article(&self, slug: &str, viewer: Option<&str>) -> ResponseTemplate {
        match self.articles.iter().find(|a| a.slug == slug) {
            Some(article) => ResponseTemplate::new(200)
                .set_body_json(json!({"article": self.article_json(article, viewer)})),
            None => not_found("article"),
        }
    }

    fn delete_article(&mut self, slug: &str, viewer: &str) -> ResponseTemplate {
        let Some(index) = self.articles.iter().position(|a| a.slug == slug) else {
            return not_found("article");
        };
        if self.articles[index].author != viewer {
            return ResponseTemplate::new(403);
        }
        self.articles.remove(index);
        ResponseTemplate::new(204)
    }

    fn favorite(&mut self, slug: &str, viewer: &str) -> ResponseTemplate {
        let Some(article) = self.articles.iter_mut().find(|a| a.slug == slug) else {
            return not_found("article");
        };
        if !article.favorited_by.insert(viewer.to_string()) {
            return ResponseTemplate::new(409)
                .set_body_json(json!({"errors": {"body": ["Already Favourited Article"]}}));
        }
        self.article(slug, Some(viewer))
    }
}

impl Respond for FakeConduit {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut state = self.state.lock().unwrap();
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let token = request
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);
        let viewer = token
            .as_ref()
            .and_then(|token| state.tokens.get(token).cloned());
        let segments: Vec<&str> = request
            .url
            .path()
            .trim_matches('/')
            .split('/')
            .collect();

        match (request.method.as_str(), segments.as_slice()) {
            ("POST", ["api", "users"]) => state.register(&body),
            ("POST", ["api", "users", "login"]) => state.login(&body),
            ("GET", ["api", "user"]) => match (&viewer, &token) {
                (Some(viewer), Some(token)) => state.current_user(viewer, token),
                _ => unauthorized(),
            },
            ("PUT", ["api", "user"]) => match &viewer {
                Some(viewer) => state.update_user(viewer, &body),
                None => unauthorized(),
            },
            ("GET", ["api", "profiles", username]) => state.profile(username, viewer.as_deref()),
            ("POST", ["api", "profiles", username, "follow"]) => match &viewer {
                Some(viewer) => state.set_following(username, viewer, true),
                None => unauthorized(),
            },
            ("DELETE", ["api", "profiles", username, "follow"]) => match &viewer {
                Some(viewer) => state.set_following(username, viewer, false),
                None => unauthorized(),
            },
            ("GET", ["api", "articles", "feed"]) => match &viewer {
                Some(viewer) => state.feed(viewer),
                None => unauthorized(),
            },
            ("POST", ["api", "articles"]) => match &viewer {
                Some(viewer) => state.create_article(viewer, &body),
                None => unauthorized(),
            },
            ("GET", ["api", "articles", slug]) => state.article(slug, viewer.as_deref()),
            ("DELETE", ["api", "articles", slug]) => match &viewer {
                Some(viewer) => state.delete_article(slug, viewer),
                None => unauthorized(),
            },
            ("POST", ["api", "articles", slug, "favorite"]) => match &viewer {
                Some(viewer) => state.favorite(slug, viewer),
                None => unauthorized(),
            },
            _ => ResponseTemplate::new(404),
        }
    }
}
