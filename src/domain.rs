//! Thin handles over the API's resources.
//!
//! Everything here is written against [`ClientInterface`] only and decodes
//! just enough of each payload to be useful; the rest stays as raw JSON.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::client::ClientInterface;
use crate::error::Result;
use crate::response::Response;
use crate::uri::Params;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct User {
    pub name: String,
    pub likes: u64,
    pub following: u64,
    pub default_post_format: Option<String>,
    pub blogs: Vec<Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Dashboard {
    pub posts: Vec<Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Likes {
    pub liked_posts: Vec<Value>,
    pub liked_count: u64,
}

/// Posts carrying a tag, newest first.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct SearchResults {
    pub posts: Vec<Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct BlogInfo {
    pub name: String,
    pub title: String,
    pub url: String,
    pub description: String,
    pub posts: u64,
    pub updated: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Posts {
    pub blog: Value,
    pub posts: Vec<Value>,
    pub total_posts: u64,
}

#[derive(Deserialize)]
struct UserInfo {
    user: User,
}

#[derive(Deserialize)]
struct BlogInfoResult {
    blog: BlogInfo,
}

/// A post identified by id and the blog it lives on.
#[derive(Debug)]
pub struct PostRef<'a, C: ?Sized> {
    client: &'a C,
    pub id: u64,
    pub blog_name: String,
}

impl<'a, C: ClientInterface + ?Sized> PostRef<'a, C> {
    pub fn new(client: &'a C, id: u64, blog_name: impl Into<String>) -> Self {
        PostRef {
            client,
            id,
            blog_name: blog_name.into(),
        }
    }

    fn id_params(&self) -> Params {
        Params::from([("id", self.id.to_string())])
    }

    pub fn delete(&self) -> Result<Response> {
        self.client.post_with_params(
            &format!("blog/{}/post/delete", self.blog_name),
            &self.id_params(),
        )
    }

    pub fn like(&self, reblog_key: &str) -> Result<Response> {
        let mut params = self.id_params();
        params.set("reblog_key", reblog_key);
        self.client.post_with_params("user/like", &params)
    }

    pub fn unlike(&self, reblog_key: &str) -> Result<Response> {
        let mut params = self.id_params();
        params.set("reblog_key", reblog_key);
        self.client.post_with_params("user/unlike", &params)
    }

    /// Reblogs this post onto `target_blog`.
    pub fn reblog(&self, target_blog: &str, reblog_key: &str, params: &Params) -> Result<Response> {
        let mut params = params.clone();
        params
            .set("id", self.id.to_string())
            .set("reblog_key", reblog_key);
        self.client
            .post_with_params(&format!("blog/{}/post/reblog", target_blog), &params)
    }
}

/// A blog identified by name or hostname.
#[derive(Debug)]
pub struct BlogRef<'a, C: ?Sized> {
    client: &'a C,
    pub name: String,
}

impl<'a, C: ClientInterface + ?Sized> BlogRef<'a, C> {
    pub fn new(client: &'a C, name: impl Into<String>) -> Self {
        BlogRef {
            client,
            name: name.into(),
        }
    }

    pub fn info(&self) -> Result<BlogInfo> {
        let response = self.client.get(&format!("blog/{}/info", self.name))?;
        Ok(response.result::<BlogInfoResult>()?.blog)
    }

    pub fn posts(&self, params: &Params) -> Result<Posts> {
        self.client
            .get_with_params(&format!("blog/{}/posts", self.name), params)?
            .result()
    }

    pub fn follow(&self) -> Result<Response> {
        self.client
            .post_with_params("user/follow", &Params::from([("url", self.name.as_str())]))
    }

    pub fn unfollow(&self) -> Result<Response> {
        self.client
            .post_with_params("user/unfollow", &Params::from([("url", self.name.as_str())]))
    }
}

pub fn user_info<C: ClientInterface + ?Sized>(client: &C) -> Result<User> {
    Ok(client.get("user/info")?.result::<UserInfo>()?.user)
}

pub fn dashboard<C: ClientInterface + ?Sized>(client: &C, params: &Params) -> Result<Dashboard> {
    client.get_with_params("user/dashboard", params)?.result()
}

pub fn likes<C: ClientInterface + ?Sized>(client: &C, params: &Params) -> Result<Likes> {
    client.get_with_params("user/likes", params)?.result()
}

pub fn tagged_search<C: ClientInterface + ?Sized>(
    client: &C,
    tag: &str,
    params: &Params,
) -> Result<SearchResults> {
    let mut params = params.clone();
    params.set("tag", tag);
    client.get_with_params("tagged", &params)?.result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;
    use reqwest::StatusCode;
    use std::cell::RefCell;

    /// Records every call and answers with a canned body.
    struct Recorder {
        calls: RefCell<Vec<(&'static str, String, Params)>>,
        body: &'static str,
    }

    impl Recorder {
        fn new(body: &'static str) -> Self {
            Recorder {
                calls: RefCell::new(Vec::new()),
                body,
            }
        }

        fn record(&self, verb: &'static str, endpoint: &str, params: &Params) -> Result<Response> {
            self.calls
                .borrow_mut()
                .push((verb, endpoint.to_string(), params.clone()));
            Ok(Response::new(
                StatusCode::OK,
                HeaderMap::new(),
                self.body.as_bytes().to_vec(),
            ))
        }

        fn last(&self) -> (&'static str, String, Params) {
            self.calls.borrow().last().cloned().expect("no call recorded")
        }
    }

    impl ClientInterface for Recorder {
        fn get_with_params(&self, endpoint: &str, params: &Params) -> Result<Response> {
            self.record("GET", endpoint, params)
        }

        fn post_with_params(&self, endpoint: &str, params: &Params) -> Result<Response> {
            self.record("POST", endpoint, params)
        }

        fn put_with_params(&self, endpoint: &str, params: &Params) -> Result<Response> {
            self.record("PUT", endpoint, params)
        }

        fn delete_with_params(&self, endpoint: &str, params: &Params) -> Result<Response> {
            self.record("DELETE", endpoint, params)
        }
    }

    #[test]
    fn test_user_info() {
        let rec = Recorder::new(r#"{"meta":{"status":200},"response":{"user":{"name":"derek","likes":25,"following":263,"blogs":[{"name":"derekg"}]}}}"#);
        let user = user_info(&rec).unwrap();
        assert_eq!(user.name, "derek");
        assert_eq!(user.likes, 25);
        assert_eq!(user.blogs.len(), 1);
        assert_eq!(rec.last(), ("GET", "user/info".to_string(), Params::new()));
    }

    #[test]
    fn test_tagged_search_adds_tag() {
        let rec = Recorder::new(r#"{"response":[{"id":1},{"id":2}]}"#);
        let results = tagged_search(&rec, "lol", &Params::from([("limit", "2")])).unwrap();
        assert_eq!(results.posts.len(), 2);
        let (verb, endpoint, params) = rec.last();
        assert_eq!((verb, endpoint.as_str()), ("GET", "tagged"));
        assert_eq!(params.get("tag"), Some("lol"));
        assert_eq!(params.get("limit"), Some("2"));
    }

    #[test]
    fn test_dashboard_and_likes() {
        let rec = Recorder::new(r#"{"response":{"posts":[{}],"liked_posts":[{},{}],"liked_count":2}}"#);
        assert_eq!(dashboard(&rec, &Params::new()).unwrap().posts.len(), 1);
        assert_eq!(rec.last().1, "user/dashboard");
        let liked = likes(&rec, &Params::new()).unwrap();
        assert_eq!(liked.liked_count, 2);
        assert_eq!(rec.last().1, "user/likes");
    }

    #[test]
    fn test_post_ref() {
        let rec = Recorder::new("{}");
        let post = PostRef::new(&rec, 42, "staff");
        post.delete().unwrap();
        assert_eq!(
            rec.last(),
            ("POST", "blog/staff/post/delete".to_string(), Params::from([("id", "42")]))
        );
        post.like("abc").unwrap();
        assert_eq!(
            rec.last(),
            (
                "POST",
                "user/like".to_string(),
                Params::from([("id", "42"), ("reblog_key", "abc")])
            )
        );
        post.reblog("mine", "abc", &Params::from([("comment", "nice")])).unwrap();
        let (_, endpoint, params) = rec.last();
        assert_eq!(endpoint, "blog/mine/post/reblog");
        assert_eq!(params.get("comment"), Some("nice"));
        assert_eq!(params.get("id"), Some("42"));
    }

    #[test]
    fn test_blog_ref() {
        let rec = Recorder::new(r#"{"response":{"blog":{"name":"staff","title":"Staff","posts":100,"ask":true}}}"#);
        let blog = BlogRef::new(&rec, "staff");
        let info = blog.info().unwrap();
        assert_eq!(info.title, "Staff");
        assert_eq!(info.posts, 100);
        assert_eq!(info.extra["ask"], Value::Bool(true));
        assert_eq!(rec.last().1, "blog/staff/info");

        blog.follow().unwrap();
        assert_eq!(
            rec.last(),
            ("POST", "user/follow".to_string(), Params::from([("url", "staff")]))
        );
    }
}
