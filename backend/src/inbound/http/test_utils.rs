//! Test helpers for inbound HTTP components: a session middleware, an
//! in-memory blog store implementing the repository ports, and a tiny
//! cookie-following client.

use std::sync::{Arc, Mutex, MutexGuard};

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use mockable::MockClock;

use crate::domain::ports::{
    CommentPersistenceError, CommentRepository, NewComment, NewPost, NewUser, PasswordHashError,
    PasswordHasher, PostPersistenceError, PostRepository, StoredCredentials, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    AuthorSummary, Comment, CommentId, CommentText, DisplayName, EmailAddress, HashedPassword,
    PlainPassword, Post, PostDraft, PostFilter, PostId, PostTitle, Role, User, UserId,
};
use crate::middleware::Trace;

use super::state::{HttpState, HttpStatePorts};
use super::views::Views;

pub const SESSION_COOKIE: &str = "session";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Disables the `Secure` flag for local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// The session cookie set by `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
}

/// Stores `plain$<password>` so tests stay fast.
pub struct PlainTextHasher;

impl PasswordHasher for PlainTextHasher {
    fn hash(&self, password: &PlainPassword) -> Result<HashedPassword, PasswordHashError> {
        Ok(HashedPassword::new(format!("plain${}", password.expose())))
    }

    fn verify(
        &self,
        password: &PlainPassword,
        hash: &HashedPassword,
    ) -> Result<bool, PasswordHashError> {
        hash.as_str()
            .strip_prefix("plain$")
            .map(|stored| stored == password.expose())
            .ok_or_else(|| PasswordHashError::malformed("missing plain$ prefix"))
    }
}

/// 2026-10-19 noon UTC.
pub fn fixed_clock() -> MockClock {
    let mut clock = MockClock::new();
    clock.expect_utc().returning(|| {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0)
            .single()
            .expect("valid fixture time")
    });
    clock
}

#[derive(Default)]
struct BlogRows {
    users: Vec<(User, HashedPassword)>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    next_post_id: i32,
    next_comment_id: i32,
}

/// In-memory store enforcing the same uniqueness and cascade rules as the
/// PostgreSQL schema.
#[derive(Default)]
pub struct InMemoryBlog {
    rows: Mutex<BlogRows>,
}

impl InMemoryBlog {
    fn rows(&self) -> MutexGuard<'_, BlogRows> {
        self.rows.lock().expect("store lock")
    }

    fn author(rows: &BlogRows, id: UserId) -> Option<AuthorSummary> {
        rows.users
            .iter()
            .find(|(user, _)| user.id() == id)
            .map(|(user, _)| AuthorSummary {
                id: user.id(),
                name: user.name().clone(),
                email: user.email().clone(),
            })
    }

    /// Insert a user directly; the first becomes admin.
    pub fn add_user(&self, name: &str, email: &str, password: &str) -> User {
        let mut rows = self.rows();
        let raw_id = i32::try_from(rows.users.len()).expect("small fixture") + 1;
        let role = if rows.users.is_empty() {
            Role::Admin
        } else {
            Role::Reader
        };
        let user = User::new(
            UserId::new(raw_id),
            DisplayName::new(name).expect("fixture name"),
            EmailAddress::new(email).expect("fixture email"),
            role,
        );
        rows.users.push((
            user.clone(),
            HashedPassword::new(format!("plain${password}")),
        ));
        user
    }

    /// Insert a post directly, dated 2026-10-19.
    pub fn add_post(&self, title: &str, author: &User) -> Post {
        let mut rows = self.rows();
        rows.next_post_id += 1;
        let post = Post {
            id: PostId::new(rows.next_post_id),
            title: PostTitle::new(title).expect("fixture title"),
            subtitle: format!("About {title}"),
            date: "October 19, 2026".to_owned(),
            body: format!("<p>{title} body</p>"),
            img_url: "https://example.com/image.png".to_owned(),
            author: Self::author(&rows, author.id()).expect("fixture author exists"),
        };
        rows.posts.push(post.clone());
        post
    }

    pub fn user_count(&self) -> usize {
        self.rows().users.len()
    }

    pub fn post(&self, id: PostId) -> Option<Post> {
        self.rows().posts.iter().find(|post| post.id == id).cloned()
    }

    pub fn post_count(&self) -> usize {
        self.rows().posts.len()
    }

    pub fn comments_on(&self, id: PostId) -> Vec<Comment> {
        self.rows()
            .comments
            .iter()
            .filter(|comment| comment.post_id == id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryBlog {
    async fn create(&self, new_user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut rows = self.rows();
        if rows
            .users
            .iter()
            .any(|(user, _)| user.email() == &new_user.email)
        {
            return Err(UserPersistenceError::duplicate_email(
                new_user.email.as_str(),
            ));
        }
        let raw_id = i32::try_from(rows.users.len()).expect("small fixture") + 1;
        let role = if rows.users.is_empty() {
            Role::Admin
        } else {
            Role::Reader
        };
        let user = User::new(
            UserId::new(raw_id),
            new_user.name.clone(),
            new_user.email.clone(),
            role,
        );
        rows.users
            .push((user.clone(), new_user.password_hash.clone()));
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .rows()
            .users
            .iter()
            .find(|(user, _)| user.id() == id)
            .map(|(user, _)| user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(self
            .rows()
            .users
            .iter()
            .find(|(user, _)| user.email() == email)
            .map(|(user, hash)| StoredCredentials {
                user: user.clone(),
                password_hash: hash.clone(),
            }))
    }
}

fn listed_by(filter: &PostFilter, post: &Post) -> bool {
    match filter {
        PostFilter::All => true,
        PostFilter::ByAuthorName(name) => post.author.name.as_str() == name,
    }
}

#[async_trait]
impl PostRepository for InMemoryBlog {
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, PostPersistenceError> {
        let mut posts: Vec<Post> = self
            .rows()
            .posts
            .iter()
            .filter(|post| listed_by(filter, post))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(posts)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError> {
        Ok(self.post(id))
    }

    async fn create(&self, new_post: &NewPost) -> Result<Post, PostPersistenceError> {
        let mut rows = self.rows();
        if rows.posts.iter().any(|post| post.title == new_post.title) {
            return Err(PostPersistenceError::duplicate_title(
                new_post.title.as_str(),
            ));
        }
        let author = Self::author(&rows, new_post.author_id)
            .ok_or_else(|| PostPersistenceError::query("author does not exist"))?;
        rows.next_post_id += 1;
        let post = Post {
            id: PostId::new(rows.next_post_id),
            title: new_post.title.clone(),
            subtitle: new_post.subtitle.clone(),
            date: new_post.date.clone(),
            body: new_post.body.clone(),
            img_url: new_post.img_url.clone(),
            author,
        };
        rows.posts.push(post.clone());
        Ok(post)
    }

    async fn update(
        &self,
        id: PostId,
        draft: &PostDraft,
    ) -> Result<Option<Post>, PostPersistenceError> {
        let mut rows = self.rows();
        if rows
            .posts
            .iter()
            .any(|post| post.id != id && &post.title == draft.title())
        {
            return Err(PostPersistenceError::duplicate_title(
                draft.title().as_str(),
            ));
        }
        let Some(post) = rows.posts.iter_mut().find(|post| post.id == id) else {
            return Ok(None);
        };
        post.title = draft.title().clone();
        post.subtitle = draft.subtitle().to_owned();
        post.body = draft.body().to_owned();
        post.img_url = draft.img_url().to_owned();
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: PostId) -> Result<bool, PostPersistenceError> {
        let mut rows = self.rows();
        let before = rows.posts.len();
        rows.posts.retain(|post| post.id != id);
        rows.comments.retain(|comment| comment.post_id != id);
        Ok(rows.posts.len() != before)
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlog {
    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentPersistenceError> {
        Ok(self.comments_on(post_id))
    }

    async fn create(&self, new_comment: &NewComment) -> Result<Comment, CommentPersistenceError> {
        let mut rows = self.rows();
        if !rows.posts.iter().any(|post| post.id == new_comment.post_id) {
            return Err(CommentPersistenceError::missing_reference("post"));
        }
        let author = Self::author(&rows, new_comment.author_id)
            .ok_or_else(|| CommentPersistenceError::missing_reference("author"))?;
        rows.next_comment_id += 1;
        let comment = Comment {
            id: CommentId::new(rows.next_comment_id),
            post_id: new_comment.post_id,
            author,
            text: CommentText::new(new_comment.text.as_str()).expect("validated text"),
        };
        rows.comments.push(comment.clone());
        Ok(comment)
    }
}

/// HTTP state over `blog` with the plain-text hasher and the fixed clock.
pub fn blog_state(blog: &Arc<InMemoryBlog>) -> web::Data<HttpState> {
    let ports = HttpStatePorts {
        users: blog.clone(),
        posts: blog.clone(),
        comments: blog.clone(),
        hasher: Arc::new(PlainTextHasher),
        clock: Arc::new(fixed_clock()),
    };
    let views = Views::new().expect("templates compile");
    web::Data::new(HttpState::new(ports, Arc::new(views)))
}

/// The blog routes behind the trace and session middleware.
pub fn blog_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(test_session_middleware())
        .wrap(Trace)
        .configure(super::configure)
}

/// Carries the session cookie from one response to the next request.
pub struct Browser<S> {
    app: S,
    cookie: Option<Cookie<'static>>,
}

impl<S> Browser<S>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    pub const fn new(app: S) -> Self {
        Self { app, cookie: None }
    }

    pub const fn has_session_cookie(&self) -> bool {
        self.cookie.is_some()
    }

    async fn send(&mut self, mut req: test::TestRequest) -> ServiceResponse {
        if let Some(cookie) = self.cookie.clone() {
            req = req.cookie(cookie);
        }
        let res = test::call_service(&self.app, req.to_request()).await;
        if let Some(cookie) = session_cookie(&res) {
            self.cookie = (!cookie.value().is_empty()).then_some(cookie);
        }
        res
    }

    pub async fn get(&mut self, uri: &str) -> ServiceResponse {
        self.send(test::TestRequest::get().uri(uri)).await
    }

    pub async fn post_form(&mut self, uri: &str, form: &[(&str, &str)]) -> ServiceResponse {
        self.send(test::TestRequest::post().uri(uri).set_form(form))
            .await
    }

    /// Fetch `uri` and return its body as text.
    pub async fn page(&mut self, uri: &str) -> (actix_web::http::StatusCode, String) {
        let res = self.get(uri).await;
        let status = res.status();
        (status, body_text(res).await)
    }

    /// Sign in through the login form.
    pub async fn sign_in(&mut self, email: &str, password: &str) {
        let res = self
            .post_form("/login", &[("email", email), ("password", password)])
            .await;
        assert_eq!(res.status(), actix_web::http::StatusCode::SEE_OTHER);
    }
}

pub async fn body_text(res: ServiceResponse) -> String {
    String::from_utf8(test::read_body(res).await.to_vec()).expect("utf8 body")
}

/// `Location` header of a redirect.
pub fn location(res: &ServiceResponse) -> &str {
    res.headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("redirect location")
}
