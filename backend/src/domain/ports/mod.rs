//! Ports at the hexagonal boundary. Adapters live under `crate::outbound`.

mod macros;
pub(crate) use macros::define_port_error;

mod comment_repository;
mod password_hasher;
mod post_repository;
mod seed_feed_source;
mod seed_repository;
mod user_repository;

#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentPersistenceError, CommentRepository, NewComment};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{NewPost, PostPersistenceError, PostRepository};
#[cfg(test)]
pub use seed_feed_source::MockSeedFeedSource;
pub use seed_feed_source::{SeedFeed, SeedFeedError, SeedFeedItem, SeedFeedSource};
#[cfg(test)]
pub use seed_repository::MockSeedRepository;
pub use seed_repository::{SeedPersistenceError, SeedPost, SeedRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewUser, StoredCredentials, UserPersistenceError, UserRepository};
