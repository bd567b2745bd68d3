//! One-shot import of the external WordPress feed into a fresh schema.
//!
//! The feed is fetched and its authors checked before anything destructive
//! happens, so a failed fetch leaves the existing data alone. After the reset,
//! feed items that fail validation or insertion are skipped with a warning;
//! that leniency applies to this bulk import only.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use super::ports::{
    NewPost, NewUser, PasswordHashError, PasswordHasher, SeedFeedError, SeedFeedItem,
    SeedFeedSource, SeedPersistenceError, SeedPost, SeedRepository, UserPersistenceError,
    UserRepository,
};
use super::{
    PostDraft, PostId, PostTitle, PostValidationError, Registration, UserId, UserValidationError,
    display_date,
};

/// Timestamp format used by the feed's `date` field.
pub const FEED_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Default feed location.
pub const DEFAULT_SEED_FEED_URL: &str = "https://theclementsfirm.com//wp-json/wp/v2/posts";

/// An account created by the import. The first entry becomes the admin.
#[derive(Debug, Clone, Copy)]
pub struct SeedAccount {
    pub name: &'static str,
    pub email: &'static str,
    pub password: &'static str,
}

/// Accounts every import creates, admin first.
pub const SEED_ACCOUNTS: [SeedAccount; 2] = [
    SeedAccount {
        name: "Noah Clements",
        email: "noahclements@gmail.com",
        password: "BubbaLubba1!",
    },
    SeedAccount {
        name: "Caroline Clements",
        email: "clementscaroline@yahoo.com",
        password: "BubbaLubba2!",
    },
];

/// Counts reported once the import finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedImportOutcome {
    pub users_created: usize,
    pub posts_imported: usize,
    pub posts_skipped: usize,
}

/// Failures that abort an import.
#[derive(Debug, thiserror::Error)]
pub enum SeedImportError {
    #[error(transparent)]
    Fetch(#[from] SeedFeedError),
    #[error("feed post {post_id} is by {author:?}, who is not a seed account")]
    UnknownAuthor { post_id: i64, author: String },
    #[error(transparent)]
    Persistence(#[from] SeedPersistenceError),
    #[error("failed to create seed account: {0}")]
    Account(#[from] UserPersistenceError),
    #[error("failed to hash seed password: {0}")]
    Hash(#[from] PasswordHashError),
    #[error("seed account is invalid: {0}")]
    InvalidAccount(#[from] UserValidationError),
}

#[derive(Debug, thiserror::Error)]
enum ItemRejection {
    #[error("id {0} does not fit a post id")]
    IdOutOfRange(i64),
    #[error("date {value:?} does not match the feed timestamp format")]
    Date { value: String },
    #[error(transparent)]
    Invalid(#[from] PostValidationError),
}

/// Rebuilds the database from the WordPress feed.
pub struct SeedImporter {
    feed: Arc<dyn SeedFeedSource>,
    seeds: Arc<dyn SeedRepository>,
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl SeedImporter {
    /// Wire the importer to the feed, the stores and the hasher.
    pub fn new(
        feed: Arc<dyn SeedFeedSource>,
        seeds: Arc<dyn SeedRepository>,
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            feed,
            seeds,
            users,
            hasher,
        }
    }

    /// Wipe the store and repopulate it from `feed_url`.
    pub async fn import_seed_posts(
        &self,
        feed_url: &str,
    ) -> Result<SeedImportOutcome, SeedImportError> {
        let feed = self.feed.fetch_posts(feed_url).await?;
        info!(
            items = feed.items.len(),
            undecodable = feed.undecodable,
            "fetched seed feed"
        );
        ensure_known_authors(&feed.items)?;
        let accounts = SEED_ACCOUNTS
            .iter()
            .map(|account| {
                Registration::try_from_parts(account.name, account.email, account.password)
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.seeds.reset_schema().await?;
        info!("schema reset");

        let mut authors: HashMap<String, UserId> = HashMap::new();
        for account in &accounts {
            let password_hash = self.hasher.hash(account.password())?;
            let user = self
                .users
                .create(&NewUser {
                    name: account.name().clone(),
                    email: account.email().clone(),
                    password_hash,
                })
                .await?;
            authors.insert(user.name().as_str().to_owned(), user.id());
        }

        let mut outcome = SeedImportOutcome {
            users_created: authors.len(),
            posts_skipped: feed.undecodable,
            ..SeedImportOutcome::default()
        };
        for item in &feed.items {
            let Some(&author_id) = authors.get(item.author_name.trim()) else {
                return Err(unknown_author(item));
            };
            let post = match seed_post(item, author_id) {
                Ok(post) => post,
                Err(rejection) => {
                    warn!(post_id = item.id, reason = %rejection, "skipping feed item");
                    outcome.posts_skipped += 1;
                    continue;
                }
            };
            match self.seeds.insert_post(&post).await {
                Ok(()) => outcome.posts_imported += 1,
                Err(error) => {
                    warn!(post_id = item.id, %error, "failed to insert feed item");
                    outcome.posts_skipped += 1;
                }
            }
        }
        self.seeds.sync_sequences().await?;

        info!(
            users = outcome.users_created,
            imported = outcome.posts_imported,
            skipped = outcome.posts_skipped,
            "seed import finished"
        );
        Ok(outcome)
    }
}

fn unknown_author(item: &SeedFeedItem) -> SeedImportError {
    SeedImportError::UnknownAuthor {
        post_id: item.id,
        author: item.author_name.clone(),
    }
}

fn ensure_known_authors(items: &[SeedFeedItem]) -> Result<(), SeedImportError> {
    match items.iter().find(|item| {
        !SEED_ACCOUNTS
            .iter()
            .any(|account| account.name == item.author_name.trim())
    }) {
        Some(item) => Err(unknown_author(item)),
        None => Ok(()),
    }
}

fn seed_post(item: &SeedFeedItem, author_id: UserId) -> Result<SeedPost, ItemRejection> {
    let id = i32::try_from(item.id).map_err(|_| ItemRejection::IdOutOfRange(item.id))?;
    let published = NaiveDateTime::parse_from_str(&item.published_at, FEED_DATE_FORMAT)
        .map_err(|_| ItemRejection::Date {
            value: item.published_at.clone(),
        })?;
    let draft = PostDraft::new(
        PostTitle::new(&item.title)?,
        &item.subtitle,
        &item.body,
        &item.img_url,
    )?;
    Ok(SeedPost {
        id: PostId::new(id),
        post: NewPost::from_draft(&draft, display_date(published.date()), author_id),
    })
}

#[cfg(test)]
#[path = "seed_import_tests.rs"]
mod tests;
