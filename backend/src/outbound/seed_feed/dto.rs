//! Wire shapes of the WordPress REST `posts` endpoint, limited to the fields
//! the import uses. The `uagb_*` fields come from the Spectra plugin and are
//! loosely typed upstream, so they are decoded as raw JSON values.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::ports::SeedFeedItem;

#[derive(Debug, Deserialize)]
pub(super) struct WordPressPostDto {
    pub(super) id: i64,
    pub(super) date: String,
    pub(super) title: RenderedDto,
    pub(super) content: RenderedDto,
    #[serde(default)]
    pub(super) uagb_featured_image_src: Value,
    #[serde(default)]
    pub(super) uagb_excerpt: Value,
    pub(super) uagb_author_info: AuthorInfoDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct RenderedDto {
    pub(super) rendered: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthorInfoDto {
    pub(super) display_name: String,
}

impl WordPressPostDto {
    pub(super) fn into_domain(self) -> SeedFeedItem {
        // `full` is `[url, width, height, is_resized]` when an image is set.
        let img_url = self
            .uagb_featured_image_src
            .get("full")
            .and_then(Value::as_array)
            .and_then(|full| full.first())
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let subtitle = self
            .uagb_excerpt
            .as_str()
            .unwrap_or_default()
            .to_owned();
        SeedFeedItem {
            id: self.id,
            title: self.title.rendered,
            body: self.content.rendered,
            subtitle,
            img_url,
            published_at: self.date,
            author_name: self.uagb_author_info.display_name,
        }
    }
}
