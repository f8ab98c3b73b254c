//! Content store collaborator port.
//!
//! Posts, comments and tracks are stored and delivered elsewhere; the
//! moderation engine only authorizes deletions against them. This trait is
//! the seam to that collaborator.

use async_trait::async_trait;
use chorus_common::AppResult;
use chorus_db::entities::moderation_action::TargetType;
use std::sync::Arc;

/// Content kinds subject to moderator deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// A text post.
    Post,
    /// A comment on a post or track.
    Comment,
    /// An uploaded track.
    Track,
}

impl ContentKind {
    /// Human-readable name, used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "Post",
            Self::Comment => "Comment",
            Self::Track => "Track",
        }
    }

    /// The ledger target type for this content kind.
    #[must_use]
    pub const fn target_type(self) -> TargetType {
        match self {
            Self::Post => TargetType::Post,
            Self::Comment => TargetType::Comment,
            Self::Track => TargetType::Track,
        }
    }
}

/// Trait for resolving and deleting platform content.
///
/// This allows the moderation engine to act on content without depending on
/// the content storage implementation.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Resolve the owner of a piece of content, if it exists.
    async fn owner_of(&self, kind: ContentKind, content_id: &str) -> AppResult<Option<String>>;

    /// Delete a piece of content. Deletion is unconditional once authorized.
    async fn delete(&self, kind: ContentKind, content_id: &str) -> AppResult<()>;
}

/// A no-op implementation of `ContentStore` for testing or when no content
/// collaborator is wired.
#[derive(Clone, Default)]
pub struct NoOpContentStore;

#[async_trait]
impl ContentStore for NoOpContentStore {
    async fn owner_of(&self, _kind: ContentKind, _content_id: &str) -> AppResult<Option<String>> {
        Ok(None)
    }

    async fn delete(&self, _kind: ContentKind, _content_id: &str) -> AppResult<()> {
        Ok(())
    }
}

/// Wrapper for boxed `ContentStore` trait object.
pub type ContentStoreService = Arc<dyn ContentStore>;
