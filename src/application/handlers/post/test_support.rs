//! Port doubles shared by the post handler tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{BroadcastEvent, DomainError, ErrorCode, PostId, UserId};
use crate::domain::post::Post;
use crate::ports::{EventBroadcaster, PostPage, PostRepository};

/// Repository backed by a vector, with an optional forced failure on writes.
pub(crate) struct MockPostRepository {
    posts: Mutex<Vec<Post>>,
    fail_writes: bool,
}

impl MockPostRepository {
    pub fn new() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            fail_writes: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            fail_writes: true,
        }
    }

    pub fn with_post(self, post: Post) -> Self {
        self.posts.lock().unwrap().push(post);
        self
    }

    pub fn saved_posts(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.fail_writes {
            return Err(DomainError::new(ErrorCode::DatabaseError, "Simulated write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for MockPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), DomainError> {
        self.check_writable()?;
        self.posts.lock().unwrap().push(post.clone());
        Ok(())
    }

    async fn update(&self, post: &Post) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut posts = self.posts.lock().unwrap();
        if let Some(slot) = posts.iter_mut().find(|p| p.id() == post.id()) {
            *slot = post.clone();
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, DomainError> {
        Ok(self.posts.lock().unwrap().iter().find(|p| p.id() == id).cloned())
    }

    async fn list(&self, page: u32, per_page: u32) -> Result<PostPage, DomainError> {
        let posts = self.posts.lock().unwrap();
        let offset = ((page.max(1) - 1) * per_page) as usize;
        Ok(PostPage {
            items: posts.iter().skip(offset).take(per_page as usize).cloned().collect(),
            total: posts.len() as u64,
        })
    }

    async fn delete(&self, id: &PostId) -> Result<(), DomainError> {
        self.check_writable()?;
        self.posts.lock().unwrap().retain(|p| p.id() != id);
        Ok(())
    }
}

/// Records every broadcast event.
#[derive(Default)]
pub(crate) struct RecordingBroadcaster {
    events: Mutex<Vec<BroadcastEvent>>,
}

impl RecordingBroadcaster {
    pub fn events(&self) -> Vec<BroadcastEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventBroadcaster for RecordingBroadcaster {
    async fn broadcast(&self, event: BroadcastEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub(crate) fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

pub(crate) fn post_by(owner: &str, title: &str) -> Post {
    Post::new(PostId::new(), user(owner), title.to_string(), "body".to_string()).unwrap()
}
