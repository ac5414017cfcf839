use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::{Post, PostDraft};

// In-memory post repository. Everything here vanishes on restart; a real
// database sits behind this interface in a bigger deployment.
pub struct PostStore {
    posts: DashMap<u64, Post>,
    next_id: AtomicU64,
}

impl PostStore {
    pub fn new() -> Self {
        Self {
            posts: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    // All posts, newest first
    pub fn list(&self) -> Vec<Post> {
        let mut all: Vec<Post> = self.posts.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        all
    }

    pub fn get(&self, id: u64) -> Option<Post> {
        self.posts.get(&id).map(|e| e.value().clone())
    }

    pub fn create(&self, draft: PostDraft) -> Post {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let now = Utc::now();
        let post = Post {
            id,
            title: draft.title,
            content: draft.content,
            created_at: now,
            updated_at: now,
        };
        self.posts.insert(id, post.clone());
        post
    }

    // None when no post with that id exists
    pub fn update(&self, id: u64, draft: PostDraft) -> Option<Post> {
        let mut entry = self.posts.get_mut(&id)?;
        entry.title = draft.title;
        entry.content = draft.content;
        entry.updated_at = Utc::now();
        Some(entry.clone())
    }

    pub fn delete(&self, id: u64) -> bool {
        self.posts.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }
}

impl Default for PostStore {
    fn default() -> Self {
        Self::new()
    }
}
