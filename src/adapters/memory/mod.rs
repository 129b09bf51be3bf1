//! In-memory storage adapters.

mod post_repository;

pub use post_repository::InMemoryPostRepository;
