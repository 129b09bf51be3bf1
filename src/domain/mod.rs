//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, broadcast events)
//! - `post` - Blog post aggregate and its events

pub mod foundation;
pub mod post;
