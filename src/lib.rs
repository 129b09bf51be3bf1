//! rest-ws - Blog post API with a live WebSocket feed.
//!
//! Posts are managed over REST. Every newly created post is pushed to all
//! connected WebSocket clients through a single broadcast hub.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
