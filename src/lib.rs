//! Tribuna: a small blogging platform with topical groups, comments, and
//! follow-based personal feeds.
//!
//! Layering: `domain` holds entities and invariants, `application` holds the
//! feed/social services and repository seams, `cache` holds the global
//! timeline cache, and `infra` holds the Postgres and HTTP adapters.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
