//! Application services layer.

pub mod feeds;
pub mod pagination;
pub mod posts;
pub mod repos;
pub mod social;
