//! Data models for the study sheet application.
//!
//! These models define the JSON contract shared by the server and the sync client.

mod seed;
mod sheet;
mod user;

pub use seed::*;
pub use sheet::*;
pub use user::*;
