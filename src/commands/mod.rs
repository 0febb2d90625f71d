//! CLI sub-commands working directly on the site database

pub mod list;
pub mod new;
