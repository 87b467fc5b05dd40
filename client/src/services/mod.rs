//! Workflows built on the request primitive and the paginator.

pub mod distributions;
pub mod promote;
pub mod push;
pub mod search;
pub mod versions;
