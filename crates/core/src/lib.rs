#![forbid(unsafe_code)]

//! Domain core for Defenzo: courses and lessons with derived progress,
//! badges, the weighted security score, course recommendations, and the
//! password strength checker. Pure logic only; no I/O lives here.

pub mod error;
pub mod model;
pub mod password;
pub mod recommend;
pub mod security;
pub mod time;

pub use error::Error;
pub use time::Clock;
