#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod catalog;
pub(crate) mod clients;
pub mod config;
pub mod digest;
pub mod observability;
pub mod pipeline;
pub mod profile;
pub mod taxonomy;
pub mod util;
