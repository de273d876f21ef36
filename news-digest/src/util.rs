pub(crate) mod redact;
pub mod text;
pub mod time;
