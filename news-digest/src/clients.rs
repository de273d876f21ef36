pub(crate) mod chatwork;

pub(crate) use chatwork::{ChatworkClient, ChatworkConfig};
