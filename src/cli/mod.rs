//! Terminal front end

pub mod setup;
pub mod statements;
pub mod ui;
