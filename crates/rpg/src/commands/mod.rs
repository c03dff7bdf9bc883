//! Command handlers, one module per top-level subcommand.

pub mod achievements;
pub mod analytics;
pub mod category;
pub mod completion;
pub mod convert;
pub mod init;
pub mod ledger;
pub mod reward;
pub mod status;
pub mod task;
pub mod user;
pub mod version;
