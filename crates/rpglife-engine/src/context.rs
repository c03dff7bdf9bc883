//! Request-scoped context passed into every engine operation.

use chrono::{Local, NaiveDate};

/// Who is acting, and what calendar day it is for them.
///
/// The engine never reads the clock itself. Callers decide what "today"
/// means (usually the local date) so streak behavior is reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionContext {
    pub user_id: i64,
    pub today: NaiveDate,
}

impl ActionContext {
    pub fn new(user_id: i64, today: NaiveDate) -> Self {
        Self { user_id, today }
    }

    /// Context for `user_id` dated with the local calendar day.
    pub fn now(user_id: i64) -> Self {
        Self::new(user_id, Local::now().date_naive())
    }
}
