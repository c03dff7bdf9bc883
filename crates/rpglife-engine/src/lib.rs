//! The rpglife progression engine.
//!
//! Each operation is one read-modify-write against a [`Storage`] backend:
//! read the user's stats and aggregates, decide with the pure rules in
//! `rpglife-core`, write the mutation, then evaluate achievements. The whole
//! chain runs inside a single storage transaction, so a rejection or a
//! failure leaves nothing behind.

pub mod achievements;
pub mod categories;
pub mod context;
pub mod dashboard;
pub mod economy;
pub mod error;
pub mod tasks;

pub use achievements::AchievementSummary;
pub use categories::CategoryDraft;
pub use context::ActionContext;
pub use dashboard::{Analytics, Dashboard};
pub use economy::{ConversionOutcome, RedemptionOutcome, RewardDraft};
pub use error::{EngineError, Result};
pub use tasks::{CompletionOutcome, TaskDraft};

pub use rpglife_core::gating::FeatureStatus;

use rpglife_storage::{Storage, StorageError, Transaction};

/// Entry point for every progression operation.
#[derive(Clone, Copy)]
pub struct Engine<'a> {
    store: &'a dyn Storage,
}

impl<'a> Engine<'a> {
    pub fn new(store: &'a dyn Storage) -> Self {
        Self { store }
    }

    /// The backing store, for plain reads that need no engine logic.
    pub fn store(&self) -> &'a dyn Storage {
        self.store
    }

    /// Runs `op` in one storage transaction.
    ///
    /// Storage errors abort the transaction as usual. A rejection (any other
    /// [`EngineError`]) also rolls back, and is returned to the caller in
    /// place of the rollback error.
    pub(crate) fn in_transaction<T>(
        &self,
        mut op: impl FnMut(&dyn Transaction) -> Result<T>,
    ) -> Result<T> {
        let mut outcome: Option<Result<T>> = None;

        let committed = self.store.run_in_transaction(&mut |tx: &dyn Transaction| {
            match op(tx) {
                Ok(value) => {
                    outcome = Some(Ok(value));
                    Ok(())
                }
                Err(EngineError::Storage(e)) => Err(e),
                Err(rejection) => {
                    outcome = Some(Err(rejection));
                    Err(StorageError::Transaction("rejected".into()))
                }
            }
        });

        match (committed, outcome) {
            (Ok(()), Some(result)) => result,
            (Err(_), Some(Err(rejection))) => Err(rejection),
            (Err(e), _) => Err(e.into()),
            (Ok(()), None) => Err(StorageError::Transaction(
                "transaction committed without a result".into(),
            )
            .into()),
        }
    }
}

impl std::fmt::Debug for Engine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}
