mod loan;
mod member;
mod title;

pub use self::{loan::*, member::*, title::*};
use error_stack::Report;
use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::prelude::entity::{Loan, LoanId, Member, MemberId, Title, TitleId};
use kernel::KernelError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default)]
pub(in crate::database) struct Store {
    titles: HashMap<TitleId, Title>,
    members: HashMap<MemberId, Member>,
    loans: HashMap<LoanId, Loan>,
}

/// Process-local store. Only one transaction is open at a time; it works on a
/// private copy of the store that replaces the shared one on commit.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    store: Arc<Mutex<Store>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;
    async fn transact(&self) -> error_stack::Result<InMemoryTransaction, KernelError> {
        let guard = tokio::time::timeout(LOCK_TIMEOUT, self.store.clone().lock_owned())
            .await
            .map_err(|_| {
                Report::new(KernelError::Timeout)
                    .attach_printable("in-memory store stayed locked by another transaction")
            })?;
        let working = guard.clone();
        Ok(InMemoryTransaction { guard, working })
    }
}

pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<Store>,
    working: Store,
}

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let Self { mut guard, working } = self;
        *guard = working;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

fn duplicated(kind: &str, id: impl std::fmt::Display) -> Report<KernelError> {
    Report::new(KernelError::Concurrency).attach_printable(format!("{kind} {id} already exists"))
}

fn missing(kind: &str, id: impl std::fmt::Display) -> Report<KernelError> {
    Report::new(KernelError::NotFound).attach_printable(format!("{kind} {id} does not exist"))
}
