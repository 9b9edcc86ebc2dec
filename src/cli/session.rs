use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::{
    model::Model,
    storage::state_store::{StateHandle, StateStore},
    update::{update, Message},
    utils::clock::Clock,
};

/// Connects the stored state, the clock and the reducer. Every change is a single
/// read-update-write cycle under the store's lock.
pub struct Session<S, C> {
    store: S,
    clock: C,
}

impl<S: StateStore, C: Clock> Session<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.time()
    }

    /// Current state, read without holding the lock.
    pub async fn snapshot(&self) -> Result<Model> {
        self.store.snapshot().await
    }

    /// Runs `change` on the stored model and saves the result if it differs. The lock is held
    /// while `change` runs, so it may ask the user for input between reducer steps.
    #[instrument(skip_all)]
    pub async fn transact(
        &self,
        change: impl FnOnce(Model, DateTime<Utc>) -> Result<Model>,
    ) -> Result<Model> {
        let mut handle = self.store.open().await?;
        let result = Self::apply(&mut handle, self.clock.time(), change).await;
        handle.release().await?;
        result
    }

    /// Builds messages from the stored model and runs them through the reducer in order.
    pub async fn dispatch(
        &self,
        build: impl FnOnce(&Model) -> Result<Vec<Message>>,
    ) -> Result<Model> {
        self.transact(|model, now| {
            let messages = build(&model)?;
            Ok(messages
                .into_iter()
                .fold(model, |model, message| update(model, message, now)))
        })
        .await
    }

    async fn apply(
        handle: &mut S::Handle,
        now: DateTime<Utc>,
        change: impl FnOnce(Model, DateTime<Utc>) -> Result<Model>,
    ) -> Result<Model> {
        let model = handle.read_model().await?;
        let next = change(model.clone(), now)?;
        if next != model {
            handle.write_model(&next).await?;
        } else {
            debug!("Nothing changed, skipping save");
        }
        Ok(next)
    }
}
