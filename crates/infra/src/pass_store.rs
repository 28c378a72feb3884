use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use campusgate_core::{Aggregate, DomainError, DomainResult, GatePassId};
use campusgate_passes::{GatePass, GatePassCommand, RequestPass};

/// Gate-pass persistence abstraction.
///
/// `create` and `execute` run the aggregate's command handler under the write
/// guard, so a decision check and the state update are a single atomic step.
pub trait GatePassStore: Send + Sync {
    fn create(&self, cmd: RequestPass) -> DomainResult<GatePass>;
    fn execute(&self, id: GatePassId, cmd: GatePassCommand) -> DomainResult<GatePass>;
    fn get(&self, id: GatePassId) -> Option<GatePass>;
    fn list(&self) -> Vec<GatePass>;
}

impl<S> GatePassStore for Arc<S>
where
    S: GatePassStore + ?Sized,
{
    fn create(&self, cmd: RequestPass) -> DomainResult<GatePass> {
        (**self).create(cmd)
    }

    fn execute(&self, id: GatePassId, cmd: GatePassCommand) -> DomainResult<GatePass> {
        (**self).execute(id, cmd)
    }

    fn get(&self, id: GatePassId) -> Option<GatePass> {
        (**self).get(id)
    }

    fn list(&self) -> Vec<GatePass> {
        (**self).list()
    }
}

/// In-memory gate-pass store.
#[derive(Debug, Default)]
pub struct InMemoryGatePassStore {
    inner: RwLock<HashMap<GatePassId, GatePass>>,
}

impl InMemoryGatePassStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned() -> DomainError {
    DomainError::internal("gate pass store lock poisoned")
}

impl GatePassStore for InMemoryGatePassStore {
    fn create(&self, cmd: RequestPass) -> DomainResult<GatePass> {
        let mut map = self.inner.write().map_err(|_| lock_poisoned())?;

        if map.contains_key(&cmd.pass_id) {
            return Err(DomainError::conflict("Gate pass already exists"));
        }

        let mut pass = GatePass::empty(cmd.pass_id);
        let events = pass.handle(&GatePassCommand::Request(cmd))?;
        for event in &events {
            pass.apply(event);
        }

        map.insert(pass.id_typed(), pass.clone());
        Ok(pass)
    }

    fn execute(&self, id: GatePassId, cmd: GatePassCommand) -> DomainResult<GatePass> {
        let mut map = self.inner.write().map_err(|_| lock_poisoned())?;

        let pass = map
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Gate pass not found"))?;

        let events = pass.handle(&cmd)?;
        for event in &events {
            pass.apply(event);
        }

        Ok(pass.clone())
    }

    fn get(&self, id: GatePassId) -> Option<GatePass> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    fn list(&self) -> Vec<GatePass> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        map.values().cloned().collect()
    }
}
