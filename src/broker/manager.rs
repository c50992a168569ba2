//! Lock manager state machine
//!
//! Owns every resource transition: grant, deny, queue, release, re-grant.
//! A resource is either unlocked or locked by exactly one owner; clients
//! that request a held lock are queued FIFO and answered later.
//!
//! The defining behavior is the deferred grant: a LOCK against a held
//! resource returns no reply at all. The requester's call stays outstanding
//! until a later UNLOCK pops it from the queue, at which point the
//! `LOCK_GRANTED` emitted there is the reply to the original request,
//! addressed by client identity.

use crate::broker::protocol::{Reply, Request};
use crate::broker::registry::Registry;
use crate::broker::router::ClientId;

/// The broker state machine.
///
/// Every transition is applied by the single dispatch loop, one request at a
/// time, so the manager needs no interior locking.
pub struct LockManager {
    registry: Registry,
}

impl LockManager {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Apply one request and return the addressed replies to emit.
    ///
    /// Most requests produce exactly one reply to the requester. A LOCK on a
    /// held resource produces none (deferred), and an UNLOCK with waiters
    /// produces two: `UNLOCKED` to the requester and `LOCK_GRANTED` to the
    /// next owner.
    pub fn handle(&mut self, requester: &ClientId, request: Request) -> Vec<(ClientId, Reply)> {
        match request.op.as_str() {
            "LOCK" => self.lock(requester, &request.resource),
            "WRITE" => self.write(requester, &request.resource, request.data),
            "READ" => self.read(requester, &request.resource),
            "UNLOCK" => self.unlock(requester, &request.resource),
            other => {
                tracing::warn!("Unknown operation {:?} from {}", other, requester);
                vec![(requester.clone(), Reply::UnknownOp)]
            }
        }
    }

    fn lock(&mut self, requester: &ClientId, resource: &str) -> Vec<(ClientId, Reply)> {
        let state = self.registry.get_or_create(resource);
        match &state.owner {
            None => {
                state.owner = Some(requester.clone());
                tracing::info!("Granted lock on {} to {}", resource, requester);
                vec![(requester.clone(), Reply::LockGranted)]
            }
            Some(holder) => {
                // No reply: the requester stays blocked in its call until a
                // later UNLOCK hands it the lock. A requester that already
                // owns or already queued for this resource is queued again.
                tracing::info!("Queued {} for {} (held by {})", requester, resource, holder);
                state.waiters.push_back(requester.clone());
                Vec::new()
            }
        }
    }

    fn write(
        &mut self,
        requester: &ClientId,
        resource: &str,
        data: String,
    ) -> Vec<(ClientId, Reply)> {
        let state = self.registry.get_or_create(resource);
        if state.owned_by(requester) {
            tracing::info!("{} wrote {} bytes to {}", requester, data.len(), resource);
            state.value = data;
            vec![(requester.clone(), Reply::WriteOk)]
        } else {
            tracing::warn!("Denied WRITE on {} from non-owner {}", resource, requester);
            vec![(requester.clone(), Reply::WriteDenied)]
        }
    }

    fn read(&mut self, requester: &ClientId, resource: &str) -> Vec<(ClientId, Reply)> {
        let state = self.registry.get_or_create(resource);
        if state.owned_by(requester) {
            tracing::info!("{} read from {}", requester, resource);
            vec![(requester.clone(), Reply::ReadOk(state.value.clone()))]
        } else {
            tracing::warn!("Denied READ on {} from non-owner {}", resource, requester);
            vec![(requester.clone(), Reply::ReadDenied)]
        }
    }

    fn unlock(&mut self, requester: &ClientId, resource: &str) -> Vec<(ClientId, Reply)> {
        let state = self.registry.get_or_create(resource);
        if !state.owned_by(requester) {
            tracing::warn!("Denied UNLOCK on {} from non-owner {}", resource, requester);
            return vec![(requester.clone(), Reply::UnlockDenied)];
        }

        tracing::info!("{} released {}", requester, resource);
        match state.waiters.pop_front() {
            Some(next) => {
                // Ownership transfers directly; the resource never becomes
                // unlocked in between. The grant is the deferred reply to
                // `next`'s original LOCK request.
                state.owner = Some(next.clone());
                tracing::info!("Granted lock on {} to queued client {}", resource, next);
                vec![
                    (requester.clone(), Reply::Unlocked),
                    (next, Reply::LockGranted),
                ]
            }
            None => {
                // The value is kept: later owners read what the last wrote.
                state.owner = None;
                vec![(requester.clone(), Reply::Unlocked)]
            }
        }
    }

    /// Read-only view of the resource table, for logging and tests
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for LockManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(payload: &str) -> Request {
        Request::parse(payload)
    }

    #[test]
    fn lock_on_unlocked_resource_grants_immediately() {
        let mut manager = LockManager::new();
        let a = ClientId::from("cli_a");

        let replies = manager.handle(&a, req("LOCK printer"));

        assert_eq!(replies, vec![(a.clone(), Reply::LockGranted)]);
        assert!(manager.registry().get("printer").unwrap().owned_by(&a));
    }

    #[test]
    fn lock_on_held_resource_defers_the_reply() {
        let mut manager = LockManager::new();
        let a = ClientId::from("cli_a");
        let b = ClientId::from("cli_b");
        manager.handle(&a, req("LOCK printer"));

        let replies = manager.handle(&b, req("LOCK printer"));

        assert!(replies.is_empty());
        let state = manager.registry().get("printer").unwrap();
        assert!(state.owned_by(&a));
        assert_eq!(state.waiters, [b]);
    }

    #[test]
    fn unlock_hands_off_to_waiters_in_fifo_order() {
        let mut manager = LockManager::new();
        let a = ClientId::from("cli_a");
        let b = ClientId::from("cli_b");
        let c = ClientId::from("cli_c");
        manager.handle(&a, req("LOCK db"));
        manager.handle(&b, req("LOCK db"));
        manager.handle(&c, req("LOCK db"));

        let replies = manager.handle(&a, req("UNLOCK db"));
        assert_eq!(
            replies,
            vec![(a.clone(), Reply::Unlocked), (b.clone(), Reply::LockGranted)]
        );
        assert!(manager.registry().get("db").unwrap().owned_by(&b));

        let replies = manager.handle(&b, req("UNLOCK db"));
        assert_eq!(
            replies,
            vec![(b.clone(), Reply::Unlocked), (c.clone(), Reply::LockGranted)]
        );
        assert!(manager.registry().get("db").unwrap().owned_by(&c));

        let replies = manager.handle(&c, req("UNLOCK db"));
        assert_eq!(replies, vec![(c.clone(), Reply::Unlocked)]);
        assert!(manager.registry().get("db").unwrap().is_unlocked());
    }

    #[test]
    fn write_then_read_round_trips_exact_bytes() {
        let mut manager = LockManager::new();
        let a = ClientId::from("cli_a");
        manager.handle(&a, req("LOCK cfg"));

        let replies = manager.handle(&a, req("WRITE cfg hello  spaced world"));
        assert_eq!(replies, vec![(a.clone(), Reply::WriteOk)]);

        let replies = manager.handle(&a, req("READ cfg"));
        assert_eq!(
            replies,
            vec![(a.clone(), Reply::ReadOk("hello  spaced world".to_string()))]
        );
    }

    #[test]
    fn value_survives_across_ownership_episodes() {
        let mut manager = LockManager::new();
        let a = ClientId::from("cli_a");
        let b = ClientId::from("cli_b");

        manager.handle(&a, req("LOCK cfg"));
        manager.handle(&a, req("WRITE cfg sticky"));
        manager.handle(&a, req("UNLOCK cfg"));

        // Unlocked in between; the value is still there for the next owner
        manager.handle(&b, req("LOCK cfg"));
        let replies = manager.handle(&b, req("READ cfg"));
        assert_eq!(replies, vec![(b.clone(), Reply::ReadOk("sticky".to_string()))]);
    }

    #[test]
    fn non_owner_operations_are_denied_without_mutation() {
        let mut manager = LockManager::new();
        let a = ClientId::from("cli_a");
        let c = ClientId::from("cli_c");
        manager.handle(&a, req("LOCK cfg"));
        manager.handle(&a, req("WRITE cfg original"));

        let replies = manager.handle(&c, req("WRITE cfg hijacked"));
        assert_eq!(replies, vec![(c.clone(), Reply::WriteDenied)]);

        let replies = manager.handle(&c, req("READ cfg"));
        assert_eq!(replies, vec![(c.clone(), Reply::ReadDenied)]);

        let replies = manager.handle(&c, req("UNLOCK cfg"));
        assert_eq!(replies, vec![(c.clone(), Reply::UnlockDenied)]);

        let state = manager.registry().get("cfg").unwrap();
        assert!(state.owned_by(&a));
        assert!(state.waiters.is_empty());
        assert_eq!(state.value, "original");
    }

    #[test]
    fn operations_before_any_lock_are_denied() {
        let mut manager = LockManager::new();
        let c = ClientId::from("cli_c");

        assert_eq!(
            manager.handle(&c, req("WRITE fresh data")),
            vec![(c.clone(), Reply::WriteDenied)]
        );
        assert_eq!(
            manager.handle(&c, req("READ fresh")),
            vec![(c.clone(), Reply::ReadDenied)]
        );
        assert_eq!(
            manager.handle(&c, req("UNLOCK fresh")),
            vec![(c.clone(), Reply::UnlockDenied)]
        );
        assert!(manager.registry().get("fresh").unwrap().is_unlocked());
    }

    #[test]
    fn unknown_opcode_replies_err_and_touches_nothing() {
        let mut manager = LockManager::new();
        let a = ClientId::from("cli_a");

        let replies = manager.handle(&a, req("FROB printer stuff"));

        assert_eq!(replies, vec![(a.clone(), Reply::UnknownOp)]);
        assert!(manager.registry().is_empty());
    }

    #[test]
    fn relock_by_current_owner_queues_instead_of_granting() {
        let mut manager = LockManager::new();
        let a = ClientId::from("cli_a");
        manager.handle(&a, req("LOCK cfg"));

        // Permissive by design: the owner is queued again and gets no reply
        let replies = manager.handle(&a, req("LOCK cfg"));
        assert!(replies.is_empty());
        assert_eq!(manager.registry().get("cfg").unwrap().waiters, [a.clone()]);

        // Its unlock re-grants the lock to itself
        let replies = manager.handle(&a, req("UNLOCK cfg"));
        assert_eq!(
            replies,
            vec![(a.clone(), Reply::Unlocked), (a.clone(), Reply::LockGranted)]
        );
        assert!(manager.registry().get("cfg").unwrap().owned_by(&a));
    }

    #[test]
    fn unlock_with_empty_queue_clears_owner_and_keeps_value() {
        let mut manager = LockManager::new();
        let a = ClientId::from("cli_a");
        manager.handle(&a, req("LOCK cfg"));
        manager.handle(&a, req("WRITE cfg kept"));

        let replies = manager.handle(&a, req("UNLOCK cfg"));

        assert_eq!(replies, vec![(a.clone(), Reply::Unlocked)]);
        let state = manager.registry().get("cfg").unwrap();
        assert!(state.is_unlocked());
        assert_eq!(state.value, "kept");
    }
}
