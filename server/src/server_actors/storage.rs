use crate::lifecycle::engine::{self, Applied};
use actix::prelude::*;
use colored::Color;
use common::bimap::BiMap;
use common::errors::TransitionError;
use common::logger::Logger;
use common::messages::{
    ClaimOrder, GetAvailableOrders, GetOrder, GetShipper, InsertOrder, RegisterShipper,
};
use common::types::dtos::{OrderDTO, ShipperDTO};
use common::types::order_status::OrderStatus;
use common::types::role::Role;
use std::collections::HashMap;
use std::time::SystemTime;

/// Server-internal: one transition request, run to completion inside the
/// storage mailbox. Carrying the engine call into the handler keeps the
/// load-check-write a single step, so racing requests for the same order
/// queue behind each other instead of overwriting each other's reads.
#[derive(Message, Debug, Clone)]
#[rtype(result = "Result<(OrderDTO, Applied), TransitionError>")]
pub struct ApplyTransition {
    pub order_id: u64,
    pub role: Role,
    pub actor_id: String,
    pub target: OrderStatus,
    pub reason: Option<String>,
}

/// Server-internal: destination correction, run inside the storage mailbox
/// for the same reason as [`ApplyTransition`].
#[derive(Message, Debug, Clone)]
#[rtype(result = "Result<OrderDTO, TransitionError>")]
pub struct ApplyAddressCorrection {
    pub order_id: u64,
    pub receiver_name: String,
    pub ship_address: String,
    pub phone_number: String,
}

/// The `Storage` actor owns all order and shipper state. Every mutation is a
/// single message handler, so the actor mailbox serializes them: the shipper
/// claim in particular is a conditional write with exactly one winner, with
/// no locking beyond the mailbox itself.
pub struct Storage {
    /// All orders by ID.
    pub orders: HashMap<u64, OrderDTO>,
    /// All registered shippers by ID.
    pub shippers: HashMap<String, ShipperDTO>,
    /// Live order-to-shipper assignments, queryable from both sides.
    pub active_assignments: BiMap<u64, String>,
    /// Next order ID to hand out.
    pub next_order_id: u64,
    /// Logger for storage events.
    pub logger: Logger,
}

impl Storage {
    pub fn new() -> Self {
        Self {
            orders: HashMap::new(),
            shippers: HashMap::new(),
            active_assignments: BiMap::new(),
            next_order_id: 1,
            logger: Logger::new("Storage", Color::White),
        }
    }

    /// Drops the live assignment for a closed order and frees its shipper.
    fn release_assignment(&mut self, order_id: u64) {
        if let Some(shipper_id) = self.active_assignments.remove_by_key(&order_id) {
            if let Some(shipper) = self.shippers.get_mut(&shipper_id) {
                if shipper.current_order == Some(order_id) {
                    shipper.current_order = None;
                }
            }
            self.logger
                .info(format!("Shipper {} released from order {}", shipper_id, order_id));
        }
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for Storage {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        self.logger.info("Storage started");
    }
}

/// Inserts a new order, assigning it the next ID.
impl Handler<InsertOrder> for Storage {
    type Result = u64;

    fn handle(&mut self, msg: InsertOrder, _ctx: &mut Self::Context) -> Self::Result {
        let order_id = self.next_order_id;
        self.next_order_id += 1;
        let mut order = msg.order;
        order.order_id = order_id;
        self.logger.info(format!(
            "Order {} added for customer {} (total {})",
            order_id, order.customer_id, order.total
        ));
        self.orders.insert(order_id, order);
        order_id
    }
}

/// Handles requests to get an order by ID.
impl Handler<GetOrder> for Storage {
    type Result = MessageResult<GetOrder>;

    fn handle(&mut self, msg: GetOrder, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.orders.get(&msg.order_id).cloned())
    }
}

/// Runs one transition through the engine against the stored order itself.
/// The denial paths leave the order untouched; a mutation that lands in a
/// terminal state also frees the assigned shipper.
impl Handler<ApplyTransition> for Storage {
    type Result = MessageResult<ApplyTransition>;

    fn handle(&mut self, msg: ApplyTransition, _ctx: &mut Self::Context) -> Self::Result {
        let Some(order) = self.orders.get_mut(&msg.order_id) else {
            return MessageResult(Err(TransitionError::ValidationError(format!(
                "unknown order {}",
                msg.order_id
            ))));
        };
        let applied = match engine::apply_transition(
            order,
            msg.role,
            &msg.actor_id,
            msg.target,
            msg.reason.as_deref(),
            SystemTime::now(),
        ) {
            Ok(applied) => applied,
            Err(err) => return MessageResult(Err(err)),
        };
        let snapshot = order.clone();
        if applied == Applied::Mutated {
            self.logger.info(format!(
                "Order {} now {} / {}",
                snapshot.order_id, snapshot.order_status, snapshot.delivery_status
            ));
            if snapshot.is_terminal() {
                self.release_assignment(msg.order_id);
            }
        }
        MessageResult(Ok((snapshot, applied)))
    }
}

/// Corrects the destination of a stored order in place, same mailbox rules
/// as [`ApplyTransition`].
impl Handler<ApplyAddressCorrection> for Storage {
    type Result = MessageResult<ApplyAddressCorrection>;

    fn handle(&mut self, msg: ApplyAddressCorrection, _ctx: &mut Self::Context) -> Self::Result {
        let Some(order) = self.orders.get_mut(&msg.order_id) else {
            return MessageResult(Err(TransitionError::ValidationError(format!(
                "unknown order {}",
                msg.order_id
            ))));
        };
        match engine::correct_address(
            order,
            &msg.receiver_name,
            &msg.ship_address,
            &msg.phone_number,
        ) {
            Ok(()) => MessageResult(Ok(order.clone())),
            Err(err) => MessageResult(Err(err)),
        }
    }
}

/// The shipper assignment claim. One handler invocation checks and writes in
/// a single step; concurrent claims for the same order queue behind it in
/// the mailbox and find it already taken.
impl Handler<ClaimOrder> for Storage {
    type Result = MessageResult<ClaimOrder>;

    fn handle(&mut self, msg: ClaimOrder, _ctx: &mut Self::Context) -> Self::Result {
        if !self.shippers.contains_key(&msg.shipper_id) {
            return MessageResult(Err(TransitionError::ValidationError(format!(
                "unknown shipper {}",
                msg.shipper_id
            ))));
        }
        // A shipper with a live assignment has to finish it first.
        if self.active_assignments.contains_value(&msg.shipper_id) {
            self.logger.warn(format!(
                "Shipper {} tried to claim order {} while already assigned",
                msg.shipper_id, msg.order_id
            ));
            return MessageResult(Err(TransitionError::ValidationError(format!(
                "shipper {} already has an active order",
                msg.shipper_id
            ))));
        }
        let Some(order) = self.orders.get_mut(&msg.order_id) else {
            return MessageResult(Err(TransitionError::ValidationError(format!(
                "unknown order {}",
                msg.order_id
            ))));
        };
        if order.is_terminal() {
            return MessageResult(Err(TransitionError::TerminalStateViolation));
        }
        if order.shipper_id.is_some() || order.delivery_status != OrderStatus::Pending {
            self.logger.info(format!(
                "Order {} already claimed, rejecting shipper {}",
                msg.order_id, msg.shipper_id
            ));
            return MessageResult(Err(TransitionError::AlreadyClaimed));
        }

        order.shipper_id = Some(msg.shipper_id.clone());
        order.delivery_status = OrderStatus::Confirmed;
        let claimed = order.clone();
        self.active_assignments
            .insert(msg.order_id, msg.shipper_id.clone());
        if let Some(shipper) = self.shippers.get_mut(&msg.shipper_id) {
            shipper.current_order = Some(msg.order_id);
        }
        self.logger.info(format!(
            "Order {} claimed by shipper {} ({} live assignments)",
            msg.order_id,
            msg.shipper_id,
            self.active_assignments.len()
        ));
        MessageResult(Ok(claimed))
    }
}

/// Handles requests for the claimable pool: unassigned orders whose
/// `delivery_status` is still `Pending`.
impl Handler<GetAvailableOrders> for Storage {
    type Result = MessageResult<GetAvailableOrders>;

    fn handle(&mut self, _msg: GetAvailableOrders, _ctx: &mut Self::Context) -> Self::Result {
        let pool: Vec<OrderDTO> = self
            .orders
            .values()
            .filter(|o| {
                o.shipper_id.is_none()
                    && o.delivery_status == OrderStatus::Pending
                    && !o.is_terminal()
            })
            .cloned()
            .collect();
        MessageResult(pool)
    }
}

/// Handles registering a shipper.
impl Handler<RegisterShipper> for Storage {
    type Result = ();

    fn handle(&mut self, msg: RegisterShipper, _ctx: &mut Self::Context) -> Self::Result {
        self.logger
            .info(format!("Shipper registered: {}", msg.shipper.shipper_id));
        self.shippers
            .insert(msg.shipper.shipper_id.clone(), msg.shipper);
    }
}

/// Handles requests to get a shipper by ID.
impl Handler<GetShipper> for Storage {
    type Result = MessageResult<GetShipper>;

    fn handle(&mut self, msg: GetShipper, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.shippers.get(&msg.shipper_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::engine::tests::order_in;
    use common::types::order_status::OrderStatus::*;

    fn shipper(id: &str) -> ShipperDTO {
        ShipperDTO {
            shipper_id: id.to_string(),
            fullname: format!("Shipper {}", id),
            phone: "0900000000".to_string(),
            current_order: None,
        }
    }

    async fn seeded_storage(shippers: &[&str]) -> Addr<Storage> {
        let storage = Storage::new().start();
        for id in shippers {
            storage
                .send(RegisterShipper { shipper: shipper(id) })
                .await
                .unwrap();
        }
        storage
    }

    #[actix_rt::test]
    async fn insert_assigns_sequential_ids() {
        let storage = seeded_storage(&[]).await;
        let a = storage
            .send(InsertOrder { order: order_in(Pending, Pending, None) })
            .await
            .unwrap();
        let b = storage
            .send(InsertOrder { order: order_in(Pending, Pending, None) })
            .await
            .unwrap();
        assert_eq!(b, a + 1);
        let loaded = storage.send(GetOrder { order_id: a }).await.unwrap().unwrap();
        assert_eq!(loaded.order_id, a);
    }

    #[actix_rt::test]
    async fn concurrent_claims_have_exactly_one_winner() {
        let shipper_ids = ["s1", "s2", "s3", "s4", "s5"];
        let storage = seeded_storage(&shipper_ids).await;
        let order_id = storage
            .send(InsertOrder { order: order_in(Pending, Pending, None) })
            .await
            .unwrap();

        // Fire all claims before awaiting any of them.
        let claims: Vec<_> = shipper_ids
            .iter()
            .map(|id| {
                storage.send(ClaimOrder {
                    order_id,
                    shipper_id: id.to_string(),
                })
            })
            .collect();

        let mut winners = Vec::new();
        let mut losers = 0;
        for claim in claims {
            match claim.await.unwrap() {
                Ok(order) => winners.push(order),
                Err(TransitionError::AlreadyClaimed) => losers += 1,
                Err(other) => panic!("unexpected claim error: {:?}", other),
            }
        }
        assert_eq!(winners.len(), 1);
        assert_eq!(losers, shipper_ids.len() - 1);

        let stored = storage
            .send(GetOrder { order_id })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.shipper_id, winners[0].shipper_id);
        assert_eq!(stored.delivery_status, Confirmed);
    }

    #[actix_rt::test]
    async fn busy_shipper_cannot_claim_a_second_order() {
        let storage = seeded_storage(&["s1"]).await;
        let first = storage
            .send(InsertOrder { order: order_in(Pending, Pending, None) })
            .await
            .unwrap();
        let second = storage
            .send(InsertOrder { order: order_in(Pending, Pending, None) })
            .await
            .unwrap();

        storage
            .send(ClaimOrder { order_id: first, shipper_id: "s1".to_string() })
            .await
            .unwrap()
            .unwrap();
        let denied = storage
            .send(ClaimOrder { order_id: second, shipper_id: "s1".to_string() })
            .await
            .unwrap();
        assert!(matches!(denied, Err(TransitionError::ValidationError(_))));
    }

    #[actix_rt::test]
    async fn unknown_shipper_and_order_are_rejected() {
        let storage = seeded_storage(&["s1"]).await;
        let no_shipper = storage
            .send(ClaimOrder { order_id: 1, shipper_id: "ghost".to_string() })
            .await
            .unwrap();
        assert!(matches!(no_shipper, Err(TransitionError::ValidationError(_))));

        let no_order = storage
            .send(ClaimOrder { order_id: 99, shipper_id: "s1".to_string() })
            .await
            .unwrap();
        assert!(matches!(no_order, Err(TransitionError::ValidationError(_))));
    }

    #[actix_rt::test]
    async fn pool_excludes_claimed_and_cancelled_orders() {
        let storage = seeded_storage(&["s1"]).await;
        let open = storage
            .send(InsertOrder { order: order_in(Pending, Pending, None) })
            .await
            .unwrap();
        let claimed = storage
            .send(InsertOrder { order: order_in(Pending, Pending, None) })
            .await
            .unwrap();
        storage
            .send(ClaimOrder { order_id: claimed, shipper_id: "s1".to_string() })
            .await
            .unwrap()
            .unwrap();
        storage
            .send(InsertOrder { order: order_in(Cancelled, Cancelled, None) })
            .await
            .unwrap();

        let pool = storage.send(GetAvailableOrders).await.unwrap();
        let ids: Vec<u64> = pool.iter().map(|o| o.order_id).collect();
        assert_eq!(ids, vec![open]);
    }

    #[actix_rt::test]
    async fn delivered_order_frees_the_shipper() {
        let storage = seeded_storage(&["s1"]).await;
        let order_id = storage
            .send(InsertOrder { order: order_in(Ready, Pending, None) })
            .await
            .unwrap();
        storage
            .send(ClaimOrder { order_id, shipper_id: "s1".to_string() })
            .await
            .unwrap()
            .unwrap();

        for step in [PickedUp, Delivering, Delivered] {
            storage
                .send(ApplyTransition {
                    order_id,
                    role: Role::Shipper,
                    actor_id: "s1".to_string(),
                    target: step,
                    reason: None,
                })
                .await
                .unwrap()
                .unwrap();
        }

        let shipper = storage
            .send(GetShipper { shipper_id: "s1".to_string() })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(shipper.current_order, None);

        // Freed shipper can claim again.
        let next = storage
            .send(InsertOrder { order: order_in(Pending, Pending, None) })
            .await
            .unwrap();
        assert!(storage
            .send(ClaimOrder { order_id: next, shipper_id: "s1".to_string() })
            .await
            .unwrap()
            .is_ok());
    }

    #[actix_rt::test]
    async fn cancel_blocks_a_concurrent_forward_step() {
        let storage = seeded_storage(&[]).await;
        let order_id = storage
            .send(InsertOrder { order: order_in(Pending, Pending, None) })
            .await
            .unwrap();

        // Fire both before awaiting either; the mailbox serializes them.
        let cancel_req = storage.send(ApplyTransition {
            order_id,
            role: Role::Customer,
            actor_id: "c1".to_string(),
            target: Cancelled,
            reason: Some("changed mind".to_string()),
        });
        let confirm_req = storage.send(ApplyTransition {
            order_id,
            role: Role::Store,
            actor_id: "st1".to_string(),
            target: Confirmed,
            reason: None,
        });

        let (cancelled, applied) = cancel_req.await.unwrap().unwrap();
        assert_eq!(applied, Applied::Mutated);
        assert_eq!(cancelled.order_status, Cancelled);
        // The confirm ran against the cancelled row, not a stale read.
        assert!(matches!(
            confirm_req.await.unwrap(),
            Err(TransitionError::TerminalStateViolation)
        ));

        let stored = storage.send(GetOrder { order_id }).await.unwrap().unwrap();
        assert_eq!(stored.order_status, Cancelled);
        assert_eq!(stored.delivery_status, Cancelled);
        assert!(stored.confirmed_date.is_none());
    }
}
