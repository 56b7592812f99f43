use crate::lifecycle::{engine::Applied, pricing};
use crate::server_actors::storage::{ApplyAddressCorrection, ApplyTransition, Storage};
use actix::fut::wrap_future;
use actix::prelude::*;
use colored::Color;
use common::constants::{MAX_ITEM_QUANTITY, MIN_ITEM_QUANTITY};
use common::errors::TransitionError;
use common::logger::Logger;
use common::messages::{
    ClaimOrder, CorrectAddress, GetAvailableOrders, GetOrder, InsertOrder, OrderUpdated,
    PlaceOrder, RequestTransition, Subscribe,
};
use common::types::dtos::OrderDTO;
use common::types::order_status::OrderStatus;
use std::time::SystemTime;

/// The `OrderService` actor is the lifecycle engine's front door:
/// 1. Validates and prices new orders before handing them to `Storage`.
/// 2. Runs every transition request through the gate and the engine.
/// 3. Forwards claims to `Storage`, where the conditional write lives.
/// 4. Fires `OrderUpdated` to subscribers after every committed mutation.
pub struct OrderService {
    pub storage: Addr<Storage>,
    pub subscribers: Vec<Recipient<OrderUpdated>>,
    pub logger: Logger,
}

impl OrderService {
    pub fn new(storage: Addr<Storage>) -> Self {
        Self {
            storage,
            subscribers: Vec::new(),
            logger: Logger::new("OrderService", Color::Cyan),
        }
    }

    /// Fire-and-forget: the engine never waits on UI-side listeners.
    fn notify_subscribers(&self, order: &OrderDTO) {
        for subscriber in &self.subscribers {
            subscriber.do_send(OrderUpdated {
                order: order.clone(),
            });
        }
    }
}

impl Actor for OrderService {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        self.logger.info("OrderService started");
    }
}

fn validate_new_order(msg: &PlaceOrder) -> Result<(), TransitionError> {
    if msg.items.is_empty() {
        return Err(TransitionError::ValidationError(
            "an order needs at least one item".to_string(),
        ));
    }
    for item in &msg.items {
        if item.quantity < MIN_ITEM_QUANTITY || item.quantity > MAX_ITEM_QUANTITY {
            return Err(TransitionError::ValidationError(format!(
                "quantity {} for {} is outside {}..={}",
                item.quantity, item.food_id, MIN_ITEM_QUANTITY, MAX_ITEM_QUANTITY
            )));
        }
        if item.unit_price < 0 {
            return Err(TransitionError::ValidationError(format!(
                "negative unit price for {}",
                item.food_id
            )));
        }
    }
    if msg.shipping_fee < 0 {
        return Err(TransitionError::ValidationError(
            "shipping fee must not be negative".to_string(),
        ));
    }
    if msg.receiver_name.trim().is_empty()
        || msg.ship_address.trim().is_empty()
        || msg.phone_number.trim().is_empty()
    {
        return Err(TransitionError::ValidationError(
            "receiver name, address and phone must not be blank".to_string(),
        ));
    }
    Ok(())
}

/// Creates an order from a cart snapshot: validate, price once, persist as
/// `(Pending, Pending, no shipper)`.
impl Handler<PlaceOrder> for OrderService {
    type Result = ResponseActFuture<Self, Result<OrderDTO, TransitionError>>;

    fn handle(&mut self, msg: PlaceOrder, _ctx: &mut Self::Context) -> Self::Result {
        if let Err(err) = validate_new_order(&msg) {
            self.logger.warn(format!("Order rejected: {}", err));
            return Box::pin(actix::fut::ready(Err(err)));
        }

        let totals = pricing::compute_totals(&msg.items, msg.shipping_fee, &msg.promotions);
        for promo_id in &totals.dropped {
            self.logger.info(format!(
                "Promotion {} dropped: minimum order not met",
                promo_id
            ));
        }

        let order = OrderDTO {
            order_id: 0, // storage assigns the real one
            customer_id: msg.customer_id,
            store_id: msg.store_id,
            shipper_id: None,
            items: msg.items,
            order_status: OrderStatus::Pending,
            delivery_status: OrderStatus::Pending,
            subtotal: totals.subtotal,
            shipping_fee: msg.shipping_fee,
            discount_amount: totals.discount,
            total: totals.total,
            cancel_reason: None,
            cancelled_by_role: None,
            receiver_name: msg.receiver_name,
            ship_address: msg.ship_address,
            phone_number: msg.phone_number,
            created_date: SystemTime::now(),
            confirmed_date: None,
            preparing_date: None,
            ready_date: None,
            picked_up_date: None,
            delivering_date: None,
            delivered_date: None,
            cancelled_date: None,
        };

        let storage = self.storage.clone();
        let fut = async move {
            let order_id = storage
                .send(InsertOrder {
                    order: order.clone(),
                })
                .await
                .expect("storage mailbox closed");
            OrderDTO { order_id, ..order }
        };
        Box::pin(wrap_future::<_, Self>(fut).map(|order, act: &mut Self, _ctx| {
            act.logger.info(format!(
                "Order {} placed: subtotal {} + shipping {} - discount {} = {}",
                order.order_id, order.subtotal, order.shipping_fee, order.discount_amount,
                order.total
            ));
            act.notify_subscribers(&order);
            Ok(order)
        }))
    }
}

/// Runs one transition request through the engine inside the storage
/// mailbox, so load-validate-apply-persist is one atomic step there. Two
/// racing requests for the same order serialize; the loser is judged
/// against the state the winner committed, never against a stale read.
/// A denial mutates nothing and carries its reason back.
impl Handler<RequestTransition> for OrderService {
    type Result = ResponseActFuture<Self, Result<OrderDTO, TransitionError>>;

    fn handle(&mut self, msg: RequestTransition, _ctx: &mut Self::Context) -> Self::Result {
        let storage = self.storage.clone();
        let (role, target) = (msg.role, msg.target);
        let fut = async move {
            storage
                .send(ApplyTransition {
                    order_id: msg.order_id,
                    role: msg.role,
                    actor_id: msg.actor_id,
                    target: msg.target,
                    reason: msg.reason,
                })
                .await
                .expect("storage mailbox closed")
        };
        Box::pin(
            wrap_future::<_, Self>(fut).map(move |res, act: &mut Self, _ctx| match res {
                Ok((order, Applied::Mutated)) => {
                    act.logger.info(format!(
                        "Order {}: {} set {} (now {} / {})",
                        order.order_id, role, target, order.order_status, order.delivery_status
                    ));
                    act.notify_subscribers(&order);
                    Ok(order)
                }
                Ok((order, Applied::NoOp)) => {
                    act.logger.info(format!(
                        "Order {}: duplicate cancel by {} ignored",
                        order.order_id, role
                    ));
                    Ok(order)
                }
                Err(err) => {
                    act.logger.warn(format!("Transition denied: {}", err));
                    Err(err)
                }
            }),
        )
    }
}

/// Forwards the claim to `Storage` (the only true mutual exclusion in the
/// subsystem) and notifies subscribers when it wins.
impl Handler<ClaimOrder> for OrderService {
    type Result = ResponseActFuture<Self, Result<OrderDTO, TransitionError>>;

    fn handle(&mut self, msg: ClaimOrder, _ctx: &mut Self::Context) -> Self::Result {
        let storage = self.storage.clone();
        let fut = async move { storage.send(msg).await.expect("storage mailbox closed") };
        Box::pin(wrap_future::<_, Self>(fut).map(|res, act: &mut Self, _ctx| {
            match &res {
                Ok(order) => {
                    act.logger.info(format!(
                        "Order {} claimed by shipper {}",
                        order.order_id,
                        order.shipper_id.as_deref().unwrap_or("?")
                    ));
                    act.notify_subscribers(order);
                }
                Err(err) => act.logger.warn(format!("Claim rejected: {}", err)),
            }
            res
        }))
    }
}

/// Corrects the destination snapshot of a still-Pending order. The check
/// and the write run inside the storage mailbox: a correction racing a
/// confirmation cannot land on the confirmed order.
impl Handler<CorrectAddress> for OrderService {
    type Result = ResponseActFuture<Self, Result<OrderDTO, TransitionError>>;

    fn handle(&mut self, msg: CorrectAddress, _ctx: &mut Self::Context) -> Self::Result {
        let storage = self.storage.clone();
        let fut = async move {
            storage
                .send(ApplyAddressCorrection {
                    order_id: msg.order_id,
                    receiver_name: msg.receiver_name,
                    ship_address: msg.ship_address,
                    phone_number: msg.phone_number,
                })
                .await
                .expect("storage mailbox closed")
        };
        Box::pin(wrap_future::<_, Self>(fut).map(|res, act: &mut Self, _ctx| match res {
            Ok(order) => {
                act.logger
                    .info(format!("Order {}: destination corrected", order.order_id));
                act.notify_subscribers(&order);
                Ok(order)
            }
            Err(err) => {
                act.logger.warn(format!("Address correction denied: {}", err));
                Err(err)
            }
        }))
    }
}

/// Read-through to storage for one order.
impl Handler<GetOrder> for OrderService {
    type Result = ResponseFuture<Option<OrderDTO>>;

    fn handle(&mut self, msg: GetOrder, _ctx: &mut Self::Context) -> Self::Result {
        let storage = self.storage.clone();
        Box::pin(async move { storage.send(msg).await.expect("storage mailbox closed") })
    }
}

/// Read-through to storage for the claimable pool.
impl Handler<GetAvailableOrders> for OrderService {
    type Result = ResponseFuture<Vec<OrderDTO>>;

    fn handle(&mut self, msg: GetAvailableOrders, _ctx: &mut Self::Context) -> Self::Result {
        let storage = self.storage.clone();
        Box::pin(async move { storage.send(msg).await.expect("storage mailbox closed") })
    }
}

/// Registers a UI-side listener for order updates.
impl Handler<Subscribe> for OrderService {
    type Result = ();

    fn handle(&mut self, msg: Subscribe, _ctx: &mut Self::Context) -> Self::Result {
        self.logger.info("Subscriber registered");
        self.subscribers.push(msg.recipient);
    }
}
