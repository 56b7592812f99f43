mod lifecycle;
mod server_actors;

use crate::server_actors::services::orders_service::OrderService;
use crate::server_actors::storage::Storage;
use actix::prelude::*;
use colored::Color;
use common::constants::DEMO_SHIPPING_FEE;
use common::logger::Logger;
use common::messages::{
    ClaimOrder, GetAvailableOrders, PlaceOrder, RegisterShipper, RequestTransition,
};
use common::types::dtos::{OrderItemDTO, ShipperDTO};
use common::types::order_status::OrderStatus;
use common::types::role::Role;
use rand::prelude::*;
use uuid::Uuid;

const DEMO_MENU: &[(&str, &str, i64)] = &[
    ("pho-bo", "Pho bo", 50_000),
    ("bun-cha", "Bun cha", 45_000),
    ("com-tam", "Com tam", 40_000),
    ("banh-mi", "Banh mi", 25_000),
];

/// Scripted happy-path run: one customer, one store, one shipper, one order
/// driven from placement to Delivered through the lifecycle engine.
#[actix::main]
async fn main() {
    let logger = Logger::new("Demo", Color::Green);
    let storage = Storage::new().start();
    let service = OrderService::new(storage.clone()).start();

    let shipper_id = format!("shipper-{}", Uuid::new_v4());
    storage
        .send(RegisterShipper {
            shipper: ShipperDTO {
                shipper_id: shipper_id.clone(),
                fullname: "Demo Shipper".to_string(),
                phone: "0987654321".to_string(),
                current_order: None,
            },
        })
        .await
        .expect("storage mailbox closed");

    let mut rng = rand::thread_rng();
    let (food_id, food_name, unit_price) = DEMO_MENU.choose(&mut rng).copied().unwrap_or(DEMO_MENU[0]);
    let order = service
        .send(PlaceOrder {
            customer_id: format!("customer-{}", Uuid::new_v4()),
            store_id: "store-1".to_string(),
            items: vec![OrderItemDTO {
                food_id: food_id.to_string(),
                food_name: food_name.to_string(),
                store_id: "store-1".to_string(),
                size: Some("L".to_string()),
                quantity: rng.gen_range(1..=3),
                unit_price,
            }],
            shipping_fee: DEMO_SHIPPING_FEE,
            promotions: vec![],
            receiver_name: "Demo Receiver".to_string(),
            ship_address: "12 Market Lane".to_string(),
            phone_number: "0912345678".to_string(),
        })
        .await
        .expect("service mailbox closed")
        .expect("demo order rejected");
    let order_id = order.order_id;

    for step in [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
    ] {
        service
            .send(RequestTransition {
                order_id,
                role: Role::Store,
                actor_id: "store-1".to_string(),
                target: step,
                reason: None,
            })
            .await
            .expect("service mailbox closed")
            .expect("store transition denied");
    }

    let pool = service
        .send(GetAvailableOrders)
        .await
        .expect("service mailbox closed");
    logger.info(format!("Claimable pool holds {} order(s)", pool.len()));

    service
        .send(ClaimOrder {
            order_id,
            shipper_id: shipper_id.clone(),
        })
        .await
        .expect("service mailbox closed")
        .expect("claim rejected");

    let mut final_order = None;
    for step in [
        OrderStatus::PickedUp,
        OrderStatus::Delivering,
        OrderStatus::Delivered,
    ] {
        let updated = service
            .send(RequestTransition {
                order_id,
                role: Role::Shipper,
                actor_id: shipper_id.clone(),
                target: step,
                reason: None,
            })
            .await
            .expect("service mailbox closed")
            .expect("shipper transition denied");
        final_order = Some(updated);
    }

    if let Some(order) = final_order {
        let rendered =
            serde_json::to_string_pretty(&order).expect("order should serialize");
        logger.info(format!("Final order state:\n{}", rendered));
    }
}
