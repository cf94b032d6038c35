use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::orders::{OrderStatus, PaymentMethod};
use crate::models::{Order, OrderItem};

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    /// Clamped to >= 1.
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub user_address_id: Uuid,
    pub shipping_unit_id: Option<Uuid>,
    pub payment_method: Option<PaymentMethod>,
    pub items: Vec<OrderItemRequest>,
    /// The store never derives this from attached discount codes; it is an
    /// explicit input (see pricing::DiscountPolicy).
    pub discount_amount: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateItemQuantityRequest {
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetDiscountAmountRequest {
    pub discount_amount: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttachDiscountRequest {
    pub discount_code: String,
    /// New total discount for the order once the code is attached.
    pub discount_amount: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub order_status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
