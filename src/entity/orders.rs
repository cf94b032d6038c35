use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Invariant: final_price = max(0, original_price - discount_amount). The
// order service recomputes it inside the same transaction as any mutation of
// original_price, discount_amount, the item set, or the discount set.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "order_id")]
    pub id: Uuid,
    pub user_account_id: Uuid,
    pub user_address_id: Uuid,
    pub shipping_unit_id: Option<Uuid>,
    pub original_price: Decimal,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
    pub order_status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "CONFIRMED")]
    Confirmed,
    #[sea_orm(string_value = "SHIPPING")]
    Shipping,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
    #[sea_orm(string_value = "RETURNED")]
    Returned,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "COD")]
    Cod,
    #[sea_orm(string_value = "BANK_TRANSFER")]
    BankTransfer,
    #[sea_orm(string_value = "CREDIT_CARD")]
    CreditCard,
    #[sea_orm(string_value = "EWALLET")]
    Ewallet,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_accounts::Entity",
        from = "Column::UserAccountId",
        to = "super::user_accounts::Column::Id"
    )]
    UserAccounts,
    #[sea_orm(
        belongs_to = "super::user_addresses::Entity",
        from = "Column::UserAddressId",
        to = "super::user_addresses::Column::Id"
    )]
    UserAddresses,
    #[sea_orm(
        belongs_to = "super::shipping_units::Entity",
        from = "Column::ShippingUnitId",
        to = "super::shipping_units::Column::Id"
    )]
    ShippingUnits,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
    #[sea_orm(has_many = "super::discount_orders::Entity")]
    DiscountOrders,
}

impl Related<super::user_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserAccounts.def()
    }
}

impl Related<super::user_addresses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserAddresses.def()
    }
}

impl Related<super::shipping_units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShippingUnits.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::discounts::Entity> for Entity {
    fn to() -> RelationDef {
        super::discount_orders::Relation::Discounts.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::discount_orders::Relation::Orders.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
