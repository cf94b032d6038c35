use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// A discount row never computes an order's discount_amount; that stays an
// explicit input to the pricing recalculation (see pricing::DiscountPolicy).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "discount")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "discount_id")]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub discount_code: String,
    pub discount_type: DiscountType,
    pub description: Option<String>,
    pub start_at: DateTimeWithTimeZone,
    pub end_at: DateTimeWithTimeZone,
    // null = unlimited uses
    pub quantity: Option<i32>,
    pub is_available: bool,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    #[sea_orm(string_value = "PERCENT")]
    Percent,
    #[sea_orm(string_value = "FIXED_AMOUNT")]
    FixedAmount,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::discount_orders::Entity")]
    DiscountOrders,
}

impl Related<super::discount_orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiscountOrders.def()
    }
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        super::discount_orders::Relation::Orders.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::discount_orders::Relation::Discounts.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
