use sea_orm::entity::prelude::*;

// Brand names are a business key: uniqueness is checked at the service layer
// and backed by a unique index. Row identity is always the generated id.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "brand")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "brand_id")]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub brand_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_brands::Entity")]
    ProductBrands,
}

impl Related<super::product_brands::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductBrands.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_brands::Relation::Products.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::product_brands::Relation::Brands.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
