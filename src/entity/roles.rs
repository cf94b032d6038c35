use sea_orm::entity::prelude::*;

// Role names are stored already prefixed ("ROLE_ADMIN"), seeded by the seed
// binary. Nothing concatenates a prefix at query time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "role")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "role_id")]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub role_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_account_roles::Entity")]
    UserAccountRoles,
}

impl Related<super::user_account_roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserAccountRoles.def()
    }
}

impl Related<super::user_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_account_roles::Relation::UserAccounts.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::user_account_roles::Relation::Roles.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
