use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub purchase_event_id: Uuid,
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub line_no: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchase_events::Entity",
        from = "Column::PurchaseEventId",
        to = "super::purchase_events::Column::Id",
        on_delete = "Cascade"
    )]
    PurchaseEvents,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_delete = "SetNull"
    )]
    Products,
}

impl Related<super::purchase_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseEvents.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
