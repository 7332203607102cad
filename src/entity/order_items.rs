use sea_orm::entity::prelude::*;

/// Sold line. Name, color, size and cost are frozen copies taken at
/// checkout; they are never refreshed from the catalog.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub variant_id: Uuid,
    pub name_snapshot: String,
    pub color_snapshot: Option<String>,
    pub size_snapshot: Option<String>,
    pub cost_snapshot_cent: i64,
    pub qty: i32,
    pub unit_price_cent: i64,
    pub line_total_cent: i64,
    pub line_no: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id"
    )]
    Orders,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
