use sea_orm::entity::prelude::*;

use crate::db::repositories::resource::ResourceTable;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub released_on: Option<String>,
    pub total_votes: Option<i32>,
    pub average_votes: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub overview: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
    pub location_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::locations::Entity",
        from = "Column::LocationId",
        to = "super::locations::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Location,
}

impl Related<super::locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ResourceTable for Entity {
    fn location_column() -> Column {
        Column::LocationId
    }

    fn order_column() -> Column {
        Column::Id
    }
}
