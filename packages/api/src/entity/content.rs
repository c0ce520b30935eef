//! `SeaORM` Entity for published content (videos and PDFs)

use super::sea_orm_active_enums::ContentStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Server-generated random token, not derived from the title
    #[sea_orm(column_type = "Text", unique)]
    pub slug: String,
    pub category_id: i32,
    pub subcategory_id: Option<i32>,
    #[sea_orm(column_type = "Text")]
    pub cover_image: String,
    #[sea_orm(column_type = "Text")]
    pub file_url: String,
    #[sea_orm(column_type = "Text")]
    pub file_type: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub upload_method: Option<String>,
    /// "mm:ss", video content only
    #[sea_orm(column_type = "Text", nullable)]
    pub video_length: Option<String>,
    pub status: ContentStatus,
    pub number_of_pages: Option<i32>,
    /// Doubles as the featured flag and its ordering key; at most 4 live
    /// rows carry a value at any time
    #[sea_orm(nullable)]
    pub is_featured: Option<DateTime>,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTime,
    #[sea_orm(column_name = "updatedAt")]
    pub updated_at: DateTime,
    #[sea_orm(column_name = "deletedAt", nullable)]
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::content_translation::Entity")]
    Translations,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::SubcategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Subcategory,
    #[sea_orm(has_many = "super::video_view::Entity")]
    VideoViews,
    #[sea_orm(has_many = "super::pdf_download::Entity")]
    PdfDownloads,
}

impl Related<super::content_translation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Translations.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
