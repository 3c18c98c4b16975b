use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub author: Option<String>,
    pub isbn: Option<String>,
    /// Scanner code of this physical copy. Unique per copy.
    pub barcode: String,
    /// Availability status of this copy.
    /// Valid values:
    /// - `available`: On shelf, can be borrowed
    /// - `borrowed`: Currently out (has an active borrowing)
    /// - `reserved`: Held for a member
    /// - `damaged`: Pulled for repair
    /// - `lost`: Declared lost
    pub status: String,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub call_number: Option<String>,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub language: Option<String>,
    pub pages: Option<i32>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub acquisition_date: Option<String>,
    pub acquisition_method: Option<String>,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::active_borrowing::Entity")]
    ActiveBorrowings,
    #[sea_orm(has_many = "super::borrow_record::Entity")]
    BorrowRecords,
    #[sea_orm(has_many = "super::book_label::Entity")]
    Labels,
}

impl Related<super::active_borrowing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActiveBorrowings.def()
    }
}

impl Related<super::borrow_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BorrowRecords.def()
    }
}

impl Related<super::book_label::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Labels.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDto {
    pub id: Option<i32>,
    pub title: String,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub barcode: String,
    pub status: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub call_number: Option<String>,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub language: Option<String>,
    pub pages: Option<i32>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub acquisition_date: Option<String>,
    pub acquisition_method: Option<String>,
    pub price: Option<f64>,
    pub notes: Option<String>,
}

impl From<Model> for BookDto {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            title: model.title,
            author: model.author,
            isbn: model.isbn,
            barcode: model.barcode,
            status: Some(model.status),
            category: model.category,
            sub_category: model.sub_category,
            call_number: model.call_number,
            publisher: model.publisher,
            publication_year: model.publication_year,
            language: model.language,
            pages: model.pages,
            description: model.description,
            location: model.location,
            acquisition_date: model.acquisition_date,
            acquisition_method: model.acquisition_method,
            price: model.price,
            notes: model.notes,
        }
    }
}

impl From<BookDto> for ActiveModel {
    fn from(dto: BookDto) -> Self {
        Self {
            id: dto.id.map_or(NotSet, Set),
            title: Set(dto.title),
            author: Set(dto.author),
            isbn: Set(dto.isbn),
            barcode: Set(dto.barcode),
            status: Set(dto.status.unwrap_or_else(|| "available".to_string())),
            category: Set(dto.category),
            sub_category: Set(dto.sub_category),
            call_number: Set(dto.call_number),
            publisher: Set(dto.publisher),
            publication_year: Set(dto.publication_year),
            language: Set(dto.language),
            pages: Set(dto.pages),
            description: Set(dto.description),
            location: Set(dto.location),
            acquisition_date: Set(dto.acquisition_date),
            acquisition_method: Set(dto.acquisition_method),
            price: Set(dto.price),
            notes: Set(dto.notes),
            created_at: NotSet,
            updated_at: NotSet,
        }
    }
}
