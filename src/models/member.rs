use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Role-specific number: NIS for students, NIP for teachers, employee
    /// number for staff. Unique across all members.
    pub identifier: String,
    pub role: String,   // 'student', 'teacher', 'staff', 'librarian', 'guest'
    pub status: String, // 'active', 'inactive', 'suspended', 'expired'
    pub phone: Option<String>,
    pub address: Option<String>,
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

impl ActiveModelBehavior for ActiveModel {}

// DTO for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDto {
    pub id: Option<i32>,
    pub name: String,
    pub email: String,
    pub identifier: String,
    pub role: String,
    pub status: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl From<Model> for MemberDto {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            name: model.name,
            email: model.email,
            identifier: model.identifier,
            role: model.role,
            status: Some(model.status),
            phone: model.phone,
            address: model.address,
            notes: model.notes,
        }
    }
}

impl From<MemberDto> for ActiveModel {
    fn from(dto: MemberDto) -> Self {
        Self {
            id: dto.id.map_or(NotSet, Set),
            name: Set(dto.name),
            email: Set(dto.email),
            identifier: Set(dto.identifier),
            role: Set(dto.role),
            status: Set(dto.status.unwrap_or_else(|| "active".to_string())),
            phone: Set(dto.phone),
            address: Set(dto.address),
            notes: Set(dto.notes),
            created_at: NotSet,
            updated_at: NotSet,
        }
    }
}
