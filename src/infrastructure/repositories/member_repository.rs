//! SeaORM implementation of MemberRepository

use async_trait::async_trait;
use chrono::Local;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{DomainError, MemberFilter, MemberRepository};
use crate::models::member::{self, Entity as Member, MemberDto};

pub struct SeaOrmMemberRepository {
    db: DatabaseConnection,
}

impl SeaOrmMemberRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MemberRepository for SeaOrmMemberRepository {
    async fn find_all(&self, filter: MemberFilter) -> Result<Vec<MemberDto>, DomainError> {
        let mut condition = Condition::all();

        if let Some(role) = filter.role {
            condition = condition.add(member::Column::Role.eq(role));
        }

        if let Some(status) = filter.status {
            condition = condition.add(member::Column::Status.eq(status));
        }

        if let Some(query) = filter.query {
            if !query.is_empty() {
                condition = condition.add(
                    Condition::any()
                        .add(member::Column::Name.contains(&query))
                        .add(member::Column::Email.contains(&query))
                        .add(member::Column::Identifier.contains(&query)),
                );
            }
        }

        let members = Member::find()
            .filter(condition)
            .order_by_desc(member::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(members.into_iter().map(MemberDto::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<MemberDto>, DomainError> {
        let member = Member::find_by_id(id).one(&self.db).await?;
        Ok(member.map(MemberDto::from))
    }

    async fn create(&self, input: MemberDto) -> Result<MemberDto, DomainError> {
        if input.name.trim().is_empty() {
            return Err(DomainError::Validation("Name is required".to_string()));
        }

        let duplicate = Member::find()
            .filter(
                Condition::any()
                    .add(member::Column::Email.eq(&input.email))
                    .add(member::Column::Identifier.eq(&input.identifier)),
            )
            .one(&self.db)
            .await?;

        if duplicate.is_some() {
            return Err(DomainError::Validation(
                "A member with this email or identifier is already registered".to_string(),
            ));
        }

        let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let mut active: member::ActiveModel = input.into();
        active.id = sea_orm::NotSet;
        active.created_at = Set(now.clone());
        active.updated_at = Set(now);

        let saved = active.insert(&self.db).await?;
        Ok(MemberDto::from(saved))
    }

    async fn update(&self, id: i32, input: MemberDto) -> Result<MemberDto, DomainError> {
        let existing = Member::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let mut active: member::ActiveModel = input.into();
        active.id = Set(existing.id);
        active.created_at = Set(existing.created_at);
        active.updated_at = Set(now);

        let saved = active.update(&self.db).await?;
        Ok(MemberDto::from(saved))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = Member::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }
}
