//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use chrono::Local;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{BookFilter, BookRepository, DomainError};
use crate::models::book::{self, BookDto, Entity as Book};

pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self, filter: BookFilter) -> Result<Vec<BookDto>, DomainError> {
        let mut condition = Condition::all();

        if let Some(status) = filter.status {
            condition = condition.add(book::Column::Status.eq(status));
        }

        if let Some(category) = filter.category {
            condition = condition.add(book::Column::Category.eq(category));
        }

        if let Some(query) = filter.query {
            if !query.is_empty() {
                condition = condition.add(
                    Condition::any()
                        .add(book::Column::Title.contains(&query))
                        .add(book::Column::Isbn.contains(&query))
                        .add(book::Column::Barcode.contains(&query)),
                );
            }
        }

        let books = Book::find()
            .filter(condition)
            .order_by_desc(book::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(BookDto::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<BookDto>, DomainError> {
        let book = Book::find_by_id(id).one(&self.db).await?;
        Ok(book.map(BookDto::from))
    }

    async fn create(&self, input: BookDto) -> Result<BookDto, DomainError> {
        if input.title.trim().is_empty() {
            return Err(DomainError::Validation("Title is required".to_string()));
        }
        if input.barcode.trim().is_empty() {
            return Err(DomainError::Validation("Barcode is required".to_string()));
        }

        let duplicate = Book::find()
            .filter(book::Column::Barcode.eq(&input.barcode))
            .one(&self.db)
            .await?;

        if duplicate.is_some() {
            return Err(DomainError::Validation(
                "A copy with this barcode is already catalogued".to_string(),
            ));
        }

        let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let mut active: book::ActiveModel = input.into();
        active.id = sea_orm::NotSet;
        active.created_at = Set(now.clone());
        active.updated_at = Set(now);

        let saved = active.insert(&self.db).await?;
        Ok(BookDto::from(saved))
    }

    async fn update(&self, id: i32, input: BookDto) -> Result<BookDto, DomainError> {
        let existing = Book::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let mut active: book::ActiveModel = input.into();
        active.id = Set(existing.id);
        active.created_at = Set(existing.created_at);
        active.updated_at = Set(now);

        let saved = active.update(&self.db).await?;
        Ok(BookDto::from(saved))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = Book::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }
}
