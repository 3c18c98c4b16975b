//! Repository trait definitions
//!
//! These traits define the contract for data access to the two directory
//! entities. Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use crate::models::{BookDto, MemberDto};

/// Filter criteria for member queries
#[derive(Debug, Default, Clone)]
pub struct MemberFilter {
    pub role: Option<String>,
    pub status: Option<String>,
    pub query: Option<String>,
}

/// Repository trait for the member directory
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find all members matching the filter, newest first
    async fn find_all(&self, filter: MemberFilter) -> Result<Vec<MemberDto>, DomainError>;

    /// Find a member by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<MemberDto>, DomainError>;

    /// Register a new member. Fails on duplicate email or identifier.
    async fn create(&self, input: MemberDto) -> Result<MemberDto, DomainError>;

    /// Update an existing member
    async fn update(&self, id: i32, input: MemberDto) -> Result<MemberDto, DomainError>;

    /// Delete a member by ID. Destructive.
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Filter criteria for catalog queries
#[derive(Debug, Default, Clone)]
pub struct BookFilter {
    pub status: Option<String>,
    pub category: Option<String>,
    pub query: Option<String>,
}

/// Repository trait for the book catalog
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find all books matching the filter, newest first
    async fn find_all(&self, filter: BookFilter) -> Result<Vec<BookDto>, DomainError>;

    /// Find a book by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<BookDto>, DomainError>;

    /// Catalog a new book. Fails on duplicate barcode.
    async fn create(&self, input: BookDto) -> Result<BookDto, DomainError>;

    /// Update an existing book
    async fn update(&self, id: i32, input: BookDto) -> Result<BookDto, DomainError>;

    /// Delete a book by ID. Destructive.
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}
