//! SeaORM repository implementations

pub mod book_repository;
pub mod member_repository;

pub use book_repository::SeaOrmBookRepository;
pub use member_repository::SeaOrmMemberRepository;
