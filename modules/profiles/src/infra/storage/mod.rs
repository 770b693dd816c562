pub mod entity;
pub mod sea_orm_repo;

pub use sea_orm_repo::SeaOrmProfilesRepository;
