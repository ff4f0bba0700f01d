pub mod filter;
pub mod sales_repo;
pub mod user_repo;

pub use sales_repo::SalesRepository;
pub use user_repo::UserRepository;
