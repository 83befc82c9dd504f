pub mod catalog_repo;
pub use catalog_repo::StaffRepository;
pub mod crud_repo;
pub use crud_repo::{CrudRepository, Entity};
pub mod sales_repo;
pub mod storage_repo;
pub mod checkout_store;
pub use checkout_store::PgCheckoutStore;
