//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case.

pub mod audit;
pub mod banking;
pub mod validator;

pub use audit::TransferAuditor;
pub use banking::BankingService;
pub use validator::validate;
