pub mod auth;
pub mod reporting;

pub use auth::AuthService;
pub use reporting::ReportingService;
