mod error;
mod portfolio;

pub use error::ServiceError;
pub use portfolio::PortfolioService;
