use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AppError {
    /// The requested plan name is not part of the plan catalog.
    #[error("Unknown plan: {0}")]
    InvalidPlan(String),

    /// The subscriber has no billing customer on the provider side yet.
    #[error("No billing customer associated with subscriber {0}")]
    MissingBillingIdentity(Uuid),

    /// The provider answered, but the answer does not describe the requested state.
    #[error("Billing provider rejected the request: {0}")]
    ProviderRejected(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Copy, Debug)]
pub enum ErrorCode {
    InvalidPlan,
    MissingBillingIdentity,
    ProviderRejected,
    DatabaseError,
    InvalidCredentials,
    InvalidInput,
    NotFound,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidPlan => "INVALID_PLAN",
            ErrorCode::MissingBillingIdentity => "MISSING_BILLING_IDENTITY",
            ErrorCode::ProviderRejected => "PROVIDER_REJECTED",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
