pub mod plan;
pub mod subscriber;
