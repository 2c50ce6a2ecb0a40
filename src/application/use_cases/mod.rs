pub mod access_control;
pub mod subscriber;
pub mod subscription;
pub mod trial_expiry;
