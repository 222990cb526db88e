pub mod billing_cycle;
pub mod billing_record;
pub mod credit_card;
pub mod device_identity;
pub mod record;
pub mod record_type;
pub mod subscription;
pub mod tag;
