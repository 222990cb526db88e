mod billing_cycle;
mod record;
mod record_type;
mod typed_records;
