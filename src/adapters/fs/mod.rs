pub mod json_record_store;
pub mod upload_staging;
