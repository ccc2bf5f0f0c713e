pub mod debug;
pub mod record_id;
pub mod time;
