pub mod file_records;
pub mod models;
pub mod profiles;

pub use file_records::FileRecordStore;
pub use profiles::ProfileStore;
