//! Logging infrastructure: durable capture records.
//!
//! Provides [`JsonFileRecordWriter`], a file-per-record JSON writer that
//! implements the [`RecordWriter`](capture_application::RecordWriter) port.

mod file_name;
mod json_file_writer;

pub use json_file_writer::JsonFileRecordWriter;
