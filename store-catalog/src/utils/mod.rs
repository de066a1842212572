//! Utilities: error conversions and logging

pub mod error;
pub mod logger;

pub use error::{
    ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode, from_multipart_error,
    from_validation_errors,
};
pub use logger::{cleanup_old_logs, init_logger, init_logger_with_file};
