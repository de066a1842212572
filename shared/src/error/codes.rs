//! Unified error codes for the store catalog
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 2xxx: Permission errors
//! - 6xxx: Catalog errors (stores, slugs)
//! - 7xxx: Media errors (photo uploads)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they serialize as plain
/// numbers in API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Only the author of a store may edit it
    NotStoreOwner = 2002,

    // ==================== 6xxx: Catalog ====================
    /// Store not found
    StoreNotFound = 6001,
    /// Store name normalizes to an empty slug
    SlugEmpty = 6002,
    /// Every slug candidate collided with an existing store
    SlugExhausted = 6003,

    // ==================== 7xxx: Media ====================
    /// Uploaded file is not a supported image type
    UnsupportedMediaType = 7001,
    /// Uploaded file exceeds the size limit
    FileTooLarge = 7002,
    /// Uploaded bytes could not be decoded as an image
    InvalidImage = 7003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
    /// Blob and document stores disagree after a partial write
    StorageInconsistency = 9301,
    /// Blob store write failed
    BlobWriteFailed = 9302,
}

impl ErrorCode {
    /// Get the numeric code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            Self::Success => "Operation completed successfully",
            Self::Unknown => "An unknown error occurred",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::RequiredField => "Required field is missing",

            // Permission
            Self::PermissionDenied => "Permission denied",
            Self::NotStoreOwner => "You must own a store in order to edit it",

            // Catalog
            Self::StoreNotFound => "Store not found",
            Self::SlugEmpty => "Store name must contain at least one letter or digit",
            Self::SlugExhausted => "Could not assign a unique slug",

            // Media
            Self::UnsupportedMediaType => "That filetype isn't allowed",
            Self::FileTooLarge => "File too large",
            Self::InvalidImage => "Invalid image",

            // System
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ConfigError => "Configuration error",
            Self::StorageInconsistency => "Storage left in an inconsistent state",
            Self::BlobWriteFailed => "Failed to store uploaded file",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),
            5 => Ok(Self::InvalidRequest),
            7 => Ok(Self::RequiredField),

            2001 => Ok(Self::PermissionDenied),
            2002 => Ok(Self::NotStoreOwner),

            6001 => Ok(Self::StoreNotFound),
            6002 => Ok(Self::SlugEmpty),
            6003 => Ok(Self::SlugExhausted),

            7001 => Ok(Self::UnsupportedMediaType),
            7002 => Ok(Self::FileTooLarge),
            7003 => Ok(Self::InvalidImage),

            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::DatabaseError),
            9005 => Ok(Self::ConfigError),
            9301 => Ok(Self::StorageInconsistency),
            9302 => Ok(Self::BlobWriteFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
