//! Backend API client

pub mod client;

pub use client::{
    ApiError, ApiResult, FieldIssue, MovieManagerClient, DEFAULT_BACKEND_URL,
    UNKNOWN_SERVER_ERROR, VALIDATION_STATUS,
};
