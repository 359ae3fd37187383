//! HTTP API handlers for srm-classes

pub mod classes;
pub mod directory;
pub mod health;

pub use classes::class_routes;
pub use directory::directory_routes;
pub use health::{health_routes, service_banner};

use serde::Serialize;

/// `{success: true, msg?, count?, data}` envelope
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            msg: None,
            count: None,
            data,
        }
    }

    pub fn with_msg(msg: &str, data: T) -> Self {
        Self {
            msg: Some(msg.to_string()),
            ..Self::new(data)
        }
    }
}

impl<U> DataResponse<Vec<U>> {
    /// List payload carrying its length as `count`
    pub fn counted(data: Vec<U>) -> Self {
        Self {
            count: Some(data.len()),
            ..Self::new(data)
        }
    }
}

/// `{success: true, msg}` for operations without a payload
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub msg: String,
}

impl MessageResponse {
    pub fn ok(msg: &str) -> Self {
        Self {
            success: true,
            msg: msg.to_string(),
        }
    }
}
