use serde::Serialize;

/// Success envelope shared by every JSON endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// Envelope for automation clients, which read a flattened `output` next to `data`.
#[derive(Debug, Serialize)]
pub struct IntegrationResponse<T, O> {
    pub success: bool,
    pub message: String,
    pub data: T,
    pub output: O,
}

impl<T, O> IntegrationResponse<T, O> {
    pub fn new(message: impl Into<String>, data: T, output: O) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            output,
        }
    }
}
