use serde::Serialize;

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Confirmation plus the record written.
#[derive(Serialize)]
pub struct JobWriteResponse<T: Serialize> {
    pub message: &'static str,
    pub job: T,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
