use poem_openapi::Object;

/// Generic confirmation message
#[derive(Object, Debug)]
pub struct MessageResponse {
    pub message: String,
}

/// Paging envelope for list endpoints
#[derive(Object, Debug)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}
