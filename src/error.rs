#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    #[error("data source unavailable: {0}")]
    Source(#[from] csv::Error),
    #[error("data source unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("district {0} is not present in the dataset")]
    InvalidDistrict(u32),
    #[error("no complete rows in {path} ({dropped} dropped during cleaning)")]
    EmptyDataset { path: String, dropped: usize },
}
