use serde::{Deserialize, Serialize};

/// Sub-directory of the upload root an image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadCategory {
    Products,
    Payments,
    Features,
    Brands,
}

impl UploadCategory {
    pub const ALL: [UploadCategory; 4] = [
        UploadCategory::Products,
        UploadCategory::Payments,
        UploadCategory::Features,
        UploadCategory::Brands,
    ];

    pub fn dir_name(&self) -> &'static str {
        match self {
            UploadCategory::Products => "products",
            UploadCategory::Payments => "payments",
            UploadCategory::Features => "features",
            UploadCategory::Brands => "brands",
        }
    }
}

/// Metadata of a stored image, returned by upload endpoints and embedded in
/// orders as payment proof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Generated name on disk (`<uuid>.<ext>`).
    pub file_name: String,
    pub original_name: String,
    /// Public URL, e.g. `/uploads/payments/<file_name>`.
    pub url: String,
    pub mime_type: String,
    pub size: i64,
}
