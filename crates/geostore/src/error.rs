use thiserror::Error;

/// Errors raised while reading features into a `GeoStore`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The input is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A geometry uses a type the store cannot represent.
    #[error("unsupported geometry type `{0}`")]
    UnsupportedGeometry(String),

    /// A coordinate array is malformed (wrong arity or non-numeric values).
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// The document is valid JSON but not a GeoJSON object.
    #[error("not a GeoJSON object: {0}")]
    NotGeoJson(String),
}
