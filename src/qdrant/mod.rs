mod client;
pub mod error;
pub mod models;

pub use client::{CollectionService, QdrantClient};
pub use error::QdrantError;
pub use models::{
    CollectionInfo, CollectionStatus, CollectionSummary, Distance, ServiceInfo, VectorParams,
    VectorsConfig,
};
