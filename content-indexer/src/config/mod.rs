//! Configuration for the content indexer.

mod app_config;
mod dependencies;
mod settings;

pub use app_config::{
    AppConfig, ContentMetadata, ContentType, ContentTypeMetadata, LookupTable,
    INTERNAL_AUTHORING_ORIGIN,
};
pub use dependencies::Dependencies;
pub use settings::Settings;
