//! Document model shared by every pipeline stage

pub mod types;

pub use types::{
    CanonicalDocument, ContentVariant, ContentVariants, DocumentStatus, JsonMap, Link,
    LinkBuckets, RawCrawlOutcome, Reference,
};
