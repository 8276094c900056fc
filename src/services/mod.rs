//! Service layer for the source pipeline.
//!
//! This module contains the site-independent logic for:
//! - Listing feeds (`ListingPipeline`)
//! - Canonical document resolution (`CanonicalResolver`)
//! - Entry details and episode aggregation (`DetailsService`, `EpisodeAggregator`)
//! - Alternatives and their ranking (`AlternativeCollector`, `rank`)
//! - The lazily loaded taxonomy (`TaxonomyCache`)
//! - Deep links (`DeepLinkResolver`)

mod alternatives;
mod deeplink;
mod details;
mod episodes;
mod listing;
mod pool;
mod preferences;
pub mod ranker;
mod resolver;
mod taxonomy;

pub use alternatives::{AlternativeCollector, only_resolved};
pub use deeplink::{DeepLinkResolver, PREFIX_SEARCH, deep_link_path};
pub use details::{DetailsService, parse_details};
pub use episodes::EpisodeAggregator;
pub use listing::{ListingKind, ListingPipeline, filters_with_value, parse_listing};
pub use pool::WorkerPool;
pub use preferences::{MemoryPreferences, PreferenceStore, resolve_rules};
pub use ranker::{Labeled, PreferenceRule, contains_preference, rank};
pub use resolver::{CanonicalResolver, parent_link};
pub use taxonomy::{TaxonomyCache, TaxonomyStatus};
