//! Codec for the `<foodquery>` XML protocol
//!
//! Pure transforms with no state: payload builders for outbound queries and
//! tag-name based decoders for the service's responses.

mod query;
mod response;

pub use query::{build_catalog_query, build_detail_query, build_probe_query};
pub use response::{
    parse_catalog_response, parse_detail_response, parse_probe_response, COMPONENT_TAG, ID_TAG,
};
