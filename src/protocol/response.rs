//! Inbound response decoding
//!
//! Responses are read by tag name only. Unknown tags are ignored and missing
//! ones degrade to the placeholder; only a body that is not XML at all is an
//! error.

use crate::record::{FieldMapping, UNKNOWN_COMPONENT};
use crate::ParseError;
use roxmltree::{Document, Node};

/// Tag holding a food identifier
pub const ID_TAG: &str = "f_id";

/// Tag wrapping one nutrient component of a food
pub const COMPONENT_TAG: &str = "foodvalue";

const COMPONENT_NAME_TAG: &str = "c_ori_name";
const COMPONENT_VALUE_TAG: &str = "best_location";
const COMPONENT_VALUE_TYPE_TAG: &str = "value_type";

/// Extracts every identifier in document order
///
/// A well-formed document without identifiers yields an empty list.
pub fn parse_catalog_response(body: &str) -> Result<Vec<String>, ParseError> {
    let document = parse_document(body)?;
    let ids = document
        .descendants()
        .filter(|node| is_tag(node, ID_TAG))
        .map(|node| text_of(&node).trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();
    Ok(ids)
}

/// Decodes a detail response into a field mapping
///
/// Each primary field takes the text of the first matching tag. Then every
/// `foodvalue` component is stored under its `c_ori_name` (or `Unknown`);
/// its value is `best_location`, falling back to `value_type` when that is
/// empty, then to the placeholder. A repeated component name keeps the last
/// value seen.
pub fn parse_detail_response<S: AsRef<str>>(
    body: &str,
    primary_fields: &[S],
    placeholder: &str,
) -> Result<FieldMapping, ParseError> {
    let document = parse_document(body)?;
    let mut mapping = FieldMapping::new();

    for field in primary_fields {
        let field = field.as_ref();
        let value =
            first_text(document.root(), field).unwrap_or_else(|| placeholder.to_string());
        mapping.insert(field, value);
    }

    for component in document
        .descendants()
        .filter(|node| is_tag(node, COMPONENT_TAG))
    {
        let name = first_text(component, COMPONENT_NAME_TAG)
            .unwrap_or_else(|| UNKNOWN_COMPONENT.to_string());

        let value = match first_text(component, COMPONENT_VALUE_TAG) {
            Some(value) if !value.is_empty() => value,
            _ => first_text(component, COMPONENT_VALUE_TYPE_TAG)
                .unwrap_or_else(|| placeholder.to_string()),
        };

        mapping.insert(name, value);
    }

    Ok(mapping)
}

/// Reads the given tags from a probe response, trimming their text
pub fn parse_probe_response<S: AsRef<str>>(
    body: &str,
    fields: &[S],
    placeholder: &str,
) -> Result<FieldMapping, ParseError> {
    let document = parse_document(body)?;

    Ok(fields
        .iter()
        .map(|field| {
            let field = field.as_ref();
            let value = first_text(document.root(), field)
                .map(|text| text.trim().to_string())
                .unwrap_or_else(|| placeholder.to_string());
            (field.to_string(), value)
        })
        .collect())
}

fn parse_document(body: &str) -> Result<Document<'_>, ParseError> {
    if body.trim().is_empty() {
        return Err(ParseError::EmptyBody);
    }
    Ok(Document::parse(body)?)
}

fn is_tag(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

/// Text of the first descendant element named `tag`, if any
fn first_text(scope: Node, tag: &str) -> Option<String> {
    scope
        .descendants()
        .skip(1)
        .find(|node| is_tag(node, tag))
        .map(|node| text_of(&node))
}

/// Concatenated text content of a node and its children
fn text_of(node: &Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
