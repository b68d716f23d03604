//! Outbound `<foodquery>` payloads
//!
//! The service takes two query levels: level 1 lists food identifiers,
//! level 2 returns everything known about one food.

/// Level-1 query: every identifier whose origin is BEDCA, ascending
const CATALOG_QUERY: &str = r#"<foodquery>
	<type level="1"/>
	<selection>
		<atribute name="f_id"/>
	</selection>
	<condition>
		<cond1>
			<atribute1 name="f_origen"/>
		</cond1>
		<relation type="EQUAL"/>
		<cond3>BEDCA</cond3>
	</condition>
	<order ordtype="ASC">
		<atribute3 name="f_id"/>
	</order>
</foodquery>"#;

/// Attributes selected by the level-2 detail query
const DETAIL_SELECTION: &[&str] = &[
    "f_id",
    "f_ori_name",
    "f_eng_name",
    "sci_name",
    "edible_portion",
    "f_origen",
    "c_id",
    "c_ori_name",
    "componentgroup_id",
    "best_location",
    "v_unit",
    "u_id",
    "u_descripcion",
    "value_type",
    "vt_descripcion",
    "mu_id",
    "mu_descripcion",
];

/// Returns the fixed catalog-listing query
pub fn build_catalog_query() -> &'static str {
    CATALOG_QUERY
}

/// Builds the detail query for one identifier
///
/// Only public values are requested, grouped by component group.
pub fn build_detail_query(id: &str) -> String {
    build_level2_query(id, DETAIL_SELECTION, Some("componentgroup_id"))
}

/// Builds a detail query selecting only `fields`, unordered
///
/// Used to find out which tags a food record actually carries.
pub fn build_probe_query<S: AsRef<str>>(id: &str, fields: &[S]) -> String {
    build_level2_query(id, fields, None)
}

fn build_level2_query<S: AsRef<str>>(id: &str, fields: &[S], order_by: Option<&str>) -> String {
    let mut payload = String::from("<foodquery>\n\t<type level=\"2\"/>\n\t<selection>\n");
    for field in fields {
        payload.push_str(&format!("\t\t<atribute name=\"{}\"/>\n", field.as_ref()));
    }
    payload.push_str("\t</selection>\n");
    payload.push_str(&equal_condition("f_id", &escape_text(id)));
    payload.push_str(&equal_condition("publico", "1"));
    if let Some(attribute) = order_by {
        payload.push_str(&format!(
            "\t<order ordtype=\"ASC\">\n\t\t<atribute3 name=\"{}\"/>\n\t</order>\n",
            attribute
        ));
    }
    payload.push_str("</foodquery>");
    payload
}

fn equal_condition(attribute: &str, value: &str) -> String {
    format!(
        "\t<condition>\n\t\t<cond1>\n\t\t\t<atribute1 name=\"{}\"/>\n\t\t</cond1>\n\t\t<relation type=\"EQUAL\"/>\n\t\t<cond3>{}</cond3>\n\t</condition>\n",
        attribute, value
    )
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
