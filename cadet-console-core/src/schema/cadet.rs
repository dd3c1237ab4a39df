//! Cadet resource

use cadet_console_client::{QueryStyle, Record, ResourceEndpoint, SortDirection};

use super::{Column, FieldSpec, Pattern, ResourceSchema};
use crate::error::CoreResult;

pub const GENDERS: [&str; 3] = ["male", "female", "other"];

pub fn cadet_schema() -> CoreResult<ResourceSchema> {
    let ten_digits =
        |label: &str| Pattern::new(r"\d{10}", format!("{label} must be a 10-digit number"));

    Ok(ResourceSchema {
        label: "Cadet".to_string(),
        plural: "Cadets".to_string(),
        endpoint: ResourceEndpoint::rest("cadets").with_query_style(QueryStyle::PageSize {
            zero_based: false,
            sort_by: Some("cadet_no".to_string()),
            direction: Some(SortDirection::Asc),
        }),
        fields: vec![
            FieldSpec::text("cadet_no", "Cadet Number")
                .required()
                .with_pattern(Pattern::new(
                    r"NCC-\d{5}",
                    "Cadet Number must be in NCC-XXXXX format (e.g., NCC-00123)",
                )?),
            FieldSpec::text("name", "Full Name").required(),
            FieldSpec::text("rank", "Rank"),
            FieldSpec::choice("gender", "Gender", &GENDERS),
            FieldSpec::text("school", "School"),
            FieldSpec::text("batch", "Batch"),
            FieldSpec::integer("passout_year", "Passout Year"),
            FieldSpec::text("district", "District"),
            FieldSpec::text("address", "Address"),
            FieldSpec::text("contact", "Contact")
                .required()
                .with_pattern(ten_digits("Contact")?),
            FieldSpec::email("email", "Email").required(),
            FieldSpec::text("guardian_name", "Guardian Name"),
            FieldSpec::text("relation", "Relation"),
            FieldSpec::text("guardian_contact", "Guardian Contact")
                .required()
                .with_pattern(ten_digits("Guardian Contact")?),
        ],
        columns: vec![
            Column::field("ID", Record::ID_FIELD),
            Column::field("Cadet No", "cadet_no"),
            Column::field("Name", "name"),
            Column::field("Rank", "rank"),
            Column::field("School", "school"),
            Column::field("District", "district"),
            Column::field("Contact", "contact"),
        ],
        stats: Vec::new(),
    })
}
