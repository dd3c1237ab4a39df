//! School resource

use cadet_console_client::{Record, ResourceEndpoint};

use super::{Column, FieldSpec, ResourceSchema, StatField};
use crate::error::CoreResult;

/// Cadets assumed per training session when estimating school capacity.
pub const CADETS_PER_SESSION: u64 = 30;

pub const DIVISIONS: [&str; 2] = ["junior", "senior"];

pub fn school_schema() -> CoreResult<ResourceSchema> {
    let sessions = vec![
        FieldSpec::text("ncc_batch", "NCC Batch").required(),
        FieldSpec::date("start_date", "Start Date").required(),
        FieldSpec::date("passout_date", "Passout Date"),
        FieldSpec::choice("division", "Division", &DIVISIONS).required(),
    ];

    Ok(ResourceSchema {
        label: "School".to_string(),
        plural: "Schools".to_string(),
        endpoint: ResourceEndpoint::rest("schools").with_stats("/schools/stats/"),
        fields: vec![
            FieldSpec::text("name", "School Name").required(),
            FieldSpec::text("district", "District").required(),
            FieldSpec::text("municipality", "Municipality").required(),
            FieldSpec::integer("ward_number", "Ward Number").required(),
            FieldSpec::text("area_name", "Area Name"),
            FieldSpec::email("official_email", "Official Email"),
            FieldSpec::text("phone_number", "Phone Number").required(),
            FieldSpec::url("website", "Website"),
            FieldSpec::text("principal_name", "Principal Name").required(),
            FieldSpec::text("principal_contact", "Principal Contact").required(),
            FieldSpec::text("teacher_name", "Teacher Name"),
            FieldSpec::text("teacher_contact", "Teacher Contact"),
            FieldSpec::text("notes", "Notes"),
            FieldSpec::group(
                "training_sessions",
                "Training Sessions",
                "training session",
                sessions,
            )
            .required(),
        ],
        columns: vec![
            Column::field("ID", Record::ID_FIELD),
            Column::field("Name", "name"),
            Column::field("District", "district"),
            Column::field("Municipality", "municipality"),
            Column::field("Principal", "principal_name"),
            Column::field("Phone", "phone_number"),
            Column::group_count("Est. Cadets", "training_sessions", CADETS_PER_SESSION),
        ],
        stats: vec![
            StatField::new("total_schools", "Total Schools"),
            StatField::new("active_schools", "Active Schools"),
            StatField::new("total_cadets", "Total Cadets"),
            StatField::new("districts_covered", "Districts Covered"),
        ],
    })
}
