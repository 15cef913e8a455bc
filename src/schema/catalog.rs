//! Builtin record layouts
//!
//! A sample of entity, table and object types covering every shape the
//! engine handles: corner points, optional points, repeated values, point
//! lists, flag fields, occurrence-dependent codes and codes reused across
//! subclass sections.

use super::entity::{EntitySchema, RecordKind};
use super::field::FieldSpec;
use crate::policy::VersionPolicy;
use crate::types::{DxfVersion, Point3, ValueKind};

/// Application group holding the reactor (persistent owner) handles
pub const REACTORS_GROUP: &str = "{ACAD_REACTORS";
/// Application group holding the extension dictionary handle
pub const XDICTIONARY_GROUP: &str = "{ACAD_XDICTIONARY";

pub const DEFAULT_LAYER: &str = "0";
pub const DEFAULT_LINETYPE: &str = "BYLAYER";
pub const COLOR_BYLAYER: i64 = 256;
pub const LINEWEIGHT_BYLAYER: i64 = -1;

/// Handle, reactors, extension dictionary and owner, shared by every record
pub fn object_head() -> Vec<FieldSpec> {
    gated(vec![
        FieldSpec::handle(5, "handle").identity(),
        FieldSpec::repeated(330, "reactors", ValueKind::Handle).in_group(REACTORS_GROUP),
        FieldSpec::handle(360, "dictionary_owner_hard")
            .nth(1)
            .in_group(XDICTIONARY_GROUP),
        FieldSpec::handle(330, "owner_handle").nth(2),
    ])
}

/// Properties of the `AcDbEntity` subclass
pub fn entity_common() -> Vec<FieldSpec> {
    gated(vec![
        FieldSpec::int(67, "paperspace").default_int(0),
        FieldSpec::text(410, "layout_tab_name").default_text(""),
        FieldSpec::text(8, "layer").default_text(DEFAULT_LAYER).required(),
        FieldSpec::text(6, "linetype").default_text(DEFAULT_LINETYPE),
        FieldSpec::handle(347, "material"),
        FieldSpec::int(62, "color").default_int(COLOR_BYLAYER),
        FieldSpec::int(370, "lineweight").default_int(LINEWEIGHT_BYLAYER),
        FieldSpec::double(48, "linetype_scale").default_double(1.0),
        FieldSpec::int(60, "visibility").default_int(0),
        FieldSpec::int(92, "graphics_data_size")
            .since(DxfVersion::AC1015)
            .default_int(0)
            .graphics_size(),
        FieldSpec::repeated(310, "binary_graphics_data", ValueKind::Text),
        FieldSpec::int(420, "color_value"),
        FieldSpec::text(430, "color_name"),
        FieldSpec::int(440, "transparency"),
        FieldSpec::handle(390, "plot_style_table"),
        FieldSpec::int(284, "shadow_mode").default_int(0),
        FieldSpec::double(38, "elevation").default_double(0.0),
    ])
}

/// Apply the default release range of each field's code
fn gated(fields: Vec<FieldSpec>) -> Vec<FieldSpec> {
    fields.into_iter().map(VersionPolicy::gate).collect()
}

/// Fields of the `AcDbSpline` subclass, gated to start at `since`
fn spline_fields(since: DxfVersion) -> Vec<FieldSpec> {
    vec![
        FieldSpec::point(210, "extrusion").default_point(Point3::UNIT_Z),
        FieldSpec::flags(70, "spline_flag").default_int(0),
        FieldSpec::int(71, "degree").default_int(3),
        FieldSpec::int(72, "number_of_knots").default_int(0),
        FieldSpec::int(73, "number_of_control_points").default_int(0),
        FieldSpec::int(74, "number_of_fit_points").default_int(0),
        FieldSpec::double(42, "knot_tolerance").default_double(0.000_000_1),
        FieldSpec::double(43, "control_point_tolerance").default_double(0.000_000_1),
        FieldSpec::double(44, "fit_tolerance").default_double(0.000_000_000_1),
        FieldSpec::point(12, "start_tangent"),
        FieldSpec::point(13, "end_tangent"),
        FieldSpec::repeated(40, "knot_values", ValueKind::Double),
        FieldSpec::repeated(41, "weights", ValueKind::Double),
        FieldSpec::point_list(10, "control_points"),
        FieldSpec::point_list(11, "fit_points"),
    ]
    .into_iter()
    .map(|f| {
        let min = f.min_version.max(since);
        f.since(min)
    })
    .collect()
}

fn entity(name: &'static str) -> super::entity::EntitySchemaBuilder {
    EntitySchema::builder(name, RecordKind::Entity)
        .fields(object_head())
        .subclass("AcDbEntity")
        .fields(entity_common())
}

/// `3DFACE`: four corners and invisible-edge bits
pub fn face3d() -> EntitySchema {
    entity("3DFACE")
        .subclass("AcDbFace")
        .field(FieldSpec::point(10, "first_corner").default_point(Point3::ORIGIN).required())
        .field(FieldSpec::point(11, "second_corner").default_point(Point3::ORIGIN).required())
        .field(FieldSpec::point(12, "third_corner").default_point(Point3::ORIGIN).required())
        .field(FieldSpec::point(13, "fourth_corner").default_point(Point3::ORIGIN).required())
        .field(FieldSpec::flags(70, "edge_flags").default_int(0))
        .build()
}

/// `SPLINE`
pub fn spline() -> EntitySchema {
    entity("SPLINE")
        .subclass("AcDbSpline")
        .fields(spline_fields(DxfVersion::R13))
        .build()
}

/// `HELIX`: a spline followed by the helix parameters, which reuse codes
/// 10–12 and 40–42 with another meaning
pub fn helix() -> EntitySchema {
    let since = DxfVersion::AC1021;
    entity("HELIX")
        .subclass("AcDbSpline")
        .fields(spline_fields(since))
        .subclass("AcDbHelix")
        .field(FieldSpec::int(90, "major_release_number").since(since).default_int(29))
        .field(FieldSpec::int(91, "maintenance_release_number").since(since).default_int(63))
        .field(FieldSpec::point(10, "axis_base_point").since(since).default_point(Point3::ORIGIN))
        .field(FieldSpec::point(11, "start_point").since(since).default_point(Point3::new(1.0, 0.0, 0.0)))
        .field(FieldSpec::point(12, "axis_vector").since(since).default_point(Point3::UNIT_Z))
        .field(FieldSpec::double(40, "radius").since(since).default_double(1.0))
        .field(FieldSpec::double(41, "number_of_turns").since(since).default_double(3.0))
        .field(FieldSpec::double(42, "turn_height").since(since).default_double(1.0))
        .field(FieldSpec::int(290, "handedness").since(since).default_int(1))
        .field(FieldSpec::int(280, "constraint_type").since(since).default_int(0))
        .build()
}

/// `REGION`: opaque modeler data carried as repeated strings
pub fn region() -> EntitySchema {
    entity("REGION")
        .subclass("AcDbModelerGeometry")
        .field(FieldSpec::int(70, "modeler_format_version").default_int(1))
        .field(FieldSpec::repeated(1, "proprietary_data", ValueKind::Text))
        .field(FieldSpec::repeated(3, "additional_proprietary_data", ValueKind::Text))
        .build()
}

/// `ACAD_TABLE`: the first 90 is the table value flag, later ones are
/// per-cell value flags
pub fn table() -> EntitySchema {
    let since = DxfVersion::AC1018;
    entity("ACAD_TABLE")
        .subclass("AcDbBlockReference")
        .field(FieldSpec::text(2, "block_name").required())
        .field(FieldSpec::point(10, "insertion_point").default_point(Point3::ORIGIN))
        .subclass("AcDbTable")
        .field(FieldSpec::int(280, "table_data_version").since(since).default_int(0))
        .field(FieldSpec::handle(342, "table_style").since(since))
        .field(FieldSpec::handle(343, "block_record").since(since))
        .field(FieldSpec::point(11, "horizontal_direction").since(since).default_point(Point3::new(1.0, 0.0, 0.0)))
        .field(FieldSpec::int(90, "table_value_flag").since(since).nth(1).default_int(0))
        .field(FieldSpec::int(91, "number_of_rows").since(since).default_int(1))
        .field(FieldSpec::int(92, "number_of_columns").since(since).default_int(1))
        .field(FieldSpec::int(93, "override_flag").since(since).default_int(0))
        .field(FieldSpec::int(94, "border_color_override").since(since).default_int(0))
        .field(FieldSpec::int(95, "border_lineweight_override").since(since).default_int(0))
        .field(FieldSpec::int(96, "border_visibility_override").since(since).default_int(0))
        .field(FieldSpec::repeated(141, "row_heights", ValueKind::Double).since(since))
        .field(FieldSpec::repeated(142, "column_widths", ValueKind::Double).since(since))
        .field(FieldSpec::repeated(171, "cell_types", ValueKind::Int).since(since))
        .field(FieldSpec::repeated(172, "cell_flags", ValueKind::Int).since(since))
        .field(FieldSpec::repeated(173, "cell_merged", ValueKind::Int).since(since))
        .field(FieldSpec::repeated(1, "cell_texts", ValueKind::Text).since(since))
        .field(FieldSpec::repeated(90, "cell_value_flags", ValueKind::Int).since(since).from_nth(2))
        .build()
}

/// `STYLE` table entry
pub fn text_style() -> EntitySchema {
    EntitySchema::builder("STYLE", RecordKind::TableEntry { table: "STYLE" })
        .fields(object_head())
        .subclass("AcDbSymbolTableRecord")
        .subclass("AcDbTextStyleTableRecord")
        .field(FieldSpec::text(2, "style_name").required())
        .field(FieldSpec::flags(70, "standard_flag").default_int(0))
        .field(FieldSpec::double(40, "fixed_height").default_double(0.0))
        .field(FieldSpec::double(41, "width_factor").default_double(1.0))
        .field(FieldSpec::double(50, "oblique_angle").default_double(0.0))
        .field(FieldSpec::flags(71, "text_generation_flag").default_int(0))
        .field(FieldSpec::double(42, "last_height").default_double(2.5))
        .field(FieldSpec::text(3, "primary_font_file").default_text("txt"))
        .field(FieldSpec::text(4, "big_font_file").default_text(""))
        .build()
}

/// `LAYER_INDEX` object: the first 360 is the extension dictionary, later
/// ones are the ID buffers of the indexed layers
pub fn layer_index() -> EntitySchema {
    EntitySchema::builder("LAYER_INDEX", RecordKind::Object)
        .fields(object_head())
        .subclass("AcDbIndex")
        .field(FieldSpec::double(40, "time_stamp").default_double(0.0))
        .subclass("AcDbLayerIndex")
        .field(FieldSpec::repeated(8, "layer_names", ValueKind::Text))
        .field(
            FieldSpec::repeated(360, "id_buffer_handles", ValueKind::Handle)
                .since(DxfVersion::R14)
                .from_nth(2),
        )
        .field(FieldSpec::repeated(90, "entry_counts", ValueKind::Int))
        .build()
}

/// Every builtin schema
pub fn builtin_schemas() -> Vec<EntitySchema> {
    vec![
        face3d(),
        spline(),
        helix(),
        region(),
        table(),
        text_style(),
        layer_index(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_unique() {
        let schemas = builtin_schemas();
        let mut names: Vec<_> = schemas.iter().map(|s| s.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), schemas.len());
    }

    #[test]
    fn test_helix_sections_disambiguate_codes() {
        let schema = helix();
        let spline_section = schema.marker_section("AcDbSpline").unwrap();
        let helix_section = schema.marker_section("AcDbHelix").unwrap();
        let in_spline = schema.resolve(40, 1, spline_section).unwrap();
        let in_helix = schema.resolve(40, 1, helix_section).unwrap();
        assert_eq!(schema.field_at(in_spline).name, "knot_values");
        assert_eq!(schema.field_at(in_helix).name, "radius");
    }

    #[test]
    fn test_table_value_flag_occurrences() {
        let schema = table();
        let section = schema.marker_section("AcDbTable").unwrap();
        assert_eq!(schema.field_at(schema.resolve(90, 1, section).unwrap()).name, "table_value_flag");
        assert_eq!(schema.field_at(schema.resolve(90, 2, section).unwrap()).name, "cell_value_flags");
        assert_eq!(schema.field_at(schema.resolve(90, 3, section).unwrap()).name, "cell_value_flags");
    }

    #[test]
    fn test_layer_index_owner_slots() {
        let schema = layer_index();
        let ungrouped = |spec: &FieldSpec| spec.group.is_none();
        assert_eq!(schema.field_at(schema.resolve(360, 1, 0).unwrap()).name, "dictionary_owner_hard");
        assert_eq!(schema.field_at(schema.resolve(360, 2, 2).unwrap()).name, "id_buffer_handles");
        assert_eq!(schema.field_at(schema.resolve(330, 1, 0).unwrap()).name, "reactors");
        assert_eq!(schema.resolve_with(330, 1, 0, ungrouped), None);
        assert_eq!(schema.field_at(schema.resolve_with(330, 2, 0, ungrouped).unwrap()).name, "owner_handle");
    }

    #[test]
    fn test_common_fields_take_code_defaults() {
        let schema = face3d();
        assert_eq!(schema.field("lineweight").unwrap().min_version, DxfVersion::AC1015);
        assert_eq!(schema.field("material").unwrap().min_version, DxfVersion::AC1021);
        assert_eq!(schema.field("elevation").unwrap().max_version, DxfVersion::AC1009);
        assert_eq!(schema.field("reactors").unwrap().min_version, DxfVersion::R14);
        assert_eq!(schema.field("layer").unwrap().min_version, DxfVersion::OLDEST);
    }
}
