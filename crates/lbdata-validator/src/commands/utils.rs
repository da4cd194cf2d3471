use crate::parser::record::RecordKind;
use crate::schema::SchemaValidator;
use crate::utils::config::REPORT_VERSION;
use crate::utils::error::SchemaError;

/// Render schema information for one kind, or every kind when `kind` is `None`
///
/// # Errors
/// * `SchemaError::UnsupportedSchemaKind` - `kind` names no known record kind
pub fn render_schema(kind: Option<&str>, show_details: bool) -> Result<String, SchemaError> {
    let kinds = match kind {
        Some(kind) => vec![kind.parse::<RecordKind>()?],
        None => RecordKind::ALL.to_vec(),
    };

    let mut out = String::new();
    out.push_str("LB Data Record Schemas\n");
    out.push_str(&format!("Report Version: {}\n\n", REPORT_VERSION));

    for kind in kinds {
        let summary = match kind {
            RecordKind::TraceDatafile => "per-rank tasks and communications",
            RecordKind::StatsDatafile => "per-phase load-balancing statistics",
        };
        out.push_str(&format!("{}: {}\n", kind, summary));

        if show_details {
            out.push_str(&SchemaValidator::for_kind(kind).root().describe());
            out.push_str("\n\n");
        }
    }

    if !show_details {
        out.push_str("\nUse --show for detailed schema information\n");
    }
    Ok(out)
}

/// Display schema information
pub fn display_schema(kind: Option<&str>, show_details: bool) -> Result<(), SchemaError> {
    print!("{}", render_schema(kind, show_details)?);
    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("LB Data Validator v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", REPORT_VERSION);
    println!();
    println!("Schema and consistency checks for load-balancing trace and statistics files.");
}
