//! Status and unit lookups for display.
//!
//! The typed lookups live on [`ReadingType`] and [`StatusClass`]; the
//! functions here accept raw codes as they arrive from the wire and
//! degrade to safe defaults instead of failing.

use crate::entities::vital_sign::{ReadingStatus, ReadingType, StatusClass};

/// Default display unit for a reading type code; `""` when unknown
pub fn default_unit(reading_type: &str) -> &'static str {
    reading_type
        .parse::<ReadingType>()
        .map_or("", ReadingType::default_unit)
}

/// Display classification of a status code; absent or unrecognized is UNKNOWN
pub fn status_classification<'a>(status: impl Into<Option<&'a str>>) -> StatusClass {
    let status = status
        .into()
        .and_then(|status| status.parse::<ReadingStatus>().ok());
    StatusClass::from(status)
}

/// Human label for a type code: `OXYGEN_SATURATION` becomes `Oxygen Saturation`
pub fn format_reading_type<'a>(reading_type: impl Into<Option<&'a str>>) -> String {
    let Some(reading_type) = reading_type.into() else {
        return String::new();
    };

    reading_type
        .split('_')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
