//! Privacy settings rows
//!
//! What the settings screen needs to draw one level selector per field.

use serde::{Deserialize, Serialize};

use crate::field::FieldKind;
use crate::level::MaskLevel;
use crate::preferences::PreferenceSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRow {
    pub field: FieldKind,
    pub label: String,
    pub level: MaskLevel,
}

/// One row per known field in display order, followed by any extra
/// fields the set carries.
pub fn settings_rows(preferences: &PreferenceSet) -> Vec<PreferenceRow> {
    let mut rows: Vec<PreferenceRow> = FieldKind::KNOWN
        .into_iter()
        .map(|field| PreferenceRow {
            label: field.label().to_string(),
            level: preferences.level(&field),
            field,
        })
        .collect();

    for (field, level) in preferences.iter().filter(|(field, _)| !field.is_known()) {
        rows.push(PreferenceRow {
            field: field.clone(),
            label: field.label().to_string(),
            level,
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_follow_display_order() {
        let rows = settings_rows(&PreferenceSet::default());
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();

        assert_eq!(
            labels,
            vec!["First Name", "Last Name", "Phone Number", "Email", "Street Address"]
        );
        assert_eq!(rows[2].level, MaskLevel::Full);
    }

    #[test]
    fn test_extra_fields_are_listed_last() {
        let prefs = PreferenceSet::empty().with(FieldKind::from("school"), MaskLevel::None);
        let rows = settings_rows(&prefs);

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[5].field, FieldKind::from("school"));
        assert_eq!(rows[5].level, MaskLevel::None);
        // Known fields missing from the set show their defaults
        assert_eq!(rows[0].level, MaskLevel::Partial);
    }
}
