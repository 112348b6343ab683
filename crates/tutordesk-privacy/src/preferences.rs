//! Mask preferences
//!
//! A `PreferenceSet` maps each field kind to the level it is displayed at.
//! A `PreferenceStore` holds one set for the lifetime of a single user
//! session and hands out snapshots; every rendering collaborator in that
//! session reads through the same store.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::field::FieldKind;
use crate::level::MaskLevel;
use crate::masking::mask;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceSet {
    levels: BTreeMap<FieldKind, MaskLevel>,
}

impl PreferenceSet {
    /// A set with no recorded levels; every lookup falls back to the defaults
    pub fn empty() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Level for `field`, falling back to the field's default
    pub fn level(&self, field: &FieldKind) -> MaskLevel {
        let field = field.canonical();
        self.levels
            .get(&field)
            .copied()
            .unwrap_or_else(|| field.default_level())
    }

    /// Record `level` for `field`, returning the level it replaced
    pub fn set(&mut self, field: FieldKind, level: MaskLevel) -> Option<MaskLevel> {
        self.levels.insert(field.canonical(), level)
    }

    /// Copy of this set with one field changed
    pub fn with(mut self, field: FieldKind, level: MaskLevel) -> Self {
        self.set(field, level);
        self
    }

    pub fn contains(&self, field: &FieldKind) -> bool {
        self.levels.contains_key(&field.canonical())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKind, MaskLevel)> {
        self.levels.iter().map(|(field, level)| (field, *level))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for PreferenceSet {
    fn default() -> Self {
        let levels = FieldKind::KNOWN
            .into_iter()
            .map(|field| {
                let level = field.default_level();
                (field, level)
            })
            .collect();

        Self { levels }
    }
}

impl FromIterator<(FieldKind, MaskLevel)> for PreferenceSet {
    fn from_iter<I: IntoIterator<Item = (FieldKind, MaskLevel)>>(iter: I) -> Self {
        Self {
            levels: iter
                .into_iter()
                .map(|(field, level)| (field.canonical(), level))
                .collect(),
        }
    }
}

/// Shared handle to one session's preferences.
///
/// Clones point at the same set. Updates swap a whole set under the write
/// lock, so readers observe either the old or the new set, never a mix.
pub struct PreferenceStore {
    preferences: Arc<RwLock<PreferenceSet>>,
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self::with_preferences(PreferenceSet::default())
    }

    pub fn with_preferences(preferences: PreferenceSet) -> Self {
        Self {
            preferences: Arc::new(RwLock::new(preferences)),
        }
    }

    /// Snapshot of the current set
    pub fn get_preferences(&self) -> PreferenceSet {
        self.preferences.read().clone()
    }

    /// Replace the whole set
    pub fn set_preferences(&self, preferences: PreferenceSet) {
        *self.preferences.write() = preferences;
        tracing::debug!("Replaced mask preferences");
    }

    /// Change one field's level, leaving every other field as it was
    pub fn update_preference(&self, field: FieldKind, level: MaskLevel) {
        let mut guard = self.preferences.write();
        let previous = guard.level(&field);
        guard.set(field.clone(), level);

        tracing::info!(
            field = %field,
            from = %previous,
            to = %level,
            "Updated mask preference"
        );
    }

    /// Current level for `field`
    pub fn level(&self, field: &FieldKind) -> MaskLevel {
        self.preferences.read().level(field)
    }

    /// Mask `value` at this session's level for `field`
    pub fn mask(&self, value: &str, field: &FieldKind) -> String {
        mask(value, field, self.level(field))
    }
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PreferenceStore {
    fn clone(&self) -> Self {
        Self {
            preferences: Arc::clone(&self.preferences),
        }
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("preferences", &*self.preferences.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preferences() {
        let prefs = PreferenceSet::default();

        assert_eq!(prefs.len(), 5);
        assert_eq!(prefs.level(&FieldKind::FirstName), MaskLevel::Partial);
        assert_eq!(prefs.level(&FieldKind::LastName), MaskLevel::Partial);
        assert_eq!(prefs.level(&FieldKind::Phone), MaskLevel::Full);
        assert_eq!(prefs.level(&FieldKind::Email), MaskLevel::Partial);
        assert_eq!(prefs.level(&FieldKind::Address), MaskLevel::Full);
    }

    #[test]
    fn test_missing_keys_fall_back() {
        let prefs = PreferenceSet::empty();
        assert_eq!(prefs.level(&FieldKind::Email), MaskLevel::Partial);
        assert_eq!(prefs.level(&FieldKind::Phone), MaskLevel::Full);
        assert_eq!(prefs.level(&FieldKind::from("school")), MaskLevel::Full);
    }

    #[test]
    fn test_update_preference_changes_one_field() {
        let store = PreferenceStore::new();
        store.update_preference(FieldKind::Phone, MaskLevel::None);
        let before = store.get_preferences();

        store.update_preference(FieldKind::Phone, MaskLevel::Full);
        let after = store.get_preferences();

        assert_eq!(after.level(&FieldKind::Phone), MaskLevel::Full);
        for field in [
            FieldKind::FirstName,
            FieldKind::LastName,
            FieldKind::Email,
            FieldKind::Address,
        ] {
            assert_eq!(after.level(&field), before.level(&field));
        }
        assert_eq!(after, before.with(FieldKind::Phone, MaskLevel::Full));
    }

    #[test]
    fn test_unknown_field_is_stored() {
        let store = PreferenceStore::new();
        let school = FieldKind::from("school");

        store.update_preference(school.clone(), MaskLevel::Partial);

        let prefs = store.get_preferences();
        assert!(prefs.contains(&school));
        assert_eq!(prefs.level(&school), MaskLevel::Partial);
        assert_eq!(store.mask("Lincoln High", &school), "L***");
    }

    #[test]
    fn test_set_preferences_replaces_whole_set() {
        let store = PreferenceStore::new();
        let replacement: PreferenceSet = FieldKind::KNOWN
            .into_iter()
            .map(|field| (field, MaskLevel::None))
            .collect();

        store.set_preferences(replacement.clone());

        assert_eq!(store.get_preferences(), replacement);
        assert_eq!(store.mask("5551234567", &FieldKind::Phone), "5551234567");
    }

    #[test]
    fn test_clones_share_state() {
        let store = PreferenceStore::new();
        let view = store.clone();

        store.update_preference(FieldKind::FirstName, MaskLevel::Full);
        assert_eq!(view.level(&FieldKind::FirstName), MaskLevel::Full);
        assert_eq!(view.mask("Alexander", &FieldKind::FirstName), "***");
    }

    #[test]
    fn test_known_key_spelled_as_other_is_the_same_field() {
        let prefs =
            PreferenceSet::default().with(FieldKind::Other("phone".to_string()), MaskLevel::None);

        assert_eq!(prefs.len(), 5);
        assert_eq!(prefs.level(&FieldKind::Phone), MaskLevel::None);
        assert!(prefs.contains(&FieldKind::Other("phone".to_string())));

        let json = serde_json::to_string(&prefs).unwrap();
        assert_eq!(json.matches("\"phone\"").count(), 1);

        let back: PreferenceSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prefs);
        assert_eq!(back.level(&FieldKind::Phone), MaskLevel::None);
    }

    #[test]
    fn test_serializes_as_map() {
        let prefs = PreferenceSet::default().with(FieldKind::from("school"), MaskLevel::None);
        let json = serde_json::to_value(&prefs).unwrap();

        assert_eq!(json["phone"], "full");
        assert_eq!(json["firstName"], "partial");
        assert_eq!(json["school"], "none");

        let back: PreferenceSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, prefs);
    }
}
