use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A structured "remove" or "append" instruction describing one identity
/// participating in an edit.
///
/// Equality covers `(id, name, appearance)` only — the tuple that defines
/// duplicate suppression within one remove/append list.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disambiguation: Option<String>,
    pub appearance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl PartialEq for ChangeEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name && self.appearance == other.appearance
    }
}

impl Eq for ChangeEntry {}

impl ChangeEntry {
    pub fn display_name(&self) -> String {
        display_name(
            &self.name,
            self.disambiguation.as_deref(),
            self.appearance.as_deref(),
        )
    }
}

/// A remove/append pair inferred to be an in-place appearance update rather
/// than an independent removal plus addition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEntry {
    pub id: Uuid,
    pub name: String,
    pub appearance: Option<String>,
    pub old_appearance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disambiguation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl UpdateEntry {
    pub fn display_name(&self) -> String {
        display_name(
            &self.name,
            self.disambiguation.as_deref(),
            self.appearance.as_deref(),
        )
    }
}

/// Diagnostic rendering of an identity: preferred appearance first, then the
/// profile name, then a disambiguation where one exists.
pub fn display_name(name: &str, disambiguation: Option<&str>, appearance: Option<&str>) -> String {
    if let Some(appearance) = appearance {
        format!("{appearance} ({name})")
    } else if let Some(disambiguation) = disambiguation {
        format!("{name} [{disambiguation}]")
    } else {
        name.to_string()
    }
}

/// One candidate external identity extracted from a free-text cell of a
/// record that should be split into separate records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub raw: String,
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub done: bool,
}

/// One merged scene record: performers to remove, append and update.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenePerformersItem {
    pub studio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_studio: Option<String>,
    pub scene_id: Uuid,
    pub remove: Vec<ChangeEntry>,
    pub append: Vec<ChangeEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub update: Vec<UpdateEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub submitted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

/// One record to be split into the identities named by its fragments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPerformerItem {
    pub name: String,
    pub id: Uuid,
    pub fragments: Vec<Fragment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// Scene metadata fields a correction row may target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneChangeField {
    Title,
    Details,
    Date,
    StudioId,
    Code,
    Director,
    Duration,
    Image,
    Url,
}

/// One validated scene metadata correction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneChangeItem {
    pub field: SceneChangeField,
    pub new_data: Option<String>,
    pub correction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub submitted: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub done: bool,
}

/// One group of duplicate scenes to merge into `main_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateScenesItem {
    pub studio: String,
    pub main_id: Uuid,
    pub duplicates: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// One group of duplicate performers to merge into `main_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicatePerformersItem {
    pub name: String,
    pub main_id: Uuid,
    pub duplicates: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub submitted: bool,
}

/// One external profile URL to attach to a performer record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformerUrlItem {
    pub url: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub submitted: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintAlgorithm {
    Phash,
    Oshash,
    Md5,
}

/// One fingerprint submitted against the wrong scene.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneFingerprintsItem {
    pub algorithm: FingerprintAlgorithm,
    pub hash: String,
    pub correct_scene_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(id: Option<Uuid>, name: &str, appearance: Option<&str>) -> ChangeEntry {
        ChangeEntry {
            id,
            name: name.into(),
            appearance: appearance.map(String::from),
            ..ChangeEntry::default()
        }
    }

    #[test]
    fn change_entry_equality_ignores_status_and_notes() {
        let id = Some(Uuid::nil());
        let mut a = entry(id, "Jane", Some("JD"));
        let mut b = entry(id, "Jane", Some("JD"));
        a.status = Some("new".into());
        b.notes = vec!["a note".into()];

        assert_eq!(a, b);
        assert_ne!(a, entry(id, "Jane", None));
        assert_ne!(a, entry(None, "Jane", Some("JD")));
    }

    #[test]
    fn display_name_prefers_appearance() {
        assert_eq!(display_name("Jane", None, Some("JD")), "JD (Jane)");
        assert_eq!(display_name("Jane", Some("stage"), None), "Jane [stage]");
        assert_eq!(display_name("Jane", None, None), "Jane");
    }

    #[test]
    fn optional_fields_stay_out_of_json() {
        let entry = entry(None, "Jane", None);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": null, "name": "Jane", "appearance": null })
        );
    }

    #[test]
    fn scene_change_field_serializes_snake_case() {
        let json = serde_json::to_value(SceneChangeField::StudioId).unwrap();
        assert_eq!(json, serde_json::json!("studio_id"));
    }
}
