//! "Scene Fingerprints" sheet: fingerprints submitted against the wrong
//! scene, grouped by the scene currently carrying them.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

use backlog_model::{
    ColumnPattern, FingerprintAlgorithm, SceneFingerprintsItem, Sheet, SheetError,
};

use crate::diag::warn_row;
use crate::util::{parse_duration, parse_uuid};

fn hash_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-f0-9]+$").expect("valid regex"))
}

/// Row filtering for [`SceneFingerprints::parse`].
#[derive(Copy, Clone, Debug, Default)]
pub struct SceneFingerprintsOptions {
    pub skip_done: bool,
    /// Drop rows that do not name the scene the fingerprint belongs to.
    pub skip_no_correct_scene: bool,
    /// Carry the submitting user on the items.
    pub with_user: bool,
}

/// Parsed "Scene Fingerprints" sheet: per-scene fingerprint lists.
#[derive(Clone, Debug, Default)]
pub struct SceneFingerprints {
    groups: Vec<(Uuid, Vec<SceneFingerprintsItem>)>,
}

impl SceneFingerprints {
    pub fn parse(sheet: &Sheet, options: SceneFingerprintsOptions) -> Result<Self, SheetError> {
        let column_scene_id = sheet.require_column(&ColumnPattern::Text("Scene ID"))?;
        let column_algorithm = sheet.require_column(&ColumnPattern::Text("Algorithm"))?;
        let column_fingerprint = sheet.require_column(&ColumnPattern::Text("Fingerprint"))?;
        let column_correct_scene_id =
            sheet.require_column(&ColumnPattern::Text("Correct Scene ID"))?;
        let column_duration = sheet.require_column(&ColumnPattern::Text("Duration"))?;
        let column_user = sheet.require_column(&ColumnPattern::Text("Added by"))?;

        let mut groups: Vec<(Uuid, Vec<SceneFingerprintsItem>)> = Vec::new();
        let mut by_scene: HashMap<Uuid, usize> = HashMap::new();
        let mut last_seen: HashMap<String, usize> = HashMap::new();

        for row in &sheet.rows {
            let done = row.is_done(1)?;

            let scene_raw = row.cells[column_scene_id].value.trim();
            let algorithm_raw = row.cells[column_algorithm].value.trim();
            let hash = row.cells[column_fingerprint].value.trim();

            if options.skip_done && done {
                if last_seen.contains_key(scene_raw) {
                    last_seen.insert(scene_raw.to_string(), row.num);
                }
                continue;
            }

            if scene_raw.is_empty() || algorithm_raw.is_empty() || hash.is_empty() {
                continue;
            }

            match last_seen.get(scene_raw).copied() {
                Some(last) if row.num > last + 1 => {
                    warn_row!(
                        row.num,
                        "Ungrouped entries for scene ID {scene_raw:?} last seen row {last}"
                    );
                }
                _ => {
                    last_seen.insert(scene_raw.to_string(), row.num);
                }
            }

            let algorithm = match algorithm_raw {
                "phash" => FingerprintAlgorithm::Phash,
                "oshash" => FingerprintAlgorithm::Oshash,
                "md5" => FingerprintAlgorithm::Md5,
                _ => {
                    warn_row!(row.num, "Skipped due to invalid algorithm");
                    continue;
                }
            };

            if !valid_hash(algorithm, hash) {
                warn_row!(row.num, "Skipped due to invalid hash");
                continue;
            }

            let Some(scene_id) = parse_uuid(scene_raw) else {
                warn_row!(row.num, "Skipped due to invalid scene ID: {scene_raw}");
                continue;
            };

            let correct_raw = row.cells[column_correct_scene_id].value.trim();
            if options.skip_no_correct_scene && correct_raw.is_empty() {
                warn_row!(row.num, "Skipped due to missing correct scene ID");
                continue;
            }
            let correct_scene_id = match (correct_raw.is_empty(), parse_uuid(correct_raw)) {
                (true, _) => None,
                (false, Some(id)) => Some(id),
                (false, None) => {
                    warn_row!(row.num, "Ignored invalid correct scene ID: {correct_raw}");
                    None
                }
            };

            let duration_raw = row.cells[column_duration].value.trim();
            let duration = match duration_raw {
                "" | "-" => None,
                text => {
                    let parsed = parse_duration(text);
                    if parsed.is_none() {
                        warn_row!(row.num, "Invalid duration: {text}");
                    }
                    parsed.filter(|&seconds| seconds > 0)
                }
            };

            let user_raw = row.cells[column_user].value.trim();
            let user = (options.with_user && !user_raw.is_empty()).then(|| user_raw.to_string());

            let item = SceneFingerprintsItem {
                algorithm,
                hash: hash.to_string(),
                correct_scene_id,
                duration,
                user,
            };

            match by_scene.get(&scene_id) {
                Some(&idx) => groups[idx].1.push(item),
                None => {
                    by_scene.insert(scene_id, groups.len());
                    groups.push((scene_id, vec![item]));
                }
            }
        }

        // The same fingerprint is often reported by several users; keep one
        // entry per (algorithm, hash), the last one reported.
        for (_, items) in &mut groups {
            let mut by_key: HashMap<(FingerprintAlgorithm, String), usize> = HashMap::new();
            let mut deduped: Vec<SceneFingerprintsItem> = Vec::new();
            for item in items.drain(..) {
                let key = (item.algorithm, item.hash.clone());
                match by_key.get(&key) {
                    Some(&idx) => deduped[idx] = item,
                    None => {
                        by_key.insert(key, deduped.len());
                        deduped.push(item);
                    }
                }
            }
            *items = deduped;
        }

        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[(Uuid, Vec<SceneFingerprintsItem>)] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<(Uuid, Vec<SceneFingerprintsItem>)> {
        self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Hash grammar: lowercase hex; 16 digits for phash/oshash (with `0` as a
/// recognized degenerate phash), 32 for md5.
fn valid_hash(algorithm: FingerprintAlgorithm, hash: &str) -> bool {
    if !hash_pattern().is_match(hash) {
        return false;
    }
    match algorithm {
        FingerprintAlgorithm::Phash | FingerprintAlgorithm::Oshash => {
            hash.len() == 16 || hash == "0"
        }
        FingerprintAlgorithm::Md5 => hash.len() == 32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backlog_model::RawCell;
    use pretty_assertions::assert_eq;

    const HEADER: &[&str] = &[
        "Done",
        "Scene ID",
        "Algorithm",
        "Fingerprint",
        "Correct Scene ID",
        "Duration",
        "Added by",
    ];

    const SCENE: &str = "11111111-1111-4111-8111-111111111111";
    const CORRECT: &str = "22222222-2222-4222-8222-222222222222";
    const OSHASH: &str = "a1b2c3d4e5f60718";
    const MD5: &str = "a1b2c3d4e5f60718a1b2c3d4e5f60718";

    fn sheet(rows: Vec<Vec<RawCell>>) -> Sheet {
        let mut grid = vec![HEADER.iter().map(|h| RawCell::text(*h)).collect()];
        grid.extend(rows);
        Sheet::parse_data("scene fingerprints", grid, Some(1)).unwrap()
    }

    fn row(scene: &str, algorithm: &str, hash: &str, correct: &str, duration: &str) -> Vec<RawCell> {
        vec![
            RawCell::text("FALSE"),
            RawCell::text(scene),
            RawCell::text(algorithm),
            RawCell::text(hash),
            RawCell::text(correct),
            RawCell::text(duration),
            RawCell::text("curator"),
        ]
    }

    #[test]
    fn groups_fingerprints_by_scene() {
        let data = SceneFingerprints::parse(
            &sheet(vec![
                row(SCENE, "oshash", OSHASH, CORRECT, "1:02:03"),
                row(SCENE, "md5", MD5, "", "-"),
            ]),
            SceneFingerprintsOptions::default(),
        )
        .unwrap();

        assert_eq!(data.len(), 1);
        let (scene, items) = &data.groups()[0];
        assert_eq!(scene.to_string(), SCENE);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].algorithm, FingerprintAlgorithm::Oshash);
        assert_eq!(items[0].correct_scene_id.map(|id| id.to_string()), Some(CORRECT.into()));
        assert_eq!(items[0].duration, Some(3723));
        assert_eq!(items[1].correct_scene_id, None);
        assert_eq!(items[1].duration, None);
        assert_eq!(items[0].user, None);
    }

    #[test]
    fn invalid_algorithm_hash_or_scene_is_skipped() {
        let data = SceneFingerprints::parse(
            &sheet(vec![
                row(SCENE, "sha1", OSHASH, "", ""),
                row(SCENE, "oshash", "XYZ", "", ""),
                row(SCENE, "oshash", "abc", "", ""),
                row(SCENE, "md5", OSHASH, "", ""),
                row("not-a-uuid", "oshash", OSHASH, "", ""),
            ]),
            SceneFingerprintsOptions::default(),
        )
        .unwrap();

        assert!(data.is_empty());
    }

    #[test]
    fn degenerate_zero_phash_is_accepted() {
        let data = SceneFingerprints::parse(
            &sheet(vec![row(SCENE, "phash", "0", "", "")]),
            SceneFingerprintsOptions::default(),
        )
        .unwrap();
        assert_eq!(data.groups()[0].1[0].hash, "0");
    }

    #[test]
    fn repeated_algorithm_hash_pairs_keep_the_last_report() {
        let data = SceneFingerprints::parse(
            &sheet(vec![
                row(SCENE, "oshash", OSHASH, "", ""),
                row(SCENE, "oshash", OSHASH, CORRECT, ""),
            ]),
            SceneFingerprintsOptions::default(),
        )
        .unwrap();

        let items = &data.groups()[0].1;
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].correct_scene_id.map(|id| id.to_string()),
            Some(CORRECT.into())
        );
    }

    #[test]
    fn options_gate_correct_scene_and_user() {
        let rows = vec![row(SCENE, "oshash", OSHASH, "", "")];
        let data = SceneFingerprints::parse(
            &sheet(rows.clone()),
            SceneFingerprintsOptions {
                skip_no_correct_scene: true,
                ..SceneFingerprintsOptions::default()
            },
        )
        .unwrap();
        assert!(data.is_empty());

        let data = SceneFingerprints::parse(
            &sheet(rows),
            SceneFingerprintsOptions {
                with_user: true,
                ..SceneFingerprintsOptions::default()
            },
        )
        .unwrap();
        assert_eq!(data.groups()[0].1[0].user.as_deref(), Some("curator"));
    }

    #[test]
    fn done_rows_are_skipped_when_configured() {
        let mut done_row = row(SCENE, "oshash", OSHASH, "", "");
        done_row[0] = RawCell::text("TRUE");

        let data = SceneFingerprints::parse(
            &sheet(vec![done_row.clone()]),
            SceneFingerprintsOptions {
                skip_done: true,
                ..SceneFingerprintsOptions::default()
            },
        )
        .unwrap();
        assert!(data.is_empty());

        let data = SceneFingerprints::parse(
            &sheet(vec![done_row]),
            SceneFingerprintsOptions::default(),
        )
        .unwrap();
        assert_eq!(data.len(), 1);
    }
}
