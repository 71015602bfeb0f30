use crate::types::FileRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

const MATCH_ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Name,
    Newest,
    Oldest,
    Size,
    Risk,
    /// Any key the engine does not recognize; leaves the order untouched.
    #[serde(other)]
    Unsorted,
}

impl From<&str> for SortKey {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "name" => SortKey::Name,
            "newest" => SortKey::Newest,
            "oldest" => SortKey::Oldest,
            "size" => SortKey::Size,
            "risk" => SortKey::Risk,
            _ => SortKey::Unsorted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub search_text: String,
    pub type_filter: String,
    pub risk_filter: String,
    pub sort_key: SortKey,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            type_filter: MATCH_ALL.to_string(),
            risk_filter: MATCH_ALL.to_string(),
            sort_key: SortKey::Unsorted,
        }
    }
}

impl Query {
    fn matches(&self, record: &FileRecord) -> bool {
        let filename = record.filename.to_lowercase();

        let search = self.search_text.to_lowercase();
        let matches_search =
            filename.contains(&search) || record.id.to_lowercase().contains(&search);

        let type_filter = self.type_filter.to_lowercase();
        let matches_type = type_filter == MATCH_ALL || filename.ends_with(&type_filter);

        let risk_filter = self.risk_filter.to_lowercase();
        let matches_risk = risk_filter == MATCH_ALL
            || record
                .risk_assessment
                .as_ref()
                .is_some_and(|risk| risk.level.to_lowercase() == risk_filter);

        matches_search && matches_type && matches_risk
    }
}

pub fn filter_files<'a>(records: &'a [FileRecord], query: &Query) -> Vec<&'a FileRecord> {
    records.iter().filter(|record| query.matches(record)).collect()
}

fn compare_names(a: &FileRecord, b: &FileRecord) -> Ordering {
    a.filename
        .to_lowercase()
        .cmp(&b.filename.to_lowercase())
        .then_with(|| b.filename.cmp(&a.filename))
}

fn score_or_zero(record: &FileRecord) -> f64 {
    record.risk_score().unwrap_or(0.0)
}

/// Stable sort into a new vector; the input order is kept for ties and for
/// unrecognized keys.
pub fn sort_files<'a>(records: &[&'a FileRecord], key: &SortKey) -> Vec<&'a FileRecord> {
    let mut sorted = records.to_vec();
    match key {
        SortKey::Name => sorted.sort_by(|a, b| compare_names(a, b)),
        SortKey::Newest => sorted.sort_by(|a, b| b.uploaded_at().cmp(&a.uploaded_at())),
        SortKey::Oldest => sorted.sort_by(|a, b| a.uploaded_at().cmp(&b.uploaded_at())),
        SortKey::Size => sorted.sort_by(|a, b| b.size_bytes().cmp(&a.size_bytes())),
        SortKey::Risk => sorted.sort_by(|a, b| score_or_zero(b).total_cmp(&score_or_zero(a))),
        SortKey::Unsorted => {}
    }
    sorted
}

pub fn apply_query<'a>(records: &'a [FileRecord], query: &Query) -> Vec<&'a FileRecord> {
    sort_files(&filter_files(records, query), &query.sort_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RiskAssessment;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn record(
        id: &str,
        filename: &str,
        size: Option<u64>,
        uploaded: &str,
        risk: Option<(f64, &str)>,
    ) -> FileRecord {
        FileRecord {
            id: id.to_string(),
            filename: filename.to_string(),
            file_size: size,
            upload_time: uploaded.to_string(),
            has_static_analysis: false,
            has_dynamic_analysis: false,
            risk_assessment: risk.map(|(score, level)| RiskAssessment {
                score: Some(score),
                level: level.to_string(),
                factors: Vec::new(),
            }),
        }
    }

    fn sample() -> Vec<FileRecord> {
        vec![
            record("d41d8c", "Setup.EXE", Some(4096), "2024-01-03 09:00:00", Some((90.0, "Critical"))),
            record("9e107d", "notes.pdf", None, "2024-01-01 09:00:00", None),
            record("e4d909", "helper.dll", Some(1024), "2024-01-02 09:00:00", Some((10.0, "Low"))),
        ]
    }

    fn ids(records: &[&FileRecord]) -> Vec<String> {
        records.iter().map(|record| record.id.clone()).collect()
    }

    #[test]
    fn all_pass_query_returns_everything_in_order() {
        let files = sample();
        assert_eq!(ids(&apply_query(&files, &Query::default())), vec!["d41d8c", "9e107d", "e4d909"]);
    }

    #[test]
    fn search_matches_filename_or_id_case_insensitively() {
        let files = sample();
        let by_name = Query { search_text: "SETUP".to_string(), ..Query::default() };
        assert_eq!(ids(&filter_files(&files, &by_name)), vec!["d41d8c"]);

        let by_id = Query { search_text: "9E10".to_string(), ..Query::default() };
        assert_eq!(ids(&filter_files(&files, &by_id)), vec!["9e107d"]);
    }

    #[test]
    fn type_filter_matches_lowercased_suffix() {
        let files = sample();
        let query = Query { type_filter: ".exe".to_string(), ..Query::default() };
        assert_eq!(ids(&filter_files(&files, &query)), vec!["d41d8c"]);
    }

    #[test]
    fn risk_filter_never_matches_unassessed_records() {
        let files = sample();
        let low = Query { risk_filter: "low".to_string(), ..Query::default() };
        assert_eq!(ids(&filter_files(&files, &low)), vec!["e4d909"]);

        let unknown = Query { risk_filter: "unknown".to_string(), ..Query::default() };
        assert!(filter_files(&files, &unknown).is_empty());
    }

    #[test]
    fn sorts_by_each_key() {
        let files = sample();
        let all: Vec<&FileRecord> = files.iter().collect();

        assert_eq!(ids(&sort_files(&all, &SortKey::Name)), vec!["e4d909", "9e107d", "d41d8c"]);
        assert_eq!(ids(&sort_files(&all, &SortKey::Newest)), vec!["d41d8c", "e4d909", "9e107d"]);
        assert_eq!(ids(&sort_files(&all, &SortKey::Oldest)), vec!["9e107d", "e4d909", "d41d8c"]);
        assert_eq!(ids(&sort_files(&all, &SortKey::Size)), vec!["d41d8c", "e4d909", "9e107d"]);
        assert_eq!(ids(&sort_files(&all, &SortKey::Risk)), vec!["d41d8c", "e4d909", "9e107d"]);
        assert_eq!(ids(&sort_files(&all, &SortKey::from("bogus"))), vec!["d41d8c", "9e107d", "e4d909"]);
    }

    #[test]
    fn name_sort_is_idempotent() {
        let files = sample();
        let all: Vec<&FileRecord> = files.iter().collect();
        let once = sort_files(&all, &SortKey::Name);
        let twice = sort_files(&once, &SortKey::Name);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn name_ties_put_lowercase_first() {
        let files = vec![
            record("upper", "A.exe", None, "", None),
            record("lower", "a.exe", None, "", None),
        ];
        let all: Vec<&FileRecord> = files.iter().collect();
        assert_eq!(ids(&sort_files(&all, &SortKey::Name)), vec!["lower", "upper"]);
    }

    #[test]
    fn unparseable_upload_times_sort_as_oldest() {
        let files = vec![
            record("a", "a.bin", None, "not a date", None),
            record("b", "b.bin", None, "2024-05-01T00:00:00Z", None),
        ];
        let all: Vec<&FileRecord> = files.iter().collect();
        assert_eq!(ids(&sort_files(&all, &SortKey::Newest)), vec!["b", "a"]);
        assert_eq!(ids(&sort_files(&all, &SortKey::Oldest)), vec!["a", "b"]);
    }

    #[test]
    fn sort_key_parses_from_select_values() {
        assert_eq!(SortKey::from("Newest"), SortKey::Newest);
        assert_eq!(SortKey::from("risk"), SortKey::Risk);
        assert_eq!(SortKey::from(""), SortKey::Unsorted);
    }

    fn arb_record() -> impl Strategy<Value = FileRecord> {
        (
            "[a-f0-9]{6}",
            "[a-zA-Z]{1,6}\\.(exe|dll|pdf)",
            proptest::option::of(0u64..10_000),
            proptest::option::of((
                0.0f64..100.0,
                prop_oneof![Just("Low"), Just("Medium"), Just("High"), Just("Critical")],
            )),
        )
            .prop_map(|(id, filename, size, risk)| FileRecord {
                id,
                filename,
                file_size: size,
                upload_time: String::new(),
                has_static_analysis: false,
                has_dynamic_analysis: false,
                risk_assessment: risk.map(|(score, level)| RiskAssessment {
                    score: Some(score),
                    level: level.to_string(),
                    factors: Vec::new(),
                }),
            })
    }

    fn arb_query() -> impl Strategy<Value = Query> {
        (
            "[a-z0-9.]{0,3}",
            prop_oneof![Just("all"), Just(".exe"), Just(".dll"), Just(".pdf")],
            prop_oneof![Just("all"), Just("low"), Just("medium"), Just("high"), Just("critical")],
            prop_oneof![
                Just("name"),
                Just("newest"),
                Just("oldest"),
                Just("size"),
                Just("risk"),
                Just("other"),
            ],
        )
            .prop_map(|(search_text, type_filter, risk_filter, sort)| Query {
                search_text,
                type_filter: type_filter.to_string(),
                risk_filter: risk_filter.to_string(),
                sort_key: SortKey::from(sort),
            })
    }

    fn sorted_ids(records: &[&FileRecord]) -> Vec<String> {
        let mut ids = ids(records);
        ids.sort();
        ids
    }

    proptest! {
        #[test]
        fn filtering_yields_a_subset(files in proptest::collection::vec(arb_record(), 0..12), query in arb_query()) {
            let filtered = filter_files(&files, &query);
            prop_assert!(filtered.len() <= files.len());
            for record in filtered {
                prop_assert!(files.iter().any(|candidate| std::ptr::eq(candidate, record)));
            }
        }

        #[test]
        fn sorting_is_a_permutation(files in proptest::collection::vec(arb_record(), 0..12), query in arb_query()) {
            let all: Vec<&FileRecord> = files.iter().collect();
            let sorted = sort_files(&all, &query.sort_key);
            prop_assert_eq!(sorted_ids(&sorted), sorted_ids(&all));
        }
    }
}
