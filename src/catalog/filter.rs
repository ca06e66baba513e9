use super::record::Record;

/// Case-insensitive substring filter, OR across `fields`.
///
/// The query is trimmed first; an empty query keeps every record. The input
/// slice is never touched, a fresh `Vec` is always returned.
pub fn apply<R: Record>(query: &str, records: &[R], fields: &[&str]) -> Vec<R> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| matches(*r, &needle, fields))
        .cloned()
        .collect()
}

fn matches<R: Record>(record: &R, needle: &str, fields: &[&str]) -> bool {
    fields
        .iter()
        .filter_map(|f| record.field(f))
        .any(|value| value.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::{CompetitionEntry, JuryMember};

    fn jury() -> Vec<JuryMember> {
        vec![
            JuryMember {
                name: "Ana".to_string(),
                role: "Host".to_string(),
                ..Default::default()
            },
            JuryMember {
                name: "Leo".to_string(),
                role: "Judge".to_string(),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn empty_and_blank_queries_are_identity() {
        let records = jury();
        assert_eq!(apply("", &records, &["name", "role"]), records);
        assert_eq!(apply("   \t", &records, &["name", "role"]), records);
    }

    #[test]
    fn match_is_case_insensitive_and_trimmed() {
        let out = apply("  JUDGE ", &jury(), &["name", "role"]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Leo");
    }

    #[test]
    fn any_field_is_enough() {
        let records = jury();
        assert_eq!(apply("an", &records, &["role", "name"]).len(), 1);
        assert!(apply("an", &records, &["role"]).is_empty());
    }

    #[test]
    fn unknown_fields_never_match() {
        assert!(apply("ana", &jury(), &["nickname"]).is_empty());
    }

    #[test]
    fn non_ascii_case_folding() {
        let records = vec![CompetitionEntry {
            category: "Folclórica".to_string(),
            ..Default::default()
        }];
        assert_eq!(apply("FOLCLÓRICA", &records, &["category"]).len(), 1);
    }

    #[test]
    fn soundness_and_completeness_over_a_grid_of_queries() {
        let records = jury();
        let fields = ["name", "role"];
        for q in ["a", "e", "o", "h", "ju", "st", "x", "LEO"] {
            let out = apply(q, &records, &fields);
            let lower = q.to_lowercase();
            let expected: Vec<_> = records
                .iter()
                .filter(|r| {
                    r.name.to_lowercase().contains(&lower) || r.role.to_lowercase().contains(&lower)
                })
                .cloned()
                .collect();
            assert_eq!(out, expected, "query {q}");
        }
    }
}
