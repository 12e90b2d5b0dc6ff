#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::parsing::json_parser::{parse_scores_json, parse_scores_json_str};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ROW: &str = r#"{"class": 1, "chinese": 110, "math": 120.5, "english": 105,
        "physics": 80, "chemistry": 75, "biology": 70, "history": 85,
        "politics": 90, "geography": 88}"#;

    #[test]
    fn test_parse_bare_array() {
        let json = format!("[{}, {}]", ROW, ROW);
        let table = parse_scores_json_str(&json).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].class_id, "1");
        assert_eq!(table.records[0].scores.math, Some(120.5));
        assert!(table.records[0].is_complete());
    }

    #[test]
    fn test_parse_students_wrapper() {
        let json = format!(r#"{{"students": [{}]}}"#, ROW);
        let table = parse_scores_json_str(&json).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_string_class_and_null_scores() {
        let json = r#"[{"class": " 7 ", "chinese": null, "math": "118", "english": "",
            "physics": 80, "chemistry": 75, "biology": 70, "history": 85,
            "politics": 90, "geography": 88}]"#;
        let table = parse_scores_json_str(json).unwrap();

        let record = &table.records[0];
        assert_eq!(record.class_id, "7");
        assert_eq!(record.scores.chinese, None);
        assert_eq!(record.scores.math, Some(118.0));
        assert_eq!(record.scores.english, None);
    }

    #[test]
    fn test_key_absent_from_some_rows_is_a_blank() {
        let partial = r#"{"class": 1, "chinese": 110, "math": 120, "english": 105,
            "physics": 80, "chemistry": 75, "biology": 70, "history": 85, "politics": 90}"#;
        let json = format!("[{}, {}]", ROW, partial);
        let table = parse_scores_json_str(&json).unwrap();
        assert_eq!(table.records[1].scores.geography, None);
    }

    #[test]
    fn test_key_absent_from_every_row_is_missing_column() {
        let json = r#"[{"class": 1, "chinese": 110, "math": 120, "english": 105,
            "physics": 80, "chemistry": 75, "biology": 70, "history": 85, "politics": 90}]"#;
        let err = parse_scores_json_str(json).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::MissingColumn(c)) if c == "geography"
        ));
    }

    #[test]
    fn test_row_without_class_fails() {
        let json = r#"[{"chinese": 110, "math": 120, "english": 105, "physics": 80,
            "chemistry": 75, "biology": 70, "history": 85, "politics": 90, "geography": 88}]"#;
        let result = parse_scores_json_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_documents() {
        assert!(parse_scores_json_str("not json").is_err());
        assert!(parse_scores_json_str(r#"{"rows": []}"#).is_err());
        assert!(parse_scores_json_str("[1, 2]").is_err());
    }

    #[test]
    fn test_empty_array_parses_to_empty_table() {
        let table = parse_scores_json_str("[]").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[{}]", ROW).unwrap();

        let table = parse_scores_json(temp_file.path()).unwrap();
        assert_eq!(table.len(), 1);
    }
}
