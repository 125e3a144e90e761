use csv::WriterBuilder;
use crate::domain::models::report::TabularRow;
use crate::error::AppError;

/// Flattens report rows into CSV. The header row is always present, so an
/// empty report still describes its columns.
pub fn to_csv<R: TabularRow>(rows: &[R]) -> Result<String, AppError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(R::COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to flush CSV writer: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV output is not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::domain::models::report::{ItemInUseRow, OverdueRow, UsageRow};
    use crate::domain::models::{assignment::AssignmentStatus, user::Role};

    fn overdue_row() -> OverdueRow {
        OverdueRow {
            assignment_id: "a-1".into(),
            item_sku: "SKU-1".into(),
            item_name: "Air mover, large".into(),
            job_name: "Flood".into(),
            job_claim_id: None,
            assigned_to: "Tess Tech".into(),
            user_email: Some("tess@example.com".into()),
            user_phone: None,
            check_out_time: Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()),
            expected_return_date: Some(Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap()),
            days_overdue: 3,
        }
    }

    #[test]
    fn test_empty_report_still_has_header() {
        let csv = to_csv::<ItemInUseRow>(&[]).unwrap();
        assert_eq!(csv.trim_end(), ItemInUseRow::COLUMNS.join(","));
    }

    #[test]
    fn test_columns_match_json_keys() {
        let row = overdue_row();
        let json = serde_json::to_value(&row).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        let mut expected: Vec<&str> = OverdueRow::COLUMNS.to_vec();
        let mut actual = keys.clone();
        expected.sort_unstable();
        actual.sort_unstable();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_rows_follow_header_order() {
        let csv = to_csv(&[overdue_row()]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), OverdueRow::COLUMNS.join(","));
        let record = lines.next().unwrap();
        assert!(record.starts_with("a-1,SKU-1,\"Air mover, large\",Flood,,Tess Tech,tess@example.com,,"));
        assert!(record.ends_with(",3"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_usage_row_serializes_enums_as_text() {
        let row = UsageRow {
            assignment_id: "a-1".into(),
            item_sku: "SKU-1".into(),
            item_name: "Fan".into(),
            item_category: Some("Drying".into()),
            job_name: "Flood".into(),
            job_claim_id: Some("C-1".into()),
            user_name: "tech".into(),
            user_role: Role::Technician,
            check_out_time: None,
            check_in_time: None,
            duration_hours: Some(5.5),
            status: AssignmentStatus::CheckedIn,
            condition_at_checkout: None,
            condition_at_checkin: None,
            notes: None,
        };
        let csv = to_csv(&[row]).unwrap();
        let record = csv.lines().nth(1).unwrap();
        assert_eq!(record, "a-1,SKU-1,Fan,Drying,Flood,C-1,tech,technician,,,5.5,checked_in,,,");
    }
}
