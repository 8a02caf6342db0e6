use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Story points awarded for each man-day count in the default table, days 1 through 10.
const DEFAULT_POINTS: [i64; 10] = [1, 1, 3, 3, 5, 5, 5, 8, 8, 8];

/// One row of the man-days to story points lookup table.
///
/// `days` is the lookup key. Duplicate keys are allowed; lookups take the
/// first match in table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryPointMappingRow {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub days: i64,
    pub points: i64,
}

impl StoryPointMappingRow {
    pub fn new(days: i64, points: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            days,
            points,
        }
    }
}

/// The mapping table used when nothing has been persisted yet.
pub fn default_story_point_mapping() -> Vec<StoryPointMappingRow> {
    DEFAULT_POINTS
        .iter()
        .zip(1..)
        .map(|(&points, days)| StoryPointMappingRow::new(days, points))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_covers_one_to_ten_days() {
        let table = default_story_point_mapping();
        let pairs: Vec<(i64, i64)> = table.iter().map(|r| (r.days, r.points)).collect();
        assert_eq!(
            pairs,
            vec![
                (1, 1),
                (2, 1),
                (3, 3),
                (4, 3),
                (5, 5),
                (6, 5),
                (7, 5),
                (8, 8),
                (9, 8),
                (10, 8)
            ]
        );
    }

    #[test]
    fn test_row_without_id_gets_one_on_load() {
        let row: StoryPointMappingRow = serde_json::from_str(r#"{"days":3,"points":5}"#).unwrap();
        assert_eq!(row.days, 3);
        assert_eq!(row.points, 5);
        assert!(!row.id.is_nil());
    }
}
