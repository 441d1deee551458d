//! Day grouping for the journal view.

use chrono::{Local, NaiveDate};

use crate::sighting::{local_day, parse_datetime, Sighting};

/// Sightings sharing one local calendar day. `day` is `None` for the
/// distinguished bucket of records with a missing or unparseable
/// datetime, which always sorts after every dated group.
#[derive(Debug, Clone)]
pub struct DayGroup {
    pub day: Option<NaiveDate>,
    pub sightings: Vec<Sighting>,
}

/// Sort newest-first and bucket by local calendar day.
///
/// Groups come out in descending day order; within a group the
/// pre-group datetime-descending order is preserved; the no-date bucket
/// is last.
pub fn group_by_day(sightings: &[Sighting]) -> Vec<DayGroup> {
    let mut sorted: Vec<Sighting> = sightings.to_vec();
    // Dated records newest-first; undated ones after all of them, in
    // their incoming order.
    sorted.sort_by_key(|s| {
        let dt = parse_datetime(&s.datetime);
        (dt.is_none(), std::cmp::Reverse(dt))
    });

    let mut groups: Vec<DayGroup> = Vec::new();
    for sighting in sorted {
        let day = local_day(&sighting);
        match groups.last_mut() {
            Some(group) if group.day == day => group.sightings.push(sighting),
            _ => groups.push(DayGroup {
                day,
                sightings: vec![sighting],
            }),
        }
    }
    groups
}

/// Human label for a day header: Today, Yesterday, or the full date.
pub fn day_label(day: Option<NaiveDate>) -> String {
    let Some(day) = day else {
        return "No date".to_string();
    };
    let today = Local::now().date_naive();
    if day == today {
        return "Today".to_string();
    }
    if let Some(yesterday) = today.pred_opt() {
        if day == yesterday {
            return "Yesterday".to_string();
        }
    }
    day.format("%A, %B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sighting(id: i64, datetime: &str) -> Sighting {
        Sighting {
            id,
            file_path: format!("photo-{id}.jpg"),
            species: "Dunlin".to_string(),
            datetime: datetime.to_string(),
            latitude: None,
            longitude: None,
            notes: String::new(),
            created_at: "2024-01-01 00:00:00".to_string(),
            updated_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_groups_by_day_with_no_date_bucket_last() {
        let sightings = vec![
            sighting(1, "2024-01-15T08:00:00"),
            sighting(2, "2024-01-16T23:00:00"),
            sighting(3, ""),
        ];

        let groups = group_by_day(&sightings);
        assert_eq!(groups.len(), 3);
        assert_eq!(
            groups[0].day,
            NaiveDate::from_ymd_opt(2024, 1, 16)
        );
        assert_eq!(
            groups[1].day,
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(groups[2].day, None);
        assert_eq!(groups[2].sightings[0].id, 3);
    }

    #[test]
    fn test_same_day_sightings_share_one_group_newest_first() {
        let sightings = vec![
            sighting(1, "2024-01-15T08:00:00"),
            sighting(2, "2024-01-15T23:00:00"),
        ];

        let groups = group_by_day(&sightings);
        assert_eq!(groups.len(), 1);
        let ids: Vec<i64> = groups[0].sightings.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_unparseable_datetime_lands_in_no_date_bucket() {
        let sightings = vec![sighting(1, "sometime in spring")];
        let groups = group_by_day(&sightings);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].day, None);
    }

    #[test]
    fn test_day_labels() {
        assert_eq!(day_label(None), "No date");
        let today = Local::now().date_naive();
        assert_eq!(day_label(Some(today)), "Today");
        assert_eq!(day_label(today.pred_opt()), "Yesterday");
        assert_eq!(
            day_label(NaiveDate::from_ymd_opt(2024, 1, 15)),
            "Monday, January 15, 2024"
        );
    }
}
