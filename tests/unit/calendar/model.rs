use super::*;

fn week_starting(start: NaiveDate, counts: [u32; 7]) -> Week {
    Week {
        days: counts
            .iter()
            .enumerate()
            .map(|(i, &c)| Day::new(start + chrono::Duration::days(i as i64), c))
            .collect(),
    }
}

fn sunday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
}

#[test]
fn well_formed_calendar_validates() {
    let cal = CalendarData {
        total_contributions: 3,
        weeks: vec![week_starting(sunday(), [0, 1, 0, 2, 0, 0, 0])],
    };
    cal.validate().unwrap();
    assert_eq!(cal.week_count(), 1);
    assert_eq!(cal.days().count(), 7);
}

#[test]
fn empty_calendar_is_rejected() {
    let cal = CalendarData {
        total_contributions: 0,
        weeks: vec![],
    };
    let err = cal.validate().unwrap_err();
    assert!(matches!(err, HeatwallError::RenderPrecondition(_)));
}

#[test]
fn short_week_is_rejected_with_its_index() {
    let mut short = week_starting(sunday(), [0; 7]);
    short.days.truncate(5);
    let cal = CalendarData {
        total_contributions: 0,
        weeks: vec![week_starting(sunday(), [0; 7]), short],
    };
    let msg = cal.validate().unwrap_err().to_string();
    assert!(msg.contains("week 1 has 5 days"), "{msg}");
}

#[test]
fn busiest_day_ignores_empty_calendars() {
    let quiet = CalendarData {
        total_contributions: 0,
        weeks: vec![week_starting(sunday(), [0; 7])],
    };
    assert!(quiet.busiest_day().is_none());

    let busy = CalendarData {
        total_contributions: 12,
        weeks: vec![week_starting(sunday(), [0, 1, 9, 2, 0, 0, 0])],
    };
    let day = busy.busiest_day().unwrap();
    assert_eq!(day.contribution_count, 9);
    assert_eq!(day.date, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
}
