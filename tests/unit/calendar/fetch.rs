use super::*;

fn day_json(date: &str, count: u32) -> serde_json::Value {
    serde_json::json!({ "date": date, "contributionCount": count, "color": "#ebedf0" })
}

fn calendar_body(total: u32, weeks: Vec<Vec<serde_json::Value>>) -> String {
    let weeks: Vec<_> = weeks
        .into_iter()
        .map(|days| serde_json::json!({ "contributionDays": days }))
        .collect();
    serde_json::json!({
        "data": {
            "user": {
                "contributionsCollection": {
                    "contributionCalendar": {
                        "totalContributions": total,
                        "weeks": weeks,
                    }
                }
            }
        }
    })
    .to_string()
}

#[test]
fn full_weeks_pass_through_in_order() {
    // 2024-01-07 is a Sunday.
    let days = (7..=13)
        .map(|d| day_json(&format!("2024-01-{d:02}"), d - 7))
        .collect();
    let cal = parse_response(&calendar_body(21, vec![days]), "octo").unwrap();

    assert_eq!(cal.total_contributions, 21);
    assert_eq!(cal.weeks.len(), 1);
    let counts: Vec<u32> = cal.weeks[0]
        .days
        .iter()
        .map(|d| d.contribution_count)
        .collect();
    assert_eq!(counts, vec![0, 1, 2, 3, 4, 5, 6]);
    assert_eq!(cal.weeks[0].days[0].color.as_deref(), Some("#ebedf0"));
    cal.validate().unwrap();
}

#[test]
fn partial_weeks_are_padded_at_their_weekday_rows() {
    // Leading week starts on Wednesday 2024-01-10, trailing week ends on Monday 2024-01-15.
    let leading = (10..=13)
        .map(|d| day_json(&format!("2024-01-{d:02}"), 1))
        .collect();
    let trailing = vec![day_json("2024-01-14", 4), day_json("2024-01-15", 11)];
    let cal = parse_response(&calendar_body(19, vec![leading, trailing]), "octo").unwrap();
    cal.validate().unwrap();

    let first = &cal.weeks[0].days;
    assert_eq!(first[0].date, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
    assert_eq!(first[0].contribution_count, 0);
    assert!(first[0].color.is_none());
    assert_eq!(first[3].date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    assert_eq!(first[3].contribution_count, 1);

    let last = &cal.weeks[1].days;
    assert_eq!(last[1].contribution_count, 11);
    assert_eq!(last[6].date, NaiveDate::from_ymd_opt(2024, 1, 20).unwrap());
    assert_eq!(last[6].contribution_count, 0);
}

#[test]
fn empty_weeks_are_dropped() {
    let body = calendar_body(0, vec![vec![]]);
    let cal = parse_response(&body, "octo").unwrap();
    assert!(cal.weeks.is_empty());
}

#[test]
fn errors_field_short_circuits() {
    let body = serde_json::json!({
        "data": null,
        "errors": [{ "message": "Bad credentials" }, { "message": "try again" }]
    })
    .to_string();
    let err = parse_response(&body, "octo").unwrap_err();
    match err {
        FetchError::Query(msgs) => assert_eq!(msgs, vec!["Bad credentials", "try again"]),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn null_user_is_reported_by_login() {
    let body = serde_json::json!({ "data": { "user": null } }).to_string();
    let err = parse_response(&body, "ghost").unwrap_err();
    assert!(matches!(err, FetchError::UserNotFound(ref u) if u == "ghost"));
}

#[test]
fn malformed_shapes_are_rejected() {
    assert!(matches!(
        parse_response("not json", "octo"),
        Err(FetchError::Shape(_))
    ));
    assert!(matches!(
        parse_response("{}", "octo"),
        Err(FetchError::Shape(_))
    ));
    let missing_total = serde_json::json!({
        "data": { "user": { "contributionsCollection": { "contributionCalendar": { "weeks": [] } } } }
    })
    .to_string();
    assert!(matches!(
        parse_response(&missing_total, "octo"),
        Err(FetchError::Shape(_))
    ));
}

#[test]
fn days_outside_their_week_are_rejected() {
    let days = vec![day_json("2024-01-07", 1), day_json("2024-01-20", 1)];
    let err = parse_response(&calendar_body(2, vec![days]), "octo").unwrap_err();
    assert!(matches!(err, FetchError::Shape(_)));
}

#[test]
fn repeated_dates_are_rejected() {
    let days = vec![
        day_json("2024-01-07", 1),
        day_json("2024-01-08", 2),
        day_json("2024-01-08", 5),
    ];
    let err = parse_response(&calendar_body(8, vec![days]), "octo").unwrap_err();
    match err {
        FetchError::Shape(msg) => assert!(msg.contains("2024-01-08"), "{msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn request_body_spans_the_window() {
    let now = DateTime::parse_from_rfc3339("2024-06-30T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    let body = request_body("octo", now, 365);

    assert_eq!(body["variables"]["username"], "octo");
    assert_eq!(body["variables"]["to"], "2024-06-30T12:00:00Z");
    assert_eq!(body["variables"]["from"], "2023-07-01T12:00:00Z");
    assert!(
        body["query"]
            .as_str()
            .unwrap()
            .contains("contributionCalendar")
    );
}

#[test]
fn unreachable_endpoint_is_a_transport_error() {
    let mut opts = FetchOpts::new("octo", "token");
    opts.endpoint = "http://127.0.0.1:9/graphql".to_string();
    opts.timeout = Duration::from_secs(2);
    let mut fetcher = GithubFetcher::new(opts).unwrap();
    assert!(matches!(fetcher.fetch(), Err(FetchError::Transport(_))));
}
