use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

// Deadline text parser. Accepts a small natural-language vocabulary
// ("tomorrow", "next friday", "in 3d") plus ISO dates, with an optional
// "at <time>" suffix. Returns None for anything it cannot make sense of.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    parse_relative_to(text, Local::now().naive_local())
}

fn parse_relative_to(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let s = text.trim().to_lowercase();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M") {
        return Some(dt);
    }

    let (date_text, time) = match s.rsplit_once(" at ") {
        Some((date_text, time_text)) => (date_text.trim(), parse_time(time_text.trim())?),
        None => (s.as_str(), NaiveTime::MIN),
    };
    Some(parse_day(date_text, now.date())?.and_time(time))
}

fn parse_day(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    match s {
        "today" | "tonight" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        if let Some(n) = rest.strip_suffix('d').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Some(today + Duration::days(n));
        }
        if let Some(n) = rest.strip_suffix('w').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Some(today + Duration::weeks(n));
        }
        if let Some(n) = rest
            .strip_suffix(" days")
            .or_else(|| rest.strip_suffix(" day"))
            .and_then(|n| n.trim().parse::<i64>().ok())
        {
            return Some(today + Duration::days(n));
        }
        if let Some(n) = rest
            .strip_suffix(" weeks")
            .or_else(|| rest.strip_suffix(" week"))
            .and_then(|n| n.trim().parse::<i64>().ok())
        {
            return Some(today + Duration::weeks(n));
        }
        return None;
    }

    let weekdays = [
        ("monday", 0),
        ("tuesday", 1),
        ("wednesday", 2),
        ("thursday", 3),
        ("friday", 4),
        ("saturday", 5),
        ("sunday", 6),
        ("mon", 0),
        ("tue", 1),
        ("wed", 2),
        ("thu", 3),
        ("fri", 4),
        ("sat", 5),
        ("sun", 6),
    ];
    for (name, target) in weekdays {
        let current = today.weekday().num_days_from_monday() as i64;
        let ahead = (target + 7 - current) % 7;
        if s == name || s == format!("this {name}") {
            return Some(today + Duration::days(ahead));
        }
        if s == format!("next {name}") {
            let days = if ahead == 0 { 7 } else { ahead + 7 };
            return Some(today + Duration::days(days));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let (body, pm) = if let Some(rest) = s.strip_suffix("pm") {
        (rest.trim(), Some(true))
    } else if let Some(rest) = s.strip_suffix("am") {
        (rest.trim(), Some(false))
    } else {
        (s, None)
    };

    let (hour_text, minute_text) = match body.split_once(':') {
        Some((h, m)) => (h, m),
        None => (body, "0"),
    };
    let mut hour: u32 = hour_text.trim().parse().ok()?;
    let minute: u32 = minute_text.trim().parse().ok()?;
    match pm {
        Some(true) if hour < 12 => hour += 12,
        Some(false) if hour == 12 => hour = 0,
        _ => {}
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
}
