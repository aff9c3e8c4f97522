use time::OffsetDateTime;

pub const PERMANENT_LABEL: &str = "permanent";
pub const EXPIRED_LABEL: &str = "expired, requires manual unban";
pub const UNDER_A_MINUTE_LABEL: &str = "less than a minute";

/// Human-readable time left on a ban, evaluated against `now`.
///
/// Uses the largest non-zero unit among days, hours and minutes, truncated.
/// An elapsed end time is reported but never lifts the ban.
pub fn remaining_ban_time(ends_at: Option<OffsetDateTime>, now: OffsetDateTime) -> String {
    let Some(ends_at) = ends_at else {
        return PERMANENT_LABEL.to_string();
    };

    if ends_at < now {
        return EXPIRED_LABEL.to_string();
    }

    let remaining = ends_at - now;
    let days = remaining.whole_days();
    if days > 0 {
        return pluralize(days, "day");
    }

    let hours = remaining.whole_hours();
    if hours > 0 {
        return pluralize(hours, "hour");
    }

    let minutes = remaining.whole_minutes();
    if minutes > 0 {
        return pluralize(minutes, "minute");
    }

    UNDER_A_MINUTE_LABEL.to_string()
}

fn pluralize(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
