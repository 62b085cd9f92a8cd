use directories::ProjectDirs;
use std::path::PathBuf;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

pub(crate) fn normalize_opt_string(input: Option<String>) -> Option<String> {
    input.and_then(|val| {
        let trimmed = val.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "keyswitch", "keyswitch")
}

pub(crate) fn default_data_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.data_dir().to_path_buf())
}

/// Current UTC time truncated to whole milliseconds, matching what
/// `format_timestamp` can represent.
pub(crate) fn now_utc() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_millisecond(now.millisecond()).unwrap_or(now)
}

pub(crate) fn format_timestamp(ts: OffsetDateTime) -> String {
    let utc = ts.to_offset(UtcOffset::UTC);
    let fmt = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    );
    utc.format(fmt).unwrap_or_else(|_| utc.unix_timestamp().to_string())
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(raw.trim(), &Rfc3339)
}

/// Human-readable local time for listings; falls back to UTC when the local
/// offset cannot be determined.
pub(crate) fn display_timestamp(ts: OffsetDateTime) -> String {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let fmt = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    ts.to_offset(offset)
        .format(fmt)
        .unwrap_or_else(|_| format_timestamp(ts))
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, normalize_opt_string, now_utc, parse_timestamp};

    #[test]
    fn normalize_opt_string_handles_empty() {
        assert_eq!(normalize_opt_string(Some("  ".to_string())), None);
        assert_eq!(normalize_opt_string(None), None);
        assert_eq!(
            normalize_opt_string(Some(" notes ".to_string())),
            Some("notes".to_string())
        );
    }

    #[test]
    fn timestamps_use_millisecond_utc_form() {
        let ts = parse_timestamp("2024-03-01T10:20:30.456+02:00").expect("parse");
        assert_eq!(format_timestamp(ts), "2024-03-01T08:20:30.456Z");

        let ts = parse_timestamp("2024-03-01T10:20:30Z").expect("parse");
        assert_eq!(format_timestamp(ts), "2024-03-01T10:20:30.000Z");
    }

    #[test]
    fn formatted_now_round_trips() {
        let now = now_utc();
        let rendered = format_timestamp(now);
        assert_eq!(parse_timestamp(&rendered).expect("parse"), now);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
    }
}
