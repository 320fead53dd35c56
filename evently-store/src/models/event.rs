//! Event records and their validation
//!
//! `NewEvent` and `EventPatch` carry raw caller input. Validation turns
//! them into `EventDraft` / `EventChanges`, which hold only trimmed,
//! normalized values and are the only thing a store ever writes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug::slugify;
use super::validation::{non_empty_list, non_empty_text, required_text};
use super::ValidationError;

/// 24-hour `HH:MM`, two digits each.
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("invalid time regex"));

/// Leading date spellings accepted by [`normalize_date`], tried in order.
/// Whatever follows the date (a time of day, a zone name) is ignored.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%A, %B %d, %Y",
    "%A %B %d %Y",
];

/// `YYYY` or `YYYY-MM`, read as the first day of the period.
static PARTIAL_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})(?:-(\d{2}))?$").expect("invalid partial date regex"));

/// How an event is attended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventMode {
    Online,
    Offline,
    Hybrid,
}

impl EventMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Hybrid => "hybrid",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Online, Self::Offline, Self::Hybrid]
    }
}

impl FromStr for EventMode {
    type Err = ValidationError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: "mode" });
        }
        match value.to_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(ValidationError::InvalidVariant {
                field: "mode",
                value: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for EventMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, 24-hour
    pub time: String,
    pub mode: EventMode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw input for creating an event.
///
/// Every field is optional at the type level so that a missing field is
/// reported as a validation error naming it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Validated, normalized event ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: EventMode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

impl NewEvent {
    /// Validate every field and derive the slug.
    ///
    /// # Rules
    /// - Text fields are trimmed and must be non-empty
    /// - `mode` is one of online/offline/hybrid, any case
    /// - `agenda` and `tags` must contain at least one item
    /// - `date` is normalized to `YYYY-MM-DD`, `time` must be `HH:MM`
    pub fn validate(self) -> Result<EventDraft, ValidationError> {
        let title = required_text("title", self.title)?;
        let slug = derive_slug(&title)?;

        Ok(EventDraft {
            description: required_text("description", self.description)?,
            overview: required_text("overview", self.overview)?,
            image: required_text("image", self.image)?,
            venue: required_text("venue", self.venue)?,
            location: required_text("location", self.location)?,
            date: normalize_date(&required_text("date", self.date)?)?,
            time: validate_time(&required_text("time", self.time)?)?,
            mode: self
                .mode
                .ok_or(ValidationError::Empty { field: "mode" })?
                .parse::<EventMode>()?,
            audience: required_text("audience", self.audience)?,
            agenda: non_empty_list("agenda", self.agenda.unwrap_or_default())?,
            organizer: required_text("organizer", self.organizer)?,
            tags: non_empty_list("tags", self.tags.unwrap_or_default())?,
            title,
            slug,
        })
    }
}

/// Partial update for an event. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Validated subset of event columns to overwrite
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<EventMode>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrite the fields of `event` that this change set carries.
    pub fn apply_to(self, event: &mut Event) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut event.title, self.title);
        set(&mut event.slug, self.slug);
        set(&mut event.description, self.description);
        set(&mut event.overview, self.overview);
        set(&mut event.image, self.image);
        set(&mut event.venue, self.venue);
        set(&mut event.location, self.location);
        set(&mut event.date, self.date);
        set(&mut event.time, self.time);
        set(&mut event.mode, self.mode);
        set(&mut event.audience, self.audience);
        set(&mut event.agenda, self.agenda);
        set(&mut event.organizer, self.organizer);
        set(&mut event.tags, self.tags);
    }
}

impl EventPatch {
    /// Validate only the fields present in the patch.
    ///
    /// A new title re-derives the slug, a new date is re-normalized and a
    /// new time is re-checked. Nothing else is recomputed.
    pub fn validate(self) -> Result<EventChanges, ValidationError> {
        let text = |field: &'static str, value: Option<String>| {
            value.map(|v| non_empty_text(field, &v)).transpose()
        };

        let title = text("title", self.title)?;
        let slug = title.as_deref().map(derive_slug).transpose()?;

        Ok(EventChanges {
            description: text("description", self.description)?,
            overview: text("overview", self.overview)?,
            image: text("image", self.image)?,
            venue: text("venue", self.venue)?,
            location: text("location", self.location)?,
            date: text("date", self.date)?
                .map(|d| normalize_date(&d))
                .transpose()?,
            time: text("time", self.time)?
                .map(|t| validate_time(&t))
                .transpose()?,
            mode: self.mode.map(|m| m.parse::<EventMode>()).transpose()?,
            audience: text("audience", self.audience)?,
            agenda: self
                .agenda
                .map(|a| non_empty_list("agenda", a))
                .transpose()?,
            organizer: text("organizer", self.organizer)?,
            tags: self.tags.map(|t| non_empty_list("tags", t)).transpose()?,
            title,
            slug,
        })
    }
}

fn derive_slug(title: &str) -> Result<String, ValidationError> {
    let slug = slugify(title);
    if slug.is_empty() {
        return Err(ValidationError::InvalidFormat {
            field: "title",
            reason: "must contain at least one letter or digit",
        });
    }
    Ok(slug)
}

/// Normalize a calendar date to `YYYY-MM-DD`.
///
/// Accepts ISO dates, RFC 3339 and RFC 2822 timestamps, `YYYY-MM`, and
/// written forms such as `March 5, 2024` or `Tue Mar 05 2024 10:00:00`.
/// RFC 3339 and RFC 2822 timestamps are converted to UTC before the date
/// is taken. Anything after a written date, including a zone name, is
/// discarded.
///
/// # Example
/// ```
/// use evently_store::models::normalize_date;
///
/// assert_eq!(normalize_date("March 5, 2024").unwrap(), "2024-03-05");
/// assert!(normalize_date("not a date").is_err());
/// ```
pub fn normalize_date(input: &str) -> Result<String, ValidationError> {
    let input = input.trim();
    parse_calendar_date(input)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or(ValidationError::InvalidFormat {
            field: "date",
            reason: "invalid date format",
        })
}

fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Some(caps) = PARTIAL_DATE_RE.captures(input) {
        let year = caps[1].parse().ok()?;
        let month = caps.get(2).map_or(Some(1), |m| m.as_str().parse().ok())?;
        return NaiveDate::from_ymd_opt(year, month, 1);
    }
    DATE_FORMATS.iter().find_map(|fmt| {
        let (date, rest) = NaiveDate::parse_and_remainder(input, fmt).ok()?;
        ends_at_boundary(rest).then_some(date)
    })
}

/// The date must end the input or be followed by a separator, so
/// `2024-03-051` is not read as March 5th.
fn ends_at_boundary(rest: &str) -> bool {
    rest.chars()
        .next()
        .map_or(true, |c| c.is_whitespace() || matches!(c, 'T' | 't' | ','))
}

/// Check a time of day against `HH:MM` (24-hour).
///
/// No correction is attempted: `9:05` and `9:5` are rejected even though
/// they name real times.
pub fn validate_time(input: &str) -> Result<String, ValidationError> {
    let input = input.trim();
    if !TIME_RE.is_match(input) {
        return Err(ValidationError::InvalidFormat {
            field: "time",
            reason: "must be in HH:MM format",
        });
    }
    Ok(input.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewEvent {
        NewEvent {
            title: Some("  RustConf 2025  ".into()),
            description: Some("The annual Rust conference".into()),
            overview: Some("Talks and workshops".into()),
            image: Some("/images/rustconf.png".into()),
            venue: Some("Convention Center".into()),
            location: Some("Seattle, WA".into()),
            date: Some("September 2, 2025".into()),
            time: Some("09:30".into()),
            mode: Some("Hybrid".into()),
            audience: Some("Rustaceans".into()),
            agenda: Some(vec!["Keynote".into(), "Lunch".into()]),
            organizer: Some("Rust Foundation".into()),
            tags: Some(vec!["rust".into()]),
        }
    }

    #[test]
    fn valid_event_is_normalized() {
        let draft = sample().validate().unwrap();
        assert_eq!(draft.title, "RustConf 2025");
        assert_eq!(draft.slug, "rustconf-2025");
        assert_eq!(draft.date, "2025-09-02");
        assert_eq!(draft.time, "09:30");
        assert_eq!(draft.mode, EventMode::Hybrid);
    }

    #[test]
    fn missing_field_is_named() {
        let input = NewEvent {
            venue: None,
            ..sample()
        };
        assert_eq!(
            input.validate().unwrap_err(),
            ValidationError::Empty { field: "venue" }
        );
    }

    #[test]
    fn blank_field_is_rejected() {
        let input = NewEvent {
            organizer: Some("   ".into()),
            ..sample()
        };
        assert_eq!(input.validate().unwrap_err().field(), "organizer");
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let input = NewEvent {
            mode: Some("remote".into()),
            ..sample()
        };
        assert!(matches!(
            input.validate().unwrap_err(),
            ValidationError::InvalidVariant { field: "mode", .. }
        ));
    }

    #[test]
    fn empty_agenda_and_tags_rejected() {
        let input = NewEvent {
            agenda: Some(vec![]),
            ..sample()
        };
        assert_eq!(input.validate().unwrap_err().field(), "agenda");

        let input = NewEvent {
            tags: None,
            ..sample()
        };
        assert_eq!(input.validate().unwrap_err().field(), "tags");
    }

    #[test]
    fn symbol_only_title_rejected() {
        let input = NewEvent {
            title: Some("!!!".into()),
            ..sample()
        };
        assert!(matches!(
            input.validate().unwrap_err(),
            ValidationError::InvalidFormat { field: "title", .. }
        ));
    }

    #[test]
    fn mode_parses_any_case() {
        assert_eq!("ONLINE".parse::<EventMode>().unwrap(), EventMode::Online);
        assert_eq!(" offline ".parse::<EventMode>().unwrap(), EventMode::Offline);
        for mode in EventMode::all() {
            assert_eq!(mode.as_str().parse::<EventMode>().unwrap(), *mode);
        }
    }

    #[test]
    fn date_formats() {
        for input in [
            "2024-03-05",
            "March 5, 2024",
            "Mar 5, 2024",
            "5 March 2024",
            "2024/03/05",
            "03/05/2024",
            "2024-03-05T18:30:00",
            "2024-03-05T10:00:00Z",
            "Tue, 5 Mar 2024 10:00:00 +0000",
            "2024-3-5",
            "2024-03-05 18:30",
            "Mar 5 2024",
            "March 5, 2024 10:00",
            "Tuesday, March 5, 2024",
            "Tue Mar 05 2024",
            "Tue Mar 05 2024 10:00:00 GMT+0000",
        ] {
            assert_eq!(normalize_date(input).unwrap(), "2024-03-05", "input: {input}");
        }
    }

    #[test]
    fn partial_dates_start_the_period() {
        assert_eq!(normalize_date("2024-03").unwrap(), "2024-03-01");
        assert_eq!(normalize_date("2024").unwrap(), "2024-01-01");
    }

    #[test]
    fn date_offset_is_converted_to_utc() {
        assert_eq!(
            normalize_date("2024-03-05T23:30:00-05:00").unwrap(),
            "2024-03-06"
        );
    }

    #[test]
    fn invalid_dates_rejected() {
        for input in ["", "tomorrow", "2024-13-01", "2024-02-30", "2024-03-051", "2024-13"] {
            assert!(matches!(
                normalize_date(input).unwrap_err(),
                ValidationError::InvalidFormat { field: "date", .. }
            ));
        }
    }

    #[test]
    fn times() {
        assert_eq!(validate_time("00:00").unwrap(), "00:00");
        assert_eq!(validate_time(" 23:59 ").unwrap(), "23:59");
        for bad in ["25:00", "24:00", "9:5", "9:05", "12:60", "12:00pm", "1200"] {
            assert!(validate_time(bad).is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn patch_only_validates_present_fields() {
        let changes = EventPatch {
            agenda: Some(vec!["Opening".into()]),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert_eq!(changes.agenda, Some(vec!["Opening".to_string()]));
        assert!(changes.slug.is_none());
        assert!(changes.date.is_none());
        assert!(changes.time.is_none());
    }

    #[test]
    fn patch_title_rederives_slug() {
        let changes = EventPatch {
            title: Some(" New Title! ".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(changes.title.as_deref(), Some("New Title!"));
        assert_eq!(changes.slug.as_deref(), Some("new-title"));
    }

    #[test]
    fn patch_rejects_bad_time() {
        let err = EventPatch {
            time: Some("9:5".into()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field(), "time");
    }

    #[test]
    fn empty_patch_has_no_changes() {
        assert!(EventPatch::default().validate().unwrap().is_empty());
    }
}
