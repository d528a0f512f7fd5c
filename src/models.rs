use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display metadata for a status badge: label text plus background and text colour classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub bg: &'static str,
    pub text: &'static str,
}

const fn badge(label: &'static str, bg: &'static str, text: &'static str) -> Badge {
    Badge { label, bg, text }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} '{value}' (expected one of: {})", .expected.join(", "))]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
    expected: Vec<&'static str>,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: &str, expected: Vec<&'static str>) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}

/// Generates the string plumbing shared by every closed set: `ALL`, `as_str`, `Display`, `FromStr`.
/// The badge table for each enum is written out by hand as an exhaustive match.
macro_rules! closed_set {
    ($ty:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim().to_ascii_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == needle)
                    .ok_or_else(|| {
                        ParseEnumError::new($kind, s, Self::ALL.iter().map(|v| v.as_str()).collect())
                    })
            }
        }
    };
}

// --- Closed sets ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    Researching,
    Applied,
    Screen,
    Technical,
    Loop,
    Offer,
    Rejected,
    Withdrawn,
}

closed_set!(ApplicationStatus, "application status", {
    Researching => "researching",
    Applied => "applied",
    Screen => "screen",
    Technical => "technical",
    Loop => "loop",
    Offer => "offer",
    Rejected => "rejected",
    Withdrawn => "withdrawn",
});

impl ApplicationStatus {
    pub fn badge(self) -> Badge {
        match self {
            Self::Researching => badge("Researching", "bg-gray-100", "text-gray-700"),
            Self::Applied => badge("Applied", "bg-blue-100", "text-blue-700"),
            Self::Screen => badge("Screen", "bg-indigo-100", "text-indigo-700"),
            Self::Technical => badge("Technical", "bg-purple-100", "text-purple-700"),
            Self::Loop => badge("Loop", "bg-amber-100", "text-amber-700"),
            Self::Offer => badge("Offer", "bg-green-100", "text-green-700"),
            Self::Rejected => badge("Rejected", "bg-red-100", "text-red-700"),
            Self::Withdrawn => badge("Withdrawn", "bg-slate-100", "text-slate-500"),
        }
    }

    /// Terminal outcomes, hidden by `--open`.
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Rejected | Self::Withdrawn)
    }

    /// Statuses that imply an application was actually sent.
    pub fn is_submitted(self) -> bool {
        matches!(
            self,
            Self::Applied | Self::Screen | Self::Technical | Self::Loop | Self::Offer
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoryCategory {
    Leadership,
    Conflict,
    Failure,
    Impact,
    Ambiguity,
    Technical,
    Stakeholder,
    Delivery,
}

closed_set!(StoryCategory, "story category", {
    Leadership => "leadership",
    Conflict => "conflict",
    Failure => "failure",
    Impact => "impact",
    Ambiguity => "ambiguity",
    Technical => "technical",
    Stakeholder => "stakeholder",
    Delivery => "delivery",
});

impl StoryCategory {
    pub fn badge(self) -> Badge {
        match self {
            Self::Leadership => badge("Leadership", "bg-blue-100", "text-blue-700"),
            Self::Conflict => badge("Conflict", "bg-red-100", "text-red-700"),
            Self::Failure => badge("Failure", "bg-orange-100", "text-orange-700"),
            Self::Impact => badge("Impact", "bg-green-100", "text-green-700"),
            Self::Ambiguity => badge("Ambiguity", "bg-yellow-100", "text-yellow-700"),
            Self::Technical => badge("Technical", "bg-purple-100", "text-purple-700"),
            Self::Stakeholder => badge("Stakeholder", "bg-teal-100", "text-teal-700"),
            Self::Delivery => badge("Delivery", "bg-indigo-100", "text-indigo-700"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MockType {
    Behavioral,
    SystemDesign,
    Product,
    Case,
}

closed_set!(MockType, "mock type", {
    Behavioral => "behavioral",
    SystemDesign => "system-design",
    Product => "product",
    Case => "case",
});

impl MockType {
    pub fn badge(self) -> Badge {
        match self {
            Self::Behavioral => badge("Behavioral", "bg-blue-100", "text-blue-700"),
            Self::SystemDesign => badge("System Design", "bg-purple-100", "text-purple-700"),
            Self::Product => badge("Product", "bg-green-100", "text-green-700"),
            Self::Case => badge("Case", "bg-amber-100", "text-amber-700"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkingStatus {
    Identified,
    ReachedOut,
    Responded,
    Scheduled,
    Completed,
    FollowUp,
}

closed_set!(NetworkingStatus, "networking status", {
    Identified => "identified",
    ReachedOut => "reached-out",
    Responded => "responded",
    Scheduled => "scheduled",
    Completed => "completed",
    FollowUp => "follow-up",
});

impl NetworkingStatus {
    pub fn badge(self) -> Badge {
        match self {
            Self::Identified => badge("Identified", "bg-gray-100", "text-gray-700"),
            Self::ReachedOut => badge("Reached Out", "bg-blue-100", "text-blue-700"),
            Self::Responded => badge("Responded", "bg-indigo-100", "text-indigo-700"),
            Self::Scheduled => badge("Scheduled", "bg-amber-100", "text-amber-700"),
            Self::Completed => badge("Completed", "bg-green-100", "text-green-700"),
            Self::FollowUp => badge("Follow Up", "bg-orange-100", "text-orange-700"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionType {
    Recruiter,
    HiringManager,
    Employee,
    Alumni,
}

closed_set!(ConnectionType, "connection type", {
    Recruiter => "recruiter",
    HiringManager => "hiring-manager",
    Employee => "employee",
    Alumni => "alumni",
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RatingError {
    #[error("rating must be between 1 and 5, got {0}")]
    OutOfRange(u8),
    #[error("rating must be a number from 1 to 5, got '{0}'")]
    NotANumber(String),
}

/// Self-assessed score, always in 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError::OutOfRange(value))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl FromStr for Rating {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| RatingError::NotANumber(s.to_string()))?;
        Self::try_from(value)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5", self.0)
    }
}

/// The ten elements a timed system-design drill walks through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DrillElement {
    #[serde(rename = "Requirements & SLOs")]
    Requirements,
    #[serde(rename = "API Design")]
    ApiDesign,
    #[serde(rename = "Data Model")]
    DataModel,
    #[serde(rename = "High-Level Architecture")]
    HighLevelArchitecture,
    #[serde(rename = "Deep Dive")]
    DeepDive,
    #[serde(rename = "Scaling & Bottlenecks")]
    Scaling,
    #[serde(rename = "Reliability & Failure Modes")]
    Reliability,
    #[serde(rename = "Observability")]
    Observability,
    #[serde(rename = "Security & Privacy")]
    Security,
    #[serde(rename = "Trade-offs & Wrap-up")]
    TradeOffs,
}

pub const DRILL_ELEMENTS: [DrillElement; 10] = [
    DrillElement::Requirements,
    DrillElement::ApiDesign,
    DrillElement::DataModel,
    DrillElement::HighLevelArchitecture,
    DrillElement::DeepDive,
    DrillElement::Scaling,
    DrillElement::Reliability,
    DrillElement::Observability,
    DrillElement::Security,
    DrillElement::TradeOffs,
];

impl DrillElement {
    pub fn label(self) -> &'static str {
        match self {
            Self::Requirements => "Requirements & SLOs",
            Self::ApiDesign => "API Design",
            Self::DataModel => "Data Model",
            Self::HighLevelArchitecture => "High-Level Architecture",
            Self::DeepDive => "Deep Dive",
            Self::Scaling => "Scaling & Bottlenecks",
            Self::Reliability => "Reliability & Failure Modes",
            Self::Observability => "Observability",
            Self::Security => "Security & Privacy",
            Self::TradeOffs => "Trade-offs & Wrap-up",
        }
    }

    /// Accepts either the full label (case-insensitive) or a 1-based position in `DRILL_ELEMENTS`.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Ok(pos) = input.parse::<usize>() {
            return pos.checked_sub(1).and_then(|i| DRILL_ELEMENTS.get(i).copied());
        }
        DRILL_ELEMENTS
            .iter()
            .copied()
            .find(|e| e.label().eq_ignore_ascii_case(input))
    }
}

impl fmt::Display for DrillElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// --- Records ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub company: String,
    pub role: String,
    pub team: String,
    pub status: ApplicationStatus,
    pub applied_date: Option<NaiveDate>,
    pub last_update: DateTime<Utc>,
    pub referral_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hiring_manager: Option<String>,
    pub job_url: Option<String>,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_fit: Option<String>, // Story.id, not enforced
    pub created_at: i64,
}

/// A STAR-format behavioural story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: String,
    pub title: String,
    pub category: StoryCategory,
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
    pub condensed: String,
    pub metrics: Vec<String>,
    pub practice_count: u32,
    pub last_practiced: Option<NaiveDate>,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockInterview {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MockType,
    pub date: NaiveDate,
    pub partner: String,
    pub topic: String,
    pub duration: u32, // minutes
    pub feedback: String,
    pub rating: Rating,
    pub improvement_areas: Vec<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drill {
    pub id: String,
    pub date: NaiveDate,
    pub topic: String,
    pub duration: u32, // minutes
    pub elements_completed: Vec<DrillElement>,
    pub rating: Rating,
    pub feedback: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkingContact {
    pub id: String,
    pub name: String,
    pub company: String,
    pub role: String,
    pub status: NetworkingStatus,
    pub linkedin_url: Option<String>,
    pub email: Option<String>,
    pub connection_type: ConnectionType,
    pub notes: String,
    pub last_contact: Option<NaiveDate>,
    pub created_at: i64,
}

/// Per-day habit checklist, keyed by `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRhythm {
    pub date: NaiveDate,
    pub applied: bool,
    pub networked: bool,
    pub drilled: bool,
    pub story_practiced: bool,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyTargets {
    pub applications: u32,
    pub mocks: u32,
    pub drills: u32,
    pub networking: u32,
}

impl Default for WeeklyTargets {
    fn default() -> Self {
        Self {
            applications: 12,
            mocks: 3,
            drills: 3,
            networking: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GtmSettings {
    pub start_date: NaiveDate,
    pub weekly_targets: WeeklyTargets,
}

impl Default for GtmSettings {
    /// Starts today; every call builds a fresh value.
    fn default() -> Self {
        Self {
            start_date: Utc::now().date_naive(),
            weekly_targets: WeeklyTargets::default(),
        }
    }
}

/// Aggregate root persisted as a single document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GtmData {
    pub applications: Vec<Application>,
    pub stories: Vec<Story>,
    pub mocks: Vec<MockInterview>,
    pub drills: Vec<Drill>,
    pub networking: Vec<NetworkingContact>,
    pub daily_rhythm: Vec<DailyRhythm>,
    pub settings: GtmSettings,
    pub last_updated: i64,
}

impl GtmData {
    /// Fresh, independently owned empty state stamped with the current time.
    pub fn empty() -> Self {
        Self {
            applications: Vec::new(),
            stories: Vec::new(),
            mocks: Vec::new(),
            drills: Vec::new(),
            networking: Vec::new(),
            daily_rhythm: Vec::new(),
            settings: GtmSettings::default(),
            last_updated: now_millis(),
        }
    }

    pub fn record_count(&self) -> usize {
        self.applications.len()
            + self.stories.len()
            + self.mocks.len()
            + self.drills.len()
            + self.networking.len()
            + self.daily_rhythm.len()
    }
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

// --- Status configuration maps ---

pub fn application_status_config() -> Vec<(ApplicationStatus, Badge)> {
    ApplicationStatus::ALL.iter().map(|s| (*s, s.badge())).collect()
}

pub fn networking_status_config() -> Vec<(NetworkingStatus, Badge)> {
    NetworkingStatus::ALL.iter().map(|s| (*s, s.badge())).collect()
}

pub fn story_category_config() -> Vec<(StoryCategory, Badge)> {
    StoryCategory::ALL.iter().map(|c| (*c, c.badge())).collect()
}

pub fn mock_type_config() -> Vec<(MockType, Badge)> {
    MockType::ALL.iter().map(|t| (*t, t.badge())).collect()
}
