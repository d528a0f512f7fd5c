use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::models::{
    Application, ApplicationStatus, ConnectionType, DailyRhythm, Drill, DrillElement, GtmData,
    MockInterview, MockType, NetworkingContact, NetworkingStatus, ParseEnumError, Rating, Story,
    StoryCategory, now_millis,
};

/// Which collection of `GtmData` a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Application,
    Story,
    Mock,
    Drill,
    Contact,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Application => "application",
            RecordKind::Story => "story",
            RecordKind::Mock => "mock interview",
            RecordKind::Drill => "drill",
            RecordKind::Contact => "contact",
        };
        f.write_str(name)
    }
}

pub fn new_id() -> String {
    format!("{:x}{:08x}", now_millis(), rand::random::<u32>())
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// --- Input shapes for new records ---

#[derive(Debug, Clone, Default)]
pub struct NewApplication {
    pub company: String,
    pub role: String,
    pub team: String,
    pub status: Option<ApplicationStatus>,
    pub applied_date: Option<NaiveDate>,
    pub referral_path: Option<String>,
    pub hiring_manager: Option<String>,
    pub job_url: Option<String>,
    pub notes: String,
    pub story_fit: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewStory {
    pub title: String,
    pub category: StoryCategory,
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
    pub condensed: String,
    pub metrics: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewMock {
    pub kind: MockType,
    pub date: NaiveDate,
    pub partner: String,
    pub topic: String,
    pub duration: u32,
    pub feedback: String,
    pub rating: Rating,
    pub improvement_areas: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewDrill {
    pub date: NaiveDate,
    pub topic: String,
    pub duration: u32,
    pub elements_completed: Vec<DrillElement>,
    pub rating: Rating,
    pub feedback: String,
}

#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: String,
    pub company: String,
    pub role: String,
    pub status: Option<NetworkingStatus>,
    pub linkedin_url: Option<String>,
    pub email: Option<String>,
    pub connection_type: ConnectionType,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Habit {
    Applied,
    Networked,
    Drilled,
    StoryPracticed,
}

impl Habit {
    pub const ALL: [Habit; 4] = [
        Habit::Applied,
        Habit::Networked,
        Habit::Drilled,
        Habit::StoryPracticed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Habit::Applied => "applied",
            Habit::Networked => "networked",
            Habit::Drilled => "drilled",
            Habit::StoryPracticed => "story",
        }
    }
}

impl FromStr for Habit {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "applied" | "apply" => Ok(Habit::Applied),
            "networked" | "network" => Ok(Habit::Networked),
            "drilled" | "drill" => Ok(Habit::Drilled),
            "story" | "story-practiced" => Ok(Habit::StoryPracticed),
            _ => Err(ParseEnumError::new(
                "habit",
                s,
                Habit::ALL.iter().map(|h| h.as_str()).collect(),
            )),
        }
    }
}

// --- Weekly progress ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub done: u32,
    pub target: u32,
}

impl Progress {
    pub fn met(&self) -> bool {
        self.done >= self.target
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyProgress {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub applications: Progress,
    pub mocks: Progress,
    pub drills: Progress,
    pub networking: Progress,
    pub week_number: i64, // 1-based, counted from settings.start_date
}

// --- Integrity checks ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    DuplicateId { kind: RecordKind, id: String },
    DuplicateRhythmDate(NaiveDate),
    DanglingStoryFit { application_id: String, story_id: String },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::DuplicateId { kind, id } => write!(f, "duplicate {} id '{}'", kind, id),
            Finding::DuplicateRhythmDate(date) => {
                write!(f, "more than one daily rhythm entry for {}", date)
            }
            Finding::DanglingStoryFit {
                application_id,
                story_id,
            } => write!(
                f,
                "application '{}' references missing story '{}'",
                application_id, story_id
            ),
        }
    }
}

fn duplicates<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut dups = Vec::new();
    for id in ids {
        if !seen.insert(id) && !dups.iter().any(|d: &String| d == id) {
            dups.push(id.to_string());
        }
    }
    dups
}

impl GtmData {
    // --- Applications ---

    pub fn add_application(&mut self, new: NewApplication) -> String {
        let status = new.status.unwrap_or(ApplicationStatus::Researching);
        let applied_date = new
            .applied_date
            .or_else(|| status.is_submitted().then(today));
        let id = new_id();
        self.applications.push(Application {
            id: id.clone(),
            company: new.company,
            role: new.role,
            team: new.team,
            status,
            applied_date,
            last_update: Utc::now(),
            referral_path: new.referral_path,
            hiring_manager: new.hiring_manager,
            job_url: new.job_url,
            notes: new.notes,
            story_fit: new.story_fit,
            created_at: now_millis(),
        });
        id
    }

    pub fn application(&self, id: &str) -> Option<&Application> {
        self.applications.iter().find(|a| a.id == id)
    }

    /// Any status may follow any other. Moving into a submitted status stamps a missing applied date.
    pub fn set_application_status(&mut self, id: &str, status: ApplicationStatus) -> Result<ApplicationStatus> {
        let app = self
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| anyhow!("Application '{}' not found", id))?;

        let previous = app.status;
        app.status = status;
        app.last_update = Utc::now();
        if status.is_submitted() && app.applied_date.is_none() {
            app.applied_date = Some(today());
        }
        Ok(previous)
    }

    /// Applications grouped into status columns, in `ApplicationStatus::ALL` order.
    pub fn applications_by_status(&self) -> BTreeMap<ApplicationStatus, Vec<&Application>> {
        let mut columns: BTreeMap<ApplicationStatus, Vec<&Application>> = ApplicationStatus::ALL
            .iter()
            .map(|s| (*s, Vec::new()))
            .collect();
        for app in &self.applications {
            columns.entry(app.status).or_default().push(app);
        }
        for apps in columns.values_mut() {
            apps.sort_by(|a, b| b.last_update.cmp(&a.last_update));
        }
        columns
    }

    // --- Stories ---

    pub fn add_story(&mut self, new: NewStory) -> String {
        let id = new_id();
        self.stories.push(Story {
            id: id.clone(),
            title: new.title,
            category: new.category,
            situation: new.situation,
            task: new.task,
            action: new.action,
            result: new.result,
            condensed: new.condensed,
            metrics: new.metrics,
            practice_count: 0,
            last_practiced: None,
            created_at: now_millis(),
        });
        id
    }

    pub fn story(&self, id: &str) -> Option<&Story> {
        self.stories.iter().find(|s| s.id == id)
    }

    pub fn record_practice(&mut self, story_id: &str, on: NaiveDate) -> Result<u32> {
        let story = self
            .stories
            .iter_mut()
            .find(|s| s.id == story_id)
            .ok_or_else(|| anyhow!("Story '{}' not found", story_id))?;
        story.practice_count += 1;
        story.last_practiced = Some(on);
        Ok(story.practice_count)
    }

    // --- Mocks and drills ---

    pub fn add_mock(&mut self, new: NewMock) -> String {
        let id = new_id();
        self.mocks.push(MockInterview {
            id: id.clone(),
            kind: new.kind,
            date: new.date,
            partner: new.partner,
            topic: new.topic,
            duration: new.duration,
            feedback: new.feedback,
            rating: new.rating,
            improvement_areas: new.improvement_areas,
            created_at: now_millis(),
        });
        id
    }

    pub fn add_drill(&mut self, new: NewDrill) -> String {
        let mut elements = new.elements_completed;
        elements.sort();
        elements.dedup();

        let id = new_id();
        self.drills.push(Drill {
            id: id.clone(),
            date: new.date,
            topic: new.topic,
            duration: new.duration,
            elements_completed: elements,
            rating: new.rating,
            feedback: new.feedback,
            created_at: now_millis(),
        });
        id
    }

    // --- Networking ---

    pub fn add_contact(&mut self, new: NewContact) -> String {
        let status = new.status.unwrap_or(NetworkingStatus::Identified);
        let last_contact = (status != NetworkingStatus::Identified).then(today);
        let id = new_id();
        self.networking.push(NetworkingContact {
            id: id.clone(),
            name: new.name,
            company: new.company,
            role: new.role,
            status,
            linkedin_url: new.linkedin_url,
            email: new.email,
            connection_type: new.connection_type,
            notes: new.notes,
            last_contact,
            created_at: now_millis(),
        });
        id
    }

    pub fn set_contact_status(&mut self, id: &str, status: NetworkingStatus) -> Result<NetworkingStatus> {
        let contact = self
            .networking
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| anyhow!("Contact '{}' not found", id))?;
        let previous = contact.status;
        contact.status = status;
        contact.last_contact = Some(today());
        Ok(previous)
    }

    // --- Daily rhythm ---

    /// Marks habits done for `date`, creating the day's entry if needed.
    pub fn check_in(&mut self, date: NaiveDate, habits: &[Habit], notes: Option<&str>) -> &DailyRhythm {
        let idx = match self.daily_rhythm.iter().position(|d| d.date == date) {
            Some(idx) => idx,
            None => {
                self.daily_rhythm.push(DailyRhythm {
                    date,
                    applied: false,
                    networked: false,
                    drilled: false,
                    story_practiced: false,
                    notes: String::new(),
                });
                self.daily_rhythm.len() - 1
            }
        };

        let day = &mut self.daily_rhythm[idx];
        for habit in habits {
            match habit {
                Habit::Applied => day.applied = true,
                Habit::Networked => day.networked = true,
                Habit::Drilled => day.drilled = true,
                Habit::StoryPracticed => day.story_practiced = true,
            }
        }
        if let Some(notes) = notes {
            day.notes = notes.to_string();
        }
        &self.daily_rhythm[idx]
    }

    pub fn rhythm_for(&self, date: NaiveDate) -> Option<&DailyRhythm> {
        self.daily_rhythm.iter().find(|d| d.date == date)
    }

    // --- Removal ---

    pub fn remove(&mut self, kind: RecordKind, id: &str) -> Result<()> {
        let before = self.count(kind);
        match kind {
            RecordKind::Application => self.applications.retain(|r| r.id != id),
            RecordKind::Story => self.stories.retain(|r| r.id != id),
            RecordKind::Mock => self.mocks.retain(|r| r.id != id),
            RecordKind::Drill => self.drills.retain(|r| r.id != id),
            RecordKind::Contact => self.networking.retain(|r| r.id != id),
        }
        if self.count(kind) == before {
            return Err(anyhow!("No {} with id '{}'", kind, id));
        }
        Ok(())
    }

    fn count(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Application => self.applications.len(),
            RecordKind::Story => self.stories.len(),
            RecordKind::Mock => self.mocks.len(),
            RecordKind::Drill => self.drills.len(),
            RecordKind::Contact => self.networking.len(),
        }
    }

    // --- Reporting ---

    /// Activity in the Monday-to-Sunday week containing `today`, against the weekly targets.
    pub fn weekly_progress(&self, today: NaiveDate) -> WeeklyProgress {
        let week_start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
        let week_end = week_start + Duration::days(6);
        let in_week = |d: NaiveDate| d >= week_start && d <= week_end;
        let targets = self.settings.weekly_targets;

        let applications = self
            .applications
            .iter()
            .filter(|a| a.applied_date.is_some_and(in_week))
            .count() as u32;
        let mocks = self.mocks.iter().filter(|m| in_week(m.date)).count() as u32;
        let drills = self.drills.iter().filter(|d| in_week(d.date)).count() as u32;
        let networking = self
            .networking
            .iter()
            .filter(|c| c.status != NetworkingStatus::Identified)
            .filter(|c| c.last_contact.is_some_and(in_week))
            .count() as u32;

        let days_in = (today - self.settings.start_date).num_days();
        let week_number = if days_in < 0 { 0 } else { days_in / 7 + 1 };

        WeeklyProgress {
            week_start,
            week_end,
            applications: Progress { done: applications, target: targets.applications },
            mocks: Progress { done: mocks, target: targets.mocks },
            drills: Progress { done: drills, target: targets.drills },
            networking: Progress { done: networking, target: targets.networking },
            week_number,
        }
    }

    /// Advisory checks; nothing here is enforced on write.
    pub fn integrity_report(&self) -> Vec<Finding> {
        let mut findings = Vec::new();

        let id_sets: [(RecordKind, Vec<String>); 5] = [
            (RecordKind::Application, duplicates(self.applications.iter().map(|r| r.id.as_str()))),
            (RecordKind::Story, duplicates(self.stories.iter().map(|r| r.id.as_str()))),
            (RecordKind::Mock, duplicates(self.mocks.iter().map(|r| r.id.as_str()))),
            (RecordKind::Drill, duplicates(self.drills.iter().map(|r| r.id.as_str()))),
            (RecordKind::Contact, duplicates(self.networking.iter().map(|r| r.id.as_str()))),
        ];
        for (kind, ids) in id_sets {
            findings.extend(ids.into_iter().map(|id| Finding::DuplicateId { kind, id }));
        }

        let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
        for day in &self.daily_rhythm {
            *per_day.entry(day.date).or_default() += 1;
        }
        let mut repeated: Vec<NaiveDate> = per_day
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(d, _)| d)
            .collect();
        repeated.sort();
        findings.extend(repeated.into_iter().map(Finding::DuplicateRhythmDate));

        let story_ids: HashSet<&str> = self.stories.iter().map(|s| s.id.as_str()).collect();
        for app in &self.applications {
            if let Some(story_id) = &app.story_fit {
                if !story_ids.contains(story_id.as_str()) {
                    findings.push(Finding::DanglingStoryFit {
                        application_id: app.id.clone(),
                        story_id: story_id.clone(),
                    });
                }
            }
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn app(company: &str, status: Option<ApplicationStatus>) -> NewApplication {
        NewApplication {
            company: company.to_string(),
            role: "Staff Engineer".to_string(),
            team: "Payments".to_string(),
            status,
            ..Default::default()
        }
    }

    fn story(title: &str) -> NewStory {
        NewStory {
            title: title.to_string(),
            category: StoryCategory::Impact,
            situation: "Fraud losses were climbing".to_string(),
            task: "Cut chargebacks".to_string(),
            action: "Shipped a rules engine".to_string(),
            result: "Losses down 40%".to_string(),
            condensed: "Rules engine, -40% losses".to_string(),
            metrics: vec!["-40% losses".to_string()],
        }
    }

    fn rating(v: u8) -> Rating {
        Rating::try_from(v).unwrap()
    }

    #[test]
    fn test_add_application_defaults() {
        let mut data = GtmData::empty();
        let id = data.add_application(app("Acme", None));
        let a = data.application(&id).unwrap();
        assert_eq!(a.status, ApplicationStatus::Researching);
        assert!(a.applied_date.is_none());

        let id = data.add_application(app("Globex", Some(ApplicationStatus::Applied)));
        assert_eq!(data.application(&id).unwrap().applied_date, Some(today()));
    }

    #[test]
    fn test_any_status_transition_allowed() {
        let mut data = GtmData::empty();
        let id = data.add_application(app("Acme", Some(ApplicationStatus::Offer)));

        let prev = data.set_application_status(&id, ApplicationStatus::Researching).unwrap();
        assert_eq!(prev, ApplicationStatus::Offer);
        let prev = data.set_application_status(&id, ApplicationStatus::Loop).unwrap();
        assert_eq!(prev, ApplicationStatus::Researching);
        assert_eq!(data.application(&id).unwrap().status, ApplicationStatus::Loop);

        assert!(data.set_application_status("nope", ApplicationStatus::Applied).is_err());
    }

    #[test]
    fn test_status_change_stamps_applied_date() {
        let mut data = GtmData::empty();
        let id = data.add_application(app("Acme", None));
        data.set_application_status(&id, ApplicationStatus::Screen).unwrap();
        assert_eq!(data.application(&id).unwrap().applied_date, Some(today()));
    }

    #[test]
    fn test_withdrawing_unsent_application_keeps_applied_date_empty() {
        let mut data = GtmData::empty();
        let id = data.add_application(app("Acme", None));
        data.set_application_status(&id, ApplicationStatus::Withdrawn).unwrap();
        assert!(data.application(&id).unwrap().applied_date.is_none());

        let id = data.add_application(app("Globex", Some(ApplicationStatus::Rejected)));
        assert!(data.application(&id).unwrap().applied_date.is_none());

        let progress = data.weekly_progress(today());
        assert_eq!(progress.applications.done, 0);
    }

    #[test]
    fn test_applications_by_status_has_every_column() {
        let mut data = GtmData::empty();
        data.add_application(app("Acme", Some(ApplicationStatus::Screen)));
        data.add_application(app("Globex", Some(ApplicationStatus::Screen)));
        data.add_application(app("Initech", Some(ApplicationStatus::Offer)));

        let columns = data.applications_by_status();
        let order: Vec<ApplicationStatus> = columns.keys().copied().collect();
        assert_eq!(order, ApplicationStatus::ALL.to_vec());
        assert_eq!(columns[&ApplicationStatus::Screen].len(), 2);
        assert_eq!(columns[&ApplicationStatus::Offer].len(), 1);
        assert!(columns[&ApplicationStatus::Researching].is_empty());
    }

    #[test]
    fn test_record_practice() {
        let mut data = GtmData::empty();
        let id = data.add_story(story("Rules engine"));
        assert_eq!(data.record_practice(&id, date("2026-03-02")).unwrap(), 1);
        assert_eq!(data.record_practice(&id, date("2026-03-04")).unwrap(), 2);
        let s = data.story(&id).unwrap();
        assert_eq!(s.practice_count, 2);
        assert_eq!(s.last_practiced, Some(date("2026-03-04")));
        assert!(data.record_practice("missing", today()).is_err());
    }

    #[test]
    fn test_drill_elements_deduplicated_in_order() {
        let mut data = GtmData::empty();
        data.add_drill(NewDrill {
            date: date("2026-03-02"),
            topic: "Rate limiter".to_string(),
            duration: 45,
            elements_completed: vec![
                DrillElement::DeepDive,
                DrillElement::Requirements,
                DrillElement::DeepDive,
            ],
            rating: rating(3),
            feedback: String::new(),
        });
        assert_eq!(
            data.drills[0].elements_completed,
            vec![DrillElement::Requirements, DrillElement::DeepDive]
        );
    }

    #[test]
    fn test_check_in_upserts_by_date() {
        let mut data = GtmData::empty();
        let day = date("2026-03-02");
        data.check_in(day, &[Habit::Applied], None);
        data.check_in(day, &[Habit::Drilled], Some("good day"));
        assert_eq!(data.daily_rhythm.len(), 1);
        let entry = data.rhythm_for(day).unwrap();
        assert!(entry.applied);
        assert!(entry.drilled);
        assert!(!entry.networked);
        assert_eq!(entry.notes, "good day");
    }

    #[test]
    fn test_habit_parse() {
        assert_eq!("Network".parse::<Habit>().unwrap(), Habit::Networked);
        assert!("sleep".parse::<Habit>().is_err());
    }

    #[test]
    fn test_remove() {
        let mut data = GtmData::empty();
        let id = data.add_story(story("Rules engine"));
        assert!(data.remove(RecordKind::Application, &id).is_err());
        data.remove(RecordKind::Story, &id).unwrap();
        assert!(data.stories.is_empty());
        assert!(data.remove(RecordKind::Story, &id).is_err());
    }

    #[test]
    fn test_weekly_progress() {
        let mut data = GtmData::empty();
        data.settings.start_date = date("2026-02-23");

        // Wednesday; the week runs 2026-03-02..=2026-03-08
        let wednesday = date("2026-03-04");

        let mut in_week = app("Acme", None);
        in_week.applied_date = Some(date("2026-03-02"));
        in_week.status = Some(ApplicationStatus::Applied);
        data.add_application(in_week);
        let mut last_week = app("Globex", None);
        last_week.applied_date = Some(date("2026-03-01"));
        last_week.status = Some(ApplicationStatus::Applied);
        data.add_application(last_week);

        data.add_mock(NewMock {
            kind: MockType::Behavioral,
            date: date("2026-03-08"),
            partner: "Sam".to_string(),
            topic: "Conflict".to_string(),
            duration: 30,
            feedback: String::new(),
            rating: rating(4),
            improvement_areas: vec![],
        });

        let progress = data.weekly_progress(wednesday);
        assert_eq!(progress.week_start, date("2026-03-02"));
        assert_eq!(progress.week_end, date("2026-03-08"));
        assert_eq!(progress.applications, Progress { done: 1, target: 12 });
        assert_eq!(progress.mocks.done, 1);
        assert_eq!(progress.drills.done, 0);
        assert!(!progress.drills.met());
        assert_eq!(progress.networking.target, 7);
        assert_eq!(progress.week_number, 2);
    }

    fn contact(name: &str, status: Option<NetworkingStatus>) -> NewContact {
        NewContact {
            name: name.to_string(),
            company: "Acme".to_string(),
            role: "Recruiter".to_string(),
            status,
            linkedin_url: None,
            email: None,
            connection_type: ConnectionType::Recruiter,
            notes: String::new(),
        }
    }

    #[test]
    fn test_add_contact_defaults_to_identified() {
        let mut data = GtmData::empty();
        data.add_contact(contact("Dana", None));
        assert_eq!(data.networking[0].status, NetworkingStatus::Identified);
        assert!(data.networking[0].last_contact.is_none());

        data.add_contact(contact("Lee", Some(NetworkingStatus::ReachedOut)));
        assert_eq!(data.networking[1].last_contact, Some(today()));
    }

    #[test]
    fn test_set_contact_status() {
        let mut data = GtmData::empty();
        let id = data.add_contact(contact("Dana", None));

        let previous = data.set_contact_status(&id, NetworkingStatus::Scheduled).unwrap();
        assert_eq!(previous, NetworkingStatus::Identified);
        assert_eq!(data.networking[0].status, NetworkingStatus::Scheduled);
        assert_eq!(data.networking[0].last_contact, Some(today()));

        // no ordering is enforced
        let previous = data.set_contact_status(&id, NetworkingStatus::Identified).unwrap();
        assert_eq!(previous, NetworkingStatus::Scheduled);

        let err = data.set_contact_status("missing", NetworkingStatus::Completed).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_weekly_progress_counts_networking() {
        let mut data = GtmData::empty();
        let monday = date("2026-03-02");

        data.add_contact(contact("Identified only", None));
        let mut reached = contact("Dana", Some(NetworkingStatus::ReachedOut));
        reached.notes = "met at meetup".to_string();
        data.add_contact(reached);
        data.add_contact(contact("Lee", Some(NetworkingStatus::Completed)));
        data.add_contact(contact("Old", Some(NetworkingStatus::Responded)));

        data.networking[0].last_contact = Some(monday);
        data.networking[1].last_contact = Some(date("2026-03-03"));
        data.networking[2].last_contact = Some(date("2026-03-08"));
        data.networking[3].last_contact = Some(date("2026-02-27"));

        let progress = data.weekly_progress(monday);
        assert_eq!(progress.networking, Progress { done: 2, target: 7 });
    }

    #[test]
    fn test_integrity_report() {
        let mut data = GtmData::empty();
        let story_id = data.add_story(story("Rules engine"));
        let dup = data.stories[0].clone();
        data.stories.push(dup);

        let mut linked = app("Acme", None);
        linked.story_fit = Some(story_id.clone());
        data.add_application(linked);
        let mut dangling = app("Globex", None);
        dangling.story_fit = Some("gone".to_string());
        let dangling_id = data.add_application(dangling);

        let day = date("2026-03-02");
        data.check_in(day, &[], None);
        let copy = data.daily_rhythm[0].clone();
        data.daily_rhythm.push(copy);

        let findings = data.integrity_report();
        assert_eq!(findings.len(), 3);
        assert!(findings.contains(&Finding::DuplicateId {
            kind: RecordKind::Story,
            id: story_id,
        }));
        assert!(findings.contains(&Finding::DuplicateRhythmDate(day)));
        assert!(findings.contains(&Finding::DanglingStoryFit {
            application_id: dangling_id,
            story_id: "gone".to_string(),
        }));
    }

    #[test]
    fn test_new_ids_differ() {
        let mut data = GtmData::empty();
        let a = data.add_application(app("Acme", None));
        let b = data.add_application(app("Acme", None));
        assert_ne!(a, b);
        assert!(data.integrity_report().is_empty());
    }
}
