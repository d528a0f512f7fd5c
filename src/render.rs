use serde_json::{json, Map, Value};

use crate::models::{
    application_status_config, mock_type_config, networking_status_config, story_category_config,
    Application, Badge, DailyRhythm, Drill, MockInterview, NetworkingContact, Story,
    DRILL_ELEMENTS,
};
use crate::tracker::{Progress, WeeklyProgress};

const WRAP_WIDTH: usize = 78;

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

fn wrapped(label: &str, body: &str) -> String {
    let prefix = format!("{}: ", label);
    let indent = " ".repeat(prefix.len());
    let options = textwrap::Options::new(WRAP_WIDTH)
        .initial_indent(&prefix)
        .subsequent_indent(&indent);
    let text = if body.trim().is_empty() { "-" } else { body };
    textwrap::fill(text, options)
}

// --- Tables ---

pub fn application_table(apps: &[&Application]) -> String {
    let mut out = format!(
        "{:<14} {:<12} {:<20} {:<24} {:<10}\n",
        "ID", "STATUS", "COMPANY", "ROLE", "APPLIED"
    );
    out.push_str(&"-".repeat(84));
    out.push('\n');
    for app in apps {
        let applied = app
            .applied_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<14} {:<12} {:<20} {:<24} {:<10}\n",
            app.id,
            app.status.badge().label,
            truncate(&app.company, 18),
            truncate(&app.role, 22),
            applied
        ));
    }
    out
}

pub fn application_detail(app: &Application, story: Option<&Story>) -> String {
    let mut out = format!("Application {}\n", app.id);
    out.push_str(&format!("Company: {}\n", app.company));
    out.push_str(&format!("Role: {}\n", app.role));
    if !app.team.is_empty() {
        out.push_str(&format!("Team: {}\n", app.team));
    }
    out.push_str(&format!("Status: {}\n", badge_text(app.status.badge())));
    if let Some(date) = app.applied_date {
        out.push_str(&format!("Applied: {}\n", date));
    }
    out.push_str(&format!("Referral: {}\n", or_dash(app.referral_path.as_deref())));
    if let Some(manager) = &app.hiring_manager {
        out.push_str(&format!("Hiring manager: {}\n", manager));
    }
    if let Some(url) = &app.job_url {
        out.push_str(&format!("URL: {}\n", url));
    }
    match (&app.story_fit, story) {
        (Some(_), Some(story)) => out.push_str(&format!("Story fit: {} ({})\n", story.title, story.id)),
        (Some(id), None) => out.push_str(&format!("Story fit: {} (missing)\n", id)),
        (None, _) => {}
    }
    out.push_str(&format!("Last update: {}\n", app.last_update.format("%Y-%m-%d %H:%M")));
    if !app.notes.is_empty() {
        out.push_str(&format!("\n{}\n", wrapped("Notes", &app.notes)));
    }
    out
}

pub fn story_table(stories: &[Story]) -> String {
    let mut out = format!(
        "{:<14} {:<12} {:<36} {:>5} {:<10}\n",
        "ID", "CATEGORY", "TITLE", "REPS", "LAST"
    );
    out.push_str(&"-".repeat(81));
    out.push('\n');
    for story in stories {
        let last = story
            .last_practiced
            .map(|d| d.to_string())
            .unwrap_or_else(|| "never".to_string());
        out.push_str(&format!(
            "{:<14} {:<12} {:<36} {:>5} {:<10}\n",
            story.id,
            story.category.badge().label,
            truncate(&story.title, 34),
            story.practice_count,
            last
        ));
    }
    out
}

/// Full STAR layout; `condensed_only` prints the short version used for quick review.
pub fn story_detail(story: &Story, condensed_only: bool) -> String {
    let mut out = format!("{} [{}]\n\n", story.title, story.category.badge().label);
    if condensed_only {
        out.push_str(&textwrap::fill(&story.condensed, WRAP_WIDTH));
        out.push('\n');
        return out;
    }
    for (label, body) in [
        ("Situation", &story.situation),
        ("Task", &story.task),
        ("Action", &story.action),
        ("Result", &story.result),
    ] {
        out.push_str(&wrapped(label, body));
        out.push('\n');
    }
    if !story.metrics.is_empty() {
        out.push_str("\nMetrics:\n");
        for metric in &story.metrics {
            out.push_str(&format!("  - {}\n", metric));
        }
    }
    out.push_str(&format!(
        "\nPracticed {} time(s), last {}\n",
        story.practice_count,
        story
            .last_practiced
            .map(|d| d.to_string())
            .unwrap_or_else(|| "never".to_string())
    ));
    out
}

pub fn mock_table(mocks: &[MockInterview]) -> String {
    let mut out = format!(
        "{:<14} {:<10} {:<14} {:<14} {:<22} {:>4} {:>6}\n",
        "ID", "DATE", "TYPE", "PARTNER", "TOPIC", "MIN", "RATING"
    );
    out.push_str(&"-".repeat(90));
    out.push('\n');
    for mock in mocks {
        out.push_str(&format!(
            "{:<14} {:<10} {:<14} {:<14} {:<22} {:>4} {:>6}\n",
            mock.id,
            mock.date,
            mock.kind.badge().label,
            truncate(&mock.partner, 12),
            truncate(&mock.topic, 20),
            mock.duration,
            mock.rating.to_string()
        ));
    }
    out
}

pub fn drill_table(drills: &[Drill]) -> String {
    let mut out = format!(
        "{:<14} {:<10} {:<28} {:>4} {:>8} {:>6}\n",
        "ID", "DATE", "TOPIC", "MIN", "COVERED", "RATING"
    );
    out.push_str(&"-".repeat(75));
    out.push('\n');
    for drill in drills {
        out.push_str(&format!(
            "{:<14} {:<10} {:<28} {:>4} {:>8} {:>6}\n",
            drill.id,
            drill.date,
            truncate(&drill.topic, 26),
            drill.duration,
            format!("{}/{}", drill.elements_completed.len(), DRILL_ELEMENTS.len()),
            drill.rating.to_string()
        ));
    }
    out
}

pub fn drill_elements() -> String {
    DRILL_ELEMENTS
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{:>2}. {}\n", i + 1, e.label()))
        .collect()
}

pub fn contact_table(contacts: &[NetworkingContact]) -> String {
    let mut out = format!(
        "{:<14} {:<12} {:<20} {:<18} {:<15} {:<10}\n",
        "ID", "STATUS", "NAME", "COMPANY", "TYPE", "LAST"
    );
    out.push_str(&"-".repeat(94));
    out.push('\n');
    for contact in contacts {
        out.push_str(&format!(
            "{:<14} {:<12} {:<20} {:<18} {:<15} {:<10}\n",
            contact.id,
            contact.status.badge().label,
            truncate(&contact.name, 18),
            truncate(&contact.company, 16),
            contact.connection_type.as_str(),
            contact
                .last_contact
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string())
        ));
    }
    out
}

pub fn rhythm_line(day: &DailyRhythm) -> String {
    let mark = |done: bool| if done { "x" } else { " " };
    let mut line = format!(
        "{}  [{}] applied  [{}] networked  [{}] drilled  [{}] story",
        day.date,
        mark(day.applied),
        mark(day.networked),
        mark(day.drilled),
        mark(day.story_practiced)
    );
    if !day.notes.is_empty() {
        line.push_str(&format!("  ({})", truncate(&day.notes, 30)));
    }
    line
}

// --- Progress ---

fn bar(progress: &Progress) -> String {
    const WIDTH: u32 = 20;
    let filled = if progress.target == 0 {
        WIDTH
    } else {
        (progress.done.min(progress.target) * WIDTH) / progress.target
    };
    format!(
        "[{}{}] {:>2}/{:<2}{}",
        "#".repeat(filled as usize),
        ".".repeat((WIDTH - filled) as usize),
        progress.done,
        progress.target,
        if progress.met() { " done" } else { "" }
    )
}

pub fn weekly_progress(progress: &WeeklyProgress) -> String {
    let mut out = if progress.week_number > 0 {
        format!(
            "Week {} ({} to {})\n",
            progress.week_number, progress.week_start, progress.week_end
        )
    } else {
        format!("Week of {} (before start date)\n", progress.week_start)
    };
    for (label, p) in [
        ("Applications", &progress.applications),
        ("Mocks", &progress.mocks),
        ("Drills", &progress.drills),
        ("Networking", &progress.networking),
    ] {
        out.push_str(&format!("  {:<13}{}\n", label, bar(p)));
    }
    out
}

// --- Badges ---

pub fn badge_text(badge: Badge) -> String {
    format!("{} ({} {})", badge.label, badge.bg, badge.text)
}

fn badge_map<T: ToString>(entries: Vec<(T, Badge)>) -> Value {
    let map: Map<String, Value> = entries
        .into_iter()
        .map(|(key, b)| {
            (
                key.to_string(),
                json!({ "label": b.label, "bg": b.bg, "text": b.text }),
            )
        })
        .collect();
    Value::Object(map)
}

/// All four badge tables keyed by wire value, for a frontend to consume.
pub fn badge_config_json() -> Value {
    json!({
        "applicationStatus": badge_map(application_status_config()),
        "networkingStatus": badge_map(networking_status_config()),
        "storyCategory": badge_map(story_category_config()),
        "mockType": badge_map(mock_type_config()),
        "drillElements": DRILL_ELEMENTS.iter().map(|e| e.label()).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApplicationStatus, GtmData, StoryCategory};
    use crate::tracker::{NewApplication, NewStory};
    use chrono::NaiveDate;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Acme", 10), "Acme");
        assert_eq!(truncate("International Widgets", 10), "Interna...");
        assert_eq!(truncate("Société Générale", 8), "Socié...");
    }

    #[test]
    fn test_badge_config_json() {
        let value = badge_config_json();
        assert_eq!(value["applicationStatus"].as_object().unwrap().len(), 8);
        assert_eq!(value["networkingStatus"]["reached-out"]["label"], "Reached Out");
        assert_eq!(value["mockType"]["system-design"]["bg"], "bg-purple-100");
        assert_eq!(value["storyCategory"].as_object().unwrap().len(), 8);
        assert_eq!(value["drillElements"][0], "Requirements & SLOs");
    }

    #[test]
    fn test_application_table_lists_rows() {
        let mut data = GtmData::empty();
        data.add_application(NewApplication {
            company: "Acme".to_string(),
            role: "Engineer".to_string(),
            status: Some(ApplicationStatus::Loop),
            ..Default::default()
        });
        let apps: Vec<&Application> = data.applications.iter().collect();
        let table = application_table(&apps);
        assert_eq!(table.lines().count(), 3);
        assert!(table.contains("Loop"));
        assert!(table.contains("Acme"));
    }

    #[test]
    fn test_story_detail() {
        let mut data = GtmData::empty();
        let id = data.add_story(NewStory {
            title: "Rules engine".to_string(),
            category: StoryCategory::Impact,
            situation: "Chargebacks rising".to_string(),
            task: String::new(),
            action: "Built it".to_string(),
            result: "-40%".to_string(),
            condensed: "Short version".to_string(),
            metrics: vec!["-40% losses".to_string()],
        });
        let story = data.story(&id).unwrap();

        let full = story_detail(story, false);
        assert!(full.starts_with("Rules engine [Impact]"));
        assert!(full.contains("Situation: Chargebacks rising"));
        assert!(full.contains("Task: -"));
        assert!(full.contains("  - -40% losses"));
        assert!(full.contains("last never"));

        let short = story_detail(story, true);
        assert!(short.contains("Short version"));
        assert!(!short.contains("Situation"));
    }

    #[test]
    fn test_progress_bar() {
        let met = Progress { done: 4, target: 3 };
        assert!(bar(&met).starts_with(&format!("[{}]", "#".repeat(20))));
        assert!(bar(&met).ends_with("done"));
        let half = Progress { done: 6, target: 12 };
        assert!(bar(&half).starts_with(&format!("[{}{}]", "#".repeat(10), ".".repeat(10))));
        let none = Progress { done: 0, target: 0 };
        assert!(bar(&none).ends_with("done"));
    }

    #[test]
    fn test_rhythm_line() {
        let day = DailyRhythm {
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            applied: true,
            networked: false,
            drilled: true,
            story_practiced: false,
            notes: String::new(),
        };
        assert_eq!(
            rhythm_line(&day),
            "2026-03-02  [x] applied  [ ] networked  [x] drilled  [ ] story"
        );
    }
}
