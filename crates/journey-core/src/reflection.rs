//! End-of-journey reflection plus the notes and links collected along the way.

use crate::content;
use crate::error::Result;
use crate::paths;
use crate::store::RecordStore;
use crate::unlock::Progress;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const CHALLENGE_NAME: &str = "Do Ruído ao Resultado";

// ---------------------------------------------------------------------------
// FinalReflection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinalReflection {
    pub deliverables: String,
    pub insights: String,
    pub next_steps: String,
    pub feeling: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl FinalReflection {
    pub fn load<S: RecordStore>(store: &S) -> Result<Option<Self>> {
        store.get(paths::FINAL_REFLECTION_KEY)
    }

    pub fn save<S: RecordStore>(&mut self, store: &S, now: DateTime<Utc>) -> Result<()> {
        self.timestamp = Some(now);
        store.put(paths::FINAL_REFLECTION_KEY, self)
    }

    /// Text posted when the user shares the reflection.
    pub fn share_text(&self, completed_days: usize) -> String {
        format!(
            "Concluí {completed_days} dias do desafio \"{CHALLENGE_NAME}\"! 🎯\n\n{}",
            self.insights
        )
    }
}

// ---------------------------------------------------------------------------
// Notes history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct NotesEntry {
    pub day: u8,
    pub theme: &'static str,
    pub notes: String,
    pub insights: Vec<String>,
    pub feedback: Vec<String>,
}

/// Days with notes, insights or feedback, in day order.
pub fn notes_history(progress: &Progress) -> Vec<NotesEntry> {
    progress
        .records()
        .filter(|r| {
            !r.notes.is_empty() || !r.answers.insights.is_empty() || !r.answers.feedback.is_empty()
        })
        .map(|r| NotesEntry {
            day: r.day.get(),
            theme: content::day_content(r.day).theme,
            notes: r.notes.clone(),
            insights: r.answers.insights.clone(),
            feedback: r.answers.feedback.clone(),
        })
        .collect()
}

/// Plain-text export of the notes history.
pub fn export_notes(entries: &[NotesEntry]) -> String {
    let rule = "-".repeat(50);
    let mut out = String::from("HISTÓRICO DE ANOTAÇÕES E INSIGHTS\n");
    out.push_str(&format!("{CHALLENGE_NAME} - Desafio 7 Dias\n\n"));
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");

    for e in entries {
        out.push_str(&format!("DIA {}: {}\n{rule}\n\n", e.day, e.theme));
        if !e.notes.is_empty() {
            out.push_str(&format!("ANOTAÇÕES:\n{}\n\n", e.notes));
        }
        push_numbered(&mut out, "INSIGHTS:", &e.insights);
        push_numbered(&mut out, "FEEDBACK RECEBIDO:", &e.feedback);
        out.push('\n');
    }
    out
}

fn push_numbered(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(heading);
    out.push('\n');
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("{}. {item}\n", i + 1));
    }
    out.push('\n');
}

// ---------------------------------------------------------------------------
// Links history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LinksEntry {
    pub day: u8,
    pub theme: &'static str,
    pub links: Vec<String>,
}

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"https?://[^\s]+").unwrap_or_else(|e| panic!("bad url regex: {e}"))
    })
}

pub fn extract_links(text: &str) -> Vec<String> {
    url_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// URLs found in notes and research sources, plus the publish link, per
/// day. Duplicates within a day are dropped, first occurrence kept.
pub fn links_history(progress: &Progress) -> Vec<LinksEntry> {
    progress
        .records()
        .filter_map(|r| {
            let mut links = extract_links(&r.notes);
            for source in &r.answers.research_sources {
                links.extend(extract_links(source));
            }
            if let Some(link) = &r.answers.publish_link {
                links.push(link.clone());
            }

            let mut unique: Vec<String> = Vec::with_capacity(links.len());
            for l in links {
                if !unique.contains(&l) {
                    unique.push(l);
                }
            }

            (!unique.is_empty()).then(|| LinksEntry {
                day: r.day.get(),
                theme: content::day_content(r.day).theme,
                links: unique,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::DayRecord;
    use crate::store::MemoryStore;
    use crate::types::DayNumber;

    fn day(n: u8) -> DayRecord {
        DayRecord::new(DayNumber::new(n).unwrap())
    }

    #[test]
    fn save_stamps_timestamp() {
        let store = MemoryStore::new();
        assert!(FinalReflection::load(&store).unwrap().is_none());
        let now: DateTime<Utc> = "2025-03-08T20:00:00Z".parse().unwrap();
        let mut r = FinalReflection {
            insights: "Foco vence pressa".into(),
            ..Default::default()
        };
        r.save(&store, now).unwrap();
        let loaded = FinalReflection::load(&store).unwrap().unwrap();
        assert_eq!(loaded.timestamp, Some(now));
        assert_eq!(loaded.insights, "Foco vence pressa");
        let raw = store.get_raw(paths::FINAL_REFLECTION_KEY).unwrap().unwrap();
        assert!(raw.contains("\"nextSteps\""));
    }

    #[test]
    fn share_text_format() {
        let r = FinalReflection {
            insights: "Menos é mais".into(),
            ..Default::default()
        };
        assert_eq!(
            r.share_text(7),
            "Concluí 7 dias do desafio \"Do Ruído ao Resultado\"! 🎯\n\nMenos é mais"
        );
    }

    #[test]
    fn notes_history_skips_empty_days() {
        let mut d1 = day(1);
        d1.notes = "primeiro dia".into();
        let d2 = day(2);
        let mut d3 = day(3);
        d3.answers.insights = vec!["ouvir antes".into()];
        let history = notes_history(&Progress::from_records([d1, d2, d3]));
        let days: Vec<u8> = history.iter().map(|e| e.day).collect();
        assert_eq!(days, [1, 3]);

        let text = export_notes(&history);
        assert!(text.contains("DIA 1:"));
        assert!(text.contains("ANOTAÇÕES:\nprimeiro dia"));
        assert!(text.contains("INSIGHTS:\n1. ouvir antes"));
        assert!(!text.contains("FEEDBACK RECEBIDO"));
    }

    #[test]
    fn links_from_notes_sources_and_publish() {
        let mut d2 = day(2);
        d2.notes = "ver https://a.example/x e http://b.example".into();
        d2.answers.research_sources = vec![
            "artigo https://a.example/x".into(),
            "livro sem link".into(),
        ];
        let mut d7 = day(7);
        d7.answers.publish_link = Some("https://blog.example/post".into());
        let d1 = day(1);

        let history = links_history(&Progress::from_records([d1, d2, d7]));
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].day, 2);
        assert_eq!(
            history[0].links,
            ["https://a.example/x", "http://b.example"]
        );
        assert_eq!(history[1].links, ["https://blog.example/post"]);
    }
}
