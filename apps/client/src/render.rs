//! Resume presentation: pure mapping from records to display structures.
//!
//! Nothing here performs I/O. Absent fields render as empty text, never as a
//! placeholder that could be mistaken for data.

use std::fmt;

use serde::Serialize;

use crate::models::{Resume, WorkExperience};

/// Everything the detail view shows for one resume, grouped by section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeDetails {
    pub identity: Vec<IdentityField>,
    pub skills: Vec<SkillChip>,
    pub experience: Vec<ExperienceSection>,
    /// Pretty-printed `llm_analysis`, or empty when the record has none.
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentityField {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillChip(pub String);

/// One collapsible work-history entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceSection {
    pub header: String,
    pub responsibilities: String,
    pub achievements: String,
}

/// One row of the past-uploads table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeRow {
    pub id: String,
    pub file_name: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub uploaded: String,
}

pub fn render_details(resume: &Resume) -> ResumeDetails {
    let identity = vec![
        field("Name", &resume.name),
        field("Email", &resume.email),
        field("Phone", &resume.phone),
        field("LinkedIn", &resume.linkedin_url),
        field("GitHub", &resume.github_url),
        field("Summary", &resume.summary),
    ];

    let skills = resume
        .technical_skills
        .iter()
        .flatten()
        .map(|s| SkillChip(s.clone()))
        .collect();

    let experience = resume
        .work_experience
        .iter()
        .flatten()
        .map(render_experience)
        .collect();

    let analysis = resume
        .llm_analysis
        .as_ref()
        .and_then(|v| serde_json::to_string_pretty(v).ok())
        .unwrap_or_default();

    ResumeDetails {
        identity,
        skills,
        experience,
        analysis,
    }
}

pub fn render_row(resume: &Resume) -> ResumeRow {
    ResumeRow {
        id: resume.id.to_string(),
        file_name: text(&resume.file_name),
        name: text(&resume.name),
        email: text(&resume.email),
        phone: text(&resume.phone),
        uploaded: resume
            .uploaded_at
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
    }
}

fn render_experience(exp: &WorkExperience) -> ExperienceSection {
    ExperienceSection {
        header: format!(
            "{} at {} ({} - {})",
            text(&exp.job_title),
            text(&exp.company),
            text(&exp.start_date),
            text(&exp.end_date)
        ),
        responsibilities: join(&exp.responsibilities),
        achievements: join(&exp.achievements),
    }
}

fn field(label: &'static str, value: &Option<String>) -> IdentityField {
    IdentityField {
        label,
        value: text(value),
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn join(items: &Option<Vec<String>>) -> String {
    items.as_deref().map(|v| v.join(", ")).unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Terminal output
// ────────────────────────────────────────────────────────────────────────────

impl fmt::Display for ResumeDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for IdentityField { label, value } in &self.identity {
            writeln!(f, "{label}: {value}")?;
        }

        let chips: Vec<String> = self.skills.iter().map(|s| format!("[{}]", s.0)).collect();
        writeln!(f, "Skills: {}", chips.join(" "))?;

        writeln!(f, "Experience:")?;
        for section in &self.experience {
            writeln!(f, "  {}", section.header)?;
            writeln!(f, "    Responsibilities: {}", section.responsibilities)?;
            writeln!(f, "    Achievements: {}", section.achievements)?;
        }

        writeln!(f, "LLM Analysis:")?;
        for line in self.analysis.lines() {
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}

const TABLE_HEADERS: [&str; 6] = ["ID", "File Name", "Name", "Email", "Phone", "Uploaded"];

/// Formats rows as a left-aligned, column-padded table with a header line.
pub fn render_table(rows: &[ResumeRow]) -> String {
    let cells: Vec<[&str; 6]> = rows
        .iter()
        .map(|r| {
            [
                r.id.as_str(),
                r.file_name.as_str(),
                r.name.as_str(),
                r.email.as_str(),
                r.phone.as_str(),
                r.uploaded.as_str(),
            ]
        })
        .collect();

    let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&TABLE_HEADERS).chain(cells.iter()) {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}
