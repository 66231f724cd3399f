//! Navigation scripts and browse steps.
//!
//! A script has one `NavEvent` per line in its text form (`subject phy`,
//! `navigate resources note`, `crumb subjects`). Blank lines and lines
//! starting with `#` are skipped.

use std::str::FromStr;

use anyhow::{Context, Result};
use portal_model::{CollegeId, DegreeLevel, Pattern, ResourceType, SubjectId};
use portal_nav::{NavError, NavEvent, Scope, Section};

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    /// 1-based line number in the script.
    pub line: usize,
    pub event: NavEvent,
}

/// Parse a whole script, failing on the first malformed line.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>> {
    text.lines()
        .enumerate()
        .map(|(index, raw)| (index + 1, raw.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| {
            let event = text
                .parse::<NavEvent>()
                .with_context(|| format!("line {line}: {text}"))?;
            Ok(ScriptStep { line, event })
        })
        .collect()
}

/// Parse a `--nav` value: `SECTION` or `SECTION:TYPE`.
pub fn parse_nav(token: &str) -> Result<NavEvent, NavError> {
    let (section, kind) = match token.split_once(':') {
        Some((section, kind)) => (section, Some(kind)),
        None => (token, None),
    };
    Ok(NavEvent::Navigate {
        section: section.parse::<Section>()?,
        resource_type: kind.map(ResourceType::from_str).transpose()?,
    })
}

/// Parse a subject or college argument, where `all` is the sentinel.
pub fn parse_scope<T>(token: &str) -> Result<Scope<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Scope::<T>::parse_token(token)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "value is empty".to_string())
}

/// Selections given on the `browse` command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseSteps {
    /// `navigate` events, applied first and in order.
    pub navigate: Vec<NavEvent>,
    pub subject: Option<Scope<SubjectId>>,
    pub pattern: Option<Pattern>,
    pub degree: Option<DegreeLevel>,
    pub college: Option<Scope<CollegeId>>,
    pub semester: Option<u8>,
    pub resource_type: Option<ResourceType>,
    pub year: Option<u16>,
}

impl BrowseSteps {
    /// Events in the order a student would click through them.
    ///
    /// The type step is left out when a `navigate resources:TYPE` already
    /// seeded the same type, since the flow skips that screen.
    pub fn events(&self) -> Vec<NavEvent> {
        let mut events = self.navigate.clone();
        let seeded = self.navigate.iter().rev().find_map(|event| match event {
            NavEvent::Navigate {
                section: Section::Resources,
                resource_type,
            } => *resource_type,
            _ => None,
        });

        events.extend(self.subject.clone().map(NavEvent::SelectSubject));
        events.extend(self.pattern.map(NavEvent::SelectPattern));
        events.extend(self.degree.map(NavEvent::SelectDegree));
        events.extend(self.college.clone().map(NavEvent::SelectCollege));
        events.extend(self.semester.map(NavEvent::SelectSemester));
        if let Some(kind) = self.resource_type
            && seeded != Some(kind)
        {
            events.push(NavEvent::SelectType(kind));
        }
        if let Some(year) = self.year {
            events.push(NavEvent::SelectYear(Some(year)));
        }
        events
    }
}
