//! Narrated combat report
//!
//! Every resolution step appends an entry describing what happened in
//! player-readable terms. Entries are typed so tests can assert on the
//! kind of event rather than parsing prose.

use crate::core::types::{CombatPhase, UnitId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of event an entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportKind {
    /// Weapon fire announced (attacker, weapon, target)
    AttackAnnounced,
    /// Target number and roll result
    ToHit,
    /// Attack missed
    MissReported,
    /// Cluster table consulted, hit count rolled
    HitsRolled,
    /// Damage groups applied to a unit, hex, or structure
    DamageApplied,
    /// Rapid-fire weapon jammed
    WeaponJammed,
    /// Pod attached to target
    PodAttached,
    /// Target painted by a designator
    DesignationMarked,
    /// Minefield cleared from a hex
    MinefieldCleared,
    /// Hex set on fire
    FireStarted,
    /// Missiles expended with no effect
    MissilesWasted,
    /// Attack could not be resolved
    AttackImpossible,
    /// Blank line between attack groups
    Separator,
    /// Anything else worth narrating
    Info,
}

/// One line of the combat narration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub phase: CombatPhase,
    pub attacker: Option<UnitId>,
    pub kind: ReportKind,
    pub text: String,
}

/// Ordered narration of a battle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    pub entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        phase: CombatPhase,
        attacker: Option<UnitId>,
        kind: ReportKind,
        text: impl Into<String>,
    ) {
        self.entries.push(ReportEntry {
            phase,
            attacker,
            kind,
            text: text.into(),
        });
    }

    /// Blank line separating one attack's narration from the next
    pub fn separator(&mut self, phase: CombatPhase) {
        self.entries.push(ReportEntry {
            phase,
            attacker: None,
            kind: ReportKind::Separator,
            text: String::new(),
        });
    }

    /// Append another report's entries, preserving order
    pub fn extend(&mut self, other: Report) {
        self.entries.extend(other.entries);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries of a given kind, in order
    pub fn of_kind(&self, kind: ReportKind) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    /// Whether any entry of this kind was recorded
    pub fn contains_kind(&self, kind: ReportKind) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    /// Full narration text for an attacker, in order
    pub fn narration_for(&self, attacker: UnitId) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.attacker == Some(attacker))
            .map(|e| e.text.as_str())
            .collect()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            if entry.kind == ReportKind::Separator {
                writeln!(f)?;
            } else {
                writeln!(f, "{}", entry.text)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_filter_by_kind() {
        let mut report = Report::new();
        let attacker = UnitId::new();
        report.push(
            CombatPhase::Firing,
            Some(attacker),
            ReportKind::AttackAnnounced,
            "Grasshopper fires Medium Laser at Panther",
        );
        report.push(
            CombatPhase::Firing,
            Some(attacker),
            ReportKind::ToHit,
            "needs 8, rolls 9 (4 + 5): hits!",
        );
        report.separator(CombatPhase::Firing);

        assert_eq!(report.len(), 3);
        assert_eq!(report.of_kind(ReportKind::ToHit).count(), 1);
        assert!(report.contains_kind(ReportKind::Separator));
        assert_eq!(report.narration_for(attacker).len(), 2);
    }

    #[test]
    fn test_display_renders_separator_as_blank_line() {
        let mut report = Report::new();
        report.push(CombatPhase::Firing, None, ReportKind::Info, "first");
        report.separator(CombatPhase::Firing);
        report.push(CombatPhase::Firing, None, ReportKind::Info, "second");

        let text = report.to_string();
        assert_eq!(text, "first\n\nsecond\n");
    }
}
