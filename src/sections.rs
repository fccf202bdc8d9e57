use std::fmt;

use serde::{Deserialize, Serialize};

/// Interview question categories, in the order they are prompted for and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Technical,
    #[serde(rename = "HR")]
    Hr,
    #[serde(rename = "Scenario-Based")]
    ScenarioBased,
    Aptitude,
}

impl Section {
    /// All sections in their fixed order. The prompt template and the parser
    /// both walk this list, so reordering it changes the wire contract.
    pub const ALL: [Section; 4] = [
        Section::Technical,
        Section::Hr,
        Section::ScenarioBased,
        Section::Aptitude,
    ];

    /// Label used in prompts, section headers and rendered output.
    pub fn name(&self) -> &'static str {
        match self {
            Section::Technical => "Technical",
            Section::Hr => "HR",
            Section::ScenarioBased => "Scenario-Based",
            Section::Aptitude => "Aptitude",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Section::Technical => 0,
            Section::Hr => 1,
            Section::ScenarioBased => 2,
            Section::Aptitude => 3,
        }
    }

    fn is_last(&self) -> bool {
        self.index() == Self::ALL.len() - 1
    }

    /// Number of question slots this section gets out of `total_questions`.
    pub fn expected_count(&self, total_questions: usize) -> usize {
        let sections = Self::ALL.len();
        let per_section = total_questions / sections;
        let remainder = total_questions % sections;
        if self.is_last() {
            per_section + remainder
        } else {
            per_section
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Expected counts for every section, in `Section::ALL` order.
#[allow(dead_code)]
pub fn expected_counts(total_questions: usize) -> [usize; 4] {
    Section::ALL.map(|section| section.expected_count(total_questions))
}
