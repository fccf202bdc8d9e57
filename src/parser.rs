use log::debug;
use serde::{Deserialize, Serialize};

use crate::sections::Section;

pub const PLACEHOLDER_QUESTION: &str = "No question generated";
pub const PLACEHOLDER_ANSWER: &str = "No answer generated";

/// A single interview question with its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QAPair {
    pub question: String,
    pub answer: String,
}

impl QAPair {
    pub fn new(question: &str, answer: &str) -> Self {
        Self {
            question: question.trim().to_string(),
            answer: answer.trim().to_string(),
        }
    }

    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_QUESTION, PLACEHOLDER_ANSWER)
    }

    #[allow(dead_code)]
    pub fn is_placeholder(&self) -> bool {
        self.question == PLACEHOLDER_QUESTION && self.answer == PLACEHOLDER_ANSWER
    }
}

/// The pairs belonging to one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionQuestions {
    pub section: Section,
    pub pairs: Vec<QAPair>,
}

/// Parsed model output: every section in fixed order, each holding exactly
/// its expected number of pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResult {
    sections: Vec<SectionQuestions>,
}

impl ParsedResult {
    pub fn sections(&self) -> &[SectionQuestions] {
        &self.sections
    }

    #[allow(dead_code)]
    pub fn pairs(&self, section: Section) -> &[QAPair] {
        &self.sections[section.index()].pairs
    }

    #[allow(dead_code)]
    pub fn total(&self) -> usize {
        self.sections.iter().map(|s| s.pairs.len()).sum()
    }
}

/// What normalization had to do to reach the expected shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Parsed pairs kept in the result.
    pub recovered: usize,
    /// Placeholder pairs added to short sections.
    pub placeholders: usize,
    /// Parsed pairs discarded because a section overflowed.
    pub dropped: usize,
}

/// Line classification, in priority order.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Header(Section),
    Question(&'a str),
    Answer(&'a str),
    Text(&'a str),
}

// Checked in order; first prefix match wins.
const HEADER_MATCHERS: [(Section, &str); 4] = [
    (Section::Technical, "technical"),
    (Section::Hr, "hr"),
    (Section::ScenarioBased, "scenario-based"),
    (Section::Aptitude, "aptitude"),
];

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

// Same boundaries as Python's `str.splitlines`; `\r\n` leaves an empty piece that is skipped.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn after_colon(line: &str) -> &str {
    line.split_once(':').map(|(_, rest)| rest.trim()).unwrap_or("")
}

fn classify(line: &str) -> Line<'_> {
    if let Some((section, _)) = HEADER_MATCHERS
        .iter()
        .find(|(_, prefix)| starts_with_ignore_case(line, prefix))
    {
        return Line::Header(*section);
    }

    if line.contains(':') {
        if starts_with_ignore_case(line, "q") {
            return Line::Question(after_colon(line));
        }
        if starts_with_ignore_case(line, "answer") {
            return Line::Answer(after_colon(line));
        }
    }

    Line::Text(line)
}

#[derive(Debug, Default)]
struct ParseState {
    current_section: Option<Section>,
    question: String,
    answer: String,
    collected: [Vec<QAPair>; 4],
}

impl ParseState {
    /// Move the pending pair into its section, if there is one to move.
    fn flush(&mut self) {
        if let Some(section) = self.current_section {
            if !self.question.is_empty() {
                self.collected[section.index()].push(QAPair::new(&self.question, &self.answer));
            }
        }
    }

    fn step(mut self, line: &str) -> Self {
        match classify(line) {
            Line::Header(section) => {
                self.flush();
                self.question.clear();
                self.answer.clear();
                self.current_section = Some(section);
            }
            Line::Question(text) => {
                self.flush();
                self.question = text.to_string();
                self.answer.clear();
            }
            Line::Answer(text) => {
                self.answer = text.to_string();
            }
            Line::Text(text) => {
                if !self.answer.is_empty() {
                    self.answer.push(' ');
                    self.answer.push_str(text);
                } else if !self.question.is_empty() {
                    self.question.push(' ');
                    self.question.push_str(text);
                }
            }
        }
        self
    }

    fn finish(mut self) -> [Vec<QAPair>; 4] {
        self.flush();
        self.collected
    }
}

/// Truncate or pad `pairs` to exactly `expected` entries.
fn normalize(mut pairs: Vec<QAPair>, expected: usize, report: &mut ParseReport) -> Vec<QAPair> {
    if pairs.len() > expected {
        report.dropped += pairs.len() - expected;
        pairs.truncate(expected);
    }
    report.recovered += pairs.len();
    if pairs.len() < expected {
        report.placeholders += expected - pairs.len();
        pairs.resize(expected, QAPair::placeholder());
    }
    pairs
}

/// Parse raw model output into exactly `total_questions` pairs split across
/// the four sections. Never fails: missing content becomes placeholder pairs.
#[allow(dead_code)]
pub fn parse(raw_text: &str, total_questions: usize) -> ParsedResult {
    parse_with_report(raw_text, total_questions).0
}

/// Like [`parse`], also reporting how much padding and truncation happened.
pub fn parse_with_report(raw_text: &str, total_questions: usize) -> (ParsedResult, ParseReport) {
    let collected = raw_text
        .split(is_line_break)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .fold(ParseState::default(), ParseState::step)
        .finish();

    let mut report = ParseReport::default();
    let sections = Section::ALL
        .into_iter()
        .zip(collected)
        .map(|(section, pairs)| SectionQuestions {
            section,
            pairs: normalize(pairs, section.expected_count(total_questions), &mut report),
        })
        .collect();

    debug!(
        "Parsed {} pairs ({} placeholders, {} dropped)",
        report.recovered, report.placeholders, report.dropped
    );

    (ParsedResult { sections }, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(result: &ParsedResult) -> Vec<usize> {
        result.sections().iter().map(|s| s.pairs.len()).collect()
    }

    #[test]
    fn test_empty_input_is_all_placeholders() {
        let (result, report) = parse_with_report("", 28);
        assert_eq!(counts(&result), vec![7, 7, 7, 7]);
        assert!(result
            .sections()
            .iter()
            .flat_map(|s| &s.pairs)
            .all(QAPair::is_placeholder));
        assert_eq!(report.placeholders, 28);
        assert_eq!(report.recovered, 0);
    }

    #[test]
    fn test_shape_holds_for_any_input() {
        let inputs = [
            "",
            "garbage\nmore garbage",
            "Q1: orphan question without a section",
            "Technical\nQ1: a\nAnswer: b\nQ2: c\nQ3: d\nQ4: e",
            ":::\n\n\nanswer:\nq:\nHR",
        ];
        for input in inputs {
            for total in [1, 4, 5, 28, 30] {
                let result = parse(input, total);
                assert_eq!(result.sections().len(), 4);
                assert_eq!(result.total(), total);
                let expected: Vec<usize> = Section::ALL
                    .iter()
                    .map(|s| s.expected_count(total))
                    .collect();
                assert_eq!(counts(&result), expected);
            }
        }
    }

    #[test]
    fn test_recovers_well_formed_section() {
        let text = "Technical Questions:\n\
                    Q1:  What is ownership?  \n\
                    Answer: Each value has a single owner.\n\
                    Q2: What is a lifetime?\n\
                    Answer:   The scope a reference is valid for. \n";
        let (result, report) = parse_with_report(text, 8);
        assert_eq!(
            result.pairs(Section::Technical),
            &[
                QAPair::new("What is ownership?", "Each value has a single owner."),
                QAPair::new("What is a lifetime?", "The scope a reference is valid for."),
            ]
        );
        assert_eq!(report.recovered, 2);
        assert!(result.pairs(Section::Hr).iter().all(QAPair::is_placeholder));
    }

    #[test]
    fn test_overflow_keeps_first_pairs_in_order() {
        let text = "HR Questions:\n\
                    Q1: one\nAnswer: a1\n\
                    Q2: two\nAnswer: a2\n\
                    Q3: three\nAnswer: a3\n";
        let (result, report) = parse_with_report(text, 8);
        let hr = result.pairs(Section::Hr);
        assert_eq!(hr.len(), 2);
        assert_eq!(hr[0], QAPair::new("one", "a1"));
        assert_eq!(hr[1], QAPair::new("two", "a2"));
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn test_multiline_answer_and_question() {
        let text = "Aptitude Questions:\n\
                    Q1: If a train leaves\n\
                    at noon, when does it arrive?\n\
                    Answer: X\n\
                    Y\n";
        let result = parse(text, 4);
        assert_eq!(
            result.pairs(Section::Aptitude)[0],
            QAPair::new("If a train leaves at noon, when does it arrive?", "X Y")
        );
    }

    #[test]
    fn test_missing_answer_stays_empty() {
        let text = "Technical Questions:\nQ1: first\nQ2: second\nAnswer: ok\n";
        let result = parse(text, 8);
        let technical = result.pairs(Section::Technical);
        assert_eq!(technical[0], QAPair::new("first", ""));
        assert!(!technical[0].is_placeholder());
        assert_eq!(technical[1], QAPair::new("second", "ok"));
    }

    #[test]
    fn test_unanswered_question_flushed_by_next_header() {
        let (result, report) = parse_with_report("Technical\nQ1: a\nHR\nQ2: b", 4);
        assert_eq!(result.pairs(Section::Technical), &[QAPair::new("a", "")]);
        assert_eq!(result.pairs(Section::Hr), &[QAPair::new("b", "")]);
        assert_eq!(report.recovered, 2);
    }

    #[test]
    fn test_splits_on_all_line_boundaries() {
        let text = "Technical\rQ1: a\u{2028}Answer: b\r\nHR\u{85}Q2: c\x0cAnswer: d";
        let result = parse(text, 4);
        assert_eq!(result.pairs(Section::Technical), &[QAPair::new("a", "b")]);
        assert_eq!(result.pairs(Section::Hr), &[QAPair::new("c", "d")]);
    }

    #[test]
    fn test_headers_are_case_insensitive_and_switch_sections() {
        let text = "TECHNICAL QUESTIONS\nq1: t\nanswer: ta\n\
                    hr questions:\nQ2: h\nANSWER: ha\n\
                    Scenario-based Questions:\nQ3: s\nAnswer: sa\n\
                    aptitude\nQ4: p\nAnswer: pa\n";
        let (result, report) = parse_with_report(text, 4);
        assert_eq!(result.pairs(Section::Technical), &[QAPair::new("t", "ta")]);
        assert_eq!(result.pairs(Section::Hr), &[QAPair::new("h", "ha")]);
        assert_eq!(result.pairs(Section::ScenarioBased), &[QAPair::new("s", "sa")]);
        assert_eq!(result.pairs(Section::Aptitude), &[QAPair::new("p", "pa")]);
        assert_eq!(report.placeholders, 0);
    }

    #[test]
    fn test_questions_before_any_header_are_discarded() {
        let text = "Q1: lost\nAnswer: lost too\nTechnical:\nQ2: kept\nAnswer: yes\n";
        let result = parse(text, 4);
        assert_eq!(result.pairs(Section::Technical), &[QAPair::new("kept", "yes")]);
    }

    #[test]
    fn test_header_resets_pending_answer_context() {
        // Text after a header with no open question is dropped.
        let text = "HR Questions:\nstray line\nQ1: real\nAnswer: fine\n";
        let result = parse(text, 4);
        assert_eq!(result.pairs(Section::Hr), &[QAPair::new("real", "fine")]);
    }

    #[test]
    fn test_question_starting_with_section_name_reads_as_header() {
        let text = "Technical Questions:\nQ1: fine\nAnswer: yes\n\
                    HR managers often ask: why?\n";
        let result = parse(text, 8);
        assert_eq!(result.pairs(Section::Technical)[0], QAPair::new("fine", "yes"));
        assert!(result.pairs(Section::Hr).iter().all(QAPair::is_placeholder));
    }

    #[test]
    fn test_line_without_colon_is_continuation() {
        let text = "Technical\nQ1: What is\nquick sort\nAnswer: A sort\nquite fast\n";
        let result = parse(text, 4);
        assert_eq!(
            result.pairs(Section::Technical)[0],
            QAPair::new("What is quick sort", "A sort quite fast")
        );
    }

    #[test]
    fn test_normalize_is_noop_at_expected_size() {
        let pairs = vec![QAPair::new("a", "b"), QAPair::new("c", "d")];
        let mut report = ParseReport::default();
        assert_eq!(normalize(pairs.clone(), 2, &mut report), pairs);
        assert_eq!(report.placeholders + report.dropped, 0);
    }

    #[test]
    fn test_normalize_pads_empty_list() {
        let mut report = ParseReport::default();
        let padded = normalize(Vec::new(), 3, &mut report);
        assert_eq!(padded, vec![QAPair::placeholder(); 3]);
        assert_eq!(report.placeholders, 3);
    }

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify("Technical: q"), Line::Header(Section::Technical));
        assert_eq!(classify("Question: x"), Line::Question("x"));
        assert_eq!(classify("Answer: y"), Line::Answer("y"));
        assert_eq!(classify("Answer without colon"), Line::Text("Answer without colon"));
        assert_eq!(classify("q without colon"), Line::Text("q without colon"));
    }
}
