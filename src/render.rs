use std::fmt::Write as _;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use colored::*;

use crate::parser::{ParsedResult, SectionQuestions};

const DEFAULT_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Plain,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "plain" | "text" => Ok(OutputFormat::Plain),
            "json" => Ok(OutputFormat::Json),
            other => Err(anyhow!("Unknown output format: {} (expected terminal, plain or json)", other)),
        }
    }
}

/// Renders parsed questions as section cards or JSON.
pub struct Renderer {
    format: OutputFormat,
    colorful: bool,
    width: usize,
}

impl Renderer {
    pub fn new(format: OutputFormat, colorful: bool) -> Self {
        let width = crossterm::terminal::size()
            .map(|(cols, _)| (cols as usize).min(DEFAULT_WIDTH))
            .unwrap_or(DEFAULT_WIDTH);
        Self {
            format,
            colorful,
            width,
        }
    }

    pub fn render(&self, result: &ParsedResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(result).context("Failed to serialize questions")
            }
            OutputFormat::Terminal if self.colorful => Ok(self.render_cards(result, true)),
            OutputFormat::Terminal | OutputFormat::Plain => Ok(self.render_cards(result, false)),
        }
    }

    /// Print the rendered result to stdout.
    pub fn display(&self, result: &ParsedResult) -> Result<()> {
        println!("{}", self.render(result)?);
        Ok(())
    }

    fn render_cards(&self, result: &ParsedResult, colorful: bool) -> String {
        let mut out = String::new();
        for section in result.sections() {
            self.render_section(&mut out, section, colorful);
        }
        out.trim_end().to_string()
    }

    // Question numbers restart at 1 in every section.
    fn render_section(&self, out: &mut String, section: &SectionQuestions, colorful: bool) {
        let title = format!("{} Questions", section.section.name());
        let rule = "=".repeat(self.width);

        if colorful {
            let _ = writeln!(out, "{}", rule.bright_magenta());
            let _ = writeln!(out, "{}", title.bright_white().bold().on_purple());
            let _ = writeln!(out, "{}", rule.bright_magenta());
        } else {
            let _ = writeln!(out, "{}\n{}\n{}", rule, title, rule);
        }

        for (i, pair) in section.pairs.iter().enumerate() {
            let label = format!("Q{}:", i + 1);
            if colorful {
                let _ = writeln!(out, "{} {}", label.bright_cyan().bold(), pair.question.white());
                let _ = writeln!(out, "   {} {}", "Answer:".bright_green().bold(), pair.answer);
            } else {
                let _ = writeln!(out, "{} {}", label, pair.question);
                let _ = writeln!(out, "   Answer: {}", pair.answer);
            }
            let _ = writeln!(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn sample() -> ParsedResult {
        parse(
            "Technical Questions:\nQ1: What is a mutex?\nAnswer: A lock.\n\
             HR Questions:\nQ2: Why this team?\nAnswer: Growth.\n",
            4,
        )
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("plain".parse::<OutputFormat>().unwrap(), OutputFormat::Plain);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_plain_cards_in_section_order() {
        let text = Renderer::new(OutputFormat::Plain, false).render(&sample()).unwrap();
        let technical = text.find("Technical Questions").unwrap();
        let hr = text.find("HR Questions").unwrap();
        let scenario = text.find("Scenario-Based Questions").unwrap();
        let aptitude = text.find("Aptitude Questions").unwrap();
        assert!(technical < hr && hr < scenario && scenario < aptitude);

        assert!(text.contains("Q1: What is a mutex?\n   Answer: A lock."));
        assert!(text.contains("Q1: Why this team?\n   Answer: Growth."));
        assert!(text.contains("Q1: No question generated\n   Answer: No answer generated"));
    }

    #[test]
    fn test_terminal_without_color_matches_plain() {
        let result = sample();
        assert_eq!(
            Renderer::new(OutputFormat::Terminal, false).render(&result).unwrap(),
            Renderer::new(OutputFormat::Plain, true).render(&result).unwrap()
        );
    }

    #[test]
    fn test_json_keeps_section_order() {
        let json = Renderer::new(OutputFormat::Json, true).render(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let sections = value["sections"].as_array().unwrap();
        let names: Vec<&str> = sections.iter().map(|s| s["section"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Technical", "HR", "Scenario-Based", "Aptitude"]);
        assert_eq!(sections[0]["pairs"][0]["question"], "What is a mutex?");
    }
}
