use crate::sections::Section;

/// Build the generation prompt for a role and difficulty.
///
/// The body is a per-section template of `Q<n>: <question>` / `Answer: <answer>`
/// lines that the model is asked to fill in verbatim; `parser::parse` reads
/// the same layout back. Question numbers run across sections.
pub fn build_prompt(role: &str, difficulty: &str, total_questions: usize) -> String {
    format!(
        "{}\n\nFormat strictly like this:\n{}\n\n{}",
        instructions(role, difficulty, total_questions),
        section_template(total_questions),
        closing_instructions()
    )
}

fn instructions(role: &str, difficulty: &str, total_questions: usize) -> String {
    let section_names: Vec<&str> = Section::ALL.iter().map(|s| s.name()).collect();
    format!(
        r#"Generate exactly {total} interview questions for the job role: {role}.
Difficulty level: {difficulty}.
Divide them evenly into {count} sections: {sections}.
Each question must have a relevant and concise answer (2-3 lines max).
Avoid placeholders like 'No question generated'."#,
        total = total_questions,
        role = role,
        difficulty = difficulty,
        count = section_names.len(),
        sections = join_names(&section_names),
    )
}

fn closing_instructions() -> &'static str {
    "Return only the text in this exact format. Do not include extra notes or explanations."
}

/// The fill-in template: one labelled block per section with its question slots.
pub fn section_template(total_questions: usize) -> String {
    let mut template = String::new();
    let mut counter = 1;

    for section in Section::ALL {
        template.push_str(&format!("\n{} Questions:\n", section.name()));
        for _ in 0..section.expected_count(total_questions) {
            template.push_str(&format!("Q{}: <question>\nAnswer: <answer>\n", counter));
            counter += 1;
        }
    }

    template
}

// "A, B, C, and D"
fn join_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}
