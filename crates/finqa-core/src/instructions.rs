//! Annotator instructions shown above the form

use serde::Serialize;

pub const EDGAR_SEARCH_URL: &str = "https://www.sec.gov/edgar/searchedgar/companysearch";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Step {
    pub title: &'static str,
    pub items: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuestionCategory {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkedExample {
    pub category: &'static str,
    pub prompt: &'static str,
    pub answer: &'static str,
    pub supporting_facts: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Instructions {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub objective: &'static str,
    pub search_url: &'static str,
    pub steps: &'static [Step],
    pub categories: &'static [QuestionCategory],
    pub examples: &'static [WorkedExample],
}

const STEPS: &[Step] = &[
    Step {
        title: "Finding Reports",
        items: &[
            "Go to the SEC EDGAR Company Search page.",
            "Search for companies and filter the results to find 10-K or 10-Q reports from October 2023 or more recent.",
            "Select the report and open it as HTML.",
        ],
    },
    Step {
        title: "Downloading PDFs",
        items: &[
            "Click 'Menu' on the SEC page with the 10-K/10-Q report.",
            "Click 'Open as HTML.'",
            "Write down the link to the HTML version.",
            "Click 'Print' and set the destination to 'Save as PDF' to save the PDF file.",
        ],
    },
    Step {
        title: "Creating Prompts",
        items: &[
            "Read through the report and generate prompts/questions that fall into one of the categories below.",
            "Ensure that prompts ask for factual information with support in the documents. Avoid opinion-based questions unless they are stated in the documents.",
        ],
    },
    Step {
        title: "Writing Answers",
        items: &[
            "Provide a human-written answer to each prompt.",
            "Include any supporting facts needed to answer the question accurately.",
            "Ensure that answers are clear, concise, and free from any PII.",
        ],
    },
];

const CATEGORIES: &[QuestionCategory] = &[
    QuestionCategory {
        name: "Category A",
        description: "Simple questions about a single document.",
    },
    QuestionCategory {
        name: "Category B",
        description: "Complex questions about a single document that require multiple parts/paragraphs from the report or inferring information.",
    },
    QuestionCategory {
        name: "Category C",
        description: "Complex questions that require using information from multiple reports (up to 40 reports), for example, reports from companies in a similar sector.",
    },
];

const EXAMPLES: &[WorkedExample] = &[
    WorkedExample {
        category: "Category A",
        prompt: "What was the total revenue reported by the company in the latest 10-Q filing?",
        answer: "The total revenue reported by the company in the latest 10-Q filing was $10 million.",
        supporting_facts: "According to the 10-Q report, the total revenue for the quarter ending December 31, 2023, was $10 million.",
    },
    WorkedExample {
        category: "Category B",
        prompt: "How did the company's net income change compared to the previous quarter?",
        answer: "The company's net income increased by $2 million compared to the previous quarter.",
        supporting_facts: "The 10-Q report states that the net income for the current quarter is $5 million, whereas the net income for the previous quarter was $3 million.",
    },
    WorkedExample {
        category: "Category C",
        prompt: "Compare the R&D expenses of the company with two other companies in the same sector for the latest fiscal year.",
        answer: "The company's R&D expenses were $15 million, while Company B's R&D expenses were $12 million and Company C's were $18 million.",
        supporting_facts: "According to the 10-K reports of the respective companies, the R&D expenses for the latest fiscal year are as follows: Company A: $15 million, Company B: $12 million, Company C: $18 million.",
    },
];

pub const INSTRUCTIONS: Instructions = Instructions {
    title: "Instructions",
    subtitle: "Detailed Instructions for Workers",
    objective: "Your task is to create prompts and human-written answers with supporting facts based on 10-K and 10-Q reports.",
    search_url: EDGAR_SEARCH_URL,
    steps: STEPS,
    categories: CATEGORIES,
    examples: EXAMPLES,
};

impl Instructions {
    /// Plain-text rendering for terminals
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n{}\n\n", self.title, self.subtitle));
        out.push_str(&format!("Objective: {}\n\n", self.objective));
        out.push_str("Steps:\n");

        for (i, step) in self.steps.iter().enumerate() {
            out.push_str(&format!("{}. {}:\n", i + 1, step.title));
            for item in step.items {
                out.push_str(&format!("   - {}\n", item));
            }
            if step.title == "Finding Reports" {
                out.push_str(&format!("     SEC EDGAR Search: {}\n", self.search_url));
            }
            if step.title == "Creating Prompts" {
                for category in self.categories {
                    out.push_str(&format!("     * {}: {}\n", category.name, category.description));
                }
            }
        }

        out.push_str("\nExample Prompts, Answers, and Supporting Facts:\n");
        for example in self.examples {
            out.push_str(&format!(
                "\nPrompt ({}): {}\nAnswer: {}\nSupporting Facts: {}\n",
                example.category, example.prompt, example.answer, example.supporting_facts
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_field;

    #[test]
    fn test_render_text_covers_every_section() {
        let text = INSTRUCTIONS.render_text();
        assert!(text.starts_with("Instructions\nDetailed Instructions for Workers"));
        assert!(text.contains(EDGAR_SEARCH_URL));
        assert!(text.contains("Category C: Complex questions"));
        assert!(text.contains("Prompt (Category B): How did the company's net income change"));
        assert_eq!(text.matches("Supporting Facts:").count(), 4);
    }

    #[test]
    fn test_worked_examples_pass_validation() {
        for example in INSTRUCTIONS.examples {
            assert!(validate_field("prompt", example.prompt).is_empty());
            assert!(validate_field("answer", example.answer).is_empty());
        }
    }

    #[test]
    fn test_serializes_for_web() {
        let value = serde_json::to_value(INSTRUCTIONS).unwrap();
        assert!(value["examples"][0]["supportingFacts"].is_string());
        assert_eq!(value["steps"].as_array().unwrap().len(), 4);
    }
}
