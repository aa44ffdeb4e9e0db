use viber_core::ProjectSpecs;

use crate::context::append_spec_details;

/// Build the instructions for generating the project's CLAUDE.md context
/// document, the file loaded into AI coding agents' context every session.
pub fn build_context_doc_prompt(specs: &ProjectSpecs) -> String {
    let mut prompt = String::from(
        "Generate a comprehensive CLAUDE.md file for the following project. \
         This file will be loaded into AI coding agents' context at the start of every session.\n\n",
    );
    append_spec_details(&mut prompt, specs);
    prompt.push_str(
        "\n## CLAUDE.md Structure Requirements\n\n\
         The file MUST include these sections:\n\n\
         ### 1. Project Overview\n\
         - One-paragraph summary of what the project is and does\n\
         - Target users and core value proposition\n\n\
         ### 2. Tech Stack\n\
         - Every technology with version numbers where known\n\
         - Package manager preference\n\
         - Key dependencies and why they were chosen\n\n\
         ### 3. Project Structure\n\
         - Directory layout with descriptions\n\
         - Where different types of code live\n\
         - Naming conventions for files and folders\n\n\
         ### 4. Development Commands\n\
         - How to install, run dev, build, test, lint\n\
         - Database commands (migrate, seed, reset)\n\
         - Any custom scripts\n\n\
         ### 5. Architecture Decisions\n\
         - Key patterns (e.g., server components vs client, API structure)\n\
         - State management approach\n\
         - Data flow patterns\n\
         - Error handling strategy\n\n\
         ### 6. Coding Conventions\n\
         - Style guide highlights (naming, imports, exports)\n\
         - Component patterns\n\
         - Type conventions\n\
         - Testing patterns\n\n\
         ### 7. Current Status\n\
         - What's been built so far (scaffold)\n\
         - What's in progress\n\
         - Known issues or tech debt\n\n\
         ### 8. Rules\n\
         - Things the AI must ALWAYS do\n\
         - Things the AI must NEVER do\n\
         - Common mistakes to avoid in this stack\n\n",
    );
    prompt.push_str(&format!(
        "Output ONLY the CLAUDE.md content. Start with `# {}` as the title.",
        specs.project_name
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_doc_prompt_content() {
        let specs = ProjectSpecs {
            project_name: "acme".into(),
            ..Default::default()
        };
        let prompt = build_context_doc_prompt(&specs);
        assert!(prompt.contains("comprehensive CLAUDE.md file"));
        assert!(prompt.contains("## Project Details"));
        assert!(prompt.contains("### 8. Rules"));
        assert!(prompt.contains("Start with `# acme` as the title."));
    }
}
