use viber_core::ProjectSpecs;

use crate::context::append_spec_details;

/// Build the instructions for the full scaffold package: all five
/// documentation and prompt files needed to build the project from scratch.
pub fn build_scaffold_prompt(specs: &ProjectSpecs) -> String {
    let mut prompt = String::from(
        "Generate a COMPLETE project scaffold package for the following project. \
         This includes ALL documentation and prompt files needed to build the project \
         from scratch using AI coding agents.\n\n",
    );
    append_spec_details(&mut prompt, specs);
    prompt.push_str(
        "\n## Generate These Files (in order):\n\n\
         ### File 1: CLAUDE.md\n\
         The project's AI context file. Include:\n\
         - Project overview, tech stack, structure, commands\n\
         - Architecture decisions, coding conventions, rules\n\
         - Current status section (starting from scaffold)\n\n\
         ### File 2: PROJECT_PLAN.md\n\
         A phased build plan with:\n\
         - Phase-by-phase breakdown (4-8 phases)\n\
         - Dependencies between phases\n\
         - Estimated complexity per phase (S/M/L)\n\
         - Success criteria for the whole project\n\n\
         ### File 3: PROMPTS.md\n\
         All phase prompts in a single file. Each prompt should be:\n\
         - Self-contained (can be copy-pasted directly to an AI agent)\n\
         - Reference the CLAUDE.md for context\n\
         - Include specific file paths, tasks, and verification steps\n\n\
         ### File 4: CHECKLIST.md\n\
         A master checklist covering:\n\
         - Pre-development setup tasks\n\
         - Per-phase completion checks\n\
         - Pre-launch checklist (testing, security, performance, accessibility)\n\
         - Deployment checklist\n\n\
         ### File 5: RULES.md\n\
         Project-specific rules for AI agents:\n\
         - DO rules (patterns to always follow)\n\
         - DON'T rules (anti-patterns to avoid)\n\
         - Stack-specific gotchas and best practices\n\
         - Common mistakes for this tech stack\n\n\
         ## Output Format\n\
         Separate each file with the marker format:\n\
         ---FILE: CLAUDE.md---\n\
         [content]\n\
         ---FILE: PROJECT_PLAN.md---\n\
         [content]\n\
         ...and so on.\n\n\
         End with ---END---\n\n\
         Make every file production-quality — specific, actionable, and tailored \
         to this exact project. No generic placeholders.",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaffold_prompt_names_all_five_files() {
        let prompt = build_scaffold_prompt(&ProjectSpecs::default());
        for file in [
            "CLAUDE.md",
            "PROJECT_PLAN.md",
            "PROMPTS.md",
            "CHECKLIST.md",
            "RULES.md",
        ] {
            assert!(prompt.contains(file), "scaffold prompt missing {file}");
        }
        assert!(prompt.contains("End with ---END---"));
    }
}
