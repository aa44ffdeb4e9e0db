use viber_core::ProjectSpecs;

use crate::context::append_spec_details;

/// Build the instructions for generating the phased build prompts: one
/// self-contained prompt per build phase, each emitted as its own file.
pub fn build_phase_prompts_prompt(specs: &ProjectSpecs) -> String {
    let mut prompt = String::from(
        "Generate a set of phased build prompts for the following project. \
         Each prompt should be a self-contained instruction that an AI coding agent \
         can execute in a single session.\n\n",
    );
    append_spec_details(&mut prompt, specs);
    prompt.push_str(
        "\n## Prompt Generation Rules\n\n\
         1. **Phase 0 is always Scaffold** — project init, install deps, folder structure, basic config\n\
         2. **Phase 1 is always Data Model** — schema, migrations, seed data\n\
         3. **Remaining phases** cover features in dependency order\n\
         4. **Final phase** is always Polish — error handling, loading states, responsive design, deployment prep\n\n\
         For EACH phase, generate a prompt with this structure:\n\n\
         ```\n\
         # Phase N: [Title]\n\n\
         ## Context\n\
         [What has been built so far — reference previous phases]\n\n\
         ## Objective\n\
         [One clear sentence: what this phase delivers]\n\n\
         ## Tasks\n\
         [Numbered list of specific implementation tasks]\n\
         [Include exact file paths to create or modify]\n\n\
         ## Technical Details\n\
         [Stack-specific implementation guidance]\n\
         [Patterns to follow, libraries to use]\n\n\
         ## Verification\n\
         - [ ] [Specific check 1]\n\
         - [ ] [Specific check 2]\n\
         - [ ] [Build passes with no errors]\n\
         ```\n\n\
         Generate 4-8 phases depending on project complexity. Each prompt should be \
         200-400 words — detailed enough to execute without clarification, concise \
         enough to stay focused.\n\n\
         Output each phase prompt as a separate file using the separator format:\n\
         ---FILE: phase-0-scaffold.md---\n\
         [content]\n\
         ---FILE: phase-1-data-model.md---\n\
         [content]\n\
         ...and so on.\n\n\
         End with ---END---",
    );
    prompt
}
