pub mod context;
pub mod context_doc;
pub mod extract;
pub mod phases;
pub mod scaffold;
pub mod system;

pub use system::SYSTEM_PROMPT;
use viber_core::{OutputMode, ProjectSpecs};

/// Token budget for a generation request, per output mode.
pub fn max_tokens_for(mode: OutputMode) -> u32 {
    match mode {
        OutputMode::ClaudeMd => 8192,
        OutputMode::FullScaffold => 16384,
    }
}

/// Token budget for a spec-extraction request.
pub const EXTRACT_MAX_TOKENS: u32 = 2048;

/// Assemble the full user prompt for a generation in the given mode.
///
/// The `ClaudeMd` mode asks for two files (the context document and the
/// phased build prompts) in one response; `FullScaffold` asks for the
/// five-file scaffold package. Both rely on the separator convention
/// declared in [`SYSTEM_PROMPT`].
pub fn assemble_generation_prompt(specs: &ProjectSpecs, mode: OutputMode) -> String {
    match mode {
        OutputMode::ClaudeMd => format!(
            "Generate two files for this project:\n\n\
             1. A CLAUDE.md file — the project's AI context document\n\
             2. A set of phased build prompts — self-contained prompts for each build phase\n\n\
             Use the separator format: ---FILE: filename.md--- between files.\n\
             End with ---END---\n\n\
             ## CLAUDE.md Instructions:\n{}\n\n\
             ## Phase Prompts Instructions:\n{}",
            context_doc::build_context_doc_prompt(specs),
            phases::build_phase_prompts_prompt(specs),
        ),
        OutputMode::FullScaffold => scaffold::build_scaffold_prompt(specs),
    }
}
