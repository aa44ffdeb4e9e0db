/// Build the prompt that extracts structured [`ProjectSpecs`] from a
/// free-text project description. The model must answer with bare JSON
/// matching the schema embedded below.
///
/// [`ProjectSpecs`]: viber_core::ProjectSpecs
pub fn build_extract_specs_prompt(free_text: &str) -> String {
    format!(
        "Extract structured project specifications from the following free-text description. \
         Return a JSON object matching this exact schema:\n\n\
         {{\n\
         \x20 \"projectName\": \"string — project name or slug\",\n\
         \x20 \"description\": \"string — clear one-paragraph description\",\n\
         \x20 \"framework\": \"string — e.g. 'Next.js 14 (App Router)', 'React + Vite'\",\n\
         \x20 \"language\": \"string — e.g. 'TypeScript', 'Python'\",\n\
         \x20 \"styling\": \"string — e.g. 'Tailwind CSS', 'CSS Modules'\",\n\
         \x20 \"database\": \"string — e.g. 'PostgreSQL', 'MongoDB', 'None'\",\n\
         \x20 \"orm\": \"string — e.g. 'Prisma', 'Drizzle', 'None'\",\n\
         \x20 \"auth\": \"string — e.g. 'NextAuth / Auth.js', 'None'\",\n\
         \x20 \"hosting\": \"string — e.g. 'Vercel', 'AWS', 'Undecided'\",\n\
         \x20 \"features\": [\"array of key feature strings\"],\n\
         \x20 \"architecture\": \"string — architectural notes or empty string\",\n\
         \x20 \"constraints\": \"string — constraints or empty string\",\n\
         \x20 \"aiUsage\": \"string — how they plan to use AI coding tools or empty string\",\n\
         \x20 \"goals\": \"string — project goals or empty string\"\n\
         }}\n\n\
         Rules:\n\
         - If a field isn't mentioned, make a reasonable inference based on context or use an empty string\n\
         - For features, extract distinct capabilities (not implementation details)\n\
         - Keep descriptions concise but complete\n\
         - Return ONLY valid JSON, no markdown formatting\n\n\
         ## User's Project Description:\n\n\
         {free_text}"
    )
}
