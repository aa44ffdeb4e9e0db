use viber_core::ProjectSpecs;

/// Render the shared "## Project Details" block listing every spec field.
///
/// Every generation prompt opens with this so the model never has to infer
/// the stack.
pub fn append_spec_details(prompt: &mut String, specs: &ProjectSpecs) {
    prompt.push_str("## Project Details\n");
    prompt.push_str(&format!("- **Name**: {}\n", specs.project_name));
    prompt.push_str(&format!("- **Description**: {}\n", specs.description));
    prompt.push_str(&format!("- **Framework**: {}\n", specs.framework));
    prompt.push_str(&format!("- **Language**: {}\n", specs.language));
    prompt.push_str(&format!("- **Styling**: {}\n", specs.styling));
    prompt.push_str(&format!("- **Database**: {}\n", specs.database));
    prompt.push_str(&format!("- **ORM**: {}\n", specs.orm));
    prompt.push_str(&format!("- **Auth**: {}\n", specs.auth));
    prompt.push_str(&format!("- **Hosting**: {}\n", specs.hosting));
    prompt.push_str(&format!("- **Key Features**: {}\n", specs.features.join(", ")));
    prompt.push_str(&format!("- **Architecture**: {}\n", specs.architecture));
    prompt.push_str(&format!("- **Constraints**: {}\n", specs.constraints));
    prompt.push_str(&format!("- **AI Usage**: {}\n", specs.ai_usage));
    prompt.push_str(&format!("- **Goals**: {}\n", specs.goals));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_block_lists_all_fields() {
        let specs = ProjectSpecs {
            project_name: "demo".into(),
            description: "a demo".into(),
            framework: "Rails".into(),
            features: vec!["Login".into(), "Billing".into()],
            ..Default::default()
        };
        let mut out = String::new();
        append_spec_details(&mut out, &specs);
        assert!(out.contains("## Project Details"));
        assert!(out.contains("- **Name**: demo"));
        assert!(out.contains("- **Framework**: Rails"));
        assert!(out.contains("- **Key Features**: Login, Billing"));
        assert!(out.contains("- **Goals**: "));
    }

    #[test]
    fn empty_features_render_empty() {
        let mut out = String::new();
        append_spec_details(&mut out, &ProjectSpecs::default());
        assert!(out.contains("- **Key Features**: \n"));
    }
}
