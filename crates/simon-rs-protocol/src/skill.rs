/// Summary of a registered skill, as listed to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillSummary {
    /// Skill name.
    pub name: String,
    /// Short description of the skill.
    pub description: String,
}

/// Render summaries as a bullet list, one skill per line.
pub fn render_skill_summaries(summaries: &[SkillSummary]) -> String {
    summaries
        .iter()
        .map(|skill| {
            if skill.description.trim().is_empty() {
                format!("- {}", skill.name)
            } else {
                format!("- {}: {}", skill.name, skill.description.trim())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::{SkillSummary, render_skill_summaries};
    use pretty_assertions::assert_eq;

    fn summary(name: &str, description: &str) -> SkillSummary {
        SkillSummary {
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn renders_one_bullet_per_skill() {
        let rendered = render_skill_summaries(&[
            summary("weather", " Current weather "),
            summary("files", "  "),
        ]);
        assert_eq!(rendered, "- weather: Current weather\n- files");
    }

    #[test]
    fn no_skills_renders_nothing() {
        assert_eq!(render_skill_summaries(&[]), "");
    }
}
