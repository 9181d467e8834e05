use super::types::ExplainSection;
use crate::scoring::AuditResult;
use crate::types::Category;

pub fn generate_explanation(result: &AuditResult) -> ExplainSection {
    let summary = if result.global >= 90 {
        "This profile inspires strong technical confidence: clear bio, professional presence and well documented repositories."
    } else if result.global >= 70 {
        "A solid profile with good signals. More detail on the main projects (fuller READMEs) would make the work easier to assess."
    } else if result.global >= 50 {
        "There is potential, but the profile looks incomplete. Missing information and documentation raise doubts about seniority."
    } else {
        "The profile needs urgent attention: basic contact details and project context are missing, and it can read as abandoned."
    };

    let tip = if result.category(Category::Profile) < 50 {
        Some("Improve your bio and photo to make a better first impression.".to_string())
    } else if result.category(Category::Repository) < 50 {
        Some("Your repositories need better READMEs to showcase your work.".to_string())
    } else {
        None
    };

    ExplainSection {
        summary: summary.to_string(),
        tip,
    }
}
