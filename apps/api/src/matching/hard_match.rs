//! Hard-Match Scorer: required-skill coverage of a resume.

/// Score returned when a job lists no required skills.
pub const EMPTY_REQUIREMENTS_SCORE: u32 = 100;

/// Percentage (0..=100) of `required_skills` covered by `resume_skills`.
///
/// A required skill counts as covered when, ignoring case, it contains a resume
/// skill or a resume skill contains it. Rounds half away from zero.
pub fn hard_match<R, Q>(resume_skills: &[R], required_skills: &[Q]) -> u32
where
    R: AsRef<str>,
    Q: AsRef<str>,
{
    if required_skills.is_empty() {
        return EMPTY_REQUIREMENTS_SCORE;
    }

    let resume_lower: Vec<String> = resume_skills
        .iter()
        .map(|s| s.as_ref().to_lowercase())
        .collect();

    let matched = required_skills
        .iter()
        .filter(|required| {
            let required = required.as_ref().to_lowercase();
            resume_lower
                .iter()
                .any(|skill| skill.contains(&required) || required.contains(skill.as_str()))
        })
        .count();

    percent(matched, required_skills.len())
}

pub(crate) fn percent(part: usize, whole: usize) -> u32 {
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: &[&str] = &[];

    #[test]
    fn test_empty_requirements_is_full_coverage() {
        assert_eq!(hard_match(&["Rust"], NONE), 100);
        assert_eq!(hard_match(NONE, NONE), 100);
    }

    #[test]
    fn test_no_resume_skills_is_zero() {
        assert_eq!(hard_match(NONE, &["React", "SQL"]), 0);
    }

    #[test]
    fn test_full_stack_scenario_scores_80() {
        let resume = ["JavaScript", "Java", "React", "Node.js", "SQL", "HTML", "CSS"];
        let required = ["React", "Node.js", "JavaScript", "SQL", "REST APIs"];
        assert_eq!(hard_match(&resume, &required), 80);
    }

    #[test]
    fn test_match_is_bidirectional_substring() {
        // required contains resume skill
        assert_eq!(hard_match(&["SQL"], &["PostgreSQL"]), 100);
        // resume skill contains required
        assert_eq!(hard_match(&["PostgreSQL"], &["sql"]), 100);
    }

    #[test]
    fn test_rounding_of_thirds() {
        assert_eq!(hard_match(&["Python"], &["Python", "Docker", "AWS"]), 33);
        assert_eq!(hard_match(&["Python", "Docker"], &["Python", "Docker", "AWS"]), 67);
    }

    #[test]
    fn test_rounds_half_up() {
        // 1/8 = 12.5 → 13
        let required = ["Python", "Docker", "AWS", "Git", "Linux", "Bash", "Redis", "Flask"];
        assert_eq!(hard_match(&["Python"], &required), 13);
    }

    #[test]
    fn test_percent_helper() {
        assert_eq!(percent(4, 5), 80);
        assert_eq!(percent(0, 3), 0);
        assert_eq!(percent(3, 3), 100);
    }
}
