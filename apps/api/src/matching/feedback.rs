//! Feedback Synthesizer: turns a relevance score and missing skills into a
//! recommendation string.

pub const EXCELLENT_BAND: u32 = 80;
pub const GOOD_BAND: u32 = 60;
pub const MODERATE_BAND: u32 = 40;

/// How many missing skills each band names.
pub const GOOD_GAP_LIMIT: usize = 3;
pub const MODERATE_GAP_LIMIT: usize = 5;
pub const LOW_GAP_LIMIT: usize = 3;

/// Builds the human-readable recommendation for a scored pair.
pub fn synthesize(relevance_score: u32, missing_skills: &[String]) -> String {
    let score = relevance_score;

    if score >= EXCELLENT_BAND {
        format!(
            "Excellent match ({score}/100). Your resume lines up closely with the job requirements. \
             Highlight the projects that best demonstrate that expertise."
        )
    } else if score >= GOOD_BAND {
        format!(
            "Good match ({score}/100) with room for improvement.{} \
             Relevant projects or certifications would strengthen the application.",
            gap_clause("Focus on developing", missing_skills, GOOD_GAP_LIMIT)
        )
    } else if score >= MODERATE_BAND {
        format!(
            "Moderate match ({score}/100). There is a significant skills gap.{} \
             Courses or hands-on projects in these areas would help.",
            gap_clause("Recommended focus areas", missing_skills, MODERATE_GAP_LIMIT)
        )
    } else {
        format!(
            "Low match ({score}/100). Major upskilling is needed.{} \
             Consider comprehensive training or a role closer to your current profile.",
            gap_clause("Priority areas", missing_skills, LOW_GAP_LIMIT)
        )
    }
}

/// " <label>: a, b, c." for the first `limit` skills, or "" when none are missing.
fn gap_clause(label: &str, missing_skills: &[String], limit: usize) -> String {
    if missing_skills.is_empty() {
        return String::new();
    }
    let named: Vec<&str> = missing_skills.iter().take(limit).map(String::as_str).collect();
    format!(" {label}: {}.", named.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gaps(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Skill{i}")).collect()
    }

    #[test]
    fn test_excellent_band_mentions_no_gaps() {
        let text = synthesize(80, &gaps(4));
        assert!(text.starts_with("Excellent match"));
        assert!(!text.contains("Skill1"));
    }

    #[test]
    fn test_good_band_names_first_three() {
        let text = synthesize(79, &gaps(6));
        assert!(text.starts_with("Good match (79/100)"));
        assert!(text.contains("Skill1, Skill2, Skill3."));
        assert!(!text.contains("Skill4"));

        assert!(synthesize(60, &gaps(1)).starts_with("Good match"));
    }

    #[test]
    fn test_moderate_band_names_first_five() {
        let text = synthesize(59, &gaps(7));
        assert!(text.starts_with("Moderate match"));
        assert!(text.contains("Skill1, Skill2, Skill3, Skill4, Skill5."));
        assert!(!text.contains("Skill6"));

        assert!(synthesize(40, &gaps(1)).starts_with("Moderate match"));
    }

    #[test]
    fn test_low_band_names_first_three() {
        let text = synthesize(39, &gaps(5));
        assert!(text.starts_with("Low match (39/100)"));
        assert!(text.contains("Priority areas: Skill1, Skill2, Skill3."));
        assert!(!text.contains("Skill4"));
    }

    #[test]
    fn test_no_gaps_omits_the_list() {
        let text = synthesize(65, &[]);
        assert!(!text.contains("Focus on developing"));
        assert!(!text.contains(": ."));
    }
}
