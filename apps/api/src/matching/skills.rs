//! Skill Extractor: recognizes controlled-vocabulary skills in free text.
//!
//! Matching is case-insensitive substring containment with no tokenization or
//! word boundaries, so "Java" is found inside "JavaScript".

/// Recognized skills, in declaration order. Extraction output follows this order.
pub const SKILL_VOCABULARY: &[&str] = &[
    "JavaScript",
    "Python",
    "Java",
    "React",
    "Node.js",
    "SQL",
    "MongoDB",
    "AWS",
    "Docker",
    "Git",
    "HTML",
    "CSS",
    "TypeScript",
    "Angular",
    "Vue.js",
    "Express.js",
    "Django",
    "Flask",
    "Spring Boot",
    "MySQL",
    "PostgreSQL",
    "Redis",
    "Kubernetes",
    "Jenkins",
    "Azure",
    "GCP",
    "Machine Learning",
    "Data Analysis",
    "REST APIs",
    "GraphQL",
    "Microservices",
    "Agile",
    "Scrum",
    "TDD",
    "CI/CD",
    "DevOps",
    "Linux",
    "Bash",
    "PowerShell",
];

/// Returns every vocabulary skill that occurs in `text`, in vocabulary order.
/// Empty text yields an empty list.
pub fn extract_skills(text: &str) -> Vec<&'static str> {
    let haystack = text.to_lowercase();
    SKILL_VOCABULARY
        .iter()
        .copied()
        .filter(|skill| haystack.contains(&skill.to_lowercase()))
        .collect()
}
