//! Aptitude quiz: the question bank and the keyword scorer used when no
//! language model is available.

use crate::domain::model::{CourseRecommendation, QuizAnswers, QuizQuestion, RecommendationSet};
use serde::Serialize;

pub const RECOMMENDATION_COUNT: usize = 3;
const BASE_CONFIDENCE: u32 = 55;
const CONFIDENCE_PER_POINT: u32 = 8;
const MAX_CONFIDENCE: u32 = 95;

pub static QUIZ_QUESTIONS: [QuizQuestion; 8] = [
    QuizQuestion {
        id: "1",
        question: "Which type of activities do you find most engaging?",
        options: [
            "Solving complex mathematical problems",
            "Creative writing and storytelling",
            "Conducting scientific experiments",
            "Analyzing business trends and markets",
        ],
        category: "interests",
    },
    QuizQuestion {
        id: "2",
        question: "What motivates you most in your studies?",
        options: [
            "Understanding how things work technically",
            "Making a positive impact on society",
            "Building and creating innovative solutions",
            "Working with people and teams",
        ],
        category: "motivation",
    },
    QuizQuestion {
        id: "3",
        question: "In a group project, you naturally tend to:",
        options: [
            "Take charge and organize the team",
            "Research and analyze the data",
            "Come up with creative ideas",
            "Ensure everyone's opinions are heard",
        ],
        category: "personality",
    },
    QuizQuestion {
        id: "4",
        question: "Which career environment appeals to you most?",
        options: [
            "High-tech laboratory or research facility",
            "Dynamic business office with teams",
            "Creative studio or workshop",
            "Healthcare or social service setting",
        ],
        category: "environment",
    },
    QuizQuestion {
        id: "5",
        question: "Your ideal work would involve:",
        options: [
            "Developing software or technology",
            "Managing projects and people",
            "Researching and discovering new knowledge",
            "Helping others solve their problems",
        ],
        category: "work_type",
    },
    QuizQuestion {
        id: "6",
        question: "Which subject area has always interested you most?",
        options: [
            "Mathematics and Physics",
            "Business and Economics",
            "Arts and Literature",
            "Biology and Chemistry",
        ],
        category: "subjects",
    },
    QuizQuestion {
        id: "7",
        question: "When facing a challenge, you prefer to:",
        options: [
            "Analyze it systematically step by step",
            "Brainstorm multiple creative solutions",
            "Seek advice from experts or mentors",
            "Take immediate action and learn as you go",
        ],
        category: "problem_solving",
    },
    QuizQuestion {
        id: "8",
        question: "Your long-term career goal is to:",
        options: [
            "Become an expert specialist in your field",
            "Lead and manage a successful organization",
            "Make groundbreaking discoveries or innovations",
            "Make a meaningful difference in people's lives",
        ],
        category: "goals",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseCategory {
    Technology,
    Business,
    Science,
    Arts,
    Healthcare,
    SocialService,
}

impl CourseCategory {
    pub const ALL: [CourseCategory; 6] = [
        CourseCategory::Technology,
        CourseCategory::Business,
        CourseCategory::Science,
        CourseCategory::Arts,
        CourseCategory::Healthcare,
        CourseCategory::SocialService,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CourseCategory::Technology => "Engineering & Technology",
            CourseCategory::Business => "Business & Management",
            CourseCategory::Science => "Sciences",
            CourseCategory::Arts => "Arts & Design",
            CourseCategory::Healthcare => "Medical & Health Sciences",
            CourseCategory::SocialService => "Social Sciences & Psychology",
        }
    }

    /// Lower-case fragments and the points each one is worth.
    fn keywords(&self) -> &'static [(&'static str, u32)] {
        match self {
            CourseCategory::Technology => &[
                ("software", 3),
                ("computer", 3),
                ("coding", 3),
                ("technical", 2),
                ("technology", 2),
                ("mathematical", 2),
                ("physics", 1),
                ("building", 1),
                ("innovative", 1),
                ("systematically", 1),
            ],
            CourseCategory::Business => &[
                ("business", 3),
                ("market", 2),
                ("economics", 2),
                ("manag", 2),
                ("take charge", 2),
                ("organiz", 2),
                ("entrepreneur", 2),
                ("lead", 1),
                ("teams", 1),
                ("immediate action", 1),
            ],
            CourseCategory::Science => &[
                ("scientific", 3),
                ("experiment", 2),
                ("research", 2),
                ("laboratory", 2),
                ("discover", 2),
                ("how things work", 1),
                ("analyze", 1),
                ("expert", 1),
                ("physics", 1),
                ("chemistry", 1),
            ],
            CourseCategory::Arts => &[
                ("creative", 3),
                ("writing", 2),
                ("storytelling", 2),
                ("literature", 2),
                ("arts", 2),
                ("studio", 2),
                ("design", 2),
                ("brainstorm", 1),
                ("ideas", 1),
            ],
            CourseCategory::Healthcare => &[
                ("healthcare", 3),
                ("medic", 3),
                ("doctor", 3),
                ("patient", 2),
                ("biology", 2),
                ("chemistry", 1),
                ("helping", 1),
            ],
            CourseCategory::SocialService => &[
                ("society", 2),
                ("social", 2),
                ("people", 2),
                ("helping others", 2),
                ("meaningful difference", 2),
                ("opinions are heard", 2),
                ("counsel", 2),
                ("advice", 1),
            ],
        }
    }

    fn profile(&self) -> CourseProfile {
        match self {
            CourseCategory::Technology => CourseProfile {
                course: "Bachelor of Technology in Computer Science",
                reasoning: "You enjoy technical problem solving and building things, which suits computing and engineering.",
                career_paths: &["Software Developer", "Data Scientist", "Systems Engineer"],
                prerequisites: &["Mathematics", "Physics"],
                duration: "4 years",
            },
            CourseCategory::Business => CourseProfile {
                course: "Bachelor of Business Administration",
                reasoning: "Your leadership tendencies and interest in markets and teams point towards business and management.",
                career_paths: &["Business Manager", "Entrepreneur", "Marketing Manager"],
                prerequisites: &["Economics", "Mathematics"],
                duration: "3 years",
            },
            CourseCategory::Science => CourseProfile {
                course: "Bachelor of Science (Physics, Chemistry or Mathematics)",
                reasoning: "Your curiosity about how things work and your research mindset fit the pure sciences.",
                career_paths: &["Research Scientist", "Lab Analyst", "Lecturer"],
                prerequisites: &["Physics", "Chemistry", "Mathematics"],
                duration: "3-4 years",
            },
            CourseCategory::Arts => CourseProfile {
                course: "Bachelor of Design / Fine Arts",
                reasoning: "You are drawn to creative expression and original ideas, which design and the arts reward.",
                career_paths: &["Graphic Designer", "Content Writer", "UX Designer"],
                prerequisites: &["Portfolio", "English"],
                duration: "3-4 years",
            },
            CourseCategory::Healthcare => CourseProfile {
                course: "Bachelor of Medicine and Bachelor of Surgery (MBBS)",
                reasoning: "Your interest in biology and in caring for people matches medicine and allied health sciences.",
                career_paths: &["Doctor", "Pharmacist", "Nurse Practitioner"],
                prerequisites: &["Biology", "Chemistry", "NEET"],
                duration: "5.5 years",
            },
            CourseCategory::SocialService => CourseProfile {
                course: "Bachelor of Arts in Psychology",
                reasoning: "Your interest in understanding and helping people indicates psychology and the social sciences.",
                career_paths: &["Psychologist", "Counselor", "HR Specialist"],
                prerequisites: &["Psychology", "Sociology"],
                duration: "3 years",
            },
        }
    }
}

struct CourseProfile {
    course: &'static str,
    reasoning: &'static str,
    career_paths: &'static [&'static str],
    prerequisites: &'static [&'static str],
    duration: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryScore {
    pub category: CourseCategory,
    pub score: u32,
    pub matched: Vec<&'static str>,
}

/// Scores every category against the answers, in declaration order.
pub fn score_answers(answers: &QuizAnswers) -> Vec<CategoryScore> {
    let lowered: Vec<String> = answers.values().map(|a| a.to_lowercase()).collect();

    CourseCategory::ALL
        .iter()
        .map(|category| {
            let mut score = 0;
            let mut matched = Vec::new();
            for (keyword, weight) in category.keywords() {
                let hits = lowered.iter().filter(|a| a.contains(keyword)).count() as u32;
                if hits > 0 {
                    score += weight * hits;
                    matched.push(*keyword);
                }
            }
            CategoryScore {
                category: *category,
                score,
                matched,
            }
        })
        .collect()
}

pub fn confidence_for(score: u32) -> u8 {
    (BASE_CONFIDENCE + CONFIDENCE_PER_POINT * score).min(MAX_CONFIDENCE) as u8
}

/// Top categories by score; ties keep declaration order.
pub fn recommend(answers: &QuizAnswers) -> RecommendationSet {
    let mut scores = score_answers(answers);
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores.truncate(RECOMMENDATION_COUNT);

    let recommendations = scores
        .iter()
        .map(|scored| {
            let profile = scored.category.profile();
            let reasoning = if scored.matched.is_empty() {
                profile.reasoning.to_string()
            } else {
                format!(
                    "{} Your answers mentioned: {}.",
                    profile.reasoning,
                    scored.matched.join(", ")
                )
            };
            CourseRecommendation {
                course: profile.course.to_string(),
                confidence: confidence_for(scored.score),
                reasoning,
                career_paths: profile.career_paths.iter().map(|s| s.to_string()).collect(),
                prerequisites: profile.prerequisites.iter().map(|s| s.to_string()).collect(),
                duration: profile.duration.to_string(),
            }
        })
        .collect();

    RecommendationSet {
        recommendations,
        analysis: analysis_for(&scores),
    }
}

fn analysis_for(top: &[CategoryScore]) -> String {
    if top.iter().all(|s| s.score == 0) {
        return "Your answers did not strongly favour one field, so these are broad starting points worth exploring.".to_string();
    }

    let labels: Vec<&str> = top
        .iter()
        .filter(|s| s.score > 0)
        .map(|s| s.category.label())
        .collect();
    format!(
        "Your responses lean most strongly towards {}. Explore the suggested courses and talk to a mentor before deciding.",
        labels.join(", then ")
    )
}
