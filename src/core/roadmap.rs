//! Career roadmaps: prompt construction, reply parsing and the built-in
//! roadmaps served when no model answers.

use serde_json::{json, Value};

pub const ROADMAP_SYSTEM_PROMPT: &str = "You are an expert career counselor creating detailed, personalized career roadmaps. Provide comprehensive, actionable guidance with specific timelines, skills, resources, and milestones. Format your response as a structured JSON object with the following sections: timeline, skills, resources, certifications, networking, salary_progression, challenges, and tips.";

pub fn roadmap_prompt(career_title: &str, category: &str, user_profile: Option<&Value>) -> String {
    let profile = match user_profile {
        Some(profile) if !profile.is_null() => profile.to_string(),
        _ => "\"Not provided\"".to_string(),
    };

    format!(
        r#"Create a detailed career roadmap for "{career_title}" in the {category} field. Include:
1. Month-by-month timeline for first 2 years
2. Key skills to develop at each stage
3. Specific resources (courses, books, websites)
4. Important certifications and when to get them
5. Networking strategies
6. Expected salary progression
7. Common challenges and how to overcome them
8. Pro tips from industry experts

User Profile: {profile}

Make it practical, specific, and actionable for Indian students/professionals."#
    )
}

/// Strips a surrounding markdown code fence, if any.
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Structured JSON when the model produced an object, otherwise the raw text
/// wrapped so callers always receive an object.
pub fn parse_roadmap_reply(content: &str) -> Value {
    match serde_json::from_str::<Value>(strip_code_fence(content)) {
        Ok(value) if value.is_object() => value,
        _ => {
            tracing::debug!("Roadmap reply is not a JSON object, returning it as text");
            json!({ "content": content, "generated_by": "AI" })
        }
    }
}

pub fn fallback_roadmap(career_title: &str) -> Value {
    match career_title {
        "Software Engineer" => json!({
            "timeline": {
                "Month 1-3": "Learn programming fundamentals (Python/Java), practice data structures",
                "Month 4-6": "Build 2-3 projects, learn version control (Git), basic web development",
                "Month 7-9": "Choose specialization (web/mobile/AI), advanced algorithms",
                "Month 10-12": "Internship preparation, system design basics, portfolio development",
                "Month 13-18": "Internship experience, contribute to open source",
                "Month 19-24": "Job applications, interview preparation, networking"
            },
            "skills": [
                "Programming Languages (Python, Java, JavaScript)",
                "Data Structures & Algorithms",
                "System Design",
                "Database Management",
                "Web Development",
                "Version Control (Git)",
                "Cloud Computing (AWS/Azure)",
                "DevOps Basics"
            ],
            "resources": [
                "LeetCode for coding practice",
                "GeeksforGeeks for concepts",
                "Coursera Programming Courses",
                "YouTube channels: CodeWithHarry, Apna College",
                "Books: Clean Code, System Design Interview"
            ],
            "certifications": [
                "AWS Cloud Practitioner (Month 12)",
                "Oracle Java Certification (Month 8)",
                "Google Cloud Associate (Month 18)"
            ],
            "networking": [
                "Join tech communities (Reddit, Stack Overflow)",
                "Attend local meetups and hackathons",
                "Connect with seniors on LinkedIn",
                "Participate in coding competitions"
            ],
            "salary_progression": {
                "Entry Level (0-2 years)": "₹3-8 LPA",
                "Mid Level (2-5 years)": "₹8-18 LPA",
                "Senior Level (5+ years)": "₹18-35 LPA"
            },
            "challenges": [
                "Keeping up with rapidly changing technology",
                "Imposter syndrome in early career",
                "Interview preparation stress"
            ],
            "tips": [
                "Focus on problem-solving, not just syntax",
                "Build projects that solve real problems",
                "Contribute to open source regularly",
                "Practice system design interviews"
            ]
        }),
        "Doctor (MBBS)" => json!({
            "timeline": {
                "Month 1-6": "NEET preparation intensification, biology and chemistry focus",
                "Month 7-12": "NEET exam, medical college admission process",
                "Month 13-18": "First year MBBS - anatomy, physiology basics",
                "Month 19-24": "Continue pre-clinical subjects, develop study habits"
            },
            "skills": [
                "Medical Knowledge Base",
                "Clinical Examination",
                "Patient Communication",
                "Emergency Response",
                "Medical Ethics",
                "Research Methodology"
            ],
            "resources": [
                "Harrison's Principles of Internal Medicine",
                "Gray's Anatomy",
                "NEET preparation materials",
                "Medical journals and publications",
                "Clinical rotation opportunities"
            ],
            "certifications": [
                "NEET UG (For admission)",
                "Medical Council licensing",
                "Specialty board certifications"
            ],
            "networking": [
                "Medical conferences and seminars",
                "Healthcare professional associations",
                "Hospital volunteer opportunities",
                "Medical college alumni networks"
            ],
            "salary_progression": {
                "Intern": "₹15,000-30,000/month",
                "Junior Doctor": "₹3-6 LPA",
                "Specialist": "₹8-25 LPA",
                "Senior Consultant": "₹25-50+ LPA"
            },
            "challenges": [
                "Long study hours and academic pressure",
                "Emotional stress of patient care",
                "High competition for specializations"
            ],
            "tips": [
                "Develop strong foundational knowledge",
                "Practice clinical skills regularly",
                "Maintain work-life balance",
                "Stay updated with medical advances"
            ]
        }),
        _ => json!({
            "timeline": {
                "Month 1-6": "Foundation building and skill development",
                "Month 7-12": "Practical experience and portfolio building",
                "Month 13-18": "Advanced learning and specialization",
                "Month 19-24": "Professional networking and career preparation"
            },
            "skills": ["Industry-specific technical skills", "Communication", "Problem-solving", "Leadership"],
            "resources": ["Online courses", "Industry publications", "Professional networks", "Mentorship programs"],
            "certifications": ["Industry-standard certifications", "Professional licenses"],
            "networking": ["Professional associations", "Industry events", "Online communities"],
            "salary_progression": {
                "Entry Level": "₹3-8 LPA",
                "Mid Level": "₹8-18 LPA",
                "Senior Level": "₹18+ LPA"
            },
            "challenges": ["Market competition", "Skill gap", "Career transitions"],
            "tips": ["Continuous learning", "Build strong network", "Focus on practical skills"]
        }),
    }
}
