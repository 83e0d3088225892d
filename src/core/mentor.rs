//! Mentor topics: an ordered table of intents, the keywords that select
//! them and the canned answer each one gives.

use serde::{Deserialize, Serialize};

pub const MENTOR_SYSTEM_PROMPT: &str = "You are a friendly AI mentor for Indian students. Provide detailed, practical, and motivating advice.";

/// Sent when the model answers with no content.
pub const EMPTY_MODEL_REPLY: &str =
    "I'm here, but didn't get a proper response. Try rephrasing your question.";

pub const GREETING_REPLY: &str = "🌟 **Hello! I'm your AI Mentor & Career Guide** 🌟

I'm here to provide **personalized support** for your education, career, and life journey.

📚 Academics → Study timetables, resources, exam hacks
🎯 Career → Streams, colleges, scholarships, jobs
🧠 Mindset → Motivation, stress management, confidence
💼 Skills → AI, coding, design, business, communication

✅ Tell me about yourself (school/college/job, your interests), and I'll create a **step-by-step plan** just for you 🚀";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Career,
    ExamPreparation,
    Stress,
    CollegeSelection,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntentMatch {
    pub intent: Intent,
    pub confidence: f32,
}

pub struct Topic {
    pub intent: Intent,
    pub keywords: &'static [&'static str],
    pub reply: &'static str,
}

/// Evaluated top to bottom; the first topic with a keyword hit wins.
pub static TOPICS: [Topic; 5] = [
    Topic {
        intent: Intent::Career,
        keywords: &["career", "job", "future", "what should i do"],
        reply: "🎯 **Career Guidance - Let's Find Your Perfect Path!**

1. **Know yourself**: list the subjects you enjoy, the activities that make you lose track of time, and your strengths. Take the aptitude quiz to get course suggestions.
2. **Explore options**: look at the career roadmaps for fields that match, and read about what a normal working day looks like in each.
3. **Check the route**: note the entrance exams, degrees and skills each career needs, and how long it takes.
4. **Talk to people**: join a mentorship webinar or speak to seniors already working in the field.
5. **Start small**: pick one online course or project this month to test your interest.

Tell me your favourite subjects and I'll suggest specific careers to explore.",
    },
    Topic {
        intent: Intent::ExamPreparation,
        keywords: &["exam", "jee", "neet", "board", "competitive", "preparation", "study"],
        reply: "📚 **Exam Success Masterplan - Your Complete Strategy!**

1. **Know the syllabus**: break it into chapters and mark each as strong, average or weak.
2. **Plan your time**: use the smart timetable to give more hours to high-priority subjects, in focused sessions with short breaks.
3. **Practice actively**: solve previous years' papers and take a full mock test every week.
4. **Revise on a cycle**: revisit each chapter after 1 day, 1 week and 1 month.
5. **Analyse mistakes**: keep an error notebook and review it before every mock.
6. **Look after yourself**: 7-8 hours of sleep, regular meals and daily movement improve recall.

Which exam are you preparing for, and how many months do you have left?",
    },
    Topic {
        intent: Intent::Stress,
        keywords: &["stress", "anxiety", "pressure", "worried"],
        reply: "🧘 **Stress Management Plan**

It's completely normal to feel this way, and you're not alone.

1. **Breathe**: try 4-7-8 breathing (inhale 4s, hold 7s, exhale 8s) for two minutes.
2. **Break it down**: split big tasks into 25-minute blocks and tick them off.
3. **Move and rest**: a short walk and a regular sleep schedule lower anxiety quickly.
4. **Talk it out**: share what you're feeling with a friend, parent or teacher.
5. **Check in**: take the stress check to see where you are and get tailored tips.

If you ever feel overwhelmed, please call the National Mental Health Helpline at 1800-599-0019 (24/7).",
    },
    Topic {
        intent: Intent::CollegeSelection,
        keywords: &["college", "course", "stream", "subject"],
        reply: "🎓 **Course & College Decision Guide**

1. **Start from interests**: choose a stream or course that matches what you enjoy and are good at, not only what is popular.
2. **Shortlist colleges**: compare accreditation, faculty, placements, fees and location in the college finder.
3. **Check eligibility**: note the entrance exams, cut-offs and application deadlines for each option.
4. **Plan finances**: look up scholarships and government schemes you qualify for.
5. **Visit or connect**: attend open days or talk to current students before deciding.

Share your stream and target courses, and I'll help you build a shortlist.",
    },
    Topic {
        intent: Intent::Help,
        keywords: &["help", "confused", "don't know"],
        reply: "🌟 **Don't worry, I'm here for you!**

Feeling unsure is the first step to finding the right direction. Here's how we can start:

• Take the aptitude quiz to discover courses that fit you
• Build a study timetable that balances work and rest
• Explore career roadmaps, colleges and scholarships
• Check in on your stress levels

Tell me a little about where you are right now (class, stream, interests) and what's on your mind.",
    },
];

/// First matching topic and how strongly it matched.
pub fn classify(message: &str) -> Option<(IntentMatch, &'static Topic)> {
    let lowered = message.to_lowercase();

    TOPICS.iter().find_map(|topic| {
        let hits = topic
            .keywords
            .iter()
            .filter(|keyword| lowered.contains(*keyword))
            .count();
        (hits > 0).then(|| {
            (
                IntentMatch {
                    intent: topic.intent,
                    confidence: confidence_for_hits(hits),
                },
                topic,
            )
        })
    })
}

fn confidence_for_hits(hits: usize) -> f32 {
    (0.5 + 0.25 * (hits.saturating_sub(1)) as f32).min(1.0)
}
