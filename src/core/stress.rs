//! Self-reported stress check.

use crate::domain::model::StressContact;
use crate::utils::error::{CatalystError, Result};
use serde::Serialize;

pub const MAX_ANSWER: u8 = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressQuestion {
    pub id: u8,
    pub text: &'static str,
    /// Indexed by answer value, 0 to 4.
    pub options: [&'static str; 5],
}

pub static STRESS_QUESTIONS: [StressQuestion; 6] = [
    StressQuestion {
        id: 1,
        text: "How often do you feel overwhelmed by your studies?",
        options: ["Never", "Rarely", "Sometimes", "Often", "Always"],
    },
    StressQuestion {
        id: 2,
        text: "How well are you sleeping recently?",
        options: [
            "Very well (7-8 hours)",
            "Well (6-7 hours)",
            "Okay (5-6 hours)",
            "Poorly (4-5 hours)",
            "Very poorly (less than 4 hours)",
        ],
    },
    StressQuestion {
        id: 3,
        text: "How often do you worry about your future career?",
        options: ["Never", "Rarely", "Sometimes", "Often", "Constantly"],
    },
    StressQuestion {
        id: 4,
        text: "How do you feel about your academic performance?",
        options: [
            "Very satisfied",
            "Satisfied",
            "Neutral",
            "Dissatisfied",
            "Very dissatisfied",
        ],
    },
    StressQuestion {
        id: 5,
        text: "How often do you feel anxious or nervous?",
        options: ["Never", "Rarely", "Sometimes", "Often", "Daily"],
    },
    StressQuestion {
        id: 6,
        text: "How well can you concentrate on your studies?",
        options: [
            "Excellent focus",
            "Good focus",
            "Average focus",
            "Poor focus",
            "Cannot focus at all",
        ],
    },
];

pub static EMERGENCY_CONTACTS: [StressContact; 4] = [
    StressContact {
        name: "National Mental Health Helpline",
        number: "1800-599-0019",
        available: "24/7",
    },
    StressContact {
        name: "Student Helpline",
        number: "1075",
        available: "24/7",
    },
    StressContact {
        name: "Youth Helpline",
        number: "1098",
        available: "24/7",
    },
    StressContact {
        name: "Crisis Helpline",
        number: "9152987821",
        available: "24/7",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StressBand {
    Low,
    Mild,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl StressBand {
    pub fn from_level(level: f64) -> Self {
        if level <= 20.0 {
            StressBand::Low
        } else if level <= 40.0 {
            StressBand::Mild
        } else if level <= 60.0 {
            StressBand::Moderate
        } else if level <= 80.0 {
            StressBand::High
        } else {
            StressBand::VeryHigh
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StressBand::Low => "Low",
            StressBand::Mild => "Mild",
            StressBand::Moderate => "Moderate",
            StressBand::High => "High",
            StressBand::VeryHigh => "Very High",
        }
    }

    pub fn tips(&self) -> &'static [&'static str; 4] {
        match self {
            StressBand::Low => &[
                "Continue your current healthy habits",
                "Practice gratitude journaling",
                "Maintain regular exercise",
                "Keep a consistent sleep schedule",
            ],
            StressBand::Mild => &[
                "Try 5-minute breathing exercises",
                "Take short breaks during study sessions",
                "Practice mindfulness meditation",
                "Connect with friends and family",
            ],
            StressBand::Moderate => &[
                "Implement the Pomodoro Technique",
                "Try progressive muscle relaxation",
                "Consider talking to a counselor",
                "Join stress management workshops",
            ],
            StressBand::High => &[
                "Practice deep breathing exercises daily",
                "Consider professional counseling",
                "Reduce workload where possible",
                "Focus on self-care activities",
            ],
            StressBand::VeryHigh => &[
                "Seek immediate professional help",
                "Contact college counseling services",
                "Practice crisis breathing techniques",
                "Reach out to trusted friends/family",
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StressAssessment {
    pub total_score: u32,
    pub max_score: u32,
    /// Percentage of the maximum score, 0 to 100.
    pub level: f64,
    pub band: StressBand,
    pub tips: &'static [&'static str; 4],
    pub emergency_contacts: &'static [StressContact],
}

/// Scores one answer per question, in question order.
pub fn assess(answers: &[u8]) -> Result<StressAssessment> {
    if answers.len() != STRESS_QUESTIONS.len() {
        return Err(CatalystError::validation(format!(
            "Expected {} answers, got {}",
            STRESS_QUESTIONS.len(),
            answers.len()
        )));
    }
    if let Some((index, value)) = answers
        .iter()
        .enumerate()
        .find(|(_, value)| **value > MAX_ANSWER)
    {
        return Err(CatalystError::validation(format!(
            "Answer {} is {}, must be between 0 and {}",
            index + 1,
            value,
            MAX_ANSWER
        )));
    }

    let total_score: u32 = answers.iter().map(|v| u32::from(*v)).sum();
    let max_score = STRESS_QUESTIONS.len() as u32 * u32::from(MAX_ANSWER);
    let level = f64::from(total_score) / f64::from(max_score) * 100.0;
    let band = StressBand::from_level(level);

    Ok(StressAssessment {
        total_score,
        max_score,
        level,
        band,
        tips: band.tips(),
        emergency_contacts: &EMERGENCY_CONTACTS,
    })
}
