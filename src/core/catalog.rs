//! Directories of colleges, scholarships, jobs, government schemes, entrance
//! exams, study cities, career roadmaps and mentors.

use crate::utils::error::Result;
use crate::utils::validation::validate_path;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    Active,
    Upcoming,
    Closed,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "Active",
            ListingStatus::Upcoming => "Upcoming",
            ListingStatus::Closed => "Closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    Government,
    #[serde(rename = "PSU")]
    Psu,
    Private,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Government => "Government",
            JobType::Psu => "PSU",
            JobType::Private => "Private",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct College {
    pub id: String,
    pub name: String,
    pub location: String,
    pub rating: f32,
    pub student_count: String,
    pub courses_offered: Vec<String>,
    pub fees: String,
    pub website: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scholarship {
    pub id: String,
    pub title: String,
    pub provider: String,
    pub amount: String,
    pub deadline: String,
    pub eligibility: Vec<String>,
    pub description: String,
    pub application_link: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub organization: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub location: String,
    pub salary: String,
    pub experience: String,
    pub education: Vec<String>,
    pub application_deadline: String,
    pub description: String,
    pub skills: Vec<String>,
    pub benefits: Vec<String>,
    pub vacancies: String,
    pub exam_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_name: Option<String>,
    pub apply_link: String,
    pub status: ListingStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub category: String,
    pub amount: String,
    pub eligibility: Vec<String>,
    pub deadline: String,
    pub description: String,
    pub link: String,
    pub status: ListingStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExamDifficulty {
    Easy,
    Medium,
    Hard,
}

impl ExamDifficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExamDifficulty::Easy => "Easy",
            ExamDifficulty::Medium => "Medium",
            ExamDifficulty::Hard => "Hard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntranceExam {
    pub id: String,
    pub name: String,
    pub full_name: String,
    pub category: String,
    pub exam_date: String,
    pub application_deadline: String,
    pub eligibility: Vec<String>,
    pub syllabus_topics: Vec<String>,
    pub difficulty: ExamDifficulty,
    pub study_duration: String,
    pub sample_papers: u32,
    pub mock_tests: u32,
    pub preparation_tips: Vec<String>,
    pub cutoff_trend: String,
    pub seats: String,
    /// Percent of candidates who qualify.
    pub success_rate: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivingCost {
    pub hostel: String,
    pub food: String,
    pub transport: String,
}

/// A city worth studying in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyLocation {
    pub id: String,
    pub city: String,
    pub state: String,
    pub rating: f32,
    pub cost_of_living: String,
    pub strong_fields: Vec<String>,
    pub top_colleges: Vec<String>,
    pub industries: Vec<String>,
    pub living_cost: LivingCost,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub climate: String,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerStep {
    pub phase: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerRoadmap {
    pub id: String,
    pub title: String,
    pub category: String,
    pub duration: String,
    pub difficulty: String,
    pub salary: String,
    pub steps: Vec<CareerStep>,
    pub requirements: Vec<String>,
    pub exams: Vec<String>,
    pub colleges: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mentor {
    pub id: String,
    pub name: String,
    pub title: String,
    pub company: String,
    pub expertise: Vec<String>,
    pub experience: String,
    pub rating: f32,
    pub sessions: u32,
    pub education: String,
    pub specialization: String,
    pub availability: String,
    pub languages: Vec<String>,
}

/// Free-text search shared by the college, scholarship and mentor listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobQuery {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemeQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExamQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationQuery {
    pub search: Option<String>,
    pub field: Option<String>,
    pub cost: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoadmapQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

/// Lowercased filter value, or `None` when absent, blank or `all`.
fn wanted(filter: &Option<String>) -> Option<String> {
    filter
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("all"))
        .map(str::to_lowercase)
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

pub fn filter_colleges<'a>(colleges: &'a [College], query: &SearchQuery) -> Vec<&'a College> {
    let search = wanted(&query.search);
    colleges
        .iter()
        .filter(|college| match &search {
            None => true,
            Some(term) => {
                contains(&college.name, term)
                    || contains(&college.location, term)
                    || college.courses_offered.iter().any(|c| contains(c, term))
            }
        })
        .collect()
}

pub fn filter_scholarships<'a>(
    scholarships: &'a [Scholarship],
    query: &SearchQuery,
) -> Vec<&'a Scholarship> {
    let search = wanted(&query.search);
    scholarships
        .iter()
        .filter(|scholarship| match &search {
            None => true,
            Some(term) => {
                contains(&scholarship.title, term)
                    || contains(&scholarship.provider, term)
                    || contains(&scholarship.category, term)
                    || scholarship.eligibility.iter().any(|e| contains(e, term))
            }
        })
        .collect()
}

pub fn filter_jobs<'a>(jobs: &'a [Job], query: &JobQuery) -> Vec<&'a Job> {
    let search = wanted(&query.search);
    let job_type = wanted(&query.job_type);
    let location = wanted(&query.location);
    let status = wanted(&query.status);

    jobs.iter()
        .filter(|job| {
            search
                .as_deref()
                .map_or(true, |term| contains(&job.title, term) || contains(&job.organization, term))
        })
        .filter(|job| {
            job_type
                .as_deref()
                .map_or(true, |t| job.job_type.as_str().to_lowercase() == t)
        })
        .filter(|job| location.as_deref().map_or(true, |l| contains(&job.location, l)))
        .filter(|job| {
            status
                .as_deref()
                .map_or(true, |s| job.status.as_str().to_lowercase() == s)
        })
        .collect()
}

pub fn filter_schemes<'a>(schemes: &'a [Scheme], query: &SchemeQuery) -> Vec<&'a Scheme> {
    let search = wanted(&query.search);
    let category = wanted(&query.category);
    let status = wanted(&query.status);

    schemes
        .iter()
        .filter(|scheme| {
            search.as_deref().map_or(true, |term| {
                contains(&scheme.name, term) || contains(&scheme.description, term)
            })
        })
        .filter(|scheme| category.as_deref().map_or(true, |c| contains(&scheme.category, c)))
        .filter(|scheme| {
            status
                .as_deref()
                .map_or(true, |s| scheme.status.as_str().to_lowercase() == s)
        })
        .collect()
}

pub fn filter_exams<'a>(exams: &'a [EntranceExam], query: &ExamQuery) -> Vec<&'a EntranceExam> {
    let search = wanted(&query.search);
    let category = wanted(&query.category);
    let difficulty = wanted(&query.difficulty);

    exams
        .iter()
        .filter(|exam| {
            search
                .as_deref()
                .map_or(true, |term| contains(&exam.name, term) || contains(&exam.full_name, term))
        })
        .filter(|exam| {
            category
                .as_deref()
                .map_or(true, |c| exam.category.to_lowercase() == c)
        })
        .filter(|exam| {
            difficulty
                .as_deref()
                .map_or(true, |d| exam.difficulty.as_str().to_lowercase() == d)
        })
        .collect()
}

pub fn filter_locations<'a>(
    locations: &'a [StudyLocation],
    query: &LocationQuery,
) -> Vec<&'a StudyLocation> {
    let search = wanted(&query.search);
    let field = wanted(&query.field);
    let cost = wanted(&query.cost);

    locations
        .iter()
        .filter(|location| {
            search.as_deref().map_or(true, |term| {
                contains(&location.city, term) || contains(&location.state, term)
            })
        })
        .filter(|location| {
            field
                .as_deref()
                .map_or(true, |f| location.strong_fields.iter().any(|s| contains(s, f)))
        })
        .filter(|location| {
            cost.as_deref()
                .map_or(true, |c| location.cost_of_living.to_lowercase() == c)
        })
        .collect()
}

pub fn filter_roadmaps<'a>(
    roadmaps: &'a [CareerRoadmap],
    query: &RoadmapQuery,
) -> Vec<&'a CareerRoadmap> {
    let search = wanted(&query.search);
    let category = wanted(&query.category);

    roadmaps
        .iter()
        .filter(|roadmap| {
            search.as_deref().map_or(true, |term| {
                contains(&roadmap.title, term) || contains(&roadmap.category, term)
            })
        })
        .filter(|roadmap| {
            category
                .as_deref()
                .map_or(true, |c| roadmap.category.to_lowercase() == c)
        })
        .collect()
}

pub fn filter_mentors<'a>(mentors: &'a [Mentor], query: &SearchQuery) -> Vec<&'a Mentor> {
    let search = wanted(&query.search);
    mentors
        .iter()
        .filter(|mentor| match &search {
            None => true,
            Some(term) => {
                contains(&mentor.name, term)
                    || mentor.expertise.iter().any(|e| contains(e, term))
                    || contains(&mentor.company, term)
            }
        })
        .collect()
}

/// Where directory listings come from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn colleges(&self, query: &SearchQuery) -> Result<Vec<College>>;
    async fn scholarships(&self, query: &SearchQuery) -> Result<Vec<Scholarship>>;
    async fn jobs(&self, query: &JobQuery) -> Result<Vec<Job>>;
    async fn schemes(&self, query: &SchemeQuery) -> Result<Vec<Scheme>>;
    async fn exams(&self, query: &ExamQuery) -> Result<Vec<EntranceExam>>;
    async fn locations(&self, query: &LocationQuery) -> Result<Vec<StudyLocation>>;
    async fn roadmaps(&self, query: &RoadmapQuery) -> Result<Vec<CareerRoadmap>>;
    async fn mentors(&self, query: &SearchQuery) -> Result<Vec<Mentor>>;
}

/// A catalog held in memory, loaded once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticCatalog {
    #[serde(default)]
    pub colleges: Vec<College>,
    #[serde(default)]
    pub scholarships: Vec<Scholarship>,
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub schemes: Vec<Scheme>,
    #[serde(default)]
    pub exams: Vec<EntranceExam>,
    #[serde(default)]
    pub locations: Vec<StudyLocation>,
    #[serde(default)]
    pub roadmaps: Vec<CareerRoadmap>,
    #[serde(default)]
    pub mentors: Vec<Mentor>,
}

impl StaticCatalog {
    pub fn builtin() -> Result<Self> {
        Ok(serde_json::from_str(BUILTIN_CATALOG)?)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        validate_path("catalog.path", path)?;
        let content = std::fs::read_to_string(Path::new(path))?;
        let catalog: Self = serde_json::from_str(&content)?;
        tracing::info!(
            "Loaded catalog from {}: {} colleges, {} scholarships, {} jobs, {} schemes",
            path,
            catalog.colleges.len(),
            catalog.scholarships.len(),
            catalog.jobs.len(),
            catalog.schemes.len()
        );
        tracing::debug!(
            "{} exams, {} locations, {} roadmaps, {} mentors",
            catalog.exams.len(),
            catalog.locations.len(),
            catalog.roadmaps.len(),
            catalog.mentors.len()
        );
        Ok(catalog)
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn colleges(&self, query: &SearchQuery) -> Result<Vec<College>> {
        Ok(filter_colleges(&self.colleges, query).into_iter().cloned().collect())
    }

    async fn scholarships(&self, query: &SearchQuery) -> Result<Vec<Scholarship>> {
        Ok(filter_scholarships(&self.scholarships, query)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn jobs(&self, query: &JobQuery) -> Result<Vec<Job>> {
        Ok(filter_jobs(&self.jobs, query).into_iter().cloned().collect())
    }

    async fn schemes(&self, query: &SchemeQuery) -> Result<Vec<Scheme>> {
        Ok(filter_schemes(&self.schemes, query).into_iter().cloned().collect())
    }

    async fn exams(&self, query: &ExamQuery) -> Result<Vec<EntranceExam>> {
        Ok(filter_exams(&self.exams, query).into_iter().cloned().collect())
    }

    async fn locations(&self, query: &LocationQuery) -> Result<Vec<StudyLocation>> {
        Ok(filter_locations(&self.locations, query)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn roadmaps(&self, query: &RoadmapQuery) -> Result<Vec<CareerRoadmap>> {
        Ok(filter_roadmaps(&self.roadmaps, query).into_iter().cloned().collect())
    }

    async fn mentors(&self, query: &SearchQuery) -> Result<Vec<Mentor>> {
        Ok(filter_mentors(&self.mentors, query).into_iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn search(term: &str) -> SearchQuery {
        SearchQuery {
            search: Some(term.to_string()),
        }
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = StaticCatalog::builtin().unwrap();
        assert_eq!(catalog.colleges.len(), 3);
        assert_eq!(catalog.scholarships.len(), 4);
        assert_eq!(catalog.jobs.len(), 6);
        assert_eq!(catalog.schemes.len(), 6);
        assert_eq!(catalog.jobs[4].exam_name, None);
        assert_eq!(catalog.exams.len(), 6);
        assert_eq!(catalog.locations.len(), 6);
        assert_eq!(catalog.roadmaps.len(), 5);
        assert_eq!(catalog.mentors.len(), 4);
    }

    #[test]
    fn test_exam_search_covers_full_name() {
        let catalog = StaticCatalog::builtin().unwrap();
        let query = ExamQuery {
            search: Some("admission".to_string()),
            ..Default::default()
        };
        let names: Vec<_> = filter_exams(&catalog.exams, &query)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["CAT", "CLAT"]);

        let query = ExamQuery {
            category: Some("Engineering".to_string()),
            difficulty: Some("hard".to_string()),
            ..Default::default()
        };
        let found = filter_exams(&catalog.exams, &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].full_name, "Joint Entrance Examination Main");
    }

    #[test]
    fn test_location_field_and_cost_filters() {
        let catalog = StaticCatalog::builtin().unwrap();
        let query = LocationQuery {
            search: Some("maharashtra".to_string()),
            ..Default::default()
        };
        let cities: Vec<_> = filter_locations(&catalog.locations, &query)
            .iter()
            .map(|l| l.city.as_str())
            .collect();
        assert_eq!(cities, vec!["Mumbai", "Pune"]);

        let query = LocationQuery {
            field: Some("it".to_string()),
            cost: Some("moderate".to_string()),
            ..Default::default()
        };
        let cities: Vec<_> = filter_locations(&catalog.locations, &query)
            .iter()
            .map(|l| l.city.as_str())
            .collect();
        assert_eq!(cities, vec!["Chennai", "Pune", "Hyderabad"]);
    }

    #[test]
    fn test_roadmap_search_and_category() {
        let catalog = StaticCatalog::builtin().unwrap();
        let query = RoadmapQuery {
            search: Some("technology".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_roadmaps(&catalog.roadmaps, &query).len(), 2);

        let query = RoadmapQuery {
            category: Some("finance".to_string()),
            ..Default::default()
        };
        let found = filter_roadmaps(&catalog.roadmaps, &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Chartered Accountant");
        assert_eq!(found[0].steps.len(), 4);
    }

    #[test]
    fn test_mentor_search_covers_expertise_and_company() {
        let catalog = StaticCatalog::builtin().unwrap();
        let found = filter_mentors(&catalog.mentors, &search("neet"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Dr. Priya Sharma");

        let found = filter_mentors(&catalog.mentors, &search("iisc"));
        assert_eq!(found[0].name, "Prof. Sneha Reddy");
        assert_eq!(filter_mentors(&catalog.mentors, &search("all")).len(), 4);
    }

    #[test]
    fn test_college_search_covers_courses() {
        let catalog = StaticCatalog::builtin().unwrap();
        let found = filter_colleges(&catalog.colleges, &search("medicine"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Stanford University");

        let found = filter_colleges(&catalog.colleges, &search("MASSACHUSETTS"));
        assert_eq!(found.len(), 2);
        assert_eq!(filter_colleges(&catalog.colleges, &SearchQuery::default()).len(), 3);
    }

    #[test]
    fn test_scholarship_search_covers_eligibility() {
        let catalog = StaticCatalog::builtin().unwrap();
        let found = filter_scholarships(&catalog.scholarships, &search("gpa"));
        let titles: Vec<_> = found.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Google Computer Science Scholarship", "NASA STEM Scholarship"]
        );
    }

    #[test]
    fn test_job_filters_combine() {
        let catalog = StaticCatalog::builtin().unwrap();
        let query = JobQuery {
            job_type: Some("psu".to_string()),
            location: Some("all".to_string()),
            status: Some("Upcoming".to_string()),
            ..Default::default()
        };
        let found = filter_jobs(&catalog.jobs, &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].organization, "State Bank of India");

        let query = JobQuery {
            search: Some("developer".to_string()),
            location: Some("mumbai".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_jobs(&catalog.jobs, &query).len(), 1);
    }

    #[test]
    fn test_scheme_category_is_substring() {
        let catalog = StaticCatalog::builtin().unwrap();
        let query = SchemeQuery {
            category: Some("science".to_string()),
            status: Some("active".to_string()),
            ..Default::default()
        };
        let found = filter_schemes(&catalog.schemes, &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "INSPIRE Scholarship");
    }

    #[tokio::test]
    async fn test_catalog_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"colleges": [{{"id": "9", "name": "IIT Bombay", "location": "Mumbai", "rating": 4.7,
                "studentCount": "10,000+", "coursesOffered": ["Engineering"], "fees": "₹2,20,000/year",
                "website": "https://iitb.ac.in", "description": "Premier engineering institute."}}]}}"#
        )
        .unwrap();

        let catalog = StaticCatalog::from_file(file.path().to_str().unwrap()).unwrap();
        assert!(catalog.jobs.is_empty());
        let colleges = catalog.colleges(&search("engineering")).await.unwrap();
        assert_eq!(colleges[0].id, "9");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(StaticCatalog::from_file("/nonexistent/catalog.json").is_err());
    }
}
