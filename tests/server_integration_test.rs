use catalyst::adapters::{Backend, MemoryStore};
use catalyst::app::functions::smart_timetable::{PROGRESS_TABLE, TIMETABLES_TABLE};
use catalyst::core::catalog::StaticCatalog;
use catalyst::{server, AppConfig, AppState};
use httpmock::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

async fn spawn_server(config: AppConfig, store: MemoryStore) -> String {
    let catalog = StaticCatalog::builtin().unwrap();
    let state = AppState::new(&config, Backend::Memory(store), Arc::new(catalog)).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, Arc::new(state)));
    format!("http://{}", address)
}

fn llm_config(base_url: String) -> AppConfig {
    let mut config = AppConfig::default();
    config.llm.api_key = Some("sk-test".to_string());
    config.llm.base_url = base_url;
    config.llm.max_retries = 0;
    config.llm.retry_delay_ms = 1;
    config
}

async fn post(base: &str, path: &str, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("{}{}", base, path))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

async fn get(base: &str, path: &str) -> (u16, Value) {
    let response = reqwest::get(format!("{}{}", base, path)).await.unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_health_reports_backend_and_llm() {
    let base = spawn_server(AppConfig::default(), MemoryStore::new()).await;

    let (status, body) = get(&base, "/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend"], "memory");
    assert_eq!(body["llm"], false);
}

#[tokio::test]
async fn test_timetable_then_progress() {
    let store = MemoryStore::new();
    let base = spawn_server(AppConfig::default(), store.clone()).await;

    let (status, body) = post(
        &base,
        "/functions/v1/smart-timetable",
        json!({
            "userId": "student-7",
            "subjects": [
                {"name": "Math", "priority": 3},
                {"name": "Physics", "priority": 1}
            ],
            "totalHours": 4,
            "type": "academic_only"
        }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    let schedule = body["timetable"]["schedule"].as_object().unwrap();
    let keys: Vec<&str> = schedule.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["09:00", "10:30", "10:45", "12:15"]);
    assert_eq!(schedule["12:15"]["title"], "Physics - Session 1");
    assert_eq!(schedule["12:15"]["duration"], 60);

    assert_eq!(store.rows(TIMETABLES_TABLE).await.len(), 1);
    assert_eq!(store.rows(PROGRESS_TABLE).await.len(), 4);

    let timetable_id = body["timetable"]["id"].as_str().unwrap();
    let (status, progress) = get(&base, &format!("/api/progress/student-7/{}", timetable_id)).await;
    assert_eq!(status, 200);
    assert_eq!(progress["stats"]["totalTasks"], 4);
    assert_eq!(progress["stats"]["completedTasks"], 0);
    assert_eq!(progress["stats"]["streak"], 0);
    assert_eq!(progress["completionPercent"], 0);
    assert_eq!(progress["tasks"][0]["task_id"], "09:00_0");
}

#[tokio::test]
async fn test_toggling_a_task_updates_progress() {
    let store = MemoryStore::new();
    let base = spawn_server(AppConfig::default(), store.clone()).await;

    let (_, body) = post(
        &base,
        "/functions/v1/smart-timetable",
        json!({
            "userId": "student-8",
            "subjects": [{"name": "Chemistry", "priority": 2}],
            "totalHours": 2,
            "type": "academic_only"
        }),
    )
    .await;
    let timetable_id = body["timetable"]["id"].as_str().unwrap().to_string();
    let progress_path = format!("/api/progress/student-8/{}", timetable_id);

    let (_, progress) = get(&base, &progress_path).await;
    let first_task = progress["tasks"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(progress["tasks"][0]["task_type"], "study");

    let toggle_path = format!("/api/progress/student-8/tasks/{}/toggle", first_task);
    let (status, toggled) = post(&base, &toggle_path, json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(toggled["task"]["completed"], true);
    assert!(toggled["task"]["completed_at"].is_string());

    let (_, progress) = get(&base, &progress_path).await;
    assert_eq!(progress["stats"]["completedTasks"], 1);
    assert_eq!(progress["stats"]["streak"], 1);
    assert_eq!(progress["stats"]["studyHours"], 1.5);

    let (_, toggled) = post(&base, &toggle_path, json!({})).await;
    assert_eq!(toggled["task"]["completed"], false);
    let (_, progress) = get(&base, &progress_path).await;
    assert_eq!(progress["stats"]["completedTasks"], 0);

    let (status, body) = post(&base, "/api/progress/someone-else/tasks/missing/toggle", json!({})).await;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_invalid_requests_are_400() {
    let store = MemoryStore::new();
    let base = spawn_server(AppConfig::default(), store.clone()).await;

    let (status, body) = post(
        &base,
        "/functions/v1/smart-timetable",
        json!({"userId": "u1", "subjects": [{"name": "Math", "priority": 0}], "totalHours": 2}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("priority"));
    assert!(store.rows(TIMETABLES_TABLE).await.is_empty());

    let response = reqwest::Client::new()
        .post(format!("{}/functions/v1/stress-check", base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let (status, _) = post(&base, "/functions/v1/ai-mentor-chat", json!({"message": "   "})).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_mentor_keywords_without_llm() {
    let base = spawn_server(AppConfig::default(), MemoryStore::new()).await;

    let (status, body) = post(
        &base,
        "/functions/v1/ai-mentor-chat",
        json!({"message": "I feel so much exam stress"}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["source"], "keywords");
    assert!(body["response"].as_str().unwrap().len() > 20);
}

#[tokio::test]
async fn test_recommendations_from_model() {
    let llm = MockServer::start_async().await;
    let content = json!({
        "recommendations": [{
            "course": "B.Tech Computer Science",
            "confidence": 140,
            "reasoning": "Strong interest in programming",
            "careerPaths": ["Software Engineer"],
            "prerequisites": ["PCM"],
            "duration": "4 years"
        }],
        "analysis": "Analytical and technical profile"
    })
    .to_string();
    let completion = llm
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer sk-test");
            then.status(200)
                .json_body(json!({"choices": [{"message": {"content": content}}]}));
        })
        .await;

    let store = MemoryStore::new();
    let base = spawn_server(llm_config(llm.base_url()), store.clone()).await;

    let (status, body) = post(
        &base,
        "/functions/v1/recommend-course",
        json!({"userId": "u1", "answers": {"1": "Solving complex mathematical problems"}}),
    )
    .await;

    completion.assert_async().await;
    assert_eq!(status, 200);
    assert_eq!(body["source"], "openai");
    assert_eq!(body["recommendations"][0]["confidence"], 100);
    assert_eq!(body["recommendations"][0]["careerPaths"][0], "Software Engineer");
    assert_eq!(store.rows("quiz_results").await.len(), 1);
}

#[tokio::test]
async fn test_roadmap_falls_back_when_model_fails() {
    let llm = MockServer::start_async().await;
    llm.mock_async(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(500).body("upstream down");
    })
    .await;

    let base = spawn_server(llm_config(llm.base_url()), MemoryStore::new()).await;
    let (status, body) = post(
        &base,
        "/functions/v1/generate-detailed-roadmap",
        json!({"careerTitle": "Software Engineer", "category": "Technology"}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["career"], "Software Engineer");
    assert!(body["roadmap"].is_object());
}

#[tokio::test]
async fn test_stress_check_and_questions() {
    let base = spawn_server(AppConfig::default(), MemoryStore::new()).await;

    let (status, questions) = get(&base, "/api/stress/questions").await;
    assert_eq!(status, 200);
    assert_eq!(questions["questions"].as_array().unwrap().len(), 6);

    let (status, body) = post(
        &base,
        "/functions/v1/stress-check",
        json!({"answers": [0, 0, 1, 0, 0, 1]}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["band"], "Low");
    assert_eq!(body["totalScore"], 2);
}

#[tokio::test]
async fn test_directory_filters() {
    let base = spawn_server(AppConfig::default(), MemoryStore::new()).await;

    let (status, quiz) = get(&base, "/api/quiz/questions").await;
    assert_eq!(status, 200);
    assert_eq!(quiz["questions"].as_array().unwrap().len(), 8);

    let (_, jobs) = get(&base, "/api/jobs?type=PSU&status=all").await;
    assert_eq!(jobs["count"], 2);

    let (_, jobs) = get(&base, "/api/jobs?type=psu&status=upcoming").await;
    assert_eq!(jobs["count"], 1);
    assert_eq!(jobs["jobs"][0]["title"], "Banking Associate");

    let (_, colleges) = get(&base, "/api/colleges?search=stanford").await;
    assert_eq!(colleges["count"], 1);

    let (_, scholarships) = get(&base, "/api/scholarships").await;
    assert_eq!(scholarships["count"], 4);

    let (status, exams) = get(&base, "/api/exams?category=medical").await;
    assert_eq!(status, 200);
    assert_eq!(exams["count"], 1);
    assert_eq!(exams["exams"][0]["fullName"], "National Eligibility cum Entrance Test");

    let (_, locations) = get(&base, "/api/locations?search=karnataka&field=research").await;
    assert_eq!(locations["count"], 1);
    assert_eq!(locations["locations"][0]["livingCost"]["hostel"], "₹8,000-15,000");

    let (_, roadmaps) = get(&base, "/api/roadmaps?category=Healthcare").await;
    assert_eq!(roadmaps["roadmaps"][0]["title"], "Doctor (MBBS)");

    let (_, mentors) = get(&base, "/api/mentors?search=finance").await;
    assert_eq!(mentors["count"], 1);
    assert_eq!(mentors["mentors"][0]["company"], "Tata Consultancy");
}

#[tokio::test]
async fn test_malformed_query_is_json_400() {
    let base = spawn_server(AppConfig::default(), MemoryStore::new()).await;

    for path in [
        "/api/jobs?status=active&status=closed",
        "/api/colleges?search=a&search=b",
        "/api/exams?difficulty=hard&difficulty=easy",
    ] {
        let (status, body) = get(&base, path).await;
        assert_eq!(status, 400, "{}", path);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("duplicate field"));
    }
}

#[tokio::test]
async fn test_cors_preflight() {
    let base = spawn_server(AppConfig::default(), MemoryStore::new()).await;

    let response = reqwest::Client::new()
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/functions/v1/stress-check", base),
        )
        .header("origin", "https://app.example.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "apikey, content-type")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}
