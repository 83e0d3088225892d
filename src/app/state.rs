use crate::adapters::{Backend, ChatClient};
use crate::app::functions::{
    DetailedRoadmap, EdgeFunction, MentorChat, ProgressReport, RecommendCourse, SmartTimetable,
    StressCheck,
};
use crate::core::catalog::{CatalogSource, StaticCatalog};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CatalystError, Result};
use serde_json::Value;
use std::sync::Arc;

/// Everything a request handler can reach, built once at startup.
pub struct AppState {
    pub smart_timetable: SmartTimetable<Backend>,
    pub recommend_course: RecommendCourse<Backend>,
    pub mentor_chat: MentorChat,
    pub detailed_roadmap: DetailedRoadmap,
    pub stress_check: StressCheck,
    pub progress: ProgressReport<Backend>,
    pub catalog: Arc<dyn CatalogSource>,
    pub backend_kind: &'static str,
    pub llm_enabled: bool,
}

impl AppState {
    pub fn new<C: ConfigProvider>(
        config: &C,
        store: Backend,
        catalog: Arc<dyn CatalogSource>,
    ) -> Result<Self> {
        let chat = ChatClient::from_settings(config.llm())?;
        let llm = config.llm();

        Ok(Self {
            smart_timetable: SmartTimetable::new(store.clone(), config.timetable_defaults().clone()),
            recommend_course: RecommendCourse::new(store.clone(), chat.clone(), llm),
            mentor_chat: MentorChat::new(chat.clone(), llm),
            detailed_roadmap: DetailedRoadmap::new(chat.clone(), llm),
            stress_check: StressCheck,
            progress: ProgressReport::new(store.clone()),
            catalog,
            backend_kind: store.kind(),
            llm_enabled: chat.is_some(),
        })
    }

    /// Backend and catalog chosen from configuration.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Arc<Self>> {
        let store = Backend::from_settings(config.backend())?;
        let catalog = match config.catalog_path() {
            Some(path) => StaticCatalog::from_file(path)?,
            None => StaticCatalog::builtin()?,
        };
        let state = Self::new(config, store, Arc::new(catalog))?;

        tracing::info!(
            "State ready: backend={}, llm={}, mentor providers={:?}",
            state.backend_kind,
            if state.llm_enabled { "enabled" } else { "disabled" },
            state.mentor_chat.providers()
        );
        Ok(Arc::new(state))
    }

    /// Runs an edge function by its route name.
    pub async fn invoke(&self, function: &str, body: &[u8]) -> Result<Value> {
        match function {
            SmartTimetable::<Backend>::NAME => self.smart_timetable.invoke(body).await,
            RecommendCourse::<Backend>::NAME => self.recommend_course.invoke(body).await,
            MentorChat::NAME => self.mentor_chat.invoke(body).await,
            DetailedRoadmap::NAME => self.detailed_roadmap.invoke(body).await,
            StressCheck::NAME => self.stress_check.invoke(body).await,
            other => Err(CatalystError::validation(format!("Unknown function: {}", other))),
        }
    }
}
