use super::EdgeFunction;
use crate::core::stress::{self, StressAssessment};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct StressCheckRequest {
    #[serde(default)]
    pub answers: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StressCheckResponse {
    pub success: bool,
    #[serde(flatten)]
    pub assessment: StressAssessment,
}

pub struct StressCheck;

#[async_trait]
impl EdgeFunction for StressCheck {
    const NAME: &'static str = "stress-check";
    type Request = StressCheckRequest;
    type Response = StressCheckResponse;

    async fn handle(&self, request: StressCheckRequest) -> Result<StressCheckResponse> {
        let assessment = stress::assess(&request.answers)?;
        tracing::debug!("Stress level {:.1}% ({})", assessment.level, assessment.band.label());
        Ok(StressCheckResponse {
            success: true,
            assessment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stress_check_response_shape() {
        let response = StressCheck
            .invoke(br#"{"answers": [3, 3, 3, 3, 3, 3]}"#)
            .await
            .unwrap();

        assert_eq!(response["success"], true);
        assert_eq!(response["level"], 75.0);
        assert_eq!(response["band"], "High");
        assert_eq!(response["tips"][1], "Consider professional counseling");
        assert_eq!(response["emergencyContacts"][0]["number"], "1800-599-0019");
    }

    #[tokio::test]
    async fn test_out_of_range_answer() {
        assert!(StressCheck.invoke(br#"{"answers": [9, 0, 0, 0, 0, 0]}"#).await.is_err());
        assert!(StressCheck.invoke(br#"{"answers": [-1]}"#).await.is_err());
    }
}
