/// Integration tests for the risk assessment workflow with a mocked health API
/// Covers validate -> predict -> recommend, plus partial and full failures
use health_assist::config::Config;
use health_assist::errors::AppError;
use health_assist::metrics::schema;
use health_assist::models::{AdviceCategory, DiseaseCategory, RiskZone, Severity};
use health_assist::prediction::{
    PredictionOrchestrator, PredictionState, RECOMMENDATIONS_UNAVAILABLE_MESSAGE,
};
use health_assist::prediction_client::RiskPredictionClient;
use health_assist::recommendation_client::RecommendationClient;
use std::collections::HashMap;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Helper function to create an orchestrator for one form
fn create_assessment(base_url: String, category: DiseaseCategory) -> PredictionOrchestrator {
    let config = Config::new(base_url);
    PredictionOrchestrator::new(
        category,
        RiskPredictionClient::new(&config).unwrap(),
        RecommendationClient::new(&config).unwrap(),
    )
}

fn heart_form() -> HashMap<String, String> {
    [
        ("age", "54"),
        ("sex", "1"),
        ("cp", "0"),
        ("trestbps", "130"),
        ("chol", "246"),
        ("fbs", "0"),
        ("restecg", "0"),
        ("thalach", "150"),
        ("exang", "0"),
        ("oldpeak", "1.0"),
        ("slope", "2"),
        ("ca", "0"),
        ("thal", "2"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn form(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Matches a request body whose keys appear in the category's schema order
fn fields_in_schema_order(category: DiseaseCategory) -> impl Fn(&Request) -> bool + Send + Sync {
    move |request: &Request| {
        let body = String::from_utf8_lossy(&request.body);
        let positions: Option<Vec<usize>> = schema(category)
            .iter()
            .map(|field| body.find(&format!("\"{}\":", field.name)))
            .collect();
        positions.is_some_and(|p| p.windows(2).all(|w| w[0] < w[1]))
    }
}

fn heart_guidance() -> serde_json::Value {
    serde_json::json!({
        "disease": "heart",
        "risk_score": 38.5,
        "recommendations": {
            "lifestyle": ["Quit smoking", "Manage stress"],
            "diet": ["Reduce saturated fat"],
            "exercise": ["30 minutes of brisk walking daily"],
            "monitoring": ["Check blood pressure weekly"],
            "medical": []
        }
    })
}

#[tokio::test]
async fn test_heart_assessment_complete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict/heart"))
        .and(body_json(serde_json::json!({
            "age": 54.0,
            "sex": 1.0,
            "cp": 0.0,
            "trestbps": 130.0,
            "chol": 246.0,
            "fbs": 0.0,
            "restecg": 0.0,
            "thalach": 150.0,
            "exang": 0.0,
            "oldpeak": 1.0,
            "slope": 2.0,
            "ca": 0.0,
            "thal": 2.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "disease": "heart",
            "risk_score": 38.5,
            "zone": "Yellow"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/recommendations/heart"))
        .and(query_param("risk_score", "38.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(heart_guidance()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let assessment = create_assessment(mock_server.uri(), DiseaseCategory::Heart);
    let state = assessment.submit(&heart_form()).await.unwrap();

    let PredictionState::Complete {
        risk,
        recommendations,
        notice,
        ..
    } = &state
    else {
        panic!("Expected complete assessment, got {:?}", state);
    };
    assert!((0.0..=100.0).contains(&risk.score));
    assert_eq!(risk.zone, RiskZone::Yellow);
    assert_eq!(risk.category, DiseaseCategory::Heart);
    assert!(notice.is_none());

    let recommendations = recommendations.as_ref().unwrap();
    let sections: Vec<AdviceCategory> = recommendations.sections().map(|(c, _)| c).collect();
    assert_eq!(
        sections,
        vec![
            AdviceCategory::Lifestyle,
            AdviceCategory::Diet,
            AdviceCategory::Exercise,
            AdviceCategory::Monitoring
        ]
    );
    for (_, items) in recommendations.sections() {
        assert!(!items.is_empty());
    }

    assert_eq!(assessment.state(), state);
    assert!(!assessment.is_busy());
}

#[tokio::test]
async fn test_missing_field_never_reaches_service() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict/heart"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut form = heart_form();
    form.remove("chol");

    let assessment = create_assessment(mock_server.uri(), DiseaseCategory::Heart);
    let state = assessment.submit(&form).await.unwrap();

    let PredictionState::Failed { notice, .. } = &state else {
        panic!("Expected validation failure, got {:?}", state);
    };
    assert_eq!(notice.severity, Severity::Error);
    assert!(notice.message.contains("Cholesterol"));
}

#[tokio::test]
async fn test_service_validation_message_shown_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict/heart"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "Invalid disease type"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/recommendations/heart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(heart_guidance()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let assessment = create_assessment(mock_server.uri(), DiseaseCategory::Heart);
    let state = assessment.submit(&heart_form()).await.unwrap();

    assert!(state.risk().is_none());
    assert_eq!(
        state.notice().map(|n| n.message.as_str()),
        Some("Invalid disease type")
    );
}

#[tokio::test]
async fn test_server_crash_shows_generic_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict/heart"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let assessment = create_assessment(mock_server.uri(), DiseaseCategory::Heart);
    let state = assessment.submit(&heart_form()).await.unwrap();

    let PredictionState::Failed { notice, .. } = &state else {
        panic!("Expected failure, got {:?}", state);
    };
    assert_eq!(notice.message, "Prediction failed. Please try again.");
}

#[tokio::test]
async fn test_out_of_range_score_is_transport_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict/heart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "risk_score": 140.0,
            "zone": "Red"
        })))
        .mount(&mock_server)
        .await;

    let config = Config::new(mock_server.uri());
    let client = RiskPredictionClient::new(&config).unwrap();
    let record =
        health_assist::metrics::validate(DiseaseCategory::Heart, &heart_form()).unwrap();

    let result = client.predict(DiseaseCategory::Heart, &record).await;

    assert!(matches!(result, Err(AppError::TransportFailure(_))));
}

#[tokio::test]
async fn test_recommendation_failure_keeps_risk() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict/heart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "disease": "heart",
            "risk_score": 71.2,
            "zone": "red"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/recommendations/heart"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": "Recommendation engine offline"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let assessment = create_assessment(mock_server.uri(), DiseaseCategory::Heart);
    let state = assessment.submit(&heart_form()).await.unwrap();

    let PredictionState::Complete {
        risk,
        recommendations,
        notice,
        ..
    } = &state
    else {
        panic!("Expected risk to survive, got {:?}", state);
    };
    assert_eq!(risk.score, 71.2);
    assert_eq!(risk.zone, RiskZone::Red);
    assert!(recommendations.is_none());
    let notice = notice.as_ref().unwrap();
    assert!(notice.is_warning());
    assert_eq!(notice.message, RECOMMENDATIONS_UNAVAILABLE_MESSAGE);
}

#[tokio::test]
async fn test_resubmission_while_in_flight_ignored() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict/heart"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"risk_score": 12.0, "zone": "Green"}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/recommendations/heart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(heart_guidance()))
        .mount(&mock_server)
        .await;

    let assessment = create_assessment(mock_server.uri(), DiseaseCategory::Heart);
    let form = heart_form();

    let (first, second) = tokio::join!(assessment.submit(&form), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(assessment.state().is_loading());
        assessment.submit(&form).await
    });

    assert!(second.is_none());
    let first = first.unwrap();
    assert_eq!(first.risk().map(|r| r.zone), Some(RiskZone::Green));
    assert!(first.recommendations().is_some());
}

#[tokio::test]
async fn test_reset_discards_pending_prediction() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict/heart"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"risk_score": 55.0, "zone": "Yellow"}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/recommendations/heart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(heart_guidance()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let assessment = create_assessment(mock_server.uri(), DiseaseCategory::Heart);
    let form = heart_form();

    let (pending, _) = tokio::join!(assessment.submit(&form), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        assessment.reset();
    });

    assert!(pending.is_none());
    assert_eq!(assessment.state(), PredictionState::Idle);
    assert!(!assessment.is_busy());
}

#[tokio::test]
async fn test_diabetes_assessment_complete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict/diabetes"))
        .and(body_json(serde_json::json!({
            "Pregnancies": 2.0,
            "Glucose": 138.0,
            "BloodPressure": 62.0,
            "SkinThickness": 35.0,
            "Insulin": 0.0,
            "BMI": 33.6,
            "DiabetesPedigreeFunction": 0.127,
            "Age": 47.0
        })))
        .and(fields_in_schema_order(DiseaseCategory::Diabetes))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "disease": "diabetes",
            "risk_score": 82.3,
            "zone": "Red"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/recommendations/diabetes"))
        .and(query_param("risk_score", "82.3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "recommendations": {
                "diet": ["Limit refined sugar"],
                "medical": ["Schedule an HbA1c test"]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let assessment = create_assessment(mock_server.uri(), DiseaseCategory::Diabetes);
    let state = assessment
        .submit(&form(&[
            ("Pregnancies", "2"),
            ("Glucose", "138"),
            ("BloodPressure", "62"),
            ("SkinThickness", "35"),
            ("Insulin", "0"),
            ("BMI", "33.6"),
            ("DiabetesPedigreeFunction", "0.127"),
            ("Age", "47"),
        ]))
        .await
        .unwrap();

    assert_eq!(state.risk().map(|r| r.zone), Some(RiskZone::Red));
    let recommendations = state.recommendations().unwrap();
    assert_eq!(recommendations.sections().count(), 2);
    assert_eq!(recommendations.medical, vec!["Schedule an HbA1c test"]);
}

#[tokio::test]
async fn test_kidney_assessment_complete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict/kidney"))
        .and(body_json(serde_json::json!({
            "age": 48.0, "bp": 80.0, "sg": 1.02, "al": 1.0, "su": 0.0,
            "rbc": 1.0, "pc": 0.0, "pcc": 0.0, "ba": 0.0, "bgr": 121.0,
            "bu": 36.0, "sc": 1.2, "sod": 138.0, "pot": 4.4, "hemo": 15.4,
            "pcv": 44.0, "wc": 7800.0, "rc": 5.2, "htn": 1.0, "dm": 1.0,
            "cad": 0.0, "appet": 1.0, "pe": 0.0, "ane": 0.0
        })))
        .and(fields_in_schema_order(DiseaseCategory::Kidney))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "disease": "kidney",
            "risk_score": 12.75,
            "zone": "green"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/recommendations/kidney"))
        .and(query_param("risk_score", "12.75"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "recommendations": {
                "lifestyle": ["Stay hydrated"],
                "monitoring": ["Yearly creatinine check"]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let assessment = create_assessment(mock_server.uri(), DiseaseCategory::Kidney);
    let state = assessment
        .submit(&form(&[
            ("age", "48"),
            ("bp", "80"),
            ("sg", "1.020"),
            ("al", "1"),
            ("su", "0"),
            ("rbc", "1"),
            ("pc", "0"),
            ("pcc", "0"),
            ("ba", "0"),
            ("bgr", "121"),
            ("bu", "36"),
            ("sc", "1.2"),
            ("sod", "138"),
            ("pot", "4.4"),
            ("hemo", "15.4"),
            ("pcv", "44"),
            ("wc", "7800"),
            ("rc", "5.2"),
            ("htn", "1"),
            ("dm", "1"),
            ("cad", "0"),
            ("appet", "1"),
            ("pe", "0"),
            ("ane", "0"),
        ]))
        .await
        .unwrap();

    let PredictionState::Complete {
        risk,
        recommendations,
        notice,
        ..
    } = &state
    else {
        panic!("Expected complete assessment, got {:?}", state);
    };
    assert_eq!(risk.category, DiseaseCategory::Kidney);
    assert_eq!(risk.zone, RiskZone::Green);
    assert!(notice.is_none());
    assert_eq!(recommendations.as_ref().unwrap().sections().count(), 2);
}

#[tokio::test]
async fn test_cancelled_submission_frees_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict/heart"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"risk_score": 20.0, "zone": "Green"}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/recommendations/heart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(heart_guidance()))
        .mount(&mock_server)
        .await;

    let assessment = create_assessment(mock_server.uri(), DiseaseCategory::Heart);
    let form = heart_form();

    let timed_out =
        tokio::time::timeout(Duration::from_millis(50), assessment.submit(&form)).await;
    assert!(timed_out.is_err());

    assert!(!assessment.is_busy());
    assert_eq!(assessment.state(), PredictionState::Idle);

    let retry = assessment.submit(&form).await;
    assert!(matches!(retry, Some(PredictionState::Complete { .. })));
}
