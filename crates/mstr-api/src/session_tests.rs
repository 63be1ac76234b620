use super::*;
use crate::models::{ObjectSubtype, ObjectType};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "ji7ilqelnud37kpjkofgori17r";
const PROJECT_ID: &str = "B7CA92F04B9FAE8D941C3E9B7E0CD754";

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(204).insert_header(AUTH_TOKEN_HEADER, TOKEN))
        .mount(server)
        .await;
}

async fn mount_projects(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": PROJECT_ID, "alias": "", "name": "MicroStrategy Tutorial", "status": 0},
            {"id": "4BAE16A340B995CAD24193AA3AC15D29", "alias": "Hello", "name": "Human Resources Analysis Module", "status": 0},
            {"id": "00000000000000000000000000000000", "alias": "", "name": "Offline", "status": 1}
        ])))
        .mount(server)
        .await;
}

async fn open_session(server: &MockServer) -> Session {
    mount_login(server).await;
    mount_projects(server).await;
    let mut session = Session::new(server.uri()).unwrap();
    session
        .open(&Credentials::new("administrator", "secret"))
        .await
        .unwrap();
    session
}

#[test]
fn test_builder_normalizes_base_url() {
    let session = Session::new("http://localhost/api").unwrap();
    assert_eq!(session.base_url(), "http://localhost/api/");

    let session = Session::new("http://localhost/api/").unwrap();
    assert_eq!(session.base_url(), "http://localhost/api/");
}

#[test]
fn test_is_project_id() {
    assert!(is_project_id(PROJECT_ID));
    assert!(is_project_id("b7ca92f04b9fae8d941c3e9b7e0cd754"));
    assert!(!is_project_id("B7CA92F04B9FAE8D941C3E9B7E0CD75"));
    assert!(!is_project_id("B7CA92F0-4B9F-AE8D-941C-3E9B7E0CD754"));
    assert!(!is_project_id(""));
}

#[test]
fn test_debug_redacts_secrets() {
    let creds = Credentials::new("administrator", "hunter2");
    let debug = format!("{:?}", creds);
    assert!(debug.contains("administrator"));
    assert!(!debug.contains("hunter2"));
}

#[tokio::test]
async fn test_open_stores_token_and_active_projects() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "username": "administrator",
            "password": "secret",
            "loginMode": 1
        })))
        .respond_with(ResponseTemplate::new(204).insert_header(AUTH_TOKEN_HEADER, TOKEN))
        .expect(1)
        .mount(&server)
        .await;
    mount_projects(&server).await;

    let mut session = Session::new(server.uri()).unwrap();
    session
        .open(&Credentials::new("administrator", "secret"))
        .await
        .unwrap();

    assert_eq!(session.auth_token().unwrap().as_str(), TOKEN);
    assert_eq!(session.username(), Some("administrator"));
    assert_eq!(session.projects().len(), 2);
    assert!(session.is_valid().await.unwrap());
    assert!(!format!("{:?}", session).contains(TOKEN));
}

#[tokio::test]
async fn test_open_without_token_header_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let mut session = Session::new(server.uri()).unwrap();
    let err = session
        .open(&Credentials::new("administrator", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Auth { .. }));
    assert!(!session.is_valid().await.unwrap());
}

#[tokio::test]
async fn test_open_with_short_token_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(204).insert_header(AUTH_TOKEN_HEADER, "short"))
        .mount(&server)
        .await;

    let mut session = Session::new(server.uri()).unwrap();
    let err = session
        .open(&Credentials::new("administrator", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidToken { length: 5, .. }));
    assert!(session.auth_token().is_none());
    assert!(!session.is_valid().await.unwrap());
}

#[tokio::test]
async fn test_open_rejected_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "ERR003",
            "message": "Login failed"
        })))
        .mount(&server)
        .await;

    let mut session = Session::new(server.uri()).unwrap();
    let err = session
        .open(&Credentials::new("administrator", "wrong"))
        .await
        .unwrap_err();

    assert!(err.is_auth());
    assert!(!session.is_valid().await.unwrap());
}

#[tokio::test]
async fn test_open_without_loading_projects() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = Session::builder(server.uri())
        .load_projects(false)
        .build()
        .unwrap();
    session
        .open(&Credentials::new("administrator", "secret"))
        .await
        .unwrap();
    assert!(session.projects().is_empty());
}

#[tokio::test]
async fn test_is_valid_skips_remote_check_for_fresh_token() {
    let server = MockServer::start().await;
    let mut session = open_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    assert!(session.is_valid().await.unwrap());
}

#[tokio::test]
async fn test_is_valid_revalidates_old_token() {
    let server = MockServer::start().await;
    let mut session = open_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .and(header(AUTH_TOKEN_HEADER, TOKEN))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    session
        .auth_token
        .as_mut()
        .unwrap()
        .backdate(chrono::Duration::seconds(301));

    assert!(session.is_valid().await.unwrap());
    let age = session.auth_token().unwrap().valid_for();
    assert!(age < chrono::Duration::seconds(5));
}

#[tokio::test]
async fn test_is_valid_detects_expired_session() {
    let server = MockServer::start().await;
    let mut session = open_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "ERR009",
            "message": "The users session has expired, please reauthenticate",
            "iServerCode": -2147072488
        })))
        .expect(1)
        .mount(&server)
        .await;

    session
        .auth_token
        .as_mut()
        .unwrap()
        .backdate(chrono::Duration::seconds(600));

    assert!(!session.is_valid().await.unwrap());
    // Invalid sessions refuse further calls without asking the server.
    let err = session.list_projects().await.unwrap_err();
    assert!(matches!(err, Error::InvalidSession));
}

#[tokio::test]
async fn test_close_logs_out_once() {
    let server = MockServer::start().await;
    let mut session = open_session(&server).await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(header(AUTH_TOKEN_HEADER, TOKEN))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    session.close().await.unwrap();
    assert!(!session.is_valid().await.unwrap());

    // Second close has nothing to log out.
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_close_after_expiry_drops_token_without_logout() {
    let server = MockServer::start().await;
    let mut session = open_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "ERR009",
            "message": "The users session has expired, please reauthenticate"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    session
        .auth_token
        .as_mut()
        .unwrap()
        .backdate(chrono::Duration::seconds(600));
    assert!(!session.is_valid().await.unwrap());

    session.close().await.unwrap();
    assert!(session.auth_token().is_none());
}

#[tokio::test]
async fn test_operations_revalidate_old_token() {
    let server = MockServer::start().await;
    let mut session = open_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "ERR009",
            "message": "The users session has expired, please reauthenticate"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/objects/ABC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "X"})))
        .expect(0)
        .mount(&server)
        .await;

    session
        .auth_token
        .as_mut()
        .unwrap()
        .backdate(chrono::Duration::seconds(301));

    let object = ObjectInfo::new("ABC", ObjectType::Metric);
    let err = session
        .get_object_information(&object, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidSession));
}

#[tokio::test]
async fn test_operations_refresh_old_token_when_server_confirms() {
    let server = MockServer::start().await;
    let mut session = open_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/objects/ABC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "X"})))
        .expect(2)
        .mount(&server)
        .await;

    session
        .auth_token
        .as_mut()
        .unwrap()
        .backdate(chrono::Duration::seconds(301));

    let object = ObjectInfo::new("ABC", ObjectType::Metric);
    session.get_object_information(&object, None).await.unwrap();
    // Token was refreshed, so the second call skips the remote check.
    session.get_object_information(&object, None).await.unwrap();
}

#[tokio::test]
async fn test_close_unopened_session_is_noop() {
    let mut session = Session::new("http://127.0.0.1:9/api").unwrap();
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_calls_on_unopened_session_fail() {
    let mut session = Session::new("http://127.0.0.1:9/api").unwrap();
    let object = ObjectInfo::new(PROJECT_ID, ObjectType::ReportDefinition);

    let err = session
        .get_object_information(&object, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidSession));
}

#[tokio::test]
async fn test_set_default_project_by_alias_and_name() {
    let server = MockServer::start().await;
    let mut session = open_session(&server).await;

    let project = session.set_default_project("Hello").unwrap();
    assert_eq!(project.id, "4BAE16A340B995CAD24193AA3AC15D29");

    let project = session.set_default_project("MicroStrategy Tutorial").unwrap();
    assert_eq!(project.id, PROJECT_ID);
    assert_eq!(session.current_project().unwrap().id, PROJECT_ID);

    assert!(session.set_default_project("Offline").is_none());
    assert!(session.current_project().is_none());
}

#[tokio::test]
async fn test_get_object_information_sends_type_and_project() {
    let server = MockServer::start().await;
    let mut session = open_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/objects/8D679D4B11D3E4981000E787EC6DE8A4"))
        .and(query_param("type", "12"))
        .and(header(PROJECT_ID_HEADER, PROJECT_ID))
        .and(header(AUTH_TOKEN_HEADER, TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "8D679D4B11D3E4981000E787EC6DE8A4",
            "name": "Region",
            "type": 12,
            "description": "Geographic region"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let object = ObjectInfo::new("8D679D4B11D3E4981000E787EC6DE8A4", ObjectType::Attribute);
    let info = session
        .get_object_information(&object, Some(PROJECT_ID))
        .await
        .unwrap();

    assert_eq!(info.id, "8D679D4B11D3E4981000E787EC6DE8A4");
    assert_eq!(info.name.as_deref(), Some("Region"));
    assert_eq!(info.description.as_deref(), Some("Geographic region"));
}

#[tokio::test]
async fn test_malformed_project_id_is_not_sent() {
    let server = MockServer::start().await;
    let mut session = open_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/objects/ABC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "X"})))
        .mount(&server)
        .await;

    let object = ObjectInfo::new("ABC", ObjectType::Metric);
    session
        .get_object_information(&object, Some("not-a-project"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let last = requests.last().unwrap();
    assert!(last.headers.get(PROJECT_ID_HEADER).is_none());
}

#[tokio::test]
async fn test_default_project_header_is_used() {
    let server = MockServer::start().await;
    let mut session = open_session(&server).await;
    session.set_default_project(PROJECT_ID);
    Mock::given(method("GET"))
        .and(path("/objects/ABC"))
        .and(header(PROJECT_ID_HEADER, PROJECT_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "X"})))
        .expect(1)
        .mount(&server)
        .await;

    let object = ObjectInfo::new("ABC", ObjectType::Metric);
    session.get_object_information(&object, None).await.unwrap();
}

#[tokio::test]
async fn test_remote_error_carries_server_payload() {
    let server = MockServer::start().await;
    let mut session = open_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/objects/MISSING"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "ERR004",
            "message": "Object not found",
            "iServerCode": -2147216373
        })))
        .mount(&server)
        .await;

    let object = ObjectInfo::new("MISSING", ObjectType::ReportDefinition);
    let err = session
        .get_object_information(&object, None)
        .await
        .unwrap_err();

    match err {
        Error::Api(ApiError::Http {
            status,
            code,
            iserver_code,
            ..
        }) => {
            assert_eq!(status, 404);
            assert_eq!(code.as_deref(), Some("ERR004"));
            assert_eq!(iserver_code, Some(-2147216373));
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_dataset_definition_uses_cubes_for_cube_subtype() {
    let server = MockServer::start().await;
    let mut session = open_session(&server).await;
    let body = json!({"result": {"definition": {"availableObjects": {
        "attributes": [{"id": "A1", "name": "Region", "forms": [{"id": "F1", "name": "DESC"}]}],
        "metrics": [{"id": "M1", "name": "Revenue"}]
    }}}});
    Mock::given(method("GET"))
        .and(path("/cubes/CUBE1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reports/REPORT1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let mut cube = ObjectInfo::new("CUBE1", ObjectType::ReportDefinition);
    cube.subtype = Some(ObjectSubtype::ReportCube);
    let def = session.get_dataset_definition(&cube, None).await.unwrap();
    assert_eq!(def.attributes[0].name(), "Region");

    let mut report = ObjectInfo::new("REPORT1", ObjectType::ReportDefinition);
    report.subtype = Some(ObjectSubtype::ReportGrid);
    let def = session.get_dataset_definition(&report, None).await.unwrap();
    assert_eq!(def.metrics[0].name(), "Revenue");
}

#[tokio::test]
async fn test_search_sends_repeated_type_params() {
    let server = MockServer::start().await;
    let mut session = open_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/searches/results"))
        .and(query_param("pattern", "1"))
        .and(query_param("getAncestors", "true"))
        .and(query_param("name", "Sales"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalItems": 1,
            "result": [{"id": "R1", "name": "Sales Report", "type": 3, "subtype": 768}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = SearchQuery::new()
        .with_name("Sales")
        .with_search_type(crate::models::SearchType::BeginWith)
        .with_object_types(vec![ObjectType::ReportDefinition, ObjectType::Metric]);
    let results = session.search(&query, None).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results.results[0].name.as_deref(), Some("Sales Report"));

    let requests = server.received_requests().await.unwrap();
    let query = requests.last().unwrap().url.query().unwrap_or_default().to_string();
    assert!(query.contains("type=3"));
    assert!(query.contains("type=4"));
}

#[tokio::test]
async fn test_create_instance_posts_view_filter() {
    let server = MockServer::start().await;
    let mut session = open_session(&server).await;
    let filter = json!({"viewFilter": {
        "operator": "Equals",
        "operands": [
            {"type": "form", "attribute": {"id": "A1", "name": "Region"}, "form": {"id": "F1", "name": "DESC"}},
            {"type": "constant", "dataType": "Char", "value": "Europe"}
        ]
    }});
    Mock::given(method("POST"))
        .and(path("/reports/REPORT1/instances"))
        .and(body_json(filter.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instanceId": "INST1",
            "result": {
                "definition": {"attributes": [{"name": "Region"}]},
                "data": {"root": {"children": [
                    {"depth": 0, "element": {"attributeIndex": 0, "name": "Europe"},
                     "metrics": {"Revenue": {"rv": 42}}}
                ]}}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = ObjectInfo::new("REPORT1", ObjectType::ReportDefinition);
    let results = session
        .create_instance(&report, Some(&filter), None)
        .await
        .unwrap();

    assert_eq!(results.instance_id.as_deref(), Some("INST1"));
    assert_eq!(results.rows.len(), 1);
    assert_eq!(results.rows[0]["Region"], json!("Europe"));
    assert_eq!(results.rows[0]["Revenue"], json!(42));
}
