//! Integration tests for a full session lifecycle.
//!
//! These tests use wiremock to mock the MicroStrategy Library API.

use mstr_api_rs::prelude::*;
use mstr_api_rs::session::{AUTH_TOKEN_HEADER, PROJECT_ID_HEADER};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "5g7h5e4ltgk1gjd3tvuhm5eo1u";
const TUTORIAL: &str = "B19DEDCC11D4E0EFC000EB9495D0F44F";

async fn mock_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(204).insert_header(AUTH_TOKEN_HEADER, TOKEN))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(header(AUTH_TOKEN_HEADER, TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": TUTORIAL, "alias": "Tutorial", "name": "MicroStrategy Tutorial",
             "description": "Sample project", "status": 0}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    server
}

/// Test: open, select a project, search, read a cube definition, close
#[tokio::test]
async fn test_search_and_definition_workflow() {
    let server = mock_server().await;

    Mock::given(method("GET"))
        .and(path("/searches/results"))
        .and(query_param("name", "Revenue"))
        .and(query_param("pattern", "4"))
        .and(header(PROJECT_ID_HEADER, TUTORIAL))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{
                "id": "8CCD8D9D4051A4C533C719A6590DEED8",
                "name": "Revenue Cube",
                "type": 3,
                "subtype": 776,
                "ancestors": [{"id": "D3C7D461F69C4610AA6BAA5EF51F4125", "name": "Public Objects", "level": 1}]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cubes/8CCD8D9D4051A4C533C719A6590DEED8"))
        .and(header(PROJECT_ID_HEADER, TUTORIAL))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "8CCD8D9D4051A4C533C719A6590DEED8",
            "result": {"definition": {"availableObjects": {
                "attributes": [
                    {"id": "8D679D4B11D3E4981000E787EC6DE8A4", "name": "Region", "type": 12,
                     "forms": [{"id": "CCFBE2A5EADB4F50941FB879CCF1721C", "name": "DESC", "dataType": "Char"}]}
                ],
                "metrics": [
                    {"id": "4C051DB611D3E877C000B3B2D86C964F", "name": "Revenue", "type": 4, "isDerived": "false"}
                ]
            }}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = Session::new(server.uri()).unwrap();
    session
        .open(&Credentials::new("administrator", ""))
        .await
        .unwrap();

    let project = session.set_default_project("Tutorial").unwrap();
    assert_eq!(project.name, "MicroStrategy Tutorial");

    let results = session
        .search(&SearchQuery::new().with_name("Revenue"), None)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);

    let cube = &results.results[0];
    assert_eq!(cube.subtype, Some(ObjectSubtype::ReportCube));
    assert_eq!(cube.ancestors[0].name, "Public Objects");

    let definition = session.get_dataset_definition(cube, None).await.unwrap();
    let region = definition.attributes_named("Region")[0];
    let desc = region.form("DESC").unwrap();
    assert_eq!(definition.owner_of(desc).unwrap().id(), region.id());
    assert!(!definition.metrics[0].is_derived);

    session.close().await.unwrap();
    assert!(!session.is_valid().await.unwrap());
}

/// Test: an explicit project id overrides the default project
#[tokio::test]
async fn test_explicit_project_overrides_default() {
    let server = mock_server().await;
    let other = "4BAE16A340B995CAD24193AA3AC15D29";

    Mock::given(method("GET"))
        .and(path("/objects/E1853D5A4C0A8B9B11D5C6BE3F2A1F4B"))
        .and(header(PROJECT_ID_HEADER, other))
        .and(query_param("type", "8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Shared Reports", "type": 8, "subtype": 2048
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = Session::new(server.uri()).unwrap();
    session
        .open(&Credentials::new("administrator", ""))
        .await
        .unwrap();
    session.set_default_project(TUTORIAL);

    let folder = ObjectInfo::new("E1853D5A4C0A8B9B11D5C6BE3F2A1F4B", ObjectType::Folder);
    let folder = session
        .get_object_information(&folder, Some(other))
        .await
        .unwrap();
    assert_eq!(folder.name.as_deref(), Some("Shared Reports"));
    assert_eq!(folder.subtype, Some(ObjectSubtype::Folder));

    session.close().await.unwrap();
}
