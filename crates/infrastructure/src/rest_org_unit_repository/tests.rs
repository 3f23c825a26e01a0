use csrd_application::OrgUnitRepository;
use csrd_domain::{OrgUnitId, OrgUnitLevel};
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::RestOrgUnitRepository;
use crate::json_server_client::JsonServerClient;

#[tokio::test]
async fn filters_children_by_parent_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizational-units/maintenance-centers"))
        .and(query_param("directionId", "d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "m1", "name": "CM Lille", "directionId": "d1"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = Url::parse(&server.uri()).unwrap_or_else(|_| unreachable!());
    let repository =
        RestOrgUnitRepository::new(JsonServerClient::new(reqwest::Client::new(), base_url));
    let parent = OrgUnitId::new("d1").unwrap_or_else(|_| unreachable!());

    let units = repository
        .list(OrgUnitLevel::MaintenanceCenters, Some(&parent))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(units.len(), 1);
    assert_eq!(units[0].name(), "CM Lille");
}
