//! Vultr v1 API client
//!
//! Reads are GET requests with query parameters, writes are POST requests
//! with form-encoded bodies. Every request carries the `API-Key` header.
//! Responses are returned as raw JSON so callers can render them as-is.

use crate::error::{Result, VultrError};
use serde_json::Value;
use vpsflow_cloud::CreateServerRequest;

pub const VULTR_API_BASE: &str = "https://api.vultr.com/v1";

const API_KEY_HEADER: &str = "API-Key";

/// Create-time parameters the API expects upper-cased
const UPPERCASE_PARAMS: &[&str] = &[
    "appid",
    "firewallgroupid",
    "isoid",
    "networkid",
    "scriptid",
    "snapshotid",
    "sshkeyid",
];

/// Vultr API client
#[derive(Debug, Clone)]
pub struct VultrClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

/// Server-side filters of `server/list`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerListFilter {
    pub subid: Option<String>,
    pub tag: Option<String>,
    pub label: Option<String>,
    pub main_ip: Option<String>,
}

impl ServerListFilter {
    /// A SUBID filter makes the API answer a single record
    pub fn is_single(&self) -> bool {
        self.subid.is_some()
    }
}

/// Parameters of `dns/create_record`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecordRequest {
    pub domain: String,
    pub name: String,
    pub record_type: String,
    pub data: String,
    pub ttl: Option<u32>,
    pub priority: Option<u32>,
}

impl VultrClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: VULTR_API_BASE.to_string(),
        }
    }

    /// Point the client at another API root (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ============ Account / catalog ============

    pub async fn account_info(&self) -> Result<Value> {
        self.get("account/info", &[]).await
    }

    pub async fn app_list(&self) -> Result<Value> {
        self.get("app/list", &[]).await
    }

    pub async fn backup_list(&self) -> Result<Value> {
        self.get("backup/list", &[]).await
    }

    pub async fn iso_list(&self) -> Result<Value> {
        self.get("iso/list", &[]).await
    }

    pub async fn os_list(&self) -> Result<Value> {
        self.get("os/list", &[]).await
    }

    pub async fn plans_list(&self) -> Result<Value> {
        self.get("plans/list", &[]).await
    }

    pub async fn regions_list(&self) -> Result<Value> {
        self.get("regions/list", &[]).await
    }

    /// Plan ids available in a region
    pub async fn regions_availability(&self, dcid: &str) -> Result<Value> {
        self.get("regions/availability", &[("DCID", dcid.to_string())])
            .await
    }

    // ============ DNS ============

    pub async fn dns_list(&self) -> Result<Value> {
        self.get("dns/list", &[]).await
    }

    pub async fn dns_records(&self, domain: &str) -> Result<Value> {
        self.get("dns/records", &[("domain", domain.to_string())])
            .await
    }

    pub async fn dns_create_domain(&self, domain: &str, serverip: &str) -> Result<Value> {
        let form = Form::new().with("domain", domain).with("serverip", serverip);
        self.post("dns/create_domain", form).await
    }

    pub async fn dns_delete_domain(&self, domain: &str) -> Result<Value> {
        self.post("dns/delete_domain", Form::new().with("domain", domain))
            .await
    }

    pub async fn dns_create_record(&self, record: &DnsRecordRequest) -> Result<Value> {
        let form = Form::new()
            .with("domain", &record.domain)
            .with("name", &record.name)
            .with("type", &record.record_type)
            .with("data", &record.data)
            .with_opt("ttl", record.ttl.map(|v| v.to_string()))
            .with_opt("priority", record.priority.map(|v| v.to_string()));
        self.post("dns/create_record", form).await
    }

    pub async fn dns_delete_record(&self, domain: &str, recordid: &str) -> Result<Value> {
        let form = Form::new().with("domain", domain).with("RECORDID", recordid);
        self.post("dns/delete_record", form).await
    }

    // ============ Servers ============

    pub async fn server_list(&self, filter: &ServerListFilter) -> Result<Value> {
        let mut query = Vec::new();
        if let Some(subid) = &filter.subid {
            query.push(("SUBID", subid.clone()));
        }
        if let Some(tag) = &filter.tag {
            query.push(("tag", tag.clone()));
        }
        if let Some(label) = &filter.label {
            query.push(("label", label.clone()));
        }
        if let Some(main_ip) = &filter.main_ip {
            query.push(("main_ip", main_ip.clone()));
        }
        self.get("server/list", &query).await
    }

    /// Create a server; the response holds only the new `SUBID`
    pub async fn server_create(&self, request: &CreateServerRequest) -> Result<Value> {
        self.post("server/create", create_server_form(request).into())
            .await
    }

    pub async fn server_destroy(&self, subid: &str) -> Result<Value> {
        self.post("server/destroy", Form::new().with("SUBID", subid))
            .await
    }

    pub async fn server_start(&self, subid: &str) -> Result<Value> {
        self.post("server/start", Form::new().with("SUBID", subid))
            .await
    }

    pub async fn server_halt(&self, subid: &str) -> Result<Value> {
        self.post("server/halt", Form::new().with("SUBID", subid))
            .await
    }

    pub async fn server_reboot(&self, subid: &str) -> Result<Value> {
        self.post("server/reboot", Form::new().with("SUBID", subid))
            .await
    }

    pub async fn server_label_set(&self, subid: &str, label: &str) -> Result<Value> {
        let form = Form::new().with("SUBID", subid).with("label", label);
        self.post("server/label_set", form).await
    }

    // ============ Snapshots ============

    pub async fn snapshot_list(&self) -> Result<Value> {
        self.get("snapshot/list", &[]).await
    }

    pub async fn snapshot_create(&self, subid: &str, description: Option<&str>) -> Result<Value> {
        let form = Form::new()
            .with("SUBID", subid)
            .with_opt("description", description);
        self.post("snapshot/create", form).await
    }

    pub async fn snapshot_destroy(&self, snapshotid: &str) -> Result<Value> {
        self.post("snapshot/destroy", Form::new().with("SNAPSHOTID", snapshotid))
            .await
    }

    // ============ SSH keys ============

    pub async fn sshkey_list(&self) -> Result<Value> {
        self.get("sshkey/list", &[]).await
    }

    pub async fn sshkey_create(&self, name: &str, ssh_key: &str) -> Result<Value> {
        let form = Form::new().with("name", name).with("ssh_key", ssh_key);
        self.post("sshkey/create", form).await
    }

    pub async fn sshkey_update(
        &self,
        sshkeyid: &str,
        name: Option<&str>,
        ssh_key: Option<&str>,
    ) -> Result<Value> {
        let form = Form::new()
            .with("SSHKEYID", sshkeyid)
            .with_opt("name", name)
            .with_opt("ssh_key", ssh_key);
        self.post("sshkey/update", form).await
    }

    pub async fn sshkey_destroy(&self, sshkeyid: &str) -> Result<Value> {
        self.post("sshkey/destroy", Form::new().with("SSHKEYID", sshkeyid))
            .await
    }

    // ============ Startup scripts ============

    pub async fn startupscript_list(&self) -> Result<Value> {
        self.get("startupscript/list", &[]).await
    }

    /// `script_type` is `boot` (provider default) or `pxe`
    pub async fn startupscript_create(
        &self,
        name: &str,
        script: &str,
        script_type: Option<&str>,
    ) -> Result<Value> {
        let form = Form::new()
            .with("name", name)
            .with("script", script)
            .with_opt("type", script_type);
        self.post("startupscript/create", form).await
    }

    pub async fn startupscript_update(
        &self,
        scriptid: &str,
        name: Option<&str>,
        script: Option<&str>,
    ) -> Result<Value> {
        let form = Form::new()
            .with("SCRIPTID", scriptid)
            .with_opt("name", name)
            .with_opt("script", script);
        self.post("startupscript/update", form).await
    }

    pub async fn startupscript_destroy(&self, scriptid: &str) -> Result<Value> {
        self.post("startupscript/destroy", Form::new().with("SCRIPTID", scriptid))
            .await
    }

    // ============ Transport ============

    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Value> {
        tracing::debug!("GET {}", endpoint);
        let response = self
            .client
            .get(self.url(endpoint))
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await?;
        read_body(endpoint, response).await
    }

    async fn post(&self, endpoint: &str, form: Form) -> Result<Value> {
        tracing::debug!("POST {}", endpoint);
        let response = self
            .client
            .post(self.url(endpoint))
            .header(API_KEY_HEADER, &self.api_key)
            .form(&form.0)
            .send()
            .await?;
        read_body(endpoint, response).await
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }
}

/// Form body of `server/create`
///
/// The three ids come first, followed by the extra parameters in order. Id
/// style extras are upper-cased the way the API names them.
pub fn create_server_form(request: &CreateServerRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("DCID".to_string(), request.dcid.clone()),
        ("VPSPLANID".to_string(), request.vpsplanid.clone()),
        ("OSID".to_string(), request.osid.clone()),
    ];
    for (key, value) in &request.params {
        let key = if UPPERCASE_PARAMS.contains(&key.to_ascii_lowercase().as_str()) {
            key.to_ascii_uppercase()
        } else {
            key.clone()
        };
        form.push((key, value.clone()));
    }
    form
}

async fn read_body(endpoint: &str, response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(VultrError::Api {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body: body.trim().to_string(),
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(|e| VultrError::UnexpectedResponse {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}

/// Ordered form body
struct Form(Vec<(String, String)>);

impl Form {
    fn new() -> Self {
        Self(Vec::new())
    }

    fn with(mut self, key: &str, value: impl AsRef<str>) -> Self {
        self.0.push((key.to_string(), value.as_ref().to_string()));
        self
    }

    fn with_opt(self, key: &str, value: Option<impl AsRef<str>>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }
}

impl From<Vec<(String, String)>> for Form {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> VultrClient {
        VultrClient::new("test-key").with_base_url(server.url("/v1"))
    }

    #[test]
    fn test_create_server_form_naming() {
        let request = CreateServerRequest::new("1", "201", "127")
            .with_param("scriptid", "123")
            .with_param("enable_ipv6", "yes")
            .with_param("SSHKEYID", "abc")
            .with_param("label", "vm1");

        assert_eq!(
            create_server_form(&request),
            vec![
                ("DCID".to_string(), "1".to_string()),
                ("VPSPLANID".to_string(), "201".to_string()),
                ("OSID".to_string(), "127".to_string()),
                ("SCRIPTID".to_string(), "123".to_string()),
                ("enable_ipv6".to_string(), "yes".to_string()),
                ("SSHKEYID".to_string(), "abc".to_string()),
                ("label".to_string(), "vm1".to_string()),
            ]
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = VultrClient::new("k").with_base_url("http://localhost:1234/v1/");
        assert_eq!(client.base_url(), "http://localhost:1234/v1");
        assert_eq!(VultrClient::new("k").base_url(), VULTR_API_BASE);
    }

    #[tokio::test]
    async fn test_get_sends_api_key() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/regions/list")
                .header("API-Key", "test-key");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"1": {"DCID": "1", "name": "New Jersey"}}));
        });

        let value = client_for(&server).regions_list().await.unwrap();
        mock.assert();
        assert_eq!(value["1"]["name"], json!("New Jersey"));
    }

    #[tokio::test]
    async fn test_server_list_filters_become_query_params() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/server/list")
                .query_param("tag", "web")
                .query_param("main_ip", "203.0.113.10");
            then.status(200).json_body(json!([]));
        });

        let filter = ServerListFilter {
            tag: Some("web".to_string()),
            main_ip: Some("203.0.113.10".to_string()),
            ..Default::default()
        };
        let value = client_for(&server).server_list(&filter).await.unwrap();
        mock.assert();
        assert_eq!(value, json!([]));
    }

    #[tokio::test]
    async fn test_post_sends_form_body() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/server/create")
                .header("API-Key", "test-key")
                .header("content-type", "application/x-www-form-urlencoded")
                .form_urlencoded_tuple("DCID", "1")
                .form_urlencoded_tuple("VPSPLANID", "201")
                .form_urlencoded_tuple("OSID", "127")
                .form_urlencoded_tuple("label", "vm1");
            then.status(200).json_body(json!({"SUBID": "1312965"}));
        });

        let request = CreateServerRequest::new("1", "201", "127").with_param("label", "vm1");
        let value = client_for(&server).server_create(&request).await.unwrap();
        mock.assert();
        assert_eq!(value, json!({"SUBID": "1312965"}));
    }

    #[tokio::test]
    async fn test_empty_body_is_null() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/v1/server/destroy");
            then.status(200);
        });

        let value = client_for(&server).server_destroy("576965").await.unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn test_error_status_surfaces_body() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v1/account/info");
            then.status(403).body("Invalid API key.");
        });

        let err = client_for(&server).account_info().await.unwrap_err();
        match err {
            VultrError::Api {
                endpoint,
                status,
                body,
            } => {
                assert_eq!(endpoint, "account/info");
                assert_eq!(status, 403);
                assert_eq!(body, "Invalid API key.");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_unexpected_response() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v1/os/list");
            then.status(200).body("<html>");
        });

        let err = client_for(&server).os_list().await.unwrap_err();
        assert!(matches!(err, VultrError::UnexpectedResponse { .. }));
    }
}
