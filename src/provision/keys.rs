//! Get-or-create for service keys (credential bindings of type `key`)

use log::info;

use crate::cf::{BindingDetails, CfSession, ServiceCredentialBinding, ServiceInstance};
use crate::config::api;
use crate::error::{CfError, Result};

impl CfSession {
    /// Poll the key `key_name` of `instance` and return its credentials
    ///
    /// `None` when no such key exists.
    pub async fn get_service_key(
        &self,
        instance: &ServiceInstance,
        key_name: &str,
    ) -> Result<Option<serde_json::Value>> {
        info!("Getting service key '{}'", key_name);
        let binding: Option<ServiceCredentialBinding> = self
            .poll_until_terminal(
                api::SERVICE_CREDENTIAL_BINDINGS,
                &[
                    ("names", key_name),
                    ("service_instance_guids", instance.guid.as_str()),
                ],
                key_name,
            )
            .await?;

        match binding {
            Some(binding) => Ok(Some(self.service_key_credentials(&binding).await?)),
            None => Ok(None),
        }
    }

    /// Credentials of a succeeded binding
    pub async fn service_key_credentials(
        &self,
        binding: &ServiceCredentialBinding,
    ) -> Result<serde_json::Value> {
        let path = format!(
            "{}/{}/details",
            api::SERVICE_CREDENTIAL_BINDINGS,
            urlencoding::encode(&binding.guid)
        );
        let details: BindingDetails = self.api().get(&path, None).await?;
        Ok(details.credentials)
    }

    /// Return the credentials of key `key_name`, creating the key first if
    /// it does not exist
    pub async fn get_or_create_service_key(
        &self,
        instance: &ServiceInstance,
        key_name: &str,
        parameters: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value> {
        if let Some(credentials) = self.get_service_key(instance, key_name).await? {
            return Ok(credentials);
        }

        info!("Creating service key '{}' - please be patient...", key_name);
        let body = service_key_body(key_name, &instance.guid, parameters);
        self.api()
            .request(api::SERVICE_CREDENTIAL_BINDINGS, None, Some(&body))
            .await?;

        self.get_service_key(instance, key_name)
            .await?
            .ok_or_else(|| {
                CfError::NotFound(format!("Could not create service key '{}'", key_name))
            })
    }
}

/// Creation body for a service key
pub fn service_key_body(
    key_name: &str,
    instance_guid: &str,
    parameters: Option<&serde_json::Value>,
) -> serde_json::Value {
    let mut body = serde_json::json!({
        "type": "key",
        "name": key_name,
        "relationships": {
            "service_instance": {"data": {"guid": instance_guid}}
        }
    });
    if let Some(parameters) = parameters {
        body["parameters"] = parameters.clone();
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cf::testing::{empty_list, resource_list, Reply, ScriptedRunner};
    use crate::cf::{LastOperation, OperationState};
    use tempfile::TempDir;

    fn instance() -> ServiceInstance {
        ServiceInstance {
            guid: "si-1".to_string(),
            name: "db1".to_string(),
            last_operation: LastOperation {
                state: OperationState::Succeeded,
                operation_type: Some("create".to_string()),
                description: None,
            },
        }
    }

    fn details() -> Reply {
        Reply::json(serde_json::json!({
            "credentials": {"username": "u", "password": "p"}
        }))
    }

    #[test]
    fn test_service_key_body() {
        assert_eq!(
            service_key_body("db1-key", "si-1", None),
            serde_json::json!({
                "type": "key",
                "name": "db1-key",
                "relationships": {"service_instance": {"data": {"guid": "si-1"}}}
            })
        );
    }

    #[tokio::test]
    async fn test_existing_key_returns_credentials() {
        let dir = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        runner
            .on(
                &["curl", "/v3/service_credential_bindings?"],
                vec![resource_list("b-1", "db1-key", "succeeded")],
            )
            .on(
                &["curl", "/v3/service_credential_bindings/b-1/details"],
                vec![details()],
            );
        let session = CfSession::test_session(runner.clone(), &dir);

        let credentials = session
            .get_or_create_service_key(&instance(), "db1-key", None)
            .await
            .unwrap();

        assert_eq!(credentials["username"], "u");
        assert_eq!(
            runner.count(&["curl", "/v3/service_credential_bindings", "-d"]),
            0
        );
        let list_call = &runner.calls()[0];
        assert_eq!(
            list_call[1],
            "/v3/service_credential_bindings?names=db1-key&service_instance_guids=si-1"
        );
    }

    #[tokio::test]
    async fn test_missing_key_is_created() {
        let dir = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        runner
            .on(
                &["curl", "/v3/service_credential_bindings?"],
                vec![
                    empty_list(),
                    resource_list("b-1", "db1-key", "initial"),
                    resource_list("b-1", "db1-key", "succeeded"),
                ],
            )
            .on(
                &["curl", "/v3/service_credential_bindings/"],
                vec![details()],
            )
            .on(
                &["curl", "/v3/service_credential_bindings", "-d"],
                vec![Reply::json(serde_json::json!({"guid": "b-1"}))],
            );
        let session = CfSession::test_session(runner.clone(), &dir);

        let credentials = session
            .get_or_create_service_key(&instance(), "db1-key", None)
            .await
            .unwrap();

        assert_eq!(credentials["password"], "p");
        let post = runner
            .calls()
            .into_iter()
            .find(|c| c.len() == 4)
            .unwrap();
        let body: serde_json::Value = serde_json::from_str(&post[3]).unwrap();
        assert_eq!(body, service_key_body("db1-key", "si-1", None));
        assert_eq!(
            runner.count(&["curl", "/v3/service_credential_bindings/"]),
            1
        );
    }

    #[tokio::test]
    async fn test_failed_key_reports_binding_payload() {
        let dir = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        runner.on(
            &["curl", "/v3/service_credential_bindings?"],
            vec![resource_list("b-1", "db1-key", "failed")],
        );
        let session = CfSession::test_session(runner.clone(), &dir);

        match session
            .get_or_create_service_key(&instance(), "db1-key", None)
            .await
        {
            Err(CfError::RemoteFailure { kind, payload, .. }) => {
                assert_eq!(kind, "service key");
                assert!(payload.contains("b-1"));
            }
            other => panic!("Expected CfError::RemoteFailure, got {:?}", other),
        }
        assert_eq!(
            runner.count(&["curl", "/v3/service_credential_bindings/"]),
            0
        );
    }

    #[tokio::test]
    async fn test_details_without_credentials_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        runner
            .on(
                &["curl", "/v3/service_credential_bindings?"],
                vec![resource_list("b-1", "db1-key", "succeeded")],
            )
            .on(
                &["curl", "/v3/service_credential_bindings/"],
                vec![Reply::json(serde_json::json!({"volume_mounts": []}))],
            );
        let session = CfSession::test_session(runner, &dir);

        let result = session.get_service_key(&instance(), "db1-key").await;
        assert!(matches!(result, Err(CfError::Parse(_))));
    }
}
