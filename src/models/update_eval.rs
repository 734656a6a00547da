//! Update-call response evaluation
//!
//! The controller answers update calls with one of two payload shapes:
//! policy updates return a list of impacted entities, template updates
//! return an object (master-template responses additionally wrap it in a
//! `data` envelope). [`UpdateResponse`] homogenizes the variants so the
//! restore workflow can decide whether devices need to be re-attached or a
//! policy re-activated.

use std::fmt;

use serde_json::Value;

/// Homogenized update-call response.
#[derive(Debug, Clone)]
pub struct UpdateResponse {
    is_policy: bool,
    data: Value,
}

impl UpdateResponse {
    pub fn new(response: Value) -> Self {
        let is_policy = response.is_array();
        // Master template updates wrap the response in a 'data' envelope
        let data = match response {
            Value::Object(mut map) if map.contains_key("data") => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };
        Self { is_policy, data }
    }

    /// Devices must be re-attached when a template update reports an
    /// in-progress process.
    pub fn need_reattach(&self) -> bool {
        !self.is_policy && self.data.get("processId").is_some()
    }

    /// A policy must be re-activated when its update impacted any entity.
    pub fn need_reactivate(&self) -> bool {
        self.is_policy && self.data.as_array().is_some_and(|items| !items.is_empty())
    }

    /// Master templates impacted by this update.
    pub fn affected_templates(&self) -> Vec<String> {
        self.data
            .get("masterTemplatesAffected")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn data(&self) -> &Value {
        &self.data
    }
}

impl fmt::Display for UpdateResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pretty = serde_json::to_string_pretty(&self.data).map_err(|_| fmt::Error)?;
        write!(f, "{}", pretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_response_needs_reattach() {
        let response = UpdateResponse::new(json!({"processId": "push_feature_template_config"}));
        assert!(response.need_reattach());
        assert!(!response.need_reactivate());
    }

    #[test]
    fn test_master_template_envelope_unwrapped() {
        let response = UpdateResponse::new(json!({
            "data": {
                "processId": "push_feature_template_config",
                "masterTemplatesAffected": ["Branch_A", "Branch_B"]
            }
        }));
        assert!(response.need_reattach());
        assert_eq!(response.affected_templates(), vec!["Branch_A", "Branch_B"]);
    }

    #[test]
    fn test_policy_response_needs_reactivate() {
        let response = UpdateResponse::new(json!([{"policyId": "x"}]));
        assert!(response.need_reactivate());
        assert!(!response.need_reattach());
    }

    #[test]
    fn test_empty_policy_response() {
        let response = UpdateResponse::new(json!([]));
        assert!(!response.need_reactivate());
    }

    #[test]
    fn test_no_affected_templates() {
        let response = UpdateResponse::new(json!({"status": "done"}));
        assert!(response.affected_templates().is_empty());
        assert!(!response.need_reattach());
    }
}
