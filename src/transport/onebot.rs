use super::traits::{HistoryMessage, HistorySender, RecallTransport, SendReceipt};
use crate::config::OneBotConfig;
use crate::error::TransportError;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

/// OneBot v11 HTTP API client (NapCat, Lagrange, go-cqhttp, ...).
pub struct OneBotHttpTransport {
    base_url: String,
    access_token: Option<String>,
    client: reqwest::Client,
}

impl OneBotHttpTransport {
    pub fn new(config: &OneBotConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone().filter(|t| !t.is_empty()),
            client,
        })
    }

    fn api_url(&self, action: &str) -> String {
        format!("{}/{action}", self.base_url)
    }

    async fn call(&self, action: &str, params: Value) -> Result<Value, TransportError> {
        let mut request = self.client.post(self.api_url(action)).json(&params);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await.map_err(|e| TransportError::Http {
            action: action.to_string(),
            message: e.to_string(),
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let err = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            return Err(TransportError::Http {
                action: action.to_string(),
                message: format!("{status}: {err}"),
            });
        }

        let body: Value = resp.json().await.map_err(|e| TransportError::Decode {
            action: action.to_string(),
            message: e.to_string(),
        })?;

        let retcode = body.get("retcode").and_then(Value::as_i64).unwrap_or(0);
        let status = body.get("status").and_then(Value::as_str).unwrap_or("ok");
        if retcode != 0 || status == "failed" {
            let message = body
                .get("wording")
                .or_else(|| body.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(TransportError::rejected(action, retcode, message));
        }

        Ok(body.get("data").cloned().unwrap_or(Value::Null))
    }
}

/// OneBot implementations expect numeric ids; fall back to the raw string
/// for platforms with non-numeric identifiers.
fn id_param(id: &str) -> Value {
    id.parse::<i64>().map_or_else(|_| json!(id), |n| json!(n))
}

fn receipt_from(data: &Value) -> SendReceipt {
    let message_id = match data.get("message_id") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    };
    SendReceipt { message_id }
}

fn history_entry(raw: &Value) -> Option<HistoryMessage> {
    let message_id = match raw.get("message_id")? {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.parse().ok()?,
        _ => return None,
    };
    let user_id = match raw.get("sender").and_then(|s| s.get("user_id"))? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => return None,
    };
    Some(HistoryMessage {
        message_id,
        sender: HistorySender { user_id },
    })
}

#[async_trait]
impl RecallTransport for OneBotHttpTransport {
    fn name(&self) -> &str {
        "onebot"
    }

    async fn delete_message(&self, message_id: i64) -> Result<(), TransportError> {
        self.call("delete_msg", json!({ "message_id": message_id }))
            .await
            .map(|_| ())
    }

    async fn send_group_message(
        &self,
        group_id: &str,
        message: &Value,
    ) -> Result<SendReceipt, TransportError> {
        let data = self
            .call(
                "send_group_msg",
                json!({ "group_id": id_param(group_id), "message": message }),
            )
            .await?;
        Ok(receipt_from(&data))
    }

    async fn send_private_message(
        &self,
        user_id: &str,
        message: &Value,
    ) -> Result<SendReceipt, TransportError> {
        let data = self
            .call(
                "send_private_msg",
                json!({ "user_id": id_param(user_id), "message": message }),
            )
            .await?;
        Ok(receipt_from(&data))
    }

    async fn fetch_group_history(
        &self,
        group_id: &str,
        start_seq: i64,
        count: usize,
        reverse_order: bool,
    ) -> Result<Vec<HistoryMessage>, TransportError> {
        let data = self
            .call(
                "get_group_msg_history",
                json!({
                    "group_id": id_param(group_id),
                    "message_seq": start_seq,
                    "count": count,
                    "reverseOrder": reverse_order,
                }),
            )
            .await?;

        let messages = data
            .get("messages")
            .and_then(Value::as_array)
            .ok_or_else(|| TransportError::Decode {
                action: "get_group_msg_history".into(),
                message: "missing messages array".into(),
            })?;

        Ok(messages.iter().filter_map(history_entry).collect())
    }
}
