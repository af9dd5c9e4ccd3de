//! JavaScript execution operations for CDP page session.

use serde_json::{Value, json};

use crate::error::CdpError;
use crate::protocol::{PropertyDescriptor, RemoteObject};

use super::core::PageSession;

impl PageSession {
    /// Evaluate a JavaScript expression and return its value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        check_exception(&result)?;
        Ok(result["result"]["value"].clone())
    }

    /// Evaluate a JavaScript expression and return a handle to its result,
    /// optionally kept in `object_group` until the group is released.
    pub async fn evaluate_handle(
        &self,
        expression: &str,
        object_group: Option<&str>,
    ) -> Result<RemoteObject, CdpError> {
        let mut params = json!({
            "expression": expression,
            "returnByValue": false,
        });
        if let Some(group) = object_group {
            params["objectGroup"] = json!(group);
        }

        let result = self.call("Runtime.evaluate", Some(params)).await?;
        check_exception(&result)?;

        let remote_obj: RemoteObject = serde_json::from_value(result["result"].clone())?;
        Ok(remote_obj)
    }

    /// Call `function` with `this` bound to a remote object.
    pub async fn call_function_on(
        &self,
        object_id: &str,
        function: &str,
        args: Option<Vec<Value>>,
    ) -> Result<Value, CdpError> {
        let mut params = json!({
            "objectId": object_id,
            "functionDeclaration": function,
            "returnByValue": true,
            "awaitPromise": true,
        });

        if let Some(a) = args {
            params["arguments"] = json!(a.into_iter().map(|v| json!({"value": v})).collect::<Vec<_>>());
        }

        let result = self.call("Runtime.callFunctionOn", Some(params)).await?;
        check_exception(&result)?;
        Ok(result["result"]["value"].clone())
    }

    /// Own properties of a remote object.
    pub async fn get_properties(&self, object_id: &str) -> Result<Vec<PropertyDescriptor>, CdpError> {
        let result = self
            .call(
                "Runtime.getProperties",
                Some(json!({
                    "objectId": object_id,
                    "ownProperties": true,
                })),
            )
            .await?;
        check_exception(&result)?;

        let properties: Vec<PropertyDescriptor> = serde_json::from_value(result["result"].clone())?;
        Ok(properties)
    }

    pub async fn release_object(&self, object_id: &str) -> Result<(), CdpError> {
        self.call("Runtime.releaseObject", Some(json!({"objectId": object_id})))
            .await?;
        Ok(())
    }

    pub async fn release_object_group(&self, group: &str) -> Result<(), CdpError> {
        self.call(
            "Runtime.releaseObjectGroup",
            Some(json!({"objectGroup": group})),
        )
        .await?;
        Ok(())
    }
}

fn check_exception(result: &Value) -> Result<(), CdpError> {
    match result.get("exceptionDetails") {
        Some(exception) => {
            // The thrown value's description carries the actual message,
            // `text` is usually just "Uncaught".
            let text = exception["exception"]["description"]
                .as_str()
                .or_else(|| exception["text"].as_str())
                .unwrap_or("Unknown error");
            Err(CdpError::JavaScript(text.to_string()))
        }
        None => Ok(()),
    }
}
