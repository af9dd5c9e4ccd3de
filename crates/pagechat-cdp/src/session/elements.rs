//! Element lookup and element-bound operations for CDP page session.

use pagechat_core::Locator;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::CdpError;

use super::core::PageSession;

/// Object group holding every element handle handed out by [`PageSession::query_all`].
pub(crate) const ELEMENT_GROUP: &str = "pagechat-elements";

const CENTER_FUNCTION: &str = r#"function() {
    this.scrollIntoView({block: "center", inline: "center"});
    const rect = this.getBoundingClientRect();
    return [rect.left + rect.width / 2, rect.top + rect.height / 2, rect.width, rect.height];
}"#;

impl PageSession {
    /// Object ids of every element matching `locator`, in document order.
    pub async fn query_all(&self, locator: &Locator) -> Result<Vec<String>, CdpError> {
        let array = self
            .evaluate_handle(&locator_expression(locator), Some(ELEMENT_GROUP))
            .await?;
        let Some(array_id) = array.object_id else {
            return Ok(Vec::new());
        };

        let properties = self.get_properties(&array_id).await?;
        let mut indexed: Vec<(usize, String)> = properties
            .into_iter()
            .filter_map(|p| {
                let index = p.name.parse::<usize>().ok()?;
                let object_id = p.value?.object_id?;
                Some((index, object_id))
            })
            .collect();
        indexed.sort_by_key(|(index, _)| *index);

        self.release_object(&array_id).await?;

        trace!("{} matched {} element(s)", locator, indexed.len());
        Ok(indexed.into_iter().map(|(_, id)| id).collect())
    }

    /// Click the center of an element, scrolling it into view first.
    pub async fn click_element(&self, object_id: &str) -> Result<(), CdpError> {
        let center = self
            .call_function_on(object_id, CENTER_FUNCTION, None)
            .await?;

        match parse_center(&center) {
            Some((x, y)) => self.click(x, y).await,
            None => {
                // Zero-sized elements cannot be hit with the mouse.
                debug!("Element has no box, dispatching click from script");
                self.call_function_on(object_id, "function() { this.click(); }", None)
                    .await?;
                Ok(())
            }
        }
    }

    pub async fn focus_element(&self, object_id: &str) -> Result<(), CdpError> {
        self.call_function_on(object_id, "function() { this.focus(); }", None)
            .await?;
        Ok(())
    }

    pub async fn outer_html(&self, object_id: &str) -> Result<String, CdpError> {
        let value = self
            .call_function_on(object_id, "function() { return this.outerHTML; }", None)
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Drop every element handle returned so far.
    pub async fn release_elements(&self) -> Result<(), CdpError> {
        self.release_object_group(ELEMENT_GROUP).await
    }
}

/// JavaScript expression evaluating to an array of the elements matched by `locator`.
pub(super) fn locator_expression(locator: &Locator) -> String {
    match locator {
        Locator::Css(selector) => format!(
            "Array.from(document.querySelectorAll({}))",
            js_string(selector)
        ),
        Locator::XPath(path) => format!(
            "(() => {{ \
                const snapshot = document.evaluate({}, document, null, \
                    XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
                const nodes = []; \
                for (let i = 0; i < snapshot.snapshotLength; i++) nodes.push(snapshot.snapshotItem(i)); \
                return nodes; \
            }})()",
            js_string(path)
        ),
    }
}

pub(super) fn js_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

/// Center point of a `[x, y, width, height]` box, `None` for an empty box.
pub(super) fn parse_center(value: &Value) -> Option<(f64, f64)> {
    let items = value.as_array()?;
    let [x, y, width, height] = items.as_slice() else {
        return None;
    };
    let (x, y) = (x.as_f64()?, y.as_f64()?);
    let (width, height) = (width.as_f64()?, height.as_f64()?);
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some((x, y))
}
