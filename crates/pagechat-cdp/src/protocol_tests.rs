use super::*;

#[test]
fn test_cdp_request_serialize() {
    let req = CdpRequest {
        id: 7,
        method: "Runtime.evaluate".to_string(),
        params: Some(serde_json::json!({"expression": "document.readyState"})),
        session_id: Some("S1".to_string()),
    };
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["sessionId"], "S1");
    assert_eq!(json["params"]["expression"], "document.readyState");
}

#[test]
fn test_browser_level_request_has_no_session() {
    let req = CdpRequest {
        id: 1,
        method: "Target.attachToTarget".to_string(),
        params: None,
        session_id: None,
    };
    let json = serde_json::to_string(&req).unwrap();
    assert!(!json.contains("sessionId"));
    assert!(!json.contains("params"));
}

#[test]
fn test_error_response_deserialize() {
    let json = r#"{"id": 3, "error": {"code": -32000, "message": "Cannot find context with specified id"}}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.id, Some(3));
    let error = resp.error.unwrap();
    assert_eq!(error.code, -32000);
    assert!(resp.result.is_none());
}

#[test]
fn test_event_deserialize() {
    let json = r#"{"method": "Page.loadEventFired", "params": {"timestamp": 1.5}, "sessionId": "S1"}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert!(resp.id.is_none());
    assert_eq!(resp.method.as_deref(), Some("Page.loadEventFired"));
    assert_eq!(resp.session_id.as_deref(), Some("S1"));
}

#[test]
fn test_page_info_user_tab() {
    let json = r#"[
        {"id": "A", "type": "page", "title": "Gemini", "url": "https://gemini.google.com/app"},
        {"id": "B", "type": "page", "title": "DevTools", "url": "devtools://devtools/bundled/inspector.html"},
        {"id": "C", "type": "service_worker", "title": "sw", "url": "https://chat.qwen.ai/sw.js"}
    ]"#;
    let pages: Vec<PageInfo> = serde_json::from_str(json).unwrap();
    let tabs: Vec<&str> = pages
        .iter()
        .filter(|p| p.is_user_tab())
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(tabs, vec!["A"]);
}

#[test]
fn test_property_descriptors_deserialize() {
    let json = r#"[
        {"name": "0", "value": {"type": "object", "subtype": "node", "objectId": "obj-1"}, "enumerable": true},
        {"name": "length", "value": {"type": "number", "value": 1}, "enumerable": false}
    ]"#;
    let props: Vec<PropertyDescriptor> = serde_json::from_str(json).unwrap();
    assert_eq!(props.len(), 2);
    let first = props[0].value.as_ref().unwrap();
    assert_eq!(first.object_id.as_deref(), Some("obj-1"));
    assert_eq!(first.subtype.as_deref(), Some("node"));
}

#[test]
fn test_input_enums_serialize() {
    assert_eq!(serde_json::to_string(&MouseButton::Left).unwrap(), "\"left\"");
    assert_eq!(
        serde_json::to_string(&MouseEventType::MousePressed).unwrap(),
        "\"mousePressed\""
    );
    assert_eq!(serde_json::to_string(&KeyEventType::KeyDown).unwrap(), "\"keyDown\"");
}
