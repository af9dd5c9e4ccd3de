//! Input (mouse and keyboard) operations for CDP page session.

use serde_json::json;
use tracing::debug;

use crate::error::CdpError;
use crate::protocol::{KeyEventType, MouseButton, MouseEventType};

use super::core::PageSession;

impl PageSession {
    /// Click at viewport coordinates.
    pub async fn click(&self, x: f64, y: f64) -> Result<(), CdpError> {
        self.call(
            "Input.dispatchMouseEvent",
            Some(json!({
                "type": MouseEventType::MouseMoved,
                "x": x,
                "y": y,
            })),
        )
        .await?;

        for event_type in [MouseEventType::MousePressed, MouseEventType::MouseReleased] {
            self.call(
                "Input.dispatchMouseEvent",
                Some(json!({
                    "type": event_type,
                    "x": x,
                    "y": y,
                    "button": MouseButton::Left,
                    "clickCount": 1,
                })),
            )
            .await?;
        }

        debug!("Clicked at ({}, {})", x, y);
        Ok(())
    }

    /// Insert text at the focused element.
    pub async fn type_text(&self, text: &str) -> Result<(), CdpError> {
        self.call("Input.insertText", Some(json!({"text": text})))
            .await?;
        debug!("Typed {} characters", text.chars().count());
        Ok(())
    }

    /// Press a key combination such as `Control+v`.
    ///
    /// Synthetic key events do not trigger the browser's own clipboard
    /// shortcuts, so the matching editing command is sent along with them.
    pub async fn press_key_combo(&self, combo: &str) -> Result<(), CdpError> {
        let parts: Vec<&str> = combo.split('+').collect();
        let (key, modifier_names) = match parts.split_last() {
            Some((key, rest)) => (*key, rest),
            None => return Ok(()),
        };
        let modifiers = Self::get_modifiers(modifier_names);

        let mut down = json!({
            "type": KeyEventType::KeyDown,
            "key": key,
            "modifiers": modifiers,
        });
        let mut up = json!({
            "type": KeyEventType::KeyUp,
            "key": key,
            "modifiers": modifiers,
        });
        if let Some((code, key_code)) = Self::key_definition(key) {
            for event in [&mut down, &mut up] {
                event["code"] = json!(code);
                event["windowsVirtualKeyCode"] = json!(key_code);
            }
        }
        if modifiers & (MODIFIER_CONTROL | MODIFIER_META) != 0 {
            if let Some(command) = Self::editing_command(key) {
                down["commands"] = json!([command]);
            }
        }

        self.call("Input.dispatchKeyEvent", Some(down)).await?;
        self.call("Input.dispatchKeyEvent", Some(up)).await?;
        Ok(())
    }

    /// Modifier bit field from modifier names.
    pub(super) fn get_modifiers(modifiers: &[&str]) -> i32 {
        let mut flags = 0;
        for m in modifiers {
            match m.to_lowercase().as_str() {
                "alt" => flags |= MODIFIER_ALT,
                "control" | "ctrl" => flags |= MODIFIER_CONTROL,
                "meta" | "command" | "cmd" => flags |= MODIFIER_META,
                "shift" => flags |= MODIFIER_SHIFT,
                _ => {}
            }
        }
        flags
    }

    /// Physical key code and Windows virtual key code of a letter key.
    pub(super) fn key_definition(key: &str) -> Option<(String, u32)> {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => {
                let upper = c.to_ascii_uppercase();
                Some((format!("Key{}", upper), upper as u32))
            }
            _ => None,
        }
    }

    pub(super) fn editing_command(key: &str) -> Option<&'static str> {
        match key.to_ascii_lowercase().as_str() {
            "v" => Some("paste"),
            "c" => Some("copy"),
            "x" => Some("cut"),
            "a" => Some("selectAll"),
            _ => None,
        }
    }
}

const MODIFIER_ALT: i32 = 1;
const MODIFIER_CONTROL: i32 = 2;
const MODIFIER_META: i32 = 4;
const MODIFIER_SHIFT: i32 = 8;
