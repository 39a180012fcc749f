use serde::{Deserialize, Serialize};

use crate::models::EditingAction;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JoinChannelMessage {
    pub note_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaveChannelMessage {
    pub note_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentUpdatedMessage {
    pub note_id: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditingStateMessage {
    pub user_id: String,
    pub action: EditingAction,
}

/// Messages a client may send over the websocket.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "join-channel")]
    JoinChannel(JoinChannelMessage),
    #[serde(rename = "leave-channel")]
    LeaveChannel(LeaveChannelMessage),
    #[serde(rename = "content-updated")]
    ContentUpdated(ContentUpdatedMessage),
}

/// Messages the server fans out to channel subscribers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "content-updated")]
    ContentUpdated(ContentUpdatedMessage),
    #[serde(rename = "editing-state")]
    EditingState(EditingStateMessage),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_parse_by_type_tag() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"join-channel","noteId":"note-42"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::JoinChannel(JoinChannelMessage {
                note_id: "note-42".to_string()
            })
        );

        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"content-updated","noteId":"note-42","content":"hello"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::ContentUpdated(ContentUpdatedMessage {
                note_id: "note-42".to_string(),
                content: "hello".to_string()
            })
        );
    }

    #[test]
    fn unknown_type_tag_is_rejected() {
        let res: Result<ClientMessage, _> =
            serde_json::from_str(r#"{"type":"rename-note","noteId":"note-42"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn server_messages_serialize_with_camel_case_payloads() {
        let msg = ServerMessage::ContentUpdated(ContentUpdatedMessage {
            note_id: "note-42".to_string(),
            content: "hello".to_string(),
        });
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "content-updated", "noteId": "note-42", "content": "hello"})
        );

        let msg = ServerMessage::EditingState(EditingStateMessage {
            user_id: "userA".to_string(),
            action: EditingAction::Start,
        });
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "editing-state", "userId": "userA", "action": "start"})
        );
    }
}
