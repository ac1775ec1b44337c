use serde::{Deserialize, Serialize};

const ASSISTANT_NAME: &str = "Reminder Assistant";
// Rachel
const VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
const MAX_CALL_DURATION_SECS: u32 = 30;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePhoneCallRequest {
    pub phone_number_id: String,
    pub customer: Customer,
    pub assistant: Assistant,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub number: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assistant {
    pub name: String,
    pub model: AssistantModel,
    pub voice: AssistantVoice,
    pub first_message: String,
    pub end_call_function_enabled: bool,
    pub max_duration_seconds: u32,
    pub silence_timeout_seconds: u32,
    pub response_delay_seconds: u32,
    pub num_words_to_interrupt_assistant: u32,
    pub background_sound: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantModel {
    pub provider: String,
    pub model: String,
    pub messages: Vec<AssistantMessage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantVoice {
    pub provider: String,
    pub voice_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePhoneCallResponse {
    pub id: String,
}

pub fn spoken_text(title: &str, message: &str) -> String {
    format!(
        "Hello! This is CallMe Reminder. Your reminder: {}. {}. Goodbye!",
        title, message
    )
}

impl CreatePhoneCallRequest {
    pub fn new(phone_number_id: &str, phone_number: &str, title: &str, message: &str) -> Self {
        let text = spoken_text(title, message);
        let instructions = format!(
            r#"You are a reminder delivery assistant. Your ONLY task is to deliver a reminder message and immediately end the call.

IMPORTANT INSTRUCTIONS:
1. Deliver the reminder message exactly as provided below
2. Do NOT ask questions or wait for responses
3. Do NOT engage in any conversation
4. End the call IMMEDIATELY after delivering the message by calling the endCall function

Deliver this message:
"{}"

After saying this, immediately end the call using the endCall function."#,
            text
        );

        Self {
            phone_number_id: phone_number_id.to_string(),
            customer: Customer {
                number: phone_number.to_string(),
            },
            assistant: Assistant {
                name: ASSISTANT_NAME.to_string(),
                model: AssistantModel {
                    provider: "openai".into(),
                    model: "gpt-4o-mini".into(),
                    messages: vec![AssistantMessage {
                        role: "system".into(),
                        content: instructions,
                    }],
                },
                voice: AssistantVoice {
                    provider: "11labs".into(),
                    voice_id: VOICE_ID.into(),
                },
                first_message: text,
                end_call_function_enabled: true,
                max_duration_seconds: MAX_CALL_DURATION_SECS,
                silence_timeout_seconds: 3,
                response_delay_seconds: 0,
                num_words_to_interrupt_assistant: 0,
                background_sound: "off".into(),
            },
        }
    }
}
