//! Message handlers module
//!
//! Handles inbound chat messages: classifies each one against the sender's
//! conversation state and dispatches it to the matching relay or prompt.

use tracing::debug;
use crate::models::InboundMessage;
use crate::services::ServiceFactory;
use crate::state::{classify, ConversationStore, InboundAction};
use crate::utils::errors::Result;

/// Handle one inbound chat message and report the action taken
pub async fn handle_message(
    services: &ServiceFactory,
    store: &ConversationStore,
    msg: &InboundMessage,
) -> Result<InboundAction> {
    let user_id = msg.from.as_str();
    let mut state = store.lock(user_id).await;
    let action = classify(msg, &state);

    debug!(user_id = user_id, action = %action, "Classified inbound message");

    match action {
        InboundAction::MediaIntake => {
            drop(state);
            // Delivery runs detached; its outcome is logged by the intake task.
            services.intake.handle_media(msg).await;
        }
        InboundAction::RejectNoImage => {
            drop(state);
            services.reply(user_id, &services.prompts.no_image).await?;
        }
        InboundAction::RejectAwaitingAudio => {
            drop(state);
            services.reply(user_id, &services.prompts.awaiting_audio).await?;
        }
        InboundAction::SurveyAnswer => {
            services.survey.handle_answer(user_id, &mut state, &msg.body).await?;
        }
        InboundAction::Ignore => {
            debug!(user_id = user_id, message_type = %msg.message_type, "Ignoring message");
        }
    }

    Ok(action)
}
