//! Conversation flow integration tests
//!
//! Drives inbound chat events through the coordinator against the recording
//! transport and the mock backend, checking replies, backend traffic and the
//! resulting conversation state.

mod helpers;

use helpers::*;
use serde_json::json;
use SurveyRelay::models::InboundMessage;
use SurveyRelay::state::ConversationState;
use SurveyRelay::transport::TransportEvent;
use SurveyRelay::SurveyRelayError;

fn state(pending: bool, delivered: bool, image: Option<&str>, question: u32) -> ConversationState {
    ConversationState {
        has_pending_image: pending,
        audio_delivered: delivered,
        image_reference: image.map(str::to_string),
        question_number: question,
    }
}

#[tokio::test]
async fn test_text_without_image_gets_no_image_prompt() {
    let ctx = TestContext::new().await;
    ctx.backend.expect_no_survey_calls().await;
    let user = test_user_id();

    ctx.send_text_from(user, "hello").await;

    assert_eq!(ctx.transport.texts_to(user), vec![ctx.settings.prompts.no_image.clone()]);
    assert_eq!(ctx.state_of(user).await, ConversationState::default());
}

#[tokio::test]
async fn test_text_while_audio_pending_gets_wait_prompt() {
    let ctx = TestContext::new().await;
    ctx.backend.expect_no_survey_calls().await;
    let user = test_user_id();
    ctx.store().put(user, state(true, false, None, 1)).await;

    ctx.send_text_from(user, "4").await;

    let reply = ctx.transport.last_text_to(user).expect("a reply");
    assert!(reply.starts_with("Aguarde"));
    assert_eq!(ctx.state_of(user).await, state(true, false, None, 1));
}

#[tokio::test]
async fn test_invalid_score_is_rejected_without_backend_call() {
    let ctx = TestContext::new().await;
    ctx.backend.expect_no_survey_calls().await;
    let user = test_user_id();
    ctx.store().put(user, state(true, true, Some("img42"), 2)).await;

    for candidate in ["abc", "6", "0", " 3", "10"] {
        ctx.send_text_from(user, candidate).await;
    }

    let replies = ctx.transport.texts_to(user);
    assert_eq!(replies.len(), 5);
    assert!(replies.iter().all(|r| *r == ctx.settings.prompts.invalid_score));
    assert_eq!(ctx.state_of(user).await, state(true, true, Some("img42"), 2));
}

#[tokio::test]
async fn test_valid_score_is_relayed_and_advances_question() {
    let ctx = TestContext::new().await;
    let user = test_user_id();
    ctx.backend
        .mock_survey_matching(
            json!({ "from": user, "imageId": "img42", "questionNumber": 2, "score": 5 }),
            json!({ "message": "Next question?" }),
        )
        .await;
    ctx.store().put(user, state(true, true, Some("img42"), 2)).await;

    ctx.send_text_from(user, "5").await;

    assert_eq!(ctx.transport.last_text_to(user).as_deref(), Some("Next question?"));
    assert_eq!(ctx.state_of(user).await, state(true, true, Some("img42"), 3));
}

#[tokio::test]
async fn test_finished_survey_resets_state() {
    let ctx = TestContext::new().await;
    let user = test_user_id();
    ctx.backend
        .mock_survey(json!({ "message": "Obrigado!", "finished": true }))
        .await;
    ctx.store().put(user, state(true, true, Some("img42"), 5)).await;

    ctx.send_text_from(user, "4").await;

    assert_eq!(ctx.transport.last_text_to(user).as_deref(), Some("Obrigado!"));
    assert_eq!(ctx.state_of(user).await, ConversationState::default());
}

#[tokio::test]
async fn test_missing_backend_message_falls_back_to_acknowledgement() {
    let ctx = TestContext::new().await;
    let user = test_user_id();
    ctx.backend.mock_survey(json!({})).await;
    ctx.store().put(user, state(true, true, Some("img1"), 1)).await;

    ctx.send_text_from(user, "3").await;

    assert_eq!(
        ctx.transport.last_text_to(user),
        Some(ctx.settings.prompts.acknowledgement.clone())
    );
    assert_eq!(ctx.state_of(user).await.question_number, 2);
}

#[tokio::test]
async fn test_backend_next_question_overrides_counter() {
    let ctx = TestContext::new().await;
    let user = test_user_id();
    ctx.backend
        .mock_survey(json!({ "message": "Pergunta 4", "nextQuestion": 4 }))
        .await;
    ctx.store().put(user, state(true, true, Some("img1"), 2)).await;

    ctx.send_text_from(user, "2").await;

    assert_eq!(ctx.state_of(user).await.question_number, 4);
}

#[tokio::test]
async fn test_backend_failure_sends_retry_and_keeps_question() {
    let ctx = TestContext::new().await;
    let user = test_user_id();
    ctx.backend.mock_survey_failure(500).await;
    ctx.store().put(user, state(true, true, Some("img42"), 2)).await;

    ctx.send_text_from(user, "5").await;

    assert_eq!(ctx.transport.last_text_to(user), Some(ctx.settings.prompts.retry.clone()));
    assert_eq!(ctx.state_of(user).await, state(true, true, Some("img42"), 2));
}

#[tokio::test]
async fn test_backend_error_flag_keeps_question_and_relays_message() {
    let ctx = TestContext::new().await;
    let user = test_user_id();
    ctx.backend
        .mock_survey(json!({ "error": true, "message": "Erro interno do servidor" }))
        .await;
    ctx.store().put(user, state(true, true, Some("img42"), 2)).await;

    ctx.send_text_from(user, "5").await;

    assert_eq!(ctx.transport.texts_to(user), vec!["Erro interno do servidor".to_string()]);
    assert_eq!(ctx.state_of(user).await, state(true, true, Some("img42"), 2));
}

#[tokio::test]
async fn test_backend_error_flag_without_message_sends_retry_prompt() {
    let ctx = TestContext::new().await;
    let user = test_user_id();
    ctx.backend.mock_survey(json!({ "error": true, "finished": true })).await;
    ctx.store().put(user, state(true, true, Some("img42"), 5)).await;

    ctx.send_text_from(user, "1").await;

    assert_eq!(ctx.transport.last_text_to(user), Some(ctx.settings.prompts.retry.clone()));
    assert_eq!(ctx.state_of(user).await, state(true, true, Some("img42"), 5));
}

#[tokio::test]
async fn test_image_starts_new_cycle_and_posts_webhook() {
    let ctx = TestContext::new().await;
    let user = test_user_id();
    ctx.backend.mock_webhook_ok().await;
    ctx.store().put(user, state(true, true, Some("img9"), 4)).await;

    ctx.send_image_from(user, "msg-1").await;

    assert_eq!(ctx.state_of(user).await, state(true, false, None, 1));
    assert!(ctx.transport.texts_to(user).is_empty());

    let webhooks = ctx.backend.wait_for_bodies(WEBHOOK_PATH, 1).await;
    assert_eq!(webhooks.len(), 1);
    assert_eq!(webhooks[0]["id"], "msg-1");
    assert_eq!(webhooks[0]["from"], user);
    assert_eq!(webhooks[0]["type"], "image");
    assert_eq!(webhooks[0]["hasMedia"], true);
    assert_eq!(webhooks[0]["media"]["mimetype"], "image/jpeg");
    assert_eq!(webhooks[0]["media"]["data"], "/9j/4A==");
}

#[tokio::test]
async fn test_media_download_failure_still_resets_cycle() {
    let ctx = TestContext::new().await;
    let user = test_user_id();
    ctx.backend.mock_webhook_ok().await;
    ctx.store().put(user, state(true, true, Some("img9"), 3)).await;

    let message = InboundMessage::media("missing-media", user, "image");
    ctx.coordinator
        .handle_event(TransportEvent::Message { message: message.clone() })
        .await;
    assert_eq!(ctx.state_of(user).await, state(true, false, None, 1));

    let result = ctx.coordinator.services().intake.forward(&message).await;
    assert!(matches!(result, Err(SurveyRelayError::SendFailure(_))));
    assert!(ctx.backend.received_bodies(WEBHOOK_PATH).await.is_empty());
}

#[tokio::test]
async fn test_webhook_failure_keeps_cycle_started() {
    let ctx = TestContext::new().await;
    let user = test_user_id();
    ctx.backend.mock_webhook_failure(503).await;

    ctx.send_image_from(user, "msg-2").await;
    assert_eq!(ctx.state_of(user).await, state(true, false, None, 1));

    let message = InboundMessage::media("msg-2", user, "image");
    let result = ctx.coordinator.services().intake.forward(&message).await;
    assert!(matches!(result, Err(SurveyRelayError::BackendUnavailable(_))));
    assert!(ctx.transport.texts_to(user).is_empty());
}

#[tokio::test]
async fn test_non_text_message_is_ignored() {
    let ctx = TestContext::new().await;
    let user = test_user_id();
    let mut message = InboundMessage::text("msg-3", user, "");
    message.message_type = "revoked".to_string();

    ctx.coordinator
        .handle_event(TransportEvent::Message { message })
        .await;

    assert!(ctx.transport.sent().is_empty());
    assert_eq!(ctx.state_of(user).await, ConversationState::default());
}

#[tokio::test]
async fn test_users_do_not_share_state() {
    let ctx = TestContext::new().await;
    ctx.backend.mock_survey(json!({ "message": "ok" })).await;
    let alice = "5511000000001@c.us";
    let bob = "5511000000002@c.us";
    ctx.store().put(alice, state(true, true, Some("a"), 2)).await;

    ctx.send_text_from(alice, "5").await;
    ctx.send_text_from(bob, "5").await;

    assert_eq!(ctx.state_of(alice).await.question_number, 3);
    assert_eq!(ctx.state_of(bob).await, ConversationState::default());
    assert_eq!(ctx.transport.texts_to(bob), vec![ctx.settings.prompts.no_image.clone()]);
}

#[tokio::test]
async fn test_complete_image_to_survey_journey() {
    let ctx = TestContext::new().await;
    let user = test_user_id();
    ctx.set_ready(true);
    ctx.backend.mock_webhook_ok().await;
    ctx.backend
        .mock_survey_matching(
            json!({ "questionNumber": 5 }),
            json!({ "message": "Obrigado!", "finished": true }),
        )
        .await;
    ctx.backend.mock_survey(json!({})).await;

    ctx.send_image_from(user, "journey-img").await;
    ctx.coordinator
        .services()
        .gateway
        .send_voice(user, test_audio_base64(), Some("img-journey"))
        .await
        .expect("voice send should succeed");
    assert_eq!(ctx.state_of(user).await, state(true, true, Some("img-journey"), 1));

    for score in ["5", "4", "3", "2", "1"] {
        ctx.send_text_from(user, score).await;
    }

    let replies = ctx.transport.texts_to(user);
    assert_eq!(replies.len(), 5);
    assert!(replies[..4].iter().all(|r| *r == ctx.settings.prompts.acknowledgement));
    assert_eq!(replies[4], "Obrigado!");
    assert_eq!(ctx.state_of(user).await, ConversationState::default());

    let submissions = ctx.backend.received_bodies(SURVEY_PATH).await;
    let questions: Vec<u64> = submissions
        .iter()
        .map(|s| s["questionNumber"].as_u64().unwrap())
        .collect();
    assert_eq!(questions, vec![1, 2, 3, 4, 5]);
    assert!(submissions.iter().all(|s| s["imageId"] == "img-journey"));

    // After the cycle closes, text is rejected again
    ctx.send_text_from(user, "5").await;
    assert_eq!(ctx.transport.last_text_to(user), Some(ctx.settings.prompts.no_image.clone()));
}
