//! Integration tests for [`news_relay_bot::RelayPipeline`]: sanitize, prompt, rewrite, source
//! attribution, and the revision flow.

mod common;

use common::{Scripted, StubRewriter};
use news_relay_bot::{LastInput, RelayError, RelayPipeline, SettingsStore};

fn pipeline(rewriter: std::sync::Arc<StubRewriter>) -> (RelayPipeline, SettingsStore) {
    let settings = SettingsStore::new();
    (RelayPipeline::new(rewriter, settings.clone()), settings)
}

/// **Test: Mention stripped, rewrite returned with source line, last input stored.**
///
/// **Expected:** prompt carries the sanitized text only; output ends with the source label.
#[tokio::test]
async fn rewrites_with_source_and_stores_last_input() {
    let rewriter = StubRewriter::replying("Цены на товары подскочили на 5%.");
    let (pipeline, settings) = pipeline(rewriter.clone());

    let result = pipeline
        .process_inbound_text(-100500, "Цены выросли @somechannel   на 5%", Some("Реальное время"))
        .await
        .unwrap();

    assert_eq!(
        result,
        "Цены на товары подскочили на 5%.\n\nТекст из: Реальное время"
    );
    let prompts = rewriter.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Цены выросли на 5%"));
    assert!(!prompts[0].contains("@somechannel"));
    assert_eq!(
        settings.get_last_input(-100500).await,
        Some(LastInput {
            text: "Цены выросли @somechannel   на 5%".to_string(),
            source: Some("Реальное время".to_string()),
        })
    );
}

/// **Test: The chat's stored style goes into the prompt.**
#[tokio::test]
async fn chat_style_reaches_prompt() {
    let rewriter = StubRewriter::replying("ok");
    let (pipeline, settings) = pipeline(rewriter.clone());
    settings.set_style(7, Some("коротко, без эмодзи")).await;

    let result = pipeline.process_inbound_text(7, "Новость дня", None).await.unwrap();

    assert_eq!(result, "ok");
    let prompt = &rewriter.prompts()[0];
    assert!(prompt.contains(prompt::SECTION_STYLE));
    assert!(prompt.contains("коротко, без эмодзи"));
}

/// **Test: Text that is empty after sanitizing never reaches the backend.**
#[tokio::test]
async fn mention_only_text_is_nothing_to_rewrite() {
    let rewriter = StubRewriter::replying("unused");
    let (pipeline, settings) = pipeline(rewriter.clone());

    let err = pipeline
        .process_inbound_text(1, "  @channel_only  ", None)
        .await
        .unwrap_err();

    assert_eq!(err, RelayError::NothingToRewrite);
    assert!(rewriter.prompts().is_empty());
    assert_eq!(settings.get_last_input(1).await, None);
}

/// **Test: Backend errors map to relay errors and leave last input untouched.**
#[tokio::test]
async fn backend_failures_are_mapped() {
    let rewriter = StubRewriter::scripted(vec![
        Scripted::Unavailable,
        Scripted::MissingKey,
        Scripted::Text("   ".to_string()),
    ]);
    let (pipeline, settings) = pipeline(rewriter);

    assert_eq!(
        pipeline.process_inbound_text(1, "текст", None).await.unwrap_err(),
        RelayError::BackendUnavailable { attempts: 12 }
    );
    assert_eq!(
        pipeline.process_inbound_text(1, "текст", None).await.unwrap_err(),
        RelayError::ConfigMissing("REWRITE_API_KEY")
    );
    assert_eq!(
        pipeline.process_inbound_text(1, "текст", None).await.unwrap_err(),
        RelayError::EmptyBackendResponse
    );
    assert_eq!(settings.get_last_input(1).await, None);
}

/// **Test: Revision rewrites the stored input with style plus editor instruction.**
///
/// **Setup:** stored input "А" without source, chat style "короче".
/// **Expected:** prompt has "короче\n\nEditor revisions: добавь эмодзи"; stored input unchanged.
#[tokio::test]
async fn revise_uses_stored_input_and_combined_style() {
    let rewriter = StubRewriter::replying("А!");
    let (pipeline, settings) = pipeline(rewriter.clone());
    settings.set_last_input(5, "А", None).await;
    settings.set_style(5, Some("короче")).await;

    let result = pipeline.revise(5, "добавь эмодзи").await.unwrap();

    assert_eq!(result, "А!");
    let prompt = &rewriter.prompts()[0];
    assert!(prompt.contains("короче\n\nEditor revisions: добавь эмодзи"));
    assert!(prompt.contains(&format!("{}\nА", prompt::SECTION_TEXT)));
    assert_eq!(settings.get_style(5).await.as_deref(), Some("короче"));
    assert_eq!(
        settings.get_last_input(5).await,
        Some(LastInput {
            text: "А".to_string(),
            source: None
        })
    );
}

/// **Test: Revision keeps the stored source attribution.**
#[tokio::test]
async fn revise_keeps_source() {
    let rewriter = StubRewriter::replying("Новая версия");
    let (pipeline, settings) = pipeline(rewriter);
    settings.set_last_input(5, "Старый текст", Some("Канал")).await;

    let result = pipeline.revise(5, "проще").await.unwrap();

    assert_eq!(result, "Новая версия\n\nТекст из: Канал");
}

/// **Test: Revision without stored input fails before calling the backend.**
#[tokio::test]
async fn revise_without_input() {
    let rewriter = StubRewriter::replying("unused");
    let (pipeline, _) = pipeline(rewriter.clone());

    assert_eq!(
        pipeline.revise(9, "короче").await.unwrap_err(),
        RelayError::NoStoredInput
    );
    assert!(rewriter.prompts().is_empty());
}
