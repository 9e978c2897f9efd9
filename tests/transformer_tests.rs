mod common;

use std::sync::Arc;

use common::{StubProvider, TWO_TOPIC_STRUCTURE, test_config};
use lectern::{LectureTransformer, ProviderError, WordBudgetAllocator};

fn transformer(
    script: Vec<Result<String, ProviderError>>,
) -> (Arc<StubProvider>, LectureTransformer<Arc<StubProvider>>) {
    let provider = Arc::new(StubProvider::new(script));
    let transformer = LectureTransformer::new(Arc::clone(&provider), test_config());
    (provider, transformer)
}

// Call order: plan, intro, one call per topic, practical, summary.
fn full_success_script() -> Vec<Result<String, ProviderError>> {
    vec![
        Ok(TWO_TOPIC_STRUCTURE.to_string()),
        Ok("INTRO welcomes everyone to distributed caching.".to_string()),
        Ok("TOPIC-INVALIDATION covers staleness and write-through.".to_string()),
        Ok("TOPIC-EVICTION covers LRU and LFU policies.".to_string()),
        Ok("PRACTICAL sizes a cache tier with staleness and LRU in mind.".to_string()),
        Ok("SUMMARY restates staleness and LRU takeaways.".to_string()),
    ]
}

#[tokio::test]
async fn test_full_pipeline_concatenates_all_sections() {
    let (provider, transformer) = transformer(full_success_script());

    let lecture = transformer
        .transform_to_lecture("a four hundred word transcript stand-in", 10, true)
        .await
        .unwrap();

    // One planning call plus five generations
    assert_eq!(provider.call_count(), 6);
    for marker in [
        "INTRO",
        "TOPIC-INVALIDATION",
        "TOPIC-EVICTION",
        "PRACTICAL",
        "SUMMARY",
    ] {
        assert!(lecture.contains(marker), "missing section: {marker}");
    }
    // Sections joined with blank lines, in pipeline order
    assert!(lecture.find("INTRO").unwrap() < lecture.find("TOPIC-INVALIDATION").unwrap());
    assert!(lecture.find("PRACTICAL").unwrap() < lecture.find("SUMMARY").unwrap());
    assert!(lecture.contains("\n\n"));
}

#[tokio::test]
async fn test_ten_minute_budget_numbers() {
    let budget = WordBudgetAllocator::default().allocate(10);
    assert_eq!(budget.total_target, 1300);
    assert_eq!(budget.min_acceptable, 1235);
    assert_eq!(budget.max_acceptable, 1365);
}

#[tokio::test]
async fn test_practical_failure_returns_intro_and_main_only() {
    let (provider, transformer) = transformer(vec![
        Ok(TWO_TOPIC_STRUCTURE.to_string()),
        Ok("INTRO text.".to_string()),
        Ok("TOPIC-INVALIDATION text.".to_string()),
        Ok("TOPIC-EVICTION text.".to_string()),
        Err(ProviderError::Auth("key revoked".into())),
    ]);

    let lecture = transformer
        .transform_to_lecture("transcript", 10, true)
        .await
        .unwrap();

    // The failed practical call was attempted, the summary never was
    assert_eq!(provider.call_count(), 5);
    assert!(lecture.contains("INTRO"));
    assert!(lecture.contains("TOPIC-INVALIDATION"));
    assert!(lecture.contains("TOPIC-EVICTION"));
    assert!(!lecture.contains("PRACTICAL"));
    assert!(!lecture.contains("SUMMARY"));
}

#[tokio::test]
async fn test_mid_main_failure_returns_completed_topics() {
    let (_provider, transformer) = transformer(vec![
        Ok(TWO_TOPIC_STRUCTURE.to_string()),
        Ok("INTRO text.".to_string()),
        Ok("TOPIC-INVALIDATION text.".to_string()),
        Err(ProviderError::Other("backend gone".into())),
    ]);

    let lecture = transformer
        .transform_to_lecture("transcript", 10, true)
        .await
        .unwrap();

    assert!(lecture.contains("INTRO"));
    assert!(lecture.contains("TOPIC-INVALIDATION"));
    assert!(!lecture.contains("TOPIC-EVICTION"));
}

#[tokio::test]
async fn test_intro_failure_propagates() {
    let (_provider, transformer) = transformer(vec![
        Ok(TWO_TOPIC_STRUCTURE.to_string()),
        Err(ProviderError::Auth("key revoked".into())),
    ]);

    let result = transformer.transform_to_lecture("transcript", 10, true).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_planner_failure_still_produces_a_lecture() {
    // Both planning tiers fail; generation proceeds on the minimal outline
    let (provider, transformer) = transformer(vec![
        Err(ProviderError::Other("down".into())),
        Err(ProviderError::Other("down".into())),
        Ok("INTRO text.".to_string()),
        Ok("TOPIC text.".to_string()),
        Ok("PRACTICAL text.".to_string()),
        Ok("SUMMARY text.".to_string()),
    ]);

    let lecture = transformer
        .transform_to_lecture("transcript", 10, true)
        .await
        .unwrap();

    // Two failed planning calls, then intro + single topic + practical + summary
    assert_eq!(provider.call_count(), 6);
    assert!(lecture.contains("SUMMARY"));
}

#[tokio::test]
async fn test_context_flows_between_topic_generations() {
    let (provider, transformer) = transformer(full_success_script());
    transformer
        .transform_to_lecture("transcript", 10, true)
        .await
        .unwrap();

    let prompts = provider.prompts();
    // prompts[2] is the first topic, prompts[3] the second
    assert!(prompts[2].contains("Covered topics: Invalidation"));
    assert!(prompts[2].contains("Pending topics: Eviction"));
    assert!(prompts[3].contains("Covered topics: Invalidation, Eviction"));
    // The second topic sees the first topic's trailing narrative
    assert!(prompts[3].contains("TOPIC-INVALIDATION covers staleness"));
    // Key concepts accumulate into the key-term list
    assert!(prompts[3].contains("write-through"));

    // The practical prompt advances the section label and narrative
    assert!(prompts[4].contains("TOPIC-EVICTION covers LRU"));
    // The summary prompt carries the practical tail
    assert!(prompts[5].contains("PRACTICAL sizes a cache tier"));
}

#[tokio::test]
async fn test_intro_prompt_has_no_context_block() {
    let (provider, transformer) = transformer(full_success_script());
    transformer
        .transform_to_lecture("transcript", 10, true)
        .await
        .unwrap();

    let prompts = provider.prompts();
    assert!(prompts[1].contains("introduction"));
    assert!(!prompts[1].contains("Recent narrative"));
}
