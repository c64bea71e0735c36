//! End-to-end runs of the pipeline against in-memory collaborators.

use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rss_affiliate::config::Config;
use rss_affiliate::feed::types::FeedEntry;
use rss_affiliate::feed::NewsFeed;
use rss_affiliate::model::{ModelError, TextModel};
use rss_affiliate::pipeline::{Pipeline, PipelineError, RunOutcome};
use rss_affiliate::publish::{Post, Publisher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const KITCHEN_URL: &str = "https://s.shopee.tw/4LC79hoVGf";

struct StaticFeed(Vec<FeedEntry>);

#[async_trait]
impl NewsFeed for StaticFeed {
    async fn fetch_entries(&self) -> Result<Vec<FeedEntry>> {
        Ok(self.0.clone())
    }
}

struct BrokenFeed;

#[async_trait]
impl NewsFeed for BrokenFeed {
    async fn fetch_entries(&self) -> Result<Vec<FeedEntry>> {
        anyhow::bail!("dns failure")
    }
}

enum Behavior {
    /// Echo an article that links the destination found in the prompt twice.
    Article,
    Raw(&'static str),
    Fail,
    Unavailable,
}

struct FakeModel {
    behavior: Behavior,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl FakeModel {
    fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }
}

#[async_trait]
impl TextModel for FakeModel {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        match self.behavior {
            Behavior::Article => {
                let body = format!(
                    "<p>Messy drawers?</p><p><a href=\\\"{url}\\\">shop</a></p><ol><li>step</li></ol><a href=\\\"{url}\\\">button</a>",
                    url = KITCHEN_URL
                );
                Ok(format!(
                    "```json\n{{\"category\": \"收納技巧\", \"html_body\": \"{}\"}}\n```",
                    body
                ))
            }
            Behavior::Raw(text) => Ok(text.to_string()),
            Behavior::Fail => Err(ModelError::Request(anyhow::anyhow!("timeout"))),
            Behavior::Unavailable => Err(ModelError::Unavailable("key revoked".to_string())),
        }
    }
}

#[derive(Default)]
struct RecordingPublisher {
    posts: Mutex<Vec<Post>>,
    fail: bool,
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, post: &Post) -> Result<()> {
        if self.fail {
            anyhow::bail!("535 authentication failed");
        }
        self.posts.lock().unwrap().push(post.clone());
        Ok(())
    }
}

fn kitchen_feed() -> StaticFeed {
    StaticFeed(vec![
        FeedEntry::new("5 Tricks to Organize Your Kitchen", "Drawer dividers change everything."),
        FeedEntry::new("An older storage story", "Should never be read."),
    ])
}

fn config() -> Config {
    Config::default()
}

#[tokio::test]
async fn test_end_to_end_generated_article() {
    let config = config();
    let feed = kitchen_feed();
    let model = FakeModel::new(Behavior::Article);
    let publisher = RecordingPublisher::default();

    let outcome = Pipeline::new(&config, &feed, &model, &publisher)
        .run(&mut StdRng::seed_from_u64(1))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Published {
            subject: "5 Tricks to Organize Your Kitchen #收納技巧".to_string(),
            destination: KITCHEN_URL.to_string(),
            degraded: false,
        }
    );
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);

    let prompt = model.last_prompt.lock().unwrap().clone().unwrap();
    assert!(prompt.contains(KITCHEN_URL));
    assert!(prompt.contains("Drawer dividers change everything."));

    let posts = publisher.posts.lock().unwrap();
    assert_eq!(posts.len(), 1);
    let post = &posts[0];
    assert_eq!(post.title, "5 Tricks to Organize Your Kitchen");
    assert_eq!(post.category, "收納技巧");
    assert!(post.html.starts_with(r#"<div style="text-align:center;"#));
    assert!(post.html.contains("5%20Tricks%20to%20Organize%20Your%20Kitchen"));
    assert!(post.html.matches(KITCHEN_URL).count() >= 2);
}

#[tokio::test]
async fn test_model_failure_publishes_fallback() {
    let config = config();
    let feed = kitchen_feed();
    let model = FakeModel::new(Behavior::Fail);
    let publisher = RecordingPublisher::default();

    let outcome = Pipeline::new(&config, &feed, &model, &publisher)
        .run(&mut StdRng::seed_from_u64(1))
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::Published { degraded: true, .. }));
    let posts = publisher.posts.lock().unwrap();
    let post = &posts[0];
    assert_eq!(post.category, config.article.default_category);
    assert!(post.html.contains("Drawer dividers change everything."));
    assert_eq!(post.html.matches(KITCHEN_URL).count(), 1);
}

#[tokio::test]
async fn test_unparsable_reply_publishes_fallback() {
    let config = config();
    let feed = kitchen_feed();
    let model = FakeModel::new(Behavior::Raw("Sorry, I can't produce JSON today."));
    let publisher = RecordingPublisher::default();

    let outcome = Pipeline::new(&config, &feed, &model, &publisher)
        .run(&mut StdRng::seed_from_u64(1))
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::Published { degraded: true, .. }));
    assert_eq!(publisher.posts.lock().unwrap().len(), 1);
}

async fn run_with_reply(reply: &'static str) -> (RunOutcome, RecordingPublisher) {
    let config = config();
    let feed = kitchen_feed();
    let model = FakeModel::new(Behavior::Raw(reply));
    let publisher = RecordingPublisher::default();

    let outcome = Pipeline::new(&config, &feed, &model, &publisher)
        .run(&mut StdRng::seed_from_u64(1))
        .await
        .unwrap();
    (outcome, publisher)
}

#[tokio::test]
async fn test_reply_without_body_publishes_nothing() {
    let (outcome, publisher) = run_with_reply("```json\n{\"category\": \"收納技巧\"}\n```").await;

    assert_eq!(
        outcome,
        RunOutcome::NothingToPublish {
            title: "5 Tricks to Organize Your Kitchen".to_string()
        }
    );
    assert!(publisher.posts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_reply_with_blank_body_publishes_nothing() {
    let (outcome, publisher) = run_with_reply(r#"{"category": "A", "html_body": "   "}"#).await;

    assert!(matches!(outcome, RunOutcome::NothingToPublish { .. }));
    assert!(publisher.posts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_feed_does_nothing() {
    let config = config();
    let feed = StaticFeed(Vec::new());
    let model = FakeModel::new(Behavior::Article);
    let publisher = RecordingPublisher::default();

    let outcome = Pipeline::new(&config, &feed, &model, &publisher)
        .run(&mut StdRng::seed_from_u64(1))
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::NoEntries);
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    assert!(publisher.posts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unavailable_model_aborts_without_publishing() {
    let config = config();
    let feed = kitchen_feed();
    let model = FakeModel::new(Behavior::Unavailable);
    let publisher = RecordingPublisher::default();

    let err = Pipeline::new(&config, &feed, &model, &publisher)
        .run(&mut StdRng::seed_from_u64(1))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::ModelUnavailable(_)));
    assert!(publisher.posts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_feed_failure_is_reported() {
    let config = config();
    let model = FakeModel::new(Behavior::Article);
    let publisher = RecordingPublisher::default();

    let err = Pipeline::new(&config, &BrokenFeed, &model, &publisher)
        .run(&mut StdRng::seed_from_u64(1))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Feed(_)));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_publish_failure_is_surfaced() {
    let config = config();
    let feed = kitchen_feed();
    let model = FakeModel::new(Behavior::Article);
    let publisher = RecordingPublisher {
        fail: true,
        ..Default::default()
    };

    let err = Pipeline::new(&config, &feed, &model, &publisher)
        .run(&mut StdRng::seed_from_u64(1))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Publish(_)));
    assert!(err.to_string().contains("535"));
}

#[tokio::test]
async fn test_persona_from_pool_reaches_prompt() {
    let mut config = config();
    config.personas = vec!["a retired carpenter".to_string()];
    let feed = kitchen_feed();
    let model = FakeModel::new(Behavior::Article);
    let publisher = RecordingPublisher::default();

    Pipeline::new(&config, &feed, &model, &publisher)
        .run(&mut StdRng::seed_from_u64(9))
        .await
        .unwrap();

    let prompt = model.last_prompt.lock().unwrap().clone().unwrap();
    assert!(prompt.contains("a retired carpenter"));
}
