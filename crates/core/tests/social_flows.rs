//! End-to-end flows over the full service set and the in-memory store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use petbook_common::config::Config;
use petbook_common::storage::{MediaStorage, UploadedMedia};
use petbook_common::{AppError, AppResult};
use petbook_core::{
    AnswerDraft, CommentDraft, NewAccount, PostDraft, QuestionDraft, Services,
};
use petbook_db::MemoryStore;
use petbook_db::documents::{MediaKind, PetContext, Visibility};

struct NullStorage;

#[async_trait::async_trait]
impl MediaStorage for NullStorage {
    async fn upload(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UploadedMedia> {
        Ok(UploadedMedia {
            key: key.to_string(),
            url: format!("/files/{key}"),
            size: data.len() as u64,
            content_type: content_type.to_string(),
        })
    }

    async fn delete(&self, _url: &str) -> AppResult<()> {
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("/files/{key}")
    }

    async fn exists(&self, _key: &str) -> AppResult<bool> {
        Ok(false)
    }
}

fn services() -> Services {
    let config = Config {
        store: petbook_common::config::StoreConfig::default(),
        storage: petbook_common::config::StorageConfig::default(),
        ai: petbook_common::config::AiConfig::default(),
    };
    Services::build(&config, Arc::new(MemoryStore::new()), Arc::new(NullStorage))
}

async fn sign_up(services: &Services, id: &str, name: &str) {
    services
        .accounts
        .get_or_create(NewAccount {
            id: id.to_string(),
            email: Some(format!("{id}@example.com")),
            display_name: Some(name.to_string()),
            photo_url: None,
        })
        .await
        .unwrap();
}

fn image_post(caption: &str) -> PostDraft {
    PostDraft {
        media_urls: vec!["/files/petbook/u1/pic.jpg".to_string()],
        media_kind: MediaKind::Image,
        caption: caption.to_string(),
        visibility: Visibility::Public,
        tags: None,
        pet_id: None,
    }
}

fn buddy_question() -> QuestionDraft {
    QuestionDraft {
        pet: PetContext {
            pet_id: "pet1".to_string(),
            name: "Buddy".to_string(),
            species: "Dog".to_string(),
            breed: Some("Golden Retriever".to_string()),
            birth_date: Some("2021-05-01".to_string()),
        },
        title: "Itchy ears".to_string(),
        content: "He keeps scratching after swimming.".to_string(),
        image_url: None,
    }
}

#[tokio::test]
async fn onboarding_claims_a_username_exactly_once() {
    let services = services();
    sign_up(&services, "u1", "Ana").await;
    sign_up(&services, "u2", "Ben").await;

    assert!(services.registry.is_available(" Buddy_Lover ").await.unwrap());
    services
        .registry
        .claim("u1", "Buddy_Lover", Some("dog person"))
        .await
        .unwrap();

    assert!(!services.registry.is_available("buddy_lover").await.unwrap());
    let result = services.registry.claim("u2", "buddy_lover", None).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let ana = services.accounts.get("u1").await.unwrap();
    assert_eq!(ana.username.as_deref(), Some("buddy_lover"));
    assert!(ana.is_onboarded());

    let hits = services.registry.search("buddy", 10).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "u1");
}

#[tokio::test]
async fn follow_then_post_lands_in_the_feed() {
    let services = services();
    sign_up(&services, "u1", "Ana").await;
    sign_up(&services, "u2", "Ben").await;

    services.social_graph.follow("u1", "u2").await.unwrap();
    assert!(services.social_graph.is_following("u1", "u2").await.unwrap());

    let post = services
        .feed
        .create_post("u2", image_post("first walk"))
        .await
        .unwrap();

    let page = services.feed.list_posts(None).await.unwrap();
    assert_eq!(page.posts.len(), 1);
    assert_eq!(page.posts[0].id, post.id);

    let followers = services.social_graph.list_followers("u2", 10).await.unwrap();
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].0, "u1");

    services.social_graph.unfollow("u1", "u2").await.unwrap();
    let ana = services.accounts.get("u1").await.unwrap();
    let ben = services.accounts.get("u2").await.unwrap();
    assert_eq!(ana.following_count, 0);
    assert_eq!(ben.followers_count, 0);
}

#[tokio::test]
async fn feed_pagination_enumerates_every_post_exactly_once() {
    let services = services();
    sign_up(&services, "u1", "Ana").await;

    for i in 0..12 {
        services
            .feed
            .create_post("u1", image_post(&format!("post {i}")))
            .await
            .unwrap();
    }

    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = services.feed.list_posts(cursor.as_deref()).await.unwrap();
        seen.extend(page.posts.into_iter().map(|p| p.id));
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    assert_eq!(seen.len(), 12);
    let mut deduped = seen.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(deduped.len(), 12);
}

#[tokio::test]
async fn likes_are_a_set_across_accounts() {
    let services = services();
    sign_up(&services, "u1", "Ana").await;
    sign_up(&services, "u2", "Ben").await;
    sign_up(&services, "u3", "Cora").await;

    let post = services
        .feed
        .create_post("u1", image_post("park day"))
        .await
        .unwrap();

    assert!(services.feed.toggle_like(&post.id, "u2").await.unwrap());
    assert!(services.feed.toggle_like(&post.id, "u3").await.unwrap());
    assert!(!services.feed.toggle_like(&post.id, "u2").await.unwrap());

    let post = services.feed.get_post(&post.id).await.unwrap();
    assert_eq!(post.likes, vec!["u3".to_string()]);

    let comment = services
        .feed
        .add_comment(
            "u3",
            CommentDraft {
                post_id: post.id.clone(),
                content: "Cute!".to_string(),
            },
        )
        .await
        .unwrap();
    let comments = services.feed.list_comments(&post.id).await.unwrap();
    assert_eq!(comments, vec![comment]);
}

#[tokio::test]
async fn answer_count_always_matches_listed_answers() {
    let services = services();
    sign_up(&services, "u1", "Ana").await;
    sign_up(&services, "u2", "Ben").await;

    let question = services
        .qa
        .create_question("u1", buddy_question())
        .await
        .unwrap();

    for i in 0..4 {
        services
            .qa
            .add_answer(
                "u2",
                AnswerDraft {
                    question_id: question.id.clone(),
                    content: format!("answer {i}"),
                },
            )
            .await
            .unwrap();
    }
    services
        .qa
        .add_ai_answer(AnswerDraft {
            question_id: question.id.clone(),
            content: "Dry the ears after every swim.".to_string(),
        })
        .await
        .unwrap();

    let question = services.qa.get_question(&question.id).await.unwrap();
    let answers = services.qa.list_answers(&question.id).await.unwrap();
    assert_eq!(question.answer_count, 5);
    assert_eq!(answers.len(), 5);
    assert!(answers.last().unwrap().is_ai_generated);
}
