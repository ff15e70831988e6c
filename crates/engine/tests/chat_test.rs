mod test_utils;

use std::time::Duration;

use pretty_assertions::assert_eq;

use dispatch_core::errors::DispatchError;
use dispatch_core::models::user::{Actor, Role};
use dispatch_engine::chat;
use test_utils::*;

#[test_log::test(tokio::test)]
async fn test_both_parties_see_the_same_log_in_send_order() {
    let ctx = setup().await;
    let engine = &ctx.engine;

    chat::send_message(engine, &carla(), SAM, "hi")
        .await
        .expect("Failed to send");
    chat::send_message(engine, &sam(), CARLA, "hello")
        .await
        .expect("Failed to send");

    let carlas_view = chat::list_messages(engine, &carla(), SAM)
        .await
        .expect("Failed to list messages");
    let sams_view = chat::list_messages(engine, &sam(), CARLA)
        .await
        .expect("Failed to list messages");

    for view in [&carlas_view, &sams_view] {
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].body, "hi");
        assert_eq!(view[0].from, CARLA);
        assert_eq!(view[1].body, "hello");
        assert_eq!(view[1].from, SAM);
    }
}

#[tokio::test]
async fn test_opening_a_conversation_acknowledges_it() {
    let ctx = setup().await;
    let engine = &ctx.engine;

    chat::send_message(engine, &sam(), CARLA, "on my way")
        .await
        .expect("Failed to send");
    assert_eq!(
        chat::unread_count(engine, &carla()).await.expect("Failed to count"),
        1
    );

    chat::list_messages(engine, &carla(), SAM)
        .await
        .expect("Failed to list messages");

    assert_eq!(
        chat::unread_count(engine, &carla()).await.expect("Failed to count"),
        0
    );
    // Reading her side must not acknowledge Sam's side.
    assert_eq!(
        chat::unread_count(engine, &sam()).await.expect("Failed to count"),
        0
    );
}

#[tokio::test]
async fn test_conversations_are_sorted_and_counted() {
    let ctx = setup().await;
    let engine = &ctx.engine;

    chat::send_message(engine, &sam(), CARLA, "checking in")
        .await
        .expect("Failed to send");
    chat::send_message(engine, &sam(), CARLA, "still there?")
        .await
        .expect("Failed to send");
    tokio::time::sleep(Duration::from_millis(5)).await;
    chat::send_message(engine, &admin(), CARLA, "welcome aboard")
        .await
        .expect("Failed to send");

    let conversations = chat::list_conversations(engine, &carla())
        .await
        .expect("Failed to list conversations");
    assert_eq!(conversations.len(), 2);

    // Most recent conversation first, names resolved from the directories.
    assert_eq!(conversations[0].email, ADMIN);
    assert_eq!(conversations[0].name, "Avery Admin");
    assert_eq!(conversations[0].role, Some(Role::Admin));
    assert_eq!(conversations[0].last_message, "welcome aboard");
    assert_eq!(conversations[0].unread, 1);

    assert_eq!(conversations[1].email, SAM);
    assert_eq!(conversations[1].name, "Sam Rivera");
    assert_eq!(conversations[1].role, Some(Role::Staff));
    assert_eq!(conversations[1].last_message, "still there?");
    assert_eq!(conversations[1].unread, 2);

    // The total equals the sum of the per-conversation unread counts.
    let summed: usize = conversations.iter().map(|c| c.unread).sum();
    assert_eq!(
        chat::unread_count(engine, &carla()).await.expect("Failed to count"),
        summed
    );
}

#[tokio::test]
async fn test_unknown_participants_fall_back_to_their_address() {
    let ctx = setup().await;
    let engine = &ctx.engine;
    let ghost = Actor::new("ghost@nowhere.test", Role::Client);

    chat::send_message(engine, &ghost, CARLA, "boo")
        .await
        .expect("Failed to send");

    let conversations = chat::list_conversations(engine, &carla())
        .await
        .expect("Failed to list conversations");
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].name, "ghost@nowhere.test");
    assert_eq!(conversations[0].role, None);
}

#[tokio::test]
async fn test_blank_messages_are_rejected() {
    let ctx = setup().await;
    let engine = &ctx.engine;

    let no_body = chat::send_message(engine, &carla(), SAM, "   ").await;
    assert!(matches!(no_body, Err(DispatchError::Validation(_))));

    let no_recipient = chat::send_message(engine, &carla(), "", "hi").await;
    assert!(matches!(no_recipient, Err(DispatchError::Validation(_))));
}

#[tokio::test]
async fn test_search_user_resolves_across_directories() {
    let ctx = setup().await;
    let engine = &ctx.engine;

    let staff = chat::search_user(engine, SAM).await.expect("Failed to search");
    assert_eq!(staff.name, "Sam Rivera");
    assert_eq!(staff.role, Role::Staff);

    let client = chat::search_user(engine, CARLA).await.expect("Failed to search");
    assert_eq!(client.role, Role::Client);

    let legacy_admin = chat::search_user(engine, OPS).await.expect("Failed to search");
    assert_eq!(legacy_admin.role, Role::Admin);
    assert_eq!(legacy_admin.name, OPS);

    let missing = chat::search_user(engine, "ghost@nowhere.test").await;
    assert!(matches!(missing, Err(DispatchError::NotFound(_))));
}
