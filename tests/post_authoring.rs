//! Post authoring rules: ownership on edit, text validation, group
//! resolution, and comment threads.

mod support;

use tribuna::application::posts::{NewPost, PostChanges, PostError};
use tribuna::domain::identity::Viewer;

use support::{MemoryRepos, post_service};

fn draft(text: &str) -> NewPost {
    NewPost {
        text: text.to_string(),
        group_slug: None,
        image: None,
    }
}

#[tokio::test]
async fn create_requires_an_authenticated_viewer() {
    let repos = MemoryRepos::new();
    let posts = post_service(&repos);

    let err = posts
        .create_post(Viewer::Anonymous, draft("hello"))
        .await
        .expect_err("anonymous");
    assert!(matches!(err, PostError::Unauthorized));
}

#[tokio::test]
async fn create_trims_text_and_rejects_blank_posts() {
    let repos = MemoryRepos::new();
    let alice = repos.add_user("alice");
    let posts = post_service(&repos);
    let viewer = Viewer::User(alice.id);

    let created = posts
        .create_post(viewer, draft("  hello  "))
        .await
        .expect("created");
    assert_eq!(created.text, "hello");

    let err = posts
        .create_post(viewer, draft("   "))
        .await
        .expect_err("blank");
    assert!(matches!(err, PostError::Validation { .. }));
}

#[tokio::test]
async fn create_resolves_the_group_by_slug() {
    let repos = MemoryRepos::new();
    let alice = repos.add_user("alice");
    repos.add_group("rust", "Rust");
    let posts = post_service(&repos);
    let viewer = Viewer::User(alice.id);

    let created = posts
        .create_post(
            viewer,
            NewPost {
                text: "grouped".to_string(),
                group_slug: Some("rust".to_string()),
                image: None,
            },
        )
        .await
        .expect("created");
    assert_eq!(created.group.as_ref().map(|g| g.slug.as_str()), Some("rust"));

    let err = posts
        .create_post(
            viewer,
            NewPost {
                text: "orphan".to_string(),
                group_slug: Some("nope".to_string()),
                image: None,
            },
        )
        .await
        .expect_err("unknown group");
    assert!(matches!(err, PostError::UnknownGroup));
}

#[tokio::test]
async fn only_the_author_may_edit_and_others_see_not_found() {
    let repos = MemoryRepos::new();
    let alice = repos.add_user("alice");
    let bob = repos.add_user("bob");
    let post = repos.add_post(&alice, None, "original");
    let posts = post_service(&repos);

    let changes = PostChanges {
        text: "revised".to_string(),
        group_slug: None,
        image: None,
    };

    let err = posts
        .edit_post(Viewer::User(bob.id), post.id, changes.clone())
        .await
        .expect_err("not the author");
    assert!(matches!(err, PostError::NotFound));

    let updated = posts
        .edit_post(Viewer::User(alice.id), post.id, changes)
        .await
        .expect("author edit");
    assert_eq!(updated.text, "revised");
}

#[tokio::test]
async fn editing_a_missing_post_is_not_found() {
    let repos = MemoryRepos::new();
    let alice = repos.add_user("alice");
    let posts = post_service(&repos);

    let err = posts
        .edit_post(
            Viewer::User(alice.id),
            999,
            PostChanges {
                text: "text".to_string(),
                group_slug: None,
                image: None,
            },
        )
        .await
        .expect_err("missing");
    assert!(matches!(err, PostError::NotFound));
}

#[tokio::test]
async fn comments_attach_to_the_post_newest_first() {
    let repos = MemoryRepos::new();
    let alice = repos.add_user("alice");
    let bob = repos.add_user("bob");
    let post = repos.add_post(&alice, None, "discuss");
    let posts = post_service(&repos);

    posts
        .add_comment(Viewer::User(bob.id), post.id, "first!")
        .await
        .expect("comment");
    posts
        .add_comment(Viewer::User(alice.id), post.id, "thanks")
        .await
        .expect("comment");

    let detail = posts.post_detail(post.id).await.expect("detail");
    assert_eq!(detail.post.id, post.id);
    let texts: Vec<&str> = detail.comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["thanks", "first!"]);
    assert_eq!(detail.comments[0].author.username, "alice");
}

#[tokio::test]
async fn commenting_requires_auth_and_an_existing_post() {
    let repos = MemoryRepos::new();
    let alice = repos.add_user("alice");
    let post = repos.add_post(&alice, None, "discuss");
    let posts = post_service(&repos);

    let err = posts
        .add_comment(Viewer::Anonymous, post.id, "hi")
        .await
        .expect_err("anonymous");
    assert!(matches!(err, PostError::Unauthorized));

    let err = posts
        .add_comment(Viewer::User(alice.id), 999, "hi")
        .await
        .expect_err("missing post");
    assert!(matches!(err, PostError::NotFound));
}
