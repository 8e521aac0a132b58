//! Bean repository: uniqueness, update rules, cascade deletion, photo
//! cleanup.

mod helpers;

use helpers::{bean, classic_shot, TestJournal};
use shotlog_common::Error;

#[tokio::test]
async fn add_and_get_round_trip() -> anyhow::Result<()> {
    let journal = TestJournal::new().await;

    let added = journal.beans.add(bean("Ethiopia Yirgacheffe", 7)).await?;
    let fetched = journal.beans.get(added.id).await?.unwrap();
    assert_eq!(fetched, added);
    Ok(())
}

#[tokio::test]
async fn invalid_bean_is_rejected_without_write() {
    let journal = TestJournal::new().await;

    let mut b = bean("", 7);
    b.notes = "n".repeat(501);
    let err = journal.beans.add(b).await.unwrap_err();

    let message = err.to_string();
    assert!(matches!(err, Error::Validation(_)));
    // Both rule failures are joined into the one message.
    assert!(message.contains("name"));
    assert!(message.contains("notes"));
    assert!(journal.beans.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_name_is_rejected_even_for_inactive_beans() {
    let journal = TestJournal::new().await;

    let first = journal.beans.add(bean("Kenya AA", 7)).await.unwrap();
    journal.beans.set_active(first.id, false).await.unwrap();

    let err = journal.beans.add(bean("Kenya AA", 3)).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn rename_to_other_beans_name_fails_own_name_succeeds() {
    let journal = TestJournal::new().await;

    let kenya = journal.beans.add(bean("Kenya AA", 7)).await.unwrap();
    journal.beans.add(bean("Brazil Santos", 5)).await.unwrap();

    // Renaming onto another bean's name is a conflict.
    let mut renamed = kenya.clone();
    renamed.name = "Brazil Santos".into();
    assert!(matches!(
        journal.beans.update(renamed).await.unwrap_err(),
        Error::Validation(_)
    ));

    // Updating while keeping the current name is fine.
    let mut kept = kenya.clone();
    kept.notes = "blackcurrant, bright".into();
    let updated = journal.beans.update(kept).await.unwrap();
    assert_eq!(updated.name, "Kenya AA");
}

#[tokio::test]
async fn update_of_missing_bean_is_not_found() {
    let journal = TestJournal::new().await;

    let ghost = bean("Ghost", 7);
    assert!(matches!(
        journal.beans.update(ghost).await.unwrap_err(),
        Error::NotFound(_)
    ));
}

#[tokio::test]
async fn delete_of_missing_bean_is_not_found() {
    let journal = TestJournal::new().await;
    assert!(matches!(
        journal.beans.delete(uuid::Uuid::new_v4()).await.unwrap_err(),
        Error::NotFound(_)
    ));
}

#[tokio::test]
async fn list_active_excludes_deactivated_beans() {
    let journal = TestJournal::new().await;

    let kenya = journal.beans.add(bean("Kenya AA", 7)).await.unwrap();
    journal.beans.add(bean("Brazil Santos", 5)).await.unwrap();
    journal.beans.set_active(kenya.id, false).await.unwrap();

    let active = journal.beans.list_active().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Brazil Santos");
    assert_eq!(journal.beans.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn delete_cascades_to_shots_and_recommendations() {
    let journal = TestJournal::new().await;

    let b = journal.beans.add(bean("Kenya AA", 7)).await.unwrap();
    for _ in 0..3 {
        journal.shots.add(classic_shot(b.id)).await.unwrap();
    }
    journal.advisor().advise(b.id, None).await.unwrap();
    assert_eq!(journal.cache.bean_ids().await.unwrap(), vec![b.id]);

    journal.beans.delete(b.id).await.unwrap();

    assert!(journal.beans.get(b.id).await.unwrap().is_none());
    assert!(journal.shots.list_for_bean(b.id).await.unwrap().is_empty());
    assert!(journal.cache.get(b.id).await.unwrap().is_none());
    assert!(journal.recommendations.list_for_bean(b.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_removes_the_photo_file() {
    let journal = TestJournal::new().await;
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("kenya.jpg");
    std::fs::write(&photo, b"jpeg bytes").unwrap();

    let mut b = bean("Kenya AA", 7);
    b.photo_path = Some(photo.to_string_lossy().into_owned());
    let b = journal.beans.add(b).await.unwrap();

    journal.beans.delete(b.id).await.unwrap();
    assert!(!photo.exists());
}

#[tokio::test]
async fn missing_photo_file_does_not_fail_the_deletion() {
    let journal = TestJournal::new().await;

    let mut b = bean("Kenya AA", 7);
    b.photo_path = Some("/nonexistent/kenya.jpg".into());
    let b = journal.beans.add(b).await.unwrap();

    journal.beans.delete(b.id).await.unwrap();
    assert!(journal.beans.get(b.id).await.unwrap().is_none());
}

#[tokio::test]
async fn remember_grinder_setting_updates_the_bean() {
    let journal = TestJournal::new().await;

    let b = journal.beans.add(bean("Kenya AA", 7)).await.unwrap();
    journal.beans.remember_grinder_setting(b.id, "12.5").await.unwrap();

    let fetched = journal.beans.get(b.id).await.unwrap().unwrap();
    assert_eq!(fetched.last_grinder_setting.as_deref(), Some("12.5"));
}

#[tokio::test]
async fn watch_yields_current_list_then_updates() {
    use futures::StreamExt;

    let journal = TestJournal::new().await;
    journal.beans.add(bean("Kenya AA", 7)).await.unwrap();

    let mut stream = Box::pin(journal.beans.watch());

    let initial = stream.next().await.unwrap().unwrap();
    assert_eq!(initial.len(), 1);

    journal.beans.add(bean("Brazil Santos", 5)).await.unwrap();
    let updated = stream.next().await.unwrap().unwrap();
    assert_eq!(updated.len(), 2);
}
